// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - POST /tools/* happy paths for a few representative stages
// - error mapping (400 invalid_input, 422 invalid_format / unsupported_channel)
// - GET /resources/user_profile/{user_id}

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt as _; // for `oneshot`

use newsroom_pipeline::api;
use newsroom_pipeline::config::PipelineConfig;

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

/// Build the same Router the binary uses, rule-based path only.
fn test_router() -> Router {
    api::create_router(PipelineConfig::default())
}

async fn post_json(app: Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build request");
    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_returns_200_and_ok_body() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    assert_eq!(String::from_utf8_lossy(&bytes).trim(), "ok");
}

#[tokio::test]
async fn fetch_articles_returns_canned_corpus() {
    let (status, body) = post_json(
        test_router(),
        "/tools/fetch_articles",
        json!({ "source": "sample" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fallback"], json!(false));
    let articles = body["articles"].as_array().expect("articles array");
    assert!(!articles.is_empty());
    assert!(articles[0]["id"].is_string());
}

#[tokio::test]
async fn fetch_unknown_dataset_is_400_invalid_input() {
    let (status, body) = post_json(
        test_router(),
        "/tools/fetch_articles",
        json!({ "source": "no-such-dataset" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], json!("invalid_input"));
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn extract_passages_splits_sentences() {
    let (status, body) = post_json(
        test_router(),
        "/tools/extract_passages",
        json!({ "article_id": "a-9", "content": "First sentence. Second sentence!" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let passages = body.as_array().expect("passages array");
    assert_eq!(passages.len(), 2);
    assert_eq!(passages[0]["id"], json!("a-9-0"));
    assert_eq!(passages[1]["id"], json!("a-9-1"));
}

#[tokio::test]
async fn entity_stages_compose_over_http() {
    let app = test_router();

    let passage = json!({
        "id": "a-1-0",
        "article_id": "a-1",
        "order": 0,
        "text": "Mayor Elena Ruiz praised the United Nations program in New York City."
    });

    let (status, raw) = post_json(
        app.clone(),
        "/tools/extract_entities",
        json!({ "passages": [passage] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!raw.as_array().unwrap().is_empty());

    let (status, resolved) = post_json(
        app.clone(),
        "/tools/disambiguate_entities",
        json!({ "entities": raw }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let resolved_arr = resolved.as_array().unwrap();
    assert!(resolved_arr
        .iter()
        .all(|e| e["canonical_id"].as_str().unwrap().starts_with("ent-")));

    let (status, tagged) = post_json(
        app,
        "/tools/tag_entities",
        json!({ "resolved_entities": resolved }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(tagged
        .as_array()
        .unwrap()
        .iter()
        .all(|e| e["confidence"].as_f64().unwrap() >= 0.0));
}

#[tokio::test]
async fn compile_digest_rejects_unknown_format_with_422() {
    let (status, body) = post_json(
        test_router(),
        "/tools/compile_digest",
        json!({ "ranked_summaries": [], "format": "pdf" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], json!("invalid_format"));
}

#[tokio::test]
async fn deliver_digest_rejects_unknown_channel_with_422() {
    let digest = json!({
        "rendered": "DAILY DIGEST\n",
        "format": "plain",
        "item_count": 0,
        "generated_at": "2025-06-04T00:00:00+00:00"
    });
    let (status, body) = post_json(
        test_router(),
        "/tools/deliver_digest",
        json!({ "digest": digest, "delivery_channel": "pigeon", "user_id": "demo-user" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], json!("unsupported_channel"));
}

// The argument names of the ranking-stage tools are part of the published
// contract: `user_profile` is a full profile object (not a store key),
// compile takes `ranked_summaries`, deliver takes `delivery_channel`.
#[tokio::test]
async fn ranking_stage_tools_accept_published_argument_names() {
    let app = test_router();

    let profile = json!({
        "user_id": "wire-check",
        "preferred_topics": ["technology"],
        "preferred_sentiment": "positive",
        "priority_entities": [],
        "blocked_sources": [],
        "favourite_sources": []
    });
    let summary = json!({
        "article_id": "a-100",
        "entities": [],
        "dominant_topic": "technology",
        "sentiment": "positive",
        "salience": 0.5,
        "highlights": ["A short highlight."]
    });
    let article = json!({
        "id": "a-100",
        "source": "City Tech Wire",
        "title": "Wire names stay stable",
        "url": "https://example.com/a-100",
        "timestamp": "2025-06-03T12:00:00+00:00",
        "author": "Staff",
        "content": "Body text."
    });

    let (status, ranked) = post_json(
        app.clone(),
        "/tools/rank_stories",
        json!({ "user_profile": profile, "summaries": [summary], "articles": [article] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ranked.as_array().map(|r| r.len()), Some(1));
    assert_eq!(ranked[0]["position"], json!(1));

    let (status, digest) = post_json(
        app.clone(),
        "/tools/compile_digest",
        json!({ "ranked_summaries": ranked, "format": "markdown" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(digest["item_count"], json!(1));

    let (status, receipt) = post_json(
        app,
        "/tools/deliver_digest",
        json!({ "digest": digest, "delivery_channel": "email", "user_id": "demo-user" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["status"], json!("delivered"));
    assert_eq!(receipt["channel"], json!("email"));
}

// Out-of-order composition: a tagged entity pointing at a passage the caller
// never supplied is a caller error, not something to paper over.
#[tokio::test]
async fn summarize_tags_rejects_unknown_passage_references() {
    let tagged = json!([{
        "canonical_id": "ent-0",
        "canonical_name": "Acme Corp",
        "surface_forms": ["Acme Corp"],
        "passage_ids": ["no-such-passage-9"],
        "kind_votes": ["org"],
        "mentions": 1,
        "category": "org",
        "confidence": 1.0
    }]);
    let passages = json!([{
        "id": "a-1-0",
        "article_id": "a-1",
        "order": 0,
        "text": "Acme Corp expanded."
    }]);
    let (status, body) = post_json(
        test_router(),
        "/tools/summarize_tags",
        json!({ "tagged_entities": tagged, "passages": passages }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], json!("invalid_input"));
}

#[tokio::test]
async fn user_profile_resource_serves_known_and_default_profiles() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/resources/user_profile/demo-user")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    let profile: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(profile["user_id"], json!("demo-user"));
    assert!(profile["preferred_topics"]
        .as_array()
        .unwrap()
        .contains(&json!("technology")));

    let req = Request::builder()
        .method("GET")
        .uri("/resources/user_profile/someone-else")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    let profile: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(profile["user_id"], json!("someone-else"));
    assert_eq!(profile["preferred_topics"], json!(["general"]));
}
