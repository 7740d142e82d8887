//! HTTP surface: every pipeline stage is exposed as a JSON tool endpoint so
//! callers can compose the stages remotely or run any stage in isolation.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::llm::{build_client, DynLlmClient};
use crate::pipeline::{
    compiler, deliverer, disambiguator, entities, fact_checker, fetcher, passages, ranker,
    sentiment, summarizer, tagger, topics,
};
use crate::profile;
use crate::types::{
    Article, Claim, DeliveryReceipt, Digest, FactCheckResult, Passage, RankedStory, RawEntity,
    ResolvedEntity, SentimentScore, TagSummary, TaggedEntity, TopicPrediction, UserProfile,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PipelineConfig>,
    pub llm: DynLlmClient,
}

pub fn create_router(config: PipelineConfig) -> Router {
    let llm = build_client(&config);
    let state = AppState {
        config: Arc::new(config),
        llm,
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/tools/fetch_articles", post(fetch_articles))
        .route("/tools/extract_passages", post(extract_passages))
        .route("/tools/extract_entities", post(extract_entities))
        .route("/tools/disambiguate_entities", post(disambiguate_entities))
        .route("/tools/tag_entities", post(tag_entities))
        .route("/tools/classify_topic", post(classify_topic))
        .route("/tools/analyze_sentiment", post(analyze_sentiment))
        .route("/tools/summarize_tags", post(summarize_tags))
        .route("/tools/fact_check", post(fact_check))
        .route("/tools/rank_stories", post(rank_stories))
        .route("/tools/compile_digest", post(compile_digest))
        .route("/tools/deliver_digest", post(deliver_digest))
        .route("/resources/user_profile/{user_id}", get(user_profile))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct FetchReq {
    source: String,
    #[serde(default)]
    since: Option<String>,
    #[serde(default)]
    limit: Option<usize>,
}

async fn fetch_articles(Json(body): Json<FetchReq>) -> Result<Json<fetcher::FetchResult>> {
    let result = fetcher::fetch_articles(&body.source, body.since.as_deref(), body.limit).await?;
    Ok(Json(result))
}

#[derive(serde::Deserialize)]
struct PassagesReq {
    article_id: String,
    content: String,
}

async fn extract_passages(Json(body): Json<PassagesReq>) -> Json<Vec<Passage>> {
    Json(passages::extract_passages(&body.article_id, &body.content))
}

#[derive(serde::Deserialize)]
struct PassagesIn {
    passages: Vec<Passage>,
}

async fn extract_entities(
    State(state): State<AppState>,
    Json(body): Json<PassagesIn>,
) -> Json<Vec<RawEntity>> {
    Json(entities::extract_entities(&body.passages, state.llm.as_ref()).await)
}

#[derive(serde::Deserialize)]
struct DisambiguateReq {
    entities: Vec<RawEntity>,
}

async fn disambiguate_entities(Json(body): Json<DisambiguateReq>) -> Json<Vec<ResolvedEntity>> {
    Json(disambiguator::disambiguate_entities(&body.entities))
}

#[derive(serde::Deserialize)]
struct TagReq {
    resolved_entities: Vec<ResolvedEntity>,
}

async fn tag_entities(Json(body): Json<TagReq>) -> Json<Vec<TaggedEntity>> {
    Json(tagger::tag_entities(body.resolved_entities))
}

async fn classify_topic(
    State(state): State<AppState>,
    Json(body): Json<PassagesIn>,
) -> Json<Vec<TopicPrediction>> {
    Json(topics::classify_topic(&body.passages, state.llm.as_ref()).await)
}

async fn analyze_sentiment(
    State(state): State<AppState>,
    Json(body): Json<PassagesIn>,
) -> Json<Vec<SentimentScore>> {
    Json(sentiment::analyze_sentiment(&body.passages, state.llm.as_ref()).await)
}

#[derive(serde::Deserialize)]
struct SummarizeReq {
    tagged_entities: Vec<TaggedEntity>,
    passages: Vec<Passage>,
}

async fn summarize_tags(
    State(state): State<AppState>,
    Json(body): Json<SummarizeReq>,
) -> Result<Json<Vec<TagSummary>>> {
    let summaries =
        summarizer::summarize_tags(&body.tagged_entities, &body.passages, state.llm.as_ref())
            .await?;
    Ok(Json(summaries))
}

#[derive(serde::Deserialize)]
struct FactCheckReq {
    claims: Vec<Claim>,
}

async fn fact_check(Json(body): Json<FactCheckReq>) -> Json<Vec<FactCheckResult>> {
    Json(fact_checker::fact_check(body.claims))
}

#[derive(serde::Deserialize)]
struct RankReq {
    // Caller-supplied profile; the fixed store only backs the resource route.
    user_profile: UserProfile,
    summaries: Vec<TagSummary>,
    articles: Vec<Article>,
}

async fn rank_stories(Json(body): Json<RankReq>) -> Result<Json<Vec<RankedStory>>> {
    let ranked = ranker::rank_stories(&body.user_profile, &body.summaries, &body.articles)?;
    Ok(Json(ranked))
}

#[derive(serde::Deserialize)]
struct CompileReq {
    ranked_summaries: Vec<RankedStory>,
    format: String,
}

async fn compile_digest(Json(body): Json<CompileReq>) -> Result<Json<Digest>> {
    Ok(Json(compiler::compile_digest(
        &body.ranked_summaries,
        &body.format,
    )?))
}

#[derive(serde::Deserialize)]
struct DeliverReq {
    digest: Digest,
    delivery_channel: String,
    user_id: String,
}

async fn deliver_digest(Json(body): Json<DeliverReq>) -> Result<Json<DeliveryReceipt>> {
    Ok(Json(deliverer::deliver_digest(
        &body.digest,
        &body.delivery_channel,
        &body.user_id,
    )?))
}

async fn user_profile(Path(user_id): Path<String>) -> Json<UserProfile> {
    Json(profile::get_user_profile(&user_id))
}
