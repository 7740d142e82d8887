//! Tag summarizer: per-article aggregation of entities, topic, sentiment,
//! and a salience score.

use std::collections::HashSet;

use crate::error::{PipelineError, Result};
use crate::llm::LlmClient;
use crate::pipeline::{sentiment, topics};
use crate::types::{Passage, Sentiment, TagSummary, TaggedEntity};

const HIGHLIGHT_LIMIT: usize = 160;
const MAX_HIGHLIGHTS: usize = 3;

/// Salience: monotone non-decreasing in entity count and in average tagging
/// confidence (holding the other fixed), with a small passage-count term.
pub fn salience(entity_count: usize, avg_confidence: f64, passage_count: usize) -> f64 {
    let entity_term = 1.0 - (-(entity_count as f64) / 4.0).exp();
    let passage_term = (passage_count as f64 / 10.0).min(1.0);
    (0.5 * entity_term + 0.3 * avg_confidence + 0.2 * passage_term).clamp(0.0, 1.0)
}

/// Word-boundary snippet of at most `limit` chars, "..." when truncated.
fn build_highlight(text: &str, limit: usize) -> String {
    let mut snippet = String::new();
    for word in text.split_whitespace() {
        let projected = snippet.len() + usize::from(!snippet.is_empty()) + word.len();
        if projected > limit {
            break;
        }
        if !snippet.is_empty() {
            snippet.push(' ');
        }
        snippet.push_str(word);
    }
    if !snippet.is_empty() && snippet.len() < text.trim().len() {
        format!("{snippet}...")
    } else if snippet.is_empty() {
        text.chars().take(limit).collect()
    } else {
        snippet
    }
}

fn majority_topic(predictions: &[&str]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for topic in predictions {
        match counts.iter_mut().find(|(t, _)| t == topic) {
            Some((_, c)) => *c += 1,
            None => counts.push((topic, 1)),
        }
    }
    // First-seen order breaks ties: only a strictly greater count wins.
    let mut best: Option<(&str, usize)> = None;
    for (topic, count) in counts {
        if best.map(|(_, c)| count > c).unwrap_or(true) {
            best = Some((topic, count));
        }
    }
    best.map(|(t, _)| t.to_string())
        .unwrap_or_else(|| topics::DEFAULT_TOPIC.to_string())
}

fn majority_sentiment(labels: &[Sentiment]) -> Sentiment {
    let count = |s: Sentiment| labels.iter().filter(|l| **l == s).count();
    let pos = count(Sentiment::Positive);
    let neu = count(Sentiment::Neutral);
    let neg = count(Sentiment::Negative);
    let top = pos.max(neu).max(neg);
    // Any tie at the top resolves to neutral.
    match (pos == top, neu == top, neg == top) {
        (true, false, false) => Sentiment::Positive,
        (false, false, true) => Sentiment::Negative,
        _ => Sentiment::Neutral,
    }
}

/// Aggregate tagged entities and passage classifications into one summary
/// per distinct article id present in `passages`, in first-seen order.
/// Every entity must reference passages from `passages`; a dangling passage
/// id is `InvalidInput`, not a silently vanishing entity.
pub async fn summarize_tags(
    tagged: &[TaggedEntity],
    passages: &[Passage],
    llm: &dyn LlmClient,
) -> Result<Vec<TagSummary>> {
    let known: HashSet<&str> = passages.iter().map(|p| p.id.as_str()).collect();
    for t in tagged {
        if let Some(bad) = t
            .entity
            .passage_ids
            .iter()
            .find(|pid| !known.contains(pid.as_str()))
        {
            return Err(PipelineError::InvalidInput(format!(
                "entity '{}' references unknown passage '{}'",
                t.entity.canonical_name, bad
            )));
        }
    }

    let topic_predictions = topics::classify_topic(passages, llm).await;
    let sentiment_scores = sentiment::analyze_sentiment(passages, llm).await;

    let mut article_order: Vec<&str> = Vec::new();
    for p in passages {
        if !article_order.contains(&p.article_id.as_str()) {
            article_order.push(&p.article_id);
        }
    }

    let summaries = article_order
        .iter()
        .map(|article_id| {
            let article_passages: Vec<&Passage> = passages
                .iter()
                .filter(|p| p.article_id == *article_id)
                .collect();
            let passage_ids: HashSet<&str> =
                article_passages.iter().map(|p| p.id.as_str()).collect();

            let entities: Vec<TaggedEntity> = tagged
                .iter()
                .filter(|t| {
                    t.entity
                        .passage_ids
                        .iter()
                        .any(|pid| passage_ids.contains(pid.as_str()))
                })
                .cloned()
                .collect();

            let article_topics: Vec<&str> = topic_predictions
                .iter()
                .filter(|t| passage_ids.contains(t.passage_id.as_str()))
                .map(|t| t.topic.as_str())
                .collect();
            let article_sentiments: Vec<Sentiment> = sentiment_scores
                .iter()
                .filter(|s| passage_ids.contains(s.passage_id.as_str()))
                .map(|s| s.sentiment)
                .collect();

            let avg_confidence = if entities.is_empty() {
                0.0
            } else {
                entities.iter().map(|e| e.confidence).sum::<f64>() / entities.len() as f64
            };

            // Snippets from entity-bearing passages, passage order, deduped.
            let entity_passages: HashSet<&str> = entities
                .iter()
                .flat_map(|e| e.entity.passage_ids.iter().map(String::as_str))
                .collect();
            let mut highlights = Vec::new();
            for p in &article_passages {
                if highlights.len() >= MAX_HIGHLIGHTS {
                    break;
                }
                if entity_passages.contains(p.id.as_str()) {
                    let h = build_highlight(&p.text, HIGHLIGHT_LIMIT);
                    if !h.is_empty() && !highlights.contains(&h) {
                        highlights.push(h);
                    }
                }
            }

            TagSummary {
                article_id: article_id.to_string(),
                dominant_topic: majority_topic(&article_topics),
                sentiment: majority_sentiment(&article_sentiments),
                salience: salience(entities.len(), avg_confidence, article_passages.len()),
                entities,
                highlights,
            }
        })
        .collect();
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::DisabledClient;
    use crate::types::{EntityKind, ResolvedEntity};

    fn passage(id: &str, article_id: &str, order: usize, text: &str) -> Passage {
        Passage {
            id: id.to_string(),
            article_id: article_id.to_string(),
            order,
            text: text.to_string(),
        }
    }

    fn tagged(name: &str, passage_ids: &[&str], confidence: f64) -> TaggedEntity {
        TaggedEntity {
            entity: ResolvedEntity {
                canonical_id: "ent-0".to_string(),
                canonical_name: name.to_string(),
                surface_forms: vec![name.to_string()],
                passage_ids: passage_ids.iter().map(|s| s.to_string()).collect(),
                kind_votes: vec![EntityKind::Org],
                mentions: passage_ids.len(),
            },
            category: EntityKind::Org,
            confidence,
        }
    }

    #[tokio::test]
    async fn one_summary_per_article_in_first_seen_order() {
        let passages = vec![
            passage("a-1-0", "a-1", 0, "OpenAI shipped an automation toolkit"),
            passage("a-2-0", "a-2", 0, "Sensors track air quality in Brooklyn"),
            passage("a-1-1", "a-1", 1, "Editors welcomed the software"),
        ];
        let out = summarize_tags(&[], &passages, &DisabledClient).await.unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].article_id, "a-1");
        assert_eq!(out[1].article_id, "a-2");
        assert_eq!(out[0].dominant_topic, "technology");
        assert_eq!(out[1].dominant_topic, "climate");
    }

    #[tokio::test]
    async fn entities_attach_to_their_articles() {
        let passages = vec![
            passage("a-1-0", "a-1", 0, "OpenAI shipped a toolkit"),
            passage("a-2-0", "a-2", 0, "Brooklyn news"),
        ];
        let t = vec![tagged("OpenAI", &["a-1-0"], 1.0)];
        let out = summarize_tags(&t, &passages, &DisabledClient).await.unwrap();
        assert_eq!(out[0].entities.len(), 1);
        assert!(out[1].entities.is_empty());
        assert!(out[0].salience > out[1].salience);
    }

    #[tokio::test]
    async fn highlights_come_from_entity_bearing_passages() {
        let passages = vec![
            passage("a-1-0", "a-1", 0, "OpenAI shipped a toolkit"),
            passage("a-1-1", "a-1", 1, "Unrelated filler sentence"),
        ];
        let t = vec![tagged("OpenAI", &["a-1-0"], 1.0)];
        let out = summarize_tags(&t, &passages, &DisabledClient).await.unwrap();
        assert_eq!(out[0].highlights, vec!["OpenAI shipped a toolkit"]);
    }

    #[tokio::test]
    async fn dangling_passage_reference_is_invalid_input() {
        let passages = vec![passage("a-1-0", "a-1", 0, "OpenAI shipped a toolkit")];
        let t = vec![tagged("OpenAI", &["no-such-passage-9"], 1.0)];
        let err = summarize_tags(&t, &passages, &DisabledClient)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput(_)));
        assert!(err.to_string().contains("no-such-passage-9"));
    }

    #[tokio::test]
    async fn partially_dangling_reference_is_also_rejected() {
        let passages = vec![passage("a-1-0", "a-1", 0, "OpenAI shipped a toolkit")];
        let t = vec![tagged("OpenAI", &["a-1-0", "ghost-1"], 1.0)];
        let err = summarize_tags(&t, &passages, &DisabledClient)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput(_)));
    }

    #[test]
    fn salience_monotone_in_entity_count() {
        let mut prev = 0.0;
        for n in 0..20 {
            let s = salience(n, 0.5, 3);
            assert!(s >= prev, "salience dropped at entity count {n}");
            prev = s;
        }
    }

    #[test]
    fn salience_monotone_in_confidence() {
        let mut prev = 0.0;
        for step in 0..=10 {
            let conf = step as f64 / 10.0;
            let s = salience(5, conf, 3);
            assert!(s >= prev, "salience dropped at confidence {conf}");
            prev = s;
        }
    }

    #[test]
    fn highlight_truncates_on_word_boundary() {
        let text = "word ".repeat(100);
        let h = build_highlight(&text, 40);
        assert!(h.ends_with("..."));
        assert!(h.len() <= 43);
    }

    #[test]
    fn topic_tie_keeps_first_seen_passage_order() {
        assert_eq!(majority_topic(&["climate", "technology"]), "climate");
        assert_eq!(
            majority_topic(&["climate", "technology", "technology"]),
            "technology"
        );
        assert_eq!(majority_topic(&[]), topics::DEFAULT_TOPIC);
    }

    #[test]
    fn sentiment_tie_is_neutral() {
        assert_eq!(
            majority_sentiment(&[Sentiment::Positive, Sentiment::Negative]),
            Sentiment::Neutral
        );
        assert_eq!(
            majority_sentiment(&[Sentiment::Positive, Sentiment::Positive, Sentiment::Negative]),
            Sentiment::Positive
        );
        assert_eq!(majority_sentiment(&[]), Sentiment::Neutral);
    }
}
