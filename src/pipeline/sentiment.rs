//! Sentiment analyzer: polarity lexicon with negation handling, optional
//! LLM override.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::warn;

use crate::llm::LlmClient;
use crate::pipeline::tokenize;
use crate::types::{Passage, Sentiment, SentimentScore};

static LEXICON: Lazy<HashMap<String, i32>> = Lazy::new(|| {
    let raw = include_str!("../../resources/sentiment_lexicon.json");
    serde_json::from_str(raw).expect("valid sentiment lexicon")
});

fn is_negator(tok: &str) -> bool {
    matches!(tok, "not" | "no" | "never" | "cannot" | "without")
}

/// Signed lexicon sum. A negator within the 3 preceding tokens inverts the
/// sign of a scored word.
pub fn score_text(text: &str) -> i32 {
    let tokens = tokenize(text);
    let mut score = 0;
    for i in 0..tokens.len() {
        let base = *LEXICON.get(tokens[i].as_str()).unwrap_or(&0);
        if base == 0 {
            continue;
        }
        let negated = (1..=3).any(|k| i >= k && is_negator(tokens[i - k].as_str()));
        score += if negated { -base } else { base };
    }
    score
}

fn label(score: i32) -> Sentiment {
    match score.signum() {
        1 => Sentiment::Positive,
        -1 => Sentiment::Negative,
        _ => Sentiment::Neutral,
    }
}

/// Rule-based scoring, one result per passage in input order.
pub fn rule_based_sentiment(passages: &[Passage]) -> Vec<SentimentScore> {
    passages
        .iter()
        .map(|p| {
            let score = score_text(&p.text);
            SentimentScore {
                passage_id: p.id.clone(),
                sentiment: label(score),
                score,
            }
        })
        .collect()
}

const LLM_SYSTEM_PROMPT: &str = "You analyse the sentiment of news passages. Return JSON with \
key 'sentiment_scores': a list of objects with passage_id, sentiment \
(positive/neutral/negative), and score (signed integer).";

#[derive(Deserialize)]
struct LlmSentiment {
    sentiment_scores: Vec<SentimentScore>,
}

/// Analyze passage sentiment, optionally via the LLM; incomplete or
/// unparsable LLM output falls back to the lexicon.
pub async fn analyze_sentiment(passages: &[Passage], llm: &dyn LlmClient) -> Vec<SentimentScore> {
    if let Some(raw) = llm
        .complete(
            LLM_SYSTEM_PROMPT,
            &serde_json::to_string(passages).unwrap_or_default(),
        )
        .await
    {
        match serde_json::from_str::<LlmSentiment>(&raw) {
            Ok(parsed) => {
                let predicted: HashSet<&str> = parsed
                    .sentiment_scores
                    .iter()
                    .map(|s| s.passage_id.as_str())
                    .collect();
                if passages.iter().all(|p| predicted.contains(p.id.as_str())) {
                    return parsed.sentiment_scores;
                }
                warn!("llm sentiment missed passages; using lexicon");
            }
            Err(e) => warn!(error = %e, "llm sentiment output unparsable; using lexicon"),
        }
    }
    rule_based_sentiment(passages)
}
