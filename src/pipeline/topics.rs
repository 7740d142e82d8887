//! Topic classifier: keyword table lookup with an optional LLM override.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::warn;

use crate::llm::LlmClient;
use crate::pipeline::tokenize;
use crate::types::{Passage, TopicPrediction};

pub const DEFAULT_TOPIC: &str = "general";

#[derive(Debug, Deserialize)]
struct TopicRule {
    topic: String,
    keywords: Vec<String>,
}

/// Fixed-order rule table; the first topic with a keyword hit wins.
static TOPIC_RULES: Lazy<Vec<TopicRule>> = Lazy::new(|| {
    let raw = include_str!("../../resources/topic_keywords.json");
    serde_json::from_str(raw).expect("valid topic keyword table")
});

fn rule_topic(text: &str) -> (String, f64) {
    let lowered = text.to_ascii_lowercase();
    let tokens: HashSet<String> = tokenize(&lowered).into_iter().collect();
    for rule in TOPIC_RULES.iter() {
        // Single-word keywords match whole tokens only ("ai" must not hit
        // "air quality"); phrases match as substrings.
        let hit = rule.keywords.iter().any(|kw| {
            if kw.contains(' ') {
                lowered.contains(kw.as_str())
            } else {
                tokens.contains(kw.as_str())
            }
        });
        if hit {
            return (rule.topic.clone(), 0.9);
        }
    }
    (DEFAULT_TOPIC.to_string(), 0.5)
}

/// Rule-based classification, one prediction per passage in input order.
pub fn rule_based_topics(passages: &[Passage]) -> Vec<TopicPrediction> {
    passages
        .iter()
        .map(|p| {
            let (topic, confidence) = rule_topic(&p.text);
            TopicPrediction {
                passage_id: p.id.clone(),
                topic,
                confidence,
            }
        })
        .collect()
}

const LLM_SYSTEM_PROMPT: &str = "You are a newsroom beat classifier. Categorise each passage \
into one of: technology, climate, civic, business, or general (use general when unsure). \
Return JSON with key 'topics': a list of objects with passage_id, topic, and confidence (0-1).";

#[derive(Deserialize)]
struct LlmTopics {
    topics: Vec<TopicPrediction>,
}

/// Classify passages into newsroom beats, optionally via the LLM. The LLM
/// path must cover every passage or the rules take over.
pub async fn classify_topic(passages: &[Passage], llm: &dyn LlmClient) -> Vec<TopicPrediction> {
    if let Some(raw) = llm
        .complete(
            LLM_SYSTEM_PROMPT,
            &serde_json::to_string(passages).unwrap_or_default(),
        )
        .await
    {
        match serde_json::from_str::<LlmTopics>(&raw) {
            Ok(parsed) => {
                let predicted: HashSet<&str> =
                    parsed.topics.iter().map(|t| t.passage_id.as_str()).collect();
                if passages.iter().all(|p| predicted.contains(p.id.as_str())) {
                    return parsed.topics;
                }
                warn!("llm topics missed passages; using rules");
            }
            Err(e) => warn!(error = %e, "llm topic output unparsable; using rules"),
        }
    }
    rule_based_topics(passages)
}
