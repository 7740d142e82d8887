//! Core data model shared by every pipeline stage.
//!
//! All records are plain serde shapes: each tool receives the previous
//! stage's output as input and returns a new, independent structure. Nothing
//! here is persisted between calls.

use serde::{Deserialize, Serialize};

/// News article fetched from an upstream source. Immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    pub id: String,
    pub source: String,
    pub title: String,
    pub url: String,
    /// RFC 3339 publish timestamp.
    pub timestamp: String,
    #[serde(default = "unknown_author")]
    pub author: String,
    pub content: String,
}

fn unknown_author() -> String {
    "Unknown".to_string()
}

/// A sentence-like snippet of an article that downstream tools analyse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Passage {
    /// `{article_id}-{order}`.
    pub id: String,
    pub article_id: String,
    /// 0-based position within the article.
    pub order: usize,
    pub text: String,
}

/// Coarse entity kind guessed from lexical cues around a mention.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Person,
    Org,
    Location,
    Unknown,
}

impl EntityKind {
    /// Fixed tie-break priority: person > org > location > unknown.
    pub fn priority(self) -> u8 {
        match self {
            EntityKind::Person => 3,
            EntityKind::Org => 2,
            EntityKind::Location => 1,
            EntityKind::Unknown => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Person => "person",
            EntityKind::Org => "org",
            EntityKind::Location => "location",
            EntityKind::Unknown => "unknown",
        }
    }
}

/// A raw entity span detected in a passage; not yet canonical.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawEntity {
    pub surface: String,
    pub passage_id: String,
    /// Character offsets into the passage text.
    pub start: usize,
    pub end: usize,
    pub kind: EntityKind,
}

/// A merged identity representing one or more surface-form mentions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedEntity {
    /// Stable within a single run: `ent-0`, `ent-1`, ... in first-seen order.
    pub canonical_id: String,
    pub canonical_name: String,
    /// Distinct surface forms, first-seen order.
    pub surface_forms: Vec<String>,
    /// Distinct source passage ids, first-seen order.
    pub passage_ids: Vec<String>,
    /// Coarse kind guesses aggregated across all mentions.
    pub kind_votes: Vec<EntityKind>,
    /// Total raw mentions folded into this entity.
    pub mentions: usize,
}

/// Resolved entity plus the category the tagger settled on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaggedEntity {
    #[serde(flatten)]
    pub entity: ResolvedEntity,
    pub category: EntityKind,
    /// Winning votes / total votes, in [0, 1].
    pub confidence: f64,
}

/// Passage-level topic prediction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopicPrediction {
    pub passage_id: String,
    pub topic: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

/// Passage-level sentiment score from the polarity lexicon (or LLM).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentimentScore {
    pub passage_id: String,
    pub sentiment: Sentiment,
    /// Signed lexicon sum that produced the label.
    pub score: i32,
}

/// Per-article aggregation of entities and passage classifications.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TagSummary {
    pub article_id: String,
    pub entities: Vec<TaggedEntity>,
    pub dominant_topic: String,
    pub sentiment: Sentiment,
    /// Prominence of the article's entity and topic content, in [0, 1].
    pub salience: f64,
    /// Short snippets from entity-bearing passages.
    pub highlights: Vec<String>,
}

/// A claim asserted by an article, checked against the fact table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claim {
    pub text: String,
    pub article_id: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Supported,
    Disputed,
    Unverified,
}

/// Pointer to the evidence backing a verdict.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvidenceRef {
    pub source: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FactCheckResult {
    pub claim: Claim,
    pub verdict: Verdict,
    pub evidence: Option<EvidenceRef>,
}

/// A story scored and positioned for one reader profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedStory {
    pub article_id: String,
    pub title: String,
    pub url: String,
    pub summary: TagSummary,
    pub score: f64,
    /// Dense 1..N rank; no ties survive the ordering rules.
    pub position: usize,
}

/// Final rendered compilation of ranked story summaries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Digest {
    pub rendered: String,
    pub format: String,
    pub item_count: usize,
    /// RFC 3339; informational only, never part of `rendered`.
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliveryReceipt {
    /// First 12 hex chars of sha256(rendered digest).
    pub digest_ref: String,
    pub channel: String,
    pub recipient: String,
    pub status: String,
}

/// Reader profile that drives the ranking stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default)]
    pub preferred_topics: Vec<String>,
    #[serde(default)]
    pub preferred_sentiment: Option<Sentiment>,
    #[serde(default)]
    pub priority_entities: Vec<String>,
    #[serde(default)]
    pub blocked_sources: Vec<String>,
    #[serde(default)]
    pub favourite_sources: Vec<String>,
}
