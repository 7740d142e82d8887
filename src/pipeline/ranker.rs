//! Story ranker: scores summaries against a reader profile and produces a
//! dense, deterministic total order.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::warn;

use crate::error::{PipelineError, Result};
use crate::types::{Article, RankedStory, TagSummary, UserProfile};

pub const ENV_RANKING_CONFIG: &str = "NEWSROOM_RANKING_CONFIG";

const DEFAULT_RANKING_TOML: &str = include_str!("../../config/ranking.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct RankingConfig {
    pub ranking: RankingSection,
    pub weights: RankingWeights,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankingSection {
    pub recency_decay_hours: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankingWeights {
    pub topic_match: f64,
    pub salience: f64,
    pub recency: f64,
    pub sentiment_match: f64,
    pub priority_entity: f64,
    pub favourite_source: f64,
}

impl RankingConfig {
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Load from NEWSROOM_RANKING_CONFIG if set and readable, else the
    /// compiled-in defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(ENV_RANKING_CONFIG) {
            let path = PathBuf::from(path);
            match std::fs::read_to_string(&path).map_err(anyhow::Error::from).and_then(|s| Self::from_toml_str(&s)) {
                Ok(cfg) => return cfg,
                Err(e) => warn!(path = %path.display(), error = %e, "ranking config unreadable; using defaults"),
            }
        }
        Self::from_toml_str(DEFAULT_RANKING_TOML).expect("valid embedded ranking config")
    }
}

static DEFAULT_CONFIG: Lazy<RankingConfig> = Lazy::new(RankingConfig::load);

fn parse_ts(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn recency_weight(published: Option<DateTime<Utc>>, now: DateTime<Utc>, decay_hours: f64) -> f64 {
    let Some(published) = published else {
        return 0.0;
    };
    let age_hours = (now - published).num_seconds().max(0) as f64 / 3600.0;
    (-age_hours / decay_hours).exp()
}

fn contains_ci(haystack: &[String], needle: &str) -> bool {
    haystack.iter().any(|h| h.eq_ignore_ascii_case(needle))
}

/// Score and order summaries for one reader. Blocked sources are dropped;
/// every surviving summary must reference a known article or the call fails
/// with `InvalidInput`. Ties are broken by newer publish timestamp, then by
/// article id, so positions 1..N form a total order.
pub fn rank_stories_at(
    profile: &UserProfile,
    summaries: &[TagSummary],
    articles: &[Article],
    config: &RankingConfig,
    now: DateTime<Utc>,
) -> Result<Vec<RankedStory>> {
    let by_id: HashMap<&str, &Article> = articles.iter().map(|a| (a.id.as_str(), a)).collect();

    let mut scored: Vec<(f64, Option<DateTime<Utc>>, RankedStory)> = Vec::new();
    for summary in summaries {
        let article = by_id.get(summary.article_id.as_str()).ok_or_else(|| {
            PipelineError::InvalidInput(format!(
                "summary references unknown article '{}'",
                summary.article_id
            ))
        })?;

        if contains_ci(&profile.blocked_sources, &article.source) {
            continue;
        }

        let w = &config.weights;
        let mut score = 0.0;

        if contains_ci(&profile.preferred_topics, &summary.dominant_topic) {
            score += w.topic_match;
        }
        score += w.salience * summary.salience;

        let published = parse_ts(&article.timestamp);
        score += w.recency * recency_weight(published, now, config.ranking.recency_decay_hours);

        if profile.preferred_sentiment == Some(summary.sentiment) {
            score += w.sentiment_match;
        }
        if summary
            .entities
            .iter()
            .any(|e| contains_ci(&profile.priority_entities, &e.entity.canonical_name))
        {
            score += w.priority_entity;
        }
        if contains_ci(&profile.favourite_sources, &article.source) {
            score += w.favourite_source;
        }

        scored.push((
            score,
            published,
            RankedStory {
                article_id: summary.article_id.clone(),
                title: article.title.clone(),
                url: article.url.clone(),
                summary: summary.clone(),
                score,
                position: 0, // assigned after sorting
            },
        ));
    }

    // Total order: score desc, newer first, then article id ascending.
    scored.sort_by(|(sa, ta, ra), (sb, tb, rb)| {
        sb.total_cmp(sa)
            .then_with(|| tb.cmp(ta))
            .then_with(|| ra.article_id.cmp(&rb.article_id))
    });

    Ok(scored
        .into_iter()
        .enumerate()
        .map(|(i, (_, _, mut story))| {
            story.position = i + 1;
            story
        })
        .collect())
}

/// Rank with the process-default config against the current clock.
pub fn rank_stories(
    profile: &UserProfile,
    summaries: &[TagSummary],
    articles: &[Article],
) -> Result<Vec<RankedStory>> {
    rank_stories_at(profile, summaries, articles, &DEFAULT_CONFIG, Utc::now())
}
