//! Entity extractor: capitalized-word runs with coarse kind guesses.
//!
//! The rule path scans passages for runs of capitalized tokens and guesses a
//! coarse kind from lexical cues (titles, corporate suffixes, prepositions).
//! The optional LLM path must produce the same shape and silently falls back
//! to the rules on any failure.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::warn;

use crate::llm::LlmClient;
use crate::types::{EntityKind, Passage, RawEntity};

static RE_CAP_RUN: Lazy<Regex> = Lazy::new(|| {
    // Capitalized token, interior ./&/' allowed ("U.N.", "O'Neil", "A&M"),
    // chained across single spaces.
    Regex::new(r"\b[A-Z][A-Za-z'&.]*(?: [A-Z][A-Za-z'&.]*)*").expect("entity run regex")
});

/// Honorifics folded out of the surface form; their presence marks a person.
const TITLES: &[&str] = &[
    "Mr", "Mr.", "Ms", "Ms.", "Mrs", "Mrs.", "Dr", "Dr.", "President", "Mayor", "Senator",
    "Sen.", "Gov.", "Governor", "Rep.",
];

/// Sentence-leading function words stripped from the front of a run.
const LEADING_STOPWORDS: &[&str] = &[
    "The", "A", "An", "At", "In", "On", "Of", "For", "And", "But", "To", "It", "He", "She",
    "They", "We", "I",
];

/// Corporate/organizational suffixes (final token, trailing dot ignored).
const ORG_SUFFIXES: &[&str] = &["Inc", "Corp", "Ltd", "LLC", "Co", "Group", "Desk", "Company"];

/// Prepositions that mark the following run as a location.
const LOCATION_PREPOSITIONS: &[&str] = &["in", "at", "near", "from", "across"];

/// Last full word strictly before byte offset `at`.
fn word_before(text: &str, at: usize) -> Option<&str> {
    text[..at]
        .split(|c: char| !c.is_alphanumeric() && c != '.')
        .filter(|w| !w.is_empty())
        .last()
}

fn guess_kind(surface: &str, preceding: Option<&str>, titled: bool) -> EntityKind {
    if titled {
        return EntityKind::Person;
    }
    if let Some(last) = surface.split_whitespace().last() {
        if ORG_SUFFIXES.contains(&last.trim_end_matches('.')) {
            return EntityKind::Org;
        }
    }
    if let Some(prev) = preceding {
        if LOCATION_PREPOSITIONS.contains(&prev.to_ascii_lowercase().as_str()) {
            return EntityKind::Location;
        }
    }
    EntityKind::Unknown
}

/// Drop spans fully contained in a longer span within the same passage, and
/// exact duplicates. Input order is preserved for the survivors.
fn suppress_overlaps(mut found: Vec<RawEntity>) -> Vec<RawEntity> {
    let snapshot = found.clone();
    found.retain(|e| {
        !snapshot.iter().any(|other| {
            other.passage_id == e.passage_id
                && (other.end - other.start) > (e.end - e.start)
                && other.start <= e.start
                && e.end <= other.end
        })
    });
    let mut seen = HashSet::new();
    found.retain(|e| seen.insert((e.passage_id.clone(), e.start, e.end)));
    found
}

/// Rule-based extraction over all passages, in passage order.
pub fn rule_based_entities(passages: &[Passage]) -> Vec<RawEntity> {
    let mut out = Vec::new();

    for passage in passages {
        for m in RE_CAP_RUN.find_iter(&passage.text) {
            let mut start = m.start();
            let mut surface = m.as_str();
            let mut titled = false;

            // Fold leading titles and function words out of the run.
            loop {
                let Some(first) = surface.split_whitespace().next() else {
                    break;
                };
                if TITLES.contains(&first) {
                    titled = true;
                } else if !LEADING_STOPWORDS.contains(&first) {
                    break;
                }
                let skipped = first.len() + 1; // token + single space
                if skipped >= surface.len() {
                    surface = "";
                    break;
                }
                surface = &surface[skipped..];
                start += skipped;
            }
            if surface.is_empty() {
                continue;
            }

            let kind = guess_kind(surface, word_before(&passage.text, m.start()), titled);
            out.push(RawEntity {
                surface: surface.to_string(),
                passage_id: passage.id.clone(),
                start,
                end: start + surface.len(),
                kind,
            });
        }
    }

    suppress_overlaps(out)
}

const LLM_SYSTEM_PROMPT: &str = "You are an information extraction assistant for a newsroom. \
Return JSON with a single key 'entities' whose value is a list. Each item must be an object \
with surface, passage_id, start, end, and kind (person/org/location/unknown).";

#[derive(Deserialize)]
struct LlmEntities {
    entities: Vec<RawEntity>,
}

/// Identify named entities in passages, optionally via the LLM.
pub async fn extract_entities(passages: &[Passage], llm: &dyn LlmClient) -> Vec<RawEntity> {
    if let Some(raw) = llm
        .complete(
            LLM_SYSTEM_PROMPT,
            &serde_json::to_string(passages).unwrap_or_default(),
        )
        .await
    {
        match serde_json::from_str::<LlmEntities>(&raw) {
            Ok(parsed) => {
                let known: HashSet<&str> = passages.iter().map(|p| p.id.as_str()).collect();
                if parsed
                    .entities
                    .iter()
                    .all(|e| known.contains(e.passage_id.as_str()))
                {
                    return parsed.entities;
                }
                warn!("llm entities referenced unknown passages; using rules");
            }
            Err(e) => warn!(error = %e, "llm entity output unparsable; using rules"),
        }
    }
    rule_based_entities(passages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{DisabledClient, MockClient};

    fn passage(id: &str, text: &str) -> Passage {
        Passage {
            id: id.to_string(),
            article_id: "a-1".to_string(),
            order: 0,
            text: text.to_string(),
        }
    }

    #[test]
    fn finds_capitalized_runs_with_spans() {
        let p = passage("a-1-0", "OpenAI released a toolkit for Jamie Rivera");
        let out = rule_based_entities(&[p.clone()]);
        let surfaces: Vec<&str> = out.iter().map(|e| e.surface.as_str()).collect();
        assert_eq!(surfaces, vec!["OpenAI", "Jamie Rivera"]);
        let jamie = &out[1];
        assert_eq!(&p.text[jamie.start..jamie.end], "Jamie Rivera");
    }

    #[test]
    fn title_marks_person_and_is_stripped() {
        let out = rule_based_entities(&[passage("a-1-0", "reporters heard Mayor Elena Ruiz speak")]);
        let ruiz = out.iter().find(|e| e.surface == "Elena Ruiz").unwrap();
        assert_eq!(ruiz.kind, EntityKind::Person);
    }

    #[test]
    fn org_suffix_marks_org() {
        let out = rule_based_entities(&[passage("a-1-0", "A grant from the Metro Climate Desk")]);
        let desk = out.iter().find(|e| e.surface == "Metro Climate Desk").unwrap();
        assert_eq!(desk.kind, EntityKind::Org);
    }

    #[test]
    fn preposition_marks_location() {
        let out = rule_based_entities(&[passage("a-1-0", "a press event in New York City")]);
        let nyc = out.iter().find(|e| e.surface == "New York City").unwrap();
        assert_eq!(nyc.kind, EntityKind::Location);
    }

    #[test]
    fn leading_stopword_is_stripped() {
        let out = rule_based_entities(&[passage("a-1-0", "Funds came from The United Nations")]);
        assert!(out.iter().any(|e| e.surface == "United Nations"));
        assert!(!out.iter().any(|e| e.surface.starts_with("The ")));
    }

    #[test]
    fn initialism_survives_extraction() {
        let out = rule_based_entities(&[passage("a-1-0", "The U.N. backed the effort")]);
        assert!(out.iter().any(|e| e.surface == "U.N."));
    }

    #[test]
    fn stopword_only_run_is_dropped() {
        let out = rule_based_entities(&[passage("a-1-0", "The end came quietly")]);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn disabled_llm_uses_rules() {
        let passages = vec![passage("a-1-0", "OpenAI shipped")];
        let out = extract_entities(&passages, &DisabledClient).await;
        assert_eq!(out, rule_based_entities(&passages));
    }

    #[tokio::test]
    async fn unparsable_llm_output_falls_back() {
        let passages = vec![passage("a-1-0", "OpenAI shipped")];
        let mock = MockClient {
            fixed: "not json".to_string(),
        };
        let out = extract_entities(&passages, &mock).await;
        assert_eq!(out, rule_based_entities(&passages));
    }

    #[tokio::test]
    async fn llm_entities_with_unknown_passage_fall_back() {
        let passages = vec![passage("a-1-0", "OpenAI shipped")];
        let mock = MockClient {
            fixed: r#"{"entities":[{"surface":"X","passage_id":"ghost","start":0,"end":1,"kind":"org"}]}"#
                .to_string(),
        };
        let out = extract_entities(&passages, &mock).await;
        assert_eq!(out, rule_based_entities(&passages));
    }
}
