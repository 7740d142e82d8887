//! Fact checker: claims against a fixed reference table. No network, no
//! mutable state.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::pipeline::tokenize;
use crate::types::{Claim, EvidenceRef, FactCheckResult, Verdict};

/// Overlap ratio a claim must reach against a fact's keyword set.
const SUPPORT_THRESHOLD: f64 = 0.6;

const NEGATION_CUES: &[&str] = &[
    "not", "no", "never", "denies", "denied", "false", "didn", "fake",
];

#[derive(Debug, Deserialize)]
struct KnownFact {
    #[allow(dead_code)] // human-readable statement, kept for the table's sake
    fact: String,
    keywords: Vec<String>,
    reference: EvidenceRef,
}

static KNOWN_FACTS: Lazy<Vec<KnownFact>> = Lazy::new(|| {
    let raw = include_str!("../../resources/known_facts.json");
    serde_json::from_str(raw).expect("valid fact table")
});

fn overlap_ratio(claim_tokens: &HashSet<String>, fact: &KnownFact) -> f64 {
    if fact.keywords.is_empty() {
        return 0.0;
    }
    let hits = fact
        .keywords
        .iter()
        .filter(|kw| claim_tokens.contains(kw.as_str()))
        .count();
    hits as f64 / fact.keywords.len() as f64
}

fn has_negation(claim_tokens: &HashSet<String>) -> bool {
    NEGATION_CUES.iter().any(|cue| claim_tokens.contains(*cue))
}

/// Check each claim against the reference table: best keyword overlap at or
/// above the threshold yields "supported", or "disputed" when the claim
/// carries an explicit negation cue; anything else is "unverified".
pub fn fact_check(claims: Vec<Claim>) -> Vec<FactCheckResult> {
    claims
        .into_iter()
        .map(|claim| {
            let tokens: HashSet<String> = tokenize(&claim.text).into_iter().collect();

            let best = KNOWN_FACTS
                .iter()
                .map(|fact| (overlap_ratio(&tokens, fact), fact))
                .max_by(|(a, _), (b, _)| a.total_cmp(b));

            match best {
                Some((ratio, fact)) if ratio >= SUPPORT_THRESHOLD => {
                    let verdict = if has_negation(&tokens) {
                        Verdict::Disputed
                    } else {
                        Verdict::Supported
                    };
                    FactCheckResult {
                        claim,
                        verdict,
                        evidence: Some(fact.reference.clone()),
                    }
                }
                _ => FactCheckResult {
                    claim,
                    verdict: Verdict::Unverified,
                    evidence: None,
                },
            }
        })
        .collect()
}
