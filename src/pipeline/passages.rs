//! Passage extractor: sentence-boundary splitting with stable ids.

use crate::types::Passage;

/// Abbreviations whose trailing period is not a sentence boundary.
const ABBREVIATIONS: &[&str] = &[
    "Mr.", "Ms.", "Mrs.", "Dr.", "Gov.", "Sen.", "Rep.", "St.", "Inc.", "Co.", "vs.",
];

/// True when the token ending at a period looks like an abbreviation:
/// either a known title/suffix or a dotted initialism ("U.N.", "U.S.").
fn is_abbreviation(token_with_dot: &str) -> bool {
    if ABBREVIATIONS.contains(&token_with_dot) {
        return true;
    }
    // Dotted initialism: every segment between dots is a single letter.
    let trimmed = token_with_dot.trim_end_matches('.');
    !trimmed.is_empty()
        && token_with_dot.ends_with('.')
        && trimmed
            .split('.')
            .all(|seg| seg.len() == 1 && seg.chars().all(|c| c.is_alphabetic()))
}

/// Split `content` into sentence-like segments. Boundary punctuation is kept
/// out of the segments so callers can re-insert it when reconstructing.
fn split_sentences(content: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut token = String::new(); // chars since last whitespace, incl. punctuation

    for ch in content.chars() {
        match ch {
            '.' => {
                token.push(ch);
                if is_abbreviation(&token) {
                    current.push(ch);
                } else {
                    token.clear();
                    flush(&mut segments, &mut current);
                }
            }
            '!' | '?' => {
                token.clear();
                flush(&mut segments, &mut current);
            }
            c if c.is_whitespace() => {
                token.clear();
                current.push(c);
            }
            c => {
                token.push(c);
                current.push(c);
            }
        }
    }
    flush(&mut segments, &mut current);
    segments
}

fn flush(segments: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        segments.push(trimmed.to_string());
    }
    current.clear();
}

/// Split article content into passages with ids `{article_id}-{ordinal}`,
/// ordinals starting at 0. Empty or whitespace-only input yields an empty
/// list, not an error.
pub fn extract_passages(article_id: &str, content: &str) -> Vec<Passage> {
    split_sentences(content)
        .into_iter()
        .enumerate()
        .map(|(order, text)| Passage {
            id: format!("{article_id}-{order}"),
            article_id: article_id.to_string(),
            order,
            text,
        })
        .collect()
}
