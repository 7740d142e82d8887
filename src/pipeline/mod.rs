//! The newsroom pipeline stages, one module per tool.
//!
//! Every stage is a pure function over the previous stage's output; the
//! documented order (fetch → passages → entities → disambiguate → tag →
//! classify → summarize → fact-check → rank → compile → deliver) is a usage
//! convention, not an enforced state machine.

pub mod compiler;
pub mod deliverer;
pub mod disambiguator;
pub mod entities;
pub mod fact_checker;
pub mod fetcher;
pub mod passages;
pub mod ranker;
pub mod sentiment;
pub mod summarizer;
pub mod tagger;
pub mod topics;

use once_cell::sync::OnceCell;
use regex::Regex;

/// Normalize feed text: decode HTML entities, strip tags, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}

/// Lowercased alphanumeric tokens.
pub fn tokenize(s: &str) -> Vec<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_tags_and_entities() {
        let out = normalize_text("<p>Fed &amp; markets</p>\n\n rally ");
        assert_eq!(out, "Fed & markets rally");
    }

    #[test]
    fn tokenize_lowercases_and_splits() {
        assert_eq!(
            tokenize("OpenAI's toolkit, v2!"),
            vec!["openai", "s", "toolkit", "v2"]
        );
    }
}
