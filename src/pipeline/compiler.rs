//! Digest compiler: renders a ranked story list into a deliverable document.

use chrono::Utc;

use crate::error::{PipelineError, Result};
use crate::types::{Digest, RankedStory};

pub const FORMAT_MARKDOWN: &str = "markdown";
pub const FORMAT_PLAIN: &str = "plain";

fn render_markdown(stories: &[RankedStory]) -> String {
    let mut out = String::from("# Daily Digest\n");
    if stories.is_empty() {
        out.push_str("\n_No stories matched your profile today._\n");
        return out;
    }
    for story in stories {
        out.push_str(&format!(
            "\n## {}. {}\n\n",
            story.position, story.title
        ));
        out.push_str(&format!(
            "- Topic: {} | Sentiment: {} | Salience: {:.3}\n",
            story.summary.dominant_topic,
            story.summary.sentiment.as_str(),
            story.summary.salience
        ));
        out.push_str(&format!("- Link: {}\n", story.url));
        for highlight in &story.summary.highlights {
            out.push_str(&format!("- {highlight}\n"));
        }
    }
    out
}

fn render_plain(stories: &[RankedStory]) -> String {
    let mut out = String::from("DAILY DIGEST\n");
    if stories.is_empty() {
        out.push_str("\nNo stories matched your profile today.\n");
        return out;
    }
    for story in stories {
        out.push_str(&format!("\n{}. {}\n", story.position, story.title));
        out.push_str(&format!(
            "   topic={} sentiment={} salience={:.3}\n",
            story.summary.dominant_topic,
            story.summary.sentiment.as_str(),
            story.summary.salience
        ));
        out.push_str(&format!("   {}\n", story.url));
        for highlight in &story.summary.highlights {
            out.push_str(&format!("   * {highlight}\n"));
        }
    }
    out
}

/// Render the digest in the requested format. Only `markdown` and `plain`
/// are accepted; anything else is `InvalidFormat`. The rendered body is a
/// pure function of the stories, so identical inputs produce identical
/// bytes; the generation timestamp lives outside the body.
pub fn compile_digest(stories: &[RankedStory], format: &str) -> Result<Digest> {
    let rendered = match format {
        FORMAT_MARKDOWN => render_markdown(stories),
        FORMAT_PLAIN => render_plain(stories),
        other => {
            return Err(PipelineError::InvalidFormat(format!(
                "unknown digest format '{other}'"
            )))
        }
    };
    Ok(Digest {
        rendered,
        format: format.to_string(),
        item_count: stories.len(),
        generated_at: Utc::now().to_rfc3339(),
    })
}
