//! Demo user-profile store backing the ranking stage.
//!
//! Profiles are a fixed in-memory table; unknown ids get a generic default so
//! the demo pipeline never fails on a missing profile.

use crate::types::{Sentiment, UserProfile};

/// Return the profile for `user_id`, or a generic default.
pub fn get_user_profile(user_id: &str) -> UserProfile {
    match user_id {
        "demo-user" => UserProfile {
            user_id: user_id.to_string(),
            preferred_topics: vec!["technology".into(), "climate".into()],
            preferred_sentiment: Some(Sentiment::Positive),
            priority_entities: vec!["OpenAI".into()],
            blocked_sources: vec!["fake-news.com".into()],
            favourite_sources: vec!["Metro Daily".into()],
        },
        "civic-reader" => UserProfile {
            user_id: user_id.to_string(),
            preferred_topics: vec!["civic".into()],
            preferred_sentiment: None,
            priority_entities: vec!["Jamie Rivera".into()],
            blocked_sources: Vec::new(),
            favourite_sources: Vec::new(),
        },
        other => UserProfile {
            user_id: other.to_string(),
            preferred_topics: vec!["general".into()],
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_user_has_preferences() {
        let p = get_user_profile("demo-user");
        assert!(p.preferred_topics.contains(&"technology".to_string()));
        assert_eq!(p.preferred_sentiment, Some(Sentiment::Positive));
    }

    #[test]
    fn unknown_user_gets_default() {
        let p = get_user_profile("somebody-else");
        assert_eq!(p.user_id, "somebody-else");
        assert_eq!(p.preferred_topics, vec!["general".to_string()]);
        assert!(p.blocked_sources.is_empty());
    }
}
