//! Entity tagger: majority vote over the coarse kind guesses.

use crate::types::{EntityKind, ResolvedEntity, TaggedEntity};

/// Assign a category to each resolved entity: majority vote over its kind
/// guesses, ties broken by person > org > location > unknown. Confidence is
/// winning votes / total votes.
pub fn tag_entities(resolved: Vec<ResolvedEntity>) -> Vec<TaggedEntity> {
    resolved
        .into_iter()
        .map(|entity| {
            let (category, confidence) = vote(&entity.kind_votes);
            TaggedEntity {
                entity,
                category,
                confidence,
            }
        })
        .collect()
}

fn vote(votes: &[EntityKind]) -> (EntityKind, f64) {
    if votes.is_empty() {
        return (EntityKind::Unknown, 0.0);
    }

    let candidates = [
        EntityKind::Person,
        EntityKind::Org,
        EntityKind::Location,
        EntityKind::Unknown,
    ];
    let winner = candidates
        .into_iter()
        .max_by_key(|kind| {
            let count = votes.iter().filter(|v| **v == *kind).count();
            (count, kind.priority())
        })
        .expect("non-empty candidate list");

    let wins = votes.iter().filter(|v| **v == winner).count();
    (winner, wins as f64 / votes.len() as f64)
}
