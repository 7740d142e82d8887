//! Entity disambiguator: merges surface-form variants into canonical
//! identities with a union-find over raw-entity indices.
//!
//! Equivalence between two normalized surface forms:
//! 1. exact match;
//! 2. same group in the explicit alias table (abbreviations such as
//!    "U.N." / "United Nations" merge only through the table);
//! 3. token-boundary containment (all tokens of the shorter form appear in
//!    the longer one, e.g. "Rivera" in "Jamie Rivera");
//! 4. token-set Jaccard overlap above 0.5;
//! 5. normalized Levenshtein similarity above 0.85 (spelling variants).
//!
//! Merging is transitive via the union-find, and grouping depends only on
//! the input sequence: entities are processed in input order and ties are
//! broken by first-seen order.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use strsim::normalized_levenshtein;

use crate::pipeline::tokenize;
use crate::types::{RawEntity, ResolvedEntity};

const JACCARD_THRESHOLD: f64 = 0.5;
const LEVENSHTEIN_THRESHOLD: f64 = 0.85;

/// Alias table: normalized form → group index. Abbreviation matching is
/// intentionally table-driven, not heuristic.
static ALIAS_GROUPS: Lazy<HashMap<String, usize>> = Lazy::new(|| {
    let raw = include_str!("../../resources/entity_aliases.json");
    let groups: Vec<Vec<String>> = serde_json::from_str(raw).expect("valid alias table");
    let mut map = HashMap::new();
    for (idx, group) in groups.iter().enumerate() {
        for form in group {
            map.insert(normalize(form), idx);
        }
    }
    map
});

/// Lowercase, strip periods and possessives, collapse whitespace.
pub fn normalize(surface: &str) -> String {
    let lowered = surface.to_ascii_lowercase();
    let stripped = lowered.trim_end_matches("'s");
    stripped
        .chars()
        .filter(|c| *c != '.' && *c != '\'')
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, i: usize) -> usize {
        if self.parent[i] != i {
            let root = self.find(self.parent[i]);
            self.parent[i] = root;
        }
        self.parent[i]
    }

    /// The earlier index always wins as root, keeping first-seen order.
    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        let (keep, fold) = if ra < rb { (ra, rb) } else { (rb, ra) };
        self.parent[fold] = keep;
    }
}

fn token_set(normalized: &str) -> HashSet<String> {
    tokenize(normalized).into_iter().collect()
}

fn same_alias_group(a: &str, b: &str) -> bool {
    matches!(
        (ALIAS_GROUPS.get(a), ALIAS_GROUPS.get(b)),
        (Some(ga), Some(gb)) if ga == gb
    )
}

fn contained(shorter: &HashSet<String>, longer: &HashSet<String>) -> bool {
    !shorter.is_empty() && shorter.is_subset(longer)
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let inter = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        inter as f64 / union as f64
    }
}

fn equivalent(a: &str, b: &str, ta: &HashSet<String>, tb: &HashSet<String>) -> bool {
    if a == b || same_alias_group(a, b) {
        return true;
    }
    if contained(ta, tb) || contained(tb, ta) {
        return true;
    }
    if jaccard(ta, tb) > JACCARD_THRESHOLD {
        return true;
    }
    normalized_levenshtein(a, b) > LEVENSHTEIN_THRESHOLD
}

/// Group raw entities into canonical identities. Every input entity lands in
/// exactly one output group; `canonical_id`s are assigned in the order groups
/// are first seen (`ent-0`, `ent-1`, ...).
pub fn disambiguate_entities(entities: &[RawEntity]) -> Vec<ResolvedEntity> {
    let normalized: Vec<String> = entities.iter().map(|e| normalize(&e.surface)).collect();
    let tokens: Vec<HashSet<String>> = normalized.iter().map(|n| token_set(n)).collect();

    let mut sets = DisjointSet::new(entities.len());
    for i in 0..entities.len() {
        for j in (i + 1)..entities.len() {
            if equivalent(&normalized[i], &normalized[j], &tokens[i], &tokens[j]) {
                sets.union(i, j);
            }
        }
    }

    // Collect members per root, in input order.
    let mut group_order: Vec<usize> = Vec::new();
    let mut members: HashMap<usize, Vec<usize>> = HashMap::new();
    for i in 0..entities.len() {
        let root = sets.find(i);
        members.entry(root).or_insert_with(|| {
            group_order.push(root);
            Vec::new()
        });
        members.get_mut(&root).expect("group just inserted").push(i);
    }

    group_order
        .iter()
        .enumerate()
        .map(|(n, root)| build_resolved(n, &members[root], entities))
        .collect()
}

fn build_resolved(ordinal: usize, member_idxs: &[usize], entities: &[RawEntity]) -> ResolvedEntity {
    // Most frequent surface form; ties -> longest, then first-seen.
    let mut counts: Vec<(String, usize, usize)> = Vec::new(); // (surface, count, first_idx)
    for &i in member_idxs {
        let surface = &entities[i].surface;
        match counts.iter_mut().find(|(s, _, _)| s == surface) {
            Some((_, count, _)) => *count += 1,
            None => counts.push((surface.clone(), 1, i)),
        }
    }
    let canonical_name = counts
        .iter()
        .max_by(|(sa, ca, fa), (sb, cb, fb)| {
            ca.cmp(cb)
                .then(sa.len().cmp(&sb.len()))
                .then(fb.cmp(fa)) // lower first-seen index wins
        })
        .map(|(s, _, _)| s.clone())
        .unwrap_or_default();

    let mut surface_forms = Vec::new();
    let mut passage_ids = Vec::new();
    let mut kind_votes = Vec::new();
    for &i in member_idxs {
        let e = &entities[i];
        if !surface_forms.contains(&e.surface) {
            surface_forms.push(e.surface.clone());
        }
        if !passage_ids.contains(&e.passage_id) {
            passage_ids.push(e.passage_id.clone());
        }
        kind_votes.push(e.kind);
    }

    ResolvedEntity {
        canonical_id: format!("ent-{ordinal}"),
        canonical_name,
        surface_forms,
        passage_ids,
        kind_votes,
        mentions: member_idxs.len(),
    }
}
