//! Candidate extraction: the moves an entity can actually be curated from.

use std::collections::HashSet;

use crate::catalog::models::{Creature, MoveCatalog};

/// Returns the entity's move references, deduplicated in first-seen order and
/// restricted to names present in the metadata mapping.
pub fn candidate_moves(creature: &Creature, catalog: &MoveCatalog) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(creature.moves.len());
    let mut out = Vec::with_capacity(creature.moves.len());

    for name in &creature.moves {
        let name = name.trim();
        if name.is_empty() || !seen.insert(name) {
            continue;
        }
        if catalog.contains(name) {
            out.push(name.to_string());
        }
    }

    out
}
