//! Hard constraints applied to every curated result, whichever path produced it.

use std::collections::HashSet;

use crate::catalog::models::{Creature, MoveCatalog};

/// Keeps oracle picks that appear in the candidate list, in pick order.
/// Repeated picks collapse onto their first occurrence.
pub fn retain_candidates(picked: &[String], candidates: &[String]) -> Vec<String> {
    let allowed: HashSet<&str> = candidates.iter().map(String::as_str).collect();
    let mut seen: HashSet<&str> = HashSet::new();

    picked
        .iter()
        .map(String::as_str)
        .filter(|name| allowed.contains(name) && seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Appends ranked candidates not yet selected until `n` entries or the list runs out.
pub fn top_up(mut selected: Vec<String>, ranked: &[String], n: usize) -> Vec<String> {
    for name in ranked {
        if selected.len() >= n {
            break;
        }
        if !selected.contains(name) {
            selected.push(name.clone());
        }
    }
    selected
}

/// The deterministic answer: the first `n` ranked candidates.
pub fn fallback_top_n(ranked: &[String], n: usize) -> Vec<String> {
    ranked.iter().take(n).cloned().collect()
}

/// Final acceptance pass before a result reaches the cache.
///
/// Trims names, drops blanks and repeats, and keeps only names the entity
/// references that also have metadata. The result is cut to `n`.
pub fn finalize_moves(
    creature: &Creature,
    moves: &[String],
    catalog: &MoveCatalog,
    n: usize,
) -> Vec<String> {
    let references: HashSet<&str> = creature.moves.iter().map(|m| m.trim()).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::with_capacity(n.min(moves.len()));

    for name in moves {
        let name = name.trim();
        if name.is_empty() || !seen.insert(name) {
            continue;
        }
        if !references.contains(name) || !catalog.contains(name) {
            continue;
        }
        out.push(name.to_string());
    }

    out.truncate(n);
    out
}
