//! Ranking Engine: fixed numeric heuristic over candidate moves.
//!
//! No LLM calls. The output is a total order: descending score, then ascending
//! move name, so the result never depends on input order or sort stability.

use std::cmp::Ordering;

use crate::catalog::models::{Creature, DamageClass, MoveCatalog, MoveMeta};

/// Bonus for a move sharing one of the entity's types (same-type attack bonus).
const STAB_BONUS: f64 = 20.0;
/// Power above this contributes nothing extra.
const POWER_CAP: u32 = 120;
const POWER_DIVISOR: f64 = 5.0;
const DAMAGING_BONUS: f64 = 5.0;
const STATUS_BONUS: f64 = 1.0;

/// A candidate paired with its heuristic score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMove {
    pub name: String,
    pub score: f64,
}

/// Scores a single move for an entity.
///
/// score = 20·[type ∈ entity types] + min(power, 120)/5·[power > 0]
///       + 5·[physical | special] + 1·[status]
pub fn score_move(creature: &Creature, meta: &MoveMeta) -> f64 {
    let mut score = 0.0;

    if creature.has_type(&meta.move_type) {
        score += STAB_BONUS;
    }
    if meta.power > 0 {
        score += f64::from(meta.power.min(POWER_CAP)) / POWER_DIVISOR;
    }
    score += match meta.damage_class {
        DamageClass::Physical | DamageClass::Special => DAMAGING_BONUS,
        DamageClass::Status => STATUS_BONUS,
        DamageClass::Unknown => 0.0,
    };

    score
}

/// Scores every candidate and returns them in ranked order.
/// Candidates missing from the metadata mapping are dropped.
pub fn score_candidates(
    creature: &Creature,
    candidates: &[String],
    catalog: &MoveCatalog,
) -> Vec<ScoredMove> {
    let mut scored: Vec<ScoredMove> = candidates
        .iter()
        .filter_map(|name| {
            catalog.get(name).map(|meta| ScoredMove {
                name: name.clone(),
                score: score_move(creature, meta),
            })
        })
        .collect();

    scored.sort_by(compare_ranked);
    scored
}

/// Convenience wrapper returning only the ranked names.
pub fn rank_candidates(
    creature: &Creature,
    candidates: &[String],
    catalog: &MoveCatalog,
) -> Vec<String> {
    score_candidates(creature, candidates, catalog)
        .into_iter()
        .map(|s| s.name)
        .collect()
}

/// Descending score, ties broken by ascending byte order of the name.
fn compare_ranked(a: &ScoredMove, b: &ScoredMove) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.name.as_bytes().cmp(b.name.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curation::fixtures::{catalog, creature, names};

    #[test]
    fn test_scores_match_heuristic() {
        let c = creature(4, &["fire"], &[]);
        let cat = catalog();
        assert_eq!(score_move(&c, cat.get("flamethrower").unwrap()), 43.0);
        assert_eq!(score_move(&c, cat.get("tackle").unwrap()), 13.0);
        assert_eq!(score_move(&c, cat.get("growl").unwrap()), 1.0);
    }

    #[test]
    fn test_power_is_capped_and_real_valued() {
        let c = creature(4, &["water"], &[]);
        let cat = catalog();
        // hyper-beam: power 150 → capped at 120 → 24 + 5
        assert_eq!(score_move(&c, cat.get("hyper-beam").unwrap()), 29.0);
        // odd-jab: power 42 → 8.4 + 5, not truncated
        let quick = score_move(&c, cat.get("odd-jab").unwrap());
        assert!((quick - 13.4).abs() < 1e-9, "got {quick}");
    }

    #[test]
    fn test_ranked_order_for_fire_entity() {
        let c = creature(4, &["fire"], &[]);
        let ranked = rank_candidates(&c, &names(&["growl", "tackle", "flamethrower"]), &catalog());
        assert_eq!(ranked, vec!["flamethrower", "tackle", "growl"]);
    }

    #[test]
    fn test_ties_break_by_ascending_name() {
        let c = creature(1, &["grass"], &[]);
        // tackle and pound are both normal/40/physical → 13.0
        let forward = rank_candidates(&c, &names(&["tackle", "pound"]), &catalog());
        let backward = rank_candidates(&c, &names(&["pound", "tackle"]), &catalog());
        assert_eq!(forward, vec!["pound", "tackle"]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_ranking_is_pure() {
        let c = creature(6, &["fire", "flying"], &[]);
        let input = names(&["wing-attack", "growl", "tackle", "flamethrower", "pound"]);
        let first = rank_candidates(&c, &input, &catalog());
        let second = rank_candidates(&c, &input, &catalog());
        assert_eq!(first, second);
        assert_eq!(first[0], "flamethrower");
    }
}
