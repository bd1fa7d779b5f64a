//! Selection Orchestrator: oracle-assisted pick with strict post-validation.
//!
//! Flow: build prompt → reasoning oracle → extraction oracle →
//!       retain candidates → top-up from rank → final validation.
//!
//! Any oracle failure is contained here: the entity falls back to the first N
//! ranked candidates and the run carries on. The oracle is never re-invoked.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::catalog::models::{Creature, MoveCatalog};
use crate::curation::prompts::{SELECTION_PROMPT_TEMPLATE, SELECTION_SYSTEM};
use crate::curation::validation::{fallback_top_n, finalize_moves, retain_candidates, top_up};
use crate::llm_client::oracle::{ExtractionOracle, ReasoningOracle};
use crate::llm_client::{truncate, LlmError};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Which path produced a curated result.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionSource {
    /// The oracle answered; `kept` picks survived validation and `topped_up`
    /// ranked candidates were appended to reach N.
    Oracle { kept: usize, topped_up: usize },
    /// The oracle failed; the result is the ranked prefix.
    Fallback { reason: String },
}

/// A validated curated result for one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub moves: Vec<String>,
    pub source: SelectionSource,
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

pub struct MoveSelector {
    reasoner: Arc<dyn ReasoningOracle>,
    extractor: Arc<dyn ExtractionOracle>,
    per_entity: usize,
}

impl MoveSelector {
    pub fn new(
        reasoner: Arc<dyn ReasoningOracle>,
        extractor: Arc<dyn ExtractionOracle>,
        per_entity: usize,
    ) -> Self {
        Self {
            reasoner,
            extractor,
            per_entity,
        }
    }

    pub fn per_entity(&self) -> usize {
        self.per_entity
    }

    /// Produces the curated result for one entity from its ranked candidates.
    ///
    /// Never fails: oracle errors degrade to the ranked fallback. The returned
    /// list holds at most N unique names, all referenced by the entity and
    /// present in the metadata mapping.
    pub async fn select(
        &self,
        creature: &Creature,
        ranked: &[String],
        catalog: &MoveCatalog,
    ) -> Selection {
        let n = self.per_entity;

        let (proposed, oracle_kept) = match self.ask_oracle(creature, ranked, catalog).await {
            Ok(picked) => {
                let kept = retain_candidates(&picked, ranked);
                debug!(
                    id = creature.id,
                    name = %creature.name,
                    "Oracle picked [{}]; {} survived validation",
                    picked.join(", "),
                    kept.len()
                );
                (top_up(kept.clone(), ranked, n), Ok(kept))
            }
            Err(e) => {
                warn!(
                    id = creature.id,
                    name = %creature.name,
                    "Oracle selection failed: {e}. Using ranked fallback."
                );
                (fallback_top_n(ranked, n), Err(e.to_string()))
            }
        };

        let moves = finalize_moves(creature, &proposed, catalog, n);
        if moves.is_empty() && !ranked.is_empty() {
            warn!(
                id = creature.id,
                name = %creature.name,
                "Validation left no moves; using ranked fallback"
            );
            return Selection {
                moves: finalize_moves(creature, &fallback_top_n(ranked, n), catalog, n),
                source: SelectionSource::Fallback {
                    reason: "validation left no moves".to_string(),
                },
            };
        }

        // Counts describe the final list, not the pre-validation proposal.
        let source = match oracle_kept {
            Ok(kept) => {
                let kept_count = moves.iter().filter(|m| kept.contains(m)).count();
                SelectionSource::Oracle {
                    kept: kept_count,
                    topped_up: moves.len() - kept_count,
                }
            }
            Err(reason) => SelectionSource::Fallback { reason },
        };

        Selection { moves, source }
    }

    /// Runs both oracle calls. Either failing fails the whole attempt.
    async fn ask_oracle(
        &self,
        creature: &Creature,
        ranked: &[String],
        catalog: &MoveCatalog,
    ) -> Result<Vec<String>, LlmError> {
        let prompt = build_selection_prompt(creature, ranked, catalog, self.per_entity);

        let reasoning = self.reasoner.reason(SELECTION_SYSTEM, &prompt).await?;
        debug!(
            id = creature.id,
            name = %creature.name,
            "Oracle reasoning: {}",
            truncate(&reasoning, 2000)
        );

        self.extractor
            .extract_moves(&reasoning, self.per_entity)
            .await
    }
}

/// Fills the selection template with the entity description and candidate listing.
pub fn build_selection_prompt(
    creature: &Creature,
    ranked: &[String],
    catalog: &MoveCatalog,
    n: usize,
) -> String {
    let stats = &creature.stats;
    let stats_line = format!(
        "hp={} atk={} def={} sp_atk={} sp_def={} speed={}",
        stats.hp,
        stats.attack,
        stats.defense,
        stats.special_attack,
        stats.special_defense,
        stats.speed
    );

    let candidates = ranked
        .iter()
        .filter_map(|name| {
            catalog.get(name).map(|meta| {
                format!(
                    "- {} ({}, power={}, class={})",
                    name,
                    meta.move_type,
                    meta.power,
                    meta.damage_class.as_str()
                )
            })
        })
        .collect::<Vec<_>>()
        .join("\n");

    SELECTION_PROMPT_TEMPLATE
        .replace("{name}", &creature.name)
        .replace("{id}", &creature.id.to_string())
        .replace("{types}", &creature.types.join(", "))
        .replace("{stats}", &stats_line)
        .replace("{n}", &n.to_string())
        .replace("{candidates}", &candidates)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
