//! Curation run: walks the configured id range one entity at a time.
//!
//! Flow per id: load record → (skip if cached) → candidates → rank →
//!              optional shuffle → truncate → select → persist.
//! After the range: render the artifact from the full cache.
//!
//! Strictly sequential. Per-entity failures are logged and contained; only
//! storage failures propagate out of `run`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::catalog::loader::load_creature;
use crate::catalog::models::{Creature, MoveCatalog};
use crate::config::Config;
use crate::curation::candidates::candidate_moves;
use crate::curation::ranking::rank_candidates;
use crate::curation::selector::{MoveSelector, SelectionSource};
use crate::curation::shuffle::{entity_seed, seeded_shuffle};
use crate::errors::CurateError;
use crate::store::artifact::write_artifact;
use crate::store::cache::CurationCache;

/// Run-level knobs the loop needs, resolved from `Config`.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub raw_dir: PathBuf,
    pub out_path: PathBuf,
    pub start_id: u32,
    pub end_id: u32,
    pub max_candidates: usize,
    pub seed: u64,
    pub sleep: Duration,
    pub force: bool,
}

impl From<&Config> for RunOptions {
    fn from(config: &Config) -> Self {
        Self {
            raw_dir: config.raw_dir.clone(),
            out_path: config.out_path.clone(),
            start_id: config.start_id,
            end_id: config.end_id,
            max_candidates: config.max_candidates,
            seed: config.seed,
            sleep: config.sleep,
            force: config.force,
        }
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub skipped_cached: usize,
    pub missing: usize,
    pub empty: usize,
    pub fallbacks: usize,
}

/// Opens the cache for a run.
///
/// The prior snapshot is only loaded when resuming without force. A forced run
/// starts empty, so results for ids it does not rewrite are dropped.
pub fn open_cache(config: &Config) -> Result<CurationCache, CurateError> {
    if config.resume && !config.force {
        CurationCache::load(&config.cache_path)
    } else {
        info!(
            resume = config.resume,
            force = config.force,
            "Starting from an empty cache"
        );
        Ok(CurationCache::empty(&config.cache_path))
    }
}

/// Ranks, optionally shuffles, and truncates an entity's candidates.
pub fn prepare_candidates(
    creature: &Creature,
    candidates: &[String],
    catalog: &MoveCatalog,
    options: &RunOptions,
) -> Vec<String> {
    let mut ranked = rank_candidates(creature, candidates, catalog);
    if options.seed != 0 {
        seeded_shuffle(&mut ranked, entity_seed(options.seed, creature.id));
    }
    ranked.truncate(options.max_candidates);
    ranked
}

/// Processes every id in range, then writes the artifact.
pub async fn run(
    options: &RunOptions,
    catalog: &MoveCatalog,
    selector: &MoveSelector,
    cache: &mut CurationCache,
) -> Result<RunSummary, CurateError> {
    let mut summary = RunSummary::default();
    let mut names: HashMap<u32, String> = HashMap::new();

    info!(
        "Curating ids {}..={} (n={}, max_candidates={}, seed={}, force={}, cached={})",
        options.start_id,
        options.end_id,
        selector.per_entity(),
        options.max_candidates,
        options.seed,
        options.force,
        cache.len()
    );

    for id in options.start_id..=options.end_id {
        let creature = match load_creature(&options.raw_dir, id).await {
            Ok(c) => c,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!(id, "Skipping: {e}");
                summary.missing += 1;
                continue;
            }
        };
        names.insert(id, creature.name.clone());

        if !options.force {
            if let Some(existing) = cache.get(id) {
                debug!(
                    id,
                    name = %creature.name,
                    "Already curated ({} moves); skipping",
                    existing.len()
                );
                summary.skipped_cached += 1;
                continue;
            }
        }

        info!(id, name = %creature.name, "Processing");
        process_entity(&creature, options, catalog, selector, cache, &mut summary)
            .await
            .inspect_err(|e| error!(id, name = %creature.name, "Aborting run: {e}"))?;

        if !options.sleep.is_zero() {
            tokio::time::sleep(options.sleep).await;
        }
    }

    write_artifact(&options.out_path, cache.entries(), &names)
        .inspect_err(|e| error!("Aborting run: {e}"))?;

    info!(
        "Run complete: processed={}, cached={}, missing={}, empty={}, fallbacks={}",
        summary.processed,
        summary.skipped_cached,
        summary.missing,
        summary.empty,
        summary.fallbacks
    );
    Ok(summary)
}

async fn process_entity(
    creature: &Creature,
    options: &RunOptions,
    catalog: &MoveCatalog,
    selector: &MoveSelector,
    cache: &mut CurationCache,
    summary: &mut RunSummary,
) -> Result<(), CurateError> {
    summary.processed += 1;

    let candidates = candidate_moves(creature, catalog);
    if candidates.is_empty() {
        warn!(
            id = creature.id,
            name = %creature.name,
            "No candidate moves; leaving empty"
        );
        summary.empty += 1;
        return cache.put(creature.id, Vec::new());
    }

    let ranked = prepare_candidates(creature, &candidates, catalog, options);
    let selection = selector.select(creature, &ranked, catalog).await;
    match &selection.source {
        SelectionSource::Oracle { kept, topped_up } => info!(
            id = creature.id,
            name = %creature.name,
            "Curated via oracle ({kept} kept, {topped_up} topped up): {}",
            selection.moves.join(", ")
        ),
        SelectionSource::Fallback { reason } => {
            summary.fallbacks += 1;
            info!(
                id = creature.id,
                name = %creature.name,
                "Curated via ranked fallback ({reason}): {}",
                selection.moves.join(", ")
            )
        }
    }

    cache.put(creature.id, selection.moves)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
