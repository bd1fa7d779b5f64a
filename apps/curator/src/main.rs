mod catalog;
mod config;
mod curation;
mod errors;
mod llm_client;
mod pipeline;
mod store;

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::loader::load_move_catalog;
use crate::config::Config;
use crate::curation::selector::MoveSelector;
use crate::llm_client::oracle::{
    ChatExtractor, ChatReasoner, ExtractionOracle, OfflineOracle, ReasoningOracle,
};
use crate::llm_client::LlmClient;
use crate::pipeline::{open_cache, run, RunOptions};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on bad values or a missing API key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.log_level
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting move curator v{}", env!("CARGO_PKG_VERSION"));

    let catalog = load_move_catalog(&config.metadata_path).await?;
    if catalog.is_empty() {
        warn!("Move metadata is empty; every entity will be curated with no moves");
    }
    let (reasoner, extractor) = build_oracles(&config)?;
    let selector = MoveSelector::new(reasoner, extractor, config.per_entity);

    let mut cache = open_cache(&config)?;
    run(&RunOptions::from(&config), &catalog, &selector, &mut cache).await?;

    Ok(())
}

/// Builds the two oracle collaborators. Offline mode swaps both for `OfflineOracle`.
fn build_oracles(
    config: &Config,
) -> Result<(Arc<dyn ReasoningOracle>, Arc<dyn ExtractionOracle>)> {
    let api_key = match (&config.api_key, config.offline) {
        (Some(key), false) => key.clone(),
        _ => {
            info!("Oracle disabled; every entity uses the ranked fallback");
            return Ok((Arc::new(OfflineOracle), Arc::new(OfflineOracle)));
        }
    };

    let llm = LlmClient::new(&config.base_url, api_key)?;
    info!(
        "LLM client initialized (reasoning: {}, extraction: {}, endpoint: {})",
        config.reasoning_model, config.extraction_model, config.base_url
    );

    Ok((
        Arc::new(ChatReasoner::new(llm.clone(), &config.reasoning_model)),
        Arc::new(ChatExtractor::new(llm, &config.extraction_model)),
    ))
}
