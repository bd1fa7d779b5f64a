use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::errors::CurateError;

/// Curator configuration loaded from environment variables.
/// Every knob has a default except the API key, which is required unless offline.
#[derive(Debug, Clone)]
pub struct Config {
    pub raw_dir: PathBuf,
    pub metadata_path: PathBuf,
    pub out_path: PathBuf,
    pub cache_path: PathBuf,
    pub start_id: u32,
    pub end_id: u32,
    /// Moves kept per entity (N).
    pub per_entity: usize,
    pub max_candidates: usize,
    /// Global shuffle seed. 0 disables shuffling.
    pub seed: u64,
    pub sleep: Duration,
    pub resume: bool,
    pub force: bool,
    pub offline: bool,
    pub base_url: String,
    pub reasoning_model: String,
    pub extraction_model: String,
    pub api_key: Option<String>,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            raw_dir: env_or("CURATE_RAW_DIR", "assets/api_data_raw_backup").into(),
            metadata_path: env_or("CURATE_METADATA", "tools/clean_data/metadata.json").into(),
            out_path: env_or("CURATE_OUT", "tools/clean_data/curated_moves.go").into(),
            cache_path: env_or(
                "CURATE_CACHE",
                "tools/curate_moves/curated_moves_cache.json",
            )
            .into(),
            start_id: parse_env("CURATE_START", 1)?,
            end_id: parse_env("CURATE_END", 1025)?,
            per_entity: parse_env("CURATE_PER_ENTITY", 4)?,
            max_candidates: parse_env("CURATE_MAX_CANDIDATES", 60)?,
            seed: parse_env("CURATE_SEED", 0)?,
            sleep: Duration::from_millis(parse_env("CURATE_SLEEP_MS", 250)?),
            resume: bool_env("CURATE_RESUME", true)?,
            force: bool_env("CURATE_FORCE", false)?,
            offline: bool_env("CURATE_OFFLINE", false)?,
            base_url: env_or("CURATE_BASE_URL", "https://opencode.ai/zen/v1"),
            reasoning_model: env_or("CURATE_REASONING_MODEL", "glm-4.7-free"),
            extraction_model: env_or("CURATE_EXTRACTION_MODEL", "gpt-5-nano"),
            api_key: first_non_empty(&["OPENCODE_API_KEY", "ZEN_API_KEY", "OPENAI_API_KEY"]),
            log_level: env_or("CURATE_LOG", "info"),
        };

        config.validate()?;
        Ok(config)
    }

    /// Rejects ranges and counts the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), CurateError> {
        if self.per_entity < 1 {
            return Err(CurateError::Config(
                "CURATE_PER_ENTITY must be >= 1".to_string(),
            ));
        }
        if self.max_candidates < 1 {
            return Err(CurateError::Config(
                "CURATE_MAX_CANDIDATES must be >= 1".to_string(),
            ));
        }
        if self.start_id < 1 || self.end_id < self.start_id {
            return Err(CurateError::Config(format!(
                "invalid range: start={} end={}",
                self.start_id, self.end_id
            )));
        }
        if !self.offline && self.api_key.is_none() {
            return Err(CurateError::Config(
                "missing API key: set OPENCODE_API_KEY (or ZEN_API_KEY / OPENAI_API_KEY), \
                 or set CURATE_OFFLINE=true"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        _ => Ok(default),
    }
}

fn bool_env(key: &str, default: bool) -> Result<bool> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => parse_bool(&raw)
            .with_context(|| format!("{key} must be a boolean (true/false/1/0/yes/no)")),
        _ => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn first_non_empty(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| std::env::var(k).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

#[cfg(test)]
pub(crate) fn test_config(dir: &std::path::Path) -> Config {
    Config {
        raw_dir: dir.join("raw"),
        metadata_path: dir.join("metadata.json"),
        out_path: dir.join("curated_moves.go"),
        cache_path: dir.join("cache").join("curated_moves_cache.json"),
        start_id: 1,
        end_id: 3,
        per_entity: 4,
        max_candidates: 60,
        seed: 0,
        sleep: Duration::ZERO,
        resume: true,
        force: false,
        offline: true,
        base_url: "http://localhost".to_string(),
        reasoning_model: "reasoner".to_string(),
        extraction_model: "extractor".to_string(),
        api_key: None,
        log_level: "debug".to_string(),
    }
}
