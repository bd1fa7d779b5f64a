use std::path::PathBuf;

use thiserror::Error;

/// Curator-level error type.
///
/// Only storage, metadata and configuration failures are allowed to end a run.
/// The per-entity variants are contained by the pipeline loop, which logs
/// them and moves on to the next id.
#[derive(Debug, Error)]
pub enum CurateError {
    #[error("No raw record for entity {id} at {}", path.display())]
    MissingInput { id: u32, path: PathBuf },

    #[error("Invalid raw record at {}: {reason}", path.display())]
    InvalidRecord { path: PathBuf, reason: String },

    #[error("Failed to load move metadata from {}: {reason}", path.display())]
    Metadata { path: PathBuf, reason: String },

    #[error("Curation cache at {} is unreadable: {reason}", path.display())]
    CacheFormat { path: PathBuf, reason: String },

    #[error("Failed to persist {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CurateError {
    /// True for failures that must terminate the run instead of skipping an entity.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CurateError::Persistence { .. }
                | CurateError::CacheFormat { .. }
                | CurateError::Metadata { .. }
                | CurateError::Config(_)
        )
    }

    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CurateError::Persistence {
            path: path.into(),
            source,
        }
    }
}
