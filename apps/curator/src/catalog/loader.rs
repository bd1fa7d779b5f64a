use std::path::{Path, PathBuf};

use tracing::info;

use crate::catalog::models::{Creature, MoveCatalog, RawCreature};
use crate::errors::CurateError;

/// Path of the raw record for `id` inside `raw_dir`.
pub fn record_path(raw_dir: &Path, id: u32) -> PathBuf {
    raw_dir.join(format!("pokemon_{id}.json"))
}

/// Loads one entity's raw record.
///
/// A missing file is `MissingInput`; unreadable JSON or a blank name is
/// `InvalidRecord`. A record carrying `id: 0` takes the requested id.
pub async fn load_creature(raw_dir: &Path, id: u32) -> Result<Creature, CurateError> {
    let path = record_path(raw_dir, id);

    let bytes = match tokio::fs::read(&path).await {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(CurateError::MissingInput { id, path });
        }
        Err(e) => {
            return Err(CurateError::InvalidRecord {
                path,
                reason: e.to_string(),
            });
        }
    };

    let raw: RawCreature =
        serde_json::from_slice(&bytes).map_err(|e| CurateError::InvalidRecord {
            path: path.clone(),
            reason: e.to_string(),
        })?;

    let mut creature = Creature::from(raw);
    if creature.id == 0 {
        creature.id = id;
    }
    if creature.name.is_empty() {
        return Err(CurateError::InvalidRecord {
            path,
            reason: "missing name".to_string(),
        });
    }

    Ok(creature)
}

/// Loads the shared move metadata mapping. Any failure here is fatal.
pub async fn load_move_catalog(path: &Path) -> Result<MoveCatalog, CurateError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| CurateError::Metadata {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let catalog: MoveCatalog =
        serde_json::from_slice(&bytes).map_err(|e| CurateError::Metadata {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    info!("Loaded metadata for {} moves from {}", catalog.len(), path.display());
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_record_is_missing_input() {
        let dir = tempdir().unwrap();
        let err = load_creature(dir.path(), 42).await.unwrap_err();
        assert!(matches!(err, CurateError::MissingInput { id: 42, .. }));
    }

    #[tokio::test]
    async fn test_zero_id_takes_requested_id() {
        let dir = tempdir().unwrap();
        std::fs::write(
            record_path(dir.path(), 9),
            r#"{"id": 0, "name": "blastoise", "types": [], "stats": [], "moves": []}"#,
        )
        .unwrap();

        let creature = load_creature(dir.path(), 9).await.unwrap();
        assert_eq!(creature.id, 9);
        assert_eq!(creature.name, "blastoise");
    }

    #[tokio::test]
    async fn test_blank_name_is_invalid() {
        let dir = tempdir().unwrap();
        std::fs::write(record_path(dir.path(), 3), r#"{"id": 3, "name": "  "}"#).unwrap();

        let err = load_creature(dir.path(), 3).await.unwrap_err();
        assert!(matches!(err, CurateError::InvalidRecord { .. }));
    }

    #[tokio::test]
    async fn test_malformed_metadata_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        std::fs::write(&path, "not json").unwrap();

        let err = load_move_catalog(&path).await.unwrap_err();
        assert!(err.is_fatal());
    }
}
