//! Curation Cache: per-entity results persisted as one JSON snapshot.
//!
//! Every `put` is followed by a full `save`, so an interrupted run loses at
//! most the entity in flight. Snapshots are written to a sibling temp file and
//! renamed into place; readers never observe a half-written cache.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::catalog::models::CuratedMap;
use crate::errors::CurateError;
use crate::store::write_atomic;

pub struct CurationCache {
    path: PathBuf,
    entries: CuratedMap,
}

impl CurationCache {
    /// An empty cache that will persist to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: CuratedMap::new(),
        }
    }

    /// Loads the snapshot at `path`, or starts empty if there is none.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, CurateError> {
        let path = path.into();

        let text = match std::fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No curation cache at {}; starting empty", path.display());
                return Ok(Self::empty(path));
            }
            Err(e) => {
                return Err(CurateError::CacheFormat {
                    path,
                    reason: e.to_string(),
                })
            }
        };

        let entries: CuratedMap =
            serde_json::from_str(&text).map_err(|e| CurateError::CacheFormat {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        info!(
            "Loaded curation cache with {} entries from {}",
            entries.len(),
            path.display()
        );
        Ok(Self { path, entries })
    }

    pub fn get(&self, id: u32) -> Option<&[String]> {
        self.entries.get(&id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &CuratedMap {
        &self.entries
    }

    /// Inserts or overwrites one entity's result, then persists the full snapshot.
    pub fn put(&mut self, id: u32, moves: Vec<String>) -> Result<(), CurateError> {
        self.entries.insert(id, moves);
        self.save()
    }

    /// Writes the complete mapping, replacing any previous snapshot.
    pub fn save(&self) -> Result<(), CurateError> {
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| CurateError::persistence(&self.path, e.into()))?;

        write_atomic(&self.path, json.as_bytes())?;

        debug!("Saved {} cache entries to {}", self.entries.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn moves(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = tempdir().unwrap();
        let cache = CurationCache::load(dir.path().join("none.json")).unwrap();
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_put_persists_immediately() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.json");

        let mut cache = CurationCache::empty(&path);
        cache.put(25, moves(&["thunderbolt", "quick-attack"])).unwrap();
        assert!(path.exists());

        let reloaded = CurationCache::load(&path).unwrap();
        assert_eq!(
            reloaded.get(25),
            Some(&["thunderbolt".to_string(), "quick-attack".to_string()][..])
        );
    }

    #[test]
    fn test_put_overwrites_entry() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let mut cache = CurationCache::empty(&path);
        cache.put(1, moves(&["tackle"])).unwrap();
        cache.put(1, moves(&["vine-whip"])).unwrap();

        let reloaded = CurationCache::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.get(1), Some(&["vine-whip".to_string()][..]));
    }

    #[test]
    fn test_empty_result_is_a_real_entry() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let mut cache = CurationCache::empty(&path);
        cache.put(132, Vec::new()).unwrap();

        let reloaded = CurationCache::load(&path).unwrap();
        assert_eq!(reloaded.get(132), Some(&[][..]));
    }

    #[test]
    fn test_snapshot_is_sorted_by_numeric_id() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let mut cache = CurationCache::empty(&path);
        cache.put(10, moves(&["b"])).unwrap();
        cache.put(2, moves(&["a"])).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.find("\"2\"").unwrap() < text.find("\"10\"").unwrap());
    }

    #[test]
    fn test_malformed_cache_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = CurationCache::load(&path).err().unwrap();
        assert!(err.is_fatal());
    }
}
