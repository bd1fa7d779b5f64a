use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::errors::CurateError;

pub mod artifact;
pub mod cache;

/// Mode for every file the curator writes. Temp files start out as 0600.
#[cfg(unix)]
const OUTPUT_MODE: u32 = 0o644;

/// Replaces `path` with `bytes` via a temp file in the same directory and a rename.
/// Parent directories are created as needed.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CurateError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|e| CurateError::persistence(&dir, e))?;

    let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| CurateError::persistence(&dir, e))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| CurateError::persistence(path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(OUTPUT_MODE))
            .map_err(|e| CurateError::persistence(path, e))?;
    }

    tmp.persist(path)
        .map_err(|e| CurateError::persistence(path, e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_atomic_replaces_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a").join("b.txt");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_leaves_world_readable_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("curated_moves.go");
        write_atomic(&path, b"package main\n").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_write_atomic_reports_unwritable_target() {
        let dir = tempdir().unwrap();
        // A directory cannot be replaced by a file.
        let target = dir.path().join("occupied");
        std::fs::create_dir_all(target.join("child")).unwrap();

        let err = write_atomic(&target, b"data").unwrap_err();
        assert!(err.is_fatal());
    }
}
