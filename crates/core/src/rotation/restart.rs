//! Persisted rotation index.
//!
//! The restart file holds a single line: the decimal index last handed out.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::RotationCursor;
use crate::Error;
use crate::cache::write_atomic;

#[derive(Debug, Clone)]
pub struct RestartFile {
    path: PathBuf,
}

impl RestartFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Restore `cursor` from disk.
    ///
    /// A missing or unreadable file leaves the cursor unset.
    pub fn restore_into(&self, cursor: &RotationCursor) {
        match fs::read_to_string(&self.path) {
            Ok(text) => cursor.restore(&text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => cursor.reset(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cannot read restart index");
                cursor.reset();
            }
        }
        tracing::info!(index = %cursor.snapshot(), "restarting at index {}", cursor.snapshot());
    }

    /// Write the cursor's position to disk.
    ///
    /// # Errors
    ///
    /// Returns `Error::RestartIo` if the file cannot be written.
    pub fn save(&self, cursor: &RotationCursor) -> Result<(), Error> {
        let snapshot = cursor.snapshot();
        write_atomic(&self.path, snapshot.as_bytes())
            .map_err(|e| Error::RestartIo(format!("{}: {e}", self.path.display())))?;
        tracing::info!(index = %snapshot, "stopping at index {snapshot}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_restore() {
        let dir = tempfile::tempdir().unwrap();
        let restart = RestartFile::new(dir.path().join("snrfilter-index"));

        let cursor = RotationCursor::new();
        cursor.advance(5);
        cursor.advance(5);
        restart.save(&cursor).unwrap();
        assert_eq!(fs::read_to_string(restart.path()).unwrap(), "1");

        let restored = RotationCursor::new();
        restart.restore_into(&restored);
        assert_eq!(restored.position(), Some(1));
        assert_eq!(restored.advance(5), Some(2));
    }

    #[test]
    fn test_restore_missing_file_is_unset() {
        let dir = tempfile::tempdir().unwrap();
        let restart = RestartFile::new(dir.path().join("absent"));

        let cursor = RotationCursor::new();
        cursor.restore("3");
        restart.restore_into(&cursor);
        assert_eq!(cursor.position(), None);
    }

    #[test]
    fn test_restore_garbage_is_unset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snrfilter-index");
        fs::write(&path, "not a number").unwrap();

        let cursor = RotationCursor::new();
        RestartFile::new(path).restore_into(&cursor);
        assert_eq!(cursor.advance(4), Some(0));
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let restart = RestartFile::new(dir.path().join("no/such/dir/index"));
        std::fs::write(dir.path().join("no"), "file, not dir").unwrap();

        let result = restart.save(&RotationCursor::new());
        assert!(matches!(result, Err(Error::RestartIo(_))));
    }
}
