pub mod manifest;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::types::identifiers::ContentDigest;
pub use manifest::{InputFile, SelectionManifest};

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// File contents written next to their destination, not yet visible there.
///
/// Dropping an uncommitted stage removes the temp file, so a failed run
/// leaves nothing behind.
#[derive(Debug)]
pub struct StagedFile {
    temp: PathBuf,
    dest: PathBuf,
    digest: ContentDigest,
    committed: bool,
}

impl StagedFile {
    pub fn stage(dest: &Path, contents: &[u8]) -> Result<Self, OutputError> {
        let digest = ContentDigest::from_content(contents);
        let io_err = |source| OutputError::Io {
            path: dest.to_path_buf(),
            source,
        };

        let file_name = dest
            .file_name()
            .ok_or_else(|| io_err(std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a file path")))?
            .to_string_lossy();
        // Same directory, so the final rename stays on one filesystem
        let temp = dest.with_file_name(format!(".{}.tmp.{}", file_name, digest.short()));

        let stage = StagedFile {
            temp,
            dest: dest.to_path_buf(),
            digest,
            committed: false,
        };

        let mut f = fs::File::create(&stage.temp).map_err(io_err)?;
        f.write_all(contents).map_err(io_err)?;
        f.sync_all().map_err(io_err)?;

        debug!(temp = %stage.temp.display(), "staged output");
        Ok(stage)
    }

    pub fn digest(&self) -> &ContentDigest {
        &self.digest
    }

    pub fn commit(mut self) -> Result<ContentDigest, OutputError> {
        fs::rename(&self.temp, &self.dest).map_err(|source| OutputError::Io {
            path: self.dest.clone(),
            source,
        })?;
        self.committed = true;
        Ok(self.digest.clone())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.temp);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn commit_publishes_and_cleans_up() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("selection.txt");

        let digest = StagedFile::stage(&dest, b"a\nb\n").unwrap().commit().unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"a\nb\n");
        assert_eq!(digest, ContentDigest::from_content(b"a\nb\n"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn dropped_stage_leaves_nothing() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("selection.txt");

        let stage = StagedFile::stage(&dest, b"a\n").unwrap();
        drop(stage);

        assert!(!dest.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn commit_onto_a_directory_fails_and_cleans_up() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("selection.txt");
        fs::create_dir(&dest).unwrap();

        let stage = StagedFile::stage(&dest, b"a\n").unwrap();
        assert!(matches!(stage.commit(), Err(OutputError::Io { .. })));
        assert!(dest.is_dir());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("missing").join("selection.txt");
        assert!(matches!(StagedFile::stage(&dest, b"a\n"), Err(OutputError::Io { .. })));
    }
}
