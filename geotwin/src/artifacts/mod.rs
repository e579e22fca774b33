//! Content-addressed artifact persistence.
//!
//! Stages may persist auxiliary outputs (the geological summary, rendered
//! views) as a side effect; the reference to the written file is part of the
//! stage's `Success` output, never a hidden side channel. File names embed a
//! digest of the content, so identical content from any session maps to the
//! same file and concurrent sessions cannot collide on names.

use crate::errors::CollaboratorError;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Length of the hex digest prefix embedded in artifact file names.
const DIGEST_PREFIX_LEN: usize = 16;

/// Reference to a persisted artifact, stored in session state.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ArtifactRef {
    /// Path of the written file.
    pub path: String,
    /// Hex digest prefix identifying the content.
    pub digest: String,
}

/// Writes artifacts into a shared output directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Creates a store rooted at the given directory.
    ///
    /// The directory is created lazily on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persists a JSON document under `<stem>-<digest>.json`.
    ///
    /// Writing the same content twice is idempotent: the digest matches, the
    /// existing file is reused, and the returned reference is identical.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] when serialization or the filesystem
    /// write fails.
    pub fn write_json(
        &self,
        stem: &str,
        value: &serde_json::Value,
    ) -> Result<ArtifactRef, CollaboratorError> {
        let body = serde_json::to_vec_pretty(value)?;
        let digest = hex::encode(Sha256::digest(&body));
        let short = digest[..DIGEST_PREFIX_LEN].to_string();

        fs::create_dir_all(&self.root)?;
        let path = self.root.join(format!("{stem}-{short}.json"));
        if !path.exists() {
            fs::write(&path, &body)?;
        }

        Ok(ArtifactRef {
            path: path.display().to_string(),
            digest: short,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_write_json_creates_file_with_digest_name() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());

        let artifact = store
            .write_json("geo-model", &json!({"formations": ["Sand", "Clay"]}))
            .unwrap();

        assert!(Path::new(&artifact.path).exists());
        assert!(artifact.path.ends_with(&format!("{}.json", artifact.digest)));
        assert_eq!(artifact.digest.len(), DIGEST_PREFIX_LEN);

        let body = fs::read_to_string(&artifact.path).unwrap();
        let round: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(round["formations"][0], "Sand");
    }

    #[test]
    fn test_same_content_reuses_same_path() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        let value = json!({"extent": [0, 10]});

        let first = store.write_json("geo-model", &value).unwrap();
        let second = store.write_json("geo-model", &value).unwrap();
        assert_eq!(first, second);

        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_different_content_gets_distinct_paths() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());

        let first = store.write_json("geo-model", &json!({"n": 1})).unwrap();
        let second = store.write_json("geo-model", &json!({"n": 2})).unwrap();
        assert_ne!(first.path, second.path);
    }
}
