//! Path-safe persistence of validated uploads.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

/// Invariant violations on the write path.
///
/// These are programmer/configuration errors, not validation rejections: by
/// the time `save` runs, the filename was generated by this module and must
/// be clean. Any violation aborts before a byte is written.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid file path: path traversal detected")]
    PathTraversal,
    #[error("symlink detected at target path: not allowed")]
    SymlinkTarget,
    #[error("upload directory unavailable: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes validated upload bytes under generated names inside one directory.
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Generate a fresh opaque filename for a validated extension.
    ///
    /// The original client filename is discarded entirely; a random 128-bit
    /// hex token plus the validated extension leaves nothing to traverse or
    /// collide with.
    pub fn safe_filename(extension: &str) -> String {
        format!("{}{}", Uuid::new_v4().simple(), extension)
    }

    /// Write `content` under `filename` inside the upload directory.
    ///
    /// Re-verifies path safety independently of name generation: the name
    /// must be a single normal path component, the resolved target must sit
    /// directly inside the canonicalized upload directory, and an existing
    /// symlink at the target refuses the write.
    pub async fn save(&self, content: &[u8], filename: &str) -> Result<PathBuf, StoreError> {
        if filename.contains('/') || filename.contains('\\') {
            return Err(StoreError::PathTraversal);
        }
        let mut components = Path::new(filename).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => return Err(StoreError::PathTraversal),
        }

        // Containment is checked against the canonical directory, not by
        // string prefix comparison.
        let dir = tokio::fs::canonicalize(&self.dir).await?;
        let target = dir.join(filename);
        if target.parent() != Some(dir.as_path()) {
            return Err(StoreError::PathTraversal);
        }

        match tokio::fs::symlink_metadata(&target).await {
            Ok(meta) if meta.file_type().is_symlink() => {
                return Err(StoreError::SymlinkTarget);
            }
            _ => {}
        }

        tokio::fs::write(&target, content).await?;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_filename_is_hex_token_plus_extension() {
        let name = UploadStore::safe_filename(".png");
        assert!(name.ends_with(".png"));
        let stem = name.trim_end_matches(".png");
        assert_eq!(stem.len(), 32);
        assert!(stem.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn safe_filenames_do_not_collide() {
        let a = UploadStore::safe_filename(".txt");
        let b = UploadStore::safe_filename(".txt");
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn saves_inside_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path());
        let name = UploadStore::safe_filename(".txt");

        let path = store.save(b"hello", &name).await.unwrap();
        assert_eq!(path.parent().unwrap(), tmp.path().canonicalize().unwrap());
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn rejects_names_with_separators() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path());

        for name in ["../escape.txt", "a/b.txt", "..\\win.txt", "/abs.txt"] {
            assert!(matches!(
                store.save(b"x", name).await,
                Err(StoreError::PathTraversal)
            ));
        }
    }

    #[tokio::test]
    async fn rejects_dot_dot_name() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path());
        assert!(matches!(
            store.save(b"x", "..").await,
            Err(StoreError::PathTraversal)
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn refuses_to_write_through_symlink() {
        let tmp = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let victim = outside.path().join("victim.txt");
        std::fs::write(&victim, b"original").unwrap();

        let link = tmp.path().join("link.txt");
        std::os::unix::fs::symlink(&victim, &link).unwrap();

        let store = UploadStore::new(tmp.path());
        assert!(matches!(
            store.save(b"overwritten", "link.txt").await,
            Err(StoreError::SymlinkTarget)
        ));
        assert_eq!(std::fs::read(&victim).unwrap(), b"original");
    }
}
