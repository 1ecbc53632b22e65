use std::path::{Path, PathBuf};

use uuid::Uuid;

/// A scratch directory private to one request, removed when dropped.
#[derive(Debug)]
pub struct WorkDir {
    path: PathBuf,
    keep: bool,
}

impl WorkDir {
    /// Create `root/<uuid>`.
    pub fn create(root: &Path, keep: bool) -> std::io::Result<Self> {
        let path = root.join(Uuid::new_v4().to_string());
        std::fs::create_dir_all(&path)?;
        tracing::debug!(path = %path.display(), "created work dir");
        Ok(Self { path, keep })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            tracing::debug!(path = %self.path.display(), error = %e, "could not remove work dir");
        }
    }
}
