use crate::{IndexerError, Result};
use std::path::{Path, PathBuf};

/// Advisory lock guarding a pass against concurrent runs.
///
/// Nothing else coordinates access to the fingerprint cache or the vector
/// store snapshot, so every mutating operation takes this lock for its
/// whole duration. The lock is a file created with `O_EXCL`; it is removed
/// when the guard drops.
#[derive(Debug)]
pub struct PassLock {
    path: PathBuf,
}

impl PassLock {
    pub async fn acquire(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(_) => {
                log::debug!("Acquired pass lock at {}", path.display());
                Ok(Self { path })
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(IndexerError::LockHeld(path.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for PassLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            log::warn!(
                "Failed to remove pass lock at {}: {e}",
                self.path.display()
            );
        }
    }
}
