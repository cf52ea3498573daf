//! Lifecycle operations: delete one source, list sources, clear all.
//!
//! Thin state mutations over the vector store and the fingerprint cache.
//! Each takes the pass lock: they touch the same persisted state as an
//! indexing pass.

use crate::fingerprint::store_key;
use crate::lock::PassLock;
use crate::{IndexCoordinator, Result};
use std::sync::Arc;

impl IndexCoordinator {
    /// Remove a source document from the index.
    ///
    /// Deletes every vector record tagged with `name`, then the source's
    /// fingerprint entry, then persists the cache. Returns the number of
    /// records removed (zero for an unknown source).
    pub async fn delete_source(&mut self, name: &str) -> Result<u64> {
        let store = Arc::clone(self.store()?);
        let _lock = PassLock::acquire(self.lock_path()).await?;

        let removed = store.delete_by_source(name).await?;

        let key = store_key(&self.root().join(name));
        self.fingerprints_mut().remove(&key);
        self.fingerprints_mut().persist().await?;

        log::info!("Deleted {removed} records for source {name}");
        Ok(removed)
    }

    /// Distinct source names currently present in the vector store, sorted.
    pub async fn list_sources(&self) -> Result<Vec<String>> {
        let store = self.store()?;
        let mut sources: Vec<String> = store
            .list_metadata()
            .await?
            .into_iter()
            .map(|meta| meta.source)
            .collect();
        sources.sort();
        sources.dedup();
        Ok(sources)
    }

    /// Drop everything: all vector records and all fingerprints.
    pub async fn clear(&mut self) -> Result<()> {
        let store = Arc::clone(self.store()?);
        let _lock = PassLock::acquire(self.lock_path()).await?;

        store.clear().await?;
        self.fingerprints_mut().clear();
        self.fingerprints_mut().persist().await?;

        log::info!("Cleared vector store and fingerprint cache");
        Ok(())
    }
}
