use crate::store::top_hits;
use crate::{RecordMetadata, SearchHit, VectorRecord, VectorStore, VectorStoreError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Vector store persisted as a single JSON snapshot.
///
/// The whole record map is rewritten on every mutation, via a temp file and
/// an atomic rename so a crash mid-write never corrupts the previous
/// snapshot.
#[derive(Debug)]
pub struct JsonVectorStore {
    path: PathBuf,
    records: RwLock<BTreeMap<String, VectorRecord>>,
}

impl JsonVectorStore {
    /// Open the snapshot at `path`, starting empty if it does not exist.
    ///
    /// A snapshot that exists but cannot be parsed is an error; the caller
    /// decides whether to treat the store as unavailable or rebuild.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, VectorStoreError> {
        let path = path.as_ref().to_path_buf();

        let records = if path.exists() {
            let bytes = tokio::fs::read(&path).await?;
            serde_json::from_slice::<BTreeMap<String, VectorRecord>>(&bytes).map_err(|e| {
                VectorStoreError::CorruptSnapshot {
                    path: path.display().to_string(),
                    detail: e.to_string(),
                }
            })?
        } else {
            BTreeMap::new()
        };

        log::debug!(
            "Opened vector store at {} with {} records",
            path.display(),
            records.len()
        );

        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(
        &self,
        records: &BTreeMap<String, VectorRecord>,
    ) -> Result<(), VectorStoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec(records)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl VectorStore for JsonVectorStore {
    async fn upsert(&self, records: &[VectorRecord]) -> Result<(), VectorStoreError> {
        let mut guard = self.records.write().await;
        for record in records {
            guard.insert(record.id.clone(), record.clone());
        }
        self.persist(&guard).await?;
        log::debug!("Upserted {} records", records.len());
        Ok(())
    }

    async fn delete_by_source(&self, source: &str) -> Result<u64, VectorStoreError> {
        let mut guard = self.records.write().await;
        let before = guard.len();
        guard.retain(|_, record| record.source != source);
        let removed = (before - guard.len()) as u64;
        if removed > 0 {
            self.persist(&guard).await?;
        }
        Ok(removed)
    }

    async fn list_metadata(&self) -> Result<Vec<RecordMetadata>, VectorStoreError> {
        let guard = self.records.read().await;
        Ok(guard
            .values()
            .map(|record| RecordMetadata {
                id: record.id.clone(),
                source: record.source.clone(),
            })
            .collect())
    }

    async fn count(&self) -> Result<usize, VectorStoreError> {
        Ok(self.records.read().await.len())
    }

    async fn search(
        &self,
        embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<SearchHit>, VectorStoreError> {
        let guard = self.records.read().await;
        Ok(top_hits(guard.values(), embedding, limit))
    }

    async fn clear(&self) -> Result<(), VectorStoreError> {
        let mut guard = self.records.write().await;
        guard.clear();
        self.persist(&guard).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn record(id: &str, source: &str, embedding: Vec<f32>) -> VectorRecord {
        VectorRecord {
            id: id.to_string(),
            content: format!("content of {id}"),
            source: source.to_string(),
            embedding,
        }
    }

    #[tokio::test]
    async fn starts_empty_when_no_snapshot_exists() {
        let dir = TempDir::new().unwrap();
        let store = JsonVectorStore::open(dir.path().join("vectors.json"))
            .await
            .unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn upsert_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vectors.json");

        {
            let store = JsonVectorStore::open(&path).await.unwrap();
            store
                .upsert(&[record("a:0:x", "a.pdf", vec![1.0, 0.0])])
                .await
                .unwrap();
        }

        let reopened = JsonVectorStore::open(&path).await.unwrap();
        assert_eq!(reopened.count().await.unwrap(), 1);
        let metadata = reopened.list_metadata().await.unwrap();
        assert_eq!(metadata[0].source, "a.pdf");
    }

    #[tokio::test]
    async fn upsert_replaces_records_with_the_same_id() {
        let dir = TempDir::new().unwrap();
        let store = JsonVectorStore::open(dir.path().join("vectors.json"))
            .await
            .unwrap();

        store
            .upsert(&[record("a:0:x", "a.pdf", vec![1.0])])
            .await
            .unwrap();
        store
            .upsert(&[record("a:0:x", "a.pdf", vec![2.0])])
            .await
            .unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_by_source_removes_only_that_source() {
        let dir = TempDir::new().unwrap();
        let store = JsonVectorStore::open(dir.path().join("vectors.json"))
            .await
            .unwrap();

        store
            .upsert(&[
                record("a:0:x", "a.pdf", vec![1.0]),
                record("a:1:y", "a.pdf", vec![1.0]),
                record("b:0:z", "b.pdf", vec![1.0]),
            ])
            .await
            .unwrap();

        let removed = store.delete_by_source("a.pdf").await.unwrap();
        assert_eq!(removed, 2);

        let metadata = store.list_metadata().await.unwrap();
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata[0].source, "b.pdf");
    }

    #[tokio::test]
    async fn search_ranks_by_cosine_similarity() {
        let dir = TempDir::new().unwrap();
        let store = JsonVectorStore::open(dir.path().join("vectors.json"))
            .await
            .unwrap();

        store
            .upsert(&[
                record("far", "a.pdf", vec![0.0, 1.0]),
                record("near", "a.pdf", vec![1.0, 0.05]),
                record("exact", "b.pdf", vec![1.0, 0.0]),
            ])
            .await
            .unwrap();

        let hits = store.search(&[1.0, 0.0], 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "exact");
        assert_eq!(hits[1].id, "near");
        assert!(hits[0].score >= hits[1].score);
    }

    #[tokio::test]
    async fn clear_drops_everything_and_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vectors.json");

        let store = JsonVectorStore::open(&path).await.unwrap();
        store
            .upsert(&[record("a:0:x", "a.pdf", vec![1.0])])
            .await
            .unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);

        let reopened = JsonVectorStore::open(&path).await.unwrap();
        assert_eq!(reopened.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn corrupt_snapshot_is_reported_not_swallowed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vectors.json");
        tokio::fs::write(&path, b"{ this is not json").await.unwrap();

        let err = JsonVectorStore::open(&path).await.unwrap_err();
        assert!(matches!(err, VectorStoreError::CorruptSnapshot { .. }));
    }
}
