use crate::store::top_hits;
use crate::{RecordMetadata, SearchHit, VectorRecord, VectorStore, VectorStoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory vector store.
///
/// Same contract as the persistent stores, nothing written to disk. Useful
/// in tests and for development runs that should not leave state behind.
#[derive(Default)]
pub struct MemoryVectorStore {
    records: RwLock<HashMap<String, VectorRecord>>,
}

impl MemoryVectorStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert(&self, records: &[VectorRecord]) -> Result<(), VectorStoreError> {
        let mut guard = self.records.write().await;
        for record in records {
            guard.insert(record.id.clone(), record.clone());
        }
        Ok(())
    }

    async fn delete_by_source(&self, source: &str) -> Result<u64, VectorStoreError> {
        let mut guard = self.records.write().await;
        let before = guard.len();
        guard.retain(|_, record| record.source != source);
        Ok((before - guard.len()) as u64)
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
        self.records.write().await.clear();
        Ok(())
    }
}
