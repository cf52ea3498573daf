use crate::{RecordMetadata, SearchHit, VectorRecord, VectorStoreError};
use async_trait::async_trait;

/// The exact operation set the indexing and query paths need from a vector
/// backend. Implementations own record storage; callers never reach into
/// backend internals.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert or replace records, keyed by their id.
    async fn upsert(&self, records: &[VectorRecord]) -> Result<(), VectorStoreError>;

    /// Remove every record whose source tag matches. Returns the number of
    /// records removed.
    async fn delete_by_source(&self, source: &str) -> Result<u64, VectorStoreError>;

    /// Metadata of all records, in unspecified order.
    async fn list_metadata(&self) -> Result<Vec<RecordMetadata>, VectorStoreError>;

    async fn count(&self) -> Result<usize, VectorStoreError>;

    /// Top `limit` records by cosine similarity to `embedding`, best first.
    async fn search(&self, embedding: &[f32], limit: usize)
        -> Result<Vec<SearchHit>, VectorStoreError>;

    /// Drop every record.
    async fn clear(&self) -> Result<(), VectorStoreError>;
}

pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

pub(crate) fn top_hits<'a, I>(records: I, embedding: &[f32], limit: usize) -> Vec<SearchHit>
where
    I: Iterator<Item = &'a VectorRecord>,
{
    let mut scored: Vec<SearchHit> = records
        .map(|record| SearchHit {
            id: record.id.clone(),
            content: record.content.clone(),
            source: record.source.clone(),
            score: cosine_similarity(embedding, &record.embedding),
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = [0.5_f32, 0.5, 0.1];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn cosine_handles_mismatched_or_zero_vectors() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
