use docrag_chunker::Chunk;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A chunk's persisted form: its text, source tag and embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub content: String,
    pub source: String,
    pub embedding: Vec<f32>,
}

impl VectorRecord {
    /// Build a record from a chunk and its embedding.
    ///
    /// The id is derived from (source, sequence, content digest), so
    /// re-inserting an unchanged chunk lands on the same key.
    #[must_use]
    pub fn from_chunk(chunk: &Chunk, embedding: Vec<f32>) -> Self {
        Self {
            id: record_id(chunk),
            content: chunk.content.clone(),
            source: chunk.source.clone(),
            embedding,
        }
    }
}

/// The metadata slice of a record, as returned by
/// [`crate::VectorStore::list_metadata`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub id: String,
    pub source: String,
}

/// A search result with its cosine similarity score.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: String,
    pub content: String,
    pub source: String,
    pub score: f32,
}

fn record_id(chunk: &Chunk) -> String {
    let digest = Sha256::digest(chunk.content.as_bytes());
    let mut short = String::with_capacity(16);
    for byte in &digest[..8] {
        short.push_str(&format!("{byte:02x}"));
    }
    format!("{}:{}:{}", chunk.source, chunk.sequence, short)
}
