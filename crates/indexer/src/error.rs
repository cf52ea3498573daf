use docrag_vector_store::{EmbeddingError, VectorStoreError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexerError>;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("chunker error: {0}")]
    Chunker(#[from] docrag_chunker::ChunkerError),

    #[error("cache serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid documents directory: {0}")]
    InvalidPath(String),

    /// The vector store could not be opened; indexing and lifecycle
    /// operations report this instead of pretending the backend exists.
    #[error("no vector store available")]
    StoreUnavailable,

    #[error("another indexing pass holds the lock at {0}")]
    LockHeld(String),

    /// Batch-wide embedding failure; aborts the pass before any commit.
    #[error("embedding failed for {files}: {source}")]
    Embedding {
        files: String,
        #[source]
        source: EmbeddingError,
    },

    /// Batch-wide vector store write failure; aborts the pass before any
    /// commit.
    #[error("vector store write failed for {files}: {source}")]
    Persist {
        files: String,
        #[source]
        source: VectorStoreError,
    },

    #[error("vector store error: {0}")]
    VectorStore(#[from] VectorStoreError),
}

/// Human-readable batch summary carried inside batch-wide errors.
pub(crate) fn batch_label(sources: &[String]) -> String {
    const MAX_LISTED: usize = 5;
    let listed: Vec<&str> = sources.iter().take(MAX_LISTED).map(String::as_str).collect();
    let suffix = if sources.len() > MAX_LISTED { ", ..." } else { "" };
    format!("{} file(s) [{}{}]", sources.len(), listed.join(", "), suffix)
}
