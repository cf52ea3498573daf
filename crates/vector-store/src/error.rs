use thiserror::Error;

#[derive(Error, Debug)]
pub enum VectorStoreError {
    /// The store could not be opened at all; callers treat this as a
    /// degraded mode and report it instead of failing with a backend error.
    #[error("vector store is not available")]
    Unavailable,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("corrupt vector store snapshot at {path}: {detail}")]
    CorruptSnapshot { path: String, detail: String },

    #[error("vector store backend error: {0}")]
    Backend(String),
}

#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("embedding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("embedding service error: {0}")]
    Service(String),
}
