//! # DocRAG Vector Store
//!
//! Embedding and vector persistence for document chunks.
//!
//! Two collaborator seams live here:
//!
//! - [`EmbeddingClient`] turns chunk text into vectors. The shipped
//!   implementation, [`OllamaEmbedder`], talks to a local Ollama server.
//! - [`VectorStore`] holds [`VectorRecord`]s and answers
//!   upsert/delete/list/count/search. [`JsonVectorStore`] persists a single
//!   JSON snapshot next to the fingerprint cache; [`MemoryVectorStore`]
//!   keeps everything in memory for tests and development.
//!
//! Store unavailability is a first-class condition
//! ([`VectorStoreError::Unavailable`]), not a crash: callers that find no
//! usable store report it and degrade.

mod embedder;
mod error;
mod json_store;
mod memory;
mod record;
mod store;

pub use embedder::{EmbeddingClient, OllamaEmbedder, DEFAULT_EMBED_MODEL, DEFAULT_OLLAMA_URL};
pub use error::{EmbeddingError, VectorStoreError};
pub use json_store::JsonVectorStore;
pub use memory::MemoryVectorStore;
pub use record::{RecordMetadata, SearchHit, VectorRecord};
pub use store::VectorStore;
