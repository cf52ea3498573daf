//! # DocRAG Chunker
//!
//! Deterministic text splitting for document indexing.
//!
//! ## Pipeline position
//!
//! ```text
//! Extracted text
//!     │
//!     └──> TextChunker (separator-aware, overlapping)
//!            └─> Ordered chunks tagged with their source
//! ```
//!
//! The splitter is stateless: the same input text and the same
//! [`ChunkerConfig`] always produce the identical chunk sequence, which the
//! indexing pipeline relies on when a pass is retried.

mod splitter;

pub use splitter::{Chunk, ChunkerConfig, ChunkerError, TextChunker};
