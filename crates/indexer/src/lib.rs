//! # DocRAG Indexer
//!
//! Incremental document indexing: decides which files need (re)processing,
//! drives extraction → chunking → embedding → upsert, and keeps the
//! fingerprint cache consistent with the vector store across runs,
//! deletions and resets.
//!
//! ## Pipeline
//!
//! ```text
//! Documents directory
//!     │
//!     ├──> Scanner (sorted, extension-filtered)
//!     │      └─> Candidate files
//!     │
//!     ├──> FingerprintStore (SHA-256 + mtime)
//!     │      └─> unchanged / changed partition
//!     │
//!     ├──> Extract + Chunk (changed files, per-file isolation)
//!     │      └─> Chunk batch
//!     │
//!     ├──> EmbeddingClient (whole batch, order preserving)
//!     │
//!     └──> VectorStore upsert (delete-then-insert per source)
//!            └─> Fingerprint commit + single cache persist
//! ```
//!
//! Fingerprints are committed only after the whole batch is durably in the
//! vector store: a failed or interrupted pass commits nothing, and the next
//! pass selects the same files again.

mod coordinator;
mod error;
mod fingerprint;
mod lifecycle;
mod lock;
mod scanner;
mod stats;

pub use coordinator::IndexCoordinator;
pub use error::{IndexerError, Result};
pub use fingerprint::{content_hash, modified_at, store_key, Fingerprint, FingerprintStore};
pub use lock::PassLock;
pub use scanner::DocumentScanner;
pub use stats::{PassStats, SkippedFile};
