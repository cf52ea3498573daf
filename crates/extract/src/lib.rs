//! # DocRAG Extract
//!
//! Text extraction from source documents.
//!
//! Extractors implement [`ContentExtractor`] and are dispatched by file
//! extension through an [`ExtractorRegistry`]. The rest of the system only
//! sees `extract(path) -> text`; what a format looks like on disk stays in
//! here.

mod error;
mod pdf;
mod registry;
mod text;

pub use error::ExtractError;
pub use pdf::PdfExtractor;
pub use registry::ExtractorRegistry;
pub use text::PlainTextExtractor;

use async_trait::async_trait;
use std::path::Path;

/// Turns a file on disk into raw text.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    /// Whether this extractor handles the given path.
    fn can_extract(&self, path: &Path) -> bool;

    /// Extract the full text of the file.
    async fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}
