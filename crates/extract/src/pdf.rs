use crate::{ContentExtractor, ExtractError};
use async_trait::async_trait;
use std::path::Path;

/// Extractor for PDF files.
///
/// Parsing runs on the blocking pool; pdf-extract walks the whole document
/// and is CPU bound on large files.
pub struct PdfExtractor;

impl PdfExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentExtractor for PdfExtractor {
    fn can_extract(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        log::debug!("Extracting PDF: {}", path.display());
        let bytes = tokio::fs::read(path).await?;

        tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes)
                .map_err(|e| ExtractError::Failed(format!("PDF parsing failed: {e}")))
        })
        .await
        .map_err(|e| ExtractError::Failed(format!("task join error: {e}")))?
    }
}
