use crate::{ContentExtractor, ExtractError};
use async_trait::async_trait;
use std::path::Path;

const EXTENSIONS: &[&str] = &["txt", "md"];

/// Extractor for plain-text and markdown files.
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentExtractor for PlainTextExtractor {
    fn can_extract(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        log::debug!("Extracting text file: {}", path.display());
        Ok(tokio::fs::read_to_string(path).await?)
    }
}
