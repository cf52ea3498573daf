use crate::{ContentExtractor, ExtractError};
use std::path::Path;
use std::sync::Arc;

/// Ordered collection of extractors, dispatched by path.
///
/// The first extractor that accepts a path wins.
#[derive(Clone)]
pub struct ExtractorRegistry {
    extractors: Vec<Arc<dyn ContentExtractor>>,
}

impl ExtractorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Registry covering every format the tool ships extractors for.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(crate::PlainTextExtractor::new());
        registry.register(crate::PdfExtractor::new());
        registry
    }

    pub fn register(&mut self, extractor: impl ContentExtractor + 'static) {
        self.extractors.push(Arc::new(extractor));
    }

    /// Whether any registered extractor handles this path.
    #[must_use]
    pub fn supports(&self, path: &Path) -> bool {
        self.extractors.iter().any(|e| e.can_extract(path))
    }

    /// Extract `path` with the first matching extractor.
    pub async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let extractor = self
            .extractors
            .iter()
            .find(|e| e.can_extract(path))
            .ok_or_else(|| ExtractError::UnsupportedType(path.display().to_string()))?;
        extractor.extract(path).await
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
