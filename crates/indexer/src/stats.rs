use serde::Serialize;
use std::path::Path;
use std::time::Instant;

/// A file excluded from a pass, with the reason it was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// Outcome of one indexing pass.
#[derive(Debug, Default, Clone, Serialize)]
pub struct PassStats {
    /// Candidate files seen by the scanner.
    pub scanned: usize,
    /// Files whose fingerprint still matched.
    pub unchanged: usize,
    /// Files (re)indexed this pass.
    pub indexed_files: usize,
    /// Chunks upserted this pass.
    pub chunks: usize,
    /// Files excluded by per-file failures, with reasons.
    pub skipped: Vec<SkippedFile>,
    /// True when change detection selected nothing: the pass touched
    /// neither the vector store nor the cache.
    pub no_changes: bool,
    pub time_ms: u64,
}

impl PassStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, chunks: usize) {
        self.indexed_files += 1;
        self.chunks += chunks;
    }

    pub fn add_skipped(&mut self, path: &Path, reason: impl Into<String>) {
        self.skipped.push(SkippedFile {
            path: path.display().to_string(),
            reason: reason.into(),
        });
    }

    pub fn finish(&mut self, started: Instant) {
        self.time_ms = started.elapsed().as_millis() as u64;
        if self.time_ms == 0 {
            self.time_ms = 1;
        }
    }
}
