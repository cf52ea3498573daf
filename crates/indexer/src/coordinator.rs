use crate::error::batch_label;
use crate::fingerprint::FingerprintStore;
use crate::lock::PassLock;
use crate::scanner::DocumentScanner;
use crate::stats::PassStats;
use crate::{IndexerError, Result};
use docrag_chunker::{Chunk, TextChunker};
use docrag_extract::ExtractorRegistry;
use docrag_vector_store::{EmbeddingClient, EmbeddingError, VectorRecord, VectorStore};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

const FINGERPRINT_FILE: &str = "fingerprints.json";
const LOCK_FILE: &str = "pass.lock";
const MAX_CONCURRENT_EXTRACTIONS: usize = 8;

/// Orchestrates indexing passes and owns the fingerprint cache.
///
/// One coordinator operates on a given cache/store pair at a time; the
/// pass lock enforces that against concurrent processes too.
pub struct IndexCoordinator {
    root: PathBuf,
    data_dir: PathBuf,
    fingerprints: FingerprintStore,
    chunker: TextChunker,
    extractors: ExtractorRegistry,
    embedder: Arc<dyn EmbeddingClient>,
    store: Option<Arc<dyn VectorStore>>,
}

impl IndexCoordinator {
    /// Create a coordinator for the documents under `root`.
    ///
    /// `store` may be absent: the coordinator then runs in a degraded mode
    /// where every operation that needs the backend reports
    /// [`IndexerError::StoreUnavailable`] instead of failing obscurely.
    pub async fn new(
        root: impl AsRef<Path>,
        data_dir: impl AsRef<Path>,
        chunker: TextChunker,
        extractors: ExtractorRegistry,
        embedder: Arc<dyn EmbeddingClient>,
        store: Option<Arc<dyn VectorStore>>,
    ) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(IndexerError::InvalidPath(format!(
                "not a directory: {}",
                root.display()
            )));
        }

        let data_dir = data_dir.as_ref().to_path_buf();
        let fingerprints = FingerprintStore::load(data_dir.join(FINGERPRINT_FILE)).await;

        Ok(Self {
            root,
            data_dir,
            fingerprints,
            chunker,
            extractors,
            embedder,
            store,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn fingerprints(&self) -> &FingerprintStore {
        &self.fingerprints
    }

    pub(crate) fn store(&self) -> Result<&Arc<dyn VectorStore>> {
        self.store.as_ref().ok_or(IndexerError::StoreUnavailable)
    }

    pub(crate) fn lock_path(&self) -> PathBuf {
        self.data_dir.join(LOCK_FILE)
    }

    pub(crate) fn fingerprints_mut(&mut self) -> &mut FingerprintStore {
        &mut self.fingerprints
    }

    /// The identifier a file is tagged with in the vector store: its path
    /// relative to the documents root, separator-normalized.
    #[must_use]
    pub fn source_name(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let mut name = relative.to_string_lossy().to_string();
        if name.contains('\\') {
            name = name.replace('\\', "/");
        }
        name
    }

    /// Run one indexing pass.
    ///
    /// With `force_full`, change detection is bypassed and every candidate
    /// file is reprocessed.
    pub async fn run_pass(&mut self, force_full: bool) -> Result<PassStats> {
        let started = Instant::now();
        let mut stats = PassStats::new();

        let store = Arc::clone(self.store()?);
        let _lock = PassLock::acquire(self.lock_path()).await?;

        log::info!("Indexing documents under {}", self.root.display());

        // 1. Scan and partition into unchanged / changed.
        let files = DocumentScanner::new(&self.root).scan(&self.extractors);
        stats.scanned = files.len();

        let mut changed: Vec<PathBuf> = Vec::new();
        for path in &files {
            if force_full {
                changed.push(path.clone());
                continue;
            }
            match self.fingerprints.is_processed(path).await {
                Ok(true) => stats.unchanged += 1,
                Ok(false) => changed.push(path.clone()),
                Err(e) => {
                    // The file vanished or became unreadable mid-scan;
                    // isolate it like an extraction failure.
                    log::warn!("Skipping {}: fingerprint check failed: {e}", path.display());
                    stats.add_skipped(path, format!("fingerprint check failed: {e}"));
                }
            }
        }

        if changed.is_empty() {
            log::info!("No changes detected");
            stats.no_changes = true;
            stats.finish(started);
            return Ok(stats);
        }

        log::info!("{} new or changed documents found", changed.len());

        // 2. Extract and chunk the changed files. Per-file failures are
        // reported and excluded; they never abort the rest of the batch.
        let (batch, batch_files) = self.process_files(&changed, &mut stats).await;
        if batch_files.is_empty() {
            stats.finish(started);
            return Ok(stats);
        }

        let batch_sources: Vec<String> =
            batch_files.iter().map(|p| self.source_name(p)).collect();

        // 3. Embed the whole batch, order preserving. A service failure
        // aborts the pass: nothing has been committed yet.
        let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
        log::info!(
            "Embedding {} chunks from {} files",
            texts.len(),
            batch_files.len()
        );
        let embeddings = self
            .embedder
            .embed_batch(&texts)
            .await
            .map_err(|e| IndexerError::Embedding {
                files: batch_label(&batch_sources),
                source: e,
            })?;
        if embeddings.len() != batch.len() {
            return Err(IndexerError::Embedding {
                files: batch_label(&batch_sources),
                source: EmbeddingError::Service(format!(
                    "expected {} embeddings, got {}",
                    batch.len(),
                    embeddings.len()
                )),
            });
        }

        // 4. Upsert. Existing rows for every contributing source are
        // deleted first so a reprocessed file never accumulates duplicate
        // rows; this also heals residue from a previously aborted pass.
        let records: Vec<VectorRecord> = batch
            .iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| VectorRecord::from_chunk(chunk, embedding))
            .collect();

        let sources: BTreeSet<&String> = batch_sources.iter().collect();
        for source in sources {
            store
                .delete_by_source(source)
                .await
                .map_err(|e| IndexerError::Persist {
                    files: batch_label(&batch_sources),
                    source: e,
                })?;
        }
        if !records.is_empty() {
            store
                .upsert(&records)
                .await
                .map_err(|e| IndexerError::Persist {
                    files: batch_label(&batch_sources),
                    source: e,
                })?;
        }

        // 5. Commit fingerprints, only now that the batch is durable, then
        // persist the cache once.
        for path in &batch_files {
            self.fingerprints.update(path).await?;
        }
        self.fingerprints.persist().await?;

        stats.finish(started);
        log::info!(
            "Indexing completed: {} files, {} chunks, {} skipped in {} ms",
            stats.indexed_files,
            stats.chunks,
            stats.skipped.len(),
            stats.time_ms
        );
        Ok(stats)
    }

    /// Extract and chunk `files` in bounded batches, preserving input
    /// order in the aggregate so chunk sequences stay grouped by source.
    async fn process_files(
        &self,
        files: &[PathBuf],
        stats: &mut PassStats,
    ) -> (Vec<Chunk>, Vec<PathBuf>) {
        let mut batch: Vec<Chunk> = Vec::new();
        let mut batch_files: Vec<PathBuf> = Vec::new();

        for window in files.chunks(MAX_CONCURRENT_EXTRACTIONS) {
            let mut tasks = Vec::with_capacity(window.len());
            for path in window {
                let path = path.clone();
                let extractors = self.extractors.clone();
                tasks.push(tokio::spawn(async move {
                    extractors.extract(&path).await
                }));
            }

            for (path, task) in window.iter().zip(tasks) {
                match task.await {
                    Ok(Ok(text)) => {
                        let source = self.source_name(path);
                        let chunks = self.chunker.chunk(&text, &source);
                        stats.add_file(chunks.len());
                        batch.extend(chunks);
                        batch_files.push(path.clone());
                    }
                    Ok(Err(e)) => {
                        log::warn!("Skipping {}: {e}", path.display());
                        stats.add_skipped(path, e.to_string());
                    }
                    Err(e) => {
                        log::warn!("Skipping {}: extraction task panicked: {e}", path.display());
                        stats.add_skipped(path, format!("extraction task panicked: {e}"));
                    }
                }
            }
        }

        (batch, batch_files)
    }
}
