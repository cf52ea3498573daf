use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

const HASH_BLOCK_SIZE: usize = 8192;

/// Last-indexed state of one source file.
///
/// A file counts as processed only while both its content hash and its
/// modification timestamp still match; either changing reclassifies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub hash: String,
    pub mtime: DateTime<Utc>,
    pub processed_at: DateTime<Utc>,
}

/// Persisted mapping from file path to [`Fingerprint`].
///
/// The backing snapshot is one JSON object, rewritten wholesale on
/// [`persist`](Self::persist). Mutations stay in memory until then; the
/// coordinator persists exactly once per successful pass.
pub struct FingerprintStore {
    path: PathBuf,
    entries: BTreeMap<String, Fingerprint>,
}

impl FingerprintStore {
    /// Load the snapshot at `path`.
    ///
    /// A missing snapshot yields an empty store. An unreadable or corrupt
    /// snapshot also yields an empty store, with a warning: the cache is
    /// rebuildable state, losing it only costs a full reindex.
    pub async fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();

        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!(
                        "Fingerprint cache at {} is corrupt ({e}); starting empty",
                        path.display()
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                log::warn!(
                    "Failed to read fingerprint cache at {} ({e}); starting empty",
                    path.display()
                );
                BTreeMap::new()
            }
        };

        Self { path, entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Fingerprint> {
        self.entries.get(key)
    }

    /// Whether `path` is already indexed in its current state.
    ///
    /// Both the content hash and the modification timestamp are recomputed
    /// on every call; the timestamp never short-circuits the hash, so a
    /// touched-but-identical file and an edited file are both caught.
    /// Hashing a missing or unreadable file is an error for the caller to
    /// handle, never a silent "processed".
    pub async fn is_processed(&self, path: &Path) -> std::io::Result<bool> {
        let Some(entry) = self.entries.get(&store_key(path)) else {
            return Ok(false);
        };

        let hash = content_hash(path).await?;
        let mtime = modified_at(path).await?;
        Ok(entry.hash == hash && entry.mtime == mtime)
    }

    /// Record `path` as processed now, from its current hash and mtime.
    pub async fn update(&mut self, path: &Path) -> std::io::Result<()> {
        let fingerprint = Fingerprint {
            hash: content_hash(path).await?,
            mtime: modified_at(path).await?,
            processed_at: Utc::now(),
        };
        self.entries.insert(store_key(path), fingerprint);
        Ok(())
    }

    /// Remove one entry. Returns whether it existed.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Write the whole mapping back to disk, replacing the previous
    /// snapshot via a temp file and an atomic rename.
    pub async fn persist(&self) -> crate::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// Cache key for a file: its full path as given, separator-normalized.
#[must_use]
pub fn store_key(path: &Path) -> String {
    let mut key = path.to_string_lossy().to_string();
    if key.contains('\\') {
        key = key.replace('\\', "/");
    }
    key
}

/// Streaming SHA-256 over the full file contents, in fixed-size blocks.
pub async fn content_hash(path: &Path) -> std::io::Result<String> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut block = [0u8; HASH_BLOCK_SIZE];

    loop {
        let read = file.read(&mut block).await?;
        if read == 0 {
            break;
        }
        hasher.update(&block[..read]);
    }

    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{byte:02x}"));
    }
    Ok(hex)
}

/// Filesystem modification timestamp of `path`.
pub async fn modified_at(path: &Path) -> std::io::Result<DateTime<Utc>> {
    let metadata = tokio::fs::metadata(path).await?;
    Ok(DateTime::<Utc>::from(metadata.modified()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    async fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        tokio::fs::write(&path, contents).await.unwrap();
        path
    }

    #[tokio::test]
    async fn missing_snapshot_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = FingerprintStore::load(dir.path().join("cache.json")).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn corrupt_snapshot_loads_empty_without_failing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        tokio::fs::write(&path, b"{{{ not json").await.unwrap();

        let store = FingerprintStore::load(&path).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn unseen_file_is_not_processed() {
        let dir = TempDir::new().unwrap();
        let file = write_file(&dir, "a.txt", "hello").await;

        let store = FingerprintStore::load(dir.path().join("cache.json")).await;
        assert!(!store.is_processed(&file).await.unwrap());
    }

    #[tokio::test]
    async fn update_then_is_processed_roundtrip() {
        let dir = TempDir::new().unwrap();
        let file = write_file(&dir, "a.txt", "hello").await;

        let mut store = FingerprintStore::load(dir.path().join("cache.json")).await;
        store.update(&file).await.unwrap();
        assert!(store.is_processed(&file).await.unwrap());
    }

    #[tokio::test]
    async fn content_change_reclassifies_the_file() {
        let dir = TempDir::new().unwrap();
        let file = write_file(&dir, "a.txt", "hello").await;

        let mut store = FingerprintStore::load(dir.path().join("cache.json")).await;
        store.update(&file).await.unwrap();

        tokio::fs::write(&file, "hello, edited").await.unwrap();
        assert!(!store.is_processed(&file).await.unwrap());
    }

    #[tokio::test]
    async fn timestamp_only_change_reclassifies_the_file() {
        let dir = TempDir::new().unwrap();
        let file = write_file(&dir, "a.txt", "hello").await;

        let mut store = FingerprintStore::load(dir.path().join("cache.json")).await;
        store.update(&file).await.unwrap();
        let old_hash = store.get(&store_key(&file)).unwrap().hash.clone();

        // Touch the mtime without changing content.
        let handle = std::fs::OpenOptions::new().write(true).open(&file).unwrap();
        handle
            .set_modified(SystemTime::now() + Duration::from_secs(7))
            .unwrap();
        drop(handle);

        assert!(!store.is_processed(&file).await.unwrap());

        // Recommitting stores the new timestamp with the same hash.
        store.update(&file).await.unwrap();
        let entry = store.get(&store_key(&file)).unwrap();
        assert_eq!(entry.hash, old_hash);
        assert!(store.is_processed(&file).await.unwrap());
    }

    #[tokio::test]
    async fn hashing_a_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let file = write_file(&dir, "a.txt", "hello").await;

        let mut store = FingerprintStore::load(dir.path().join("cache.json")).await;
        store.update(&file).await.unwrap();

        tokio::fs::remove_file(&file).await.unwrap();
        assert!(store.is_processed(&file).await.is_err());
    }

    #[tokio::test]
    async fn persist_and_reload_are_byte_stable() {
        let dir = TempDir::new().unwrap();
        let cache = dir.path().join("cache.json");
        let file = write_file(&dir, "a.txt", "hello").await;

        let mut store = FingerprintStore::load(&cache).await;
        store.update(&file).await.unwrap();
        store.persist().await.unwrap();
        let first = tokio::fs::read(&cache).await.unwrap();

        // A reload followed by a persist with no mutations must not change
        // the snapshot.
        let reloaded = FingerprintStore::load(&cache).await;
        assert_eq!(reloaded.len(), 1);
        reloaded.persist().await.unwrap();
        let second = tokio::fs::read(&cache).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn remove_and_clear_are_in_memory_until_persist() {
        let dir = TempDir::new().unwrap();
        let cache = dir.path().join("cache.json");
        let file = write_file(&dir, "a.txt", "hello").await;

        let mut store = FingerprintStore::load(&cache).await;
        store.update(&file).await.unwrap();
        store.persist().await.unwrap();

        assert!(store.remove(&store_key(&file)));
        assert!(store.is_empty());

        // Not yet persisted: a fresh load still sees the entry.
        let reloaded = FingerprintStore::load(&cache).await;
        assert_eq!(reloaded.len(), 1);

        store.persist().await.unwrap();
        let reloaded = FingerprintStore::load(&cache).await;
        assert!(reloaded.is_empty());
    }

    #[tokio::test]
    async fn content_hash_is_the_sha256_of_the_contents() {
        let dir = TempDir::new().unwrap();
        let file = write_file(&dir, "a.txt", "abc").await;

        // Well-known SHA-256 of "abc".
        assert_eq!(
            content_hash(&file).await.unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn content_hash_streams_large_files() {
        let dir = TempDir::new().unwrap();
        let big = "x".repeat(HASH_BLOCK_SIZE * 3 + 17);
        let file = write_file(&dir, "big.txt", &big).await;

        let streamed = content_hash(&file).await.unwrap();

        let mut hasher = Sha256::new();
        hasher.update(big.as_bytes());
        let direct: String = hasher
            .finalize()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect();

        assert_eq!(streamed, direct);
    }
}
