use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChunkerError {
    #[error("invalid chunker configuration: {0}")]
    InvalidConfig(String),
}

/// A bounded slice of a document's text.
///
/// `sequence` is the chunk's position within its source document's split
/// output; together with `source` it identifies the chunk deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    pub source: String,
    pub sequence: usize,
}

/// Splitter configuration.
///
/// Separators are ordered coarsest to finest; the empty string means a raw
/// character split and always matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkerConfig {
    /// Upper bound on chunk length, in characters.
    pub chunk_size: usize,
    /// Characters carried from the end of one chunk into the start of the
    /// next.
    pub chunk_overlap: usize,
    pub separators: Vec<String>,
}

impl ChunkerConfig {
    /// Configuration tuned for prose documents.
    #[must_use]
    pub fn for_documents() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 100,
            separators: ["\n\n", "\n", ". ", ", ", " ", ""]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self::for_documents()
    }
}

/// Deterministic, stateless text splitter.
pub struct TextChunker {
    config: ChunkerConfig,
}

impl TextChunker {
    pub fn new(config: ChunkerConfig) -> Result<Self, ChunkerError> {
        if config.chunk_size == 0 {
            return Err(ChunkerError::InvalidConfig(
                "chunk_size must be greater than zero".into(),
            ));
        }
        if config.chunk_overlap >= config.chunk_size {
            return Err(ChunkerError::InvalidConfig(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                config.chunk_overlap, config.chunk_size
            )));
        }
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Split `text` and tag every chunk with its source identifier.
    #[must_use]
    pub fn chunk(&self, text: &str, source: &str) -> Vec<Chunk> {
        self.split_text(text)
            .into_iter()
            .enumerate()
            .map(|(sequence, content)| Chunk {
                content,
                source: source.to_string(),
                sequence,
            })
            .collect()
    }

    /// Split raw text into overlapping pieces of at most
    /// `chunk_size` characters.
    #[must_use]
    pub fn split_text(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut fragments = Vec::new();
        self.decompose(text, &self.config.separators, &mut fragments);
        self.merge(fragments)
    }

    /// Break `text` into fragments no longer than `chunk_size` characters,
    /// cutting at the coarsest separator that occurs in the text.
    fn decompose(&self, text: &str, separators: &[String], out: &mut Vec<String>) {
        if char_len(text) <= self.config.chunk_size {
            out.push(text.to_string());
            return;
        }

        let Some((separator, finer)) = separators.split_first() else {
            hard_cut(text, self.config.chunk_size, out);
            return;
        };
        if separator.is_empty() {
            hard_cut(text, self.config.chunk_size, out);
            return;
        }

        let parts = split_keeping_separator(text, separator);
        if parts.len() == 1 {
            self.decompose(text, finer, out);
            return;
        }
        for part in &parts {
            if char_len(part) <= self.config.chunk_size {
                out.push(part.clone());
            } else {
                self.decompose(part, finer, out);
            }
        }
    }

    /// Greedily recombine fragments up to `chunk_size`, carrying the last
    /// `chunk_overlap` characters of each emitted chunk into the next.
    fn merge(&self, fragments: Vec<String>) -> Vec<String> {
        let size = self.config.chunk_size;
        let overlap = self.config.chunk_overlap;

        let mut chunks = Vec::new();
        let mut current = String::new();
        // Length (in chars) of the prefix of `current` that is overlap carry
        // rather than new content. A chunk is only emitted once it holds
        // something beyond its carry.
        let mut carried = 0usize;

        for fragment in fragments {
            let fragment_len = char_len(&fragment);
            let current_len = char_len(&current);

            if current_len > carried && current_len + fragment_len > size {
                chunks.push(std::mem::take(&mut current));
                current = char_tail(chunks.last().map(String::as_str).unwrap_or(""), overlap);
                carried = char_len(&current);
            }

            // A carry plus a near-full fragment may not fit; shrink the carry
            // so the chunk bound holds.
            let current_len = char_len(&current);
            if current_len == carried && current_len + fragment_len > size {
                current = char_tail(&current, size.saturating_sub(fragment_len));
                carried = char_len(&current);
            }

            current.push_str(&fragment);
        }

        if char_len(&current) > carried {
            chunks.push(current);
        }
        chunks
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Last `n` characters of `s`, on a char boundary.
fn char_tail(s: &str, n: usize) -> String {
    if n == 0 {
        return String::new();
    }
    let total = char_len(s);
    if total <= n {
        return s.to_string();
    }
    let skip = total - n;
    match s.char_indices().nth(skip) {
        Some((idx, _)) => s[idx..].to_string(),
        None => String::new(),
    }
}

/// Split on `separator`, leaving the separator attached to the preceding
/// piece so that no characters are lost.
fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find(separator) {
        let end = pos + separator.len();
        parts.push(rest[..end].to_string());
        rest = &rest[end..];
    }
    if !rest.is_empty() {
        parts.push(rest.to_string());
    }
    parts
}

/// Raw character split into windows of at most `size` characters.
fn hard_cut(text: &str, size: usize, out: &mut Vec<String>) {
    let mut start = 0usize;
    let mut count = 0usize;
    for (idx, _) in text.char_indices() {
        if count == size {
            out.push(text[start..idx].to_string());
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        out.push(text[start..].to_string());
    }
}
