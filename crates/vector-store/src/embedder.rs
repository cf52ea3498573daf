use crate::EmbeddingError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_EMBED_MODEL: &str = "mxbai-embed-large";

/// Turns text into embedding vectors.
///
/// `embed_batch` must return one vector per input, in input order; the
/// indexing pipeline zips the outputs back onto its chunks positionally.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

/// Embedding client backed by a local Ollama server.
pub struct OllamaEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    embedding: Option<Vec<f32>>,
}

impl OllamaEmbedder {
    #[must_use]
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Default for OllamaEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_OLLAMA_URL, DEFAULT_EMBED_MODEL)
    }
}

#[async_trait]
impl EmbeddingClient for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let response = self
            .client
            .post(format!("{}/api/embeddings", self.base_url))
            .json(&EmbeddingsRequest {
                model: &self.model,
                prompt: text,
            })
            .send()
            .await?
            .error_for_status()?;

        let body: EmbeddingsResponse = response.json().await?;
        body.embedding.ok_or_else(|| {
            EmbeddingError::Service(format!(
                "model {} returned a response without an embedding",
                self.model
            ))
        })
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        // The embeddings endpoint is single-prompt; issue requests in input
        // order so the output lines up positionally.
        let mut embeddings = Vec::with_capacity(texts.len());
        for (i, text) in texts.iter().enumerate() {
            log::debug!("Embedding chunk {}/{}", i + 1, texts.len());
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }
}
