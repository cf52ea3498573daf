use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_LLM_MODEL: &str = "llama3.1:8b";

const EMPTY_ANSWER_FALLBACK: &str = "Sorry, I could not generate an answer";

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generation service error: {0}")]
    Service(String),
}

/// Produces an answer grounded in the supplied context text.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, query: &str, context: &str) -> Result<String, GenerationError>;
}

/// Answer generator backed by a local Ollama server.
pub struct OllamaGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl OllamaGenerator {
    #[must_use]
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    fn prompt(query: &str, context: &str) -> String {
        format!(
            "Based on the following context, answer this query: {query}\n\n\
             Context:\n{context}\n\nAnswer:"
        )
    }
}

#[async_trait]
impl AnswerGenerator for OllamaGenerator {
    async fn generate(&self, query: &str, context: &str) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&GenerateRequest {
                model: &self.model,
                prompt: &Self::prompt(query, context),
                stream: false,
            })
            .send()
            .await?
            .error_for_status()?;

        let body: GenerateResponse = response.json().await?;
        if body.response.is_empty() {
            log::warn!("Model {} returned an empty answer", self.model);
            return Ok(EMPTY_ANSWER_FALLBACK.to_string());
        }
        Ok(body.response)
    }
}
