use crate::{AnswerGenerator, GenerationError};
use docrag_vector_store::{EmbeddingClient, EmbeddingError, VectorStore, VectorStoreError};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_TOP_K: usize = 5;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("no vector store available; index some documents first")]
    StoreUnavailable,

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("vector store error: {0}")]
    Store(#[from] VectorStoreError),

    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
}

/// One retrieved chunk backing an answer.
#[derive(Debug, Clone, Serialize)]
pub struct SourceHit {
    pub source: String,
    pub content: String,
    pub score: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub question: String,
    pub answer: String,
    pub sources: Vec<SourceHit>,
}

/// Question answering over an indexed document set.
pub struct QueryEngine {
    embedder: Arc<dyn EmbeddingClient>,
    store: Option<Arc<dyn VectorStore>>,
    generator: Arc<dyn AnswerGenerator>,
}

impl QueryEngine {
    #[must_use]
    pub fn new(
        embedder: Arc<dyn EmbeddingClient>,
        store: Option<Arc<dyn VectorStore>>,
        generator: Arc<dyn AnswerGenerator>,
    ) -> Self {
        Self {
            embedder,
            store,
            generator,
        }
    }

    /// Answer `question` from the `top_k` most similar chunks.
    pub async fn answer(&self, question: &str, top_k: usize) -> Result<QueryResponse, QueryError> {
        let store = self.store.as_ref().ok_or(QueryError::StoreUnavailable)?;

        let embedding = self.embedder.embed(question).await?;
        let hits = store.search(&embedding, top_k).await?;
        log::debug!("Retrieved {} chunks for query", hits.len());

        let context = hits
            .iter()
            .map(|hit| hit.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let answer = self.generator.generate(question, &context).await?;

        Ok(QueryResponse {
            question: question.to_string(),
            answer,
            sources: hits
                .into_iter()
                .map(|hit| SourceHit {
                    source: hit.source,
                    content: hit.content,
                    score: hit.score,
                })
                .collect(),
        })
    }
}
