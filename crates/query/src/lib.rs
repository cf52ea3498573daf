//! # DocRAG Query
//!
//! The question-answering path: embed the question, retrieve the most
//! similar chunks from the vector store, and ground a generated answer in
//! them. Retrieval quality and prompt construction are deliberately plain;
//! the interesting state lives in the indexing side.

mod engine;
mod generator;

pub use engine::{QueryEngine, QueryError, QueryResponse, SourceHit, DEFAULT_TOP_K};
pub use generator::{AnswerGenerator, GenerationError, OllamaGenerator, DEFAULT_LLM_MODEL};
