//! DocRAG command line interface.
//!
//! Question answering over a directory of documents, backed by an
//! incremental local index:
//!
//! - `docrag index` indexes new and changed documents
//! - `docrag query <text>` asks a question, grounded in retrieved chunks
//! - `docrag delete <source>` removes one document from the index
//! - `docrag clear` removes all indexed data
//! - `docrag list` shows indexed documents
//!
//! Exit code is 0 on success and 1 on any fatal error; diagnostics go to
//! stderr.

use anyhow::Context;
use clap::{Parser, Subcommand};
use docrag_chunker::{ChunkerConfig, TextChunker};
use docrag_extract::ExtractorRegistry;
use docrag_indexer::IndexCoordinator;
use docrag_query::{OllamaGenerator, QueryEngine, DEFAULT_LLM_MODEL, DEFAULT_TOP_K};
use docrag_vector_store::{
    JsonVectorStore, OllamaEmbedder, VectorStore, DEFAULT_EMBED_MODEL, DEFAULT_OLLAMA_URL,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "docrag", version, about = "Question answering over local documents")]
struct Cli {
    /// Directory containing the source documents
    #[arg(long, global = true, default_value = "./documents")]
    dir: PathBuf,

    /// Where the index data lives (default: <dir>/.docrag)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Base URL of the Ollama server
    #[arg(long, global = true, default_value = DEFAULT_OLLAMA_URL)]
    ollama_url: String,

    /// Embedding model
    #[arg(long, global = true, default_value = DEFAULT_EMBED_MODEL)]
    embed_model: String,

    /// Answer generation model
    #[arg(long, global = true, default_value = DEFAULT_LLM_MODEL)]
    llm_model: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Index new and changed documents
    Index {
        /// Reprocess every document, ignoring the fingerprint cache
        #[arg(long)]
        full: bool,
    },
    /// Ask a question against the indexed documents
    Query {
        text: String,
        /// Number of chunks to retrieve as context
        #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },
    /// Delete one source document from the index
    Delete { source: String },
    /// Remove all indexed data
    Clear,
    /// List indexed source documents
    List,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| cli.dir.join(".docrag"));

    let store = open_store(&data_dir).await;
    let embedder = Arc::new(OllamaEmbedder::new(&cli.ollama_url, &cli.embed_model));

    match cli.command {
        Command::Index { full } => {
            let mut coordinator = coordinator(&cli, &data_dir, embedder, store).await?;
            let stats = coordinator.run_pass(full).await?;

            if stats.no_changes {
                println!("No changes detected.");
            } else {
                println!(
                    "Indexed {} documents ({} chunks) in {} ms.",
                    stats.indexed_files, stats.chunks, stats.time_ms
                );
            }
            for skipped in &stats.skipped {
                eprintln!("warning: skipped {}: {}", skipped.path, skipped.reason);
            }
        }
        Command::Query { text, top_k } => {
            let generator = Arc::new(OllamaGenerator::new(&cli.ollama_url, &cli.llm_model));
            let engine = QueryEngine::new(embedder, store, generator);

            let response = engine
                .answer(&text, top_k)
                .await
                .context("query failed")?;

            println!("Answer: {}", response.answer.trim());
            println!("\nSources:");
            for hit in &response.sources {
                println!("- {} (score: {:.2})", hit.source, hit.score);
            }
        }
        Command::Delete { ref source } => {
            let mut coordinator = coordinator(&cli, &data_dir, embedder, store).await?;
            let removed = coordinator.delete_source(source).await?;
            if removed == 0 {
                println!("No indexed records found for {source}.");
            } else {
                println!("Deleted {source} ({removed} records).");
            }
        }
        Command::Clear => {
            let mut coordinator = coordinator(&cli, &data_dir, embedder, store).await?;
            coordinator.clear().await?;
            println!("Index cleared.");
        }
        Command::List => {
            let coordinator = coordinator(&cli, &data_dir, embedder, store).await?;
            let sources = coordinator.list_sources().await?;
            if sources.is_empty() {
                println!("No documents have been indexed yet.");
            } else {
                println!("Indexed documents:");
                for source in sources {
                    println!("- {source}");
                }
            }
        }
    }

    Ok(())
}

/// Open the persistent vector store, degrading to "unavailable" (with a
/// warning) if its snapshot cannot be used.
async fn open_store(data_dir: &Path) -> Option<Arc<dyn VectorStore>> {
    match JsonVectorStore::open(data_dir.join("vectors.json")).await {
        Ok(store) => Some(Arc::new(store)),
        Err(e) => {
            log::warn!("Vector store unavailable: {e}");
            None
        }
    }
}

async fn coordinator(
    cli: &Cli,
    data_dir: &Path,
    embedder: Arc<OllamaEmbedder>,
    store: Option<Arc<dyn VectorStore>>,
) -> anyhow::Result<IndexCoordinator> {
    let chunker = TextChunker::new(ChunkerConfig::for_documents())?;
    let coordinator = IndexCoordinator::new(
        &cli.dir,
        data_dir,
        chunker,
        ExtractorRegistry::with_defaults(),
        embedder,
        store,
    )
    .await
    .with_context(|| format!("cannot index {}", cli.dir.display()))?;
    Ok(coordinator)
}
