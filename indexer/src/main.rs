use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use docindex_core::corpus::discover;
use docindex_core::persist::FileStore;
use docindex_core::sled_store::SledStore;
use docindex_core::{EngineOptions, IndexEngine, IndexStore};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and incrementally update a TF-IDF inverted index over text files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    /// bincode files in a directory
    File,
    /// sled embedded database
    Sled,
}

#[derive(Subcommand)]
enum Commands {
    /// Index the files reachable from the roots listed in a source file
    Index {
        /// File listing one root path (file or directory) per line
        #[arg(long)]
        sources: PathBuf,
        /// Index store location
        #[arg(long, default_value = "./index")]
        store: PathBuf,
        #[arg(long, value_enum, default_value_t = Backend::File)]
        backend: Backend,
        /// Drop zero-count postings instead of keeping them at tf 0
        #[arg(long, default_value_t = false)]
        prune_empty_postings: bool,
    },
    /// Print a JSON summary of the stored index
    Stats {
        #[arg(long, default_value = "./index")]
        store: PathBuf,
        #[arg(long, value_enum, default_value_t = Backend::File)]
        backend: Backend,
    },
}

#[derive(Serialize)]
struct Stats {
    terms: usize,
    documents: usize,
    postings: usize,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Index { sources, store, backend, prune_empty_postings } => {
            let options = EngineOptions { prune_empty_postings };
            run_index(&sources, open_store(&store, backend)?, options)
        }
        Commands::Stats { store, backend } => print_stats(open_store(&store, backend)?),
    }
}

fn open_store(path: &Path, backend: Backend) -> Result<Box<dyn IndexStore>> {
    Ok(match backend {
        Backend::File => Box::new(FileStore::open(path)?),
        Backend::Sled => Box::new(SledStore::open(path)?),
    })
}

fn run_index(sources: &Path, store: Box<dyn IndexStore>, options: EngineOptions) -> Result<()> {
    let files = discover(sources);
    let engine = IndexEngine::with_options(store, options);
    let summary = engine.process(&files)?;
    for failure in &summary.failures {
        tracing::warn!(path = %failure.path, error = %failure.error, "document skipped");
    }
    tracing::info!(
        terms = summary.terms,
        documents = summary.documents,
        files = summary.files_processed,
        failed = summary.failures.len(),
        "index run complete"
    );
    Ok(())
}

fn print_stats(store: Box<dyn IndexStore>) -> Result<()> {
    let engine = IndexEngine::new(store);
    let ctx = engine.load_context()?;
    let stats = Stats {
        terms: ctx.index.len(),
        documents: ctx.lengths.len(),
        postings: ctx.index.terms.values().map(|s| s.document_frequency()).sum(),
    };
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
