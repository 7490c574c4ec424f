//! Incremental TF-IDF inverted index over plain-text files.

pub mod assemble;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod index;
pub mod persist;
pub mod scanner;
pub mod sled_store;
pub mod store;
pub mod tfidf;
pub mod tokenizer;

pub use engine::{EngineOptions, IndexEngine, RunSummary};
pub use error::IndexError;
pub use index::{
    DocPath, DocumentDetails, DocumentLengths, IndexContext, IndexRecord, InvertedIndex, Posting,
    Statistic,
};
pub use scanner::{FsDocument, ScanFailure, SourceDocument};
pub use store::{IndexStore, MemoryStore};
