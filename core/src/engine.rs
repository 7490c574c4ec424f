use crate::assemble::{assemble, disassemble, lengths_from_records, lengths_to_records};
use crate::error::IndexError;
use crate::index::IndexContext;
use crate::scanner::{scan, ScanFailure, ScanOutcome, SourceDocument};
use crate::store::IndexStore;
use crate::tfidf;
use anyhow::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    /// Remove postings left with a zero count (and terms left without
    /// postings) instead of keeping them at tf 0.
    pub prune_empty_postings: bool,
}

#[derive(Debug)]
pub struct PipelineOutput {
    pub context: IndexContext,
    pub failures: Vec<ScanFailure>,
}

/// One full in-memory run over `files`:
/// denormalize, rescan, idf, normalize, tf-idf.
pub fn run_pipeline<D: SourceDocument>(
    ctx: IndexContext,
    files: &[D],
    options: EngineOptions,
) -> Result<PipelineOutput, IndexError> {
    let ctx = tfidf::denormalize(ctx);
    let ScanOutcome { context, failures } = scan(ctx, files);
    let ctx = if options.prune_empty_postings { tfidf::prune_empty_postings(context) } else { context };
    let ctx = tfidf::compute_idf(ctx, files.len())?;
    let ctx = tfidf::normalize(ctx)?;
    let ctx = tfidf::compute_tf_idf(ctx);
    Ok(PipelineOutput { context: ctx, failures })
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Terms in the index after the run.
    pub terms: usize,
    /// Documents with a stored length after the run.
    pub documents: usize,
    pub files_processed: usize,
    pub failures: Vec<ScanFailure>,
}

/// Loads the stored index, runs the pipeline and writes the result back.
///
/// Not reentrant: two runs against the same store would each rewrite the
/// index from the same snapshot.
pub struct IndexEngine<S: IndexStore> {
    store: S,
    options: EngineOptions,
}

impl<S: IndexStore> IndexEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store, options: EngineOptions::default() }
    }

    pub fn with_options(store: S, options: EngineOptions) -> Self {
        Self { store, options }
    }

    pub fn store(&self) -> &S { &self.store }

    pub fn load_context(&self) -> Result<IndexContext> {
        let index = disassemble(self.store.load_index()?);
        let lengths = lengths_from_records(self.store.load_document_lengths()?);
        Ok(IndexContext::new(index, lengths))
    }

    pub fn process<D: SourceDocument>(&self, files: &[D]) -> Result<RunSummary> {
        let ctx = self.load_context()?;
        tracing::info!(terms = ctx.index.len(), documents = ctx.lengths.len(), "loaded stored index");

        if files.is_empty() {
            tracing::warn!("no indexable files, stored index left unchanged");
            return Ok(RunSummary {
                terms: ctx.index.len(),
                documents: ctx.lengths.len(),
                files_processed: 0,
                failures: Vec::new(),
            });
        }

        let PipelineOutput { context, failures } = run_pipeline(ctx, files, self.options)?;
        tracing::info!(terms = context.index.len(), failed = failures.len(), "indexed words");

        tracing::info!("storing index");
        self.store.save_index(&assemble(&context.index))?;
        self.store.replace_document_lengths(&lengths_to_records(&context.lengths))?;

        Ok(RunSummary {
            terms: context.index.len(),
            documents: context.lengths.len(),
            files_processed: files.len(),
            failures,
        })
    }
}
