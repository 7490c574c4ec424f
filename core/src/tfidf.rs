//! Weight calculators for one indexing run.
//!
//! Each phase takes the run's [`IndexContext`] by value and hands back the
//! transformed context. Postings are mutated in place; the owned signature
//! keeps every phase testable on its own.

use crate::error::IndexError;
use crate::index::IndexContext;

/// Turn persisted (normalized) term frequencies back into raw counts using
/// the previously stored document lengths.
///
/// Must run before any document is rescanned so that documents left out of
/// this run keep counts that can be renormalized later. Documents without a
/// length record are left untouched.
pub fn denormalize(mut ctx: IndexContext) -> IndexContext {
    let IndexContext { index, lengths } = &mut ctx;
    for (_, posting) in index.postings_mut() {
        if let Some(&length) = lengths.get(&posting.path) {
            // counts are integral; rounding drops the error picked up by tf = count / length
            posting.tf = (posting.tf * length as f64).round();
        }
    }
    tracing::debug!(terms = ctx.index.len(), "denormalized term frequencies");
    ctx
}

/// Recompute `idf = ln(total_documents / df)` for every term.
pub fn compute_idf(mut ctx: IndexContext, total_documents: usize) -> Result<IndexContext, IndexError> {
    if total_documents == 0 {
        return Err(IndexError::EmptyCorpus);
    }
    let n = total_documents as f64;
    for stat in ctx.index.terms.values_mut() {
        let df = stat.document_frequency();
        if df == 0 {
            return Err(IndexError::EmptyPostings { word: stat.word.clone() });
        }
        stat.idf = (n / df as f64).ln();
    }
    tracing::debug!(terms = ctx.index.len(), total_documents, "computed idf");
    Ok(ctx)
}

/// Divide every raw count by its document's length.
///
/// A posting whose document has no length record was never denormalized
/// and is left as is. A zero count stays zero whatever the length.
pub fn normalize(mut ctx: IndexContext) -> Result<IndexContext, IndexError> {
    for stat in ctx.index.terms.values_mut() {
        for posting in stat.documents.values_mut() {
            match ctx.lengths.get(&posting.path) {
                None => {}
                Some(_) if posting.tf == 0.0 => {}
                Some(0) => {
                    return Err(IndexError::ZeroLength {
                        path: posting.path.clone(),
                        word: stat.word.clone(),
                        tf: posting.tf,
                    })
                }
                Some(&length) => posting.tf /= length as f64,
            }
        }
    }
    tracing::debug!(documents = ctx.lengths.len(), "normalized term frequencies");
    Ok(ctx)
}

pub fn compute_tf_idf(mut ctx: IndexContext) -> IndexContext {
    for (idf, posting) in ctx.index.postings_mut() {
        posting.tf_idf = posting.tf * idf;
    }
    ctx
}

/// Drop postings whose raw count is zero, then any term left without postings.
///
/// Only meaningful between scanning and normalization, while `tf` holds raw counts.
pub fn prune_empty_postings(mut ctx: IndexContext) -> IndexContext {
    let mut pruned = 0usize;
    for stat in ctx.index.terms.values_mut() {
        let before = stat.documents.len();
        stat.documents.retain(|_, p| p.tf != 0.0);
        pruned += before - stat.documents.len();
    }
    let terms_before = ctx.index.len();
    ctx.index.terms.retain(|_, stat| !stat.documents.is_empty());
    tracing::debug!(postings = pruned, terms = terms_before - ctx.index.len(), "pruned empty postings");
    ctx
}
