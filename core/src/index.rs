use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Document identifier: the absolute path of the source file.
pub type DocPath = String;

/// Document path -> total qualifying token count, as last computed.
pub type DocumentLengths = BTreeMap<DocPath, u64>;

/// One document's entry under a term.
///
/// `tf` holds a raw occurrence count while a run is in flight and the
/// normalized frequency (count / document length) once it is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub path: DocPath,
    pub tf: f64,
    pub tf_idf: f64,
}

impl Posting {
    pub fn new(path: impl Into<DocPath>) -> Self {
        Self { path: path.into(), tf: 0.0, tf_idf: 0.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistic {
    pub word: String,
    pub idf: f64,
    pub documents: BTreeMap<DocPath, Posting>, // at most one posting per document
}

impl Statistic {
    pub fn new(word: impl Into<String>) -> Self {
        Self { word: word.into(), idf: 0.0, documents: BTreeMap::new() }
    }

    /// Document frequency: number of documents recorded for this term.
    pub fn document_frequency(&self) -> usize {
        self.documents.len()
    }
}

/// The working index: term -> statistic, ordered by term.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvertedIndex {
    pub terms: BTreeMap<String, Statistic>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    pub fn get(&self, word: &str) -> Option<&Statistic> {
        self.terms.get(word)
    }

    pub fn posting(&self, word: &str, path: &str) -> Option<&Posting> {
        self.terms.get(word)?.documents.get(path)
    }

    /// Posting for `path` under `word`, creating the term (idf 0) and the
    /// posting (tf 0) when absent.
    pub fn posting_mut(&mut self, word: &str, path: &str) -> &mut Posting {
        self.terms
            .entry(word.to_owned())
            .or_insert_with(|| Statistic::new(word))
            .documents
            .entry(path.to_owned())
            .or_insert_with(|| Posting::new(path))
    }

    /// Zero every term frequency recorded for `path` without removing the postings.
    pub fn reset_document(&mut self, path: &str) {
        for stat in self.terms.values_mut() {
            if let Some(posting) = stat.documents.get_mut(path) {
                posting.tf = 0.0;
            }
        }
    }

    /// Every posting paired with its term's idf.
    pub fn postings_mut(&mut self) -> impl Iterator<Item = (f64, &mut Posting)> {
        self.terms
            .values_mut()
            .flat_map(|stat| {
                let idf = stat.idf;
                stat.documents.values_mut().map(move |p| (idf, p))
            })
    }

    /// Number of distinct documents with at least one posting.
    pub fn document_count(&self) -> usize {
        let mut paths: Vec<&str> = self
            .terms
            .values()
            .flat_map(|s| s.documents.keys().map(String::as_str))
            .collect();
        paths.sort_unstable();
        paths.dedup();
        paths.len()
    }
}

/// Mutable state threaded through every phase of one indexing run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexContext {
    pub index: InvertedIndex,
    pub lengths: DocumentLengths,
}

impl IndexContext {
    pub fn new(index: InvertedIndex, lengths: DocumentLengths) -> Self {
        Self { index, lengths }
    }
}

/// Persisted form of one term: its idf and the grouped posting list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRecord {
    pub word: String,
    pub idf: f64,
    pub documents: Vec<Posting>,
}

/// Persisted document length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDetails {
    pub path: DocPath,
    pub length: u64,
}
