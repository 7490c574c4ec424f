//! Conversions between persisted records and the working index.

use crate::index::{DocumentDetails, DocumentLengths, IndexRecord, InvertedIndex, Statistic};
use std::collections::BTreeMap;

pub fn disassemble(records: Vec<IndexRecord>) -> InvertedIndex {
    let mut index = InvertedIndex::new();
    for record in records {
        let documents: BTreeMap<_, _> = record
            .documents
            .into_iter()
            .map(|p| (p.path.clone(), p))
            .collect();
        let stat = Statistic { word: record.word.clone(), idf: record.idf, documents };
        index.terms.insert(record.word, stat);
    }
    index
}

/// Records in term order, postings in path order.
pub fn assemble(index: &InvertedIndex) -> Vec<IndexRecord> {
    index
        .terms
        .values()
        .map(|stat| IndexRecord {
            word: stat.word.clone(),
            idf: stat.idf,
            documents: stat.documents.values().cloned().collect(),
        })
        .collect()
}

pub fn lengths_from_records(records: Vec<DocumentDetails>) -> DocumentLengths {
    records.into_iter().map(|d| (d.path, d.length)).collect()
}

pub fn lengths_to_records(lengths: &DocumentLengths) -> Vec<DocumentDetails> {
    lengths
        .iter()
        .map(|(path, &length)| DocumentDetails { path: path.clone(), length })
        .collect()
}
