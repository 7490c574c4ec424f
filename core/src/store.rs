use crate::index::{DocumentDetails, IndexRecord};
use anyhow::Result;
use parking_lot::RwLock;
use std::sync::Arc;

/// Persistence for the inverted index and the document length table.
pub trait IndexStore {
    fn load_index(&self) -> Result<Vec<IndexRecord>>;

    /// Persist the full index, replacing whatever was stored.
    fn save_index(&self, records: &[IndexRecord]) -> Result<()>;

    fn load_document_lengths(&self) -> Result<Vec<DocumentDetails>>;

    /// Delete every stored length, then insert `details`.
    fn replace_document_lengths(&self, details: &[DocumentDetails]) -> Result<()>;
}

#[derive(Default)]
struct MemoryState {
    index: Vec<IndexRecord>,
    details: Vec<DocumentDetails>,
}

/// Store kept in process memory. Clones share the same state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }
}

impl IndexStore for MemoryStore {
    fn load_index(&self) -> Result<Vec<IndexRecord>> {
        Ok(self.state.read().index.clone())
    }

    fn save_index(&self, records: &[IndexRecord]) -> Result<()> {
        self.state.write().index = records.to_vec();
        Ok(())
    }

    fn load_document_lengths(&self) -> Result<Vec<DocumentDetails>> {
        Ok(self.state.read().details.clone())
    }

    fn replace_document_lengths(&self, details: &[DocumentDetails]) -> Result<()> {
        let mut state = self.state.write();
        state.details.clear();
        state.details.extend_from_slice(details);
        Ok(())
    }
}

impl<S: IndexStore + ?Sized> IndexStore for Box<S> {
    fn load_index(&self) -> Result<Vec<IndexRecord>> { (**self).load_index() }
    fn save_index(&self, records: &[IndexRecord]) -> Result<()> { (**self).save_index(records) }
    fn load_document_lengths(&self) -> Result<Vec<DocumentDetails>> { (**self).load_document_lengths() }
    fn replace_document_lengths(&self, details: &[DocumentDetails]) -> Result<()> {
        (**self).replace_document_lengths(details)
    }
}
