use crate::index::{DocumentDetails, IndexRecord};
use crate::store::IndexStore;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Index stored in a sled database: one tree keyed by word, one keyed by path.
pub struct SledStore {
    db: sled::Db,
    index: sled::Tree,
    details: sled::Tree,
}

impl SledStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let db = sled::open(path).with_context(|| format!("failed to open sled store at {}", path.display()))?;
        let index = db.open_tree("index")?;
        let details = db.open_tree("document_details")?;
        Ok(Self { db, index, details })
    }

    fn replace_tree<'a, T, I>(&self, tree: &sled::Tree, items: I) -> Result<()>
    where
        T: Serialize + 'a,
        I: IntoIterator<Item = (&'a str, &'a T)>,
    {
        let mut batch = sled::Batch::default();
        for (key, value) in items {
            batch.insert(key.as_bytes(), bincode::serialize(value)?);
        }
        tree.clear()?;
        tree.apply_batch(batch)?;
        self.db.flush()?;
        Ok(())
    }
}

fn read_tree<T: DeserializeOwned>(tree: &sled::Tree) -> Result<Vec<T>> {
    tree.iter()
        .values()
        .map(|value| -> Result<T> { Ok(bincode::deserialize(&value?)?) })
        .collect()
}

impl IndexStore for SledStore {
    fn load_index(&self) -> Result<Vec<IndexRecord>> {
        read_tree(&self.index)
    }

    fn save_index(&self, records: &[IndexRecord]) -> Result<()> {
        self.replace_tree(&self.index, records.iter().map(|r| (r.word.as_str(), r)))
    }

    fn load_document_lengths(&self) -> Result<Vec<DocumentDetails>> {
        read_tree(&self.details)
    }

    fn replace_document_lengths(&self, details: &[DocumentDetails]) -> Result<()> {
        self.replace_tree(&self.details, details.iter().map(|d| (d.path.as_str(), d)))
    }
}
