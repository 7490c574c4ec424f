use crate::index::{DocumentDetails, IndexRecord};
use crate::store::IndexStore;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, create_dir_all, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub terms: usize,
    pub documents: usize,
    pub updated_at: String,
    pub version: u32,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn index(&self) -> PathBuf { self.root.join("index.bin") }
    fn document_details(&self) -> PathBuf { self.root.join("document_details.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }
    fn lock(&self) -> PathBuf { self.root.join("index.lock") }
}

/// Exclusive claim on an index directory, released on drop.
struct DirLock {
    path: PathBuf,
}

impl DirLock {
    fn acquire(path: PathBuf) -> Result<Self> {
        let mut f = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .with_context(|| {
                format!("index is locked by another run; remove {} if no run is active", path.display())
            })?;
        writeln!(f, "{}", std::process::id())?;
        Ok(Self { path })
    }
}

impl Drop for DirLock {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to release index lock");
        }
    }
}

/// Index stored as bincode files in a directory, with a JSON summary alongside.
pub struct FileStore {
    paths: IndexPaths,
    _lock: DirLock,
}

impl FileStore {
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let paths = IndexPaths::new(root);
        create_dir_all(&paths.root)?;
        let lock = DirLock::acquire(paths.lock())?;
        Ok(Self { paths, _lock: lock })
    }

    pub fn paths(&self) -> &IndexPaths { &self.paths }
}

impl IndexStore for FileStore {
    fn load_index(&self) -> Result<Vec<IndexRecord>> {
        read_bincode(&self.paths.index())
    }

    fn save_index(&self, records: &[IndexRecord]) -> Result<()> {
        write_bincode(&self.paths.index(), records)?;
        let documents = read_bincode::<DocumentDetails>(&self.paths.document_details())?.len();
        save_meta(&self.paths, records.len(), documents)
    }

    fn load_document_lengths(&self) -> Result<Vec<DocumentDetails>> {
        read_bincode(&self.paths.document_details())
    }

    fn replace_document_lengths(&self, details: &[DocumentDetails]) -> Result<()> {
        let path = self.paths.document_details();
        if path.exists() {
            fs::remove_file(&path)?;
        }
        write_bincode(&path, details)?;
        let terms = match load_meta(&self.paths) {
            Ok(meta) => meta.terms,
            Err(_) => read_bincode::<IndexRecord>(&self.paths.index())?.len(),
        };
        save_meta(&self.paths, terms, details.len())
    }
}

/// Missing files read as empty: nothing has been indexed yet.
fn read_bincode<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut f = File::open(path)?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let items = bincode::deserialize(&buf).with_context(|| format!("corrupt index file {}", path.display()))?;
    Ok(items)
}

fn write_bincode<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut f = File::create(path)?;
    let bytes = bincode::serialize(value)?;
    f.write_all(&bytes)?;
    Ok(())
}

fn save_meta(paths: &IndexPaths, terms: usize, documents: usize) -> Result<()> {
    let meta = MetaFile {
        terms,
        documents,
        updated_at: time::OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_else(|_| "".into()),
        version: FORMAT_VERSION,
    };
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(&meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta())?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}
