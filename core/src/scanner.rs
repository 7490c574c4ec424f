use crate::index::{IndexContext, InvertedIndex};
use crate::tokenizer::tokenize;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// A document the scanner can (re)count: an identifier plus a line reader.
pub trait SourceDocument {
    /// Absolute path used as the document identifier.
    fn path(&self) -> &str;
    fn open(&self) -> io::Result<Box<dyn BufRead + '_>>;
}

/// A plain-text file on disk.
///
/// The identifier is the absolute form of the path, converted lossily to
/// UTF-8: two paths differing only in non-UTF-8 bytes share an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsDocument {
    path: PathBuf,
    id: String,
}

impl FsDocument {
    /// Relative paths are resolved against the current directory; if that
    /// fails the path is kept as given.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let id = path.to_string_lossy().into_owned();
        Self { path, id }
    }

    pub fn file_path(&self) -> &Path { &self.path }
}

impl SourceDocument for FsDocument {
    fn path(&self) -> &str { &self.id }

    fn open(&self) -> io::Result<Box<dyn BufRead + '_>> {
        let f = File::open(&self.path)?;
        Ok(Box::new(BufReader::new(f)))
    }
}

/// A document that could not be opened or read during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFailure {
    pub path: String,
    pub error: String,
}

#[derive(Debug)]
pub struct ScanOutcome {
    pub context: IndexContext,
    pub failures: Vec<ScanFailure>,
}

/// Recount every document in `files`, in order.
///
/// For each document the previous counts are zeroed, the text is recounted
/// and the new length replaces the stored one. A document that fails to
/// read keeps its postings at zero and its length record is not touched.
pub fn scan<D: SourceDocument>(mut ctx: IndexContext, files: &[D]) -> ScanOutcome {
    let mut failures = Vec::new();
    for file in files {
        let path = file.path();
        ctx.index.reset_document(path);
        match count_document(&mut ctx.index, file) {
            Ok(length) => {
                tracing::trace!(path, length, "scanned document");
                ctx.lengths.insert(path.to_owned(), length);
            }
            Err(err) => {
                tracing::error!(path, error = %err, "failed to read document, skipping");
                // drop whatever was counted before the failure
                ctx.index.reset_document(path);
                failures.push(ScanFailure { path: path.to_owned(), error: err.to_string() });
            }
        }
    }
    tracing::debug!(files = files.len(), failed = failures.len(), "scan complete");
    ScanOutcome { context: ctx, failures }
}

/// Count qualifying tokens of one document into `index`, returning its length.
/// The reader lives only inside this call.
///
/// Lines end at `\n` (a preceding `\r` is dropped too). Bytes that are not
/// valid UTF-8 decode to U+FFFD rather than failing the document.
fn count_document<D: SourceDocument>(index: &mut InvertedIndex, file: &D) -> io::Result<u64> {
    let path = file.path();
    let mut reader = file.open()?;
    let mut length = 0u64;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        let line = String::from_utf8_lossy(&buf);
        for token in tokenize(&line) {
            length += 1;
            index.posting_mut(token, path).tf += 1.0;
        }
    }
    Ok(length)
}
