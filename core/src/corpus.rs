//! Discovery of the plain-text files to index from a list of root paths.

use crate::scanner::FsDocument;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Read root paths from `source_list`, one per line. Blank lines are ignored.
pub fn read_source_list(source_list: &Path) -> io::Result<Vec<PathBuf>> {
    let reader = BufReader::new(File::open(source_list)?);
    let mut roots = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            roots.push(PathBuf::from(line));
        }
    }
    Ok(roots)
}

/// Case-insensitive `.txt` extension check.
pub fn has_txt_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("txt"))
}

/// Walk every root, returning files in a deterministic order.
///
/// A root naming a file is always included. Files found below a directory
/// root are included only when `is_indexable` accepts them. Roots that do
/// not exist are skipped.
pub fn collect_indexable(roots: &[PathBuf], is_indexable: fn(&Path) -> bool) -> Vec<FsDocument> {
    let mut files = Vec::new();
    for root in roots {
        let root = match std::path::absolute(root) {
            Ok(p) => p,
            Err(err) => {
                tracing::warn!(root = %root.display(), error = %err, "cannot resolve source root");
                continue;
            }
        };
        if !root.exists() {
            tracing::warn!(root = %root.display(), "source root does not exist, skipping");
            continue;
        }
        let walker = WalkDir::new(&root).follow_links(true).sort_by_file_name();
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.depth() == 0 || is_indexable(entry.path()) {
                files.push(FsDocument::new(entry.path()));
            }
        }
    }
    files
}

/// Resolve the files named by `source_list`.
///
/// An unreadable source list is logged as fatal and yields no files; the
/// caller decides what an empty run means.
pub fn discover(source_list: &Path) -> Vec<FsDocument> {
    match read_source_list(source_list) {
        Ok(roots) => {
            let files = collect_indexable(&roots, has_txt_extension);
            tracing::info!(roots = roots.len(), files = files.len(), "found indexable files");
            files
        }
        Err(err) => {
            tracing::error!(fatal = true, source_list = %source_list.display(), error = %err, "unable to open the source list");
            Vec::new()
        }
    }
}
