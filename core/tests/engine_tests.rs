use docindex_core::engine::{run_pipeline, EngineOptions};
use docindex_core::tokenizer::MAX_TOKEN_LEN;
use docindex_core::{FsDocument, IndexContext, IndexEngine, IndexStore, MemoryStore, SourceDocument};
use std::fs;
use std::io::{self, BufRead, Cursor};
use std::path::Path;
use tempfile::tempdir;

const EPS: f64 = 1e-12;

fn write(dir: &Path, name: &str, text: &str) -> FsDocument {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    FsDocument::new(path)
}

fn loaded(store: &MemoryStore) -> IndexContext {
    IndexEngine::new(store.clone()).load_context().unwrap()
}

#[test]
fn first_run_computes_weights() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a.txt", "apple banana apple");
    let b = write(dir.path(), "b.txt", "banana cherry");
    let store = MemoryStore::new();

    let summary = IndexEngine::new(store.clone()).process(&[a.clone(), b.clone()]).unwrap();
    assert_eq!(summary.terms, 3);
    assert_eq!(summary.documents, 2);
    assert_eq!(summary.files_processed, 2);
    assert!(summary.failures.is_empty());

    let ctx = loaded(&store);
    assert_eq!(ctx.lengths[a.path()], 3);
    assert_eq!(ctx.lengths[b.path()], 2);

    let apple = ctx.index.get("apple").unwrap();
    assert!((apple.idf - 2f64.ln()).abs() < EPS);
    let p = &apple.documents[a.path()];
    assert!((p.tf - 2.0 / 3.0).abs() < EPS);
    assert!((p.tf_idf - 2.0 / 3.0 * 2f64.ln()).abs() < EPS);

    // in every document: idf 0
    let banana = ctx.index.get("banana").unwrap();
    assert_eq!(banana.idf, 0.0);
    assert_eq!(banana.documents[b.path()].tf_idf, 0.0);
}

#[test]
fn normalized_frequency_and_tf_idf_match_formula() {
    let dir = tempdir().unwrap();
    // 10 tokens, "x" three times
    let a = write(dir.path(), "a.txt", "x y z x w v\nu x t s");
    let b = write(dir.path(), "b.txt", "x");
    let c = write(dir.path(), "c.txt", "other");
    let d = write(dir.path(), "d.txt", "words");
    let store = MemoryStore::new();
    IndexEngine::new(store.clone()).process(&[a.clone(), b, c, d]).unwrap();

    let ctx = loaded(&store);
    let x = ctx.index.get("x").unwrap();
    assert!((x.idf - 0.6931).abs() < 1e-4);
    let p = &x.documents[a.path()];
    assert!((p.tf - 0.3).abs() < EPS);
    assert!((p.tf_idf - 0.2079).abs() < 1e-4);
}

#[test]
fn second_run_on_unchanged_corpus_is_identical() {
    let dir = tempdir().unwrap();
    let files = vec![
        write(dir.path(), "a.txt", "one two three two\nthree three"),
        write(dir.path(), "b.txt", "three four"),
        write(dir.path(), "c.txt", "seven"),
    ];
    let store = MemoryStore::new();
    let engine = IndexEngine::new(store.clone());

    engine.process(&files).unwrap();
    let first = store.load_index().unwrap();
    let first_lengths = store.load_document_lengths().unwrap();
    engine.process(&files).unwrap();

    assert_eq!(store.load_index().unwrap(), first);
    assert_eq!(store.load_document_lengths().unwrap(), first_lengths);
}

#[test]
fn documents_left_out_keep_their_weights() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a.txt", "apple banana apple");
    let b = write(dir.path(), "b.txt", "banana cherry");
    let store = MemoryStore::new();
    let engine = IndexEngine::new(store.clone());
    engine.process(&[a.clone(), b.clone()]).unwrap();
    let before = loaded(&store);

    fs::write(a.file_path(), "apple date").unwrap();
    let summary = engine.process(&[a.clone()]).unwrap();
    assert_eq!(summary.files_processed, 1);
    assert_eq!(summary.terms, 4);

    let ctx = loaded(&store);
    // B untouched: same length, same normalized frequencies
    assert_eq!(ctx.lengths[b.path()], 2);
    for word in ["banana", "cherry"] {
        assert_eq!(
            ctx.index.posting(word, b.path()).unwrap().tf,
            before.index.posting(word, b.path()).unwrap().tf
        );
    }

    // A recounted
    assert_eq!(ctx.lengths[a.path()], 2);
    assert_eq!(ctx.index.posting("apple", a.path()).unwrap().tf, 0.5);
    assert_eq!(ctx.index.posting("date", a.path()).unwrap().tf, 0.5);
    assert_eq!(ctx.index.posting("banana", a.path()).unwrap().tf, 0.0);

    // idf over one processed file, df from posting maps
    assert_eq!(ctx.index.get("apple").unwrap().idf, 0.0);
    assert_eq!(ctx.index.get("cherry").unwrap().idf, 0.0);
    let banana = ctx.index.get("banana").unwrap();
    assert_eq!(banana.document_frequency(), 2);
    assert!((banana.idf - 0.5f64.ln()).abs() < EPS);
    let p = &banana.documents[b.path()];
    assert!((p.tf_idf - 0.5 * 0.5f64.ln()).abs() < EPS);
}

#[test]
fn term_only_in_omitted_document_still_counts() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a.txt", "shared");
    let b = write(dir.path(), "b.txt", "shared only_b");
    let c = write(dir.path(), "c.txt", "shared");
    let store = MemoryStore::new();
    let engine = IndexEngine::new(store.clone());
    engine.process(&[a.clone(), b.clone(), c.clone()]).unwrap();
    engine.process(&[a, c]).unwrap();

    let ctx = loaded(&store);
    let only_b = ctx.index.get("only_b").unwrap();
    assert_eq!(only_b.document_frequency(), 1);
    assert!((only_b.idf - 2f64.ln()).abs() < EPS);
    assert_eq!(only_b.documents[b.path()].tf, 0.5);
}

#[test]
fn unreadable_file_is_skipped_and_zeroed() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a.txt", "alpha beta");
    let b = write(dir.path(), "b.txt", "beta gamma gamma");
    let store = MemoryStore::new();
    let engine = IndexEngine::new(store.clone());
    engine.process(&[a.clone(), b.clone()]).unwrap();

    fs::remove_file(b.file_path()).unwrap();
    let summary = engine.process(&[a.clone(), b.clone()]).unwrap();
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].path, b.path());

    let ctx = loaded(&store);
    assert_eq!(ctx.index.posting("gamma", b.path()).unwrap().tf, 0.0);
    assert_eq!(ctx.index.posting("beta", b.path()).unwrap().tf, 0.0);
    assert_eq!(ctx.index.posting("alpha", a.path()).unwrap().tf, 0.5);
    // length from the last successful scan is kept
    assert_eq!(ctx.lengths[b.path()], 3);
}

#[test]
fn long_tokens_are_not_counted() {
    let dir = tempdir().unwrap();
    let kept = "k".repeat(MAX_TOKEN_LEN - 1);
    let dropped = "d".repeat(MAX_TOKEN_LEN);
    let a = write(dir.path(), "a.txt", &format!("{kept} {dropped} word"));
    let store = MemoryStore::new();
    IndexEngine::new(store.clone()).process(&[a.clone()]).unwrap();

    let ctx = loaded(&store);
    assert_eq!(ctx.lengths[a.path()], 2);
    assert!(ctx.index.get(&kept).is_some());
    assert!(ctx.index.get(&dropped).is_none());
}

#[test]
fn empty_fields_count_toward_length() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a.txt", "a  b\n\nc");
    let store = MemoryStore::new();
    IndexEngine::new(store.clone()).process(&[a.clone()]).unwrap();

    let ctx = loaded(&store);
    assert_eq!(ctx.lengths[a.path()], 5);
    assert!((ctx.index.posting("", a.path()).unwrap().tf - 0.4).abs() < EPS);
    assert!((ctx.index.posting("a", a.path()).unwrap().tf - 0.2).abs() < EPS);
}

#[test]
fn latin1_file_is_indexed_not_skipped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("latin1.txt");
    fs::write(&path, b"caf\xe9 menu menu").unwrap();
    let doc = FsDocument::new(&path);
    let store = MemoryStore::new();
    let summary = IndexEngine::new(store.clone()).process(&[doc.clone()]).unwrap();
    assert!(summary.failures.is_empty());
    assert_eq!(summary.terms, 2);

    let ctx = loaded(&store);
    assert_eq!(ctx.lengths[doc.path()], 3);
    assert!(ctx.index.get("caf\u{FFFD}").is_some());
    assert!((ctx.index.posting("menu", doc.path()).unwrap().tf - 2.0 / 3.0).abs() < EPS);
}

#[test]
fn empty_file_list_leaves_store_untouched() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a.txt", "some text");
    let store = MemoryStore::new();
    let engine = IndexEngine::new(store.clone());
    engine.process(&[a]).unwrap();
    let before = store.load_index().unwrap();

    let none: Vec<FsDocument> = Vec::new();
    let summary = engine.process(&none).unwrap();
    assert_eq!(summary.terms, 2);
    assert_eq!(summary.files_processed, 0);
    assert_eq!(store.load_index().unwrap(), before);
}

struct Inline {
    path: &'static str,
    text: Option<&'static str>,
}

impl SourceDocument for Inline {
    fn path(&self) -> &str { self.path }

    fn open(&self) -> io::Result<Box<dyn BufRead + '_>> {
        match self.text {
            Some(text) => Ok(Box::new(Cursor::new(text.as_bytes()))),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "gone")),
        }
    }
}

#[test]
fn pruning_drops_stale_postings() {
    let run1 = [Inline { path: "/a", text: Some("old kept") }, Inline { path: "/b", text: Some("kept") }];
    let out = run_pipeline(IndexContext::default(), &run1, EngineOptions::default()).unwrap();

    let run2 = [Inline { path: "/a", text: Some("kept") }, Inline { path: "/b", text: None }];
    let kept = run_pipeline(out.context.clone(), &run2, EngineOptions::default()).unwrap();
    assert_eq!(kept.context.index.posting("old", "/a").unwrap().tf, 0.0);
    assert_eq!(kept.failures.len(), 1);

    let options = EngineOptions { prune_empty_postings: true };
    let pruned = run_pipeline(out.context, &run2, options).unwrap();
    assert!(pruned.context.index.get("old").is_none());
    let stat = pruned.context.index.get("kept").unwrap();
    assert_eq!(stat.document_frequency(), 1);
    assert_eq!(stat.documents["/a"].tf, 1.0);
    assert!((stat.idf - 2f64.ln()).abs() < 1e-12);
}
