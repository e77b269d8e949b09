//! Diff synchronizer tests: cache mutations, failure isolation, and the
//! post-sync re-process

mod common;

use common::*;
use kashi::storage::MemoryLineStore;
use kashi::{KashiError, LineStore, SyncOperation};
use std::sync::Arc;

/// Engine over plain fallback tokenization: every line becomes one segment,
/// which keeps the store interactions easy to reason about.
fn plain_engine(store: Arc<dyn LineStore>) -> (kashi::LyricsEngine, Arc<FakeTranslator>) {
    let translator = Arc::new(FakeTranslator::new());
    let engine = engine(
        Arc::new(FakeAnalyzer::new()),
        Arc::new(FakeLexicon::new()),
        translator.clone(),
        store,
    );
    (engine, translator)
}

#[tokio::test]
async fn test_identical_documents_are_a_no_op() {
    let store = Arc::new(MemoryLineStore::new());
    let (engine, _) = plain_engine(store.clone());

    engine.process("A\nB\nC").await.unwrap();
    let before = store.len().await;

    let outcome = engine.sync("A\nB\nC", "A\nB\nC").await.unwrap();

    assert_eq!(outcome.report.deleted, 0);
    assert_eq!(outcome.report.inserted, 0);
    assert_eq!(outcome.report.failed, 0);
    assert!(outcome.report.details.is_empty());
    assert_eq!(store.len().await, before);
}

#[tokio::test]
async fn test_middle_line_replacement() {
    let store = Arc::new(MemoryLineStore::new());
    let (engine, _) = plain_engine(store.clone());

    engine.process("A\nB\nC").await.unwrap();

    let outcome = engine.sync("A\nB\nC", "A\nX\nC").await.unwrap();

    assert_eq!(outcome.report.deleted, 1);
    assert_eq!(outcome.report.inserted, 1);
    assert_eq!(outcome.report.failed, 0);

    assert!(store.get_by_line("B").await.unwrap().is_none());
    assert!(store.get_by_line("X").await.unwrap().is_some());
    assert!(store.get_by_line("A").await.unwrap().is_some());
    assert!(store.get_by_line("C").await.unwrap().is_some());

    // returned document reflects the modified lyrics
    let lines: Vec<&str> = outcome
        .document
        .translated_lines
        .iter()
        .map(|(line, _)| line.as_str())
        .collect();
    assert_eq!(lines, vec!["A", "X", "C"]);
}

#[tokio::test]
async fn test_disjoint_documents_delete_and_insert_everything() {
    let store = Arc::new(MemoryLineStore::new());
    let (engine, _) = plain_engine(store.clone());

    let outcome = engine.sync("A\nB", "X\nY\nZ").await.unwrap();

    // deletes are best-effort by key: uncached originals still count
    assert_eq!(outcome.report.deleted, 2);
    assert_eq!(outcome.report.inserted, 3);
    assert_eq!(outcome.report.failed, 0);
    assert_eq!(store.len().await, 3);
}

#[tokio::test]
async fn test_existing_lines_are_not_reinserted() {
    let store = Arc::new(MemoryLineStore::new());
    let (engine, translator) = plain_engine(store.clone());

    // "new" is already cached from an earlier document
    engine.process("new").await.unwrap();

    let outcome = engine.sync("old", "old\nnew").await.unwrap();

    assert_eq!(outcome.report.inserted, 0);
    assert_eq!(outcome.report.deleted, 0);
    assert_eq!(outcome.report.failed, 0);
    // non-Japanese lines never reach the translator at all
    assert_eq!(translator.calls(), 0);
}

#[tokio::test]
async fn test_failing_delete_does_not_abort_the_batch() {
    let store = Arc::new(FlakyLineStore::new().fail_delete_of("B"));
    let (engine, _) = plain_engine(store.clone());

    engine.process("A\nB\nC").await.unwrap();

    // everything removed: three deletes, one of which fails
    let outcome = engine.sync("A\nB\nC", "X").await.unwrap();

    assert_eq!(outcome.report.deleted, 2);
    assert_eq!(outcome.report.inserted, 1);
    assert_eq!(outcome.report.failed, 1);
    assert_eq!(outcome.report.details.len(), 1);

    let failure = &outcome.report.details[0];
    assert_eq!(failure.operation, SyncOperation::Delete);
    assert_eq!(failure.line, "B");
    assert!(failure.error.contains("injected delete failure"));

    // the other deletes and the insert still went through
    assert!(store.get_by_line("A").await.unwrap().is_none());
    assert!(store.get_by_line("C").await.unwrap().is_none());
    assert!(store.get_by_line("X").await.unwrap().is_some());
}

#[tokio::test]
async fn test_failing_insert_is_recorded_per_line() {
    let store = Arc::new(FlakyLineStore::new().fail_insert_of("Y"));
    let (engine, _) = plain_engine(store.clone());

    let outcome = engine.sync("A", "X\nY").await.unwrap();

    assert_eq!(outcome.report.inserted, 1);
    assert_eq!(outcome.report.failed, 1);
    assert_eq!(outcome.report.details[0].operation, SyncOperation::Insert);
    assert_eq!(outcome.report.details[0].line, "Y");
    assert!(store.get_by_line("X").await.unwrap().is_some());
}

#[tokio::test]
async fn test_returned_document_uses_post_sync_cache() {
    let store = Arc::new(MemoryLineStore::new());
    let (engine, _) = plain_engine(store.clone());

    // X is already cached with a distinctive translation; the sync insert
    // skips it and the re-process must surface the cached text
    store
        .insert(&kashi::CachedLine {
            line: "X".to_string(),
            translation: "cached translation of X".to_string(),
            tokens: vec![],
        })
        .await
        .unwrap();

    engine.process("A\nB\nC").await.unwrap();
    let outcome = engine.sync("A\nB\nC", "A\nX\nC").await.unwrap();

    assert_eq!(outcome.report.inserted, 0);
    assert_eq!(outcome.report.deleted, 1);
    assert_eq!(
        outcome.document.translated_lines[1],
        ("X".to_string(), "cached translation of X".to_string())
    );
}

#[tokio::test]
async fn test_emptying_a_document_deletes_all_lines() {
    let store = Arc::new(MemoryLineStore::new());
    let (engine, _) = plain_engine(store.clone());

    engine.process("A\nB").await.unwrap();
    let outcome = engine.sync("A\nB", "").await.unwrap();

    assert_eq!(outcome.report.deleted, 2);
    assert_eq!(outcome.report.inserted, 0);
    assert!(store.is_empty().await);

    // nothing left to annotate
    assert!(outcome.document.translated_lines.is_empty());
    assert!(outcome.document.word_map.is_empty());
}

#[tokio::test]
async fn test_both_blank_documents_rejected() {
    let store = Arc::new(MemoryLineStore::new());
    let (engine, _) = plain_engine(store);

    let result = engine.sync("  ", "\t").await;
    assert!(matches!(result, Err(KashiError::EmptyInput)));
}

#[tokio::test]
async fn test_sync_normalizes_before_diffing() {
    let store = Arc::new(MemoryLineStore::new());
    let (engine, _) = plain_engine(store.clone());

    // the original document was cached under its normalized key
    engine.process("か\u{3099}き").await.unwrap();
    assert!(store.get_by_line("がき").await.unwrap().is_some());

    // the same line spelled with the precomposed character is no edit
    let outcome = engine.sync("か\u{3099}き", "がき").await.unwrap();
    assert_eq!(outcome.report.deleted, 0);
    assert_eq!(outcome.report.inserted, 0);
}
