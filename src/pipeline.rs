//! Pipeline orchestrator: document processing and cache synchronization
//!
//! [`LyricsEngine`] sequences the pipeline: normalize, consult the line
//! cache, tokenize and merge on a miss, translate, persist, and resolve
//! kanji metadata. It also hosts the diff synchronizer, which applies a
//! minimal line-level edit between two document versions to the line store
//! with per-operation failure isolation.

use crate::analyzer::LexicalAnalyzer;
use crate::diff::{diff_lines, DiffTag};
use crate::error::{KashiError, Result};
use crate::kanji::{KanjiResolver, KanjiTable};
use crate::lexicon::Lexicon;
use crate::merger::SegmentMerger;
use crate::resolver::WordResolver;
use crate::storage::LineStore;
use crate::text::{is_japanese, normalize_kana};
use crate::translator::Translator;
use crate::types::{
    AnnotatedDocument, CachedLine, CachedToken, SyncOperation, SyncOutcome, SyncReport, WordMap,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A line processed earlier in the same run, reusable without further
/// collaborator calls
struct MemoizedLine {
    translation: String,
    segments: Vec<String>,
}

/// The full annotation engine over its external collaborators
pub struct LyricsEngine {
    analyzer: Arc<dyn LexicalAnalyzer>,
    translator: Arc<dyn Translator>,
    store: Arc<dyn LineStore>,
    resolver: WordResolver,
    merger: SegmentMerger,
    kanji: KanjiResolver,
}

impl LyricsEngine {
    pub fn new(
        analyzer: Arc<dyn LexicalAnalyzer>,
        lexicon: Arc<dyn Lexicon>,
        translator: Arc<dyn Translator>,
        store: Arc<dyn LineStore>,
        kanji_table: Arc<KanjiTable>,
    ) -> Self {
        let resolver = WordResolver::new(lexicon.clone());
        Self {
            analyzer,
            translator,
            store,
            merger: SegmentMerger::new(resolver.clone()),
            resolver,
            kanji: KanjiResolver::new(kanji_table, lexicon),
        }
    }

    /// Process a full lyrics document into its annotated representation.
    ///
    /// Blank input is rejected before any processing. A collaborator failure
    /// is fatal to the whole call: there is no per-line failure isolation on
    /// this path and no partial result.
    pub async fn process(&self, lyrics: &str) -> Result<AnnotatedDocument> {
        if lyrics.trim().is_empty() {
            return Err(KashiError::EmptyInput);
        }
        self.process_document(lyrics).await
    }

    /// Synchronize the line store from `original` to `modified`, then
    /// re-process the modified document through the updated cache.
    ///
    /// Every store delete/insert is an independent unit of failure: an error
    /// is counted and detailed in the report without aborting the batch.
    pub async fn sync(&self, original: &str, modified: &str) -> Result<SyncOutcome> {
        if original.trim().is_empty() && modified.trim().is_empty() {
            return Err(KashiError::EmptyInput);
        }

        let original_lines = document_lines(original);
        let modified_lines = document_lines(modified);
        let mut report = SyncReport::default();

        for op in diff_lines(&original_lines, &modified_lines) {
            if matches!(op.tag, DiffTag::Delete | DiffTag::Replace) {
                for line in &original_lines[op.original.clone()] {
                    match self.store.delete_by_line(line).await {
                        Ok(()) => report.deleted += 1,
                        Err(e) => {
                            warn!("Sync delete failed, continuing: {e}");
                            report.record_failure(SyncOperation::Delete, line, e.to_string());
                        }
                    }
                }
            }

            if matches!(op.tag, DiffTag::Insert | DiffTag::Replace) {
                for line in &modified_lines[op.modified.clone()] {
                    match self.sync_insert(line).await {
                        Ok(true) => report.inserted += 1,
                        Ok(false) => {} // already cached, skipped
                        Err(e) => {
                            warn!("Sync insert failed, continuing: {e}");
                            report.record_failure(SyncOperation::Insert, line, e.to_string());
                        }
                    }
                }
            }
        }

        info!(
            "Sync applied: {} deleted, {} inserted, {} failed",
            report.deleted, report.inserted, report.failed
        );

        // Re-process end-to-end so the response reflects the post-sync cache
        // state rather than a stale in-memory snapshot.
        let document = if modified.trim().is_empty() {
            AnnotatedDocument::default()
        } else {
            self.process_document(modified).await?
        };

        Ok(SyncOutcome { report, document })
    }

    async fn process_document(&self, lyrics: &str) -> Result<AnnotatedDocument> {
        let lines: Vec<String> = lyrics.split('\n').map(normalize_kana).collect();
        info!("Processing document with {} lines", lines.len());

        let mut word_map = WordMap::new();
        let mut lyric_lines = Vec::with_capacity(lines.len());
        let mut translated_lines = Vec::with_capacity(lines.len());
        let mut memo: HashMap<String, MemoizedLine> = HashMap::new();

        for line in &lines {
            // first-occurrence memoization within this run, independent of
            // the persistent cache
            if let Some(seen) = memo.get(line) {
                lyric_lines.push(seen.segments.clone());
                translated_lines.push((line.clone(), seen.translation.clone()));
                continue;
            }

            let (translation, segments) = match self.store.get_by_line(line).await? {
                Some(cached) => {
                    debug!("Line cache hit");
                    self.restore_cached_line(&cached, &mut word_map).await?
                }
                None => {
                    debug!("Line cache miss");
                    self.process_new_line(line, &mut word_map).await?
                }
            };

            memo.insert(
                line.clone(),
                MemoizedLine {
                    translation: translation.clone(),
                    segments: segments.clone(),
                },
            );
            lyric_lines.push(segments);
            translated_lines.push((line.clone(), translation));
        }

        // kanji come from the raw, pre-normalization text
        let kanji_data = self.kanji.resolve_all(lyrics).await?;

        Ok(AnnotatedDocument {
            lyric_lines,
            word_map,
            kanji_data,
            translated_lines,
        })
    }

    /// Rebuild a line's segments and word-map entries from its cached
    /// compact representation, bypassing the analyzer and the translator.
    async fn restore_cached_line(
        &self,
        cached: &CachedLine,
        word_map: &mut WordMap,
    ) -> Result<(String, Vec<String>)> {
        let mut segments = Vec::with_capacity(cached.tokens.len());
        for token in &cached.tokens {
            let entries = self.resolver.resolve_by_ids(&token.id_seqs).await?;
            word_map.insert(token.segment.clone(), entries);
            segments.push(token.segment.clone());
        }
        Ok((cached.translation.clone(), segments))
    }

    /// Tokenize, merge, translate, and persist a line not yet cached
    async fn process_new_line(
        &self,
        line: &str,
        word_map: &mut WordMap,
    ) -> Result<(String, Vec<String>)> {
        let tokens = self.analyzer.tokenize(line);
        let segments = self.merger.merge_line(&tokens, word_map).await?;

        let translation = if segments.is_empty() || !is_japanese(line) {
            // trivial line: identity translation, no Translator call
            line.to_string()
        } else {
            self.translator.translate(line).await?
        };

        let record = build_cached_line(line, &translation, &segments, word_map);
        self.store.insert(&record).await?;

        Ok((translation, segments))
    }

    /// Process and insert one line during sync. Returns `false` when the
    /// line was already cached and left untouched.
    ///
    /// Sync inserts resolve against a line-local word map: the document-wide
    /// map belongs to full processing runs only.
    async fn sync_insert(&self, line: &str) -> Result<bool> {
        if self.store.get_by_line(line).await?.is_some() {
            debug!("Sync insert skipped, line already cached");
            return Ok(false);
        }

        let mut word_map = WordMap::new();
        self.process_new_line(line, &mut word_map).await?;
        Ok(true)
    }
}

/// Split a document into normalized lines; a blank document has none
fn document_lines(lyrics: &str) -> Vec<String> {
    if lyrics.is_empty() {
        return Vec::new();
    }
    lyrics.split('\n').map(normalize_kana).collect()
}

/// Build the persistent record for a processed line. Segments with no
/// resolved entries are omitted; blank ids are filtered out.
fn build_cached_line(
    line: &str,
    translation: &str,
    segments: &[String],
    word_map: &WordMap,
) -> CachedLine {
    let tokens = segments
        .iter()
        .filter_map(|segment| {
            let entries = word_map.get(segment)?;
            if entries.is_empty() {
                return None;
            }
            let id_seqs = entries
                .iter()
                .map(|entry| entry.id_seq.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect();
            Some(CachedToken {
                segment: segment.clone(),
                id_seqs,
            })
        })
        .collect();

    CachedLine {
        line: line.to_string(),
        translation: translation.to_string(),
        tokens,
    }
}
