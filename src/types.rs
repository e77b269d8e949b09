//! Core data types for the kashi lyrics annotation engine
//!
//! This module defines the data structures that flow through the pipeline:
//! analyzer tokens, dictionary entries, kanji metadata, the insertion-ordered
//! word map, cached line records, and the annotation / sync result shapes
//! consumed by callers.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

/// Part-of-speech tag marking Japanese particles (joshi)
const PARTICLE_TAG: &str = "助詞";

/// A morpheme produced by the external lexical analyzer.
///
/// One token per source character run; immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Surface form exactly as it appears in the line
    pub surface: String,

    /// Dictionary (base) form of the morpheme
    pub base_form: String,

    /// Part-of-speech tag, detailed enough to identify particles
    pub part_of_speech: String,
}

impl Token {
    /// Create a token, mapping the analyzer's `*` base-form placeholder
    /// back to the surface form.
    pub fn new(
        surface: impl Into<String>,
        base_form: impl Into<String>,
        part_of_speech: impl Into<String>,
    ) -> Self {
        let surface = surface.into();
        let base_form = base_form.into();
        let base_form = if base_form == "*" {
            surface.clone()
        } else {
            base_form
        };
        Self {
            surface,
            base_form,
            part_of_speech: part_of_speech.into(),
        }
    }

    /// Whether this token is a grammatical particle.
    ///
    /// Particles are never merged into compound segments.
    pub fn is_particle(&self) -> bool {
        self.part_of_speech.contains(PARTICLE_TAG)
    }
}

/// One sense of a dictionary entry: part-of-speech tags plus glosses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// Part-of-speech tags of the sense
    pub parts_of_speech: Vec<String>,

    /// English glosses, as plain strings
    pub glosses: Vec<String>,
}

/// A resolved dictionary entry attached to a segment.
///
/// At most 4 entries are attached per segment, each with at most 3
/// definitions; entries carrying a common-priority headword for the query
/// are ordered before all others (stable partition).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// Dictionary sequence id; empty for synthetic non-Japanese entries
    pub id_seq: String,

    /// Headword (first kanji form, or first kana form when none exists)
    pub word: String,

    /// Kana reading; empty for synthetic non-Japanese entries
    pub furigana: String,

    /// Senses, truncated to 3
    pub definitions: Vec<Definition>,
}

impl DictionaryEntry {
    /// Synthetic entry marking a segment as not Japanese.
    ///
    /// Carries an empty id so it is never persisted into cached token ids.
    pub fn not_japanese(text: &str) -> Self {
        Self {
            id_seq: String::new(),
            word: text.to_string(),
            furigana: String::new(),
            definitions: vec![Definition {
                parts_of_speech: vec!["Not Japanese".to_string()],
                glosses: vec!["Not a Japanese word".to_string()],
            }],
        }
    }
}

/// Static metadata for a single kanji, joined with the Lexicon's radical
/// decomposition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanjiRecord {
    /// JLPT level under the post-2010 scheme, when assigned
    pub jlpt_level: Option<u8>,

    /// English meanings
    pub meanings: Vec<String>,

    /// On (Sino-Japanese) readings
    pub on_readings: Vec<String>,

    /// Kun (native) readings
    pub kun_readings: Vec<String>,

    /// Radical decomposition from the Lexicon, merged in unmodified
    pub radicals: Vec<String>,
}

/// Insertion-ordered map from segment text to its resolved dictionary
/// entries.
///
/// Scoped to a single document-processing call; iteration and serialization
/// follow first-seen order across the document. A re-insert of an existing
/// key replaces the value but keeps its original position.
#[derive(Debug, Clone, Default)]
pub struct WordMap {
    entries: HashMap<String, Vec<DictionaryEntry>>,
    order: Vec<String>,
}

impl WordMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, segment: &str) -> bool {
        self.entries.contains_key(segment)
    }

    pub fn get(&self, segment: &str) -> Option<&[DictionaryEntry]> {
        self.entries.get(segment).map(Vec::as_slice)
    }

    /// Insert a segment's entries. First-seen order is preserved: inserting
    /// an already-present key overwrites its value in place.
    pub fn insert(&mut self, segment: String, entries: Vec<DictionaryEntry>) {
        if !self.entries.contains_key(&segment) {
            self.order.push(segment.clone());
        }
        self.entries.insert(segment, entries);
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate segments and their entries in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DictionaryEntry])> {
        self.order
            .iter()
            .map(|k| (k.as_str(), self.entries[k].as_slice()))
    }
}

impl Serialize for WordMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.order.len()))?;
        for (segment, entries) in self.iter() {
            map.serialize_entry(segment, entries)?;
        }
        map.end()
    }
}

/// One segment of a cached line together with the dictionary ids needed to
/// rebuild its word-map entries. Blank ids are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedToken {
    /// Segment text
    pub segment: String,

    /// Dictionary sequence ids of the segment's entries
    pub id_seqs: Vec<String>,
}

/// A processed line as persisted in the line store.
///
/// Keyed by the exact dakuten-corrected line text. Only the compact id
/// representation is persisted; full entries are re-resolved by id on read.
/// Segments with no resolvable entries are omitted from `tokens` entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedLine {
    /// Corrected line text (uniqueness key)
    pub line: String,

    /// Line translation
    pub translation: String,

    /// Compact per-segment id lists, in segment order
    pub tokens: Vec<CachedToken>,
}

/// The fully annotated document produced by a processing call
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnnotatedDocument {
    /// Per line, the ordered segments it was merged into
    pub lyric_lines: Vec<Vec<String>>,

    /// Segment text to dictionary entries, in first-seen order
    pub word_map: WordMap,

    /// Every unique kanji in the raw text; `None` marks kanji absent from
    /// the static metadata table
    pub kanji_data: BTreeMap<char, Option<KanjiRecord>>,

    /// `(corrected line, translation)` pairs in document order
    pub translated_lines: Vec<(String, String)>,
}

/// Which store mutation a sync failure occurred in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncOperation {
    Delete,
    Insert,
}

impl std::fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncOperation::Delete => write!(f, "delete"),
            SyncOperation::Insert => write!(f, "insert"),
        }
    }
}

/// Detail record for a single failed sync operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncFailure {
    /// Which operation failed
    pub operation: SyncOperation,

    /// The line the operation was applied to
    pub line: String,

    /// Collaborator error message
    pub error: String,
}

/// Counters and failure details for one sync run.
///
/// Each delete/insert is an independent unit of failure; a failed operation
/// is counted and detailed without aborting the batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncReport {
    pub deleted: usize,
    pub inserted: usize,
    pub failed: usize,
    pub details: Vec<SyncFailure>,
}

impl SyncReport {
    pub(crate) fn record_failure(&mut self, operation: SyncOperation, line: &str, error: String) {
        self.failed += 1;
        self.details.push(SyncFailure {
            operation,
            line: line.to_string(),
            error,
        });
    }
}

/// Result of a sync call: the mutation report plus the modified document
/// re-processed through the updated cache
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    pub report: SyncReport,
    pub document: AnnotatedDocument,
}
