//! Word resolver: ranks and limits dictionary candidates for a segment
//!
//! Three lookup modes exist. `NotJapanese` fabricates a single synthetic
//! entry without touching the Lexicon. `Particle` queries the Lexicon and
//! keeps only entries whose primary sense is a particle or conjunction.
//! `Word` queries the Lexicon directly. In the Lexicon-backed modes the
//! result is capped at 4 entries of at most 3 senses each, with
//! common-priority entries stable-partitioned to the front.

use crate::error::{KashiError, Result};
use crate::lexicon::{Lexicon, RawEntry};
use crate::types::{Definition, DictionaryEntry};
use std::sync::Arc;
use tracing::{debug, warn};

/// Maximum dictionary entries attached to a segment
const MAX_ENTRIES: usize = 4;

/// Maximum senses kept per entry
const MAX_SENSES: usize = 3;

/// Priority marker identifying common headwords
const COMMON_MARKER: &str = "news1";

/// How a segment should be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMode {
    /// Plain dictionary lookup
    Word,

    /// Keep only particle/conjunction senses
    Particle,

    /// Synthetic non-Japanese entry, no Lexicon call
    NotJapanese,
}

/// Resolves segment text (or dictionary ids) to ranked entries
#[derive(Clone)]
pub struct WordResolver {
    lexicon: Arc<dyn Lexicon>,
}

impl WordResolver {
    pub fn new(lexicon: Arc<dyn Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Resolve a segment's text to at most 4 ranked entries.
    ///
    /// A Lexicon error or empty result yields an empty vec: "no entries" is
    /// a valid state for unknown words, not a failure.
    pub async fn resolve(&self, text: &str, mode: LookupMode) -> Result<Vec<DictionaryEntry>> {
        if mode == LookupMode::NotJapanese {
            return Ok(vec![DictionaryEntry::not_japanese(text)]);
        }

        let raw_entries = match self.lexicon.lookup_by_text(text).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Lexicon lookup failed for segment, treating as unknown: {e}");
                return Ok(vec![]);
            }
        };

        let mut common_entries = Vec::new();
        let mut other_entries = Vec::new();

        for raw in &raw_entries {
            if mode == LookupMode::Particle && !is_particle_entry(raw) {
                continue;
            }
            let Some(entry) = convert_entry(raw) else {
                continue;
            };
            if is_common_for(raw, text) {
                common_entries.push(entry);
            } else {
                other_entries.push(entry);
            }
        }

        // Stable partition: common first, relative order preserved within
        // both partitions.
        common_entries.extend(other_entries);
        common_entries.truncate(MAX_ENTRIES);
        debug!("Resolved segment to {} entries", common_entries.len());
        Ok(common_entries)
    }

    /// Rebuild entries from the compact id representation stored with a
    /// cached line.
    ///
    /// Blank ids are skipped; a malformed-id error from the Lexicon is
    /// swallowed as a miss. Any other Lexicon failure propagates.
    pub async fn resolve_by_ids(&self, id_seqs: &[String]) -> Result<Vec<DictionaryEntry>> {
        let mut entries = Vec::new();

        for id_seq in id_seqs {
            let id_seq = id_seq.trim();
            if id_seq.is_empty() {
                continue;
            }

            let raw = match self.lexicon.lookup_by_id(id_seq).await {
                Ok(raw) => raw,
                Err(KashiError::MalformedId(id)) => {
                    warn!("Skipping malformed dictionary id: {id}");
                    continue;
                }
                Err(e) => return Err(e),
            };

            if let Some(entry) = raw.as_ref().and_then(convert_entry) {
                entries.push(entry);
            }
        }

        entries.truncate(MAX_ENTRIES);
        Ok(entries)
    }
}

/// Whether an entry's primary sense is a particle or conjunction.
///
/// Tags must match exactly: composite tags such as "adverb taking the 'to'
/// particle" do not qualify.
fn is_particle_entry(raw: &RawEntry) -> bool {
    raw.senses.first().is_some_and(|sense| {
        sense
            .parts_of_speech
            .iter()
            .any(|pos| pos == "particle" || pos == "conjunction")
    })
}

/// Whether an entry carries a common-priority kanji form matching the exact
/// query text
fn is_common_for(raw: &RawEntry, query: &str) -> bool {
    raw.kanji_forms.iter().any(|form| {
        form.text == query && form.priority.iter().any(|p| p == COMMON_MARKER)
    })
}

/// Convert a raw entry, truncating senses. Entries without any headword
/// form are dropped.
fn convert_entry(raw: &RawEntry) -> Option<DictionaryEntry> {
    let word = raw.headword()?.to_string();
    let definitions = raw
        .senses
        .iter()
        .take(MAX_SENSES)
        .map(|sense| Definition {
            parts_of_speech: sense.parts_of_speech.clone(),
            glosses: sense.glosses.clone(),
        })
        .collect();

    Some(DictionaryEntry {
        id_seq: raw.id_seq.clone(),
        word,
        furigana: raw.furigana().to_string(),
        definitions,
    })
}
