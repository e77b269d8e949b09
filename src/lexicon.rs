//! Lexicon seam: dictionary and radical lookups
//!
//! The dictionary engine is an external capability. Raw entries mirror the
//! JMdict structure closely enough for the resolver to rank and truncate
//! them: headword forms with priority markers, kana forms, and ordered
//! senses. "Not found" is an empty result, never an error; only a malformed
//! id may signal `KashiError::MalformedId`, which the resolver's id path
//! swallows as a miss.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A headword form (kanji or kana) with its priority markers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadwordForm {
    /// Form text
    pub text: String,

    /// Priority markers (`news1`, `ichi1`, ...); empty when unprioritized
    #[serde(default)]
    pub priority: Vec<String>,
}

impl HeadwordForm {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            priority: Vec::new(),
        }
    }
}

/// One raw sense: part-of-speech tags and glosses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSense {
    #[serde(default)]
    pub parts_of_speech: Vec<String>,

    #[serde(default)]
    pub glosses: Vec<String>,
}

/// A raw dictionary entry as returned by the Lexicon
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    /// Dictionary sequence id
    pub id_seq: String,

    /// Kanji headword forms, best form first
    #[serde(default)]
    pub kanji_forms: Vec<HeadwordForm>,

    /// Kana reading forms, best form first
    #[serde(default)]
    pub kana_forms: Vec<HeadwordForm>,

    /// Senses in dictionary order
    #[serde(default)]
    pub senses: Vec<RawSense>,
}

impl RawEntry {
    /// Headword for display: first kanji form, falling back to kana
    pub fn headword(&self) -> Option<&str> {
        self.kanji_forms
            .first()
            .or_else(|| self.kana_forms.first())
            .map(|form| form.text.as_str())
    }

    /// Kana reading for display
    pub fn furigana(&self) -> &str {
        self.kana_forms
            .first()
            .map(|form| form.text.as_str())
            .unwrap_or_default()
    }
}

/// Dictionary capability consumed by the resolver and kanji resolver
#[async_trait]
pub trait Lexicon: Send + Sync {
    /// All entries matching a surface or base form. Unknown text yields
    /// `Ok(vec![])`.
    async fn lookup_by_text(&self, text: &str) -> Result<Vec<RawEntry>>;

    /// A single entry by dictionary sequence id. Unknown ids yield
    /// `Ok(None)`; malformed ids may yield
    /// [`KashiError::MalformedId`](crate::error::KashiError::MalformedId).
    async fn lookup_by_id(&self, id_seq: &str) -> Result<Option<RawEntry>>;

    /// Radical decomposition of a kanji. Unknown kanji yield `Ok(vec![])`.
    async fn radicals_of(&self, kanji: char) -> Result<Vec<String>>;
}
