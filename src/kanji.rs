//! Kanji resolver: static metadata joined with radical decomposition
//!
//! Per-kanji metadata (JLPT level, meanings, readings) comes from a static
//! JSON table shipped alongside the engine; the radical decomposition is
//! fetched from the Lexicon and merged in. Kanji appearing in the text but
//! absent from the table are reported as an explicit `None`, never omitted
//! from the result map.

use crate::error::{KashiError, Result};
use crate::lexicon::Lexicon;
use crate::text::extract_kanji;
use crate::types::KanjiRecord;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Static metadata row of the kanji table.
///
/// Field names follow the kanji-data JSON format; unknown fields (stroke
/// counts, frequency ranks, ...) are ignored.
#[derive(Debug, Clone, Deserialize)]
struct KanjiMeta {
    #[serde(default)]
    jlpt_new: Option<u8>,

    #[serde(default)]
    meanings: Vec<String>,

    #[serde(default)]
    readings_on: Vec<String>,

    #[serde(default)]
    readings_kun: Vec<String>,
}

/// Static kanji metadata table loaded from JSON
#[derive(Debug, Clone, Default)]
pub struct KanjiTable {
    entries: HashMap<char, KanjiMeta>,
}

impl KanjiTable {
    /// An empty table; every kanji resolves to "no data"
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the table from a kanji-data style JSON file keyed by kanji
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let raw: HashMap<String, KanjiMeta> = serde_json::from_reader(BufReader::new(file))?;

        let mut entries = HashMap::with_capacity(raw.len());
        for (key, meta) in raw {
            let mut chars = key.chars();
            let (Some(kanji), None) = (chars.next(), chars.next()) else {
                return Err(KashiError::KanjiData(format!(
                    "table key is not a single character: {key:?}"
                )));
            };
            entries.insert(kanji, meta);
        }

        info!("Loaded kanji table with {} entries from {}", entries.len(), path.display());
        Ok(Self { entries })
    }

    /// Number of kanji in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn get(&self, kanji: char) -> Option<&KanjiMeta> {
        self.entries.get(&kanji)
    }
}

/// Joins static kanji metadata with Lexicon radical decomposition
#[derive(Clone)]
pub struct KanjiResolver {
    table: Arc<KanjiTable>,
    lexicon: Arc<dyn Lexicon>,
}

impl KanjiResolver {
    pub fn new(table: Arc<KanjiTable>, lexicon: Arc<dyn Lexicon>) -> Self {
        Self { table, lexicon }
    }

    /// Resolve a single kanji. `Ok(None)` means the kanji has no entry in
    /// the static table.
    pub async fn resolve(&self, kanji: char) -> Result<Option<KanjiRecord>> {
        let Some(meta) = self.table.get(kanji) else {
            return Ok(None);
        };

        let radicals = self.lexicon.radicals_of(kanji).await?;
        Ok(Some(KanjiRecord {
            jlpt_level: meta.jlpt_new,
            meanings: meta.meanings.clone(),
            on_readings: meta.readings_on.clone(),
            kun_readings: meta.readings_kun.clone(),
            radicals,
        }))
    }

    /// Resolve every unique kanji appearing in the raw (pre-normalization)
    /// text. Kanji without table metadata map to `None`.
    pub async fn resolve_all(&self, raw_text: &str) -> Result<BTreeMap<char, Option<KanjiRecord>>> {
        let unique: BTreeSet<char> = extract_kanji(raw_text).into_iter().collect();

        let mut records = BTreeMap::new();
        for kanji in unique {
            records.insert(kanji, self.resolve(kanji).await?);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::RawEntry;
    use async_trait::async_trait;
    use std::io::Write;

    struct RadicalLexicon;

    #[async_trait]
    impl Lexicon for RadicalLexicon {
        async fn lookup_by_text(&self, _text: &str) -> Result<Vec<RawEntry>> {
            Ok(vec![])
        }

        async fn lookup_by_id(&self, _id_seq: &str) -> Result<Option<RawEntry>> {
            Ok(None)
        }

        async fn radicals_of(&self, kanji: char) -> Result<Vec<String>> {
            match kanji {
                '歌' => Ok(vec!["可".to_string(), "欠".to_string()]),
                _ => Ok(vec![]),
            }
        }
    }

    fn write_table(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    const TABLE_JSON: &str = r#"{
        "歌": {
            "strokes": 14,
            "jlpt_new": 4,
            "meanings": ["song", "sing"],
            "readings_on": ["カ"],
            "readings_kun": ["うた", "うた.う"]
        }
    }"#;

    #[tokio::test]
    async fn test_resolve_joins_table_and_radicals() {
        let file = write_table(TABLE_JSON);
        let table = Arc::new(KanjiTable::from_file(file.path()).unwrap());
        assert_eq!(table.len(), 1);

        let resolver = KanjiResolver::new(table, Arc::new(RadicalLexicon));
        let record = resolver.resolve('歌').await.unwrap().unwrap();
        assert_eq!(record.jlpt_level, Some(4));
        assert_eq!(record.meanings, vec!["song", "sing"]);
        assert_eq!(record.on_readings, vec!["カ"]);
        assert_eq!(record.radicals, vec!["可", "欠"]);
    }

    #[tokio::test]
    async fn test_absent_kanji_present_as_none() {
        let file = write_table(TABLE_JSON);
        let table = Arc::new(KanjiTable::from_file(file.path()).unwrap());
        let resolver = KanjiResolver::new(table, Arc::new(RadicalLexicon));

        let records = resolver.resolve_all("歌と詩").await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[&'歌'].is_some());
        assert!(records.contains_key(&'詩'));
        assert!(records[&'詩'].is_none());
    }

    #[tokio::test]
    async fn test_resolve_all_dedups_kanji() {
        let file = write_table(TABLE_JSON);
        let table = Arc::new(KanjiTable::from_file(file.path()).unwrap());
        let resolver = KanjiResolver::new(table, Arc::new(RadicalLexicon));

        let records = resolver.resolve_all("歌う歌").await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_multi_char_key_rejected() {
        let file = write_table(r#"{"漢字": {"meanings": []}}"#);
        let result = KanjiTable::from_file(file.path());
        assert!(matches!(result, Err(KashiError::KanjiData(_))));
    }
}
