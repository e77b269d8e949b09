//! Common test utilities: fake collaborators and engine builders

#![allow(dead_code)]

use async_trait::async_trait;
use kashi::storage::MemoryLineStore;
use kashi::{
    CachedLine, HeadwordForm, KanjiTable, KashiError, LexicalAnalyzer, Lexicon, LineStore,
    LyricsEngine, RawEntry, RawSense, Result, Token, Translator,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Analyzer with a fixed line -> token-stream table.
///
/// Unmapped lines fall back to a single whole-line token, which is enough
/// for non-Japanese and trivial lines.
#[derive(Default)]
pub struct FakeAnalyzer {
    lines: HashMap<String, Vec<Token>>,
    calls: AtomicUsize,
}

impl FakeAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line(mut self, line: &str, tokens: Vec<Token>) -> Self {
        self.lines.insert(line.to_string(), tokens);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LexicalAnalyzer for FakeAnalyzer {
    fn tokenize(&self, line: &str) -> Vec<Token> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.lines
            .get(line)
            .cloned()
            .unwrap_or_else(|| vec![Token::new(line, line, "名詞,一般")])
    }
}

/// Token helpers in the analyzer's tagging convention
pub fn word(surface: &str) -> Token {
    Token::new(surface, surface, "動詞,自立")
}

pub fn word_with_base(surface: &str, base: &str) -> Token {
    Token::new(surface, base, "動詞,自立")
}

pub fn particle(surface: &str) -> Token {
    Token::new(surface, surface, "助詞,格助詞")
}

/// Lexicon over a fixed vocabulary, counting text lookups
#[derive(Default)]
pub struct FakeLexicon {
    by_text: HashMap<String, Vec<RawEntry>>,
    by_id: HashMap<String, RawEntry>,
    radicals: HashMap<char, Vec<String>>,
    text_lookups: AtomicUsize,
}

impl FakeLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plain word entry under both its text and its id
    pub fn with_word(self, text: &str, id: &str) -> Self {
        self.with_raw(
            text,
            raw_entry(id, text, text, &["noun (common) (futsuumeishi)"]),
        )
    }

    /// Register a particle entry (primary sense tagged "particle")
    pub fn with_particle(self, text: &str, id: &str) -> Self {
        self.with_raw(text, raw_entry(id, "", text, &["particle"]))
    }

    pub fn with_raw(mut self, text: &str, raw: RawEntry) -> Self {
        self.by_id.insert(raw.id_seq.clone(), raw.clone());
        self.by_text.entry(text.to_string()).or_default().push(raw);
        self
    }

    pub fn with_radicals(mut self, kanji: char, radicals: &[&str]) -> Self {
        self.radicals
            .insert(kanji, radicals.iter().map(|r| r.to_string()).collect());
        self
    }

    pub fn text_lookups(&self) -> usize {
        self.text_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Lexicon for FakeLexicon {
    async fn lookup_by_text(&self, text: &str) -> Result<Vec<RawEntry>> {
        self.text_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.by_text.get(text).cloned().unwrap_or_default())
    }

    async fn lookup_by_id(&self, id_seq: &str) -> Result<Option<RawEntry>> {
        if id_seq.starts_with('#') {
            return Err(KashiError::MalformedId(id_seq.to_string()));
        }
        Ok(self.by_id.get(id_seq).cloned())
    }

    async fn radicals_of(&self, kanji: char) -> Result<Vec<String>> {
        Ok(self.radicals.get(&kanji).cloned().unwrap_or_default())
    }
}

/// Build a raw dictionary entry
pub fn raw_entry(id: &str, kanji: &str, kana: &str, pos: &[&str]) -> RawEntry {
    RawEntry {
        id_seq: id.to_string(),
        kanji_forms: if kanji.is_empty() {
            vec![]
        } else {
            vec![HeadwordForm::new(kanji)]
        },
        kana_forms: vec![HeadwordForm::new(kana)],
        senses: vec![RawSense {
            parts_of_speech: pos.iter().map(|p| p.to_string()).collect(),
            glosses: vec![format!("gloss for {kana}")],
        }],
    }
}

/// Translator returning `EN(<text>)`, counting calls
#[derive(Default)]
pub struct FakeTranslator {
    calls: AtomicUsize,
}

impl FakeTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("EN({text})"))
    }
}

/// Line store wrapper injecting failures for chosen lines
pub struct FlakyLineStore {
    inner: MemoryLineStore,
    fail_deletes: HashSet<String>,
    fail_inserts: HashSet<String>,
}

impl FlakyLineStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryLineStore::new(),
            fail_deletes: HashSet::new(),
            fail_inserts: HashSet::new(),
        }
    }

    pub fn fail_delete_of(mut self, line: &str) -> Self {
        self.fail_deletes.insert(line.to_string());
        self
    }

    pub fn fail_insert_of(mut self, line: &str) -> Self {
        self.fail_inserts.insert(line.to_string());
        self
    }
}

#[async_trait]
impl LineStore for FlakyLineStore {
    async fn get_by_line(&self, line: &str) -> Result<Option<CachedLine>> {
        self.inner.get_by_line(line).await
    }

    async fn insert(&self, record: &CachedLine) -> Result<()> {
        if self.fail_inserts.contains(&record.line) {
            return Err(KashiError::Store("injected insert failure".to_string()));
        }
        self.inner.insert(record).await
    }

    async fn delete_by_line(&self, line: &str) -> Result<()> {
        if self.fail_deletes.contains(line) {
            return Err(KashiError::Store("injected delete failure".to_string()));
        }
        self.inner.delete_by_line(line).await
    }
}

/// Assemble an engine over fakes with an empty kanji table
pub fn engine(
    analyzer: Arc<FakeAnalyzer>,
    lexicon: Arc<FakeLexicon>,
    translator: Arc<FakeTranslator>,
    store: Arc<dyn LineStore>,
) -> LyricsEngine {
    init_tracing();
    LyricsEngine::new(
        analyzer,
        lexicon,
        translator,
        store,
        Arc::new(KanjiTable::empty()),
    )
}

/// Install a best-effort subscriber so `RUST_LOG` works in test runs
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
