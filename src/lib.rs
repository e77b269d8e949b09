//! kashi - Japanese lyrics annotation engine
//!
//! Segments raw Japanese song lyrics into dictionary-resolvable word units,
//! attaches dictionary and kanji metadata, produces line-level translations,
//! and keeps a persistent line-level cache synchronized as lyrics are
//! edited.
//!
//! # Architecture
//!
//! The engine sits on four external capabilities, each behind a trait:
//! - **Lexical analyzer** ([`LexicalAnalyzer`]): morphological tokenization
//! - **Lexicon** ([`Lexicon`]): dictionary word/id/radical lookups
//! - **Translator** ([`Translator`]): JA -> EN line translation
//! - **Line store** ([`LineStore`]): persistent cache keyed by exact line
//!
//! Around those, the crate implements the kana normalizer, the greedy
//! segment merger, the word and kanji resolvers, the line-level diff, and
//! the pipeline orchestrator with its diff-based cache synchronizer.
//!
//! # Example
//!
//! ```ignore
//! use kashi::{KanjiTable, LyricsEngine, Settings};
//! use kashi::storage::RestLineStore;
//! use kashi::translator::DeepLTranslator;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let engine = LyricsEngine::new(
//!         Arc::new(my_analyzer),             // e.g. a Vibrato wrapper
//!         Arc::new(my_lexicon),              // e.g. a JMdict adapter
//!         Arc::new(DeepLTranslator::from_settings(&settings)?),
//!         Arc::new(RestLineStore::from_settings(&settings)?),
//!         Arc::new(KanjiTable::from_file(&settings.kanji_data_path)?),
//!     );
//!
//!     let document = engine.process("朝目が覚めたら\n置いてきぼりになった").await?;
//!     println!("{} unique words", document.word_map.len());
//!     Ok(())
//! }
//! ```

pub mod analyzer;
pub mod config;
pub mod diff;
pub mod error;
pub mod kanji;
pub mod lexicon;
pub mod merger;
pub mod pipeline;
pub mod resolver;
pub mod storage;
pub mod text;
pub mod translator;
pub mod types;

// Re-export commonly used types
pub use analyzer::LexicalAnalyzer;
pub use config::Settings;
pub use error::{KashiError, Result};
pub use kanji::{KanjiResolver, KanjiTable};
pub use lexicon::{HeadwordForm, Lexicon, RawEntry, RawSense};
pub use merger::SegmentMerger;
pub use pipeline::LyricsEngine;
pub use resolver::{LookupMode, WordResolver};
pub use storage::LineStore;
pub use text::{extract_kanji, is_japanese, normalize_kana};
pub use translator::Translator;
pub use types::{
    AnnotatedDocument, CachedLine, CachedToken, DictionaryEntry, Definition, KanjiRecord,
    SyncFailure, SyncOperation, SyncOutcome, SyncReport, Token, WordMap,
};
