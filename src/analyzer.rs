//! Lexical analyzer seam
//!
//! Morphological analysis is an external capability: the engine consumes a
//! token stream and never segments morphemes itself. Implementations wrap a
//! real analyzer (MeCab, Vibrato, Sudachi, ...) and are expected to emit
//! tokens whose surfaces concatenate back to the input line and whose
//! part-of-speech tags are detailed enough to identify particles.

use crate::types::Token;

/// Tokenizer capability consumed by the engine
pub trait LexicalAnalyzer: Send + Sync {
    /// Split one line into morpheme tokens, in order.
    ///
    /// Implementations should route base forms through [`Token::new`] so the
    /// `*` placeholder some analyzers emit for unknown words falls back to
    /// the surface form.
    fn tokenize(&self, line: &str) -> Vec<Token>;
}
