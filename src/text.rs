//! Text normalization and Japanese script classification
//!
//! Lyrics scraped from the wild frequently carry voiced kana split into a
//! base character plus a standalone combining dakuten (U+3099) or handakuten
//! (U+309A) mark. The normalizer repairs those pairs into their precomposed
//! forms so that tokenization and cache keys are stable.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Standalone combining dakuten mark
const DAKUTEN_MARK: char = '\u{3099}';

/// Standalone combining handakuten mark
const HANDAKUTEN_MARK: char = '\u{309A}';

/// Base kana to their voiced (dakuten) counterparts
static DAKUTEN_MAP: Lazy<HashMap<char, char>> = Lazy::new(|| {
    HashMap::from([
        ('か', 'が'),
        ('き', 'ぎ'),
        ('く', 'ぐ'),
        ('け', 'げ'),
        ('こ', 'ご'),
        ('さ', 'ざ'),
        ('し', 'じ'),
        ('す', 'ず'),
        ('せ', 'ぜ'),
        ('そ', 'ぞ'),
        ('た', 'だ'),
        ('ち', 'ぢ'),
        ('つ', 'づ'),
        ('て', 'で'),
        ('と', 'ど'),
        ('は', 'ば'),
        ('ひ', 'び'),
        ('ふ', 'ぶ'),
        ('へ', 'べ'),
        ('ほ', 'ぼ'),
        ('カ', 'ガ'),
        ('キ', 'ギ'),
        ('ク', 'グ'),
        ('ケ', 'ゲ'),
        ('コ', 'ゴ'),
        ('サ', 'ザ'),
        ('シ', 'ジ'),
        ('ス', 'ズ'),
        ('セ', 'ゼ'),
        ('ソ', 'ゾ'),
        ('タ', 'ダ'),
        ('チ', 'ヂ'),
        ('ツ', 'ヅ'),
        ('テ', 'デ'),
        ('ト', 'ド'),
        ('ハ', 'バ'),
        ('ヒ', 'ビ'),
        ('フ', 'ブ'),
        ('ヘ', 'ベ'),
        ('ホ', 'ボ'),
    ])
});

/// Base kana to their semi-voiced (handakuten) counterparts
static HANDAKUTEN_MAP: Lazy<HashMap<char, char>> = Lazy::new(|| {
    HashMap::from([
        ('は', 'ぱ'),
        ('ひ', 'ぴ'),
        ('ふ', 'ぷ'),
        ('へ', 'ぺ'),
        ('ほ', 'ぽ'),
        ('ハ', 'パ'),
        ('ヒ', 'ピ'),
        ('フ', 'プ'),
        ('ヘ', 'ペ'),
        ('ホ', 'ポ'),
    ])
});

/// Leading-character test for Japanese text: kana, kanji, or fullwidth forms
static JAPANESE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\u{3040}-\u{30FF}\u{4E00}-\u{9FFF}\u{FF00}-\u{FFEF}]").expect("valid regex")
});

/// Kanji character class: CJK extension A, unified ideographs, compat forms
static KANJI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\u{3400}-\u{4DB5}\u{4E00}-\u{9FCB}\u{F900}-\u{FA6D}]").expect("valid regex")
});

/// Repair standalone dakuten/handakuten marks in a line.
///
/// Whenever a character with a mapped voiced (or semi-voiced) counterpart is
/// immediately followed by the standalone combining mark, the pair is
/// replaced by the single combined character; everything else is copied
/// through unchanged. Total and idempotent.
pub fn normalize_kana(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut result = String::with_capacity(line.len());
    let mut i = 0;

    while i < chars.len() {
        let current = chars[i];
        match chars.get(i + 1) {
            Some(&DAKUTEN_MARK) => {
                match DAKUTEN_MAP.get(&current) {
                    Some(&voiced) => result.push(voiced),
                    None => {
                        result.push(current);
                        result.push(DAKUTEN_MARK);
                    }
                }
                i += 2;
            }
            Some(&HANDAKUTEN_MARK) => {
                match HANDAKUTEN_MAP.get(&current) {
                    Some(&voiced) => result.push(voiced),
                    None => {
                        result.push(current);
                        result.push(HANDAKUTEN_MARK);
                    }
                }
                i += 2;
            }
            _ => {
                result.push(current);
                i += 1;
            }
        }
    }

    result
}

/// Whether text begins with a Japanese-script character.
///
/// Matches the leading character only: a segment like `恋する` is Japanese,
/// `ah恋` is not. Empty text is not Japanese.
pub fn is_japanese(text: &str) -> bool {
    JAPANESE.is_match(text)
}

/// All kanji characters of `text` in order of appearance, duplicates
/// included (callers dedup as needed).
pub fn extract_kanji(text: &str) -> Vec<char> {
    KANJI
        .find_iter(text)
        .filter_map(|m| m.as_str().chars().next())
        .collect()
}
