//! Segment merger: greedy longest dictionary-validated match
//!
//! Converts one line's token stream into merged word segments, recording
//! each segment's resolved entries in the call-scoped [`WordMap`]. The
//! extension strategy is a greedy, non-backtracking heuristic carried over
//! from the reference behavior: once an extended lookup fails, the last
//! successful candidate is kept and no further extension is attempted, even
//! if a still-longer form would have matched. This is a known approximation,
//! not globally optimal segmentation.

use crate::error::Result;
use crate::resolver::{LookupMode, WordResolver};
use crate::text::is_japanese;
use crate::types::{Token, WordMap};
use tracing::trace;

/// Merges token streams into dictionary-resolvable segments
#[derive(Clone)]
pub struct SegmentMerger {
    resolver: WordResolver,
}

impl SegmentMerger {
    pub fn new(resolver: WordResolver) -> Self {
        Self { resolver }
    }

    /// Merge one line's tokens into segments, contributing to `word_map`.
    ///
    /// Per token, left to right:
    /// 1. a surface already present in the word map is emitted as-is
    ///    (memoization: no second Lexicon call for a repeated surface);
    /// 2. a non-Japanese surface becomes a single-token segment with a
    ///    synthetic entry;
    /// 3. a particle becomes a single-token segment resolved in particle
    ///    mode, never merged into a compound;
    /// 4. anything else starts a compound candidate at the token's base
    ///    form, greedily extended by following surfaces while the Lexicon
    ///    keeps validating the concatenation.
    ///
    /// The concatenation of the returned segments equals the input line
    /// exactly.
    pub async fn merge_line(
        &self,
        tokens: &[Token],
        word_map: &mut WordMap,
    ) -> Result<Vec<String>> {
        let mut segments = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            let token = &tokens[i];
            let surface = token.surface.as_str();

            if word_map.contains(surface) {
                segments.push(surface.to_string());
                i += 1;
                continue;
            }

            if !is_japanese(surface) {
                let entries = self
                    .resolver
                    .resolve(surface, LookupMode::NotJapanese)
                    .await?;
                word_map.insert(surface.to_string(), entries);
                segments.push(surface.to_string());
                i += 1;
                continue;
            }

            if token.is_particle() {
                let entries = self.resolver.resolve(surface, LookupMode::Particle).await?;
                word_map.insert(surface.to_string(), entries);
                segments.push(surface.to_string());
                i += 1;
                continue;
            }

            // Greedy extension: keep the last candidate the Lexicon
            // validated, starting from the token's base form.
            let mut candidate = surface.to_string();
            let mut entries = self
                .resolver
                .resolve(&token.base_form, LookupMode::Word)
                .await?;
            let mut j = i + 1;

            while j < tokens.len() {
                let next = &tokens[j];
                if !is_japanese(&next.surface) || next.is_particle() {
                    break;
                }

                let extended = format!("{}{}", candidate, next.surface);
                let extended_entries = self.resolver.resolve(&extended, LookupMode::Word).await?;
                if extended_entries.is_empty() {
                    break;
                }

                trace!("Extended segment candidate to {} tokens", j - i + 1);
                candidate = extended;
                entries = extended_entries;
                j += 1;
            }

            if !word_map.contains(&candidate) {
                word_map.insert(candidate.clone(), entries);
            }
            segments.push(candidate);
            i = j;
        }

        Ok(segments)
    }
}
