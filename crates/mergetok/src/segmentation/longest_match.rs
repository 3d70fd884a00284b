//! # Longest-Match Segmenter
//!
//! For a word's symbol sequence, try window lengths from the longest possible
//! down to 1; for each length slide left to right and take the first window
//! whose concatenation is a vocabulary token. The spans before and after the
//! match are segmented the same way.
//!
//! Matching windows are collected once per word, so each step is a lookup;
//! the span after a match is consumed in a loop, and the span before it
//! recurses with a strictly shorter length bound.
//!
//! A single symbol that is not itself a token (a character never seen in
//! training) fails with [`BpeError::UnsegmentableWord`].

use crate::errors::{BpeError, Result};
use crate::training::symbol_word::SymbolWord;
use crate::types::{Symbol, TokenType};
use crate::vocab::Vocabulary;
use std::sync::Arc;

/// Longest-match-first segmentation against a shared [`Vocabulary`].
#[derive(Debug, Clone)]
pub struct LongestMatchSegmenter<T: TokenType> {
    vocab: Arc<Vocabulary<T>>,
}

impl<T: TokenType> LongestMatchSegmenter<T> {
    /// Create a segmenter over `vocab`.
    pub fn new(vocab: Arc<Vocabulary<T>>) -> Self {
        Self { vocab }
    }

    /// The underlying vocabulary.
    pub fn vocab(&self) -> &Arc<Vocabulary<T>> {
        &self.vocab
    }

    /// Segment one whitespace-free word, appending tokens to `tokens`.
    pub fn segment_append_word(
        &self,
        word: &str,
        tokens: &mut Vec<Symbol>,
    ) -> Result<()> {
        let symbols = SymbolWord::from_word(word).into_symbols();
        let windows = WordWindows::build(&*self.vocab, word, &symbols);
        windows.segment_span(0, symbols.len(), windows.max_len(), tokens)
    }

    /// Segment one whitespace-free word.
    pub fn segment_word(
        &self,
        word: &str,
    ) -> Result<Vec<Symbol>> {
        let mut tokens = Vec::new();
        self.segment_append_word(word, &mut tokens)?;
        Ok(tokens)
    }

    /// Segment text, word by word.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, text)))]
    pub fn segment(
        &self,
        text: &str,
    ) -> Result<Vec<Symbol>> {
        let mut tokens = Vec::with_capacity(text.len());
        for word in text.split_whitespace() {
            self.segment_append_word(word, &mut tokens)?;
        }
        Ok(tokens)
    }
}

/// Every vocabulary token found among one word's symbol windows.
///
/// `by_len[len - 1]` holds ``(start, token)`` for each window of `len`
/// symbols that is a token, in ascending `start` order. A window of `len`
/// symbols is at least `len` bytes, so `len` never exceeds the longest token.
struct WordWindows<'v, 'w> {
    word: &'w str,
    symbols: &'w [Symbol],
    by_len: Vec<Vec<(usize, &'v Symbol)>>,
}

impl<'v, 'w> WordWindows<'v, 'w> {
    fn build<T: TokenType>(
        vocab: &'v Vocabulary<T>,
        word: &'w str,
        symbols: &'w [Symbol],
    ) -> Self {
        let max_bytes = vocab.max_token_len();
        let mut by_len: Vec<Vec<(usize, &'v Symbol)>> =
            vec![Vec::new(); max_bytes.min(symbols.len())];

        let mut buf = String::with_capacity(max_bytes);
        for start in 0..symbols.len() {
            buf.clear();
            for (offset, s) in symbols[start..].iter().take(by_len.len()).enumerate() {
                buf.push_str(s);
                if buf.len() > max_bytes {
                    break;
                }
                if let Some((token, _)) = vocab.get_key_value(&buf) {
                    by_len[offset].push((start, token));
                }
            }
        }

        Self {
            word,
            symbols,
            by_len,
        }
    }

    fn max_len(&self) -> usize {
        self.by_len.len()
    }

    /// The leftmost token of exactly `len` symbols lying within `lo..hi`.
    fn leftmost(
        &self,
        len: usize,
        lo: usize,
        hi: usize,
    ) -> Option<(usize, &'v Symbol)> {
        let found = &self.by_len[len - 1];
        let idx = found.partition_point(|&(start, _)| start < lo);
        found
            .get(idx)
            .copied()
            .filter(|&(start, _)| start + len <= hi)
    }

    /// Segment `symbols[lo..hi]`, where no window longer than `max_len` matches.
    fn segment_span(
        &self,
        mut lo: usize,
        hi: usize,
        mut max_len: usize,
        tokens: &mut Vec<Symbol>,
    ) -> Result<()> {
        while lo < hi {
            let Some((start, len, token)) = (1..=max_len.min(hi - lo)).rev().find_map(|len| {
                self.leftmost(len, lo, hi)
                    .map(|(start, token)| (start, len, token))
            }) else {
                return Err(BpeError::UnsegmentableWord {
                    word: self.word.to_string(),
                    symbol: self.symbols[lo].to_string(),
                });
            };

            // No window of `len` or more symbols matches inside `lo..start`.
            self.segment_span(lo, start, len - 1, tokens)?;
            tokens.push(token.clone());

            lo = start + len;
            max_len = len;
        }
        Ok(())
    }
}
