//! # Vocabulary Builder

use crate::errors::Result;
use crate::training::word_split::representation_symbols;
use crate::types::{CountType, StringChunkType, Symbol, TokenType, WordCountMap};
use crate::vocab::vocabulary::Vocabulary;
use ahash::AHashMap;

/// Flattens a final word frequency table into a [`Vocabulary`].
///
/// Every symbol of every word becomes a token; its frequency is the sum of
/// the counts of the words it appears in, once per occurrence.
#[derive(Debug, Default, Clone)]
pub struct VocabularyBuilder {
    frequencies: AHashMap<Symbol, u64>,
}

impl VocabularyBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe one word representation occurring `count` times.
    pub fn observe_word(
        &mut self,
        repr: &str,
        count: u64,
    ) {
        for symbol in representation_symbols(repr) {
            match self.frequencies.get_mut(symbol) {
                Some(f) => *f += count,
                None => {
                    self.frequencies.insert(Symbol::from(symbol), count);
                }
            }
        }
    }

    /// Observe a whole ``{word representation -> count}`` table.
    pub fn observe_word_counts<K, C>(
        &mut self,
        word_counts: &WordCountMap<K, C>,
    ) where
        K: StringChunkType,
        C: CountType,
    {
        for (word, count) in word_counts {
            self.observe_word(word.as_ref(), count.to_u64().unwrap_or(u64::MAX));
        }
    }

    /// Chained form of [`Self::observe_word_counts`].
    pub fn with_word_counts<K, C>(
        mut self,
        word_counts: &WordCountMap<K, C>,
    ) -> Self
    where
        K: StringChunkType,
        C: CountType,
    {
        self.observe_word_counts(word_counts);
        self
    }

    /// The number of distinct symbols observed.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Has nothing been observed?
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Assign ids in lexicographic order and build the [`Vocabulary`].
    pub fn build<T: TokenType>(self) -> Result<Vocabulary<T>> {
        Vocabulary::from_token_frequencies(self.frequencies)
    }
}
