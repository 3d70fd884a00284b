//! # Token Vocabulary
//!
//! The trained artifact: ``{ token -> (id, frequency) }`` and the inverse
//! ``{ id -> token }``, built together from one source and never mutated.

use crate::errors::{BpeError, Result};
use crate::types::{CountType, StringChunkType, Symbol, TokenType, WordCountMap};
use crate::vocab::VocabularyBuilder;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// A token's id and training-corpus frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(bound(serialize = "T: TokenType", deserialize = "T: TokenType"))]
pub struct VocabEntry<T: TokenType> {
    /// The token id.
    pub id: T,

    /// Total occurrences of the token in the final merged corpus.
    pub frequency: u64,
}

/// An immutable token vocabulary.
///
/// Ids are exactly ``0..len()``.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary<T: TokenType = u32> {
    token_to_entry: AHashMap<Symbol, VocabEntry<T>>,

    /// `id_to_token[id]` is the token with that id.
    id_to_token: Vec<Symbol>,

    /// Longest token, in bytes.
    max_token_len: usize,
}

impl<T: TokenType> Vocabulary<T> {
    /// Build a vocabulary from ``(token, frequency)`` pairs.
    ///
    /// Ids are assigned in ascending lexicographic token order, so similar
    /// tokens receive numerically close ids.
    ///
    /// Duplicate tokens have their frequencies summed.
    pub fn from_token_frequencies<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let mut frequencies: AHashMap<Symbol, u64> = AHashMap::default();
        for (token, frequency) in tokens {
            *frequencies.entry(Symbol::from(token.as_ref())).or_default() += frequency;
        }

        let mut sorted: Vec<(Symbol, u64)> = frequencies.into_iter().collect();
        sorted.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        let entries = sorted
            .into_iter()
            .enumerate()
            .map(|(idx, (token, frequency))| (token, idx as u64, frequency));

        Self::from_entries(entries)
    }

    /// Build a vocabulary from a final ``{word representation -> count}`` table.
    ///
    /// See [`VocabularyBuilder`].
    pub fn from_word_counts<K, C>(word_counts: &WordCountMap<K, C>) -> Result<Self>
    where
        K: StringChunkType,
        C: CountType,
    {
        VocabularyBuilder::new().with_word_counts(word_counts).build()
    }

    /// Build a vocabulary from explicit ``(token, id, frequency)`` entries.
    ///
    /// Fails with [`BpeError::MalformedVocabularyFile`] unless tokens are
    /// unique and non-empty and ids are unique and form ``0..N``;
    /// errors name the 1-based position of the offending entry.
    /// Fails with [`BpeError::TokenIdOverflow`] if an id does not fit `T`.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u64, u64)>,
        S: AsRef<str>,
    {
        let entries: Vec<(S, u64, u64)> = entries.into_iter().collect();
        let n = entries.len();

        let mut token_to_entry: AHashMap<Symbol, VocabEntry<T>> = AHashMap::with_capacity(n);
        let mut slots: Vec<Option<Symbol>> = vec![None; n];

        for (idx, (token, id, frequency)) in entries.into_iter().enumerate() {
            let line = idx + 1;
            let token = token.as_ref();
            if token.is_empty() {
                return Err(BpeError::malformed(line, "empty token"));
            }

            let typed_id = T::from_u64(id).ok_or(BpeError::TokenIdOverflow(id))?;
            let slot = match usize::try_from(id) {
                Ok(slot) if slot < n => slot,
                _ => {
                    return Err(BpeError::malformed(
                        line,
                        format!("id {id} out of range for {n} entries"),
                    ));
                }
            };

            let token = Symbol::from(token);
            if token_to_entry.contains_key(&token) {
                return Err(BpeError::malformed(
                    line,
                    format!("duplicate token {token:?}"),
                ));
            }
            if let Some(existing) = &slots[slot] {
                return Err(BpeError::malformed(
                    line,
                    format!("duplicate id {id} (already assigned to {existing:?})"),
                ));
            }
            slots[slot] = Some(token.clone());

            token_to_entry.insert(
                token,
                VocabEntry {
                    id: typed_id,
                    frequency,
                },
            );
        }

        // n unique ids, all < n: every slot is filled.
        let id_to_token: Vec<Symbol> = slots.into_iter().flatten().collect();
        let max_token_len = id_to_token.iter().map(|t| t.len()).max().unwrap_or(0);

        Ok(Self {
            token_to_entry,
            id_to_token,
            max_token_len,
        })
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.id_to_token.len()
    }

    /// Is the vocabulary empty?
    pub fn is_empty(&self) -> bool {
        self.id_to_token.is_empty()
    }

    /// Longest token, in bytes.
    pub fn max_token_len(&self) -> usize {
        self.max_token_len
    }

    /// Does the vocabulary hold `token`?
    pub fn contains(
        &self,
        token: &str,
    ) -> bool {
        self.token_to_entry.contains_key(token)
    }

    /// The entry for `token`, if any.
    pub fn get(
        &self,
        token: &str,
    ) -> Option<&VocabEntry<T>> {
        self.token_to_entry.get(token)
    }

    /// The stored token and entry matching `token`, if any.
    pub fn get_key_value(
        &self,
        token: &str,
    ) -> Option<(&Symbol, &VocabEntry<T>)> {
        self.token_to_entry.get_key_value(token)
    }

    /// The id of `token`.
    pub fn token_to_id(
        &self,
        token: &str,
    ) -> Result<T> {
        self.get(token)
            .map(|e| e.id)
            .ok_or_else(|| BpeError::UnknownToken(token.to_string()))
    }

    /// The token with id `id`.
    pub fn id_to_token(
        &self,
        id: T,
    ) -> Result<&Symbol> {
        id.to_usize()
            .and_then(|idx| self.id_to_token.get(idx))
            .ok_or_else(|| BpeError::UnknownTokenId(id.to_u64().unwrap_or(u64::MAX)))
    }

    /// The training frequency of `token`.
    pub fn frequency(
        &self,
        token: &str,
    ) -> Option<u64> {
        self.get(token).map(|e| e.frequency)
    }

    /// Iterate ``(token, entry)`` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &VocabEntry<T>)> + '_ {
        self.id_to_token
            .iter()
            .map(|token| (token, &self.token_to_entry[token]))
    }

    /// Iterate tokens in id order.
    pub fn tokens(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.id_to_token.iter()
    }
}
