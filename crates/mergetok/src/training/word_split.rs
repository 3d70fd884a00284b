//! # Word Splitting
//!
//! A raw text item becomes one *word representation* per whitespace-delimited
//! word: its characters joined by single spaces, followed by a space and
//! [`END_OF_WORD`]. The spacing is load-bearing; it is the only thing that
//! distinguishes two adjacent symbols from one merged symbol.

use crate::END_OF_WORD;

/// Build the initial representation of a single word.
///
/// ``"low" -> "l o w </w>"``
pub fn word_representation(word: &str) -> String {
    let mut repr = String::with_capacity(word.len() * 2 + END_OF_WORD.len());
    for c in word.chars() {
        repr.push(c);
        repr.push(' ');
    }
    repr.push_str(END_OF_WORD);
    repr
}

/// Split a text item into word representations, left to right.
///
/// Lazy and restartable: a pure function of `text`.
pub fn split_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().map(word_representation)
}

/// Split a representation into its symbols.
pub fn representation_symbols(repr: &str) -> impl Iterator<Item = &str> {
    repr.split(' ').filter(|s| !s.is_empty())
}

/// Normalize whitespace: collapse runs to one space, trim both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
