//! # Symbol Words

use crate::END_OF_WORD;
use crate::training::word_split::representation_symbols;
use crate::types::{Pair, Symbol};

/// A word as an ordered sequence of symbols.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolWord {
    symbols: Vec<Symbol>,
}

impl<S: AsRef<str>> FromIterator<S> for SymbolWord {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            symbols: iter.into_iter().map(|s| Symbol::from(s.as_ref())).collect(),
        }
    }
}

impl SymbolWord {
    /// Parse a space-joined word representation.
    pub fn from_representation(repr: &str) -> Self {
        representation_symbols(repr).collect()
    }

    /// Split a raw word into characters, terminated by [`END_OF_WORD`].
    pub fn from_word(word: &str) -> Self {
        let mut symbols: Vec<Symbol> = Vec::with_capacity(word.len() + 1);
        let mut buf = [0u8; 4];
        symbols.extend(word.chars().map(|c| Symbol::from(&*c.encode_utf8(&mut buf))));
        symbols.push(Symbol::from(END_OF_WORD));
        Self { symbols }
    }

    /// Render the canonical space-joined representation.
    pub fn to_representation(&self) -> String {
        self.symbols.join(" ")
    }

    /// The symbols that make up this word.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Consume the word, returning its symbols.
    pub fn into_symbols(self) -> Vec<Symbol> {
        self.symbols
    }

    /// Get the number of symbols in this word.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Get an iterator over adjacent symbol pairs.
    pub fn pairs(&self) -> impl Iterator<Item = Pair> + '_ {
        self.symbols.windows(2).map(|w| (w[0].clone(), w[1].clone()))
    }

    const INC: i32 = 1;
    const DEC: i32 = -1;

    /// Merge all non-overlapping occurrences of `pair`, scanning left to right.
    ///
    /// Only un-combined occurrences match: the pair must be two whole adjacent
    /// symbols, never a fragment of an already-merged symbol.
    ///
    /// # Arguments
    /// * `pair` - the pair to merge.
    /// * `on_merge` - a callback function to invoke for each incremental pair delta.
    ///   The function is called with:
    ///   - `pair` - the affected pair.
    ///   - `delta` - the pair count delta: `+1` for an added pair, `-1` for a removed pair.
    ///
    /// # Returns
    /// the number of occurrences merged.
    pub fn merge_pair_cb<F>(
        &mut self,
        pair: &Pair,
        on_merge: &mut F,
    ) -> usize
    where
        F: FnMut(Pair, i32),
    {
        let (a, b) = pair;
        let n = self.symbols.len();

        if n < 2 {
            return 0;
        }

        let merged: Symbol = {
            let mut s = a.clone();
            s.push_str(b);
            s
        };

        let mut new_symbols: Vec<Symbol> = Vec::with_capacity(n);
        let mut merges = 0;

        let mut i = 0;
        while i < n {
            let current = &self.symbols[i];

            if i + 1 < n && current == a && &self.symbols[i + 1] == b {
                if let Some(x) = new_symbols.last() {
                    on_merge((x.clone(), a.clone()), Self::DEC);
                    on_merge((x.clone(), merged.clone()), Self::INC);
                }

                on_merge(pair.clone(), Self::DEC);

                if i + 2 < n {
                    let y = &self.symbols[i + 2];
                    on_merge((b.clone(), y.clone()), Self::DEC);
                    on_merge((merged.clone(), y.clone()), Self::INC);
                }

                new_symbols.push(merged.clone());
                merges += 1;

                // Skip 'a' and 'b'.
                i += 2;
            } else {
                new_symbols.push(current.clone());
                i += 1;
            }
        }

        if merges > 0 {
            self.symbols = new_symbols;
        }
        merges
    }

    /// Merge all non-overlapping occurrences of `pair`.
    ///
    /// # Returns
    /// a delta list of pair count deltas for this word:
    /// * `(Pair, +1)` - for each instance of an added `Pair`.
    /// * `(Pair, -1)` - for each instance of a removed `Pair`.
    pub fn merge_pair(
        &mut self,
        pair: &Pair,
    ) -> Vec<(Pair, i32)> {
        let mut deltas: Vec<(Pair, i32)> = Vec::with_capacity(6);
        self.merge_pair_cb(pair, &mut |p, d| deltas.push((p, d)));
        deltas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(
        a: &str,
        b: &str,
    ) -> Pair {
        (a.into(), b.into())
    }

    #[test]
    fn test_word_representation_round_trip() {
        let word = SymbolWord::from_representation("f ak e </w>");
        assert_eq!(word.symbols(), &["f", "ak", "e", "</w>"]);
        assert_eq!(word.len(), 4);
        assert_eq!(word.to_representation(), "f ak e </w>");
    }

    #[test]
    fn test_from_word_matches_representation() {
        for w in ["fake", "a", "naïve", "x1"] {
            let word = SymbolWord::from_word(w);
            assert_eq!(
                word,
                SymbolWord::from_representation(&crate::training::word_split::word_representation(w))
            );
        }
        assert_eq!(SymbolWord::from_word("ab").symbols(), &["a", "b", "</w>"]);
    }

    #[test]
    fn test_word_pairs() {
        let word: SymbolWord = ["a", "b", "c"].into_iter().collect();
        assert_eq!(
            word.pairs().collect::<Vec<_>>(),
            vec![p("a", "b"), p("b", "c")]
        );

        let single: SymbolWord = ["</w>"].into_iter().collect();
        assert_eq!(single.pairs().count(), 0);
    }

    #[test]
    fn test_merge_only_uncombined() {
        // "a b" must not match inside "a bc".
        let mut word = SymbolWord::from_representation("a bc </w>");
        assert_eq!(word.merge_pair(&p("a", "b")), vec![]);
        assert_eq!(word.to_representation(), "a bc </w>");

        // nor inside "ab c".
        let mut word = SymbolWord::from_representation("xa b </w>");
        assert_eq!(word.merge_pair(&p("a", "b")), vec![]);
        assert_eq!(word.to_representation(), "xa b </w>");
    }

    #[test]
    fn test_merge_overlapping_run() {
        let mut word = SymbolWord::from_representation("a a a </w>");
        let merged = word.merge_pair_cb(&p("a", "a"), &mut |_, _| {});
        assert_eq!(merged, 1);
        assert_eq!(word.to_representation(), "aa a </w>");

        let mut word = SymbolWord::from_representation("a a a a");
        let deltas = word.merge_pair(&p("a", "a"));
        assert_eq!(word.to_representation(), "aa aa");
        assert_eq!(
            deltas,
            vec![
                // first match
                (p("a", "a"), -1),
                (p("a", "a"), -1),
                (p("aa", "a"), 1),
                // second match
                (p("aa", "a"), -1),
                (p("aa", "aa"), 1),
                (p("a", "a"), -1),
            ]
        );
    }

    #[test]
    fn test_word_merge_pair_deltas() {
        let mut word = SymbolWord::from_representation("w a i t </w>");

        let deltas = word.merge_pair(&p("a", "i"));
        assert_eq!(word.to_representation(), "w ai t </w>");

        assert_eq!(
            deltas,
            vec![
                (p("w", "a"), -1),
                (p("w", "ai"), 1),
                (p("a", "i"), -1),
                (p("i", "t"), -1),
                (p("ai", "t"), 1),
            ]
        );
    }
}
