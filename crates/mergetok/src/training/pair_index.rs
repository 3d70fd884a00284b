//! # Pair Counting / Word Indexing

use crate::training::symbol_word::SymbolWord;
use crate::training::word_split::representation_symbols;
use crate::types::{CountType, Pair, PairCountMap, StringChunkType, Symbol, WordCountMap};
use ahash::{AHashMap, AHashSet};

/// Count adjacent symbol pairs over a ``{word representation -> count}`` table.
///
/// Every adjacent pair of a word contributes that word's count;
/// words with fewer than 2 symbols contribute nothing.
pub fn count_pairs<K, C>(word_counts: &WordCountMap<K, C>) -> PairCountMap<C>
where
    K: StringChunkType,
    C: CountType,
{
    let mut pair_counts: PairCountMap<C> = Default::default();
    for (word, &count) in word_counts {
        let mut symbols = representation_symbols(word.as_ref());
        let Some(mut prev) = symbols.next() else {
            continue;
        };
        for next in symbols {
            *pair_counts
                .entry((Symbol::from(prev), Symbol::from(next)))
                .or_default() += count;
            prev = next;
        }
    }
    pair_counts
}

/// Options for building a [`PairIndex`].
#[derive(Debug, Clone, Copy)]
pub struct PairIndexOptions {
    /// Whether to use parallel processing for indexing.
    ///
    /// Requires the `rayon` feature to be enabled.
    pub parallel: bool,
}

impl Default for PairIndexOptions {
    fn default() -> Self {
        Self {
            parallel: crate::DEFAULT_PARALLEL,
        }
    }
}

impl PairIndexOptions {
    /// Sets the parallel processing flag.
    pub fn with_parallel(
        self,
        parallel: bool,
    ) -> Self {
        Self { parallel }
    }
}

/// An index of [`Pair`]s over an index set of ``(word, count)``.
#[derive(Debug)]
pub struct PairIndex<C: CountType> {
    /// A map from [`Pair`] to its occurrence count.
    ///
    /// ``sum(words[i].window_count(pair) * word_counts[i]) for all i``
    pub pair_counts: PairCountMap<C>,

    /// A map from [`Pair`] to indices over ``words``.
    pub pair_to_word_index: AHashMap<Pair, AHashSet<usize>>,
}

impl<C: CountType> PairIndex<C> {
    /// Build a [`PairIndex`] from a slice of [`SymbolWord`]s, using a count table.
    ///
    /// # Arguments
    /// * `words` - the slice of words; Words are assumed to be unique.
    /// * `word_counts` - `word_counts[i]` is the count of `words[i]`.
    /// * `options` - options for building the index.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(words, word_counts)))]
    pub fn index_unique_word_counts_table(
        words: &[SymbolWord],
        word_counts: &[C],
        options: PairIndexOptions,
    ) -> Self {
        if options.parallel {
            #[cfg(not(feature = "rayon"))]
            panic!("Parallel processing requires the `rayon` feature to be enabled.");

            #[cfg(feature = "rayon")]
            Self::index_unique_word_counts_table_rayon(words, word_counts, options)
        } else {
            Self::index_unique_word_counts_table_serial(words, word_counts, options)
        }
    }

    fn observe_word(
        pair_counts: &mut PairCountMap<C>,
        pair_to_word_index: &mut AHashMap<Pair, AHashSet<usize>>,
        index: usize,
        w: &SymbolWord,
        word_count: C,
    ) {
        if word_count != C::zero() && w.len() >= 2 {
            for p in w.pairs() {
                *pair_counts.entry(p.clone()).or_default() += word_count;
                pair_to_word_index.entry(p).or_default().insert(index);
            }
        }
    }

    /// Build a [`PairIndex`] from a slice of [`SymbolWord`]s, using a count table.
    ///
    /// This is a serial implementation that does not use parallelism;
    /// this ignores the `options.parallel` flag.
    pub fn index_unique_word_counts_table_serial(
        words: &[SymbolWord],
        word_counts: &[C],
        _options: PairIndexOptions,
    ) -> Self {
        let mut pair_counts: PairCountMap<C> = Default::default();
        let mut pair_to_word_index: AHashMap<Pair, AHashSet<usize>> = Default::default();

        for (word_index, word) in words.iter().enumerate() {
            Self::observe_word(
                &mut pair_counts,
                &mut pair_to_word_index,
                word_index,
                word,
                word_counts[word_index],
            );
        }

        Self {
            pair_counts,
            pair_to_word_index,
        }
    }

    /// Build a [`PairIndex`] from a slice of [`SymbolWord`]s, using a count table.
    ///
    /// This is a `rayon` implementation that uses parallelism;
    /// this ignores the `options.parallel` flag.
    #[cfg(feature = "rayon")]
    pub fn index_unique_word_counts_table_rayon(
        words: &[SymbolWord],
        word_counts: &[C],
        _options: PairIndexOptions,
    ) -> Self {
        use rayon::prelude::*;

        let (pair_counts, pair_to_word_index) = words
            .par_iter()
            .enumerate()
            .fold(
                || (PairCountMap::<C>::default(), AHashMap::default()),
                |(mut pc, mut wi), (word_index, word)| {
                    Self::observe_word(&mut pc, &mut wi, word_index, word, word_counts[word_index]);
                    (pc, wi)
                },
            )
            .reduce(
                || (PairCountMap::<C>::default(), AHashMap::default()),
                |(mut acc_pc, mut acc_wi), (pc, wi)| {
                    for (k, v) in pc {
                        *acc_pc.entry(k).or_default() += v;
                    }
                    for (k, s) in wi {
                        acc_wi.entry(k).or_insert_with(AHashSet::new).extend(s);
                    }
                    (acc_pc, acc_wi)
                },
            );

        Self {
            pair_counts,
            pair_to_word_index,
        }
    }
}
