//! # Word Counting

use crate::training::word_split::split_words;
use crate::types::{CountType, StringChunkType, WordCountMap};

/// Count the word representations of one text item.
pub fn word_counts_from_text<K, C>(text: &str) -> WordCountMap<K, C>
where
    K: StringChunkType,
    C: CountType,
{
    let mut m: WordCountMap<K, C> = Default::default();
    update_word_counts_from_text(&mut m, text);
    m
}

/// Update word counts in-place from one text item.
pub fn update_word_counts_from_text<K, C>(
    word_counts: &mut WordCountMap<K, C>,
    text: &str,
) where
    K: StringChunkType,
    C: CountType,
{
    for repr in split_words(text) {
        let k: K = repr.as_str().into();
        *word_counts.entry(k).or_default() += C::one();
    }
}

/// Update word counts inplace from another map.
pub fn update_word_counts<K, C>(
    word_counts: &mut WordCountMap<K, C>,
    source: WordCountMap<K, C>,
) where
    K: StringChunkType,
    C: CountType,
{
    for (k, v) in source {
        *word_counts.entry(k).or_default() += v;
    }
}

/// Options for [`WordCounter`].
#[derive(Debug, Clone)]
pub struct WordCounterOptions {
    /// Whether to use parallel processing for word counting.
    ///
    /// Requires the `rayon` feature to be enabled.
    pub parallel: bool,
}

impl Default for WordCounterOptions {
    fn default() -> Self {
        Self {
            parallel: crate::DEFAULT_PARALLEL,
        }
    }
}

impl WordCounterOptions {
    /// Set the parallel processing option.
    pub fn with_parallel(
        self,
        parallel: bool,
    ) -> Self {
        Self { parallel }
    }
}

/// Accumulates a word frequency table over a stream of text items.
#[derive(Debug)]
pub struct WordCounter<K = String, C = u64>
where
    K: StringChunkType,
    C: CountType,
{
    /// Whether to use parallel processing for word counting.
    parallel: bool,

    /// The word counts.
    word_counts: WordCountMap<K, C>,
}

impl<K, C> WordCounter<K, C>
where
    K: StringChunkType,
    C: CountType,
{
    /// Create a new word counter.
    pub fn new(options: WordCounterOptions) -> Self {
        Self {
            parallel: crate::util::validators::expect_parallel(options.parallel),
            word_counts: Default::default(),
        }
    }

    /// Count all samples of an iterator in one shot.
    pub fn samples_to_word_counts<I>(
        samples: I,
        options: WordCounterOptions,
    ) -> WordCountMap<K, C>
    where
        I: Iterator + Send,
        I::Item: AsRef<str> + Send,
    {
        let mut counter = Self::new(options);
        counter.update_from_samples(samples);
        counter.release()
    }

    /// Get the parallel processing flag.
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Get the word counts.
    pub fn word_counts(&self) -> &WordCountMap<K, C> {
        &self.word_counts
    }

    /// Release the word counts and return them.
    pub fn release(self) -> WordCountMap<K, C> {
        self.word_counts
    }

    /// Update word counts inplace from text.
    pub fn update_from_text<S: AsRef<str>>(
        &mut self,
        text: S,
    ) {
        update_word_counts_from_text(&mut self.word_counts, text.as_ref());
    }

    /// Update word counts inplace from a sample iterator.
    pub fn update_from_samples<I>(
        &mut self,
        samples: I,
    ) where
        I: Iterator + Send,
        I::Item: AsRef<str> + Send,
    {
        if self.parallel {
            #[cfg(not(feature = "rayon"))]
            panic!("Parallel processing requires the `rayon` feature to be enabled.");

            #[cfg(feature = "rayon")]
            self.update_from_samples_rayon(samples)
        } else {
            self.update_from_samples_serial(samples);
        }
    }

    /// Update word counts inplace from a sample iterator.
    ///
    /// Uses serial processing, ignoring the `parallel` flag.
    pub fn update_from_samples_serial<I>(
        &mut self,
        samples: I,
    ) where
        I: Iterator,
        I::Item: AsRef<str>,
    {
        for sample in samples {
            self.update_from_text(sample);
        }
    }

    /// Update word counts inplace from a sample iterator.
    ///
    /// Uses parallel processing, ignoring the `parallel` flag.
    #[cfg(feature = "rayon")]
    pub fn update_from_samples_rayon<I>(
        &mut self,
        samples: I,
    ) where
        I: Iterator + Send,
        I::Item: AsRef<str> + Send,
    {
        use rayon::iter::ParallelBridge;
        use rayon::prelude::*;

        let updates: WordCountMap<K, C> = samples
            .par_bridge()
            .map(|sample| word_counts_from_text(sample.as_ref()))
            .reduce(WordCountMap::default, |mut a, b| {
                update_word_counts(&mut a, b);
                a
            });

        self.update_from_word_counts(updates)
    }

    /// Update word counts inplace from a map.
    pub fn update_from_word_counts(
        &mut self,
        word_counts: WordCountMap<K, C>,
    ) {
        update_word_counts(&mut self.word_counts, word_counts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compact_str::CompactString;
    use num_traits::FromPrimitive;

    #[test]
    fn test_text_to_word_counts() {
        let counts: WordCountMap<String, u32> = word_counts_from_text("fake fake cake");
        check_common_counts(counts);
    }

    #[test]
    fn test_update_word_counts() {
        let mut counts1: WordCountMap<CompactString, usize> = word_counts_from_text("fake");
        let counts2 = word_counts_from_text("cake fake");

        update_word_counts(&mut counts1, counts2);
        check_common_counts(counts1);
    }

    #[test]
    fn test_word_counter_serial() {
        test_word_counter(false);
    }

    #[test]
    #[cfg(feature = "rayon")]
    fn test_word_counter_parallel() {
        test_word_counter(true);
    }

    fn test_word_counter(parallel: bool) {
        let samples = vec!["fake", "cake", "fake"];
        let counts: WordCountMap<String, u64> = WordCounter::samples_to_word_counts(
            samples.iter(),
            WordCounterOptions::default().with_parallel(parallel),
        );
        check_common_counts(counts);
    }

    #[test]
    fn test_word_counter_empty() {
        let mut wc: WordCounter<String, u64> =
            WordCounter::new(WordCounterOptions::default().with_parallel(false));
        wc.update_from_text("   ");
        assert!(!wc.parallel());
        assert!(wc.word_counts().is_empty());
    }

    fn check_common_counts<K, C>(counts: WordCountMap<K, C>)
    where
        K: StringChunkType,
        C: CountType,
    {
        let mut counts: Vec<(K, C)> = counts.into_iter().collect::<Vec<_>>();
        counts.sort();
        assert_eq!(
            counts,
            vec![
                ("c a k e </w>".into(), C::from_usize(1).unwrap()),
                ("f a k e </w>".into(), C::from_usize(2).unwrap()),
            ]
        );
    }
}
