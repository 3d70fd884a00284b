//! # Vocab Trainer

use crate::corpus::TextSource;
use crate::errors::{BpeError, Result};
use crate::training::merge_engine::{MergeEngine, MergeRule, MergeStrategy};
use crate::training::word_count::{WordCounter, WordCounterOptions};
use crate::types::{CountType, StringChunkType, TokenType, WordCountMap};
use crate::util::validators;
use crate::vocab::{Vocabulary, VocabularyBuilder};
use crate::{DEFAULT_NUM_MERGES, DEFAULT_PARALLEL};

/// Options for training a [`Vocabulary`].
#[derive(Debug, Clone)]
pub struct TrainerOptions {
    /// Number of merge iterations attempted.
    ///
    /// Fewer merges happen if the pairs run out first.
    pub num_merges: usize,

    /// Whether to use parallel processing for counting and indexing;
    /// requires the `rayon` feature to be enabled.
    pub parallel: bool,

    /// How pairs are recounted between merges.
    pub strategy: MergeStrategy,
}

impl Default for TrainerOptions {
    fn default() -> Self {
        Self {
            num_merges: DEFAULT_NUM_MERGES,
            parallel: DEFAULT_PARALLEL,
            strategy: MergeStrategy::default(),
        }
    }
}

/// Training results.
#[derive(Debug, Clone)]
pub struct TrainResults<T: TokenType> {
    /// The trained vocabulary.
    pub vocab: Vocabulary<T>,

    /// The merges performed, in order.
    pub merges: Vec<MergeRule>,

    /// The final ``{word representation -> count}`` table.
    pub word_counts: WordCountMap<String, u64>,
}

impl TrainerOptions {
    /// Sets the number of merges.
    pub fn with_num_merges(
        self,
        num_merges: usize,
    ) -> Self {
        Self { num_merges, ..self }
    }

    /// Sets whether to use parallel processing; requires the `rayon` feature to be enabled.
    pub fn with_parallel(
        self,
        parallel: bool,
    ) -> Self {
        Self {
            parallel: validators::expect_parallel(parallel),
            ..self
        }
    }

    /// Sets the pair recount strategy.
    pub fn with_strategy(
        self,
        strategy: MergeStrategy,
    ) -> Self {
        Self { strategy, ..self }
    }

    /// Validates the options.
    pub fn validate(&self) -> anyhow::Result<()> {
        validators::try_parallel(self.parallel)?;
        Ok(())
    }

    /// Trains over the training partition of a [`TextSource`].
    pub fn train_vocab_from_source<T, S>(
        self,
        source: &S,
    ) -> Result<TrainResults<T>>
    where
        T: TokenType,
        S: TextSource + ?Sized,
    {
        let items = source.load_text_items(true).map_err(BpeError::Corpus)?;
        log::info!("Loaded {} training text items", items.len());
        self.train_vocab_from_sample_iter::<T, String, u64, _>(items.iter())
    }

    /// Trains over a sample iterator.
    pub fn train_vocab_from_sample_iter<T, K, C, I>(
        self,
        samples: I,
    ) -> Result<TrainResults<T>>
    where
        T: TokenType,
        K: StringChunkType,
        C: CountType,
        I: Iterator + Send,
        I::Item: AsRef<str> + Send,
    {
        self.validate()
            .map_err(|e| BpeError::Config(e.to_string()))?;

        let word_counts = WordCounter::<K, C>::samples_to_word_counts(
            samples,
            WordCounterOptions::default().with_parallel(self.parallel),
        );

        self.train_vocab_from_word_counts(&word_counts)
    }

    /// Trains over a ``{word representation -> count}`` table.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, word_counts)))]
    pub fn train_vocab_from_word_counts<T, K, C>(
        self,
        word_counts: &WordCountMap<K, C>,
    ) -> Result<TrainResults<T>>
    where
        T: TokenType,
        K: StringChunkType,
        C: CountType,
    {
        log::info!(
            "Starting BPE training: {} unique words, up to {} merges ({:?})",
            word_counts.len(),
            self.num_merges,
            self.strategy
        );

        let mut engine = MergeEngine::new(
            word_counts,
            self.num_merges,
            self.strategy,
            self.parallel,
        );
        let merges_done = engine.run();
        if merges_done < self.num_merges {
            log::info!(
                "Pairs exhausted after {} of {} merges",
                merges_done,
                self.num_merges
            );
        }

        let (final_counts, merges) = engine.finish();
        let vocab: Vocabulary<T> = VocabularyBuilder::new()
            .with_word_counts(&final_counts)
            .build()?;

        log::info!(
            "Finished training: {} merges completed, {} tokens",
            merges_done,
            vocab.len()
        );

        let word_counts = final_counts
            .into_iter()
            .map(|(k, c)| (k, c.to_u64().unwrap_or(u64::MAX)))
            .collect();

        Ok(TrainResults {
            vocab,
            merges,
            word_counts,
        })
    }
}
