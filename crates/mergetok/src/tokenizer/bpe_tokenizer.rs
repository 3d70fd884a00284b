//! # BPE Tokenizer

use crate::corpus::TextSource;
use crate::errors::Result;
use crate::segmentation::LongestMatchSegmenter;
use crate::tokenizer::Tokenizer;
use crate::training::TrainerOptions;
use crate::types::{Symbol, TokenType};
use crate::util::validators;
use crate::vocab::{Vocabulary, load_vocab_from_path, save_vocab_to_path};
use crate::{DEFAULT_PARALLEL, END_OF_WORD};
use std::path::Path;
use std::sync::Arc;

/// A word-level BPE tokenizer over a trained [`Vocabulary`].
///
/// Immutable once built; safe to share across threads.
#[derive(Debug, Clone)]
pub struct BpeTokenizer<T: TokenType = u32> {
    segmenter: LongestMatchSegmenter<T>,

    /// Whether batch calls use ``rayon``.
    parallel: bool,
}

impl<T: TokenType> BpeTokenizer<T> {
    /// Wrap a vocabulary.
    pub fn from_vocab(vocab: Vocabulary<T>) -> Self {
        Self {
            segmenter: LongestMatchSegmenter::new(Arc::new(vocab)),
            parallel: DEFAULT_PARALLEL,
        }
    }

    /// Sets whether batch calls run in parallel; requires the `rayon` feature.
    pub fn with_parallel(
        self,
        parallel: bool,
    ) -> Self {
        Self {
            parallel: validators::expect_parallel(parallel),
            ..self
        }
    }

    /// The vocabulary.
    pub fn vocab(&self) -> &Vocabulary<T> {
        self.segmenter.vocab()
    }

    /// Tokenize a single whitespace-free word.
    pub fn tokenize_word(
        &self,
        word: &str,
    ) -> Result<Vec<Symbol>> {
        self.segmenter.segment_word(word)
    }

    /// Encode a batch of texts.
    pub fn encode_batch<S>(
        &self,
        batch: &[S],
    ) -> Result<Vec<Vec<T>>>
    where
        S: AsRef<str> + Sync,
    {
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            if self.parallel {
                return batch
                    .par_iter()
                    .map(|text| self.encode(text.as_ref()))
                    .collect();
            }
        }

        batch.iter().map(|text| self.encode(text.as_ref())).collect()
    }

    /// Decode a batch of id sequences.
    pub fn decode_batch<S>(
        &self,
        batch: &[S],
    ) -> Result<Vec<String>>
    where
        S: AsRef<[T]> + Sync,
    {
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            if self.parallel {
                return batch
                    .par_iter()
                    .map(|ids| self.decode(ids.as_ref()))
                    .collect();
            }
        }

        batch.iter().map(|ids| self.decode(ids.as_ref())).collect()
    }
}

impl<T: TokenType> Tokenizer for BpeTokenizer<T> {
    type Id = T;

    fn train<S>(
        source: &S,
        options: TrainerOptions,
    ) -> Result<Self>
    where
        S: TextSource + ?Sized,
    {
        let parallel = options.parallel;
        let results = options.train_vocab_from_source::<T, S>(source)?;
        Ok(Self::from_vocab(results.vocab).with_parallel(parallel))
    }

    fn save<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<()> {
        save_vocab_to_path(self.vocab(), path)
    }

    fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_vocab(load_vocab_from_path(path)?))
    }

    fn tokenize(
        &self,
        text: &str,
    ) -> Result<Vec<Symbol>> {
        self.segmenter.segment(text)
    }

    fn detokenize<S: AsRef<str>>(
        &self,
        tokens: &[S],
    ) -> String {
        let joined: String = tokens.iter().map(|t| t.as_ref()).collect();
        joined.replace(END_OF_WORD, " ").trim_end().to_string()
    }

    fn encode(
        &self,
        text: &str,
    ) -> Result<Vec<T>> {
        let vocab = self.vocab();
        self.tokenize(text)?
            .iter()
            .map(|token| vocab.token_to_id(token))
            .collect()
    }

    fn decode(
        &self,
        ids: &[T],
    ) -> Result<String> {
        let vocab = self.vocab();
        let tokens = ids
            .iter()
            .map(|&id| vocab.id_to_token(id))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.detokenize(&tokens))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BpeError;
    use crate::corpus::InMemoryTextSource;
    use crate::types::{check_is_send, check_is_sync};

    fn train(
        items: &[&str],
        num_merges: usize,
    ) -> BpeTokenizer<u32> {
        let source = InMemoryTextSource::new(items.iter().copied()).with_train_ratio(1.0);
        BpeTokenizer::train(
            &source,
            TrainerOptions::default().with_num_merges(num_merges),
        )
        .unwrap()
    }

    #[test]
    fn test_tokenizer() {
        let tokenizer = train(&["fake cake", "fake fake cake"], 3);
        check_is_send(&tokenizer);
        check_is_sync(&tokenizer);

        assert_eq!(
            tokenizer.tokenize("fake cake").unwrap(),
            vec!["f", "ake</w>", "c", "ake</w>"]
        );
        assert_eq!(
            tokenizer.vocab().tokens().collect::<Vec<_>>(),
            vec!["ake</w>", "c", "f"]
        );

        let ids = tokenizer.encode("cake fake").unwrap();
        assert_eq!(ids, vec![1, 0, 2, 0]);
        assert_eq!(tokenizer.decode(&ids).unwrap(), "cake fake");
    }

    #[test]
    fn test_detokenize() {
        let tokenizer = train(&["ab"], 0);
        assert_eq!(
            tokenizer.detokenize(&["f", "ake</w>", "c", "ake</w>"]),
            "fake cake"
        );
        assert_eq!(tokenizer.detokenize::<&str>(&[]), "");
        assert_eq!(tokenizer.detokenize(&["a", "b"]), "ab");
    }

    #[test]
    fn test_whitespace_normalized() {
        let tokenizer = train(&["ab ba"], 10);
        let ids = tokenizer.encode("  ab\t\tba \n").unwrap();
        assert_eq!(tokenizer.decode(&ids).unwrap(), "ab ba");
        assert!(tokenizer.encode("   ").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_id() {
        let tokenizer = train(&["ab"], 0);
        assert_eq!(tokenizer.vocab().len(), 3);
        assert!(matches!(
            tokenizer.decode(&[0, 3]),
            Err(BpeError::UnknownTokenId(3))
        ));
    }

    #[test]
    fn test_batches() {
        let tokenizer = train(&["low lower lowest", "newer wider"], 20);
        let texts = ["low newer", "wider lowest lower"];

        let serial = tokenizer.clone().with_parallel(false);
        let encoded = serial.encode_batch(&texts).unwrap();
        assert_eq!(serial.decode_batch(&encoded).unwrap(), texts);

        #[cfg(feature = "rayon")]
        {
            let parallel = tokenizer.with_parallel(true);
            assert_eq!(parallel.encode_batch(&texts).unwrap(), encoded);
            assert_eq!(parallel.decode_batch(&encoded).unwrap(), texts);
        }
    }

    #[test]
    fn test_save_load() {
        let tokenizer = train(&["low lower lowest", "newer wider"], 8);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model").join("vocab.tsv");

        tokenizer.save(&path).unwrap();
        let loaded = BpeTokenizer::<u32>::load(&path).unwrap();

        assert_eq!(loaded.vocab(), tokenizer.vocab());
        assert_eq!(
            loaded.encode("lowest wider").unwrap(),
            tokenizer.encode("lowest wider").unwrap()
        );
    }
}
