//! # Tokenizer
//!
//! The public contract a trained subword tokenizer satisfies, and its
//! word-level BPE implementation.

pub mod bpe_tokenizer;

pub use bpe_tokenizer::BpeTokenizer;

use crate::corpus::TextSource;
use crate::errors::Result;
use crate::training::TrainerOptions;
use crate::types::Symbol;
use std::path::Path;

/// A trainable, persistable text tokenizer.
pub trait Tokenizer: Sized {
    /// The integer id type.
    type Id;

    /// Train over the training partition of `source`.
    fn train<S>(
        source: &S,
        options: TrainerOptions,
    ) -> Result<Self>
    where
        S: TextSource + ?Sized;

    /// Write the vocabulary to `path`.
    fn save<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<()>;

    /// Read a tokenizer from a vocabulary file at `path`.
    fn load<P: AsRef<Path>>(path: P) -> Result<Self>;

    /// Split text into vocabulary tokens.
    fn tokenize(
        &self,
        text: &str,
    ) -> Result<Vec<Symbol>>;

    /// Reassemble text from tokens.
    fn detokenize<S: AsRef<str>>(
        &self,
        tokens: &[S],
    ) -> String;

    /// Tokenize, then map tokens to ids.
    fn encode(
        &self,
        text: &str,
    ) -> Result<Vec<Self::Id>>;

    /// Map ids to tokens, then detokenize.
    fn decode(
        &self,
        ids: &[Self::Id],
    ) -> Result<String>;
}
