//! # Word-Level BPE Tokenizer
//!
//! Learns a subword vocabulary from a text corpus by repeatedly merging the
//! most frequent adjacent symbol pair inside whitespace-delimited words
//! (Sennrich et al., 2015), then segments new text against that vocabulary
//! and maps the resulting tokens to integer ids.
//!
//! Every word is split into characters and terminated by [`END_OF_WORD`],
//! so merges never cross a word boundary and decoding can restore spacing.
//!
//! # Training Example
//!
//! ```rust
//! use mergetok::corpus::InMemoryTextSource;
//! use mergetok::tokenizer::{BpeTokenizer, Tokenizer};
//! use mergetok::training::TrainerOptions;
//!
//! let source = InMemoryTextSource::new(["fake cake", "fake fake cake"]).with_train_ratio(1.0);
//! let tokenizer: BpeTokenizer<u32> =
//!     BpeTokenizer::train(&source, TrainerOptions::default().with_num_merges(3)).unwrap();
//!
//! assert_eq!(
//!     tokenizer.tokenize("fake cake").unwrap(),
//!     vec!["f", "ake</w>", "c", "ake</w>"],
//! );
//!
//! let ids = tokenizer.encode("cake fake").unwrap();
//! assert_eq!(tokenizer.decode(&ids).unwrap(), "cake fake");
//! ```
#![warn(missing_docs, unused)]

pub mod corpus;
pub mod errors;
pub mod segmentation;
pub mod tokenizer;
pub mod training;
pub mod types;
pub mod util;
pub mod vocab;

pub use errors::{BpeError, Result};

/// The reserved symbol appended to every word.
pub const END_OF_WORD: &str = "</w>";

/// Default number of merge iterations attempted during training.
pub const DEFAULT_NUM_MERGES: usize = 1000;

/// Default value for parallel processing; based on the `rayon` feature.
#[cfg(feature = "rayon")]
pub const DEFAULT_PARALLEL: bool = true;
#[cfg(not(feature = "rayon"))]
pub const DEFAULT_PARALLEL: bool = false;
