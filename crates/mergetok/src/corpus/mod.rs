//! # Corpus Sources
//!
//! The training corpus is supplied by a [`TextSource`]: an ordered sequence
//! of raw text items, partitioned into training and validation data.

pub mod text_source;

pub use text_source::*;
