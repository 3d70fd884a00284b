//! # Segmentation
//!
//! Maps raw text to a sequence of vocabulary tokens.

pub mod longest_match;

pub use longest_match::LongestMatchSegmenter;
