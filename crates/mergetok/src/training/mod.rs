//! # Vocabulary Training
//!
//! ``text -> word counts -> [pair count <-> merge]* -> vocabulary``

pub mod merge_engine;
pub mod pair_index;
pub mod symbol_word;
pub mod trainer;
pub mod word_count;
pub mod word_split;

pub use merge_engine::{MergeEngine, MergeRule, MergeState, MergeStep, MergeStrategy};
pub use trainer::{TrainResults, TrainerOptions};
