//! # Vocabulary

pub mod builder;
pub mod vocab_io;
pub mod vocabulary;

pub use builder::VocabularyBuilder;
pub use vocab_io::{load_vocab_from_path, read_vocab, save_vocab_to_path, write_vocab};
pub use vocabulary::{VocabEntry, Vocabulary};
