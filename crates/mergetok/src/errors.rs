//! # Error Types

use thiserror::Error;

/// Errors raised by training, persistence, and encoding.
#[derive(Error, Debug)]
pub enum BpeError {
    /// A token has no entry in the vocabulary.
    #[error("token not in vocabulary: {0:?}")]
    UnknownToken(String),

    /// A token id has no entry in the vocabulary.
    #[error("token id not in vocabulary: {0}")]
    UnknownTokenId(u64),

    /// No vocabulary token covers some symbol of a word.
    #[error("cannot segment word {word:?}: no token matches symbol {symbol:?}")]
    UnsegmentableWord {
        /// The word being segmented.
        word: String,

        /// The first symbol with no matching token.
        symbol: String,
    },

    /// A persisted vocabulary failed to parse or validate.
    #[error("malformed vocabulary file (line {line}): {reason}")]
    MalformedVocabularyFile {
        /// 1-based line number.
        line: usize,

        /// What was wrong.
        reason: String,
    },

    /// A token id does not fit the id type.
    #[error("token id {0} does not fit the token id type")]
    TokenIdOverflow(u64),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The corpus collaborator failed.
    #[error("corpus error: {0}")]
    Corpus(#[source] anyhow::Error),

    /// Underlying I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BpeError {
    pub(crate) fn malformed<S: Into<String>>(
        line: usize,
        reason: S,
    ) -> Self {
        Self::MalformedVocabularyFile {
            line,
            reason: reason.into(),
        }
    }
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, BpeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            BpeError::UnknownToken("zz".into()).to_string(),
            "token not in vocabulary: \"zz\""
        );
        assert_eq!(
            BpeError::UnknownTokenId(42).to_string(),
            "token id not in vocabulary: 42"
        );
        assert_eq!(
            BpeError::malformed(3, "expected 3 fields, found 2").to_string(),
            "malformed vocabulary file (line 3): expected 3 fields, found 2"
        );

        let err = BpeError::UnsegmentableWord {
            word: "qx</w>".into(),
            symbol: "q".into(),
        };
        assert!(err.to_string().contains("\"q\""));
    }

    #[test]
    fn test_io_error_from() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: BpeError = io.into();
        assert!(matches!(err, BpeError::Io(_)));
    }
}
