use std::io;
use std::str::Utf8Error;

use thiserror::Error;

/// Errors that can occur while building vocabularies or splitting
/// words into word pieces.
#[derive(Debug, Error)]
pub enum WordPiecesError {
    /// Finite state automaton error.
    #[error(transparent)]
    FstError(#[from] fst::Error),

    /// IO error.
    #[error(transparent)]
    IOError(#[from] io::Error),

    /// The vocabulary contains the same piece more than once.
    #[error("duplicate word piece in vocabulary: {0:?}")]
    DuplicatePiece(String),

    /// A vocabulary needs at least one out-of-vocabulary bucket.
    #[error("the number of out-of-vocabulary buckets must be at least 1")]
    NoOovBuckets,

    /// Ids were requested, but the unknown token has no id.
    #[error("unknown token {0:?} is not in the vocabulary")]
    UnknownTokenNotInVocab(String),

    /// A word is not valid UTF-8.
    #[error("word is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] Utf8Error),
}
