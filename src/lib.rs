//! Split ragged sequences of words into word pieces.
//!
//! Words are split greedily into the longest pieces found in a
//! vocabulary. Pieces that do not start a word carry a continuation
//! marker such as `##`. Words that cannot be split are replaced by an
//! unknown token as a whole. Each piece comes with the byte offsets
//! of the part of the word that it covers.

mod automaton;
pub use automaton::{PrefixAutomaton, PrefixAutomatonState};

mod config;
pub use config::{
    WordPiecesConfig, DEFAULT_CONTINUATION_MARKER, DEFAULT_MAX_WORD_LENGTH, DEFAULT_UNKNOWN_TOKEN,
};

mod error;
pub use error::WordPiecesError;

mod fst_vocab;
pub use fst_vocab::FstVocab;

mod nested;
pub use nested::TokensWithOffsets;

mod ragged;
pub use ragged::{Leaves, Ragged};

mod vocab;
pub use vocab::{oov_bucket, HashVocab, Vocab};

mod word_pieces;
pub use word_pieces::{Token, WordPiece, WordPieces};
