use std::fmt;
use std::str;

use tracing::{debug, trace};

use crate::{Vocab, WordPiecesConfig, WordPiecesError};

/// The token of a word piece: either the piece itself or its
/// vocabulary id.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Token {
    /// A piece, including the continuation marker for pieces that
    /// are not word-initial.
    Piece(String),

    /// A vocabulary id.
    Id(u64),
}

impl Token {
    /// Unwrap a piece if present.
    pub fn piece(&self) -> Option<&str> {
        match self {
            Token::Piece(piece) => Some(piece),
            Token::Id(_) => None,
        }
    }

    /// Unwrap an id if present.
    pub fn id(&self) -> Option<u64> {
        match *self {
            Token::Piece(_) => None,
            Token::Id(id) => Some(id),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Piece(piece) => f.write_str(piece),
            Token::Id(id) => write!(f, "{}", id),
        }
    }
}

impl<'a> PartialEq<&'a str> for Token {
    fn eq(&self, other: &&'a str) -> bool {
        self.piece() == Some(*other)
    }
}

impl PartialEq<u64> for Token {
    fn eq(&self, other: &u64) -> bool {
        self.id() == Some(*other)
    }
}

/// A single word piece.
///
/// `start` and `end` are byte offsets into the word the piece was
/// split from. The continuation marker is never part of the span.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WordPiece {
    pub token: Token,
    pub start: usize,
    pub end: usize,
}

/// Splitter of words into word pieces.
///
/// Words are split greedily, taking the longest vocabulary piece at
/// each position. If a word cannot be split completely, the whole
/// word is replaced by a single unknown piece.
pub struct WordPieces<V> {
    vocab: V,
    config: WordPiecesConfig,
    unknown_id: Option<u64>,
}

impl<V> WordPieces<V>
where
    V: Vocab,
{
    /// Construct a word piece splitter.
    ///
    /// Fails when ids are requested and the unknown token is not in
    /// the vocabulary.
    pub fn new(vocab: V, config: WordPiecesConfig) -> Result<Self, WordPiecesError> {
        let unknown_id = match (&config.unknown_token, config.output_as_id) {
            (Some(unknown_token), true) => Some(
                vocab
                    .lookup(unknown_token)
                    .ok_or_else(|| WordPiecesError::UnknownTokenNotInVocab(unknown_token.clone()))?,
            ),
            _ => None,
        };

        debug!(
            unknown_token = ?config.unknown_token,
            continuation_marker = %config.continuation_marker,
            max_word_length = config.max_word_length,
            output_as_id = config.output_as_id,
            "word piece splitter constructed"
        );

        Ok(WordPieces {
            vocab,
            config,
            unknown_id,
        })
    }

    /// Get the splitter configuration.
    pub fn config(&self) -> &WordPiecesConfig {
        &self.config
    }

    /// Get the vocabulary.
    pub fn vocab(&self) -> &V {
        &self.vocab
    }

    /// Split a word into word pieces.
    ///
    /// The empty word has no pieces.
    pub fn split(&self, word: &str) -> Vec<WordPiece> {
        if word.is_empty() {
            return Vec::new();
        }

        if word.chars().count() > self.config.max_word_length {
            trace!(word, "word exceeds maximum length");
            return vec![self.unknown_piece(word)];
        }

        let mut pieces = Vec::new();
        let mut start = 0;
        while start < word.len() {
            let marker = if start == 0 {
                ""
            } else {
                self.config.continuation_marker.as_str()
            };

            match self.vocab.longest_prefix(marker, &word[start..]) {
                Some((len, id)) if len > 0 => {
                    let end = start + len;
                    pieces.push(WordPiece {
                        token: self.found_token(marker, &word[start..end], id),
                        start,
                        end,
                    });
                    start = end;
                }
                _ => {
                    // Discard partial results, the word is unknown as a whole.
                    trace!(word, start, "no word piece found");
                    return vec![self.unknown_piece(word)];
                }
            }
        }

        pieces
    }

    /// Split a UTF-8 encoded word into word pieces.
    pub fn split_bytes(&self, word: &[u8]) -> Result<Vec<WordPiece>, WordPiecesError> {
        Ok(self.split(str::from_utf8(word)?))
    }

    fn found_token(&self, marker: &str, piece: &str, id: u64) -> Token {
        if self.config.output_as_id {
            Token::Id(id)
        } else {
            let mut marked = String::with_capacity(marker.len() + piece.len());
            marked.push_str(marker);
            marked.push_str(piece);
            Token::Piece(marked)
        }
    }

    fn unknown_piece(&self, word: &str) -> WordPiece {
        let token = match (&self.config.unknown_token, self.unknown_id) {
            (_, Some(id)) => Token::Id(id),
            (Some(unknown_token), None) => Token::Piece(unknown_token.clone()),
            (None, None) if self.config.output_as_id => {
                Token::Id(self.vocab.lookup_with_oov_fallback(word))
            }
            (None, None) => Token::Piece(word.to_owned()),
        };

        WordPiece {
            token,
            start: 0,
            end: word.len(),
        }
    }
}
