use std::convert::TryFrom;
use std::hash::Hasher;
use std::io::{BufRead, Lines};
use std::iter;

use rustc_hash::{FxHashMap, FxHasher};
use tracing::debug;

use crate::WordPiecesError;

/// Lookup of word pieces in a vocabulary.
///
/// Vocabularies are immutable after construction, so a single
/// vocabulary can be shared between threads.
pub trait Vocab {
    /// Get the id of a piece, if the piece is in the vocabulary.
    fn lookup(&self, piece: &str) -> Option<u64>;

    /// Get the id of a piece, assigning an out-of-vocabulary bucket
    /// to pieces that are not in the vocabulary.
    fn lookup_with_oov_fallback(&self, piece: &str) -> u64;

    /// Find the longest vocabulary entry of the form
    /// `marker + rest[..len]`.
    ///
    /// Returns the byte length `len` of the matched part of `rest`
    /// and the id of the entry. `len` is always larger than zero and
    /// always lies on a character boundary of `rest`.
    fn longest_prefix(&self, marker: &str, rest: &str) -> Option<(usize, u64)> {
        let mut candidate = String::with_capacity(marker.len() + rest.len());

        // Candidate ends, from the end of `rest` down to the end of
        // its first character.
        let ends = iter::once(rest.len()).chain(
            rest.char_indices()
                .rev()
                .map(|(idx, _)| idx)
                .take_while(|&idx| idx > 0),
        );

        for end in ends.filter(|&end| end > 0) {
            candidate.clear();
            candidate.push_str(marker);
            candidate.push_str(&rest[..end]);

            if let Some(id) = self.lookup(&candidate) {
                return Some((end, id));
            }
        }

        None
    }
}

/// Assign an out-of-vocabulary id to a piece.
///
/// Ids are in `[vocab_size, vocab_size + n_oov_buckets)`. The hash is
/// deterministic, so the same piece is always assigned the same bucket
/// on a given target. `FxHasher` hashes in `usize` words, so buckets
/// differ between 32-bit and 64-bit targets.
pub fn oov_bucket(piece: &str, vocab_size: u64, n_oov_buckets: u64) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(piece.as_bytes());
    vocab_size + hasher.finish() % n_oov_buckets
}

/// Read a vocabulary with one piece per line.
pub(crate) fn read_pieces<R>(lines: Lines<R>) -> Result<Vec<String>, WordPiecesError>
where
    R: BufRead,
{
    lines
        .map(|line| line.map_err(WordPiecesError::from))
        .collect()
}

/// A vocabulary backed by a hash table.
///
/// Each piece is assigned its position in the piece list as its id.
#[derive(Clone, Debug)]
pub struct HashVocab {
    pieces: FxHashMap<String, u64>,
    n_oov_buckets: u64,
}

impl HashVocab {
    /// Construct a vocabulary from a list of pieces.
    pub fn new<I, S>(pieces: I, n_oov_buckets: usize) -> Result<Self, WordPiecesError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if n_oov_buckets == 0 {
            return Err(WordPiecesError::NoOovBuckets);
        }

        let mut piece_ids = FxHashMap::default();
        for (idx, piece) in pieces.into_iter().enumerate() {
            let piece = piece.into();
            if piece_ids.contains_key(&piece) {
                return Err(WordPiecesError::DuplicatePiece(piece));
            }
            piece_ids.insert(piece, idx as u64);
        }

        debug!(
            vocab_size = piece_ids.len(),
            n_oov_buckets, "hash vocabulary constructed"
        );

        Ok(HashVocab {
            pieces: piece_ids,
            n_oov_buckets: n_oov_buckets as u64,
        })
    }

    /// Read a vocabulary with one piece per line.
    pub fn from_lines<R>(lines: Lines<R>, n_oov_buckets: usize) -> Result<Self, WordPiecesError>
    where
        R: BufRead,
    {
        HashVocab::new(read_pieces(lines)?, n_oov_buckets)
    }

    /// Get the number of pieces in the vocabulary.
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Returns `true` if the vocabulary has no pieces.
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

impl Vocab for HashVocab {
    fn lookup(&self, piece: &str) -> Option<u64> {
        self.pieces.get(piece).copied()
    }

    fn lookup_with_oov_fallback(&self, piece: &str) -> u64 {
        self.lookup(piece).unwrap_or_else(|| {
            oov_bucket(piece, self.pieces.len() as u64, self.n_oov_buckets)
        })
    }
}

impl<R> TryFrom<Lines<R>> for HashVocab
where
    R: BufRead,
{
    type Error = WordPiecesError;

    fn try_from(lines: Lines<R>) -> Result<Self, Self::Error> {
        HashVocab::from_lines(lines, 1)
    }
}
