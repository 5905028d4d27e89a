use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::io::{BufRead, Lines};

use fst::{IntoStreamer, Map, MapBuilder, Streamer};
use tracing::debug;

use crate::vocab::{oov_bucket, read_pieces};
use crate::{PrefixAutomaton, Vocab, WordPiecesError};

/// A vocabulary backed by a finite state transducer.
///
/// Each piece is assigned its position in the piece list as its id.
/// The longest matching piece of a word is found in a single
/// traversal of the transducer.
pub struct FstVocab {
    pieces: Map<Vec<u8>>,
    n_oov_buckets: u64,
}

impl FstVocab {
    /// Construct a vocabulary from a list of pieces.
    pub fn new<I, S>(pieces: I, n_oov_buckets: usize) -> Result<Self, WordPiecesError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if n_oov_buckets == 0 {
            return Err(WordPiecesError::NoOovBuckets);
        }

        // Transducer keys must be inserted in lexicographic order.
        let mut sorted = BTreeMap::new();
        for (idx, piece) in pieces.into_iter().enumerate() {
            let piece = piece.into();
            if sorted.contains_key(&piece) {
                return Err(WordPiecesError::DuplicatePiece(piece));
            }
            sorted.insert(piece, idx as u64);
        }

        let mut builder = MapBuilder::memory();
        builder.extend_iter(sorted)?;
        let pieces = Map::new(builder.into_inner()?)?;

        debug!(
            vocab_size = pieces.len(),
            n_oov_buckets, "fst vocabulary constructed"
        );

        Ok(FstVocab {
            pieces,
            n_oov_buckets: n_oov_buckets as u64,
        })
    }

    /// Read a vocabulary with one piece per line.
    pub fn from_lines<R>(lines: Lines<R>, n_oov_buckets: usize) -> Result<Self, WordPiecesError>
    where
        R: BufRead,
    {
        FstVocab::new(read_pieces(lines)?, n_oov_buckets)
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

impl Vocab for FstVocab {
    fn lookup(&self, piece: &str) -> Option<u64> {
        self.pieces.get(piece)
    }

    fn lookup_with_oov_fallback(&self, piece: &str) -> u64 {
        self.lookup(piece).unwrap_or_else(|| {
            oov_bucket(piece, self.pieces.len() as u64, self.n_oov_buckets)
        })
    }

    fn longest_prefix(&self, marker: &str, rest: &str) -> Option<(usize, u64)> {
        let automaton = PrefixAutomaton::new(marker, rest);
        let marker_len = automaton.marker_len();
        let mut stream = self.pieces.search(automaton).into_stream();

        let mut longest = None;
        while let Some((piece, id)) = stream.next() {
            match longest {
                Some((longest_len, _)) if longest_len >= piece.len() => (),
                _ => longest = Some((piece.len(), id)),
            }
        }

        longest.map(|(len, id)| (len - marker_len, id))
    }
}

impl<R> TryFrom<Lines<R>> for FstVocab
where
    R: BufRead,
{
    type Error = WordPiecesError;

    fn try_from(lines: Lines<R>) -> Result<Self, Self::Error> {
        FstVocab::from_lines(lines, 1)
    }
}
