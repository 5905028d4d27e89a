use rayon::prelude::*;
use tracing::debug;

use crate::{Ragged, Token, Vocab, WordPiece, WordPieces, WordPiecesError};

/// Tokens, start offsets, and end offsets of ragged word input.
///
/// All three have the shape of the input with one additional level of
/// nesting at each word.
pub type TokensWithOffsets = (Ragged<Token>, Ragged<usize>, Ragged<usize>);

impl<V> WordPieces<V>
where
    V: Vocab,
{
    /// Split every word of a ragged sequence into word pieces.
    ///
    /// Every word is replaced by the sequence of its tokens. A single
    /// word results in a flat sequence of tokens.
    pub fn tokenize<W>(&self, words: &Ragged<W>) -> Result<Ragged<Token>, WordPiecesError>
    where
        W: AsRef<[u8]>,
    {
        let split = words.try_map_ref(|word| self.split_bytes(word.as_ref()))?;
        Ok(split.flat_map(|pieces| pieces.into_iter().map(|piece| piece.token)))
    }

    /// Split every word of a ragged sequence into word pieces, also
    /// returning the byte offsets of each piece in its word.
    pub fn tokenize_with_offsets<W>(
        &self,
        words: &Ragged<W>,
    ) -> Result<TokensWithOffsets, WordPiecesError>
    where
        W: AsRef<[u8]>,
    {
        let split = words.try_map_ref(|word| self.split_bytes(word.as_ref()))?;
        Ok(unzip_pieces(split))
    }

    /// Split every word of a ragged sequence into word pieces in
    /// parallel.
    ///
    /// Gives the same result as
    /// [`tokenize_with_offsets`](WordPieces::tokenize_with_offsets).
    pub fn par_tokenize_with_offsets<W>(
        &self,
        words: &Ragged<W>,
    ) -> Result<TokensWithOffsets, WordPiecesError>
    where
        V: Sync,
        W: AsRef<[u8]> + Sync,
    {
        let leaves: Vec<&W> = words.leaves().collect();
        debug!(n_words = leaves.len(), "splitting words in parallel");

        let split = leaves
            .par_iter()
            .map(|word| self.split_bytes(word.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        // Put the pieces back in the leaf positions they came from.
        let mut split = split.into_iter();
        let split = words.map_ref(|_| split.next().unwrap_or_default());

        Ok(unzip_pieces(split))
    }
}

fn unzip_pieces(split: Ragged<Vec<WordPiece>>) -> TokensWithOffsets {
    let starts = split.flat_map_ref(|pieces| {
        pieces.iter().map(|piece| piece.start).collect::<Vec<_>>()
    });
    let ends = split.flat_map_ref(|pieces| {
        pieces.iter().map(|piece| piece.end).collect::<Vec<_>>()
    });
    let tokens = split.flat_map(|pieces| pieces.into_iter().map(|piece| piece.token));
    (tokens, starts, ends)
}
