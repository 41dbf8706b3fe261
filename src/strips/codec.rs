//! Conversions between fluent names and state bitmasks.

use super::{Bitmask, FluentVocabulary};
use crate::error::{Error, Result};

/// Vocabulary indices of the bits set in a mask, most significant bit
/// first (ascending vocabulary index). Bits outside the vocabulary are
/// ignored.
#[derive(Debug, Clone)]
pub struct FluentIndices {
    remaining: Bitmask,
    width: usize,
}

impl FluentIndices {
    pub fn new(vocabulary: &FluentVocabulary, bitmask: Bitmask) -> Self {
        Self { remaining: bitmask & vocabulary.full_mask(), width: vocabulary.len() }
    }
}

impl Iterator for FluentIndices {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let position = (Bitmask::BITS - 1 - self.remaining.leading_zeros()) as usize;
        self.remaining &= !((1 as Bitmask) << position);
        Some(self.width - 1 - position)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let ones = self.remaining.count_ones() as usize;
        (ones, Some(ones))
    }
}

/// Sets the bit of every listed fluent.
pub fn encode<I, S>(vocabulary: &FluentVocabulary, fluents: I) -> Result<Bitmask>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut bitmask = 0;
    for fluent in fluents {
        let fluent = fluent.as_ref();
        match vocabulary.index_of(fluent) {
            Some(index) => bitmask |= vocabulary.bit(index),
            None => return Err(Error::UnknownFluent(fluent.to_owned())),
        }
    }
    Ok(bitmask)
}

/// Names of the fluents set in `bitmask`, in bit-scan order.
pub fn decode(vocabulary: &FluentVocabulary, bitmask: Bitmask) -> Vec<&str> {
    decode_indices(vocabulary, bitmask).map(|index| &vocabulary[index]).collect()
}

#[inline]
pub fn decode_indices(vocabulary: &FluentVocabulary, bitmask: Bitmask) -> FluentIndices {
    FluentIndices::new(vocabulary, bitmask)
}

/// Encodes a precondition or effect pair as `(positive, negative, retain)`
/// where `retain` keeps every bit except the negative ones.
pub fn action_bitmaps<P, N, S, T>(
    vocabulary: &FluentVocabulary,
    add_pos: P,
    rem_neg: N,
) -> Result<(Bitmask, Bitmask, Bitmask)>
where
    P: IntoIterator<Item = S>,
    N: IntoIterator<Item = T>,
    S: AsRef<str>,
    T: AsRef<str>,
{
    let pos_bitmap = encode(vocabulary, add_pos)?;
    let neg_bitmap = encode(vocabulary, rem_neg)?;
    Ok((pos_bitmap, neg_bitmap, vocabulary.full_mask() ^ neg_bitmap))
}
