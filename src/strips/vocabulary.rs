use std::collections::{BTreeSet, HashMap};

use super::{Bitmask, MAX_FLUENTS};
use crate::error::{Error, Result};

/// Ordered, deduplicated fluent names of one problem instance.
///
/// Position `i` maps to bit `N-1-i`, so the first fluent is the most
/// significant bit. Masks built from different vocabularies must never be
/// combined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FluentVocabulary {
    fluents: Vec<String>,
    mapping: HashMap<String, usize>,
}

impl FluentVocabulary {
    /// Keeps first-occurrence order and drops repeated names.
    pub fn new<I, S>(fluents: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocabulary = Self { fluents: Vec::new(), mapping: HashMap::new() };
        for fluent in fluents {
            let fluent = fluent.into();
            if !vocabulary.mapping.contains_key(&fluent) {
                vocabulary.mapping.insert(fluent.clone(), vocabulary.fluents.len());
                vocabulary.fluents.push(fluent);
            }
        }
        if vocabulary.fluents.len() > MAX_FLUENTS {
            return Err(Error::VocabularyTooLarge(vocabulary.fluents.len()));
        }
        Ok(vocabulary)
    }

    /// Lexicographically sorted vocabulary.
    pub fn sorted<I, S>(fluents: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fluents: BTreeSet<String> = fluents.into_iter().map(Into::into).collect();
        Self::new(fluents)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fluents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fluents.is_empty()
    }

    #[inline]
    pub fn index_of(&self, fluent: &str) -> Option<usize> {
        self.mapping.get(fluent).copied()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.fluents.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fluents.iter().map(String::as_str)
    }

    /// Single-bit mask of the fluent at `index`.
    #[inline]
    pub fn bit(&self, index: usize) -> Bitmask {
        debug_assert!(index < self.fluents.len());
        (1 as Bitmask) << (self.fluents.len() - 1 - index)
    }

    /// Every fluent of the vocabulary set.
    pub fn full_mask(&self) -> Bitmask {
        if self.fluents.len() == MAX_FLUENTS {
            Bitmask::MAX
        } else {
            ((1 as Bitmask) << self.fluents.len()) - 1
        }
    }
}

impl std::ops::Index<usize> for FluentVocabulary {
    type Output = str;

    fn index(&self, index: usize) -> &Self::Output {
        self.fluents[index].as_str()
    }
}
