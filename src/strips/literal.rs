use super::FluentVocabulary;

/// A fluent together with the truth value it is asserted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    pub fluent: usize,
    pub positive: bool,
}

impl Literal {
    #[inline]
    pub fn new(fluent: usize, positive: bool) -> Self {
        Self { fluent, positive }
    }

    #[inline]
    pub fn positive(fluent: usize) -> Self {
        Self::new(fluent, true)
    }

    #[inline]
    pub fn negative(fluent: usize) -> Self {
        Self::new(fluent, false)
    }

    pub fn negated(&self) -> Self {
        Self::new(self.fluent, !self.positive)
    }

    /// `Have(Cake)` or `~Have(Cake)`.
    pub fn describe(&self, vocabulary: &FluentVocabulary) -> String {
        let name = vocabulary.get(self.fluent).unwrap_or("?");
        if self.positive {
            name.to_owned()
        } else {
            format!("~{}", name)
        }
    }
}
