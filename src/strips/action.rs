use std::fmt;

use super::codec::{action_bitmaps, decode};
use super::{Bitmask, FluentVocabulary};
use crate::error::{Error, Result};

/// A grounded operator over one vocabulary.
///
/// Preconditions and effects are stored as bitmasks so applicability and
/// application are a couple of word operations. `retain_mask` is the
/// complement of `effect_rem` within the vocabulary width.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Action {
    name: String,
    precond_pos: Bitmask,
    precond_neg: Bitmask,
    effect_add: Bitmask,
    effect_rem: Bitmask,
    retain_mask: Bitmask,
    persistent: bool,
}

impl Action {
    /// Starts a domain action; see `ActionBuilder`.
    pub fn build<'v>(
        name: impl Into<String>,
        vocabulary: &'v FluentVocabulary,
    ) -> ActionBuilder<'v> {
        ActionBuilder {
            name: name.into(),
            vocabulary,
            requires: Vec::new(),
            forbids: Vec::new(),
            adds: Vec::new(),
            removes: Vec::new(),
        }
    }

    /// Domain action from raw masks.
    pub fn from_bitmaps(
        name: impl Into<String>,
        vocabulary: &FluentVocabulary,
        precond_pos: Bitmask,
        precond_neg: Bitmask,
        effect_add: Bitmask,
        effect_rem: Bitmask,
    ) -> Result<Self> {
        let name = name.into();
        let full = vocabulary.full_mask();
        let contradiction = precond_pos & precond_neg;
        if contradiction != 0 {
            let fluents = owned(decode(vocabulary, contradiction));
            return Err(Error::ContradictoryPrecondition { action: name, fluents });
        }
        let contradiction = effect_add & effect_rem;
        if contradiction != 0 {
            let fluents = owned(decode(vocabulary, contradiction));
            return Err(Error::ContradictoryEffect { action: name, fluents });
        }
        Ok(Self {
            name,
            precond_pos: precond_pos & full,
            precond_neg: precond_neg & full,
            effect_add: effect_add & full,
            effect_rem: effect_rem & full,
            retain_mask: full ^ (effect_rem & full),
            persistent: false,
        })
    }

    /// Persistence action carrying fluent `index` unchanged to the next
    /// level: `+NoOp(f)` requires and re-asserts `f`, `-NoOp(f)` requires
    /// and re-retracts it.
    pub fn persistence(vocabulary: &FluentVocabulary, index: usize, positive: bool) -> Self {
        let bit = vocabulary.bit(index);
        let (sign, pos, neg) = if positive { ('+', bit, 0) } else { ('-', 0, bit) };
        Self {
            name: format!("{}NoOp({})", sign, &vocabulary[index]),
            precond_pos: pos,
            precond_neg: neg,
            effect_add: pos,
            effect_rem: neg,
            retain_mask: vocabulary.full_mask() ^ neg,
            persistent: true,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn precond_pos(&self) -> Bitmask {
        self.precond_pos
    }

    #[inline]
    pub fn precond_neg(&self) -> Bitmask {
        self.precond_neg
    }

    #[inline]
    pub fn effect_add(&self) -> Bitmask {
        self.effect_add
    }

    #[inline]
    pub fn effect_rem(&self) -> Bitmask {
        self.effect_rem
    }

    #[inline]
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    #[inline]
    pub fn applicable(&self, state: Bitmask) -> bool {
        state & self.precond_pos == self.precond_pos && state & self.precond_neg == 0
    }

    /// Successor state. Calling this on a state the action is not
    /// applicable in is a caller bug and is reported, never repaired.
    pub fn apply(&self, state: Bitmask) -> Result<Bitmask> {
        if !self.applicable(state) {
            return Err(Error::PreconditionViolation { action: self.name.clone(), state });
        }
        Ok((state & self.retain_mask) | self.effect_add)
    }

    /// One action asserts what the other retracts.
    pub fn mutex_inconsistent_effects(&self, other: &Action) -> bool {
        (self.effect_add & other.effect_rem) | (self.effect_rem & other.effect_add) != 0
    }

    /// One action's effect negates a precondition of the other.
    pub fn mutex_interference(&self, other: &Action) -> bool {
        (self.precond_pos & other.effect_rem)
            | (self.effect_rem & other.precond_pos)
            | (self.precond_neg & other.effect_add)
            | (self.effect_add & other.precond_neg)
            != 0
    }

    /// The two actions need opposite values of some fluent.
    pub fn mutex_competing(&self, other: &Action) -> bool {
        (self.precond_pos & other.precond_neg) | (self.precond_neg & other.precond_pos) != 0
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn owned(names: Vec<&str>) -> Vec<String> {
    names.into_iter().map(str::to_owned).collect()
}

/// Collects fluent names for a domain action and encodes them on `finish`.
///
/// ```
/// use graphplan::strips::{Action, FluentVocabulary};
///
/// let vocabulary = FluentVocabulary::sorted(vec!["Have(Cake)", "Eaten(Cake)"]).unwrap();
/// let eat = Action::build("Eat(Cake)", &vocabulary)
///     .requires(&["Have(Cake)"])
///     .adds(&["Eaten(Cake)"])
///     .removes(&["Have(Cake)"])
///     .finish()
///     .unwrap();
/// assert_eq!(eat.apply(0b01).unwrap(), 0b10);
/// ```
#[derive(Debug, Clone)]
pub struct ActionBuilder<'v> {
    name: String,
    vocabulary: &'v FluentVocabulary,
    requires: Vec<String>,
    forbids: Vec<String>,
    adds: Vec<String>,
    removes: Vec<String>,
}

impl<'v> ActionBuilder<'v> {
    pub fn requires<I, S>(mut self, fluents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.requires.extend(fluents.into_iter().map(|s| s.as_ref().to_owned()));
        self
    }

    pub fn forbids<I, S>(mut self, fluents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.forbids.extend(fluents.into_iter().map(|s| s.as_ref().to_owned()));
        self
    }

    pub fn adds<I, S>(mut self, fluents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.adds.extend(fluents.into_iter().map(|s| s.as_ref().to_owned()));
        self
    }

    pub fn removes<I, S>(mut self, fluents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.removes.extend(fluents.into_iter().map(|s| s.as_ref().to_owned()));
        self
    }

    pub fn finish(self) -> Result<Action> {
        let vocabulary = self.vocabulary;
        let (requires, forbids, _) = action_bitmaps(vocabulary, &self.requires, &self.forbids)?;
        let (adds, removes, _) = action_bitmaps(vocabulary, &self.adds, &self.removes)?;
        Action::from_bitmaps(self.name, vocabulary, requires, forbids, adds, removes)
    }
}
