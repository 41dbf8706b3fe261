//! Propositional STRIPS model: fluent vocabularies, bitmask states and
//! grounded actions.

pub mod action;
pub mod codec;
pub mod literal;
pub mod problem;
pub mod vocabulary;

pub use action::{Action, ActionBuilder};
pub use literal::Literal;
pub use problem::{Goal, PlanningProblem};
pub use vocabulary::FluentVocabulary;

/// A set of fluents under the closed-world assumption. Bit `N-1-i` stands
/// for fluent `i` of the vocabulary the mask was built with.
pub type Bitmask = u128;

/// Widest vocabulary a `Bitmask` can hold.
pub const MAX_FLUENTS: usize = Bitmask::BITS as usize;
