use thiserror::Error;

use crate::graph::node::NodeId;
use crate::strips::{Bitmask, MAX_FLUENTS};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("fluent `{0}` is not part of the problem vocabulary")]
    UnknownFluent(String),

    #[error("vocabulary holds {0} fluents, a state bitmask fits at most {}", MAX_FLUENTS)]
    VocabularyTooLarge(usize),

    #[error("action `{action}` both requires and forbids {fluents:?}")]
    ContradictoryPrecondition { action: String, fluents: Vec<String> },

    #[error("action `{action}` both adds and removes {fluents:?}")]
    ContradictoryEffect { action: String, fluents: Vec<String> },

    #[error("preconditions of `{action}` do not hold in state {state:#b}")]
    PreconditionViolation { action: String, state: Bitmask },

    #[error("can not mark {0:?} and {1:?} as mutex: nodes are of different kinds")]
    HeterogeneousMutex(NodeId, NodeId),

    #[error("can not mark {0:?} and {1:?} as mutex: nodes are not on the same level")]
    NotSiblings(NodeId, NodeId),

    #[error("can not mark {0:?} as mutex with itself")]
    SelfMutex(NodeId),

    #[error("planning graph has no node {0:?}")]
    UnknownNode(NodeId),

    #[error("can not mark {0:?} and {1:?} as mutex: the initial literal level has no mutexes")]
    InitialLevelMutex(NodeId, NodeId),

    #[error("planning graph already built; construct a new graph for each state")]
    GraphAlreadyBuilt,

    #[error("planning graph did not level off within {0} levels")]
    LevelLimitExceeded(usize),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}
