//! Planning graphs for propositional STRIPS problems.
//!
//! States are bitmasks over a fixed fluent vocabulary (`strips`). A
//! `graph::PlanningGraph` expands one state into alternating literal and
//! action levels with mutex relations until it levels off; the level-sum
//! `heuristic` reads goal distances off it, and `search` uses the
//! heuristics to find plans.

mod error;
pub mod graph;
pub mod heuristic;
pub mod problems;
pub mod search;
pub mod settings;
pub mod strips;

pub use error::{Error, Result};
