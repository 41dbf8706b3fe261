//! Mutual exclusion tests between sibling nodes.

use super::node::{ActionLevel, ActionNode, LiteralNode, PgNode};
use crate::strips::Action;

/// Static action mutex relation (inconsistent effects, interference or
/// competing needs) for every pair of a problem's actions. These only
/// depend on the action masks, so a single table serves every level of
/// every graph built for the problem.
#[derive(Debug, Clone)]
pub struct ActionMutexTable {
    width: usize,
    cells: Vec<bool>,
}

impl ActionMutexTable {
    pub fn new(actions: &[Action]) -> Self {
        let width = actions.len();
        let mut cells = vec![false; width * width];
        for (i, first) in actions.iter().enumerate() {
            for (j, second) in actions.iter().enumerate().skip(i + 1) {
                if static_mutex(first, second) {
                    cells[i * width + j] = true;
                    cells[j * width + i] = true;
                }
            }
        }
        Self { width, cells }
    }

    #[inline]
    pub fn is_mutex(&self, first: usize, second: usize) -> bool {
        self.cells[first * self.width + second]
    }

    pub fn len(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0
    }
}

#[inline]
pub fn static_mutex(first: &Action, second: &Action) -> bool {
    first.mutex_inconsistent_effects(second)
        || first.mutex_interference(second)
        || first.mutex_competing(second)
}

/// In a serial graph only one non-persistence action may occur per step.
#[inline]
pub fn serial_mutex(serial: bool, first: &ActionNode, second: &ActionNode) -> bool {
    serial && !first.is_persistent() && !second.is_persistent()
}

#[inline]
pub fn negation_mutex(first: &LiteralNode, second: &LiteralNode) -> bool {
    let (first, second) = (first.literal(), second.literal());
    first.fluent == second.fluent && first.positive != second.positive
}

/// True when no pair of producers can achieve both literals together: every
/// parent pair is distinct and mutex in `producers`, the action level the
/// literals were produced by. An action producing both literals rules the
/// mutex out.
pub fn inconsistent_support_mutex(
    producers: &ActionLevel,
    first: &LiteralNode,
    second: &LiteralNode,
) -> bool {
    if first.parents().is_empty() || second.parents().is_empty() {
        return false;
    }
    for &p1 in first.parents() {
        for &p2 in second.parents() {
            if p1 == p2 || !producers.nodes()[p1].is_mutex(p2) {
                return false;
            }
        }
    }
    true
}
