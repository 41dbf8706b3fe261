//! Goal-distance estimates for search over problem states.

use std::cell::RefCell;

use cached::{Cached, SizedCache};

use crate::error::Result;
use crate::graph::PlanningGraph;
use crate::settings::GraphSettings;
use crate::strips::{Bitmask, Goal, PlanningProblem};

/// Estimate returned for states from which the goal cannot be reached.
pub const UNREACHABLE: u32 = u32::MAX;

/// Estimated number of actions from `state` to a goal state.
pub trait Heuristic {
    fn estimate(&self, state: Bitmask) -> Result<u32>;
}

impl<H: Heuristic + ?Sized> Heuristic for &H {
    fn estimate(&self, state: Bitmask) -> Result<u32> {
        (**self).estimate(state)
    }
}

impl<H: Heuristic + ?Sized> Heuristic for Box<H> {
    fn estimate(&self, state: Bitmask) -> Result<u32> {
        (**self).estimate(state)
    }
}

/// Sum over the goal literals of the first literal level each appears in.
/// `None` when some goal literal is missing from every level.
pub fn h_levelsum(graph: &PlanningGraph, goal: &Goal) -> Option<u32> {
    let vocabulary = graph.problem().all_fluents();
    goal.literals(vocabulary)
        .into_iter()
        .map(|literal| graph.first_level_of(literal).map(|level| level as u32))
        .sum()
}

/// Level-sum over a planning graph built fresh for every state.
#[derive(Debug, Clone, Copy)]
pub struct LevelSum<'a> {
    problem: &'a PlanningProblem,
    settings: GraphSettings,
}

impl<'a> LevelSum<'a> {
    pub fn new(problem: &'a PlanningProblem, settings: GraphSettings) -> Self {
        Self { problem, settings }
    }
}

impl Heuristic for LevelSum<'_> {
    fn estimate(&self, state: Bitmask) -> Result<u32> {
        let graph = PlanningGraph::create(self.problem, state, self.settings)?;
        let value = h_levelsum(&graph, self.problem.goal()).unwrap_or(UNREACHABLE);
        tracing::debug!(
            state = %format!("{:#b}", state),
            value,
            levels = graph.s_levels().len(),
            "level sum"
        );
        Ok(value)
    }
}

/// The same estimate for every state; `Constant(0)` turns A* into uniform
/// cost search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constant(pub u32);

impl Heuristic for Constant {
    fn estimate(&self, _state: Bitmask) -> Result<u32> {
        Ok(self.0)
    }
}

/// Relaxation that drops every precondition: greedily picks the action
/// whose effects satisfy the most unsatisfied goal literals until none
/// remain, and counts the picks.
#[derive(Debug, Clone, Copy)]
pub struct IgnorePreconditions<'a> {
    problem: &'a PlanningProblem,
}

impl<'a> IgnorePreconditions<'a> {
    pub fn new(problem: &'a PlanningProblem) -> Self {
        Self { problem }
    }
}

impl Heuristic for IgnorePreconditions<'_> {
    fn estimate(&self, state: Bitmask) -> Result<u32> {
        let goal = self.problem.goal();
        let mut missing_pos = goal.pos & !state;
        let mut missing_neg = goal.neg & state;
        let mut count = 0;
        while missing_pos | missing_neg != 0 {
            let best = self.problem.actions_list()
                .iter()
                .map(|action| {
                    let covered = (action.effect_add() & missing_pos).count_ones()
                        + (action.effect_rem() & missing_neg).count_ones();
                    (action, covered)
                })
                .fold(None, |best: Option<(_, u32)>, (action, covered)| match best {
                    Some((_, most)) if most >= covered => best,
                    _ => Some((action, covered)),
                });
            match best {
                Some((action, covered)) if covered > 0 => {
                    missing_pos &= !action.effect_add();
                    missing_neg &= !action.effect_rem();
                    count += 1;
                },
                _ => return Ok(UNREACHABLE),
            }
        }
        Ok(count)
    }
}

/// Caches the estimates of an inner heuristic per state. Failed estimates
/// are not cached.
pub struct Memoized<H> {
    inner: H,
    cache: RefCell<SizedCache<Bitmask, u32>>,
}

impl<H: Heuristic> Memoized<H> {
    pub fn new(inner: H, capacity: usize) -> Self {
        Self { inner, cache: RefCell::new(SizedCache::with_size(capacity.max(1))) }
    }

    #[inline]
    pub fn inner(&self) -> &H {
        &self.inner
    }

    pub fn hits(&self) -> u64 {
        self.cache.borrow().cache_hits().unwrap_or(0)
    }

    pub fn misses(&self) -> u64 {
        self.cache.borrow().cache_misses().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.cache.borrow().cache_size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache.borrow_mut().cache_clear();
    }
}

impl<H: Heuristic> Heuristic for Memoized<H> {
    fn estimate(&self, state: Bitmask) -> Result<u32> {
        if let Some(&value) = self.cache.borrow_mut().cache_get(&state) {
            return Ok(value);
        }
        let value = self.inner.estimate(state)?;
        self.cache.borrow_mut().cache_set(state, value);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::error::Error;
    use crate::problems::{air_cargo_p1, birthday_dinner, have_cake};
    use crate::strips::{Action, FluentVocabulary};

    #[test]
    fn test_have_cake_level_sum() {
        let problem = have_cake().unwrap();
        let graph = PlanningGraph::create(&problem, problem.initial(), GraphSettings::default()).unwrap();
        assert_eq!(h_levelsum(&graph, problem.goal()), Some(1));
        let heuristic = LevelSum::new(&problem, GraphSettings::default());
        assert_eq!(heuristic.estimate(problem.initial()).unwrap(), 1);
    }

    #[test]
    fn test_goal_state_costs_nothing() {
        let problem = have_cake().unwrap();
        let heuristic = LevelSum::new(&problem, GraphSettings::default());
        let goal = problem.goal().pos;
        assert_eq!(heuristic.estimate(goal).unwrap(), 0);
    }

    #[test]
    fn test_unreachable_literal() {
        let vocabulary = FluentVocabulary::new(vec!["Lit", "Dark"]).unwrap();
        let actions = vec![Action::build("Light", &vocabulary).adds(&["Lit"]).finish().unwrap()];
        let problem = PlanningProblem::new(vocabulary, 0, Goal::new(0b11, 0), actions);
        let graph = PlanningGraph::create(&problem, 0, GraphSettings::default()).unwrap();
        assert_eq!(h_levelsum(&graph, problem.goal()), None);
        assert_eq!(LevelSum::new(&problem, GraphSettings::default()).estimate(0).unwrap(), UNREACHABLE);
        assert_eq!(IgnorePreconditions::new(&problem).estimate(0).unwrap(), UNREACHABLE);
    }

    #[test]
    fn test_negative_goal_literal() {
        let problem = birthday_dinner().unwrap();
        let heuristic = LevelSum::new(&problem, GraphSettings::default());
        let value = heuristic.estimate(problem.initial()).unwrap();
        assert!(value >= 2 && value != UNREACHABLE, "got {}", value);
    }

    #[test]
    fn test_ignore_preconditions() {
        let problem = air_cargo_p1().unwrap();
        let heuristic = IgnorePreconditions::new(&problem);
        // one unload per cargo
        assert_eq!(heuristic.estimate(problem.initial()).unwrap(), 2);
        assert_eq!(heuristic.estimate(problem.initial() | problem.goal().pos).unwrap(), 0);

        let cake = have_cake().unwrap();
        assert_eq!(IgnorePreconditions::new(&cake).estimate(cake.initial()).unwrap(), 1);
    }

    #[test]
    fn test_constant() {
        assert_eq!(Constant(1).estimate(0b1010).unwrap(), 1);
        assert_eq!((&Constant(0)).estimate(0).unwrap(), 0);
    }

    struct Counting<'c> {
        calls: &'c Cell<u32>,
        fail: bool,
    }

    impl Heuristic for Counting<'_> {
        fn estimate(&self, state: Bitmask) -> Result<u32> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(Error::GraphAlreadyBuilt);
            }
            Ok(state.count_ones())
        }
    }

    #[test]
    fn test_memoized() {
        let calls = Cell::new(0);
        let heuristic = Memoized::new(Counting { calls: &calls, fail: false }, 2);
        assert!(heuristic.is_empty());
        assert_eq!(heuristic.estimate(0b111).unwrap(), 3);
        assert_eq!(heuristic.estimate(0b111).unwrap(), 3);
        assert_eq!(calls.get(), 1);
        assert_eq!((heuristic.hits(), heuristic.misses()), (1, 1));

        heuristic.estimate(0b1).unwrap();
        heuristic.estimate(0b11).unwrap();
        assert_eq!(heuristic.len(), 2);
        // evicted by the two newer states
        heuristic.estimate(0b111).unwrap();
        assert_eq!(calls.get(), 4);

        heuristic.clear();
        assert!(heuristic.is_empty());
    }

    #[test]
    fn test_memoized_errors_not_cached() {
        let calls = Cell::new(0);
        let heuristic = Memoized::new(Counting { calls: &calls, fail: true }, 8);
        assert!(heuristic.estimate(0b1).is_err());
        assert!(heuristic.estimate(0b1).is_err());
        assert_eq!(calls.get(), 2);
        assert!(heuristic.is_empty());
    }

    #[test]
    fn test_memoized_level_sum() {
        let problem = have_cake().unwrap();
        let heuristic = Memoized::new(LevelSum::new(&problem, GraphSettings::default()), 16);
        assert_eq!(heuristic.estimate(problem.initial()).unwrap(), 1);
        assert_eq!(heuristic.estimate(problem.initial()).unwrap(), 1);
        assert_eq!(heuristic.hits(), 1);
        assert_eq!(heuristic.inner().estimate(problem.initial()).unwrap(), 1);
    }
}
