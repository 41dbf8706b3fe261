//! Forward state-space search over a planning problem. Every action costs 1.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet, VecDeque};

use priority_queue::PriorityQueue;

use crate::error::Result;
use crate::heuristic::{Heuristic, UNREACHABLE};
use crate::strips::{Action, Bitmask, PlanningProblem};

/// A solution together with the bookkeeping of the search that found it.
#[derive(Debug, Clone)]
pub struct Plan<'a> {
    pub actions: Vec<&'a Action>,
    pub expansions: usize,
    pub goal_tests: usize,
    pub new_nodes: usize,
}

impl<'a> Plan<'a> {
    #[inline]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn names(&self) -> Vec<&'a str> {
        self.actions.iter().map(|action| action.name()).collect()
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    expansions: usize,
    goal_tests: usize,
    new_nodes: usize,
}

/// Parent state and the index into `actions_list` that led to each state.
type CameFrom = HashMap<Bitmask, (Bitmask, usize)>;

fn reconstruct_plan<'a>(
    problem: &'a PlanningProblem,
    came_from: &CameFrom,
    goal: Bitmask,
    counters: Counters,
) -> Plan<'a> {
    let mut actions = Vec::new();
    let mut current = goal;
    while let Some(&(parent, index)) = came_from.get(&current) {
        actions.push(&problem.actions_list()[index]);
        current = parent;
    }
    actions.reverse();
    tracing::info!(
        length = actions.len(),
        expansions = counters.expansions,
        goal_tests = counters.goal_tests,
        new_nodes = counters.new_nodes,
        "plan found"
    );
    Plan {
        actions,
        expansions: counters.expansions,
        goal_tests: counters.goal_tests,
        new_nodes: counters.new_nodes,
    }
}

fn no_plan<'a>(counters: Counters) -> Result<Option<Plan<'a>>> {
    tracing::info!(
        expansions = counters.expansions,
        goal_tests = counters.goal_tests,
        "goal unreachable"
    );
    Ok(None)
}

/// Successors of `state` as `(action index, next state)` pairs.
fn successors(problem: &PlanningProblem, state: Bitmask) -> Result<Vec<(usize, Bitmask)>> {
    problem.actions_list()
        .iter()
        .enumerate()
        .filter(|(_, action)| action.applicable(state))
        .map(|(index, action)| Ok((index, action.apply(state)?)))
        .collect()
}

/// Shortest plan by number of actions; states are goal tested as they are
/// generated.
pub fn breadth_first_search(problem: &PlanningProblem) -> Result<Option<Plan>> {
    let mut counters = Counters::default();
    let mut came_from = CameFrom::new();
    let start = problem.initial();

    counters.goal_tests += 1;
    if problem.goal_test(start) {
        return Ok(Some(reconstruct_plan(problem, &came_from, start, counters)));
    }
    let mut seen = HashSet::new();
    seen.insert(start);
    let mut frontier = VecDeque::new();
    frontier.push_back(start);

    while let Some(state) = frontier.pop_front() {
        counters.expansions += 1;
        for (index, child) in successors(problem, state)? {
            if !seen.insert(child) {
                continue;
            }
            counters.new_nodes += 1;
            came_from.insert(child, (state, index));
            counters.goal_tests += 1;
            if problem.goal_test(child) {
                return Ok(Some(reconstruct_plan(problem, &came_from, child, counters)));
            }
            frontier.push_back(child);
        }
    }
    no_plan(counters)
}

/// Graph search that always expands the most recently generated state.
/// States are goal tested when popped; the plan is valid but not
/// necessarily the shortest.
pub fn depth_first_graph_search(problem: &PlanningProblem) -> Result<Option<Plan>> {
    let mut counters = Counters::default();
    let mut came_from = CameFrom::new();
    let mut explored = HashSet::new();
    let mut queued = HashSet::new();
    let mut frontier = vec![problem.initial()];
    queued.insert(problem.initial());

    while let Some(state) = frontier.pop() {
        queued.remove(&state);
        counters.goal_tests += 1;
        if problem.goal_test(state) {
            return Ok(Some(reconstruct_plan(problem, &came_from, state, counters)));
        }
        explored.insert(state);
        counters.expansions += 1;
        for (index, child) in successors(problem, state)? {
            if explored.contains(&child) || !queued.insert(child) {
                continue;
            }
            counters.new_nodes += 1;
            came_from.insert(child, (state, index));
            frontier.push(child);
        }
    }
    no_plan(counters)
}

/// Best-first graph search ordered by `priority(cost, state)`, lowest first
/// and ties in insertion order. A `None` priority drops the state.
fn best_first_search<'a, F>(
    problem: &'a PlanningProblem,
    mut priority: F,
) -> Result<Option<Plan<'a>>>
where
    F: FnMut(u32, Bitmask) -> Result<Option<u32>>,
{
    let mut counters = Counters::default();
    let mut came_from = CameFrom::new();
    let mut cost = HashMap::new();
    let mut explored = HashSet::new();
    let mut frontier = PriorityQueue::new();
    let mut sequence = 0usize;

    let start = problem.initial();
    match priority(0, start)? {
        Some(value) => frontier.push(start, Reverse((value, sequence))),
        None => return no_plan(counters),
    };
    cost.insert(start, 0);

    while let Some((state, _)) = frontier.pop() {
        counters.goal_tests += 1;
        if problem.goal_test(state) {
            return Ok(Some(reconstruct_plan(problem, &came_from, state, counters)));
        }
        explored.insert(state);
        counters.expansions += 1;
        let g = cost[&state] + 1;
        for (index, child) in successors(problem, state)? {
            if explored.contains(&child) {
                continue;
            }
            if let Some(&known) = cost.get(&child) {
                if known <= g {
                    continue;
                }
            }
            let value = match priority(g, child)? {
                Some(value) => value,
                None => continue,
            };
            counters.new_nodes += 1;
            sequence += 1;
            cost.insert(child, g);
            came_from.insert(child, (state, index));
            // replaces the priority when the state is already queued
            frontier.push(child, Reverse((value, sequence)));
        }
    }
    no_plan(counters)
}

fn estimate<H: Heuristic + ?Sized>(heuristic: &H, state: Bitmask) -> Result<Option<u32>> {
    let value = heuristic.estimate(state)?;
    Ok(if value == UNREACHABLE { None } else { Some(value) })
}

pub fn uniform_cost_search(problem: &PlanningProblem) -> Result<Option<Plan>> {
    best_first_search(problem, |g, _| Ok(Some(g)))
}

/// Expands the state with the lowest estimate first, ignoring path cost.
pub fn greedy_best_first_search<'a, H: Heuristic + ?Sized>(
    problem: &'a PlanningProblem,
    heuristic: &H,
) -> Result<Option<Plan<'a>>> {
    best_first_search(problem, |_, state| estimate(heuristic, state))
}

/// Expands the state with the lowest `cost + estimate` first. States the
/// heuristic declares unreachable are never queued.
pub fn astar_search<'a, H: Heuristic + ?Sized>(
    problem: &'a PlanningProblem,
    heuristic: &H,
) -> Result<Option<Plan<'a>>> {
    best_first_search(problem, |g, state| {
        Ok(estimate(heuristic, state)?.map(|h| g.saturating_add(h)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::{Constant, IgnorePreconditions, LevelSum, Memoized};
    use crate::problems::{air_cargo_p1, birthday_dinner, have_cake, spare_tire};
    use crate::settings::GraphSettings;
    use crate::strips::{FluentVocabulary, Goal};

    fn check_plan(problem: &PlanningProblem, plan: &Plan) {
        let mut state = problem.initial();
        for action in &plan.actions {
            assert!(action.applicable(state), "{} is not applicable", action);
            state = action.apply(state).unwrap();
        }
        assert!(problem.goal_test(state), "plan {:?} misses the goal", plan.names());
    }

    #[test]
    fn test_breadth_first_have_cake() {
        let problem = have_cake().unwrap();
        let plan = breadth_first_search(&problem).unwrap().unwrap();
        assert_eq!(plan.names(), vec!["Eat(Cake)", "Bake(Cake)"]);
        assert!(plan.expansions >= 1);
        assert!(plan.goal_tests >= plan.new_nodes);
    }

    #[test]
    fn test_initial_goal_gives_empty_plan() {
        let vocabulary = FluentVocabulary::new(vec!["Done"]).unwrap();
        let problem = PlanningProblem::new(vocabulary, 0b1, Goal::new(0b1, 0), Vec::new());
        let plan = breadth_first_search(&problem).unwrap().unwrap();
        assert!(plan.is_empty());
        assert!(depth_first_graph_search(&problem).unwrap().unwrap().is_empty());
        let plan = uniform_cost_search(&problem).unwrap().unwrap();
        assert_eq!(plan.len(), 0);
    }

    #[test]
    fn test_uniform_cost_matches_breadth_first() {
        for problem in [have_cake(), spare_tire(), birthday_dinner()].iter() {
            let problem = problem.as_ref().unwrap();
            let bfs = breadth_first_search(problem).unwrap().unwrap();
            let ucs = uniform_cost_search(problem).unwrap().unwrap();
            assert_eq!(bfs.len(), ucs.len());
            check_plan(problem, &ucs);
        }
    }

    #[test]
    fn test_depth_first_finds_valid_plans() {
        for problem in [have_cake(), spare_tire(), birthday_dinner(), air_cargo_p1()].iter() {
            let problem = problem.as_ref().unwrap();
            let plan = depth_first_graph_search(problem).unwrap().unwrap();
            check_plan(problem, &plan);
            assert!(plan.len() >= breadth_first_search(problem).unwrap().unwrap().len());
            assert_eq!(plan.goal_tests, plan.expansions + 1);
        }
    }

    #[test]
    fn test_depth_first_never_revisits_states() {
        let problem = air_cargo_p1().unwrap();
        let plan = depth_first_graph_search(&problem).unwrap().unwrap();
        let mut state = problem.initial();
        let mut visited = HashSet::new();
        visited.insert(state);
        for action in &plan.actions {
            state = action.apply(state).unwrap();
            assert!(visited.insert(state), "plan {:?} loops", plan.names());
        }
    }

    #[test]
    fn test_astar_level_sum() {
        let problem = spare_tire().unwrap();
        let heuristic = Memoized::new(LevelSum::new(&problem, GraphSettings::default()), 64);
        let plan = astar_search(&problem, &heuristic).unwrap().unwrap();
        assert_eq!(plan.len(), 3);
        check_plan(&problem, &plan);
        assert!(heuristic.misses() >= 1);
    }

    #[test]
    fn test_astar_constant_is_optimal() {
        let problem = air_cargo_p1().unwrap();
        let plan = astar_search(&problem, &Constant(0)).unwrap().unwrap();
        assert_eq!(plan.len(), 6);
        check_plan(&problem, &plan);
    }

    #[test]
    fn test_greedy_ignore_preconditions() {
        let problem = birthday_dinner().unwrap();
        let plan = greedy_best_first_search(&problem, &IgnorePreconditions::new(&problem)).unwrap().unwrap();
        check_plan(&problem, &plan);
    }

    #[test]
    fn test_unreachable_goal() {
        let vocabulary = FluentVocabulary::new(vec!["Lit", "Dark"]).unwrap();
        let actions = vec![Action::build("Light", &vocabulary).adds(&["Lit"]).finish().unwrap()];
        let problem = PlanningProblem::new(vocabulary, 0, Goal::new(0b11, 0), actions);
        assert!(breadth_first_search(&problem).unwrap().is_none());
        assert!(depth_first_graph_search(&problem).unwrap().is_none());
        assert!(uniform_cost_search(&problem).unwrap().is_none());
        let heuristic = LevelSum::new(&problem, GraphSettings::default());
        assert!(astar_search(&problem, &heuristic).unwrap().is_none());
    }
}
