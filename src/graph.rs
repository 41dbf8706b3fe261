//! Leveled planning graph (GraphPlan style) built from one state of a
//! planning problem.
//!
//! Literal levels `S0..Sk` alternate with action levels `A0..Ak-1`. Every
//! level is an arena of nodes; parent, child and mutex relations are index
//! sets into the neighbouring or same level. Construction stops once two
//! consecutive literal levels hold the same literals.

pub mod mutex;
pub mod node;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::settings::GraphSettings;
use crate::strips::codec::decode_indices;
use crate::strips::{Bitmask, Literal, PlanningProblem};

use self::mutex::{inconsistent_support_mutex, negation_mutex, serial_mutex};
use self::node::{ActionLevel, LiteralLevel, NodeId, PgNode};

pub struct PlanningGraph<'a> {
    problem: &'a PlanningProblem,
    state: Bitmask,
    settings: GraphSettings,
    s_levels: Vec<LiteralLevel>,
    a_levels: Vec<ActionLevel<'a>>,
    built: bool,
}

impl<'a> PlanningGraph<'a> {
    /// Empty graph for `state`; call `build` to construct the levels.
    pub fn new(problem: &'a PlanningProblem, state: Bitmask, settings: GraphSettings) -> Self {
        Self { problem, state, settings, s_levels: Vec::new(), a_levels: Vec::new(), built: false }
    }

    /// Builds the graph for `state` in one go.
    pub fn create(
        problem: &'a PlanningProblem,
        state: Bitmask,
        settings: GraphSettings,
    ) -> Result<Self> {
        let mut graph = Self::new(problem, state, settings);
        graph.build()?;
        Ok(graph)
    }

    /// Expands levels until the graph levels off. A graph is built exactly
    /// once; build a new graph for every state.
    pub fn build(&mut self) -> Result<()> {
        if self.built || !self.s_levels.is_empty() || !self.a_levels.is_empty() {
            return Err(Error::GraphAlreadyBuilt);
        }
        let problem = self.problem;
        let vocabulary = problem.all_fluents();
        let limit = self.settings.max_levels.unwrap_or(2 * vocabulary.len() + 1);

        let mut s0 = LiteralLevel::default();
        for fluent in decode_indices(vocabulary, self.state) {
            s0.insert(Literal::positive(fluent));
        }
        self.s_levels.push(s0);

        let mut level = 0;
        loop {
            self.add_action_level(level);
            self.update_a_mutex(level)?;
            level += 1;
            self.add_literal_level(level);
            self.update_s_mutex(level)?;
            tracing::debug!(
                level,
                actions = self.a_levels[level - 1].len(),
                literals = self.s_levels[level].len(),
                "planning graph level built"
            );
            if self.s_levels[level].same_literals(&self.s_levels[level - 1]) {
                break;
            }
            if level >= limit {
                return Err(Error::LevelLimitExceeded(limit));
            }
        }
        self.built = true;
        Ok(())
    }

    /// Adds `A[level]` from the actions whose preconditions all appear in
    /// `S[level]`. At level 0 the negative literals are seeded from the
    /// negative preconditions of the candidates, limited to fluents false in
    /// the state. Every `-NoOp(f)` is a candidate, so this seeds every false
    /// fluent.
    fn add_action_level(&mut self, level: usize) {
        let problem = self.problem;
        let vocabulary = problem.all_fluents();
        let actions = problem.all_actions();
        let (pos, mut neg) = self.s_levels[level].state(vocabulary);

        let candidates: Vec<usize> = actions.iter()
            .enumerate()
            .filter(|(_, action)| action.precond_pos() & pos == action.precond_pos())
            .map(|(index, _)| index)
            .collect();

        if level == 0 {
            let wanted = candidates
                .iter()
                .fold(0, |acc, &index| acc | actions[index].precond_neg());
            let seeded = wanted & !self.state & vocabulary.full_mask();
            for fluent in decode_indices(vocabulary, seeded) {
                self.s_levels[0].insert(Literal::negative(fluent));
            }
            neg |= seeded;
        }

        let s_level = &mut self.s_levels[level];
        let mut a_level = ActionLevel::default();
        for index in candidates {
            let action = &actions[index];
            if action.precond_neg() & neg != action.precond_neg() {
                continue;
            }
            let node = a_level.insert(action, index);
            let preconditions = [(true, action.precond_pos()), (false, action.precond_neg())];
            for &(positive, bitmap) in preconditions.iter() {
                for fluent in decode_indices(vocabulary, bitmap) {
                    if let Some(parent) = s_level.index_of(Literal::new(fluent, positive)) {
                        a_level.nodes[node].parents.insert(parent);
                        s_level.nodes[parent].children.insert(node);
                    }
                }
            }
        }
        self.a_levels.push(a_level);
    }

    /// Adds `S[level]` from the effects of `A[level - 1]`.
    fn add_literal_level(&mut self, level: usize) {
        let vocabulary = self.problem.all_fluents();
        let mut s_level = LiteralLevel::default();
        for (node, a_node) in self.a_levels[level - 1].nodes.iter_mut().enumerate() {
            let action = a_node.action;
            let effects = [(true, action.effect_add()), (false, action.effect_rem())];
            for &(positive, bitmap) in effects.iter() {
                for fluent in decode_indices(vocabulary, bitmap) {
                    let child = s_level.insert(Literal::new(fluent, positive));
                    s_level.nodes[child].parents.insert(node);
                    a_node.children.insert(child);
                }
            }
        }
        self.s_levels.push(s_level);
    }

    fn update_a_mutex(&mut self, level: usize) -> Result<()> {
        let table = self.problem.mutex_table();
        let nodes = self.a_levels[level].nodes();
        let mut pairs = Vec::new();
        for (i, first) in nodes.iter().enumerate() {
            for (j, second) in nodes.iter().enumerate().skip(i + 1) {
                if serial_mutex(self.settings.serial, first, second)
                    || table.is_mutex(first.action_index(), second.action_index())
                {
                    pairs.push((i, j));
                }
            }
        }
        for (i, j) in pairs {
            let first = NodeId::Action { level, index: i };
            self.mutexify(first, NodeId::Action { level, index: j })?;
        }
        Ok(())
    }

    fn update_s_mutex(&mut self, level: usize) -> Result<()> {
        let producers = &self.a_levels[level - 1];
        let nodes = self.s_levels[level].nodes();
        let mut pairs = Vec::new();
        for (i, first) in nodes.iter().enumerate() {
            for (j, second) in nodes.iter().enumerate().skip(i + 1) {
                if negation_mutex(first, second)
                    || inconsistent_support_mutex(producers, first, second)
                {
                    pairs.push((i, j));
                }
            }
        }
        for (i, j) in pairs {
            let first = NodeId::Literal { level, index: i };
            self.mutexify(first, NodeId::Literal { level, index: j })?;
        }
        Ok(())
    }

    /// Marks two distinct sibling nodes as mutually exclusive,
    /// symmetrically. Only levels after S0 of a graph under construction
    /// accept new mutexes.
    fn mutexify(&mut self, first: NodeId, second: NodeId) -> Result<()> {
        match (first, second) {
            (NodeId::Literal { .. }, NodeId::Literal { .. })
            | (NodeId::Action { .. }, NodeId::Action { .. }) => {},
            _ => return Err(Error::HeterogeneousMutex(first, second)),
        }
        let level = first.level();
        if second.level() != level {
            return Err(Error::NotSiblings(first, second));
        }
        if first == second {
            return Err(Error::SelfMutex(first));
        }
        let width = match first {
            NodeId::Literal { .. } => self.s_levels.get(level).map_or(0, LiteralLevel::len),
            NodeId::Action { .. } => self.a_levels.get(level).map_or(0, ActionLevel::len),
        };
        for &id in [first, second].iter() {
            if id.index() >= width {
                return Err(Error::UnknownNode(id));
            }
        }
        if let NodeId::Literal { level: 0, .. } = first {
            return Err(Error::InitialLevelMutex(first, second));
        }
        if self.built {
            return Err(Error::GraphAlreadyBuilt);
        }

        let (i, j) = (first.index(), second.index());
        match first {
            NodeId::Literal { .. } => {
                let nodes = &mut self.s_levels[level].nodes;
                nodes[i].mutex.insert(j);
                nodes[j].mutex.insert(i);
            },
            NodeId::Action { .. } => {
                let nodes = &mut self.a_levels[level].nodes;
                nodes[i].mutex.insert(j);
                nodes[j].mutex.insert(i);
            },
        }
        tracing::trace!(?first, ?second, "mutex");
        Ok(())
    }

    #[inline]
    pub fn problem(&self) -> &'a PlanningProblem {
        self.problem
    }

    #[inline]
    pub fn state(&self) -> Bitmask {
        self.state
    }

    #[inline]
    pub fn s_levels(&self) -> &[LiteralLevel] {
        &self.s_levels
    }

    #[inline]
    pub fn a_levels(&self) -> &[ActionLevel<'a>] {
        &self.a_levels
    }

    /// The last two literal levels hold the same literals.
    pub fn is_leveled(&self) -> bool {
        let n = self.s_levels.len();
        n >= 2 && self.s_levels[n - 1].same_literals(&self.s_levels[n - 2])
    }

    /// Positive and negative literals of `S[level]` as masks.
    pub fn level_state(&self, level: usize) -> (Bitmask, Bitmask) {
        self.s_levels[level].state(self.problem.all_fluents())
    }

    /// Index of the first literal level containing `literal`.
    pub fn first_level_of(&self, literal: Literal) -> Option<usize> {
        self.s_levels.iter().position(|level| level.contains(literal))
    }

    /// Every mutex pair of a level once, as `(lower, higher)` node indices.
    pub fn mutex_pairs<N: PgNode>(nodes: &[N]) -> Vec<(usize, usize)> {
        nodes.iter()
            .enumerate()
            .flat_map(|(i, node)| {
                node.mutex().iter().filter(move |&&j| j > i).map(move |&j| (i, j))
            })
            .collect()
    }

    /// Names-only copy of the graph for inspection and serialization.
    pub fn snapshot(&self) -> GraphSnapshot {
        let vocabulary = self.problem.all_fluents();
        let s_levels = self.s_levels.iter()
            .map(|level| {
                let name = |j: usize| level.nodes()[j].literal().describe(vocabulary);
                level.nodes().iter().map(|node| LiteralEntry {
                    literal: node.literal().describe(vocabulary),
                    mutex: node.mutex().iter().map(|&j| name(j)).collect(),
                }).collect()
            })
            .collect();
        let a_levels = self.a_levels.iter()
            .map(|level| {
                let name = |j: usize| level.nodes()[j].action().name().to_owned();
                level.nodes().iter().map(|node| ActionEntry {
                    action: node.action().name().to_owned(),
                    persistent: node.is_persistent(),
                    mutex: node.mutex().iter().map(|&j| name(j)).collect(),
                }).collect()
            })
            .collect();
        GraphSnapshot { s_levels, a_levels }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub s_levels: Vec<Vec<LiteralEntry>>,
    pub a_levels: Vec<Vec<ActionEntry>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralEntry {
    pub literal: String,
    pub mutex: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEntry {
    pub action: String,
    pub persistent: bool,
    pub mutex: Vec<String>,
}
