use std::collections::{BTreeSet, HashMap};

use crate::strips::{Action, Bitmask, FluentVocabulary, Literal};

/// Address of a node inside a planning graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
    Literal { level: usize, index: usize },
    Action { level: usize, index: usize },
}

impl NodeId {
    #[inline]
    pub fn level(&self) -> usize {
        match self {
            NodeId::Literal { level, .. } | NodeId::Action { level, .. } => *level,
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        match self {
            NodeId::Literal { index, .. } | NodeId::Action { index, .. } => *index,
        }
    }
}

/// Edges shared by both node kinds. Parents and children are indices into
/// the previous and next level, mutex partners are indices into the node's
/// own level.
pub trait PgNode {
    fn parents(&self) -> &BTreeSet<usize>;
    fn children(&self) -> &BTreeSet<usize>;
    fn mutex(&self) -> &BTreeSet<usize>;

    #[inline]
    fn is_mutex(&self, sibling: usize) -> bool {
        self.mutex().contains(&sibling)
    }
}

/// S-node: a signed literal.
#[derive(Debug, Clone)]
pub struct LiteralNode {
    pub(crate) literal: Literal,
    pub(crate) parents: BTreeSet<usize>,
    pub(crate) children: BTreeSet<usize>,
    pub(crate) mutex: BTreeSet<usize>,
}

impl LiteralNode {
    pub fn new(literal: Literal) -> Self {
        Self {
            literal,
            parents: BTreeSet::new(),
            children: BTreeSet::new(),
            mutex: BTreeSet::new(),
        }
    }

    #[inline]
    pub fn literal(&self) -> Literal {
        self.literal
    }
}

/// Literal nodes compare by literal only, whatever level they sit on.
impl PartialEq for LiteralNode {
    fn eq(&self, other: &Self) -> bool {
        self.literal == other.literal
    }
}

impl Eq for LiteralNode {}

impl PgNode for LiteralNode {
    fn parents(&self) -> &BTreeSet<usize> {
        &self.parents
    }

    fn children(&self) -> &BTreeSet<usize> {
        &self.children
    }

    fn mutex(&self) -> &BTreeSet<usize> {
        &self.mutex
    }
}

/// A-node: one action instantiated at a level. The action itself lives in
/// the problem; the node keeps a reference.
#[derive(Debug, Clone)]
pub struct ActionNode<'a> {
    pub(crate) action: &'a Action,
    pub(crate) action_index: usize,
    pub(crate) parents: BTreeSet<usize>,
    pub(crate) children: BTreeSet<usize>,
    pub(crate) mutex: BTreeSet<usize>,
}

impl<'a> ActionNode<'a> {
    pub fn new(action: &'a Action, action_index: usize) -> Self {
        Self {
            action,
            action_index,
            parents: BTreeSet::new(),
            children: BTreeSet::new(),
            mutex: BTreeSet::new(),
        }
    }

    #[inline]
    pub fn action(&self) -> &'a Action {
        self.action
    }

    /// Position of the action in `PlanningProblem::all_actions`.
    #[inline]
    pub fn action_index(&self) -> usize {
        self.action_index
    }

    #[inline]
    pub fn is_persistent(&self) -> bool {
        self.action.is_persistent()
    }
}

impl PartialEq for ActionNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.action.name() == other.action.name() && self.is_persistent() == other.is_persistent()
    }
}

impl Eq for ActionNode<'_> {}

impl PgNode for ActionNode<'_> {
    fn parents(&self) -> &BTreeSet<usize> {
        &self.parents
    }

    fn children(&self) -> &BTreeSet<usize> {
        &self.children
    }

    fn mutex(&self) -> &BTreeSet<usize> {
        &self.mutex
    }
}

/// S-level: literal nodes plus a `(symbol, sign)` lookup to the canonical
/// node of each literal.
#[derive(Debug, Clone, Default)]
pub struct LiteralLevel {
    pub(crate) nodes: Vec<LiteralNode>,
    lookup: HashMap<Literal, usize>,
}

impl LiteralLevel {
    /// Index of the node for `literal`, creating it if needed.
    pub fn insert(&mut self, literal: Literal) -> usize {
        if let Some(&index) = self.lookup.get(&literal) {
            return index;
        }
        let index = self.nodes.len();
        self.nodes.push(LiteralNode::new(literal));
        self.lookup.insert(literal, index);
        index
    }

    #[inline]
    pub fn index_of(&self, literal: Literal) -> Option<usize> {
        self.lookup.get(&literal).copied()
    }

    #[inline]
    pub fn contains(&self, literal: Literal) -> bool {
        self.lookup.contains_key(&literal)
    }

    #[inline]
    pub fn nodes(&self) -> &[LiteralNode] {
        &self.nodes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn literals(&self) -> impl Iterator<Item = Literal> + '_ {
        self.nodes.iter().map(LiteralNode::literal)
    }

    /// Same literal set, ignoring edges and mutexes.
    pub fn same_literals(&self, other: &LiteralLevel) -> bool {
        self.len() == other.len() && self.literals().all(|literal| other.contains(literal))
    }

    /// Positive and negative literals of the level as two masks.
    pub fn state(&self, vocabulary: &FluentVocabulary) -> (Bitmask, Bitmask) {
        self.literals().fold((0, 0), |(pos, neg), literal| {
            let bit = vocabulary.bit(literal.fluent);
            if literal.positive {
                (pos | bit, neg)
            } else {
                (pos, neg | bit)
            }
        })
    }
}

/// A-level: action nodes plus a lookup by action index.
#[derive(Debug, Clone, Default)]
pub struct ActionLevel<'a> {
    pub(crate) nodes: Vec<ActionNode<'a>>,
    lookup: HashMap<usize, usize>,
}

impl<'a> ActionLevel<'a> {
    /// Index of the node for `action`, creating it if needed.
    pub fn insert(&mut self, action: &'a Action, action_index: usize) -> usize {
        if let Some(&index) = self.lookup.get(&action_index) {
            return index;
        }
        let index = self.nodes.len();
        self.nodes.push(ActionNode::new(action, action_index));
        self.lookup.insert(action_index, index);
        index
    }

    #[inline]
    pub fn index_of(&self, action_index: usize) -> Option<usize> {
        self.lookup.get(&action_index).copied()
    }

    /// Node whose action carries `name` and the given persistence flag.
    pub fn find(&self, name: &str, persistent: bool) -> Option<usize> {
        self.nodes
            .iter()
            .position(|node| node.action.name() == name && node.is_persistent() == persistent)
    }

    #[inline]
    pub fn nodes(&self) -> &[ActionNode<'a>] {
        &self.nodes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
