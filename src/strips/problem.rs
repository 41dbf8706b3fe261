use super::codec::{decode, decode_indices, encode};
use super::{Action, Bitmask, FluentVocabulary, Literal};
use crate::error::Result;
use crate::graph::mutex::ActionMutexTable;

/// Literals a goal state must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Goal {
    pub pos: Bitmask,
    pub neg: Bitmask,
}

impl Goal {
    pub fn new(pos: Bitmask, neg: Bitmask) -> Self {
        Self { pos, neg }
    }

    #[inline]
    pub fn satisfied_by(&self, state: Bitmask) -> bool {
        state & self.pos == self.pos && state & self.neg == 0
    }

    /// Positive goals first, each group in vocabulary order.
    pub fn literals(&self, vocabulary: &FluentVocabulary) -> Vec<Literal> {
        decode_indices(vocabulary, self.pos)
            .map(Literal::positive)
            .chain(decode_indices(vocabulary, self.neg).map(Literal::negative))
            .collect()
    }
}

/// A planning problem instance: the vocabulary every mask is expressed in,
/// the grounded domain actions and the start and goal conditions.
///
/// The persistence pair of every fluent and the static mutex relation
/// between all actions are computed once here and shared by every planning
/// graph built for the problem.
#[derive(Debug)]
pub struct PlanningProblem {
    vocabulary: FluentVocabulary,
    initial: Bitmask,
    goal: Goal,
    actions: Vec<Action>,
    domain_actions: usize,
    mutex_table: ActionMutexTable,
}

impl PlanningProblem {
    pub fn new(
        vocabulary: FluentVocabulary,
        initial: Bitmask,
        goal: Goal,
        domain_actions: Vec<Action>,
    ) -> Self {
        let domain_count = domain_actions.len();
        let mut actions = domain_actions;
        actions.reserve(2 * vocabulary.len());
        for index in 0..vocabulary.len() {
            actions.push(Action::persistence(&vocabulary, index, true));
            actions.push(Action::persistence(&vocabulary, index, false));
        }
        let mutex_table = ActionMutexTable::new(&actions);
        tracing::debug!(
            fluents = vocabulary.len(),
            actions = domain_count,
            "planning problem ready"
        );
        Self {
            initial: initial & vocabulary.full_mask(),
            vocabulary,
            goal,
            actions,
            domain_actions: domain_count,
            mutex_table,
        }
    }

    /// Builds the vocabulary as the sorted union of the initially true and
    /// false fluents, then asks `action_fn` for the grounded actions.
    pub fn from_literals<P, N, G, H, F>(
        pos: P,
        neg: N,
        goal_pos: G,
        goal_neg: H,
        action_fn: F,
    ) -> Result<Self>
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
        G: IntoIterator,
        G::Item: AsRef<str>,
        H: IntoIterator,
        H::Item: AsRef<str>,
        F: FnOnce(&FluentVocabulary) -> Result<Vec<Action>>,
    {
        let pos: Vec<String> = pos.into_iter().map(|s| s.as_ref().to_owned()).collect();
        let neg = neg.into_iter().map(|s| s.as_ref().to_owned());
        let vocabulary = FluentVocabulary::sorted(pos.iter().cloned().chain(neg))?;
        let initial = encode(&vocabulary, &pos)?;
        let goal = Goal::new(encode(&vocabulary, goal_pos)?, encode(&vocabulary, goal_neg)?);
        let actions = action_fn(&vocabulary)?;
        Ok(Self::new(vocabulary, initial, goal, actions))
    }

    #[inline]
    pub fn all_fluents(&self) -> &FluentVocabulary {
        &self.vocabulary
    }

    #[inline]
    pub fn initial(&self) -> Bitmask {
        self.initial
    }

    #[inline]
    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    /// Grounded domain actions, without persistence actions.
    #[inline]
    pub fn actions_list(&self) -> &[Action] {
        &self.actions[..self.domain_actions]
    }

    /// Domain actions followed by `+NoOp(f)`, `-NoOp(f)` for every fluent
    /// in vocabulary order.
    #[inline]
    pub fn all_actions(&self) -> &[Action] {
        &self.actions
    }

    #[inline]
    pub(crate) fn mutex_table(&self) -> &ActionMutexTable {
        &self.mutex_table
    }

    /// Names of the fluents true and false in `state`.
    pub fn get_state_fluents(&self, state: Bitmask) -> (Vec<&str>, Vec<&str>) {
        let full = self.vocabulary.full_mask();
        (decode(&self.vocabulary, state & full), decode(&self.vocabulary, !state & full))
    }

    /// Domain actions applicable in `state`.
    pub fn actions(&self, state: Bitmask) -> impl Iterator<Item = &Action> {
        self.actions_list().iter().filter(move |action| action.applicable(state))
    }

    #[inline]
    pub fn result(&self, state: Bitmask, action: &Action) -> Result<Bitmask> {
        action.apply(state)
    }

    #[inline]
    pub fn goal_test(&self, state: Bitmask) -> bool {
        self.goal.satisfied_by(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cake() -> PlanningProblem {
        PlanningProblem::from_literals(
            &["Have(Cake)"],
            &["Eaten(Cake)"],
            &["Have(Cake)", "Eaten(Cake)"],
            Vec::<&str>::new(),
            |vocabulary| Ok(vec![
                Action::build("Eat(Cake)", vocabulary).requires(&["Have(Cake)"]).adds(&["Eaten(Cake)"]).removes(&["Have(Cake)"]).finish()?,
                Action::build("Bake(Cake)", vocabulary).forbids(&["Have(Cake)"]).adds(&["Have(Cake)"]).finish()?,
            ]),
        ).unwrap()
    }

    #[test]
    fn test_from_literals() {
        let problem = cake();
        assert_eq!(problem.all_fluents().iter().collect::<Vec<_>>(), vec!["Eaten(Cake)", "Have(Cake)"]);
        assert_eq!(problem.initial(), 0b01);
        assert_eq!(problem.goal(), &Goal::new(0b11, 0));
        assert_eq!(problem.get_state_fluents(problem.initial()), (vec!["Have(Cake)"], vec!["Eaten(Cake)"]));
    }

    #[test]
    fn test_persistence_actions_appended() {
        let problem = cake();
        assert_eq!(problem.actions_list().len(), 2);
        let names: Vec<&str> = problem.all_actions().iter().map(Action::name).collect();
        assert_eq!(names, vec![
            "Eat(Cake)", "Bake(Cake)",
            "+NoOp(Eaten(Cake))", "-NoOp(Eaten(Cake))",
            "+NoOp(Have(Cake))", "-NoOp(Have(Cake))",
        ]);
        assert!(problem.all_actions()[2..].iter().all(Action::is_persistent));
    }

    #[test]
    fn test_actions_and_goal() {
        let problem = cake();
        let names: Vec<&str> = problem.actions(problem.initial()).map(Action::name).collect();
        assert_eq!(names, vec!["Eat(Cake)"]);
        let eaten = problem.result(problem.initial(), &problem.actions_list()[0]).unwrap();
        assert!(!problem.goal_test(eaten));
        let baked = problem.result(eaten, &problem.actions_list()[1]).unwrap();
        assert!(problem.goal_test(baked));
    }

    #[test]
    fn test_goal_literals() {
        let vocabulary = FluentVocabulary::new("A B C".split(' ')).unwrap();
        let goal = Goal::new(0b001, 0b100);
        assert_eq!(goal.literals(&vocabulary), vec![Literal::positive(2), Literal::negative(0)]);
        assert!(goal.satisfied_by(0b011));
        assert!(!goal.satisfied_by(0b101));
    }
}
