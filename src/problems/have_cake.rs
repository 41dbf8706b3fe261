use crate::error::Result;
use crate::strips::{Action, PlanningProblem};

/// Have the cake and eat it too.
pub fn have_cake() -> Result<PlanningProblem> {
    PlanningProblem::from_literals(
        &["Have(Cake)"],
        &["Eaten(Cake)"],
        &["Have(Cake)", "Eaten(Cake)"],
        Vec::<&str>::new(),
        |vocabulary| Ok(vec![
            Action::build("Eat(Cake)", vocabulary)
                .requires(&["Have(Cake)"])
                .adds(&["Eaten(Cake)"])
                .removes(&["Have(Cake)"])
                .finish()?,
            Action::build("Bake(Cake)", vocabulary)
                .forbids(&["Have(Cake)"])
                .adds(&["Have(Cake)"])
                .finish()?,
        ]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_have_cake() {
        let problem = have_cake().unwrap();
        assert_eq!(problem.all_fluents().len(), 2);
        assert_eq!(problem.actions_list().len(), 2);
        assert_eq!(problem.get_state_fluents(problem.initial()), (vec!["Have(Cake)"], vec!["Eaten(Cake)"]));
        assert!(!problem.goal_test(problem.initial()));
    }
}
