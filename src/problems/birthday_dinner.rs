use crate::error::Result;
use crate::strips::{Action, PlanningProblem};

/// Prepare dinner and a present and take out the garbage without waking
/// anyone or dirtying your hands first.
pub fn birthday_dinner() -> Result<PlanningProblem> {
    PlanningProblem::from_literals(
        &["Garbage", "CleanHands", "Quiet"],
        &["Dinner", "Present"],
        &["Dinner", "Present"],
        &["Garbage"],
        |vocabulary| Ok(vec![
            Action::build("Cook", vocabulary).requires(&["CleanHands"]).adds(&["Dinner"]).finish()?,
            Action::build("Wrap", vocabulary).requires(&["Quiet"]).adds(&["Present"]).finish()?,
            Action::build("Carry", vocabulary)
                .requires(&["Garbage"])
                .removes(&["Garbage", "CleanHands"])
                .finish()?,
            Action::build("Dolly", vocabulary)
                .requires(&["Garbage"])
                .removes(&["Garbage", "Quiet"])
                .finish()?,
        ]),
    )
}
