use crate::error::Result;
use crate::strips::{Action, FluentVocabulary, PlanningProblem};

const TIRES: [&str; 2] = ["Spare", "Flat"];
const LOCATIONS: [&str; 3] = ["Ground", "Axle", "Trunk"];

fn at(tire: &str, location: &str) -> String {
    format!("At({}, {})", tire, location)
}

fn spare_tire_actions(vocabulary: &FluentVocabulary) -> Result<Vec<Action>> {
    let mut actions = Vec::new();
    for tire in TIRES.iter() {
        // Removing a tire that already lies on the ground changes nothing.
        for location in LOCATIONS.iter().filter(|&&location| location != "Ground") {
            actions.push(Action::build(format!("Remove({}, {})", tire, location), vocabulary)
                .requires(&[at(tire, location)])
                .removes(&[at(tire, location)])
                .adds(&[at(tire, "Ground")])
                .finish()?);
        }
    }
    for tire in TIRES.iter() {
        actions.push(Action::build(format!("PutOn({}, Axle)", tire), vocabulary)
            .requires(&[at(tire, "Ground")])
            .forbids(&[at("Flat", "Axle")])
            .removes(&[at(tire, "Ground")])
            .adds(&[at(tire, "Axle")])
            .finish()?);
    }
    let everywhere: Vec<String> = TIRES.iter()
        .flat_map(|tire| LOCATIONS.iter().map(move |location| at(tire, location)))
        .collect();
    actions.push(Action::build("LeaveOvernight", vocabulary).removes(&everywhere).finish()?);
    Ok(actions)
}

/// Swap the flat tire on the axle for the spare in the trunk.
pub fn spare_tire() -> Result<PlanningProblem> {
    PlanningProblem::from_literals(
        &[at("Flat", "Axle"), at("Spare", "Trunk")],
        &[at("Flat", "Ground"), at("Flat", "Trunk"), at("Spare", "Ground"), at("Spare", "Axle")],
        &[at("Spare", "Axle")],
        Vec::<String>::new(),
        spare_tire_actions,
    )
}
