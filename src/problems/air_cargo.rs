use crate::error::Result;
use crate::strips::{Action, FluentVocabulary, PlanningProblem};

fn at(thing: &str, airport: &str) -> String {
    format!("At({}, {})", thing, airport)
}

fn inside(cargo: &str, plane: &str) -> String {
    format!("In({}, {})", cargo, plane)
}

/// Grounds the Load, Unload and Fly schemas, in that order.
fn air_cargo_actions(
    cargos: &[&str],
    planes: &[&str],
    airports: &[&str],
    vocabulary: &FluentVocabulary,
) -> Result<Vec<Action>> {
    let moves = 2 * cargos.len() * planes.len() * airports.len();
    let flights = planes.len() * airports.len() * airports.len();
    let mut actions = Vec::with_capacity(moves + flights);
    for cargo in cargos {
        for plane in planes {
            for airport in airports {
                let name = format!("Load({}, {}, {})", cargo, plane, airport);
                actions.push(Action::build(name, vocabulary)
                    .requires(&[at(cargo, airport), at(plane, airport)])
                    .adds(&[inside(cargo, plane)])
                    .removes(&[at(cargo, airport)])
                    .finish()?);
            }
        }
    }
    for cargo in cargos {
        for plane in planes {
            for airport in airports {
                let name = format!("Unload({}, {}, {})", cargo, plane, airport);
                actions.push(Action::build(name, vocabulary)
                    .requires(&[inside(cargo, plane), at(plane, airport)])
                    .adds(&[at(cargo, airport)])
                    .removes(&[inside(cargo, plane)])
                    .finish()?);
            }
        }
    }
    for from in airports {
        for to in airports.iter().filter(|&to| to != from) {
            for plane in planes {
                actions.push(Action::build(format!("Fly({}, {}, {})", plane, from, to), vocabulary)
                    .requires(&[at(plane, from)])
                    .adds(&[at(plane, to)])
                    .removes(&[at(plane, from)])
                    .finish()?);
            }
        }
    }
    Ok(actions)
}

/// Everything not listed as initially true starts out false: every other
/// `At` fact and every `In` fact.
fn create_problem(
    cargos: &[&str],
    planes: &[&str],
    airports: &[&str],
    pos: &[String],
    goal: &[String],
) -> Result<PlanningProblem> {
    let neg: Vec<String> = cargos.iter()
        .chain(planes.iter())
        .flat_map(|thing| airports.iter().map(move |airport| at(thing, airport)))
        .chain(cargos.iter().flat_map(|cargo| planes.iter().map(move |plane| inside(cargo, plane))))
        .filter(|fluent| !pos.contains(fluent))
        .collect();
    PlanningProblem::from_literals(pos, &neg, goal, Vec::<String>::new(), |vocabulary| {
        air_cargo_actions(cargos, planes, airports, vocabulary)
    })
}

/// Two cargos, two planes, two airports.
pub fn air_cargo_p1() -> Result<PlanningProblem> {
    create_problem(
        &["C1", "C2"],
        &["P1", "P2"],
        &["JFK", "SFO"],
        &[at("C1", "SFO"), at("C2", "JFK"), at("P1", "SFO"), at("P2", "JFK")],
        &[at("C1", "JFK"), at("C2", "SFO")],
    )
}

pub fn air_cargo_p2() -> Result<PlanningProblem> {
    create_problem(
        &["C1", "C2", "C3"],
        &["P1", "P2", "P3"],
        &["JFK", "SFO", "ATL"],
        &[
            at("C1", "SFO"), at("C2", "JFK"), at("C3", "ATL"),
            at("P1", "SFO"), at("P2", "JFK"), at("P3", "ATL"),
        ],
        &[at("C1", "JFK"), at("C2", "SFO"), at("C3", "SFO")],
    )
}

pub fn air_cargo_p3() -> Result<PlanningProblem> {
    create_problem(
        &["C1", "C2", "C3", "C4"],
        &["P1", "P2"],
        &["JFK", "SFO", "ATL", "ORD"],
        &[
            at("C1", "SFO"), at("C2", "JFK"), at("C3", "ATL"), at("C4", "ORD"),
            at("P1", "SFO"), at("P2", "JFK"),
        ],
        &[at("C1", "JFK"), at("C3", "JFK"), at("C2", "SFO"), at("C4", "SFO")],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strips::codec::decode;

    #[test]
    fn test_p1_counts() {
        let problem = air_cargo_p1().unwrap();
        assert_eq!(problem.all_fluents().len(), 12);
        assert_eq!(decode(problem.all_fluents(), problem.initial()), vec!["At(C1, SFO)", "At(C2, JFK)", "At(P1, SFO)", "At(P2, JFK)"]);
        assert_eq!(decode(problem.all_fluents(), problem.goal().pos), vec!["At(C1, JFK)", "At(C2, SFO)"]);
        assert_eq!(problem.actions_list().len(), 20);
        assert_eq!(problem.actions(problem.initial()).count(), 4);
    }

    #[test]
    fn test_p1_result() {
        let problem = air_cargo_p1().unwrap();
        let load = problem.actions_list().iter().find(|action| action.name() == "Load(C1, P1, SFO)").unwrap();
        let state = problem.result(problem.initial(), load).unwrap();
        let (pos, _) = problem.get_state_fluents(state);
        assert!(pos.contains(&"In(C1, P1)"));
        assert!(!pos.contains(&"At(C1, SFO)"));
    }

    #[test]
    fn test_larger_problems() {
        let p2 = air_cargo_p2().unwrap();
        assert_eq!(p2.all_fluents().len(), 27);
        assert_eq!(p2.initial().count_ones(), 6);
        assert_eq!(p2.goal().pos.count_ones(), 3);
        assert_eq!(p2.actions_list().len(), 2 * 27 + 18);

        let p3 = air_cargo_p3().unwrap();
        assert_eq!(p3.all_fluents().len(), 32);
        assert_eq!(p3.initial().count_ones(), 6);
        assert_eq!(p3.goal().pos.count_ones(), 4);
        assert_eq!(p3.actions_list().len(), 2 * 32 + 24);
    }
}
