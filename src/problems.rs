//! Bundled planning problems.

mod air_cargo;
mod birthday_dinner;
mod have_cake;
mod spare_tire;

use crate::error::Result;
use crate::strips::PlanningProblem;

pub use self::air_cargo::{air_cargo_p1, air_cargo_p2, air_cargo_p3};
pub use self::birthday_dinner::birthday_dinner;
pub use self::have_cake::have_cake;
pub use self::spare_tire::spare_tire;

/// Names accepted by `by_name`, in listing order.
pub const NAMES: [&str; 6] = [
    "have-cake",
    "spare-tire",
    "birthday-dinner",
    "air-cargo-p1",
    "air-cargo-p2",
    "air-cargo-p3",
];

/// Looks a bundled problem up by its kebab-case name.
pub fn by_name(name: &str) -> Option<Result<PlanningProblem>> {
    let problem = match name {
        "have-cake" => have_cake(),
        "spare-tire" => spare_tire(),
        "birthday-dinner" => birthday_dinner(),
        "air-cargo-p1" => air_cargo_p1(),
        "air-cargo-p2" => air_cargo_p2(),
        "air-cargo-p3" => air_cargo_p3(),
        _ => return None,
    };
    Some(problem)
}
