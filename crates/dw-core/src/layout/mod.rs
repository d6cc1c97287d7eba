//! Layout search
//!
//! Places rooms from a catalog around a start room until every door is
//! matched, backtracking out of dead ends.

mod plan;
mod solver;
mod state;
mod verify;

pub use plan::{Connector, LayoutPlan, PlacedRoom, PlanEntry};
pub use solver::{SolveError, solve};
pub use state::{Layout, OpenDoor};
pub use verify::PlanViolation;
