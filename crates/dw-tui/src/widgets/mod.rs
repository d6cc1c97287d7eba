//! Widgets for the dungeon view

mod map;
mod plan;
mod status;

pub use map::MapWidget;
pub use plan::PlanWidget;
pub use status::{StatusWidget, describe};
