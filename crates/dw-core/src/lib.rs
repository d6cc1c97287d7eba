//! dw-core: Dungeon layout generation for doorweave
//!
//! Assembles a connected dungeon from a catalog of room blueprints. Each
//! room exposes doors; a backtracking search places rooms on a grid until
//! every door is paired with a compatible door on a neighbouring room.
//!
//! This crate has no I/O beyond loading JSON catalogs and configs. Turning
//! a plan into something visible is left to the front end.

pub mod catalog;
pub mod config;
pub mod geometry;
pub mod layout;

mod generator;
mod rng;

pub use catalog::{BlueprintId, Catalog, CatalogError, DoorSocket, RoomBlueprint, Signature, SocketRef};
pub use config::{ConfigError, GeneratorConfig};
pub use generator::{Generation, Generator};
pub use geometry::{Direction, GridPos, Orientation};
pub use layout::{Connector, LayoutPlan, PlacedRoom, PlanEntry, PlanViolation, SolveError, solve};
pub use rng::DungeonRng;
