//! dw-tui: Terminal front end for doorweave
//!
//! Materializes generated layouts onto a tile stage and draws them with
//! ratatui. The generator never touches the terminal; this crate only
//! consumes finished plans.

pub mod app;
pub mod input;
pub mod stage;
pub mod widgets;

pub use app::App;
pub use input::Command;
pub use stage::{Stage, Tile, TileStage, materialize};
