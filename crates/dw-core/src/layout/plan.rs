//! Placement plans
//!
//! The only thing a finished search hands to the outside world.

use serde::{Deserialize, Serialize};

use crate::catalog::{BlueprintId, SocketRef};
use crate::geometry::{Direction, GridPos, Orientation};

/// A blueprint bound to a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedRoom {
    pub blueprint: BlueprintId,
    pub pos: GridPos,
}

/// A hallway joining two matched doors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connector {
    /// The frontier door that was satisfied
    pub door: SocketRef,
    /// Cell of the room owning `door`
    pub door_pos: GridPos,
    /// Side `door` faces
    pub direction: Direction,
    /// Socket of the new room consumed by the match
    pub partner: SocketRef,
    /// Cell of the new room
    pub partner_pos: GridPos,
    pub orientation: Orientation,
}

/// One step of a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PlanEntry {
    Room(PlacedRoom),
    Connector(Connector),
}

/// A solved layout
///
/// Entries run outward from the start room: every room is followed by the
/// connector that joined it to the layout. The search completes rooms
/// deepest first, so this is the reverse of the order they were settled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutPlan {
    pub start: PlacedRoom,
    pub entries: Vec<PlanEntry>,
    /// Recursive steps the search took
    pub iterations: u32,
}

impl LayoutPlan {
    /// Every placed room, start first
    pub fn rooms(&self) -> impl Iterator<Item = PlacedRoom> + '_ {
        std::iter::once(self.start).chain(self.entries.iter().filter_map(|e| match e {
            PlanEntry::Room(room) => Some(*room),
            PlanEntry::Connector(_) => None,
        }))
    }

    pub fn connectors(&self) -> impl Iterator<Item = Connector> + '_ {
        self.entries.iter().filter_map(|e| match e {
            PlanEntry::Connector(connector) => Some(*connector),
            PlanEntry::Room(_) => None,
        })
    }

    /// Rooms placed, start included
    pub fn room_count(&self) -> usize {
        self.rooms().count()
    }

    /// Smallest and largest corner of the occupied cells
    pub fn bounds(&self) -> (GridPos, GridPos) {
        self.rooms().fold((self.start.pos, self.start.pos), |(lo, hi), room| {
            (
                GridPos::new(lo.x.min(room.pos.x), lo.y.min(room.pos.y)),
                GridPos::new(hi.x.max(room.pos.x), hi.y.max(room.pos.y)),
            )
        })
    }
}
