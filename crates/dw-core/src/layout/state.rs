//! Running state of one search
//!
//! Every mutation made on the way into a branch has an exact inverse applied
//! on the way out, so a failed branch leaves the occupancy set and the
//! frontier as it found them.

use hashbrown::HashSet;

use crate::catalog::{BlueprintId, Catalog, SocketRef};
use crate::geometry::{Direction, GridPos};

use super::plan::{Connector, LayoutPlan, PlacedRoom, PlanEntry};

/// An unmatched door on a placed room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpenDoor {
    pub socket: SocketRef,
    /// Cell of the owning room
    pub pos: GridPos,
    pub direction: Direction,
}

impl OpenDoor {
    /// Cell a room must occupy to satisfy this door
    pub fn target(&self) -> GridPos {
        self.pos.step(self.direction)
    }
}

/// Frontier length before a branch was entered, used to undo it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Mark {
    index: usize,
    len: usize,
}

/// Solver state: occupancy, frontier and effort spent
///
/// Created fresh for each request and never reused.
#[derive(Debug, Clone)]
pub struct Layout<'a> {
    pub(crate) catalog: &'a Catalog,
    occupied: HashSet<GridPos>,
    frontier: Vec<OpenDoor>,
    pub(crate) iterations: u32,
    /// Filled while unwinding a successful search, deepest step first
    unwound: Vec<PlanEntry>,
}

impl<'a> Layout<'a> {
    /// Start room at the origin with all its doors open
    pub fn new(catalog: &'a Catalog) -> Self {
        let mut layout = Self {
            catalog,
            occupied: HashSet::new(),
            frontier: Vec::new(),
            iterations: 0,
            unwound: Vec::new(),
        };
        layout.occupied.insert(GridPos::ORIGIN);
        layout.open_doors(BlueprintId::Start, GridPos::ORIGIN, None);
        layout
    }

    pub fn occupied(&self) -> &HashSet<GridPos> {
        &self.occupied
    }

    pub fn frontier(&self) -> &[OpenDoor] {
        &self.frontier
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn room_count(&self) -> usize {
        self.occupied.len()
    }

    fn open_doors(&mut self, room: BlueprintId, pos: GridPos, consumed: Option<usize>) {
        let catalog = self.catalog;
        let blueprint = &catalog[room];
        for (index, socket) in blueprint.sockets.iter().enumerate() {
            if Some(index) == consumed {
                continue;
            }
            self.frontier.push(OpenDoor {
                socket: SocketRef::new(room, index),
                pos,
                direction: socket.direction,
            });
        }
    }

    /// Place `partner`'s room at the cell `frontier[index]` leads to
    ///
    /// The open door and the partner socket are both consumed; the new
    /// room's other doors join the end of the frontier.
    pub(crate) fn claim(&mut self, index: usize, partner: SocketRef) -> Mark {
        let door = self.frontier.remove(index);
        let target = door.target();
        let fresh = self.occupied.insert(target);
        debug_assert!(fresh, "claimed an occupied cell {target}");

        let mark = Mark {
            index,
            len: self.frontier.len(),
        };
        self.open_doors(partner.room, target, Some(partner.socket));
        mark
    }

    /// Exact inverse of the `claim` that produced `mark`
    pub(crate) fn release(&mut self, mark: Mark, door: OpenDoor) {
        self.frontier.truncate(mark.len);
        self.frontier.insert(mark.index, door);
        self.occupied.remove(&door.target());
    }

    /// Note a committed step while a successful search unwinds
    pub(crate) fn commit(&mut self, door: OpenDoor, partner: SocketRef) {
        let target = door.target();
        // Reversed in `into_plan`, so the connector goes in first
        self.unwound.push(PlanEntry::Connector(Connector {
            door: door.socket,
            door_pos: door.pos,
            direction: door.direction,
            partner,
            partner_pos: target,
            orientation: door.direction.hallway(),
        }));
        self.unwound.push(PlanEntry::Room(PlacedRoom {
            blueprint: partner.room,
            pos: target,
        }));
    }

    pub(crate) fn into_plan(self) -> LayoutPlan {
        let mut entries = self.unwound;
        entries.reverse();
        LayoutPlan {
            start: PlacedRoom {
                blueprint: BlueprintId::Start,
                pos: GridPos::ORIGIN,
            },
            entries,
            iterations: self.iterations,
        }
    }
}
