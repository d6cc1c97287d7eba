//! Structural checks on a finished plan
//!
//! The solver builds plans that pass these by construction. The checks
//! exist for plans that arrive from elsewhere (JSON, hand edits) and for
//! property tests.

use hashbrown::{HashMap, HashSet};
use thiserror::Error;

use crate::catalog::{BlueprintId, Catalog, SocketRef};
use crate::config::GeneratorConfig;
use crate::geometry::{Direction, GridPos};

use super::plan::LayoutPlan;

/// A way a plan can be malformed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanViolation {
    #[error("two rooms at {0}")]
    Overlap(GridPos),

    #[error("plan refers to a blueprint the catalog does not have: {0:?}")]
    UnknownBlueprint(BlueprintId),

    #[error("plan refers to a socket the catalog does not have: {0:?}")]
    UnknownSocket(SocketRef),

    #[error("connector at {0} does not join the rooms it names")]
    WrongRooms(GridPos),

    #[error("connector from {from} to {to} does not span one step")]
    NotAdjacent { from: GridPos, to: GridPos },

    #[error("doors at {from} and {to} do not match")]
    Mismatched { from: GridPos, to: GridPos },

    #[error("door {socket} of room at {pos} is used twice")]
    SocketReused { pos: GridPos, socket: usize },

    #[error("door facing {direction} at {pos} is never connected")]
    DoorLeftOpen { pos: GridPos, direction: Direction },

    #[error("room at {0} is not reachable from the start")]
    Disconnected(GridPos),

    #[error("{found} rooms is below the minimum of {min}")]
    TooFewRooms { found: usize, min: usize },

    #[error("{found} rooms is above the maximum of {max}")]
    TooManyRooms { found: usize, max: usize },
}

/// Union-find over room indices
#[derive(Debug, Clone)]
struct ConnectivityTracker {
    parent: Vec<usize>,
}

impl ConnectivityTracker {
    fn new(num_rooms: usize) -> Self {
        Self {
            parent: (0..num_rooms).collect(),
        }
    }

    fn find(&mut self, mut room: usize) -> usize {
        while self.parent[room] != room {
            self.parent[room] = self.parent[self.parent[room]];
            room = self.parent[room];
        }
        room
    }

    fn merge(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[rb] = ra;
        }
    }

    fn are_connected(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }
}

impl LayoutPlan {
    /// Check every structural property a solved layout must have
    ///
    /// Rooms never overlap, every connector joins a matching pair of doors
    /// on neighbouring rooms, each door is used at most once and none is
    /// left open, all rooms hang together, and the room count honours
    /// `config`.
    pub fn verify(&self, catalog: &Catalog, config: &GeneratorConfig) -> Result<(), PlanViolation> {
        let rooms: Vec<_> = self.rooms().collect();

        let mut index_of = HashMap::with_capacity(rooms.len());
        for (index, room) in rooms.iter().enumerate() {
            if catalog.get(room.blueprint).is_none() {
                return Err(PlanViolation::UnknownBlueprint(room.blueprint));
            }
            if index_of.insert(room.pos, index).is_some() {
                return Err(PlanViolation::Overlap(room.pos));
            }
        }

        let mut used: HashSet<(GridPos, usize)> = HashSet::new();
        let mut tracker = ConnectivityTracker::new(rooms.len());

        for connector in self.connectors() {
            let door = catalog
                .socket(connector.door)
                .ok_or(PlanViolation::UnknownSocket(connector.door))?;
            let partner = catalog
                .socket(connector.partner)
                .ok_or(PlanViolation::UnknownSocket(connector.partner))?;

            let (from, to) = (connector.door_pos, connector.partner_pos);
            if from.step(connector.direction) != to {
                return Err(PlanViolation::NotAdjacent { from, to });
            }

            let (Some(&a), Some(&b)) = (index_of.get(&from), index_of.get(&to)) else {
                return Err(PlanViolation::WrongRooms(from));
            };
            if rooms[a].blueprint != connector.door.room || rooms[b].blueprint != connector.partner.room
            {
                return Err(PlanViolation::WrongRooms(from));
            }

            if door.direction != connector.direction
                || connector.orientation != connector.direction.hallway()
                || !door.matches(partner)
            {
                return Err(PlanViolation::Mismatched { from, to });
            }

            for (pos, socket) in [(from, connector.door.socket), (to, connector.partner.socket)] {
                if !used.insert((pos, socket)) {
                    return Err(PlanViolation::SocketReused { pos, socket });
                }
            }
            tracker.merge(a, b);
        }

        for (index, room) in rooms.iter().enumerate() {
            if !tracker.are_connected(0, index) {
                return Err(PlanViolation::Disconnected(room.pos));
            }
            let blueprint = &catalog[room.blueprint];
            for (socket, door) in blueprint.sockets.iter().enumerate() {
                if !used.contains(&(room.pos, socket)) {
                    return Err(PlanViolation::DoorLeftOpen {
                        pos: room.pos,
                        direction: door.direction,
                    });
                }
            }
        }

        let found = rooms.len();
        if found < config.min_rooms {
            return Err(PlanViolation::TooFewRooms {
                found,
                min: config.min_rooms,
            });
        }
        if let Some(max) = config.max_rooms
            && found > max
        {
            return Err(PlanViolation::TooManyRooms { found, max });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RoomBlueprint;
    use crate::layout::{PlanEntry, solve};
    use Direction::*;

    fn catalog() -> Catalog {
        Catalog::new(
            RoomBlueprint::with_doors("hub", "stone", &[East]),
            vec![
                RoomBlueprint::with_doors("cap_w", "stone", &[West]),
                RoomBlueprint::with_doors("hall", "stone", &[West, East]),
            ],
        )
    }

    fn solved(min_rooms: usize) -> (Catalog, GeneratorConfig, LayoutPlan) {
        let catalog = catalog();
        let config = GeneratorConfig::default().with_min_rooms(min_rooms);
        let plan = solve(&catalog, &config).unwrap();
        (catalog, config, plan)
    }

    #[test]
    fn test_connectivity_tracker() {
        let mut tracker = ConnectivityTracker::new(4);
        assert!(!tracker.are_connected(0, 1));
        tracker.merge(0, 1);
        tracker.merge(2, 3);
        assert!(tracker.are_connected(0, 1));
        assert!(!tracker.are_connected(1, 2));
        tracker.merge(1, 3);
        assert!(tracker.are_connected(0, 2));
    }

    #[test]
    fn test_solved_plan_verifies() {
        let (catalog, config, plan) = solved(4);
        assert_eq!(plan.verify(&catalog, &config), Ok(()));
    }

    #[test]
    fn test_detects_overlap() {
        let (catalog, config, mut plan) = solved(3);
        if let PlanEntry::Room(room) = &mut plan.entries[0] {
            room.pos = GridPos::ORIGIN;
        }
        assert_eq!(
            plan.verify(&catalog, &config),
            Err(PlanViolation::Overlap(GridPos::ORIGIN))
        );
    }

    #[test]
    fn test_detects_missing_room() {
        let (catalog, config, mut plan) = solved(3);
        // Drop the last room, leaving its connector dangling
        plan.entries.remove(2);
        assert_eq!(
            plan.verify(&catalog, &config),
            Err(PlanViolation::WrongRooms(GridPos::new(1, 0)))
        );
    }

    #[test]
    fn test_detects_open_door() {
        let (catalog, config, mut plan) = solved(3);
        // Keep only hub + hall; the hall's east door is then open
        plan.entries.truncate(2);
        let config = config.with_min_rooms(2);
        assert_eq!(
            plan.verify(&catalog, &config),
            Err(PlanViolation::DoorLeftOpen {
                pos: GridPos::new(1, 0),
                direction: East,
            })
        );
    }

    #[test]
    fn test_detects_mismatch() {
        let (catalog, config, mut plan) = solved(2);
        if let PlanEntry::Connector(connector) = &mut plan.entries[1] {
            // Claim the hall's east door joined the hub
            connector.partner = SocketRef::new(BlueprintId::Catalog(1), 1);
        }
        if let PlanEntry::Room(room) = &mut plan.entries[0] {
            room.blueprint = BlueprintId::Catalog(1);
        }
        assert_eq!(
            plan.verify(&catalog, &config),
            Err(PlanViolation::Mismatched {
                from: GridPos::ORIGIN,
                to: GridPos::new(1, 0),
            })
        );
    }

    #[test]
    fn test_detects_room_count() {
        let (catalog, _, plan) = solved(2);
        let strict = GeneratorConfig::default().with_min_rooms(3);
        assert_eq!(
            plan.verify(&catalog, &strict),
            Err(PlanViolation::TooFewRooms { found: 2, min: 3 })
        );
        let capped = GeneratorConfig::default().with_min_rooms(1).with_max_rooms(Some(1));
        assert_eq!(
            plan.verify(&catalog, &capped),
            Err(PlanViolation::TooManyRooms { found: 2, max: 1 })
        );
    }

    #[test]
    fn test_detects_disconnected_room() {
        let (catalog, config, mut plan) = solved(2);
        let stray = crate::layout::PlacedRoom {
            blueprint: BlueprintId::Catalog(0),
            pos: GridPos::new(5, 5),
        };
        plan.entries.push(PlanEntry::Room(stray));
        assert_eq!(
            plan.verify(&catalog, &config),
            Err(PlanViolation::Disconnected(GridPos::new(5, 5)))
        );
    }
}
