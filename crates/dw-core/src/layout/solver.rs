//! Backtracking layout search
//!
//! Depth-first, first fit. Candidates are tried in frontier order, then
//! catalog order, then socket order; the first complete layout wins.
//!
//! The search keeps its own stack of branch frames instead of recursing, so
//! a deep layout costs heap rather than thread stack.

use thiserror::Error;

use crate::catalog::{BlueprintId, Catalog, SocketRef};
use crate::config::GeneratorConfig;

use super::plan::LayoutPlan;
use super::state::{Layout, Mark, OpenDoor};

/// Why a search produced no layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("no layout found after {iterations} iterations")]
    NoLayout { iterations: u32 },

    #[error("iteration budget of {limit} exceeded")]
    BudgetExceeded { limit: u32 },
}

impl SolveError {
    /// A bigger budget might still find a layout
    pub fn is_budget(&self) -> bool {
        matches!(self, SolveError::BudgetExceeded { .. })
    }
}

/// Outcome of one search step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Found,
    Exhausted,
}

/// Search for a layout starting from the catalog's start room at the origin
pub fn solve(catalog: &Catalog, config: &GeneratorConfig) -> Result<LayoutPlan, SolveError> {
    let mut layout = Layout::new(catalog);
    match layout.explore(config)? {
        Step::Found => Ok(layout.into_plan()),
        Step::Exhausted => Err(SolveError::NoLayout {
            iterations: layout.iterations(),
        }),
    }
}

/// One open branch of the search
///
/// The cursor points at the candidate being tried (or next to try):
/// frontier door, catalog room, socket of that room.
#[derive(Debug, Default)]
struct Frame {
    door: usize,
    room: usize,
    socket: usize,
    /// Set while a child branch built on the cursor's candidate is open
    claimed: Option<(Mark, OpenDoor)>,
}

impl Frame {
    fn partner(&self) -> SocketRef {
        SocketRef::new(BlueprintId::Catalog(self.room), self.socket)
    }
}

impl Layout<'_> {
    /// Run the search from the current state
    ///
    /// `Exhausted` leaves the layout as it was on entry. A budget error
    /// abandons the layout mid-branch; callers must discard it.
    pub(crate) fn explore(&mut self, config: &GeneratorConfig) -> Result<Step, SolveError> {
        let mut stack: Vec<Frame> = Vec::new();
        let mut settled = self.enter(config, &mut stack)?;

        loop {
            // Hand a finished branch back to the frame that opened it
            if let Some(step) = settled.take() {
                let Some(frame) = stack.last_mut() else {
                    return Ok(step);
                };
                if let Some((mark, door)) = frame.claimed.take() {
                    match step {
                        Step::Found => {
                            self.commit(door, frame.partner());
                            stack.pop();
                            settled = Some(Step::Found);
                            continue;
                        }
                        Step::Exhausted => {
                            self.release(mark, door);
                            frame.socket += 1;
                        }
                    }
                }
            }

            let Some(frame) = stack.last_mut() else {
                return Ok(Step::Exhausted);
            };
            if self.seek(frame) {
                let door = self.frontier()[frame.door];
                let mark = self.claim(frame.door, frame.partner());
                frame.claimed = Some((mark, door));
                settled = self.enter(config, &mut stack)?;
            } else {
                stack.pop();
                settled = Some(Step::Exhausted);
            }
        }
    }

    /// Count a step and settle it if no candidate needs trying
    ///
    /// Pushes a fresh frame and returns `None` when the frontier still has
    /// doors to fill.
    fn enter(
        &mut self,
        config: &GeneratorConfig,
        stack: &mut Vec<Frame>,
    ) -> Result<Option<Step>, SolveError> {
        self.iterations += 1;
        if self.iterations > config.max_iterations {
            return Err(SolveError::BudgetExceeded {
                limit: config.max_iterations,
            });
        }

        if self.frontier().is_empty() {
            return Ok(Some(if self.room_count() >= config.min_rooms {
                Step::Found
            } else {
                Step::Exhausted
            }));
        }

        // Full: no door can take another room
        if config.max_rooms.is_some_and(|max| self.room_count() >= max) {
            return Ok(Some(Step::Exhausted));
        }

        stack.push(Frame::default());
        Ok(None)
    }

    /// Move the frame's cursor to the next fitting candidate, at or after
    /// where it points now
    fn seek(&self, frame: &mut Frame) -> bool {
        let catalog = self.catalog;
        while frame.door < self.frontier().len() {
            let door = self.frontier()[frame.door];
            if !self.occupied().contains(&door.target()) {
                let open = &catalog[door.socket.room].sockets[door.socket.socket];
                let facing = door.direction.opposite();

                while frame.room < catalog.len() {
                    let blueprint = &catalog.rooms()[frame.room];
                    if blueprint.has_socket_facing(facing) {
                        while frame.socket < blueprint.sockets.len() {
                            if open.matches(&blueprint.sockets[frame.socket]) {
                                return true;
                            }
                            frame.socket += 1;
                        }
                    }
                    frame.room += 1;
                    frame.socket = 0;
                }
            }
            frame.door += 1;
            frame.room = 0;
            frame.socket = 0;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RoomBlueprint;
    use crate::geometry::{Direction, GridPos};
    use Direction::*;

    fn cap(name: &str, side: Direction) -> RoomBlueprint {
        RoomBlueprint::with_doors(name, "stone", &[side])
    }

    #[test]
    fn test_failed_search_restores_state() {
        // A single dead end can never reach five rooms
        let catalog = Catalog::new(
            RoomBlueprint::with_doors("hub", "stone", &[East, North]),
            vec![cap("cap_w", West), cap("cap_s", South)],
        );
        let config = GeneratorConfig::default();
        let mut layout = Layout::new(&catalog);
        let occupied = layout.occupied().clone();
        let frontier = layout.frontier().to_vec();

        let step = layout.explore(&config).unwrap();

        assert_eq!(step, Step::Exhausted);
        assert_eq!(layout.occupied(), &occupied);
        assert_eq!(layout.frontier(), frontier.as_slice());
    }

    #[test]
    fn test_no_doors_min_one() {
        let catalog = Catalog::new(RoomBlueprint::new("cell", vec![]), vec![cap("cap", West)]);
        let config = GeneratorConfig::default().with_min_rooms(1);

        let plan = solve(&catalog, &config).unwrap();

        assert_eq!(plan.room_count(), 1);
        assert!(plan.entries.is_empty());
        assert_eq!(plan.iterations, 1);
    }

    #[test]
    fn test_no_doors_needs_more_rooms() {
        let catalog = Catalog::new(RoomBlueprint::new("cell", vec![]), vec![cap("cap", West)]);
        let config = GeneratorConfig::default();

        assert_eq!(
            solve(&catalog, &config),
            Err(SolveError::NoLayout { iterations: 1 })
        );
    }

    #[test]
    fn test_dead_end_pair() {
        let catalog = Catalog::new(
            RoomBlueprint::with_doors("hub", "stone", &[East]),
            vec![cap("cap_w", West)],
        );
        let config = GeneratorConfig::default().with_min_rooms(2);

        let plan = solve(&catalog, &config).unwrap();

        assert_eq!(plan.room_count(), 2);
        assert_eq!(plan.iterations, 2);
        let rooms: Vec<_> = plan.rooms().map(|r| r.pos).collect();
        assert_eq!(rooms, vec![GridPos::ORIGIN, GridPos::new(1, 0)]);
        let connector = plan.connectors().next().unwrap();
        assert_eq!(connector.direction, East);
        assert_eq!(connector.partner, SocketRef::new(BlueprintId::Catalog(0), 0));
    }

    #[test]
    fn test_signature_mismatch_has_no_layout() {
        let catalog = Catalog::new(
            RoomBlueprint::with_doors("hub", "stone", &[East]),
            vec![RoomBlueprint::with_doors("vault", "iron", &[West])],
        );
        let config = GeneratorConfig::default().with_min_rooms(2);

        assert_eq!(
            solve(&catalog, &config),
            Err(SolveError::NoLayout { iterations: 1 })
        );
    }

    #[test]
    fn test_corridor_hits_budget() {
        let catalog = Catalog::new(
            RoomBlueprint::with_doors("hub", "stone", &[East]),
            vec![RoomBlueprint::with_doors("hall", "stone", &[West, East])],
        );
        let config = GeneratorConfig::default().with_max_iterations(20);

        let err = solve(&catalog, &config).unwrap_err();
        assert_eq!(err, SolveError::BudgetExceeded { limit: 20 });
        assert!(err.is_budget());
    }

    #[test]
    fn test_deep_corridor_reports_budget() {
        // Every step opens one more hall, so the search runs a million deep
        let catalog = Catalog::new(
            RoomBlueprint::with_doors("hub", "stone", &[East]),
            vec![RoomBlueprint::with_doors("hall", "stone", &[West, East])],
        );
        let config = GeneratorConfig::default().with_max_iterations(1_000_000);

        assert_eq!(
            solve(&catalog, &config),
            Err(SolveError::BudgetExceeded { limit: 1_000_000 })
        );
    }

    #[test]
    fn test_capped_corridor_has_no_layout() {
        let catalog = Catalog::new(
            RoomBlueprint::with_doors("hub", "stone", &[East]),
            vec![RoomBlueprint::with_doors("hall", "stone", &[West, East])],
        );
        let config = GeneratorConfig::default()
            .with_min_rooms(5)
            .with_max_rooms(Some(5));

        // hub and four halls fill the cap with a door still open
        assert_eq!(
            solve(&catalog, &config),
            Err(SolveError::NoLayout { iterations: 5 })
        );
    }

    #[test]
    fn test_backtracks_past_short_branch() {
        let catalog = Catalog::new(
            RoomBlueprint::with_doors("hub", "stone", &[East]),
            vec![
                cap("cap_w", West),
                RoomBlueprint::with_doors("hall", "stone", &[West, East]),
            ],
        );
        let config = GeneratorConfig::default().with_min_rooms(3);

        let plan = solve(&catalog, &config).unwrap();

        // cap fails at 2 rooms, hall then cap succeeds at 3
        assert_eq!(plan.iterations, 4);
        let names: Vec<_> = plan
            .rooms()
            .map(|r| catalog[r.blueprint].name.as_str())
            .collect();
        assert_eq!(names, vec!["hub", "hall", "cap_w"]);
    }
}
