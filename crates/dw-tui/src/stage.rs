//! Materializing plans into tiles
//!
//! The solver only hands back a plan. A `Stage` is what turns that plan
//! into world objects; `TileStage` lays them out as characters, one grid
//! cell per `cell_size` x `cell_size` block of tiles.

use std::collections::HashMap;

use dw_core::{Connector, Direction, Generation, GridPos, Orientation, PlanEntry, RoomBlueprint};

/// Default tiles per grid cell along each axis
pub const DEFAULT_CELL_SIZE: i32 = 6;

/// Smallest cell that still leaves a floor tile inside the walls
pub const MIN_CELL_SIZE: i32 = 4;

/// Receives the world objects of one generation
pub trait Stage {
    /// Dispose of everything placed by the previous generation
    fn clear(&mut self);

    fn place_room(&mut self, blueprint: &RoomBlueprint, pos: GridPos);

    fn place_hallway(&mut self, connector: &Connector);
}

/// Apply a generation to `stage`, replacing whatever it held
///
/// The start room goes down first, then the plan in order.
pub fn materialize<S: Stage + ?Sized>(stage: &mut S, generation: &Generation) {
    stage.clear();

    let plan = &generation.plan;
    stage.place_room(generation.catalog.start(), plan.start.pos);
    for entry in &plan.entries {
        match entry {
            PlanEntry::Room(room) => stage.place_room(&generation.catalog[room.blueprint], room.pos),
            PlanEntry::Connector(connector) => stage.place_hallway(connector),
        }
    }
}

/// A single map tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tile {
    #[default]
    Empty,
    Wall,
    Floor(char),
    Door,
    Hallway(Orientation),
}

impl Tile {
    pub const fn symbol(&self) -> char {
        match self {
            Tile::Empty => ' ',
            Tile::Wall => '#',
            Tile::Floor(glyph) => *glyph,
            Tile::Door => '+',
            Tile::Hallway(Orientation::Horizontal) => '=',
            Tile::Hallway(Orientation::Vertical) => '"',
        }
    }
}

/// Character-grid stage
///
/// World coordinates grow east and north like grid positions. Each room is
/// a walled square `cell_size - 1` tiles wide; the last row and column of
/// every cell is left empty for hallways.
#[derive(Debug, Clone)]
pub struct TileStage {
    cell_size: i32,
    tiles: HashMap<(i32, i32), Tile>,
    rooms: usize,
    hallways: usize,
}

impl Default for TileStage {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

impl TileStage {
    /// `cell_size` is raised to `MIN_CELL_SIZE` if smaller
    pub fn new(cell_size: i32) -> Self {
        Self {
            cell_size: cell_size.max(MIN_CELL_SIZE),
            tiles: HashMap::new(),
            rooms: 0,
            hallways: 0,
        }
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Rooms currently placed
    pub fn room_count(&self) -> usize {
        self.rooms
    }

    /// Hallways currently placed
    pub fn hallway_count(&self) -> usize {
        self.hallways
    }

    pub fn tile(&self, x: i32, y: i32) -> Tile {
        self.tiles.get(&(x, y)).copied().unwrap_or_default()
    }

    /// Lower-left tile of the room at `pos`
    pub fn room_origin(&self, pos: GridPos) -> (i32, i32) {
        (pos.x * self.cell_size, pos.y * self.cell_size)
    }

    /// Offset of a door along its wall
    fn mid(&self) -> i32 {
        (self.cell_size - 2) / 2
    }

    /// Tile of the door on the `dir` side of the room at `pos`
    pub fn door_tile(&self, pos: GridPos, dir: Direction) -> (i32, i32) {
        let (x0, y0) = self.room_origin(pos);
        let far = self.cell_size - 2;
        let mid = self.mid();
        match dir {
            Direction::North => (x0 + mid, y0 + far),
            Direction::South => (x0 + mid, y0),
            Direction::East => (x0 + far, y0 + mid),
            Direction::West => (x0, y0 + mid),
        }
    }

    /// Inclusive (min, max) corners of everything placed
    pub fn bounds(&self) -> Option<((i32, i32), (i32, i32))> {
        let mut keys = self.tiles.keys();
        let &(x, y) = keys.next()?;
        Some(keys.fold(((x, y), (x, y)), |((lx, ly), (hx, hy)), &(x, y)| {
            ((lx.min(x), ly.min(y)), (hx.max(x), hy.max(y)))
        }))
    }

    /// Text rows, northmost first
    pub fn rows(&self) -> Vec<String> {
        let Some(((lx, ly), (hx, hy))) = self.bounds() else {
            return Vec::new();
        };
        (ly..=hy)
            .rev()
            .map(|y| {
                let row: String = (lx..=hx).map(|x| self.tile(x, y).symbol()).collect();
                row.trim_end().to_string()
            })
            .collect()
    }
}

impl Stage for TileStage {
    fn clear(&mut self) {
        self.tiles.clear();
        self.rooms = 0;
        self.hallways = 0;
    }

    fn place_room(&mut self, blueprint: &RoomBlueprint, pos: GridPos) {
        let (x0, y0) = self.room_origin(pos);
        let far = self.cell_size - 2;
        for dx in 0..=far {
            for dy in 0..=far {
                let edge = dx == 0 || dy == 0 || dx == far || dy == far;
                let tile = if edge {
                    Tile::Wall
                } else {
                    Tile::Floor(blueprint.glyph)
                };
                self.tiles.insert((x0 + dx, y0 + dy), tile);
            }
        }
        self.rooms += 1;
    }

    fn place_hallway(&mut self, connector: &Connector) {
        let from = self.door_tile(connector.door_pos, connector.direction);
        let to = self.door_tile(connector.partner_pos, connector.direction.opposite());
        self.tiles.insert(from, Tile::Door);
        self.tiles.insert(to, Tile::Door);

        // The gap tile sits one step past the first door
        let (dx, dy) = connector.direction.offset();
        self.tiles
            .insert((from.0 + dx, from.1 + dy), Tile::Hallway(connector.orientation));
        self.hallways += 1;
    }
}
