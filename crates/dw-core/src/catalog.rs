//! Room blueprints and the catalog they are drawn from
//!
//! A blueprint is pure data: a name and an ordered list of door sockets.
//! Nothing here knows how a room is drawn; that belongs to the front end.
//!
//! Catalogs are usually loaded from JSON:
//!
//! ```json
//! {
//!   "start": { "name": "entrance", "sockets": [{ "direction": "north", "signature": "stone" }] },
//!   "rooms": [{ "name": "closet", "sockets": [{ "direction": "south", "signature": "stone" }] }]
//! }
//! ```

use std::path::Path;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Direction;
use crate::rng::DungeonRng;

/// Catalog shipped with the crate
const DEFAULT_CATALOG: &str = include_str!("../data/default_catalog.json");

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog has no room blueprints")]
    Empty,

    #[error("Duplicate blueprint name: {0}")]
    DuplicateName(String),
}

/// Compatibility tag carried by a door socket
///
/// Two doors can only be joined when their signatures are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Signature {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// A door on one side of a blueprint
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DoorSocket {
    pub direction: Direction,
    pub signature: Signature,
}

impl DoorSocket {
    pub fn new(direction: Direction, signature: impl Into<Signature>) -> Self {
        Self {
            direction,
            signature: signature.into(),
        }
    }

    /// Check if this socket can be joined to `other` on a neighbouring room
    ///
    /// Symmetric: the sockets must face each other and carry the same signature.
    pub fn matches(&self, other: &DoorSocket) -> bool {
        self.direction.opposite() == other.direction && self.signature == other.signature
    }
}

/// An immutable room template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomBlueprint {
    pub name: String,
    /// Floor glyph used by text front ends
    #[serde(default = "default_glyph")]
    pub glyph: char,
    #[serde(default)]
    pub sockets: Vec<DoorSocket>,
}

fn default_glyph() -> char {
    '.'
}

impl RoomBlueprint {
    pub fn new(name: impl Into<String>, sockets: Vec<DoorSocket>) -> Self {
        Self {
            name: name.into(),
            glyph: default_glyph(),
            sockets,
        }
    }

    /// Shorthand for a blueprint whose sockets all share one signature
    pub fn with_doors(name: impl Into<String>, signature: &str, doors: &[Direction]) -> Self {
        let sockets = doors
            .iter()
            .map(|&dir| DoorSocket::new(dir, signature))
            .collect();
        Self::new(name, sockets)
    }

    /// Check if any socket faces `dir`
    pub fn has_socket_facing(&self, dir: Direction) -> bool {
        self.sockets.iter().any(|s| s.direction == dir)
    }
}

/// Identifies a blueprint without borrowing the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlueprintId {
    /// The start room, always at the origin
    Start,
    /// Index into the catalog's room list
    Catalog(usize),
}

/// One socket of one blueprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SocketRef {
    pub room: BlueprintId,
    pub socket: usize,
}

impl SocketRef {
    pub const fn new(room: BlueprintId, socket: usize) -> Self {
        Self { room, socket }
    }
}

/// The start room plus the ordered list of placeable blueprints
///
/// Order is significant: the solver tries blueprints front to back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    start: RoomBlueprint,
    rooms: Vec<RoomBlueprint>,
}

impl Catalog {
    pub fn new(start: RoomBlueprint, rooms: Vec<RoomBlueprint>) -> Self {
        Self { start, rooms }
    }

    /// The catalog bundled with the crate
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(DEFAULT_CATALOG)
    }

    /// Parse and validate a JSON catalog
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a JSON catalog from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.rooms.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut names = HashSet::new();
        for blueprint in std::iter::once(&self.start).chain(&self.rooms) {
            if !names.insert(blueprint.name.as_str()) {
                return Err(CatalogError::DuplicateName(blueprint.name.clone()));
            }
        }
        Ok(())
    }

    pub fn start(&self) -> &RoomBlueprint {
        &self.start
    }

    pub fn rooms(&self) -> &[RoomBlueprint] {
        &self.rooms
    }

    /// Number of placeable blueprints (the start room is not counted)
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn get(&self, id: BlueprintId) -> Option<&RoomBlueprint> {
        match id {
            BlueprintId::Start => Some(&self.start),
            BlueprintId::Catalog(index) => self.rooms.get(index),
        }
    }

    pub fn socket(&self, socket: SocketRef) -> Option<&DoorSocket> {
        self.get(socket.room)?.sockets.get(socket.socket)
    }

    /// Look up a blueprint by name
    pub fn find(&self, name: &str) -> Option<BlueprintId> {
        if self.start.name == name {
            return Some(BlueprintId::Start);
        }
        self.rooms
            .iter()
            .position(|b| b.name == name)
            .map(BlueprintId::Catalog)
    }

    /// Copy of this catalog with the room order permuted by `rng`
    ///
    /// The start room is unaffected.
    pub fn shuffled(&self, rng: &mut DungeonRng) -> Catalog {
        let mut rooms = self.rooms.clone();
        rng.shuffle(&mut rooms);
        Catalog {
            start: self.start.clone(),
            rooms,
        }
    }
}

impl core::ops::Index<BlueprintId> for Catalog {
    type Output = RoomBlueprint;

    fn index(&self, id: BlueprintId) -> &RoomBlueprint {
        match id {
            BlueprintId::Start => &self.start,
            BlueprintId::Catalog(index) => &self.rooms[index],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::*;

    #[test]
    fn test_socket_matching_is_symmetric() {
        let east = DoorSocket::new(East, "stone");
        let west = DoorSocket::new(West, "stone");
        let west_iron = DoorSocket::new(West, "iron");
        let north = DoorSocket::new(North, "stone");

        assert!(east.matches(&west));
        assert!(west.matches(&east));
        assert!(!east.matches(&west_iron));
        assert!(!west_iron.matches(&east));
        assert!(!east.matches(&north));
        assert!(!east.matches(&east));
    }

    #[test]
    fn test_has_socket_facing() {
        let bend = RoomBlueprint::with_doors("bend", "stone", &[South, East]);
        assert!(bend.has_socket_facing(South));
        assert!(bend.has_socket_facing(East));
        assert!(!bend.has_socket_facing(North));
        assert!(!bend.has_socket_facing(West));
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().expect("bundled catalog is valid");
        assert!(!catalog.is_empty());
        assert_eq!(catalog.start().name, "entrance");
        assert_eq!(catalog.find("closet_s"), Some(BlueprintId::Catalog(0)));
        assert_eq!(catalog.find("entrance"), Some(BlueprintId::Start));

        let vault = catalog.find("vault").and_then(|id| catalog.get(id)).unwrap();
        assert_eq!(vault.sockets[0].signature.as_str(), "iron");
    }

    #[test]
    fn test_from_json_defaults() {
        let json = r#"{
            "start": { "name": "hub" },
            "rooms": [{ "name": "cap", "sockets": [{ "direction": "west", "signature": "stone" }] }]
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert!(catalog.start().sockets.is_empty());
        assert_eq!(catalog.start().glyph, '.');
        assert_eq!(catalog.rooms()[0].sockets[0], DoorSocket::new(West, "stone"));
    }

    #[test]
    fn test_from_json_rejects_empty() {
        let json = r#"{ "start": { "name": "hub" }, "rooms": [] }"#;
        assert!(matches!(Catalog::from_json(json), Err(CatalogError::Empty)));
    }

    #[test]
    fn test_from_json_rejects_duplicates() {
        let json = r#"{
            "start": { "name": "hub" },
            "rooms": [{ "name": "hub" }]
        }"#;
        match Catalog::from_json(json) {
            Err(CatalogError::DuplicateName(name)) => assert_eq!(name, "hub"),
            other => panic!("expected duplicate name error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_json_rejects_bad_direction() {
        let json = r#"{
            "start": { "name": "hub" },
            "rooms": [{ "name": "cap", "sockets": [{ "direction": "up", "signature": "stone" }] }]
        }"#;
        assert!(matches!(Catalog::from_json(json), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_shuffled_keeps_contents() {
        let catalog = Catalog::builtin().unwrap();
        let mut rng = DungeonRng::new(7);
        let shuffled = catalog.shuffled(&mut rng);

        assert_eq!(shuffled.start(), catalog.start());
        assert_eq!(shuffled.len(), catalog.len());
        for room in catalog.rooms() {
            assert!(shuffled.find(&room.name).is_some());
        }

        let again = catalog.shuffled(&mut DungeonRng::new(7));
        assert_eq!(shuffled, again, "same seed gives same order");
    }
}
