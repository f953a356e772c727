//! Adventure world types: rooms, items, and mutable session state.
//!
//! A map is a registry of rooms and item templates plus a handful of
//! special rules (torch pair, winning use, treasure, turn limit). Item
//! templates are immutable; the only mutable aspect of an item is *where*
//! it currently is — in some room's item list or in the inventory.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Directions
// ============================================================================

/// The four exit directions a room can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub fn all() -> [Direction; 4] {
        [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "north" => Ok(Direction::North),
            "south" => Ok(Direction::South),
            "east" => Ok(Direction::East),
            "west" => Ok(Direction::West),
            _ => Err(()),
        }
    }
}

// ============================================================================
// Rooms and items
// ============================================================================

/// A scripted response to examining something in a room.
///
/// Item effects apply to the *room's* item list and are idempotent: adding
/// an id the room already holds, or removing one it doesn't, is a no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub text: String,
    #[serde(default)]
    pub add_items: Vec<String>,
    #[serde(default)]
    pub remove_items: Vec<String>,
}

impl Interaction {
    /// A purely descriptive interaction.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            add_items: Vec::new(),
            remove_items: Vec::new(),
        }
    }

    /// Reveal an item in the room when this interaction fires.
    pub fn reveals(mut self, item_id: impl Into<String>) -> Self {
        self.add_items.push(item_id.into());
        self
    }

    /// Remove an item from the room when this interaction fires.
    pub fn consumes(mut self, item_id: impl Into<String>) -> Self {
        self.remove_items.push(item_id.into());
        self
    }
}

/// A room in the adventure map.
///
/// Rooms are created once at map construction and never destroyed during a
/// session; the item list is the mutable part. Exits may be asymmetric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub exits: HashMap<Direction, String>,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub interactions: HashMap<String, Interaction>,
    #[serde(default)]
    pub dark: bool,
}

impl Room {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            exits: HashMap::new(),
            items: Vec::new(),
            interactions: HashMap::new(),
            dark: false,
        }
    }

    pub fn exit(mut self, direction: Direction, to: impl Into<String>) -> Self {
        self.exits.insert(direction, to.into());
        self
    }

    pub fn item(mut self, item_id: impl Into<String>) -> Self {
        self.items.push(item_id.into());
        self
    }

    pub fn interaction(mut self, key: impl Into<String>, interaction: Interaction) -> Self {
        self.interactions.insert(key.into(), interaction);
        self
    }

    /// Mark the room as dark: items are hidden from examine/take unless
    /// the player carries a lit light source.
    pub fn dark(mut self) -> Self {
        self.dark = true;
        self
    }

    /// Add an item id to the room, idempotently.
    pub fn add_item(&mut self, item_id: &str) {
        if !self.items.iter().any(|i| i == item_id) {
            self.items.push(item_id.to_string());
        }
    }

    /// Remove an item id from the room, idempotently.
    pub fn remove_item(&mut self, item_id: &str) {
        self.items.retain(|i| i != item_id);
    }
}

/// An immutable item template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub takeable: bool,
    /// Target ids this item can be meaningfully used with. A use on one of
    /// these (without a scripted outcome) reads "nothing happens"; a use on
    /// anything else reads "can't use it on that".
    #[serde(default)]
    pub usable_with: Vec<String>,
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            takeable: false,
            usable_with: Vec::new(),
        }
    }

    pub fn takeable(mut self) -> Self {
        self.takeable = true;
        self
    }

    pub fn usable_with(mut self, target: impl Into<String>) -> Self {
        self.usable_with.push(target.into());
        self
    }
}

// ============================================================================
// Special rules
// ============================================================================

/// Torch pair: using the unlit item (no target) replaces it in the
/// inventory with the lit one. One-way, one-time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TorchRule {
    pub unlit: String,
    pub lit: String,
}

/// The winning use: `item` on `target` while standing in `room`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinUse {
    pub item: String,
    pub target: String,
    pub room: String,
    pub feedback: String,
}

/// Map-level rules the resolver consults every step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialRules {
    #[serde(default)]
    pub torch: Option<TorchRule>,
    #[serde(default)]
    pub win_use: Option<WinUse>,
    /// Holding this item wins the game at the end of any step.
    #[serde(default)]
    pub treasure: Option<String>,
    /// Loss once the turn counter reaches this value.
    pub turn_limit: u32,
}

impl Default for SpecialRules {
    fn default() -> Self {
        Self {
            torch: None,
            win_use: None,
            treasure: None,
            turn_limit: 20,
        }
    }
}

// ============================================================================
// Map
// ============================================================================

/// Errors from building an adventure map.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("Start room '{0}' is not defined")]
    UnknownStartRoom(String),

    #[error("Room '{room}' exits {direction} to undefined room '{to}'")]
    UnknownExit {
        room: String,
        direction: Direction,
        to: String,
    },

    #[error("'{owner}' references undefined item '{item}'")]
    UnknownItem { owner: String, item: String },
}

/// A complete room/item dataset plus its special rules.
///
/// One adventure engine runs any map; the original's subclassed game
/// variants become plain data here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdventureMap {
    pub rooms: HashMap<String, Room>,
    pub items: HashMap<String, Item>,
    pub start_room: String,
    pub rules: SpecialRules,
}

impl AdventureMap {
    pub fn builder(start_room: impl Into<String>) -> MapBuilder {
        MapBuilder {
            rooms: Vec::new(),
            items: Vec::new(),
            start_room: start_room.into(),
            rules: SpecialRules::default(),
        }
    }

    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }
}

/// Builder validating the map's internal references.
pub struct MapBuilder {
    rooms: Vec<Room>,
    items: Vec<Item>,
    start_room: String,
    rules: SpecialRules,
}

impl MapBuilder {
    pub fn room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    pub fn item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    pub fn torch(mut self, unlit: impl Into<String>, lit: impl Into<String>) -> Self {
        self.rules.torch = Some(TorchRule {
            unlit: unlit.into(),
            lit: lit.into(),
        });
        self
    }

    pub fn win_use(
        mut self,
        item: impl Into<String>,
        target: impl Into<String>,
        room: impl Into<String>,
        feedback: impl Into<String>,
    ) -> Self {
        self.rules.win_use = Some(WinUse {
            item: item.into(),
            target: target.into(),
            room: room.into(),
            feedback: feedback.into(),
        });
        self
    }

    pub fn treasure(mut self, item_id: impl Into<String>) -> Self {
        self.rules.treasure = Some(item_id.into());
        self
    }

    pub fn turn_limit(mut self, limit: u32) -> Self {
        self.rules.turn_limit = limit;
        self
    }

    /// Validate every cross-reference and assemble the map.
    pub fn build(self) -> Result<AdventureMap, MapError> {
        let rooms: HashMap<String, Room> =
            self.rooms.into_iter().map(|r| (r.id.clone(), r)).collect();
        let items: HashMap<String, Item> =
            self.items.into_iter().map(|i| (i.id.clone(), i)).collect();

        if !rooms.contains_key(&self.start_room) {
            return Err(MapError::UnknownStartRoom(self.start_room));
        }

        for room in rooms.values() {
            for (&direction, to) in &room.exits {
                if !rooms.contains_key(to) {
                    return Err(MapError::UnknownExit {
                        room: room.id.clone(),
                        direction,
                        to: to.clone(),
                    });
                }
            }
            for item_id in &room.items {
                if !items.contains_key(item_id) {
                    return Err(MapError::UnknownItem {
                        owner: room.id.clone(),
                        item: item_id.clone(),
                    });
                }
            }
            for interaction in room.interactions.values() {
                for item_id in interaction.add_items.iter().chain(&interaction.remove_items) {
                    if !items.contains_key(item_id) {
                        return Err(MapError::UnknownItem {
                            owner: room.id.clone(),
                            item: item_id.clone(),
                        });
                    }
                }
            }
        }

        if let Some(torch) = &self.rules.torch {
            for id in [&torch.unlit, &torch.lit] {
                if !items.contains_key(id) {
                    return Err(MapError::UnknownItem {
                        owner: "torch rule".to_string(),
                        item: id.clone(),
                    });
                }
            }
        }
        if let Some(treasure) = &self.rules.treasure {
            if !items.contains_key(treasure) {
                return Err(MapError::UnknownItem {
                    owner: "treasure rule".to_string(),
                    item: treasure.clone(),
                });
            }
        }

        Ok(AdventureMap {
            rooms,
            items,
            start_room: self.start_room,
            rules: self.rules,
        })
    }
}

// ============================================================================
// Session state
// ============================================================================

/// Mutable adventure state, owned by one session and touched only by the
/// resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdventureState {
    pub current_room: String,
    /// Ordered by pickup; never holds duplicates.
    pub inventory: Vec<String>,
    pub visited: HashSet<String>,
    pub turns: u32,
    pub game_over: bool,
    pub win: bool,
    pub last_narrative: String,
}

impl AdventureState {
    pub fn new(map: &AdventureMap) -> Self {
        let mut visited = HashSet::new();
        visited.insert(map.start_room.clone());
        Self {
            current_room: map.start_room.clone(),
            inventory: Vec::new(),
            visited,
            turns: 0,
            game_over: false,
            win: false,
            last_narrative: String::new(),
        }
    }

    pub fn holds(&self, item_id: &str) -> bool {
        self.inventory.iter().any(|i| i == item_id)
    }

    /// Append an item to the inventory, preserving pickup order and the
    /// no-duplicates invariant.
    pub fn add_to_inventory(&mut self, item_id: &str) {
        if !self.holds(item_id) {
            self.inventory.push(item_id.to_string());
        }
    }

    pub fn remove_from_inventory(&mut self, item_id: &str) {
        self.inventory.retain(|i| i != item_id);
    }
}

// ============================================================================
// Reference resolution
// ============================================================================

/// Resolve a player-supplied reference against candidate (id, display name)
/// pairs: exact id, then case-insensitive name, then case-insensitive id.
///
/// This is the single fuzzy-match path shared by examine, take, and use.
pub fn resolve_reference<'a, I>(input: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut ci_name = None;
    let mut ci_id = None;

    for (id, name) in candidates {
        if id == input {
            return Some(id.to_string());
        }
        if ci_name.is_none() && name.eq_ignore_ascii_case(input) {
            ci_name = Some(id.to_string());
        }
        if ci_id.is_none() && id.eq_ignore_ascii_case(input) {
            ci_id = Some(id.to_string());
        }
    }

    ci_name.or(ci_id)
}
