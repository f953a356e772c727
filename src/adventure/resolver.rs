//! The adventure action resolver and its session wrapper.
//!
//! One `step` applies a single validated action to the world, produces
//! feedback text, and then runs the end-of-step checks. The win check runs
//! before the turn-limit check, so picking up the treasure on the final
//! turn still wins.

use crate::adventure::world::{
    resolve_reference, AdventureMap, AdventureState, Direction, Room,
};
use crate::schema::AdventureActions;
use crate::session::{
    optional_str, required_str, EngineError, GameResult, GameSession, Phase, StepOutcome,
};
use serde_json::{json, Value};

/// A running adventure game: a map, its mutable state, and the lifecycle
/// phase.
#[derive(Debug)]
pub struct AdventureSession {
    map: AdventureMap,
    state: AdventureState,
    phase: Phase,
}

impl AdventureSession {
    /// Create a fresh session on the given map.
    pub fn new(map: AdventureMap) -> Self {
        let state = AdventureState::new(&map);
        Self {
            map,
            state,
            phase: Phase::Uninitialized,
        }
    }

    /// Rebuild a mid-game session, e.g. from a save file. The session
    /// resumes in the Ready phase (or Terminal, if the save was already
    /// finished) and plays on identically to the in-memory original.
    pub fn resume(map: AdventureMap, state: AdventureState) -> Self {
        let phase = if state.game_over {
            Phase::Terminal
        } else {
            Phase::Ready
        };
        Self { map, state, phase }
    }

    pub fn state(&self) -> &AdventureState {
        &self.state
    }

    pub fn map(&self) -> &AdventureMap {
        &self.map
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the player can currently see items in a dark room.
    ///
    /// Evaluated from the inventory on every call, never cached: dropping
    /// the light source re-darkens the room.
    fn has_light(&self) -> bool {
        self.map
            .rules
            .torch
            .as_ref()
            .map(|t| self.state.holds(&t.lit))
            .unwrap_or(false)
    }

    fn current_room(&self) -> Result<&Room, EngineError> {
        self.map
            .room(&self.state.current_room)
            .ok_or_else(|| EngineError::UnknownRoom(self.state.current_room.clone()))
    }

    fn current_room_mut(&mut self) -> Result<&mut Room, EngineError> {
        let id = self.state.current_room.clone();
        self.map
            .rooms
            .get_mut(&id)
            .ok_or(EngineError::UnknownRoom(id))
    }

    /// The room-scan text: name, description, exits, and visible items.
    fn describe_room(&self) -> Result<String, EngineError> {
        let room = self.current_room()?;
        let mut text = format!("{}\n{}", room.name, room.description);

        let mut exits: Vec<&str> = room.exits.keys().map(|d| d.name()).collect();
        exits.sort_unstable();
        if exits.is_empty() {
            text.push_str("\nThere are no exits.");
        } else {
            text.push_str(&format!("\nExits: {}.", exits.join(", ")));
        }

        if room.dark && !self.has_light() {
            text.push_str("\nIt is pitch dark; you can make out nothing but the exits.");
        } else if !room.items.is_empty() {
            let names: Vec<&str> = room
                .items
                .iter()
                .filter_map(|id| self.map.item(id).map(|i| i.name.as_str()))
                .collect();
            text.push_str(&format!("\nYou see: {}.", names.join(", ")));
        }

        Ok(text)
    }

    // ------------------------------------------------------------------
    // Verbs
    // ------------------------------------------------------------------

    fn do_move(&mut self, args: &Value) -> Result<String, EngineError> {
        let raw = required_str("move", args, "direction")?;
        let direction: Direction =
            raw.parse().map_err(|_| EngineError::MalformedArgs {
                action: "move".to_string(),
                detail: format!("'{raw}' is not a direction"),
            })?;

        let room = self.current_room()?;
        match room.exits.get(&direction) {
            Some(to) => {
                let to = to.clone();
                if !self.map.rooms.contains_key(&to) {
                    return Err(EngineError::UnknownRoom(to));
                }
                self.state.current_room = to.clone();
                self.state.visited.insert(to);
                self.describe_room()
            }
            None => Ok(format!("You can't go {direction} from here.")),
        }
    }

    fn do_examine(&mut self, args: &Value) -> Result<String, EngineError> {
        let target = required_str("examine", args, "target")?.to_string();

        // 1-2: interaction keys, exact first, then case-insensitive.
        let room = self.current_room()?;
        let key = if room.interactions.contains_key(&target) {
            Some(target.clone())
        } else {
            room.interactions
                .keys()
                .find(|k| k.eq_ignore_ascii_case(&target))
                .cloned()
        };
        if let Some(key) = key {
            let room = self.current_room_mut()?;
            let interaction = room.interactions[&key].clone();
            for id in &interaction.add_items {
                room.add_item(id);
            }
            for id in &interaction.remove_items {
                room.remove_item(id);
            }
            return Ok(interaction.text);
        }

        // 3: inventory items.
        let inventory_candidates: Vec<(&str, &str)> = self
            .state
            .inventory
            .iter()
            .filter_map(|id| self.map.item(id).map(|i| (i.id.as_str(), i.name.as_str())))
            .collect();
        if let Some(id) = resolve_reference(&target, inventory_candidates) {
            if let Some(item) = self.map.item(&id) {
                return Ok(item.description.clone());
            }
        }

        // 4: items lying in the room, darkness permitting.
        let room = self.current_room()?;
        if room.dark && !self.has_light() {
            return Ok("It's too dark to make that out.".to_string());
        }
        let room_candidates: Vec<(&str, &str)> = room
            .items
            .iter()
            .filter_map(|id| self.map.item(id).map(|i| (i.id.as_str(), i.name.as_str())))
            .collect();
        if let Some(id) = resolve_reference(&target, room_candidates) {
            if let Some(item) = self.map.item(&id) {
                return Ok(item.description.clone());
            }
        }

        Ok(format!("You see nothing special about '{target}'."))
    }

    fn do_take(&mut self, args: &Value) -> Result<String, EngineError> {
        let wanted = required_str("take", args, "item")?.to_string();

        let inventory_candidates: Vec<(&str, &str)> = self
            .state
            .inventory
            .iter()
            .filter_map(|id| self.map.item(id).map(|i| (i.id.as_str(), i.name.as_str())))
            .collect();
        if resolve_reference(&wanted, inventory_candidates).is_some() {
            return Ok("You already have it.".to_string());
        }

        let room = self.current_room()?;
        if room.dark && !self.has_light() {
            return Ok("It's too dark to find anything here.".to_string());
        }

        let room_candidates: Vec<(&str, &str)> = room
            .items
            .iter()
            .filter_map(|id| self.map.item(id).map(|i| (i.id.as_str(), i.name.as_str())))
            .collect();
        let Some(id) = resolve_reference(&wanted, room_candidates) else {
            return Ok(format!("There is no '{wanted}' here."));
        };

        let item = self
            .map
            .item(&id)
            .ok_or_else(|| EngineError::UnknownItem(id.clone()))?;
        if !item.takeable {
            return Ok(format!("The {} isn't something you can carry.", item.name));
        }
        let name = item.name.clone();

        self.current_room_mut()?.remove_item(&id);
        self.state.add_to_inventory(&id);
        Ok(format!("You take the {name}."))
    }

    fn do_use(&mut self, args: &Value) -> Result<String, EngineError> {
        let wanted = required_str("use", args, "item")?.to_string();
        let target = optional_str("use", args, "target")?.map(str::to_string);

        let inventory_candidates: Vec<(&str, &str)> = self
            .state
            .inventory
            .iter()
            .filter_map(|id| self.map.item(id).map(|i| (i.id.as_str(), i.name.as_str())))
            .collect();
        let mut resolved = resolve_reference(&wanted, inventory_candidates);

        // "use torch" after lighting it: the unlit id is gone from the
        // inventory, but the player means the torch they carry.
        if resolved.is_none() {
            if let Some(torch) = &self.map.rules.torch {
                if self.state.holds(&torch.lit) {
                    if let Some(unlit) = self.map.item(&torch.unlit) {
                        let refers_to_torch = resolve_reference(
                            &wanted,
                            [(unlit.id.as_str(), unlit.name.as_str())],
                        )
                        .is_some();
                        if refers_to_torch {
                            resolved = Some(torch.lit.clone());
                        }
                    }
                }
            }
        }

        let Some(item_id) = resolved else {
            return Ok(format!("You don't have '{wanted}'."));
        };

        // Torch: lighting it is a one-way, in-place transformation; the lit
        // torch then grants visibility in dark rooms.
        if let Some(torch) = self.map.rules.torch.clone() {
            let on_darkness = target
                .as_deref()
                .map(|t| t.eq_ignore_ascii_case("darkness"))
                .unwrap_or(false);

            if item_id == torch.unlit && (target.is_none() || on_darkness) {
                self.state.remove_from_inventory(&torch.unlit);
                self.state.add_to_inventory(&torch.lit);
                return Ok("You strike the torch alight. Its flame steadies.".to_string());
            }
            if item_id == torch.lit && (target.is_none() || on_darkness) {
                let room = self.current_room()?;
                if room.dark || on_darkness {
                    return Ok(
                        "You raise the torch and the darkness falls back around you.".to_string()
                    );
                }
                return Ok("The torch is already lit.".to_string());
            }
        }

        // The winning use: the right item, on the right target, in the
        // right room.
        if let Some(win) = self.map.rules.win_use.clone() {
            let on_target = target
                .as_deref()
                .map(|t| t.eq_ignore_ascii_case(&win.target))
                .unwrap_or(false);
            if item_id == win.item && on_target && self.state.current_room == win.room {
                self.state.win = true;
                self.state.game_over = true;
                return Ok(win.feedback);
            }
        }

        let item = self
            .map
            .item(&item_id)
            .ok_or_else(|| EngineError::UnknownItem(item_id.clone()))?;

        let Some(target) = target else {
            return Ok(format!("Nothing obvious happens with the {}.", item.name));
        };

        let declared = item
            .usable_with
            .iter()
            .any(|t| t.eq_ignore_ascii_case(&target));
        if declared {
            Ok("You try, but nothing happens.".to_string())
        } else {
            Ok(format!("You can't use the {} on that.", item.name))
        }
    }

    fn do_inventory(&self) -> String {
        if self.state.inventory.is_empty() {
            return "You are carrying nothing.".to_string();
        }
        let names: Vec<&str> = self
            .state
            .inventory
            .iter()
            .filter_map(|id| self.map.item(id).map(|i| i.name.as_str()))
            .collect();
        format!("You are carrying: {}.", names.join(", "))
    }

    fn do_help(&self) -> String {
        let mut text = String::from("You can:");
        for action in AdventureActions::all() {
            text.push_str(&format!("\n  {} - {}", action.name, action.description));
        }
        text
    }

    // ------------------------------------------------------------------
    // End-of-step checks
    // ------------------------------------------------------------------

    /// Run after every action, deliberate or not. Win is evaluated before
    /// the turn-limit loss.
    fn check_end(&mut self) {
        if self.state.game_over {
            return;
        }
        if let Some(treasure) = &self.map.rules.treasure {
            if self.state.holds(treasure) {
                self.state.win = true;
                self.state.game_over = true;
                return;
            }
        }
        if self.state.turns >= self.map.rules.turn_limit {
            self.state.game_over = true;
        }
    }

    fn finish(&self, narrative: String) -> GameResult {
        let closing = if self.state.win {
            "You win!"
        } else {
            "Your time runs out. The adventure ends in failure."
        };

        let mut visited: Vec<&str> = self.state.visited.iter().map(String::as_str).collect();
        visited.sort_unstable();

        GameResult {
            description: format!("{narrative}\n{closing}"),
            metadata: json!({
                "win": self.state.win,
                "turns": self.state.turns,
                "visited_rooms": visited,
                "inventory": self.state.inventory,
            }),
        }
    }
}

impl GameSession for AdventureSession {
    fn start(&mut self) -> Result<StepOutcome, EngineError> {
        match self.phase {
            Phase::Uninitialized => {}
            Phase::Ready => return Err(EngineError::AlreadyStarted),
            Phase::Terminal => return Err(EngineError::SessionEnded),
        }
        self.phase = Phase::Ready;

        let narrative = self.describe_room()?;
        self.state.last_narrative = narrative.clone();
        Ok(StepOutcome::Continue {
            narrative,
            actions: AdventureActions::all(),
        })
    }

    fn step(&mut self, action: &str, args: &Value) -> Result<StepOutcome, EngineError> {
        match self.phase {
            Phase::Uninitialized => return Err(EngineError::NotStarted),
            Phase::Terminal => return Err(EngineError::SessionEnded),
            Phase::Ready => {}
        }

        // Every step consumes a turn, including ones the game doesn't
        // understand: the limit models elapsed time.
        self.state.turns += 1;

        let narrative = match action {
            "move" => self.do_move(args)?,
            "look" => self.describe_room()?,
            "examine" => self.do_examine(args)?,
            "take" => self.do_take(args)?,
            "use" => self.do_use(args)?,
            "inventory" => self.do_inventory(),
            "help" => self.do_help(),
            other => format!("You don't know how to '{other}'. Try 'help'."),
        };

        self.check_end();
        self.state.last_narrative = narrative.clone();

        if self.state.game_over {
            self.phase = Phase::Terminal;
            return Ok(StepOutcome::Ended {
                result: self.finish(narrative),
            });
        }

        Ok(StepOutcome::Continue {
            narrative,
            actions: AdventureActions::all(),
        })
    }

    fn cleanup(&mut self) {
        // Nothing held beyond in-memory state. Safe to call repeatedly.
    }
}
