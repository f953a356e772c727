//! Action schemas for the game simulations.
//!
//! Each game publishes a static, read-only table of the actions it accepts
//! and the shape of their arguments. Player adapters use these descriptors
//! to constrain input, and an LLM tool-calling bridge can hand them to a
//! model API unchanged (the descriptor shape matches a tool definition:
//! name, description, JSON schema).

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// A declared action: its name and the JSON schema of its arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionSchema {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ActionSchema {
    fn new(name: &str, description: &str, input_schema: Value) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

/// Errors from validating action arguments against a schema.
#[derive(Debug, Error)]
pub enum ArgError {
    #[error("Missing required field '{field}' for action '{action}'")]
    MissingField { action: String, field: String },

    #[error("Field '{field}' of action '{action}' must be a {expected}")]
    WrongType {
        action: String,
        field: String,
        expected: String,
    },

    #[error("Field '{field}' of action '{action}' has no allowed value '{value}'")]
    NotAllowed {
        action: String,
        field: String,
        value: String,
    },
}

// ============================================================================
// Adventure actions
// ============================================================================

/// Action table for the adventure engine.
pub struct AdventureActions;

impl AdventureActions {
    /// All actions the adventure resolver accepts.
    ///
    /// The set is static for the whole session; the resolver soft-fails
    /// anything outside it.
    pub fn all() -> &'static [ActionSchema] {
        &ADVENTURE_ACTIONS
    }

    fn move_to() -> ActionSchema {
        ActionSchema::new(
            "move",
            "Move through an exit of the current room.",
            json!({
                "type": "object",
                "properties": {
                    "direction": {
                        "type": "string",
                        "enum": ["north", "south", "east", "west"],
                        "description": "Compass direction to move in"
                    }
                },
                "required": ["direction"]
            }),
        )
    }

    fn look() -> ActionSchema {
        ActionSchema::new(
            "look",
            "Look around the current room: description, exits, visible items.",
            json!({ "type": "object", "properties": {}, "required": [] }),
        )
    }

    fn examine() -> ActionSchema {
        ActionSchema::new(
            "examine",
            "Examine something in the room or in your inventory by name.",
            json!({
                "type": "object",
                "properties": {
                    "target": {
                        "type": "string",
                        "description": "What to examine (e.g. 'pedestal', 'torch')"
                    }
                },
                "required": ["target"]
            }),
        )
    }

    fn take() -> ActionSchema {
        ActionSchema::new(
            "take",
            "Pick up an item from the current room.",
            json!({
                "type": "object",
                "properties": {
                    "item": {
                        "type": "string",
                        "description": "Item to pick up, by id or display name"
                    }
                },
                "required": ["item"]
            }),
        )
    }

    fn use_item() -> ActionSchema {
        ActionSchema::new(
            "use",
            "Use an item from your inventory, optionally on a target.",
            json!({
                "type": "object",
                "properties": {
                    "item": {
                        "type": "string",
                        "description": "Inventory item to use"
                    },
                    "target": {
                        "type": "string",
                        "description": "Optional target to use the item on"
                    }
                },
                "required": ["item"]
            }),
        )
    }

    fn inventory() -> ActionSchema {
        ActionSchema::new(
            "inventory",
            "List the items you are carrying.",
            json!({ "type": "object", "properties": {}, "required": [] }),
        )
    }

    fn help() -> ActionSchema {
        ActionSchema::new(
            "help",
            "Show what actions are available.",
            json!({ "type": "object", "properties": {}, "required": [] }),
        )
    }
}

// ============================================================================
// Strategy actions
// ============================================================================

/// Action table for the settlement strategy game.
pub struct StrategyActions;

impl StrategyActions {
    /// All actions the settlement resolver accepts.
    pub fn all() -> &'static [ActionSchema] {
        &STRATEGY_ACTIONS
    }

    fn gather() -> ActionSchema {
        ActionSchema::new(
            "gather",
            "Send free workers to gather food. Each worker brings back 2-4 food.",
            json!({
                "type": "object",
                "properties": {
                    "workers": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "Number of free workers to send"
                    }
                },
                "required": ["workers"]
            }),
        )
    }

    fn chop() -> ActionSchema {
        ActionSchema::new(
            "chop",
            "Send free workers to chop wood. Each worker brings back 1-2 wood.",
            json!({
                "type": "object",
                "properties": {
                    "workers": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "Number of free workers to send"
                    }
                },
                "required": ["workers"]
            }),
        )
    }

    fn build() -> ActionSchema {
        ActionSchema::new(
            "build",
            "Build shelters at 5 wood each. Each shelter houses 2 people.",
            json!({
                "type": "object",
                "properties": {
                    "shelters": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "Number of shelters to build"
                    }
                },
                "required": ["shelters"]
            }),
        )
    }

    fn end_turn() -> ActionSchema {
        ActionSchema::new(
            "end_turn",
            "End the day: people eat, the settlement scores, and workers rest.",
            json!({ "type": "object", "properties": {}, "required": [] }),
        )
    }
}

lazy_static! {
    static ref ADVENTURE_ACTIONS: Vec<ActionSchema> = vec![
        AdventureActions::move_to(),
        AdventureActions::look(),
        AdventureActions::examine(),
        AdventureActions::take(),
        AdventureActions::use_item(),
        AdventureActions::inventory(),
        AdventureActions::help(),
    ];
    static ref STRATEGY_ACTIONS: Vec<ActionSchema> = vec![
        StrategyActions::gather(),
        StrategyActions::chop(),
        StrategyActions::build(),
        StrategyActions::end_turn(),
    ];
}

// ============================================================================
// Validation
// ============================================================================

/// Check `args` against the schema's required fields, primitive types,
/// enumerated values, and numeric minimums.
///
/// Player adapters call this before handing an action to a session; the
/// core itself only re-checks what its own branching depends on.
pub fn validate_args(schema: &ActionSchema, args: &Value) -> Result<(), ArgError> {
    let empty = serde_json::Map::new();
    let props = schema.input_schema["properties"]
        .as_object()
        .unwrap_or(&empty);

    if let Some(required) = schema.input_schema["required"].as_array() {
        for field in required.iter().filter_map(|f| f.as_str()) {
            if args.get(field).is_none() {
                return Err(ArgError::MissingField {
                    action: schema.name.clone(),
                    field: field.to_string(),
                });
            }
        }
    }

    for (field, spec) in props {
        let Some(value) = args.get(field) else {
            continue;
        };

        match spec["type"].as_str() {
            Some("string") => {
                let Some(s) = value.as_str() else {
                    return Err(ArgError::WrongType {
                        action: schema.name.clone(),
                        field: field.clone(),
                        expected: "string".to_string(),
                    });
                };
                if let Some(allowed) = spec["enum"].as_array() {
                    if !allowed.iter().any(|a| a.as_str() == Some(s)) {
                        return Err(ArgError::NotAllowed {
                            action: schema.name.clone(),
                            field: field.clone(),
                            value: s.to_string(),
                        });
                    }
                }
            }
            Some("integer") => {
                let Some(n) = value.as_i64() else {
                    return Err(ArgError::WrongType {
                        action: schema.name.clone(),
                        field: field.clone(),
                        expected: "integer".to_string(),
                    });
                };
                if let Some(min) = spec["minimum"].as_i64() {
                    if n < min {
                        return Err(ArgError::NotAllowed {
                            action: schema.name.clone(),
                            field: field.clone(),
                            value: n.to_string(),
                        });
                    }
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// Look up an action by name in a schema table.
pub fn find_action<'a>(table: &'a [ActionSchema], name: &str) -> Option<&'a ActionSchema> {
    table.iter().find(|a| a.name == name)
}
