//! Turn-based text game simulations with a schema-driven agent harness.
//!
//! This crate provides:
//! - A room-based adventure engine parameterized by map data, with two
//!   built-in maps (a compact cave puzzle and a larger keep crawl)
//! - A settlement strategy game (workers, food, wood, shelters)
//! - A uniform [`GameSession`] contract over both, with schema-described
//!   actions suitable for humans, scripted replays, or LLM tool calling
//! - Save/load of adventure sessions
//!
//! # Quick Start
//!
//! ```
//! use questbox::{cave_puzzle, AdventureSession, GameSession};
//! use serde_json::json;
//!
//! let mut game = AdventureSession::new(cave_puzzle());
//! let opening = game.start().unwrap();
//! println!("{}", opening.narrative());
//!
//! let outcome = game.step("move", &json!({ "direction": "east" })).unwrap();
//! println!("{}", outcome.narrative());
//! ```

pub mod adventure;
pub mod persist;
pub mod player;
pub mod schema;
pub mod session;
pub mod strategy;
pub mod testing;

// Primary public API
pub use adventure::{cave_puzzle, ruined_keep, AdventureMap, AdventureSession};
pub use persist::{PersistError, SavedExpedition};
pub use player::{PlayerAdapter, ScriptedPlayer};
pub use schema::{ActionSchema, AdventureActions, StrategyActions};
pub use session::{EngineError, GameResult, GameSession, StepOutcome};
pub use strategy::{SettlementSession, SettlementState};
