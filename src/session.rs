//! Game session contract shared by every simulation.
//!
//! A session is a small state machine: `Uninitialized → Ready ⇄ Ready →
//! Terminal`. `start()` runs exactly once and returns the opening narrative
//! plus the legal-action table; each `step()` applies one action and either
//! continues or ends the game. The driving loop (a human front end, an LLM
//! bridge, or the scripted harness) owns all retry policy — the session
//! never retries or suspends.

use crate::schema::ActionSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors from driving a game session.
///
/// Unrecognized action *names* are not errors — they soft-fail with a "not
/// understood" narrative so a misbehaving agent can recover. Errors here are
/// either caller mistakes (lifecycle, malformed arguments) or internal
/// consistency violations that should never occur after correct
/// initialization.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Session has not been started")]
    NotStarted,

    #[error("Session was already started")]
    AlreadyStarted,

    #[error("Session has ended; no further steps are accepted")]
    SessionEnded,

    #[error("Malformed arguments for action '{action}': {detail}")]
    MalformedArgs { action: String, detail: String },

    #[error("Room '{0}' is not in the room registry")]
    UnknownRoom(String),

    #[error("Item '{0}' is not in the item registry")]
    UnknownItem(String),
}

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Ready,
    Terminal,
}

/// Terminal output of a finished game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResult {
    /// Human-readable account of how the game ended.
    pub description: String,
    /// Structured facts about the run (win flag, turns, score, ...).
    pub metadata: Value,
}

/// Result of one step: either the game continues or it is over.
#[derive(Debug, Clone)]
pub enum StepOutcome {
    /// The game goes on: feedback text plus the currently legal actions.
    Continue {
        narrative: String,
        actions: &'static [ActionSchema],
    },
    /// The game is over. Every later `step()` is an error.
    Ended { result: GameResult },
}

impl StepOutcome {
    /// The narrative text, whichever arm this is.
    pub fn narrative(&self) -> &str {
        match self {
            StepOutcome::Continue { narrative, .. } => narrative,
            StepOutcome::Ended { result } => &result.description,
        }
    }

    /// The terminal result, if the game ended on this step.
    pub fn result(&self) -> Option<&GameResult> {
        match self {
            StepOutcome::Continue { .. } => None,
            StepOutcome::Ended { result } => Some(result),
        }
    }

    pub fn is_ended(&self) -> bool {
        matches!(self, StepOutcome::Ended { .. })
    }
}

/// Uniform contract over the individual game simulations.
pub trait GameSession {
    /// Begin the session. Must be called exactly once, before any `step`.
    fn start(&mut self) -> Result<StepOutcome, EngineError>;

    /// Apply one action. `args` must already satisfy the shape declared by
    /// the action's schema; the session re-checks only what its own
    /// branching needs and fails with [`EngineError::MalformedArgs`] on
    /// structurally invalid payloads.
    fn step(&mut self, action: &str, args: &Value) -> Result<StepOutcome, EngineError>;

    /// Release held resources. Safe to call repeatedly, in any phase.
    fn cleanup(&mut self);
}

// ============================================================================
// Argument extraction
// ============================================================================

/// Pull a required string field out of an action payload.
pub(crate) fn required_str<'a>(
    action: &str,
    args: &'a Value,
    field: &str,
) -> Result<&'a str, EngineError> {
    args.get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| EngineError::MalformedArgs {
            action: action.to_string(),
            detail: format!("expected string field '{field}'"),
        })
}

/// Pull an optional string field out of an action payload.
///
/// A present-but-non-string value is malformed; an absent one is `None`.
pub(crate) fn optional_str<'a>(
    action: &str,
    args: &'a Value,
    field: &str,
) -> Result<Option<&'a str>, EngineError> {
    match args.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_str()
            .map(Some)
            .ok_or_else(|| EngineError::MalformedArgs {
                action: action.to_string(),
                detail: format!("expected string field '{field}'"),
            }),
    }
}

/// Pull a required integer field out of an action payload.
pub(crate) fn required_u32(action: &str, args: &Value, field: &str) -> Result<u32, EngineError> {
    args.get(field)
        .and_then(|v| v.as_u64())
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| EngineError::MalformedArgs {
            action: action.to_string(),
            detail: format!("expected non-negative integer field '{field}'"),
        })
}
