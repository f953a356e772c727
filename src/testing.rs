//! Scripted play harness and assertion helpers.
//!
//! Drives any [`GameSession`] with any [`PlayerAdapter`] to completion and
//! records a transcript, the way an automated front end would.

use crate::player::PlayerAdapter;
use crate::session::{EngineError, GameResult, GameSession, StepOutcome};

/// One exchange in a recorded play-through.
#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    /// Action name the player chose.
    pub action: String,
    /// Feedback the session returned.
    pub narrative: String,
    /// 1-based step number.
    pub turn: usize,
}

/// The outcome of driving a session with a player.
#[derive(Debug, Clone)]
pub struct PlaySummary {
    /// Opening narrative from `start()`.
    pub opening: String,
    /// Every exchange, in order.
    pub transcript: Vec<TranscriptEntry>,
    /// Terminal result, if the game ended before the script ran out.
    pub result: Option<GameResult>,
}

impl PlaySummary {
    pub fn last_narrative(&self) -> Option<&str> {
        self.transcript.last().map(|e| e.narrative.as_str())
    }

    pub fn won(&self) -> bool {
        self.result
            .as_ref()
            .map(|r| r.metadata["win"] == true)
            .unwrap_or(false)
    }
}

/// Start a session and feed it the player's actions until the player stops,
/// the game ends, or `max_steps` is reached.
pub fn run_to_end(
    session: &mut dyn GameSession,
    player: &mut dyn PlayerAdapter,
    max_steps: usize,
) -> Result<PlaySummary, EngineError> {
    let opening = session.start()?;
    let mut narrative = opening.narrative().to_string();
    let mut actions = match &opening {
        StepOutcome::Continue { actions, .. } => *actions,
        StepOutcome::Ended { .. } => &[],
    };

    let mut summary = PlaySummary {
        opening: narrative.clone(),
        transcript: Vec::new(),
        result: opening.result().cloned(),
    };
    if summary.result.is_some() {
        return Ok(summary);
    }

    for turn in 1..=max_steps {
        let Some((name, args)) = player.next_action(&narrative, actions) else {
            break;
        };

        let outcome = session.step(&name, &args)?;
        summary.transcript.push(TranscriptEntry {
            action: name,
            narrative: outcome.narrative().to_string(),
            turn,
        });

        match outcome {
            StepOutcome::Continue {
                narrative: next,
                actions: next_actions,
            } => {
                narrative = next;
                actions = next_actions;
            }
            StepOutcome::Ended { result } => {
                summary.result = Some(result);
                break;
            }
        }
    }

    session.cleanup();
    Ok(summary)
}

// ============================================================================
// Assertion helpers
// ============================================================================

/// Assert the play-through ended in a win.
#[track_caller]
pub fn assert_won(summary: &PlaySummary) {
    assert!(
        summary.won(),
        "Expected a win, got {:?}",
        summary.result.as_ref().map(|r| &r.metadata)
    );
}

/// Assert the play-through ended without a win.
#[track_caller]
pub fn assert_lost(summary: &PlaySummary) {
    let result = summary.result.as_ref().expect("Expected the game to end");
    assert_eq!(
        result.metadata["win"], false,
        "Expected a loss, got {:?}",
        result.metadata
    );
}

/// Assert the game was still running when the script ran out.
#[track_caller]
pub fn assert_still_running(summary: &PlaySummary) {
    assert!(
        summary.result.is_none(),
        "Expected the game to continue, but it ended: {:?}",
        summary.result
    );
}
