//! The player seam: whatever supplies the next action.
//!
//! A [`PlayerAdapter`] is the session's only counterpart — a human front
//! end, an LLM tool-calling bridge, or a replay of a recorded script. It
//! consumes the narrative and the current legal actions and yields the
//! next `(name, args)` pair. Retry policy ("ask the agent again") lives
//! entirely on this side of the seam.

use crate::schema::ActionSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::path::Path;

/// Source of the next action for a game session.
pub trait PlayerAdapter {
    /// Pick the next action, or `None` to stop playing.
    fn next_action(&mut self, narrative: &str, actions: &[ActionSchema])
        -> Option<(String, Value)>;
}

/// One recorded action, as stored in a replay file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedAction {
    pub action: String,
    #[serde(default)]
    pub args: Value,
}

/// Replays a fixed list of actions, then stops.
///
/// Doubles as the deterministic test player: scenarios are written as
/// scripts and driven to completion without any interactive input.
#[derive(Debug, Default)]
pub struct ScriptedPlayer {
    script: VecDeque<ScriptedAction>,
}

impl ScriptedPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action to the script.
    pub fn then(mut self, action: impl Into<String>, args: Value) -> Self {
        self.script.push_back(ScriptedAction {
            action: action.into(),
            args,
        });
        self
    }

    /// Load a recorded script (a JSON array of `{action, args}`) from a
    /// file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, std::io::Error> {
        let content = tokio::fs::read_to_string(path).await?;
        let actions: Vec<ScriptedAction> = serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(Self {
            script: actions.into(),
        })
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl PlayerAdapter for ScriptedPlayer {
    fn next_action(
        &mut self,
        _narrative: &str,
        _actions: &[ActionSchema],
    ) -> Option<(String, Value)> {
        self.script.pop_front().map(|s| (s.action, s.args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AdventureActions;
    use serde_json::json;

    #[test]
    fn test_scripted_player_replays_in_order() {
        let mut player = ScriptedPlayer::new()
            .then("look", json!({}))
            .then("move", json!({ "direction": "east" }));

        assert_eq!(player.remaining(), 2);
        let (name, _) = player.next_action("", AdventureActions::all()).unwrap();
        assert_eq!(name, "look");
        let (name, args) = player.next_action("", AdventureActions::all()).unwrap();
        assert_eq!(name, "move");
        assert_eq!(args["direction"], "east");
        assert!(player.next_action("", AdventureActions::all()).is_none());
    }

    #[tokio::test]
    async fn test_load_script_from_file() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("replay.json");
        tokio::fs::write(
            &path,
            r#"[{"action": "take", "args": {"item": "torch"}}, {"action": "look"}]"#,
        )
        .await
        .unwrap();

        let mut player = ScriptedPlayer::load_json(&path).await.unwrap();
        assert_eq!(player.remaining(), 2);

        let (name, args) = player.next_action("", &[]).unwrap();
        assert_eq!(name, "take");
        assert_eq!(args["item"], "torch");

        // Missing args default to null; sessions treat that as empty.
        let (name, args) = player.next_action("", &[]).unwrap();
        assert_eq!(name, "look");
        assert!(args.is_null());
    }
}
