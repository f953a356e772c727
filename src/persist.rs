//! Save/load for adventure sessions.
//!
//! The save captures the external contract shape: current room id,
//! inventory, visited rooms, and a snapshot of the game map (rooms mutate
//! as interactions fire, so the snapshot is part of the state). A restored
//! session resumes play identically to the in-memory one at that point.

use crate::adventure::world::{AdventureMap, AdventureState};
use crate::adventure::AdventureSession;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Corrupt save: {0}")]
    Corrupt(String),
}

/// Current save file version.
const SAVE_VERSION: u32 = 1;

/// A saved adventure with everything needed to resume play.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedExpedition {
    /// Save format version for compatibility checking.
    pub version: u32,

    /// When the save was created (unix seconds).
    pub saved_at: String,

    #[serde(rename = "currentRoomId")]
    pub current_room: String,

    /// Item ids carried, in pickup order.
    pub inventory: Vec<String>,

    #[serde(rename = "visitedRooms")]
    pub visited_rooms: Vec<String>,

    /// Turns already spent against the map's limit.
    pub turns: u32,

    /// The map snapshot, including any room item lists changed in play.
    #[serde(rename = "gameMap")]
    pub map: AdventureMap,

    /// Quick-access facts about the save.
    pub metadata: SaveMetadata,
}

/// Metadata about a save file, for listings and load menus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveMetadata {
    pub current_room: String,
    pub turns: u32,
    pub items_carried: usize,
    pub rooms_visited: usize,
}

impl SavedExpedition {
    /// Snapshot a live session.
    pub fn from_session(session: &AdventureSession) -> Self {
        let state = session.state();
        let mut visited_rooms: Vec<String> = state.visited.iter().cloned().collect();
        visited_rooms.sort_unstable();

        let metadata = SaveMetadata {
            current_room: state.current_room.clone(),
            turns: state.turns,
            items_carried: state.inventory.len(),
            rooms_visited: visited_rooms.len(),
        };

        Self {
            version: SAVE_VERSION,
            saved_at: unix_now(),
            current_room: state.current_room.clone(),
            inventory: state.inventory.clone(),
            visited_rooms,
            turns: state.turns,
            map: session.map().clone(),
            metadata,
        }
    }

    /// Rebuild a mid-game session from this save.
    pub fn into_session(self) -> Result<AdventureSession, PersistError> {
        if !self.map.rooms.contains_key(&self.current_room) {
            return Err(PersistError::Corrupt(format!(
                "current room '{}' is not in the saved map",
                self.current_room
            )));
        }
        for id in &self.inventory {
            if !self.map.items.contains_key(id) {
                return Err(PersistError::Corrupt(format!(
                    "inventory item '{id}' is not in the saved map"
                )));
            }
        }
        for id in &self.visited_rooms {
            if !self.map.rooms.contains_key(id) {
                return Err(PersistError::Corrupt(format!(
                    "visited room '{id}' is not in the saved map"
                )));
            }
        }

        let state = AdventureState {
            current_room: self.current_room,
            inventory: self.inventory,
            visited: self.visited_rooms.into_iter().collect(),
            turns: self.turns,
            game_over: false,
            win: false,
            last_narrative: String::new(),
        };
        Ok(AdventureSession::resume(self.map, state))
    }

    /// Save to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Load from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path).await?;
        let saved: Self = serde_json::from_str(&content)?;

        if saved.version != SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: saved.version,
            });
        }

        Ok(saved)
    }

    /// Read a save's metadata without deserializing the full map.
    pub async fn peek_metadata(path: impl AsRef<Path>) -> Result<SaveMetadata, PersistError> {
        let content = fs::read_to_string(path).await?;

        #[derive(Deserialize)]
        struct Partial {
            version: u32,
            metadata: SaveMetadata,
        }

        let partial: Partial = serde_json::from_str(&content)?;

        if partial.version != SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: partial.version,
            });
        }

        Ok(partial.metadata)
    }
}

/// Information about a save file on disk.
#[derive(Debug, Clone)]
pub struct SaveInfo {
    pub path: String,
    pub metadata: SaveMetadata,
}

/// List all save files in a directory, in reverse name order.
pub async fn list_saves(dir: impl AsRef<Path>) -> Result<Vec<SaveInfo>, PersistError> {
    let mut saves = Vec::new();
    let dir_path = dir.as_ref();
    if !dir_path.exists() {
        return Ok(saves);
    }

    let mut entries = fs::read_dir(dir_path).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            if let Ok(metadata) = SavedExpedition::peek_metadata(&path).await {
                saves.push(SaveInfo {
                    path: path.to_string_lossy().to_string(),
                    metadata,
                });
            }
        }
    }

    saves.sort_by(|a, b| b.path.cmp(&a.path));
    Ok(saves)
}

/// Build a sanitized save path for a named slot.
pub fn save_path(dir: impl AsRef<Path>, slot: &str) -> std::path::PathBuf {
    let sanitized: String = slot
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    dir.as_ref().join(format!("{sanitized}.json"))
}

/// Current unix time in seconds, as a string.
fn unix_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}", now.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adventure::cave_puzzle;
    use crate::session::GameSession;
    use serde_json::json;

    fn mid_game_session() -> AdventureSession {
        let mut session = AdventureSession::new(cave_puzzle());
        session.start().unwrap();
        session.step("take", &json!({ "item": "torch" })).unwrap();
        session.step("move", &json!({ "direction": "east" })).unwrap();
        session
    }

    #[test]
    fn test_snapshot_captures_state() {
        let session = mid_game_session();
        let saved = SavedExpedition::from_session(&session);

        assert_eq!(saved.version, SAVE_VERSION);
        assert_eq!(saved.current_room, "mainChamber");
        assert_eq!(saved.inventory, vec!["torch"]);
        assert_eq!(saved.turns, 2);
        assert!(saved.visited_rooms.contains(&"entrance".to_string()));
        assert_eq!(saved.metadata.items_carried, 1);
        // The torch left the entrance when it was taken.
        assert!(saved.map.room("entrance").unwrap().items.is_empty());
    }

    #[test]
    fn test_restore_resumes_identically() {
        let session = mid_game_session();
        let saved = SavedExpedition::from_session(&session);

        let mut restored = saved.into_session().unwrap();
        let state = restored.state();
        assert_eq!(state.current_room, "mainChamber");
        assert_eq!(state.inventory, vec!["torch"]);
        assert_eq!(state.turns, 2);

        // No start() needed; the restored session is mid-game.
        let outcome = restored.step("move", &json!({ "direction": "east" })).unwrap();
        assert!(outcome.narrative().contains("Puzzle Room"));
    }

    #[test]
    fn test_restore_rejects_unknown_room() {
        let session = mid_game_session();
        let mut saved = SavedExpedition::from_session(&session);
        saved.current_room = "void".to_string();

        let err = saved.into_session().unwrap_err();
        assert!(matches!(err, PersistError::Corrupt(_)));
    }

    #[test]
    fn test_save_path_is_sanitized() {
        let path = save_path("/saves", "cave run #2!");
        assert!(path.to_string_lossy().ends_with("cave_run__2_.json"));
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("cave.json");

        let session = mid_game_session();
        SavedExpedition::from_session(&session)
            .save_json(&path)
            .await
            .expect("save should succeed");

        let loaded = SavedExpedition::load_json(&path).await.expect("load");
        assert_eq!(loaded.current_room, "mainChamber");
        assert_eq!(loaded.inventory, vec!["torch"]);

        let metadata = SavedExpedition::peek_metadata(&path).await.expect("peek");
        assert_eq!(metadata.turns, 2);
        assert_eq!(metadata.items_carried, 1);
    }

    #[tokio::test]
    async fn test_version_mismatch_is_rejected() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("old.json");

        let mut saved = SavedExpedition::from_session(&mid_game_session());
        saved.version = 99;
        let content = serde_json::to_string(&saved).unwrap();
        fs::write(&path, content).await.unwrap();

        let err = SavedExpedition::load_json(&path).await.unwrap_err();
        assert!(matches!(
            err,
            PersistError::VersionMismatch { expected: 1, found: 99 }
        ));
    }

    #[tokio::test]
    async fn test_list_saves() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().expect("temp dir");

        for slot in ["alpha", "beta"] {
            let saved = SavedExpedition::from_session(&mid_game_session());
            saved
                .save_json(save_path(temp_dir.path(), slot))
                .await
                .expect("save");
        }

        let saves = list_saves(temp_dir.path()).await.expect("list");
        assert_eq!(saves.len(), 2);

        let missing = list_saves(temp_dir.path().join("nope")).await.expect("list");
        assert!(missing.is_empty());
    }
}
