//! End-to-end scenarios for the cave puzzle adventure.

use questbox::schema::{find_action, validate_args};
use questbox::testing::{assert_lost, assert_won, run_to_end};
use questbox::{
    cave_puzzle, ruined_keep, AdventureActions, AdventureSession, GameSession, ScriptedPlayer,
    StepOutcome,
};
use serde_json::json;

#[test]
fn solve_the_pedestal_puzzle() {
    let mut game = AdventureSession::new(cave_puzzle());
    let opening = game.start().unwrap();
    assert!(opening.narrative().contains("Cave Entrance"));

    let outcome = game.step("move", &json!({ "direction": "east" })).unwrap();
    assert!(outcome.narrative().contains("Main Chamber"));

    let outcome = game.step("move", &json!({ "direction": "east" })).unwrap();
    assert!(outcome.narrative().contains("Puzzle Room"));

    let outcome = game.step("take", &json!({ "item": "key" })).unwrap();
    assert!(outcome.narrative().contains("You take the Iron Key"));

    let outcome = game
        .step("use", &json!({ "item": "key", "target": "pedestal" }))
        .unwrap();
    let result = outcome.result().expect("the winning use ends the game");
    assert!(result.description.contains("solved the puzzle"));
    assert_eq!(result.metadata["win"], true);
    assert_eq!(result.metadata["turns"], 4);

    let visited = result.metadata["visited_rooms"].as_array().unwrap();
    assert!(visited.iter().any(|r| r == "puzzleRoom"));
    assert!(visited.iter().any(|r| r == "entrance"));
}

#[test]
fn pedestal_needs_the_right_room() {
    let mut game = AdventureSession::new(cave_puzzle());
    game.start().unwrap();

    // Grab the key, then back out of the puzzle room before trying it.
    game.step("move", &json!({ "direction": "east" })).unwrap();
    game.step("move", &json!({ "direction": "east" })).unwrap();
    game.step("take", &json!({ "item": "key" })).unwrap();
    game.step("move", &json!({ "direction": "west" })).unwrap();

    let outcome = game
        .step("use", &json!({ "item": "key", "target": "pedestal" }))
        .unwrap();
    assert!(!outcome.is_ended());
    // The key declares the pedestal as a target, so this is the soft
    // "nothing happens", not "can't use it on that".
    assert!(outcome.narrative().contains("nothing happens"));
}

#[test]
fn torch_lights_the_way_to_the_treasure() {
    let mut game = AdventureSession::new(cave_puzzle());
    game.start().unwrap();

    game.step("take", &json!({ "item": "torch" })).unwrap();

    // One-way, one-time transformation in the inventory.
    let outcome = game.step("use", &json!({ "item": "torch" })).unwrap();
    assert!(outcome.narrative().contains("alight"));
    assert_eq!(game.state().inventory, vec!["litTorch"]);

    let outcome = game.step("use", &json!({ "item": "torch" })).unwrap();
    assert!(outcome.narrative().contains("already lit"));
    assert_eq!(game.state().inventory, vec!["litTorch"]);

    game.step("move", &json!({ "direction": "east" })).unwrap();
    let outcome = game.step("move", &json!({ "direction": "north" })).unwrap();
    // With the lit torch in hand the dark room shows its contents.
    assert!(outcome.narrative().contains("Miners' Hoard"));

    let outcome = game.step("take", &json!({ "item": "treasure" })).unwrap();
    // The treasure in the inventory wins on the same step, even though
    // the action itself was just a take.
    let result = outcome.result().expect("holding the treasure wins");
    assert_eq!(result.metadata["win"], true);
    let inventory = result.metadata["inventory"].as_array().unwrap();
    assert!(inventory.iter().any(|i| i == "treasure"));
}

#[test]
fn dark_room_hides_everything_without_light() {
    let mut game = AdventureSession::new(cave_puzzle());
    game.start().unwrap();

    game.step("move", &json!({ "direction": "east" })).unwrap();
    let outcome = game.step("move", &json!({ "direction": "north" })).unwrap();
    assert!(outcome.narrative().contains("pitch dark"));

    let outcome = game.step("take", &json!({ "item": "treasure" })).unwrap();
    assert!(outcome.narrative().contains("too dark"));
    assert!(game.state().inventory.is_empty());

    let outcome = game.step("examine", &json!({ "target": "treasure" })).unwrap();
    assert!(outcome.narrative().contains("too dark"));
}

#[test]
fn examine_resolution_order() {
    let mut game = AdventureSession::new(cave_puzzle());
    game.start().unwrap();

    // Interaction key beats everything else.
    let outcome = game.step("examine", &json!({ "target": "walls" })).unwrap();
    assert!(outcome.narrative().contains("tool marks"));

    // Case-insensitive interaction key.
    let outcome = game.step("examine", &json!({ "target": "WALLS" })).unwrap();
    assert!(outcome.narrative().contains("tool marks"));

    // Room item by display name.
    let outcome = game
        .step("examine", &json!({ "target": "unlit torch" }))
        .unwrap();
    assert!(outcome.narrative().contains("pitch-soaked"));

    // Inventory item once taken.
    game.step("take", &json!({ "item": "torch" })).unwrap();
    let outcome = game.step("examine", &json!({ "target": "Torch" })).unwrap();
    assert!(outcome.narrative().contains("pitch-soaked"));

    // Fallback.
    let outcome = game.step("examine", &json!({ "target": "sky" })).unwrap();
    assert!(outcome.narrative().contains("nothing special"));
}

#[test]
fn twenty_turns_of_dithering_lose_the_game() {
    let mut game = AdventureSession::new(cave_puzzle());
    let mut player = ScriptedPlayer::new();
    for _ in 0..20 {
        player = player.then("look", json!({}));
    }

    let summary = run_to_end(&mut game, &mut player, 50).unwrap();
    assert_lost(&summary);

    let result = summary.result.unwrap();
    assert_eq!(result.metadata["turns"], 20);
    assert_eq!(result.metadata["win"], false);
}

#[test]
fn scripted_player_wins_through_the_harness() {
    let mut game = AdventureSession::new(cave_puzzle());
    let mut player = ScriptedPlayer::new()
        .then("move", json!({ "direction": "east" }))
        .then("move", json!({ "direction": "east" }))
        .then("take", json!({ "item": "key" }))
        .then("use", json!({ "item": "key", "target": "pedestal" }));

    let summary = run_to_end(&mut game, &mut player, 50).unwrap();
    assert_won(&summary);
    assert_eq!(summary.transcript.len(), 4);
    assert!(summary
        .last_narrative()
        .unwrap()
        .contains("solved the puzzle"));
}

#[test]
fn misdirected_agent_actions_soft_fail() {
    let mut game = AdventureSession::new(cave_puzzle());
    game.start().unwrap();

    // An action name outside the registry keeps the game running and
    // re-offers the same action table.
    let outcome = game.step("teleport", &json!({})).unwrap();
    match outcome {
        StepOutcome::Continue { narrative, actions } => {
            assert!(narrative.contains("don't know how"));
            assert_eq!(actions.len(), AdventureActions::all().len());
        }
        StepOutcome::Ended { .. } => panic!("soft failure must not end the game"),
    }
}

#[test]
fn registry_validates_agent_arguments_up_front() {
    // A tool-calling bridge validates against the published schema before
    // stepping the session at all.
    let schema = find_action(AdventureActions::all(), "move").unwrap();
    assert!(validate_args(schema, &json!({ "direction": "east" })).is_ok());
    assert!(validate_args(schema, &json!({ "direction": "sideways" })).is_err());
    assert!(validate_args(schema, &json!({})).is_err());
}

#[test]
fn same_engine_runs_the_keep_map() {
    let mut game = AdventureSession::new(ruined_keep());
    let opening = game.start().unwrap();
    assert!(opening.narrative().contains("Courtyard"));

    // The tapestry interaction reveals the flask into the room.
    game.step("move", &json!({ "direction": "north" })).unwrap();
    game.step("examine", &json!({ "target": "tapestry" })).unwrap();
    let outcome = game.step("take", &json!({ "item": "flask" })).unwrap();
    assert!(outcome.narrative().contains("You take the Silver Flask"));
}
