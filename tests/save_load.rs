//! Integration tests for saving and loading games on disk.

use rouge::{
    Autopilot, GameState, GameStatus, PlayerAction, RougeError, RougeResult, ScriptedInterface,
    Snapshot, TurnOutcome, SNAPSHOT_VERSION,
};
use tempfile::tempdir;

/// A game with some history: a few dozen autopilot turns on top of a fresh floor.
fn played_game(seed: u64, turns: usize) -> RougeResult<GameState> {
    let mut state = GameState::new_game(seed)?;
    let mut bot = Autopilot::new();
    for _ in 0..turns {
        let Some(action) = bot.next_action(&state) else {
            break;
        };
        state.play_turn(action, &mut bot)?;
    }
    Ok(state)
}

#[test]
fn test_round_trip_through_a_file() -> RougeResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("rouge.json");
    let state = played_game(4242, 60)?;

    state.save_to_path(&path)?;
    let loaded = GameState::load_from_path(&path)?;

    assert_eq!(loaded.dungeon.tiles, state.dungeon.tiles);
    assert_eq!(loaded.dungeon.entities, state.dungeon.entities);
    assert_eq!(loaded.inventory, state.inventory);
    assert_eq!(loaded.equipment_bag, state.equipment_bag);
    assert_eq!(loaded.progression.gold, state.progression.gold);
    assert_eq!(loaded.dungeon.depth, state.dungeon.depth);
    assert_eq!(loaded.status, state.status);
    assert_eq!(loaded.dungeon.boss_present, state.dungeon.boss_present);
    assert_eq!(loaded.statistics, state.statistics);
    assert_eq!(loaded.turn_number, state.turn_number);
    assert_eq!(loaded.snapshot()?, state.snapshot()?);
    Ok(())
}

#[test]
fn test_explored_flags_survive_reload() -> RougeResult<()> {
    let state = played_game(7, 40)?;
    let json = state.save_to_json()?;
    let loaded = GameState::load_from_json(&json)?;

    assert_eq!(loaded.dungeon.explored_count(), state.dungeon.explored_count());
    // the field of view itself is rebuilt, not stored
    assert!(loaded.visibility.is_visible(loaded.player_position()));
    assert_eq!(
        loaded.visibility.visible_count(),
        state.visibility.visible_count()
    );
    Ok(())
}

#[test]
fn test_loaded_game_keeps_playing() -> RougeResult<()> {
    let state = played_game(5, 30)?;
    let mut loaded = GameState::load_from_json(&state.save_to_json()?)?;

    let mut bot = Autopilot::new();
    for _ in 0..30 {
        let Some(action) = bot.next_action(&loaded) else {
            break;
        };
        loaded.play_turn(action, &mut bot)?;
    }
    assert!(loaded.turn_number >= state.turn_number);
    Ok(())
}

#[test]
fn test_dead_game_round_trips() -> RougeResult<()> {
    let mut state = GameState::new_game(13)?;
    let player_id = state.player_id;
    state.apply_damage(player_id, 1_000)?;
    assert_eq!(state.status, GameStatus::Dead);

    let loaded = GameState::load_from_json(&state.save_to_json()?)?;
    assert!(loaded.is_game_over());
    assert_eq!(loaded.player().map(|p| p.glyph), Some('%'));
    Ok(())
}

#[test]
fn test_corrupt_file_is_rejected() -> RougeResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{\"version\": 1, \"width\": ")?;

    match GameState::load_from_path(&path) {
        Err(RougeError::LoadFailed(_)) => {}
        other => panic!("expected a load failure, got {:?}", other.map(|_| ())),
    }
    Ok(())
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempdir().expect("temp dir");
    let result = GameState::load_from_path(dir.path().join("nothing-here.json"));
    assert!(matches!(result, Err(RougeError::Io(_))));
}

#[test]
fn test_inconsistent_snapshot_is_rejected() -> RougeResult<()> {
    let state = GameState::new_game(21)?;

    let mut snapshot = state.snapshot()?;
    snapshot.player_index = snapshot.entities.len();
    assert!(matches!(
        GameState::from_snapshot(snapshot),
        Err(RougeError::LoadFailed(_))
    ));

    let mut snapshot = state.snapshot()?;
    snapshot.version = SNAPSHOT_VERSION + 1;
    let json = snapshot.to_json()?;
    assert!(matches!(
        Snapshot::from_json(&json),
        Err(RougeError::LoadFailed(_))
    ));

    let mut snapshot = state.snapshot()?;
    snapshot.depth = 0;
    assert!(snapshot.validate().is_err());
    Ok(())
}

/// Saves a fresh game, lets `edit` corrupt the JSON, then tries to load it.
fn load_edited(
    edit: impl FnOnce(&mut serde_json::Value),
) -> RougeResult<RougeResult<GameState>> {
    let state = GameState::new_game(77)?;
    let mut value: serde_json::Value = serde_json::from_str(&state.save_to_json()?)?;
    edit(&mut value);
    Ok(GameState::load_from_json(&serde_json::to_string(&value)?))
}

#[test]
fn test_zero_capacity_message_log_is_rejected() -> RougeResult<()> {
    let loaded = load_edited(|save| save["messages"]["capacity"] = 0.into())?;
    assert!(matches!(loaded, Err(RougeError::LoadFailed(_))));
    Ok(())
}

#[test]
fn test_zero_level_up_threshold_is_rejected() -> RougeResult<()> {
    let loaded = load_edited(|save| {
        save["balance"]["level_up_base"] = 0.into();
        save["balance"]["level_up_factor"] = 0.into();
    })?;
    assert!(matches!(loaded, Err(RougeError::LoadFailed(_))));
    Ok(())
}

#[test]
fn test_empty_inventory_capacity_is_rejected() -> RougeResult<()> {
    let loaded = load_edited(|save| save["balance"]["inventory_capacity"] = 0.into())?;
    assert!(matches!(loaded, Err(RougeError::LoadFailed(_))));
    Ok(())
}

#[test]
fn test_undersized_generation_config_is_rejected() -> RougeResult<()> {
    let loaded = load_edited(|save| {
        save["generation"]["width"] = 4.into();
        save["generation"]["height"] = 4.into();
    })?;
    assert!(matches!(loaded, Err(RougeError::LoadFailed(_))));
    Ok(())
}

#[test]
fn test_untouched_save_still_plays() -> RougeResult<()> {
    let mut loaded = load_edited(|_| {})??;
    let mut ui = ScriptedInterface::new();
    let outcome = loaded.play_turn(PlayerAction::Wait, &mut ui)?;
    assert_eq!(outcome, TurnOutcome::TookTurn);
    Ok(())
}
