//! # Snapshots
//!
//! The stable, serializable picture of a running game.
//!
//! Entities are addressed by index in the snapshot (`player_index`, `stairs_index`). The field
//! of view is not stored: loading recomputes it, and the explored flags on the tiles are the
//! only visibility state that round-trips. Loads validate everything before a [`GameState`] is
//! built, so a corrupt snapshot never leaves a half-applied game behind.

use crate::config::Balance;
use crate::game::{
    Dungeon, Entity, EquippedSlots, GameState, GameStatistics, GameStatus, MessageLog,
    PlayerProgression, Position, Tile, Visibility,
};
use crate::generation::{utils, GenerationConfig};
use crate::{RougeError, RougeResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Format version written into every snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything needed to resume a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub width: i32,
    pub height: i32,
    /// Row-major grid including explored flags
    pub tiles: Vec<Vec<Tile>>,
    /// Live entities in render order
    pub entities: Vec<Entity>,
    pub player_index: usize,
    pub stairs_index: Option<usize>,
    pub inventory: Vec<Entity>,
    pub equipment_bag: Vec<Entity>,
    /// Which equipment-bag entries the player wears
    pub equipped: EquippedSlots,
    pub messages: MessageLog,
    pub status: GameStatus,
    pub depth: u32,
    /// Restored verbatim; descent stays gated exactly as it was when saved
    pub boss_present: bool,
    pub player_spawn: Position,
    /// Level, experience, skill points and gold
    pub progression: PlayerProgression,
    pub balance: Balance,
    pub generation: GenerationConfig,
    pub statistics: GameStatistics,
    pub turn_number: u64,
    pub rng_seed: u64,
}

fn load_failed(reason: impl Into<String>) -> RougeError {
    RougeError::LoadFailed(reason.into())
}

/// Reports a bad configuration found inside a save as a load failure.
fn as_load_failure(error: RougeError) -> RougeError {
    match error {
        RougeError::InvalidState(reason) => load_failed(reason),
        other => other,
    }
}

impl Snapshot {
    /// Checks internal consistency without building anything.
    pub fn validate(&self) -> RougeResult<()> {
        if self.version != SNAPSHOT_VERSION {
            return Err(load_failed(format!(
                "unsupported snapshot version {}",
                self.version
            )));
        }
        if self.width <= 0 || self.height <= 0 {
            return Err(load_failed(format!(
                "bad map size {}x{}",
                self.width, self.height
            )));
        }
        if self.tiles.len() != self.height as usize
            || self.tiles.iter().any(|row| row.len() != self.width as usize)
        {
            return Err(load_failed("tile grid does not match the map size"));
        }
        if self.depth == 0 {
            return Err(load_failed("depth must be at least 1"));
        }
        if self.messages.capacity() == 0 {
            return Err(load_failed("message log capacity must be at least 1"));
        }
        self.balance.validate().map_err(as_load_failure)?;
        self.generation.validate().map_err(as_load_failure)?;

        let player = self.entities.get(self.player_index).ok_or_else(|| {
            load_failed(format!("player index {} is out of range", self.player_index))
        })?;
        let fighter = player
            .fighter
            .as_ref()
            .ok_or_else(|| load_failed("the player entity has no fighter"))?;
        if fighter.hp < 0 || fighter.hp > fighter.max_hp {
            return Err(load_failed("player hp is out of range"));
        }
        if let Some(index) = self.stairs_index {
            if index >= self.entities.len() {
                return Err(load_failed(format!("stairs index {} is out of range", index)));
            }
        }

        let in_bounds = |pos: Position| {
            pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
        };
        if let Some(stray) = self.entities.iter().find(|e| !in_bounds(e.position)) {
            return Err(load_failed(format!(
                "{} stands outside the map at {:?}",
                stray.name, stray.position
            )));
        }
        if self.inventory.iter().any(|e| e.item.is_none()) {
            return Err(load_failed("inventory holds something that is not an item"));
        }
        if self.equipment_bag.iter().any(|e| e.equipment.is_none()) {
            return Err(load_failed("equipment bag holds something that is not gear"));
        }

        for (slot, id) in self.equipped.occupied() {
            let worn = self
                .equipment_bag
                .iter()
                .find(|e| e.id == id)
                .and_then(|e| e.equipment)
                .ok_or_else(|| {
                    load_failed(format!("equipped {} is not in the bag", slot.name()))
                })?;
            if worn.slot != slot {
                return Err(load_failed(format!(
                    "{} slot holds {} gear",
                    slot.name(),
                    worn.slot.name()
                )));
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> RougeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses and validates a snapshot.
    pub fn from_json(json: &str) -> RougeResult<Snapshot> {
        let snapshot: Snapshot = serde_json::from_str(json)
            .map_err(|e| load_failed(format!("corrupt snapshot: {}", e)))?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}

impl GameState {
    /// Captures the current game.
    pub fn snapshot(&self) -> RougeResult<Snapshot> {
        let player_index = self
            .dungeon
            .index_of(self.player_id)
            .ok_or_else(|| RougeError::InvalidState("the player is not on the floor".to_string()))?;
        let stairs_index = self
            .dungeon
            .stairs_id
            .and_then(|id| self.dungeon.index_of(id));
        let equipped = self
            .player_fighter()
            .map(|f| f.equipped.clone())
            .unwrap_or_default();

        Ok(Snapshot {
            version: SNAPSHOT_VERSION,
            width: self.dungeon.width,
            height: self.dungeon.height,
            tiles: self.dungeon.tiles.clone(),
            entities: self.dungeon.entities.clone(),
            player_index,
            stairs_index,
            inventory: self.inventory.clone(),
            equipment_bag: self.equipment_bag.clone(),
            equipped,
            messages: self.messages.clone(),
            status: self.status,
            depth: self.dungeon.depth,
            boss_present: self.dungeon.boss_present,
            player_spawn: self.dungeon.player_spawn,
            progression: self.progression.clone(),
            balance: self.balance.clone(),
            generation: self.generation.clone(),
            statistics: self.statistics.clone(),
            turn_number: self.turn_number,
            rng_seed: self.rng_seed,
        })
    }

    /// Builds a game from a snapshot after validating it.
    ///
    /// The random generator is reseeded from the seed and turn counter, and the field of view is
    /// recomputed from the restored player position.
    pub fn from_snapshot(snapshot: Snapshot) -> RougeResult<Self> {
        snapshot.validate()?;

        let mut entities = snapshot.entities;
        let player_id = entities[snapshot.player_index].id;
        if let Some(fighter) = entities[snapshot.player_index].fighter.as_mut() {
            fighter.equipped = snapshot.equipped;
        }
        let stairs_id = snapshot.stairs_index.map(|index| entities[index].id);

        let dungeon = Dungeon {
            width: snapshot.width,
            height: snapshot.height,
            depth: snapshot.depth,
            tiles: snapshot.tiles,
            entities,
            stairs_id,
            player_spawn: snapshot.player_spawn,
            boss_present: snapshot.boss_present,
        };

        let mut state = GameState {
            dungeon,
            player_id,
            inventory: snapshot.inventory,
            equipment_bag: snapshot.equipment_bag,
            messages: snapshot.messages,
            status: snapshot.status,
            progression: snapshot.progression,
            balance: snapshot.balance,
            generation: snapshot.generation,
            statistics: snapshot.statistics,
            turn_number: snapshot.turn_number,
            rng_seed: snapshot.rng_seed,
            rng: utils::resume_rng(snapshot.rng_seed, snapshot.turn_number),
            visibility: Visibility::new(),
        };
        state.update_fov();
        Ok(state)
    }

    pub fn save_to_json(&self) -> RougeResult<String> {
        self.snapshot()?.to_json()
    }

    pub fn load_from_json(json: &str) -> RougeResult<Self> {
        let snapshot = Snapshot::from_json(json).map_err(|e| {
            log::warn!("could not load snapshot: {}", e);
            e
        })?;
        let state = Self::from_snapshot(snapshot)?;
        log::info!(
            "loaded game at depth {}, turn {}",
            state.dungeon.depth,
            state.turn_number
        );
        Ok(state)
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> RougeResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.save_to_json()?)?;
        log::info!("saved game to {}", path.display());
        Ok(())
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> RougeResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::load_from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::fixtures::{arena, orc};
    use crate::game::{Equipment, Slot};
    use crate::generation::equipment_entity;

    #[test]
    fn test_snapshot_indices() {
        let state = arena();
        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.entities[snapshot.player_index].id, state.player_id);
        let stairs = snapshot.stairs_index.unwrap();
        assert_eq!(snapshot.entities[stairs].glyph, '>');
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let mut state = arena();
        state.dungeon.push(orc(Position::new(7, 7)));
        state.progression.gold = 33;
        let pos = state.player_position();
        state
            .equipment_bag
            .push(equipment_entity(pos, Equipment::new(Slot::Torso, 2, 1)));
        state.equip(0).unwrap();

        let json = state.save_to_json().unwrap();
        let loaded = GameState::load_from_json(&json).unwrap();

        assert_eq!(loaded.snapshot().unwrap(), state.snapshot().unwrap());
        assert_eq!(loaded.player_id, state.player_id);
        assert_eq!(loaded.dungeon.stairs_id, state.dungeon.stairs_id);
        assert!(loaded.visibility.is_visible(loaded.player_position()));
    }

    #[test]
    fn test_bad_indices_are_rejected() {
        let state = arena();
        let mut snapshot = state.snapshot().unwrap();
        snapshot.player_index = 99;
        assert!(matches!(
            GameState::from_snapshot(snapshot),
            Err(RougeError::LoadFailed(_))
        ));

        let mut snapshot = state.snapshot().unwrap();
        snapshot.stairs_index = Some(42);
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_equipped_gear_must_be_in_bag() {
        let state = arena();
        let mut snapshot = state.snapshot().unwrap();
        snapshot.equipped.weapon = Some(crate::game::new_entity_id());
        assert!(matches!(
            snapshot.validate(),
            Err(RougeError::LoadFailed(_))
        ));
    }

    #[test]
    fn test_ragged_grid_is_rejected() {
        let state = arena();
        let mut snapshot = state.snapshot().unwrap();
        snapshot.tiles[3].pop();
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_garbage_json() {
        assert!(matches!(
            GameState::load_from_json("{ not json"),
            Err(RougeError::LoadFailed(_))
        ));
        assert!(matches!(
            Snapshot::from_json("{\"version\": 1}"),
            Err(RougeError::LoadFailed(_))
        ));
    }
}
