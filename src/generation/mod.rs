//! # Generation Module
//!
//! Procedural content generation: floor layouts, monsters, items and gear.
//!
//! A floor is built by the [`DungeonGenerator`]; every accepted room is handed to the spawner
//! ([`encounters`] for monsters, [`items`] for loot) before the next room is tried. Spawned
//! stats scale with depth and player level through [`crate::game::progression`].

pub mod dungeon;
pub mod encounters;
pub mod items;

pub use dungeon::*;
pub use encounters::*;
pub use items::*;

use crate::config;
use crate::game::{Dungeon, Position};
use crate::{RougeError, RougeResult};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Configuration for procedural generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible games
    pub seed: u64,
    pub width: i32,
    pub height: i32,
    pub min_room_size: i32,
    pub max_room_size: i32,
    /// Candidate rooms tried on a normal floor
    pub max_rooms: u32,
    /// Boss layout on depths divisible by this
    pub boss_floor_period: u32,
    /// Miniboss candidates on depths divisible by this (but not by the boss period)
    pub miniboss_floor_period: u32,
    /// Probability that a miniboss candidate floor actually gets one
    pub miniboss_chance: f64,
}

impl GenerationConfig {
    /// Creates the standard configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use rouge::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(7);
    /// assert_eq!(config.width, 80);
    /// assert!(config.max_room_size >= config.min_room_size);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: config::MAP_WIDTH,
            height: config::MAP_HEIGHT,
            min_room_size: config::ROOM_MIN_SIZE,
            max_room_size: config::ROOM_MAX_SIZE,
            max_rooms: config::MAX_ROOMS,
            boss_floor_period: 10,
            miniboss_floor_period: 5,
            miniboss_chance: 1.0,
        }
    }

    /// Creates a configuration for testing with smaller, simpler levels.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            width: 40,
            height: 24,
            min_room_size: 4,
            max_room_size: 7,
            max_rooms: 12,
            ..Self::new(seed)
        }
    }

    pub fn is_boss_floor(&self, depth: u32) -> bool {
        self.boss_floor_period > 0 && depth > 0 && depth % self.boss_floor_period == 0
    }

    pub fn is_miniboss_floor(&self, depth: u32) -> bool {
        self.miniboss_floor_period > 0
            && depth > 0
            && depth % self.miniboss_floor_period == 0
            && !self.is_boss_floor(depth)
    }

    /// Rejects layouts the generator cannot carve.
    ///
    /// Rooms need an interior, the largest room must fit inside the border, and the boss
    /// layout's left room (a fifth of the width) must be at least as wide as a small room.
    pub fn validate(&self) -> RougeResult<()> {
        if self.min_room_size < 3 || self.max_room_size < self.min_room_size {
            return Err(RougeError::InvalidState(format!(
                "room sizes {}..={} are unusable",
                self.min_room_size, self.max_room_size
            )));
        }
        let smallest_side = self.max_room_size + 2;
        if self.width < smallest_side.max(5 * self.min_room_size) || self.height < smallest_side {
            return Err(RougeError::InvalidState(format!(
                "map {}x{} is too small for rooms up to {}",
                self.width, self.height, self.max_room_size
            )));
        }
        if !(0.0..=1.0).contains(&self.miniboss_chance) {
            return Err(RougeError::InvalidState(format!(
                "miniboss chance {} is not a probability",
                self.miniboss_chance
            )));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// What a floor is being generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorPlan {
    pub depth: u32,
    pub player_level: u32,
}

impl FloorPlan {
    pub fn new(depth: u32, player_level: u32) -> Self {
        Self {
            depth: depth.max(1),
            player_level: player_level.max(1),
        }
    }
}

/// Axis-aligned room rectangle. Only the interior `(x1, x2) x (y1, y2)` is carved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Room {
    /// Creates a room from its top-left corner and size.
    ///
    /// # Examples
    ///
    /// ```
    /// use rouge::{Position, Room};
    ///
    /// let room = Room::new(5, 5, 10, 8);
    /// assert_eq!(room.center(), Position::new(10, 9));
    /// assert!(room.contains(Position::new(7, 7)));
    /// assert!(!room.contains(Position::new(5, 5))); // wall
    /// ```
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    /// Integer midpoint.
    pub fn center(&self) -> Position {
        Position::new((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    /// Bounding-box overlap, inclusive on all four edges.
    pub fn intersects(&self, other: &Room) -> bool {
        self.x1 <= other.x2 && self.x2 >= other.x1 && self.y1 <= other.y2 && self.y2 >= other.y1
    }

    /// Whether `pos` is a carved interior tile.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x > self.x1 && pos.x < self.x2 && pos.y > self.y1 && pos.y < self.y2
    }

    /// All carved interior positions.
    pub fn floor_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();
        for y in (self.y1 + 1)..self.y2 {
            for x in (self.x1 + 1)..self.x2 {
                positions.push(Position::new(x, y));
            }
        }
        positions
    }

}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content for the given floor.
    fn generate(&self, plan: &FloorPlan, rng: &mut StdRng) -> RougeResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T) -> RougeResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;
    use rand::SeedableRng;

    /// The run's single random stream: every floor, spawn roll and confused step draws from it.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }

    /// Stream for a game resumed from a save, offset by the turn so it does not replay the
    /// opening rolls.
    pub fn resume_rng(seed: u64, turn_number: u64) -> StdRng {
        StdRng::seed_from_u64(seed ^ turn_number)
    }

    /// Rejects floors without any floor tiles.
    pub fn validate_dungeon(dungeon: &Dungeon) -> RougeResult<()> {
        let floor_count = dungeon
            .tiles
            .iter()
            .flat_map(|row| row.iter())
            .filter(|tile| !tile.blocked)
            .count();

        if floor_count == 0 {
            return Err(RougeError::GenerationFailed(
                "Level has no floor tiles".to_string(),
            ));
        }

        if !dungeon.is_valid_position(dungeon.player_spawn) || dungeon.is_wall(dungeon.player_spawn) {
            return Err(RougeError::GenerationFailed(format!(
                "Player spawn {:?} is not on a floor tile",
                dungeon.player_spawn
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generation_config_creation() {
        let config = GenerationConfig::new(12345);
        assert_eq!(config.seed, 12345);
        assert_eq!((config.width, config.height), (80, 43));
        assert_eq!((config.min_room_size, config.max_room_size), (6, 10));
        assert_eq!(config.max_rooms, 30);
    }

    #[test]
    fn test_floor_kinds() {
        let config = GenerationConfig::new(1);
        assert!(config.is_boss_floor(10));
        assert!(config.is_boss_floor(20));
        assert!(!config.is_boss_floor(5));
        assert!(config.is_miniboss_floor(5));
        assert!(config.is_miniboss_floor(15));
        assert!(!config.is_miniboss_floor(10));
        assert!(!config.is_miniboss_floor(3));
    }

    #[test]
    fn test_config_validation() {
        assert!(GenerationConfig::new(1).validate().is_ok());
        assert!(GenerationConfig::for_testing(1).validate().is_ok());

        let cramped = GenerationConfig {
            width: 8,
            height: 8,
            ..GenerationConfig::new(1)
        };
        assert!(matches!(cramped.validate(), Err(RougeError::InvalidState(_))));

        let inverted = GenerationConfig {
            min_room_size: 9,
            max_room_size: 6,
            ..GenerationConfig::new(1)
        };
        assert!(inverted.validate().is_err());

        let odds = GenerationConfig {
            miniboss_chance: 1.5,
            ..GenerationConfig::new(1)
        };
        assert!(odds.validate().is_err());
    }

    #[test]
    fn test_room_geometry() {
        let room = Room::new(5, 5, 10, 8);
        assert_eq!((room.x2, room.y2), (15, 13));
        assert_eq!(room.center(), Position::new(10, 9));

        assert!(room.contains(Position::new(6, 6)));
        assert!(room.contains(Position::new(14, 12)));
        assert!(!room.contains(Position::new(15, 12)));
        assert_eq!(room.floor_positions().len(), 9 * 7);
    }

    #[test]
    fn test_room_intersection_is_inclusive() {
        let room1 = Room::new(0, 0, 5, 5);
        let touching = Room::new(5, 0, 5, 5); // shares the x = 5 edge
        let apart = Room::new(6, 0, 5, 5);
        let overlapping = Room::new(2, 2, 5, 5);

        assert!(room1.intersects(&touching));
        assert!(touching.intersects(&room1));
        assert!(room1.intersects(&overlapping));
        assert!(!room1.intersects(&apart));
        assert!(!apart.intersects(&room1));
    }

    #[test]
    fn test_room_floor_positions_unique() {
        let room = Room::new(1, 1, 6, 6);
        let floor: HashSet<_> = room.floor_positions().into_iter().collect();
        assert_eq!(floor.len(), 25);
        assert!(floor.iter().all(|p| room.contains(*p)));
    }

    #[test]
    fn test_validate_dungeon() {
        let mut dungeon = Dungeon::new(10, 10, 1);
        assert!(utils::validate_dungeon(&dungeon).is_err());

        dungeon.carve(Position::new(5, 5));
        dungeon.player_spawn = Position::new(5, 5);
        assert!(utils::validate_dungeon(&dungeon).is_ok());

        dungeon.player_spawn = Position::new(1, 1);
        assert!(utils::validate_dungeon(&dungeon).is_err());
    }
}
