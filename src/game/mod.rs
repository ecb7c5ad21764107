//! # Game Module
//!
//! Core simulation: the dungeon grid, entities and their facets, the turn loop, combat,
//! monster AI, progression and field of view.
//!
//! This module contains the fundamental building blocks of the game:
//! - The simulation context ([`GameState`]) threaded through every turn
//! - The dungeon grid and live entity list ([`Dungeon`])
//! - Flat entities with optional Fighter/AI/Item/Equipment facets
//! - Snapshots for an external persistence collaborator

pub mod actions;
pub mod ai;
pub mod autoexplore;
pub mod combat;
pub mod entities;
pub mod inventory;
pub mod messages;
pub mod progression;
pub mod snapshot;
pub mod state;
pub mod visibility;
pub mod world;

pub use actions::*;
pub use autoexplore::*;
pub use entities::*;
pub use messages::*;
pub use progression::*;
pub use snapshot::*;
pub use state::*;
pub use visibility::*;
pub use world::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tile coordinate. `x` grows east, `y` grows south, and (0, 0) is the top-left corner.
///
/// # Examples
///
/// ```
/// use rouge::Position;
///
/// let player = Position::new(10, 5);
/// assert!(player.adjacent_positions().contains(&Position::new(11, 6)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Straight-line distance, used for spell ranges and the fireball blast.
    ///
    /// ```
    /// use rouge::Position;
    ///
    /// assert_eq!(Position::new(0, 0).euclidean_distance(Position::new(3, 4)), 5.0);
    /// ```
    pub fn euclidean_distance(self, other: Position) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        dx.hypot(dy)
    }

    /// Turns needed to walk between two tiles on an open floor.
    pub fn chebyshev_distance(self, other: Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// The eight tiles one step away, in [`Direction::ALL`] order.
    pub fn adjacent_positions(self) -> Vec<Position> {
        Direction::ALL.iter().map(|d| self + d.to_delta()).collect()
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// One step of player or monster movement. Diagonal steps cost the same turn as straight ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Northeast,
    Northwest,
    Southeast,
    Southwest,
}

impl Direction {
    /// Reading order around a tile: the row above, the two sides, then the row below.
    pub const ALL: [Direction; 8] = [
        Direction::Northwest,
        Direction::North,
        Direction::Northeast,
        Direction::West,
        Direction::East,
        Direction::Southwest,
        Direction::South,
        Direction::Southeast,
    ];

    /// The offset this step adds to a position.
    ///
    /// ```
    /// use rouge::{Direction, Position};
    ///
    /// assert_eq!(Direction::Southwest.to_delta(), Position::new(-1, 1));
    /// ```
    pub fn to_delta(self) -> Position {
        let (dx, dy) = match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::Northeast => (1, -1),
            Direction::Northwest => (-1, -1),
            Direction::Southeast => (1, 1),
            Direction::Southwest => (-1, 1),
        };
        Position::new(dx, dy)
    }

    /// The step matching a one-tile offset; `None` for a zero or longer offset.
    pub fn from_delta(delta: Position) -> Option<Direction> {
        Direction::ALL.into_iter().find(|d| d.to_delta() == delta)
    }
}

/// Unique identifier for entities, stable across floors and inventories.
pub type EntityId = Uuid;

/// Creates a new unique entity ID.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_distances() {
        let pos1 = Position::new(0, 0);
        let pos2 = Position::new(3, 4);
        assert_eq!(pos1.euclidean_distance(pos2), 5.0);
        assert_eq!(pos1.chebyshev_distance(pos2), 4);
    }

    #[test]
    fn test_position_adjacent() {
        let pos = Position::new(5, 5);
        let adjacent = pos.adjacent_positions();
        assert_eq!(adjacent.len(), 8);
        assert!(adjacent.contains(&Position::new(4, 4)));
        assert!(adjacent.contains(&Position::new(6, 6)));
        assert!(!adjacent.contains(&pos));
    }

    #[test]
    fn test_adjacent_positions_follow_direction_order() {
        let pos = Position::new(5, 5);
        let adjacent = pos.adjacent_positions();
        assert_eq!(adjacent.first(), Some(&Position::new(4, 4)));
        assert_eq!(adjacent.last(), Some(&Position::new(6, 6)));
    }

    #[test]
    fn test_position_arithmetic() {
        let pos1 = Position::new(5, 10);
        let pos2 = Position::new(3, 2);
        assert_eq!(pos1 + pos2, Position::new(8, 12));
        assert_eq!(pos1 - pos2, Position::new(2, 8));
    }

    #[test]
    fn test_direction_delta_round_trip() {
        for direction in Direction::ALL {
            assert_eq!(Direction::from_delta(direction.to_delta()), Some(direction));
        }
        assert_eq!(Direction::from_delta(Position::new(2, 0)), None);
    }

    #[test]
    fn test_entity_id_uniqueness() {
        let id1 = new_entity_id();
        let id2 = new_entity_id();
        assert_ne!(id1, id2);
    }
}
