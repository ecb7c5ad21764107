//! # Rouge
//!
//! A turn-based dungeon crawler: the player descends through procedurally generated floors,
//! fights monsters, collects items and equipment, and grows in level until the periodic boss
//! floors stop them.
//!
//! ## Architecture Overview
//!
//! - **Game**: the simulation context ([`GameState`]), the flat facet-based [`Entity`] record,
//!   combat, monster AI, progression and the shadowcast field of view
//! - **Generation**: room-and-tunnel floors, fixed boss layouts, and the entity spawner whose
//!   stats scale with depth and player level
//! - **Rendering**: a per-frame [`FrameView`] for whatever draws the game, plus an ASCII renderer
//! - **Input**: the [`PlayerInterface`] seam through which blocking prompts (targeting, level-up
//!   choices) reach the player
//!
//! The simulation is single threaded and strictly turn sequential. Every mutation flows through
//! an explicitly passed `GameState`; nothing lives in globals.

pub mod game;
pub mod generation;
pub mod input;
pub mod rendering;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use input::*;
pub use rendering::*;

/// Core error type for the Rouge engine.
#[derive(thiserror::Error, Debug)]
pub enum RougeError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// A snapshot could not be applied
    #[error("Load failed: {0}")]
    LoadFailed(String),
}

/// Result type used throughout the Rouge codebase.
pub type RougeResult<T> = Result<T, RougeError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    use crate::{RougeError, RougeResult};
    use serde::{Deserialize, Serialize};

    /// Dungeon width in tiles
    pub const MAP_WIDTH: i32 = 80;

    /// Dungeon height in tiles
    pub const MAP_HEIGHT: i32 = 43;

    pub const ROOM_MIN_SIZE: i32 = 6;
    pub const ROOM_MAX_SIZE: i32 = 10;

    /// Candidate rooms attempted per normal floor
    pub const MAX_ROOMS: u32 = 30;

    /// Field of view radius around the player
    pub const TORCH_RADIUS: i32 = 10;

    /// Whether opaque tiles bordering the lit area are visible themselves
    pub const FOV_LIGHT_WALLS: bool = true;

    /// Inventory and equipment bag capacity
    pub const INVENTORY_CAPACITY: usize = 26;

    /// Number of message lines kept in the log
    pub const MESSAGE_LOG_CAPACITY: usize = 7;

    pub const LEVEL_UP_BASE: i32 = 200;
    pub const LEVEL_UP_FACTOR: i32 = 150;

    pub const HEAL_AMOUNT: i32 = 20;
    pub const MANA_AMOUNT: i32 = 10;
    pub const LIGHTNING_DAMAGE: i32 = 20;
    pub const LIGHTNING_RANGE: f64 = 5.0;
    pub const CONFUSE_RANGE: f64 = 8.0;
    pub const CONFUSE_NUM_TURNS: u32 = 10;
    pub const FIREBALL_RADIUS: f64 = 3.0;
    pub const FIREBALL_DAMAGE: i32 = 12;

    pub const PLAYER_MAX_HP: i32 = 100;
    pub const PLAYER_DEFENSE: i32 = 2;
    pub const PLAYER_POWER: i32 = 8;
    pub const PLAYER_MAX_MANA: i32 = 20;

    /// Tunable combat and item numbers carried by a running game.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Balance {
        pub heal_amount: i32,
        pub mana_amount: i32,
        pub lightning_damage: i32,
        pub lightning_range: f64,
        pub confuse_range: f64,
        pub confuse_turns: u32,
        pub fireball_radius: f64,
        pub fireball_damage: i32,
        pub torch_radius: i32,
        pub light_walls: bool,
        pub inventory_capacity: usize,
        pub level_up_base: i32,
        pub level_up_factor: i32,
    }

    impl Default for Balance {
        fn default() -> Self {
            Self {
                heal_amount: HEAL_AMOUNT,
                mana_amount: MANA_AMOUNT,
                lightning_damage: LIGHTNING_DAMAGE,
                lightning_range: LIGHTNING_RANGE,
                confuse_range: CONFUSE_RANGE,
                confuse_turns: CONFUSE_NUM_TURNS,
                fireball_radius: FIREBALL_RADIUS,
                fireball_damage: FIREBALL_DAMAGE,
                torch_radius: TORCH_RADIUS,
                light_walls: FOV_LIGHT_WALLS,
                inventory_capacity: INVENTORY_CAPACITY,
                level_up_base: LEVEL_UP_BASE,
                level_up_factor: LEVEL_UP_FACTOR,
            }
        }
    }

    impl Balance {
        /// Rejects numbers the turn loop cannot run with.
        ///
        /// The level-up threshold must stay positive at every level, otherwise a single turn
        /// would level up forever.
        pub fn validate(&self) -> RougeResult<()> {
            if self.inventory_capacity == 0 {
                return Err(RougeError::InvalidState(
                    "inventory capacity must be at least 1".to_string(),
                ));
            }
            if self.level_up_base <= 0 || self.level_up_factor < 0 {
                return Err(RougeError::InvalidState(format!(
                    "level-up threshold {} + {} * level is not always positive",
                    self.level_up_base, self.level_up_factor
                )));
            }
            let distances = [
                ("lightning range", self.lightning_range),
                ("confuse range", self.confuse_range),
                ("fireball radius", self.fireball_radius),
            ];
            if let Some((name, value)) = distances
                .iter()
                .find(|(_, value)| !value.is_finite() || *value < 0.0)
            {
                return Err(RougeError::InvalidState(format!("bad {}: {}", name, value)));
            }
            Ok(())
        }
    }

}
