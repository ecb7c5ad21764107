//! # Utilities Module
//!
//! Grid math and pathfinding shared by monster AI, the autopilot and generation.

pub mod math;
pub mod pathfinding;

pub use math::*;
pub use pathfinding::*;
