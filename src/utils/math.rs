//! # Game Mathematics
//!
//! Small helpers for grid movement and message text.

use crate::game::Position;

/// One grid step from `from` toward `to`.
///
/// The offset is normalized and each component rounded, so the result is one of the eight
/// neighbours (or no movement when the points coincide).
///
/// # Examples
///
/// ```
/// use rouge::utils::step_towards;
/// use rouge::Position;
///
/// assert_eq!(step_towards(Position::new(0, 0), Position::new(10, 1)), Position::new(1, 0));
/// assert_eq!(step_towards(Position::new(0, 0), Position::new(4, 4)), Position::new(1, 1));
/// assert_eq!(step_towards(Position::new(2, 2), Position::new(2, 2)), Position::new(0, 0));
/// ```
pub fn step_towards(from: Position, to: Position) -> Position {
    let dx = (to.x - from.x) as f64;
    let dy = (to.y - from.y) as f64;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance == 0.0 {
        return Position::new(0, 0);
    }
    Position::new(
        (dx / distance).round() as i32,
        (dy / distance).round() as i32,
    )
}

/// Upper-cases the first character.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
