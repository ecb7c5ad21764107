//! # User Interface Elements
//!
//! Stat bars and the text helpers the display uses to lay them out.

use crate::game::GameState;

/// Player numbers shown beside the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatBars {
    pub hp: i32,
    pub max_hp: i32,
    /// `None` for characters without a mana pool
    pub mana: Option<(i32, i32)>,
    pub xp: i32,
    pub xp_to_next: i32,
    pub gold: i32,
    pub depth: u32,
    pub level: u32,
}

impl StatBars {
    pub fn from_state(state: &GameState) -> Self {
        let Some(sheet) = state.character_sheet() else {
            return Self {
                depth: state.dungeon.depth,
                level: state.progression.level,
                ..Self::default()
            };
        };
        Self {
            hp: sheet.hp,
            max_hp: sheet.max_hp,
            mana: sheet.mana.zip(sheet.max_mana),
            xp: sheet.xp,
            xp_to_next: sheet.xp_to_next,
            gold: sheet.gold,
            depth: sheet.depth,
            level: sheet.level,
        }
    }
}

/// Draws a fixed-width bar such as `HP   [######----] 60/100`.
///
/// The filled part is rounded down, so a bar only looks full when the value is at its maximum.
pub fn render_bar(label: &str, value: i32, maximum: i32, width: usize) -> String {
    let filled = if maximum > 0 {
        let ratio = value.clamp(0, maximum) as f64 / maximum as f64;
        ((ratio * width as f64).floor() as usize).min(width)
    } else {
        0
    };
    format!(
        "{:<5}[{}{}] {}/{}",
        label,
        "#".repeat(filled),
        "-".repeat(width - filled),
        value,
        maximum
    )
}

/// Cuts a line to at most `width` characters.
pub fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::fixtures::arena;

    #[test]
    fn test_render_bar() {
        assert_eq!(render_bar("HP", 60, 100, 10), "HP   [######----] 60/100");
        assert_eq!(render_bar("XP", 0, 200, 4), "XP   [----] 0/200");
        assert_eq!(render_bar("HP", 5, 0, 3), "HP   [---] 5/0");
        assert_eq!(render_bar("HP", 150, 100, 4), "HP   [####] 150/100");
    }

    #[test]
    fn test_stat_bars_from_state() {
        let mut state = arena();
        state.progression.gold = 12;
        let bars = StatBars::from_state(&state);
        assert_eq!(bars.hp, crate::config::PLAYER_MAX_HP);
        assert_eq!(bars.mana, Some((20, 20)));
        assert_eq!(bars.xp_to_next, 350);
        assert_eq!(bars.gold, 12);
        assert_eq!(bars.depth, 1);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("You died!", 3), "You");
        assert_eq!(truncate("ok", 10), "ok");
    }
}
