//! # Rendering Module
//!
//! Everything a renderer needs for one frame, captured from the game state without mutating it.
//!
//! [`FrameView::capture`] classifies each tile as hidden, remembered or visible, orders the
//! entities that may be drawn, and copies the message log and stat bars. [`AsciiDisplay`] turns a
//! frame into plain text for the headless binary and for tests.

pub mod display;
pub mod ui;

pub use display::*;
pub use ui::*;

use crate::game::{Color, GameState, Position};

/// How a single map cell is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileView {
    /// Never explored; not drawn at all
    Hidden,
    /// Explored earlier but out of sight; drawn dimmed
    Remembered { wall: bool },
    /// Inside the current field of view
    Visible { wall: bool },
}

impl TileView {
    pub fn is_displayable(self) -> bool {
        !matches!(self, TileView::Hidden)
    }
}

/// One entity in the render list.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEntity {
    pub position: Position,
    pub glyph: char,
    pub color: Color,
    pub name: String,
}

/// A snapshot of what should be on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    pub width: i32,
    pub height: i32,
    /// Row-major tile classification
    pub tiles: Vec<Vec<TileView>>,
    /// Drawn in order; later entries cover earlier ones on the same tile
    pub entities: Vec<RenderedEntity>,
    /// Oldest first
    pub messages: Vec<(String, Color)>,
    pub stats: StatBars,
}

impl FrameView {
    /// Captures the frame for the current game state.
    ///
    /// Entities appear while their tile is in view. Entities marked `always_visible` (the stairs)
    /// also appear on explored tiles outside the view. The player is always drawn last.
    pub fn capture(state: &GameState) -> Self {
        let dungeon = &state.dungeon;
        let mut tiles = Vec::with_capacity(dungeon.height as usize);
        for y in 0..dungeon.height {
            let mut row = Vec::with_capacity(dungeon.width as usize);
            for x in 0..dungeon.width {
                row.push(classify(state, Position::new(x, y)));
            }
            tiles.push(row);
        }

        let shown = |position: Position, always_visible: bool| {
            state.visibility.is_visible(position)
                || (always_visible && dungeon.is_explored(position))
        };
        let mut entities: Vec<RenderedEntity> = dungeon
            .entities
            .iter()
            .filter(|e| e.id != state.player_id && shown(e.position, e.always_visible))
            .map(|e| RenderedEntity {
                position: e.position,
                glyph: e.glyph,
                color: e.color,
                name: e.name.clone(),
            })
            .collect();
        if let Some(player) = state.player() {
            entities.push(RenderedEntity {
                position: player.position,
                glyph: player.glyph,
                color: player.color,
                name: player.name.clone(),
            });
        }

        let messages = state
            .messages
            .iter()
            .map(|m| (m.text.clone(), m.color()))
            .collect();

        Self {
            width: dungeon.width,
            height: dungeon.height,
            tiles,
            entities,
            messages,
            stats: StatBars::from_state(state),
        }
    }

    pub fn tile(&self, pos: Position) -> TileView {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width || pos.y >= self.height {
            return TileView::Hidden;
        }
        self.tiles[pos.y as usize][pos.x as usize]
    }

    /// The entity drawn on top at `pos`, if any.
    pub fn top_entity(&self, pos: Position) -> Option<&RenderedEntity> {
        self.entities.iter().rev().find(|e| e.position == pos)
    }
}

fn classify(state: &GameState, pos: Position) -> TileView {
    let wall = state.dungeon.blocks_sight(pos);
    if state.visibility.is_visible(pos) {
        TileView::Visible { wall }
    } else if state.dungeon.is_explored(pos) {
        TileView::Remembered { wall }
    } else {
        TileView::Hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::fixtures::{arena, orc};
    use crate::game::Tile;

    #[test]
    fn test_frame_classifies_tiles() {
        let state = arena();
        let frame = FrameView::capture(&state);

        assert_eq!(frame.tile(Position::new(3, 3)), TileView::Visible { wall: false });
        assert_eq!(frame.tile(Position::new(0, 0)), TileView::Visible { wall: true });
        assert_eq!(frame.tile(Position::new(-1, 4)), TileView::Hidden);
        assert_eq!(frame.tiles.len(), 12);
    }

    #[test]
    fn test_out_of_sight_entities_are_hidden() {
        let mut state = arena();
        for y in 1..11 {
            state.dungeon.tiles[y][6] = Tile::wall();
        }
        state.visibility.request_recompute();
        state.update_fov();
        state.dungeon.push(orc(Position::new(9, 3)));

        // the stairs tile was explored before the wall went up
        let frame = FrameView::capture(&state);
        assert!(frame.entities.iter().all(|e| e.name != "orc"));
        assert_eq!(frame.top_entity(Position::new(8, 8)).map(|e| e.glyph), Some('>'));
        assert!(matches!(
            frame.tile(Position::new(9, 3)),
            TileView::Remembered { .. }
        ));
    }

    #[test]
    fn test_player_drawn_last() {
        let mut state = arena();
        state.dungeon.push(orc(Position::new(5, 5)));
        let frame = FrameView::capture(&state);
        assert_eq!(frame.entities.last().map(|e| e.glyph), Some('@'));
        assert_eq!(frame.messages.len(), state.messages.len());
    }
}
