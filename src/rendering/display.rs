//! # Display Management
//!
//! Text rendering of a [`FrameView`]: the map viewport, a stat panel and the message area.
//!
//! Output is plain ASCII by default. With colours enabled every glyph is wrapped in a 24-bit ANSI
//! escape, and remembered tiles are dimmed the way a graphical renderer would dim them.

use crate::config;
use crate::game::{Color, Position};
use crate::rendering::{render_bar, truncate, FrameView, TileView};

/// Brightness kept by tiles that are explored but out of sight.
const REMEMBERED_DIM: f64 = 0.4;

/// Text display manager for the game.
#[derive(Debug, Clone)]
pub struct AsciiDisplay {
    /// Map viewport offset x in tiles
    pub viewport_x: i32,
    /// Map viewport offset y in tiles
    pub viewport_y: i32,
    /// Map viewport width in tiles
    pub map_width: i32,
    /// Map viewport height in tiles
    pub map_height: i32,
    /// Width of the stat bars in characters
    pub bar_width: usize,
    /// Wrap glyphs in ANSI colour escapes
    pub use_color: bool,
}

impl AsciiDisplay {
    /// Creates a display whose viewport covers a whole floor.
    ///
    /// # Examples
    ///
    /// ```
    /// use rouge::{AsciiDisplay, FrameView, GameState};
    ///
    /// let state = GameState::new_game(11).unwrap();
    /// let text = AsciiDisplay::new().render(&FrameView::capture(&state));
    /// assert!(text.contains('@'));
    /// ```
    pub fn new() -> Self {
        Self {
            viewport_x: 0,
            viewport_y: 0,
            map_width: config::MAP_WIDTH,
            map_height: config::MAP_HEIGHT,
            bar_width: 20,
            use_color: false,
        }
    }

    /// Restricts the map to a `width` x `height` window that follows the player.
    pub fn with_viewport(mut self, width: i32, height: i32) -> Self {
        self.map_width = width.max(1);
        self.map_height = height.max(1);
        self
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    /// Renders the complete screen as text, one line per row.
    pub fn render(&mut self, frame: &FrameView) -> String {
        if let Some(player) = frame.entities.last() {
            self.center_viewport_on_position(player.position, frame);
        }

        let mut lines = self.render_map(frame);
        lines.push(String::new());
        lines.extend(self.render_ui(frame));
        lines.push(String::new());
        lines.extend(self.render_messages(frame));
        lines.join("\n")
    }

    /// Centers the viewport on the given position, clamped to the floor edges.
    pub fn center_viewport_on_position(&mut self, position: Position, frame: &FrameView) {
        let max_x = (frame.width - self.map_width).max(0);
        let max_y = (frame.height - self.map_height).max(0);
        self.viewport_x = (position.x - self.map_width / 2).clamp(0, max_x);
        self.viewport_y = (position.y - self.map_height / 2).clamp(0, max_y);
    }

    fn render_map(&self, frame: &FrameView) -> Vec<String> {
        let rows = self.map_height.min(frame.height);
        let columns = self.map_width.min(frame.width);
        let mut lines = Vec::with_capacity(rows as usize);

        for screen_y in 0..rows {
            let mut line = String::new();
            for screen_x in 0..columns {
                let world_pos = Position::new(self.viewport_x + screen_x, self.viewport_y + screen_y);
                let view = frame.tile(world_pos);
                let (glyph, color) = match frame.top_entity(world_pos) {
                    Some(entity) => (entity.glyph, entity.color),
                    None => self.get_tile_display_data(view),
                };
                let color = match view {
                    TileView::Remembered { .. } => dim(color),
                    _ => color,
                };
                self.push_glyph(&mut line, glyph, color);
            }
            lines.push(line);
        }
        lines
    }

    /// Gets the display character and color for a tile classification.
    fn get_tile_display_data(&self, view: TileView) -> (char, Color) {
        match view {
            TileView::Hidden => (' ', Color::rgb(0, 0, 0)),
            TileView::Remembered { wall: true } | TileView::Visible { wall: true } => {
                ('#', Color::rgb(130, 110, 50))
            }
            TileView::Remembered { wall: false } | TileView::Visible { wall: false } => {
                ('.', Color::rgb(200, 180, 50))
            }
        }
    }

    fn render_ui(&self, frame: &FrameView) -> Vec<String> {
        let stats = &frame.stats;
        let mut lines = vec![
            format!(
                "Depth {}  Level {}  Gold {}",
                stats.depth, stats.level, stats.gold
            ),
            render_bar("HP", stats.hp, stats.max_hp, self.bar_width),
        ];
        if let Some((mana, max_mana)) = stats.mana {
            lines.push(render_bar("MP", mana, max_mana, self.bar_width));
        }
        lines.push(render_bar("XP", stats.xp, stats.xp_to_next, self.bar_width));
        lines
    }

    fn render_messages(&self, frame: &FrameView) -> Vec<String> {
        let width = self.map_width.max(1) as usize;
        frame
            .messages
            .iter()
            .map(|(text, color)| {
                let text = truncate(text, width);
                if self.use_color {
                    format!("{}{}", ansi(*color), text) + ANSI_RESET
                } else {
                    text
                }
            })
            .collect()
    }

    fn push_glyph(&self, line: &mut String, glyph: char, color: Color) {
        if self.use_color && glyph != ' ' {
            line.push_str(&ansi(color));
            line.push(glyph);
            line.push_str(ANSI_RESET);
        } else {
            line.push(glyph);
        }
    }
}

impl Default for AsciiDisplay {
    fn default() -> Self {
        Self::new()
    }
}

const ANSI_RESET: &str = "\x1b[0m";

fn ansi(color: Color) -> String {
    format!("\x1b[38;2;{};{};{}m", color.r, color.g, color.b)
}

fn dim(color: Color) -> Color {
    let scale = |c: u8| (c as f64 * REMEMBERED_DIM) as u8;
    Color::rgb(scale(color.r), scale(color.g), scale(color.b))
}
