//! # Visibility
//!
//! Radius-limited field of view by recursive shadowcasting over the sight-blocking map, and the
//! per-floor bookkeeping around it. Anything seen is marked explored on the dungeon; explored
//! flags are the only visibility state that outlives a recompute.

use crate::game::{Dungeon, Position};
use std::collections::HashSet;

/// Slope as a rational `y / x`, compared without division.
#[derive(Debug, Clone, Copy)]
struct Slope {
    y: i32,
    x: i32,
}

impl Slope {
    fn new(y: i32, x: i32) -> Self {
        Self { y, x }
    }

    fn greater_or_equal(&self, other: &Slope) -> bool {
        self.y * other.x >= other.y * self.x
    }

    fn greater_than(&self, other: &Slope) -> bool {
        self.y * other.x > other.y * self.x
    }
}

/// Maps octant-local `(x, y)` (x along the primary axis) to a grid position.
fn transform_octant(origin: Position, x: i32, y: i32, octant: u8) -> Position {
    match octant {
        0 => Position::new(origin.x + x, origin.y - y),
        1 => Position::new(origin.x + y, origin.y - x),
        2 => Position::new(origin.x - y, origin.y - x),
        3 => Position::new(origin.x - x, origin.y - y),
        4 => Position::new(origin.x - x, origin.y + y),
        5 => Position::new(origin.x - y, origin.y + x),
        6 => Position::new(origin.x + y, origin.y + x),
        7 => Position::new(origin.x + x, origin.y + y),
        _ => origin,
    }
}

struct OctantScan<'a> {
    dungeon: &'a Dungeon,
    origin: Position,
    radius: i32,
    light_walls: bool,
    visible: HashSet<Position>,
}

impl OctantScan<'_> {
    fn within_radius(&self, pos: Position) -> bool {
        let dx = pos.x - self.origin.x;
        let dy = pos.y - self.origin.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }

    fn scan(&mut self, dist: i32, start: Slope, end: Slope, octant: u8) {
        if dist > self.radius {
            return;
        }
        let mut blocked = false;
        let mut current_start = start;
        for y in (0..=dist).rev() {
            let top = Slope::new(2 * y + 1, 2 * dist - 1);
            let bottom = Slope::new(2 * y - 1, 2 * dist + 1);
            if !(current_start.greater_or_equal(&bottom) && top.greater_than(&end)) {
                continue;
            }

            let pos = transform_octant(self.origin, dist, y, octant);
            let opaque = self.dungeon.blocks_sight(pos);
            if self.dungeon.is_valid_position(pos)
                && self.within_radius(pos)
                && (!opaque || self.light_walls)
            {
                self.visible.insert(pos);
            }

            if opaque {
                if !blocked {
                    self.scan(dist + 1, current_start, top, octant);
                    blocked = true;
                }
                current_start = bottom;
            } else if blocked {
                blocked = false;
            }
        }
        if !blocked {
            self.scan(dist + 1, current_start, end, octant);
        }
    }
}

/// Computes the tiles visible from `origin`.
///
/// A non-positive radius means unlimited. With `light_walls` set, opaque tiles on the edge of the
/// lit area are visible themselves.
///
/// # Examples
///
/// ```
/// use rouge::{compute_fov, Dungeon, Position};
///
/// let mut dungeon = Dungeon::new(9, 9, 1);
/// for y in 1..8 {
///     for x in 1..8 {
///         dungeon.carve(Position::new(x, y));
///     }
/// }
/// let visible = compute_fov(&dungeon, Position::new(4, 4), 10, true);
/// assert!(visible.contains(&Position::new(1, 1)));
/// assert!(visible.contains(&Position::new(0, 4))); // lit wall
/// ```
pub fn compute_fov(
    dungeon: &Dungeon,
    origin: Position,
    radius: i32,
    light_walls: bool,
) -> HashSet<Position> {
    let radius = if radius <= 0 {
        dungeon.width.max(dungeon.height)
    } else {
        radius
    };

    let mut scan = OctantScan {
        dungeon,
        origin,
        radius,
        light_walls,
        visible: HashSet::new(),
    };
    if dungeon.is_valid_position(origin) {
        scan.visible.insert(origin);
    }
    for octant in 0..8 {
        scan.scan(1, Slope::new(1, 1), Slope::new(0, 1), octant);
    }
    scan.visible
}

/// Current field of view for one floor.
///
/// Derived state: rebuilt from the dungeon after a load or a floor change rather than persisted.
#[derive(Debug, Clone, Default)]
pub struct Visibility {
    visible: HashSet<Position>,
    needs_recompute: bool,
}

impl Visibility {
    /// Creates an empty field of view that will be computed on the next update.
    pub fn new() -> Self {
        Self {
            visible: HashSet::new(),
            needs_recompute: true,
        }
    }

    /// Flags the field of view for recomputation on the next update.
    pub fn request_recompute(&mut self) {
        self.needs_recompute = true;
    }

    pub fn needs_recompute(&self) -> bool {
        self.needs_recompute
    }

    /// Recomputes only if flagged. Returns whether a recompute happened.
    pub fn update(
        &mut self,
        dungeon: &mut Dungeon,
        origin: Position,
        radius: i32,
        light_walls: bool,
    ) -> bool {
        if !self.needs_recompute {
            return false;
        }
        self.recompute(dungeon, origin, radius, light_walls);
        true
    }

    /// Recomputes unconditionally and marks every visible tile explored.
    pub fn recompute(
        &mut self,
        dungeon: &mut Dungeon,
        origin: Position,
        radius: i32,
        light_walls: bool,
    ) -> &HashSet<Position> {
        self.visible = compute_fov(dungeon, origin, radius, light_walls);
        for &pos in &self.visible {
            if let Some(tile) = dungeon.get_tile_mut(pos) {
                tile.mark_explored();
            }
        }
        self.needs_recompute = false;
        log::debug!(
            "field of view from {:?}: {} tiles visible",
            origin,
            self.visible.len()
        );
        &self.visible
    }

    pub fn is_visible(&self, pos: Position) -> bool {
        self.visible.contains(&pos)
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Drops the current field of view, e.g. when the floor is replaced.
    pub fn reset(&mut self) {
        self.visible.clear();
        self.needs_recompute = true;
    }
}
