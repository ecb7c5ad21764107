//! # World Representation
//!
//! One [`Dungeon`] per floor: the tile grid, the live entity list in render order, the stairs
//! and the depth counter. Descending replaces the dungeon wholesale.

use crate::game::{Entity, EntityId, Position};
use crate::{RougeError, RougeResult};
use serde::{Deserialize, Serialize};

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub blocked: bool,
    pub blocks_sight: bool,
    /// Set once the tile has been in the field of view; never cleared
    pub explored: bool,
}

impl Tile {
    /// Creates a tile whose sight blocking follows its movement blocking.
    pub fn new(blocked: bool) -> Self {
        Self {
            blocked,
            blocks_sight: blocked,
            explored: false,
        }
    }

    pub fn wall() -> Self {
        Self::new(true)
    }

    pub fn floor() -> Self {
        Self::new(false)
    }

    /// Overrides sight blocking independently of movement blocking.
    pub fn with_sight_blocking(mut self, blocks_sight: bool) -> Self {
        self.blocks_sight = blocks_sight;
        self
    }

    /// Marks the tile as seen. Exploration only ever turns on.
    pub fn mark_explored(&mut self) {
        self.explored = true;
    }
}

/// One dungeon floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dungeon {
    pub width: i32,
    pub height: i32,
    pub depth: u32,
    /// Row-major grid, indexed `tiles[y][x]`
    pub tiles: Vec<Vec<Tile>>,
    /// Live entities in render order; earlier entries draw beneath later ones
    pub entities: Vec<Entity>,
    pub stairs_id: Option<EntityId>,
    pub player_spawn: Position,
    /// Descent is refused while this is set
    pub boss_present: bool,
}

impl Dungeon {
    /// Creates a floor filled with solid rock.
    ///
    /// # Examples
    ///
    /// ```
    /// use rouge::{Dungeon, Position};
    ///
    /// let dungeon = Dungeon::new(20, 10, 1);
    /// assert!(dungeon.is_blocked(Position::new(5, 5)));
    /// assert!(dungeon.is_blocked(Position::new(-1, 0)));
    /// ```
    pub fn new(width: i32, height: i32, depth: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            depth,
            tiles: vec![vec![Tile::wall(); width as usize]; height as usize],
            entities: Vec::new(),
            stairs_id: None,
            player_spawn: Position::new(0, 0),
            boss_present: false,
        }
    }

    pub fn is_valid_position(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    pub fn get_tile(&self, pos: Position) -> Option<&Tile> {
        if !self.is_valid_position(pos) {
            return None;
        }
        self.tiles
            .get(pos.y as usize)
            .and_then(|row| row.get(pos.x as usize))
    }

    pub fn get_tile_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        if !self.is_valid_position(pos) {
            return None;
        }
        self.tiles
            .get_mut(pos.y as usize)
            .and_then(|row| row.get_mut(pos.x as usize))
    }

    /// Replaces the tile at `pos`.
    pub fn set_tile(&mut self, pos: Position, tile: Tile) -> RougeResult<()> {
        let slot = self.get_tile_mut(pos).ok_or_else(|| {
            RougeError::InvalidState(format!("position {:?} is outside the map", pos))
        })?;
        *slot = tile;
        Ok(())
    }

    /// Turns the tile at `pos` into floor, ignoring positions off the map.
    pub fn carve(&mut self, pos: Position) {
        if let Some(tile) = self.get_tile_mut(pos) {
            let explored = tile.explored;
            *tile = Tile::floor();
            tile.explored = explored;
        }
    }

    /// Whether sight is stopped at `pos`. Off-map positions block.
    pub fn blocks_sight(&self, pos: Position) -> bool {
        self.get_tile(pos).map(|t| t.blocks_sight).unwrap_or(true)
    }

    /// Whether the tile itself is impassable. Off-map positions are.
    pub fn is_wall(&self, pos: Position) -> bool {
        self.get_tile(pos).map(|t| t.blocked).unwrap_or(true)
    }

    /// A destination is blocked by its tile or by any movement-blocking entity on it.
    pub fn is_blocked(&self, pos: Position) -> bool {
        self.is_wall(pos)
            || self
                .entities
                .iter()
                .any(|e| e.blocks_movement && e.position == pos)
    }

    pub fn is_explored(&self, pos: Position) -> bool {
        self.get_tile(pos).map(|t| t.explored).unwrap_or(false)
    }

    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id == id)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Appends an entity so it draws above everything already placed.
    pub fn push(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.entities.push(entity);
        id
    }

    /// Inserts an entity at the bottom of the render order.
    pub fn push_to_back(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.entities.insert(0, entity);
        id
    }

    /// Moves an existing entity to the bottom of the render order.
    pub fn send_to_back(&mut self, id: EntityId) {
        if let Some(index) = self.index_of(id) {
            let entity = self.entities.remove(index);
            self.entities.insert(0, entity);
        }
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.index_of(id)?;
        Some(self.entities.remove(index))
    }

    pub fn entities_at(&self, pos: Position) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.position == pos)
    }

    /// The living fighter standing on `pos`, if any.
    pub fn fighter_at(&self, pos: Position) -> Option<EntityId> {
        self.entities
            .iter()
            .find(|e| e.position == pos && e.is_alive())
            .map(|e| e.id)
    }

    pub fn stairs(&self) -> Option<&Entity> {
        self.stairs_id.and_then(|id| self.entity(id))
    }

    /// Recomputes the boss gate from the living entities.
    pub fn refresh_boss_present(&mut self) {
        self.boss_present = self
            .entities
            .iter()
            .any(|e| e.fighter.as_ref().map(|f| f.is_boss && f.hp > 0).unwrap_or(false));
    }

    /// All floor positions on the map.
    pub fn floor_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();
        for (y, row) in self.tiles.iter().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                if !tile.blocked {
                    positions.push(Position::new(x as i32, y as i32));
                }
            }
        }
        positions
    }

    pub fn explored_count(&self) -> usize {
        self.tiles
            .iter()
            .flat_map(|row| row.iter())
            .filter(|tile| tile.explored)
            .count()
    }
}
