//! # Dungeon Generation
//!
//! Room-and-tunnel floors plus the fixed two-room layout used on boss floors.
//!
//! Normal floors try a fixed number of random rooms, keep the ones that do not touch an
//! already accepted room, and join each new room to the previous one with an L-shaped tunnel.
//! The spawner runs on each accepted room before the next attempt, and the stairs go in the
//! centre of the last room.

use crate::game::{Dungeon, Entity, Position};
use crate::generation::{
    populate_room, spawn_boss, utils, FloorPlan, GenerationConfig, Generator, Room, BOSS,
    MINIBOSS,
};
use crate::RougeResult;
use rand::{rngs::StdRng, Rng};

/// Floor generator driven by a [`GenerationConfig`].
#[derive(Debug, Clone)]
pub struct DungeonGenerator {
    pub config: GenerationConfig,
}

impl DungeonGenerator {
    /// Creates a generator for the given configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use rouge::{DungeonGenerator, FloorPlan, GenerationConfig, Generator};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let generator = DungeonGenerator::new(GenerationConfig::new(1));
    /// let mut rng = StdRng::seed_from_u64(1);
    /// let dungeon = generator.generate(&FloorPlan::new(1, 1), &mut rng).unwrap();
    /// assert!(dungeon.stairs().is_some());
    /// ```
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    /// Random candidate room fully inside the map.
    fn room_candidate(&self, rng: &mut StdRng) -> Room {
        let config = &self.config;
        let max_size = config.max_room_size.max(config.min_room_size);
        let width = rng.gen_range(config.min_room_size..=max_size);
        let height = rng.gen_range(config.min_room_size..=max_size);
        let x = rng.gen_range(0..(config.width - width - 1).max(1));
        let y = rng.gen_range(0..(config.height - height - 1).max(1));
        Room::new(x, y, width, height)
    }

    /// Carves the interior of a room.
    pub fn carve_room(dungeon: &mut Dungeon, room: &Room) {
        for pos in room.floor_positions() {
            dungeon.carve(pos);
        }
    }

    pub fn carve_h_tunnel(dungeon: &mut Dungeon, x1: i32, x2: i32, y: i32) {
        for x in x1.min(x2)..=x1.max(x2) {
            dungeon.carve(Position::new(x, y));
        }
    }

    pub fn carve_v_tunnel(dungeon: &mut Dungeon, y1: i32, y2: i32, x: i32) {
        for y in y1.min(y2)..=y1.max(y2) {
            dungeon.carve(Position::new(x, y));
        }
    }

    /// Joins two points with an L-shaped tunnel.
    pub fn carve_l_tunnel(dungeon: &mut Dungeon, from: Position, to: Position, horizontal_first: bool) {
        if horizontal_first {
            Self::carve_h_tunnel(dungeon, from.x, to.x, from.y);
            Self::carve_v_tunnel(dungeon, from.y, to.y, to.x);
        } else {
            Self::carve_v_tunnel(dungeon, from.y, to.y, from.x);
            Self::carve_h_tunnel(dungeon, from.x, to.x, to.y);
        }
    }

    /// Places, carves, connects and populates rooms. Returns the accepted rooms in order.
    fn build_normal_floor(
        &self,
        dungeon: &mut Dungeon,
        plan: &FloorPlan,
        rng: &mut StdRng,
    ) -> Vec<Room> {
        let mut rooms: Vec<Room> = Vec::new();

        for _ in 0..self.config.max_rooms {
            let room = self.room_candidate(rng);
            if rooms.iter().any(|other| room.intersects(other)) {
                continue;
            }

            Self::carve_room(dungeon, &room);
            let center = room.center();
            match rooms.last() {
                None => dungeon.player_spawn = center,
                Some(previous) => {
                    let horizontal_first = rng.gen_bool(0.5);
                    Self::carve_l_tunnel(dungeon, previous.center(), center, horizontal_first);
                }
            }

            populate_room(dungeon, &room, plan, Some(dungeon.player_spawn), rng);
            rooms.push(room);
        }

        if rooms.is_empty() {
            // Every candidate is checked against an empty list first, so only a zero room cap
            // gets here.
            let room = self.room_candidate(rng);
            Self::carve_room(dungeon, &room);
            dungeon.player_spawn = room.center();
            rooms.push(room);
        }
        if rooms.len() == 1 {
            log::warn!("depth {} generated a single room", plan.depth);
        }

        rooms
    }

    /// Tall left room, wide right room, one straight tunnel; the boss waits on the right.
    fn build_boss_floor(
        &self,
        dungeon: &mut Dungeon,
        plan: &FloorPlan,
        rng: &mut StdRng,
    ) -> Vec<Room> {
        let width = self.config.width;
        let height = self.config.height;
        let left = Room::new(1, 1, width / 5, height - 2);
        let right = Room::new(width / 2, 1, width / 2 - 2, height - 2);

        Self::carve_room(dungeon, &left);
        dungeon.player_spawn = left.center();
        populate_room(dungeon, &left, plan, Some(dungeon.player_spawn), rng);

        Self::carve_room(dungeon, &right);
        Self::carve_h_tunnel(dungeon, left.center().x, right.center().x, left.center().y);
        let lair = right.center();
        dungeon.push(spawn_boss(&BOSS, plan, lair, rng));
        populate_room(dungeon, &right, plan, Some(dungeon.player_spawn), rng);

        vec![left, right]
    }

    fn place_miniboss(&self, dungeon: &mut Dungeon, plan: &FloorPlan, room: &Room, rng: &mut StdRng) {
        let lair = room.center();
        if lair == dungeon.player_spawn {
            return;
        }
        // The lair tile may already hold a spawned monster; clear it for the miniboss.
        dungeon
            .entities
            .retain(|e| !(e.position == lair && e.blocks_movement));
        dungeon.push(spawn_boss(&MINIBOSS, plan, lair, rng));
    }
}

impl Generator<Dungeon> for DungeonGenerator {
    fn generate(&self, plan: &FloorPlan, rng: &mut StdRng) -> RougeResult<Dungeon> {
        let mut dungeon = Dungeon::new(self.config.width, self.config.height, plan.depth);

        let rooms = if self.config.is_boss_floor(plan.depth) {
            self.build_boss_floor(&mut dungeon, plan, rng)
        } else {
            let rooms = self.build_normal_floor(&mut dungeon, plan, rng);
            if self.config.is_miniboss_floor(plan.depth)
                && rng.gen_bool(self.config.miniboss_chance.clamp(0.0, 1.0))
            {
                if let Some(last) = rooms.last() {
                    self.place_miniboss(&mut dungeon, plan, last, rng);
                }
            }
            rooms
        };

        if let Some(last) = rooms.last() {
            let stairs = Entity::stairs(last.center());
            dungeon.stairs_id = Some(dungeon.push(stairs));
        }
        dungeon.refresh_boss_present();

        self.validate(&dungeon)?;
        log::info!(
            "{} built depth {} with {} rooms and {} entities",
            self.generator_type(),
            plan.depth,
            rooms.len(),
            dungeon.entities.len()
        );
        Ok(dungeon)
    }

    fn validate(&self, dungeon: &Dungeon) -> RougeResult<()> {
        utils::validate_dungeon(dungeon)
    }

    fn generator_type(&self) -> &'static str {
        "DungeonGenerator"
    }
}

impl Default for DungeonGenerator {
    fn default() -> Self {
        Self::new(GenerationConfig::default())
    }
}

/// Rooms accepted for a floor, exposed for layout checks.
pub fn generate_rooms(
    config: &GenerationConfig,
    plan: &FloorPlan,
    rng: &mut StdRng,
) -> (Dungeon, Vec<Room>) {
    let generator = DungeonGenerator::new(config.clone());
    let mut dungeon = Dungeon::new(config.width, config.height, plan.depth);
    let rooms = if config.is_boss_floor(plan.depth) {
        generator.build_boss_floor(&mut dungeon, plan, rng)
    } else {
        generator.build_normal_floor(&mut dungeon, plan, rng)
    };
    (dungeon, rooms)
}
