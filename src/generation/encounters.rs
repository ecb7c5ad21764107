//! # Encounter Generation
//!
//! The monster table, boss and miniboss templates, and the per-room spawner that places
//! monsters and items as soon as a room is carved.

use crate::game::{
    Ai, BaseStats, Color, DeathKind, Dungeon, Entity, Fighter, Position, Rarity,
};
use crate::generation::{item_entity, roll_equipment, roll_equipment_drop, roll_item, FloorPlan, Room};
use rand::Rng;

/// A kind of monster before scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonsterArchetype {
    pub name: &'static str,
    pub glyph: char,
    pub color: Color,
    pub base: BaseStats,
}

pub const KOBOLD: MonsterArchetype = MonsterArchetype {
    name: "kobold",
    glyph: 'k',
    color: Color::rgb(191, 143, 0),
    base: BaseStats::new(6, 0, 3, 20),
};

pub const ORC: MonsterArchetype = MonsterArchetype {
    name: "orc",
    glyph: 'o',
    color: Color::rgb(63, 127, 63),
    base: BaseStats::new(10, 0, 4, 35),
};

pub const TROLL: MonsterArchetype = MonsterArchetype {
    name: "troll",
    glyph: 'T',
    color: Color::rgb(0, 127, 0),
    base: BaseStats::new(16, 5, 5, 100),
};

pub const OGRE: MonsterArchetype = MonsterArchetype {
    name: "ogre",
    glyph: 'O',
    color: Color::rgb(127, 63, 0),
    base: BaseStats::new(22, 10, 6, 150),
};

pub const WRAITH: MonsterArchetype = MonsterArchetype {
    name: "wraith",
    glyph: 'W',
    color: Color::rgb(160, 160, 255),
    base: BaseStats::new(18, 20, 7, 220),
};

pub const MINIBOSS: MonsterArchetype = MonsterArchetype {
    name: "warden",
    glyph: 'm',
    color: Color::rgb(255, 63, 63),
    base: BaseStats::new(25, 5, 5, 200),
};

pub const BOSS: MonsterArchetype = MonsterArchetype {
    name: "overlord",
    glyph: 'B',
    color: Color::rgb(255, 0, 127),
    base: BaseStats::new(60, 10, 7, 400),
};

/// Regular monsters, weakest first.
pub const MONSTER_TABLE: [MonsterArchetype; 5] = [KOBOLD, ORC, TROLL, OGRE, WRAITH];

/// Spawn weights for [`MONSTER_TABLE`].
///
/// Weak archetypes fade and tough ones grow as `depth + player_level` increases.
///
/// # Examples
///
/// ```
/// use rouge::monster_weights;
///
/// let shallow = monster_weights(1, 1);
/// let deep = monster_weights(12, 8);
/// assert!(deep[0] < shallow[0]);
/// assert!(deep[2] > shallow[2]);
/// assert_eq!(shallow[4], 0);
/// ```
pub fn monster_weights(depth: u32, player_level: u32) -> [u32; 5] {
    let shift = depth + player_level;
    [
        80u32.saturating_sub(4 * shift).max(10),
        60,
        10 + 3 * shift,
        if depth >= 3 { 5 + 2 * shift } else { 0 },
        if depth >= 6 { 2 * shift } else { 0 },
    ]
}

/// Picks an archetype from the shifted table.
pub fn roll_archetype<R: Rng + ?Sized>(plan: &FloorPlan, rng: &mut R) -> MonsterArchetype {
    let weights = monster_weights(plan.depth, plan.player_level);
    let total: u32 = weights.iter().sum();
    let mut roll = rng.gen_range(0..total);
    for (archetype, weight) in MONSTER_TABLE.iter().zip(weights) {
        if roll < weight {
            return *archetype;
        }
        roll -= weight;
    }
    ORC
}

/// Builds a monster entity with scaled stats.
pub fn monster_entity(
    archetype: &MonsterArchetype,
    position: Position,
    plan: &FloorPlan,
    rarity: Rarity,
) -> Entity {
    let stats = archetype
        .base
        .scaled(plan.player_level, plan.depth, rarity);
    let mut fighter = Fighter::new(
        stats.hp,
        stats.defense,
        stats.power,
        stats.xp,
        DeathKind::Monster,
    );
    fighter.rarity = rarity;

    Entity::new(
        position,
        archetype.glyph,
        rarity.decorate(archetype.name),
        archetype.color,
        true,
    )
    .with_fighter(fighter)
    .with_ai(Ai::Basic)
}

/// Rolls archetype, rarity and carried gear for a regular monster.
pub fn spawn_monster<R: Rng + ?Sized>(plan: &FloorPlan, position: Position, rng: &mut R) -> Entity {
    let archetype = roll_archetype(plan, rng);
    let rarity = Rarity::roll(rng);
    let mut monster = monster_entity(&archetype, position, plan, rarity);
    if let Some(fighter) = monster.fighter.as_mut() {
        fighter.carried = roll_equipment_drop(plan, rng);
    }
    monster
}

/// Builds a boss-gating monster from `archetype`. It always carries gear.
pub fn spawn_boss<R: Rng + ?Sized>(
    archetype: &MonsterArchetype,
    plan: &FloorPlan,
    position: Position,
    rng: &mut R,
) -> Entity {
    let mut boss = monster_entity(archetype, position, plan, Rarity::Rare);
    boss.name = archetype.name.to_string();
    if let Some(fighter) = boss.fighter.as_mut() {
        fighter.is_boss = true;
        fighter.carried = Some(roll_equipment(plan, rng));
    }
    boss
}

/// Square-root bounded spawn counts `(max monsters, max items)` for a depth.
pub fn spawn_limits(depth: u32) -> (u32, u32) {
    let monsters = (depth as f64).sqrt().floor() as u32;
    let items = (depth as f64).sqrt().sqrt().floor() as u32;
    (monsters, items)
}

fn is_free(dungeon: &Dungeon, pos: Position, reserved: Option<Position>) -> bool {
    Some(pos) != reserved && !dungeon.is_wall(pos) && dungeon.entities_at(pos).next().is_none()
}

fn random_interior<R: Rng + ?Sized>(room: &Room, rng: &mut R) -> Position {
    Position::new(
        rng.gen_range(room.x1 + 1..room.x2),
        rng.gen_range(room.y1 + 1..room.y2),
    )
}

/// Places monsters and items inside a freshly carved room.
///
/// Each roll gets one random interior tile; occupied tiles and `reserved` are skipped. Items are
/// pushed to the back of the render order. Returns the number of entities placed.
pub fn populate_room<R: Rng + ?Sized>(
    dungeon: &mut Dungeon,
    room: &Room,
    plan: &FloorPlan,
    reserved: Option<Position>,
    rng: &mut R,
) -> usize {
    let (max_monsters, max_items) = spawn_limits(plan.depth);
    let mut placed = 0;

    let monsters = rng.gen_range(0..=max_monsters);
    for _ in 0..monsters {
        let pos = random_interior(room, rng);
        if is_free(dungeon, pos, reserved) {
            dungeon.push(spawn_monster(plan, pos, rng));
            placed += 1;
        }
    }

    let items = rng.gen_range(0..=max_items);
    for _ in 0..items {
        let pos = random_interior(room, rng);
        if is_free(dungeon, pos, reserved) {
            dungeon.push_to_back(item_entity(pos, roll_item(rng)));
            placed += 1;
        }
    }

    placed
}
