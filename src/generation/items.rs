//! # Item Generation
//!
//! Weighted tables for consumables and the equipment that monsters carry.

use crate::game::{
    equipment_bonus, Color, Entity, Equipment, Item, ItemEffect, Position, Slot,
};
use crate::generation::FloorPlan;
use rand::Rng;

/// Probability that a spawned monster carries a piece of gear.
pub const EQUIPMENT_DROP_CHANCE: f64 = 0.1;

/// `(effect, tier, weight)`; weights sum to 100.
pub const ITEM_TABLE: [(ItemEffect, u32, u32); 11] = [
    (ItemEffect::Heal, 1, 30),
    (ItemEffect::Heal, 2, 10),
    (ItemEffect::Heal, 3, 5),
    (ItemEffect::RestoreMana, 1, 10),
    (ItemEffect::RestoreMana, 2, 5),
    (ItemEffect::Lightning, 1, 8),
    (ItemEffect::Lightning, 2, 4),
    (ItemEffect::Fireball, 1, 8),
    (ItemEffect::Fireball, 2, 4),
    (ItemEffect::Confuse, 1, 10),
    (ItemEffect::Confuse, 2, 6),
];

/// Picks an item from [`ITEM_TABLE`].
pub fn roll_item<R: Rng + ?Sized>(rng: &mut R) -> Item {
    let total: u32 = ITEM_TABLE.iter().map(|(_, _, weight)| weight).sum();
    item_for_roll(rng.gen_range(0..total))
}

/// Maps a roll in `0..100` onto [`ITEM_TABLE`].
pub fn item_for_roll(roll: u32) -> Item {
    let mut cumulative = 0;
    for (effect, tier, weight) in ITEM_TABLE {
        cumulative += weight;
        if roll < cumulative {
            return Item::new(effect, tier);
        }
    }
    Item::new(ItemEffect::Confuse, 2)
}

fn tier_prefix(tier: u32) -> &'static str {
    match tier {
        0 | 1 => "",
        2 => "greater ",
        _ => "superior ",
    }
}

/// Display name of a consumable.
///
/// # Examples
///
/// ```
/// use rouge::{item_name, Item, ItemEffect};
///
/// assert_eq!(item_name(&Item::new(ItemEffect::Heal, 1)), "healing potion");
/// assert_eq!(item_name(&Item::new(ItemEffect::Fireball, 2)), "greater scroll of fireball");
/// ```
pub fn item_name(item: &Item) -> String {
    let base = match item.effect {
        ItemEffect::Heal => "healing potion",
        ItemEffect::RestoreMana => "mana potion",
        ItemEffect::Lightning => "scroll of lightning bolt",
        ItemEffect::Fireball => "scroll of fireball",
        ItemEffect::Confuse => "scroll of confusion",
    };
    format!("{}{}", tier_prefix(item.tier), base)
}

/// Builds the on-floor entity for a consumable.
pub fn item_entity(position: Position, item: Item) -> Entity {
    let (glyph, color) = match item.effect {
        ItemEffect::Heal => ('!', Color::PURPLE),
        ItemEffect::RestoreMana => ('!', Color::SKY),
        ItemEffect::Lightning => ('#', Color::YELLOW),
        ItemEffect::Fireball => ('#', Color::ORANGE),
        ItemEffect::Confuse => ('#', Color::LIGHT_CYAN),
    };
    Entity::new(position, glyph, item_name(&item), color, false).with_item(item)
}

/// Rolls whether a monster carries gear, and which.
pub fn roll_equipment_drop<R: Rng + ?Sized>(plan: &FloorPlan, rng: &mut R) -> Option<Equipment> {
    if !rng.gen_bool(EQUIPMENT_DROP_CHANCE) {
        return None;
    }
    Some(roll_equipment(plan, rng))
}

/// Rolls a random-slot piece of gear scaled to the floor.
pub fn roll_equipment<R: Rng + ?Sized>(plan: &FloorPlan, rng: &mut R) -> Equipment {
    let slots = Slot::all();
    let slot = slots[rng.gen_range(0..slots.len())];
    let tier = match rng.gen_range(0..100) {
        0..=69 => 1,
        70..=94 => 2,
        _ => 3,
    };
    Equipment::new(
        slot,
        equipment_bonus(slot, tier, plan.depth, plan.player_level),
        tier,
    )
}

/// Display name of a piece of gear.
pub fn equipment_name(equipment: &Equipment) -> String {
    let quality = match equipment.tier {
        0 | 1 => "",
        2 => "fine ",
        _ => "masterwork ",
    };
    let noun = match equipment.slot {
        Slot::Helmet => "helm",
        Slot::Torso => "breastplate",
        Slot::Leggings => "greaves",
        Slot::Boots => "boots",
        Slot::Weapon => "sword",
    };
    format!("{}{} (+{})", quality, noun, equipment.stat_bonus)
}

/// Builds the on-floor entity for a piece of gear.
pub fn equipment_entity(position: Position, equipment: Equipment) -> Entity {
    let glyph = if equipment.slot.is_armor() { '[' } else { '/' };
    let color = match equipment.tier {
        0 | 1 => Color::GREY,
        2 => Color::LIGHT_BLUE,
        _ => Color::YELLOW,
    };
    let mut equipment = equipment;
    equipment.wearer = None;
    Entity::new(position, glyph, equipment_name(&equipment), color, false).with_equipment(equipment)
}
