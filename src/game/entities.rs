//! # Entities
//!
//! Every placed thing in the dungeon (player, monsters, items, gear, stairs) is one flat
//! [`Entity`] record. Behaviour hangs off optional facets: a [`Fighter`] can take and deal
//! damage, an [`Ai`] acts on monster ticks, an [`Item`] can be used from the inventory and an
//! [`Equipment`] can be worn. Systems dispatch by checking which facets are present.

use crate::game::{new_entity_id, Color, EntityId, Position, Rarity};
use crate::config;
use serde::{Deserialize, Serialize};

/// Glyph drawn for anything that has died.
pub const CORPSE_GLYPH: char = '%';

/// A placed thing on the dungeon grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Identity used for non-owning references (equipment wearer, equipped slots)
    pub id: EntityId,
    pub position: Position,
    pub glyph: char,
    pub name: String,
    pub color: Color,
    pub blocks_movement: bool,
    /// Rendered on explored tiles even outside the field of view
    pub always_visible: bool,
    pub fighter: Option<Fighter>,
    pub ai: Option<Ai>,
    pub item: Option<Item>,
    pub equipment: Option<Equipment>,
}

impl Entity {
    /// Creates a bare entity with no facets.
    ///
    /// # Examples
    ///
    /// ```
    /// use rouge::{Color, Entity, Position};
    ///
    /// let rock = Entity::new(Position::new(3, 4), '*', "rock", Color::GREY, false);
    /// assert!(rock.fighter.is_none());
    /// assert!(!rock.blocks_movement);
    /// ```
    pub fn new(
        position: Position,
        glyph: char,
        name: impl Into<String>,
        color: Color,
        blocks_movement: bool,
    ) -> Self {
        Self {
            id: new_entity_id(),
            position,
            glyph,
            name: name.into(),
            color,
            blocks_movement,
            always_visible: false,
            fighter: None,
            ai: None,
            item: None,
            equipment: None,
        }
    }

    /// Creates the player character with starting stats.
    pub fn player(position: Position) -> Self {
        let fighter = Fighter::new(
            config::PLAYER_MAX_HP,
            config::PLAYER_DEFENSE,
            config::PLAYER_POWER,
            0,
            DeathKind::Player,
        )
        .with_mana(config::PLAYER_MAX_MANA);

        Self::new(position, '@', "player", Color::WHITE, true).with_fighter(fighter)
    }

    /// Creates the down staircase for a floor.
    pub fn stairs(position: Position) -> Self {
        let mut stairs = Self::new(position, '>', "stairs", Color::WHITE, false);
        stairs.always_visible = true;
        stairs
    }

    pub fn with_fighter(mut self, fighter: Fighter) -> Self {
        self.fighter = Some(fighter);
        self
    }

    pub fn with_ai(mut self, ai: Ai) -> Self {
        self.ai = Some(ai);
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.item = Some(item);
        self
    }

    pub fn with_equipment(mut self, equipment: Equipment) -> Self {
        self.equipment = Some(equipment);
        self
    }

    /// Whether this entity has a Fighter facet with hp left.
    pub fn is_alive(&self) -> bool {
        self.fighter.as_ref().map(|f| f.hp > 0).unwrap_or(false)
    }

    /// Whether this entity can be picked up.
    pub fn is_pickable(&self) -> bool {
        self.item.is_some() || self.equipment.is_some()
    }

    pub fn distance_to(&self, other: &Entity) -> f64 {
        self.position.euclidean_distance(other.position)
    }
}

/// What happens when a Fighter's hp reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathKind {
    Player,
    Monster,
}

/// Combat facet.
///
/// `hp` stays within `0..=max_hp`; damage and healing go through [`Fighter::take_damage`] and
/// [`Fighter::heal`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fighter {
    pub max_hp: i32,
    pub hp: i32,
    /// Percentage of incoming attack power absorbed
    pub defense: i32,
    pub power: i32,
    /// Experience granted to the player on death
    pub xp_reward: i32,
    pub max_mana: Option<i32>,
    pub mana: Option<i32>,
    pub is_boss: bool,
    pub rarity: Rarity,
    pub equipped: EquippedSlots,
    /// Gear dropped at the corpse
    pub carried: Option<Equipment>,
    pub death: DeathKind,
}

impl Fighter {
    pub fn new(max_hp: i32, defense: i32, power: i32, xp_reward: i32, death: DeathKind) -> Self {
        Self {
            max_hp,
            hp: max_hp,
            defense,
            power,
            xp_reward,
            max_mana: None,
            mana: None,
            is_boss: false,
            rarity: Rarity::Common,
            equipped: EquippedSlots::default(),
            carried: None,
            death,
        }
    }

    pub fn with_mana(mut self, max_mana: i32) -> Self {
        self.max_mana = Some(max_mana);
        self.mana = Some(max_mana);
        self
    }

    /// Subtracts damage and reports whether this call is the one that killed the fighter.
    ///
    /// Non-positive damage is ignored, so a dead fighter never dies twice.
    ///
    /// # Examples
    ///
    /// ```
    /// use rouge::{DeathKind, Fighter};
    ///
    /// let mut fighter = Fighter::new(10, 0, 3, 0, DeathKind::Monster);
    /// assert!(!fighter.take_damage(4));
    /// assert!(fighter.take_damage(20));
    /// assert_eq!(fighter.hp, 0);
    /// assert!(!fighter.take_damage(5));
    /// ```
    pub fn take_damage(&mut self, damage: i32) -> bool {
        if damage <= 0 || self.hp <= 0 {
            return false;
        }
        self.hp = (self.hp - damage).max(0);
        self.hp == 0
    }

    /// Restores hp up to the maximum and returns the amount actually healed.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(0)).min(self.max_hp);
        self.hp - before
    }

    /// Restores mana up to the maximum; returns `None` for fighters without mana.
    pub fn restore_mana(&mut self, amount: i32) -> Option<i32> {
        let max_mana = self.max_mana?;
        let mana = self.mana.get_or_insert(0);
        let before = *mana;
        *mana = (*mana + amount.max(0)).min(max_mana);
        Some(*mana - before)
    }

    pub fn is_at_full_health(&self) -> bool {
        self.hp >= self.max_hp
    }

    pub fn is_at_full_mana(&self) -> bool {
        match (self.mana, self.max_mana) {
            (Some(mana), Some(max_mana)) => mana >= max_mana,
            _ => true,
        }
    }
}

/// Monster behaviour.
///
/// Confusion wraps the behaviour it replaces, so confusing a confused monster stacks another
/// layer and each expiry peels exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ai {
    Basic,
    Confused {
        previous_ai: Box<Ai>,
        turns_remaining: u32,
    },
}

impl Ai {
    /// Wraps this behaviour in a confusion layer.
    ///
    /// # Examples
    ///
    /// ```
    /// use rouge::Ai;
    ///
    /// let ai = Ai::Basic.confused(3).confused(5);
    /// assert_eq!(ai.confusion_depth(), 2);
    /// ```
    pub fn confused(self, turns: u32) -> Ai {
        Ai::Confused {
            previous_ai: Box::new(self),
            turns_remaining: turns,
        }
    }

    pub fn is_confused(&self) -> bool {
        matches!(self, Ai::Confused { .. })
    }

    /// Number of stacked confusion layers.
    pub fn confusion_depth(&self) -> usize {
        match self {
            Ai::Basic => 0,
            Ai::Confused { previous_ai, .. } => 1 + previous_ai.confusion_depth(),
        }
    }
}

/// Effect family of a usable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemEffect {
    Heal,
    RestoreMana,
    Lightning,
    Fireball,
    Confuse,
}

/// Usable-item facet. The tier multiplies the effect when it is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub effect: ItemEffect,
    pub tier: u32,
}

impl Item {
    pub fn new(effect: ItemEffect, tier: u32) -> Self {
        Self {
            effect,
            tier: tier.max(1),
        }
    }
}

/// Equipment slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Slot {
    Helmet,
    Torso,
    Leggings,
    Boots,
    Weapon,
}

impl Slot {
    pub fn all() -> [Slot; 5] {
        [
            Slot::Helmet,
            Slot::Torso,
            Slot::Leggings,
            Slot::Boots,
            Slot::Weapon,
        ]
    }

    /// Armor slots add to defense, the weapon slot adds to power.
    pub fn is_armor(self) -> bool {
        !matches!(self, Slot::Weapon)
    }

    pub fn name(self) -> &'static str {
        match self {
            Slot::Helmet => "helmet",
            Slot::Torso => "torso",
            Slot::Leggings => "leggings",
            Slot::Boots => "boots",
            Slot::Weapon => "weapon",
        }
    }
}

/// Wearable facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub slot: Slot,
    pub stat_bonus: i32,
    pub tier: u32,
    /// Entity currently wearing this piece
    pub wearer: Option<EntityId>,
}

impl Equipment {
    pub fn new(slot: Slot, stat_bonus: i32, tier: u32) -> Self {
        Self {
            slot,
            stat_bonus,
            tier,
            wearer: None,
        }
    }
}

/// Which gear entity (by id) occupies each slot of a fighter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquippedSlots {
    pub helmet: Option<EntityId>,
    pub torso: Option<EntityId>,
    pub leggings: Option<EntityId>,
    pub boots: Option<EntityId>,
    pub weapon: Option<EntityId>,
}

impl EquippedSlots {
    pub fn get(&self, slot: Slot) -> Option<EntityId> {
        match slot {
            Slot::Helmet => self.helmet,
            Slot::Torso => self.torso,
            Slot::Leggings => self.leggings,
            Slot::Boots => self.boots,
            Slot::Weapon => self.weapon,
        }
    }

    /// Replaces the occupant of a slot and returns the previous one.
    pub fn set(&mut self, slot: Slot, id: Option<EntityId>) -> Option<EntityId> {
        let entry = match slot {
            Slot::Helmet => &mut self.helmet,
            Slot::Torso => &mut self.torso,
            Slot::Leggings => &mut self.leggings,
            Slot::Boots => &mut self.boots,
            Slot::Weapon => &mut self.weapon,
        };
        std::mem::replace(entry, id)
    }

    /// Occupied slots in slot order.
    pub fn occupied(&self) -> Vec<(Slot, EntityId)> {
        Slot::all()
            .into_iter()
            .filter_map(|slot| self.get(slot).map(|id| (slot, id)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_creation() {
        let player = Entity::player(Position::new(5, 5));
        let fighter = player.fighter.as_ref().unwrap();
        assert_eq!(fighter.hp, config::PLAYER_MAX_HP);
        assert_eq!(fighter.mana, Some(config::PLAYER_MAX_MANA));
        assert_eq!(fighter.death, DeathKind::Player);
        assert!(player.blocks_movement);
        assert!(player.ai.is_none());
    }

    #[test]
    fn test_stairs_always_visible() {
        let stairs = Entity::stairs(Position::new(1, 1));
        assert!(stairs.always_visible);
        assert!(!stairs.blocks_movement);
        assert!(stairs.fighter.is_none());
    }

    #[test]
    fn test_take_damage_fires_death_once() {
        let mut fighter = Fighter::new(10, 0, 3, 0, DeathKind::Monster);
        assert!(!fighter.take_damage(9));
        assert!(fighter.take_damage(9));
        assert_eq!(fighter.hp, 0);
        assert!(!fighter.take_damage(0));
        assert!(!fighter.take_damage(-3));
        assert!(!fighter.take_damage(7));
        assert_eq!(fighter.hp, 0);
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut fighter = Fighter::new(30, 0, 3, 0, DeathKind::Player);
        fighter.take_damage(5);
        assert_eq!(fighter.heal(100), 5);
        assert_eq!(fighter.hp, 30);
        assert!(fighter.is_at_full_health());
    }

    #[test]
    fn test_restore_mana_without_mana_facet() {
        let mut fighter = Fighter::new(30, 0, 3, 0, DeathKind::Monster);
        assert_eq!(fighter.restore_mana(5), None);
        assert!(fighter.is_at_full_mana());

        let mut caster = Fighter::new(30, 0, 3, 0, DeathKind::Player).with_mana(10);
        caster.mana = Some(2);
        assert_eq!(caster.restore_mana(50), Some(8));
        assert_eq!(caster.mana, Some(10));
    }

    #[test]
    fn test_confusion_wraps_and_keeps_layers() {
        let ai = Ai::Basic.confused(2);
        assert!(ai.is_confused());
        assert_eq!(ai.confusion_depth(), 1);

        let twice = ai.clone().confused(4);
        match twice {
            Ai::Confused {
                previous_ai,
                turns_remaining,
            } => {
                assert_eq!(turns_remaining, 4);
                assert_eq!(*previous_ai, ai);
            }
            Ai::Basic => panic!("expected a confusion layer"),
        }
    }

    #[test]
    fn test_equipped_slots_set_returns_incumbent() {
        let mut slots = EquippedSlots::default();
        let first = new_entity_id();
        let second = new_entity_id();

        assert_eq!(slots.set(Slot::Weapon, Some(first)), None);
        assert_eq!(slots.set(Slot::Weapon, Some(second)), Some(first));
        assert_eq!(slots.get(Slot::Weapon), Some(second));
        assert_eq!(slots.occupied(), vec![(Slot::Weapon, second)]);
    }

    #[test]
    fn test_slot_kinds() {
        assert!(Slot::Helmet.is_armor());
        assert!(Slot::Boots.is_armor());
        assert!(!Slot::Weapon.is_armor());
    }
}
