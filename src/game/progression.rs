//! # Progression
//!
//! Experience thresholds, level-up choices, and every formula that scales numbers with depth,
//! player level, rarity or item tier.
//!
//! All scaled stats are computed in `f64` and floored exactly once at the end.

use crate::game::{Fighter, Slot};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Per-step growth of the exponential scaling term.
pub const STAT_GROWTH: f64 = 1.06;

/// Fraction of a base stat added per dungeon level.
pub const DEPTH_BONUS: f64 = 0.1;

/// Highest defense a scaled monster can reach.
pub const MAX_SCALED_DEFENSE: i32 = 90;

/// Rarity rolled for every spawned monster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Elite,
}

impl Rarity {
    /// Rolls 70% common, 20% rare, 10% elite.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Rarity {
        Self::from_roll(rng.gen_range(0..100))
    }

    pub fn from_roll(roll: u32) -> Rarity {
        match roll {
            0..=69 => Rarity::Common,
            70..=89 => Rarity::Rare,
            _ => Rarity::Elite,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Rare => 1.25,
            Rarity::Elite => 2.0,
        }
    }

    /// Prefix added to the monster's name.
    pub fn label(self) -> Option<&'static str> {
        match self {
            Rarity::Common => Some("weak"),
            Rarity::Rare => None,
            Rarity::Elite => Some("elite"),
        }
    }

    pub fn gold_multiplier(self) -> i32 {
        match self {
            Rarity::Common => 1,
            Rarity::Rare => 2,
            Rarity::Elite => 3,
        }
    }

    /// Applies the label to a base name.
    pub fn decorate(self, name: &str) -> String {
        match self.label() {
            Some(label) => format!("{} {}", label, name),
            None => name.to_string(),
        }
    }
}

/// Scales a base stat by player level, depth and rarity.
///
/// `floor(base * (STAT_GROWTH^(level + depth) + DEPTH_BONUS * depth) * rarity)`
///
/// # Examples
///
/// ```
/// use rouge::{scale_stat, Rarity};
///
/// assert_eq!(scale_stat(10, 0, 0, Rarity::Common), 10);
/// assert!(scale_stat(10, 5, 5, Rarity::Common) > scale_stat(10, 1, 1, Rarity::Common));
/// assert_eq!(scale_stat(10, 0, 0, Rarity::Elite), 20);
/// ```
pub fn scale_stat(base: i32, player_level: u32, depth: u32, rarity: Rarity) -> i32 {
    let steps = (player_level + depth) as i32;
    let factor = STAT_GROWTH.powi(steps) + DEPTH_BONUS * depth as f64;
    (base as f64 * factor * rarity.multiplier()).floor() as i32
}

/// Base numbers of a monster before scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: i32,
    pub defense: i32,
    pub power: i32,
    pub xp: i32,
}

impl BaseStats {
    pub const fn new(hp: i32, defense: i32, power: i32, xp: i32) -> Self {
        Self {
            hp,
            defense,
            power,
            xp,
        }
    }

    /// Scales every stat independently; defense is capped.
    pub fn scaled(self, player_level: u32, depth: u32, rarity: Rarity) -> BaseStats {
        BaseStats {
            hp: scale_stat(self.hp, player_level, depth, rarity).max(1),
            defense: scale_stat(self.defense, player_level, depth, rarity)
                .min(MAX_SCALED_DEFENSE),
            power: scale_stat(self.power, player_level, depth, rarity),
            xp: scale_stat(self.xp, player_level, depth, rarity),
        }
    }
}

/// Gold granted when a monster dies.
pub fn gold_drop<R: Rng + ?Sized>(depth: u32, rarity: Rarity, is_boss: bool, rng: &mut R) -> i32 {
    let boss_bonus = if is_boss { 5 } else { 1 };
    rng.gen_range(1..=10) * depth.max(1) as i32 * rarity.gold_multiplier() * boss_bonus
}

/// Stat bonus of a piece of gear.
pub fn equipment_bonus(slot: Slot, tier: u32, depth: u32, player_level: u32) -> i32 {
    let base = if slot.is_armor() { 1.0 } else { 2.0 };
    (base * tier as f64 + 0.2 * (depth + player_level) as f64).floor() as i32
}

/// Hit points restored by a healing item of `tier`.
pub fn heal_amount(tier: u32, max_hp: i32, base: i32) -> i32 {
    match tier {
        0 | 1 => base,
        2 => max_hp / 2,
        _ => max_hp,
    }
}

/// Mana restored by a mana item of `tier`.
pub fn mana_amount(tier: u32, max_mana: i32, base: i32) -> i32 {
    heal_amount(tier, max_mana, base)
}

/// `(1 + 0.5 * (tier - 1)) * base`, floored.
pub fn lightning_damage(tier: u32, base: i32) -> i32 {
    let tier = tier.max(1) as f64;
    ((1.0 + 0.5 * (tier - 1.0)) * base as f64).floor() as i32
}

/// `tier * base`.
pub fn fireball_damage(tier: u32, base: i32) -> i32 {
    tier.max(1) as i32 * base
}

/// Confusion lasts five extra turns per tier above the first.
pub fn confuse_turns(tier: u32, base: u32) -> u32 {
    base + 5 * (tier.max(1) - 1)
}

/// Stat raised on level-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatChoice {
    Constitution,
    Strength,
    Agility,
    Intellect,
}

impl StatChoice {
    /// The level-up menu, fixed in count and order.
    pub const ALL: [StatChoice; 4] = [
        StatChoice::Constitution,
        StatChoice::Strength,
        StatChoice::Agility,
        StatChoice::Intellect,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StatChoice::Constitution => "Constitution (+20 HP)",
            StatChoice::Strength => "Strength (+1 attack)",
            StatChoice::Agility => "Agility (+1 defense)",
            StatChoice::Intellect => "Intellect (+10 mana)",
        }
    }

    pub fn apply(self, fighter: &mut Fighter) {
        match self {
            StatChoice::Constitution => {
                fighter.max_hp += 20;
                fighter.hp += 20;
            }
            StatChoice::Strength => fighter.power += 1,
            StatChoice::Agility => fighter.defense += 1,
            StatChoice::Intellect => {
                let max_mana = fighter.max_mana.unwrap_or(0) + 10;
                fighter.max_mana = Some(max_mana);
                fighter.mana = Some(fighter.mana.unwrap_or(0) + 10);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    Wild,
    LickWounds,
    PrimalSurge,
    LastStand,
}

impl Skill {
    pub const ALL: [Skill; 4] = [
        Skill::Wild,
        Skill::LickWounds,
        Skill::PrimalSurge,
        Skill::LastStand,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Skill::Wild => "Wild",
            Skill::LickWounds => "Lick Wounds",
            Skill::PrimalSurge => "Primal Surge",
            Skill::LastStand => "Last Stand",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillPoints {
    pub wild: u32,
    pub lick_wounds: u32,
    pub primal_surge: u32,
    pub last_stand: u32,
}

impl SkillPoints {
    pub fn get(&self, skill: Skill) -> u32 {
        match skill {
            Skill::Wild => self.wild,
            Skill::LickWounds => self.lick_wounds,
            Skill::PrimalSurge => self.primal_surge,
            Skill::LastStand => self.last_stand,
        }
    }

    pub fn add(&mut self, skill: Skill) {
        match skill {
            Skill::Wild => self.wild += 1,
            Skill::LickWounds => self.lick_wounds += 1,
            Skill::PrimalSurge => self.primal_surge += 1,
            Skill::LastStand => self.last_stand += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.wild + self.lick_wounds + self.primal_surge + self.last_stand
    }
}

/// The player's level, experience, skills and purse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProgression {
    pub level: u32,
    pub xp: i32,
    pub skill_points: SkillPoints,
    pub gold: i32,
}

impl PlayerProgression {
    pub fn new() -> Self {
        Self {
            level: 1,
            xp: 0,
            skill_points: SkillPoints::default(),
            gold: 0,
        }
    }

    /// Experience needed to leave the current level.
    pub fn xp_to_next(&self, base: i32, factor: i32) -> i32 {
        base + factor * self.level as i32
    }

    /// Consumes one threshold's worth of experience if available.
    ///
    /// The remainder carries forward. Call repeatedly until it returns false.
    ///
    /// # Examples
    ///
    /// ```
    /// use rouge::PlayerProgression;
    ///
    /// let mut progression = PlayerProgression::new();
    /// progression.xp = 900;
    /// let mut gained = 0;
    /// while progression.try_level_up(200, 150) {
    ///     gained += 1;
    /// }
    /// // 350 for level 1, then 500 for level 2
    /// assert_eq!(gained, 2);
    /// assert_eq!(progression.level, 3);
    /// assert_eq!(progression.xp, 50);
    /// ```
    pub fn try_level_up(&mut self, base: i32, factor: i32) -> bool {
        let threshold = self.xp_to_next(base, factor);
        if self.xp < threshold {
            return false;
        }
        self.xp -= threshold;
        self.level += 1;
        true
    }
}

impl Default for PlayerProgression {
    fn default() -> Self {
        Self::new()
    }
}
