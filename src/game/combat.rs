//! # Combat
//!
//! Attack resolution, damage application and death handling.
//!
//! [`GameState::apply_damage`] is the only path to death, and [`crate::Fighter::take_damage`]
//! reports the killing blow exactly once, so death handlers never run twice.

use crate::game::{
    gold_drop, Color, DeathKind, EntityId, Fighter, GameState, GameStatus, Severity,
    CORPSE_GLYPH,
};
use crate::generation::{equipment_entity, equipment_name};
use crate::utils::capitalize;
use crate::{RougeError, RougeResult};

/// Damage of one melee blow: `floor(power * (100 - defense) / 100)`, never negative.
///
/// Defense is read as a percentage and clamped to `0..=100`.
///
/// # Examples
///
/// ```
/// use rouge::game::combat::attack_damage;
///
/// assert_eq!(attack_damage(5, 2), 4);
/// assert_eq!(attack_damage(10, 50), 5);
/// assert_eq!(attack_damage(10, 150), 0);
/// assert_eq!(attack_damage(-3, 0), 0);
/// ```
pub fn attack_damage(power: i32, defense: i32) -> i32 {
    let defense = defense.clamp(0, 100);
    power.max(0) * (100 - defense) / 100
}

impl GameState {
    /// Resolves one melee attack and reports it in the log.
    pub fn attack(&mut self, attacker: EntityId, defender: EntityId) -> RougeResult<()> {
        let (attacker_name, power) = self.fighter_summary(attacker, |f| f.power)?;
        let (defender_name, defense) = self.fighter_summary(defender, |f| f.defense)?;

        let damage = attack_damage(power, defense);
        if damage > 0 {
            self.messages.add(
                format!(
                    "{} attacks {} for {} hit points.",
                    capitalize(&attacker_name),
                    defender_name,
                    damage
                ),
                Severity::Info,
            );
            log::debug!("{} hits {} for {}", attacker_name, defender_name, damage);
            self.apply_damage(defender, damage)?;
        } else {
            self.messages.add(
                format!(
                    "{} attacks {} but it has no effect!",
                    capitalize(&attacker_name),
                    defender_name
                ),
                Severity::Info,
            );
        }
        Ok(())
    }

    fn fighter_summary(
        &self,
        id: EntityId,
        stat: impl Fn(&Fighter) -> i32,
    ) -> RougeResult<(String, i32)> {
        let entity = self
            .dungeon
            .entity(id)
            .ok_or_else(|| RougeError::InvalidAction(format!("no entity with id {}", id)))?;
        let fighter = entity.fighter.as_ref().ok_or_else(|| {
            RougeError::InvalidAction(format!("{} cannot fight", entity.name))
        })?;
        Ok((entity.name.clone(), stat(fighter)))
    }

    /// Subtracts hp from a fighter and runs its death handler on the killing blow.
    ///
    /// Returns whether this call killed the target. Entities without a Fighter are ignored.
    pub fn apply_damage(&mut self, target: EntityId, damage: i32) -> RougeResult<bool> {
        let is_player = target == self.player_id;
        let (killed, dealt) = match self
            .dungeon
            .entity_mut(target)
            .and_then(|e| e.fighter.as_mut())
        {
            Some(fighter) => {
                let before = fighter.hp;
                let killed = fighter.take_damage(damage);
                (killed, (before - fighter.hp).max(0) as u64)
            }
            None => return Ok(false),
        };

        if is_player {
            self.statistics.damage_taken += dealt;
        } else {
            self.statistics.damage_dealt += dealt;
        }

        if killed {
            self.handle_death(target)?;
        }
        Ok(killed)
    }

    fn handle_death(&mut self, id: EntityId) -> RougeResult<()> {
        let death = self
            .dungeon
            .entity(id)
            .and_then(|e| e.fighter.as_ref())
            .map(|f| f.death)
            .ok_or_else(|| RougeError::InvalidState(format!("{} died without a fighter", id)))?;

        match death {
            DeathKind::Player => self.player_death(id),
            DeathKind::Monster => self.monster_death(id),
        }
    }

    fn player_death(&mut self, id: EntityId) -> RougeResult<()> {
        let player = self
            .dungeon
            .entity_mut(id)
            .ok_or_else(|| RougeError::InvalidState("the player vanished".to_string()))?;
        player.glyph = CORPSE_GLYPH;
        player.color = Color::DARK_RED;
        player.blocks_movement = false;

        self.status = GameStatus::Dead;
        self.messages.add("You died!", Severity::Danger);
        log::info!(
            "player died on depth {} at turn {}",
            self.dungeon.depth,
            self.turn_number
        );
        Ok(())
    }

    /// Grants rewards, drops carried gear and turns the monster into a corpse in place.
    fn monster_death(&mut self, id: EntityId) -> RougeResult<()> {
        let entity = self
            .dungeon
            .entity_mut(id)
            .ok_or_else(|| RougeError::InvalidState(format!("{} vanished on death", id)))?;
        let fighter = entity
            .fighter
            .take()
            .ok_or_else(|| RougeError::InvalidState(format!("{} died without a fighter", id)))?;
        let name = entity.name.clone();
        let position = entity.position;

        entity.ai = None;
        entity.glyph = CORPSE_GLYPH;
        entity.color = Color::DARK_RED;
        entity.blocks_movement = false;
        entity.name = format!("remains of {}", name);

        self.progression.xp += fighter.xp_reward;
        self.messages.add(
            format!(
                "{} is dead! You gain {} experience points.",
                capitalize(&name),
                fighter.xp_reward
            ),
            Severity::Good,
        );

        let gold = gold_drop(self.dungeon.depth, fighter.rarity, fighter.is_boss, &mut self.rng);
        if gold > 0 {
            self.progression.gold += gold;
            self.messages
                .add(format!("You find {} gold.", gold), Severity::Good);
        }

        if let Some(gear) = fighter.carried {
            self.messages.add(
                format!("The {} drops a {}.", name, equipment_name(&gear)),
                Severity::Good,
            );
            self.dungeon.push_to_back(equipment_entity(position, gear));
        }
        self.dungeon.send_to_back(id);

        if fighter.is_boss {
            self.dungeon.refresh_boss_present();
            if !self.dungeon.boss_present {
                self.messages
                    .add("The way down is open.", Severity::Progress);
            }
        }

        self.statistics.monsters_slain += 1;
        log::debug!("{} died at {:?}", name, position);
        Ok(())
    }
}
