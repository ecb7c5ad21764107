//! # Inventory
//!
//! Picking up, using, dropping and wearing things.
//!
//! Consumables go to [`GameState::inventory`], gear to [`GameState::equipment_bag`]. Item
//! effects are resolved at use time with the item's tier; an effect that finds nothing to do
//! reports [`UseOutcome::Cancelled`] and the item stays where it was.

use crate::game::{
    confuse_turns, fireball_damage, heal_amount, lightning_damage, mana_amount, Ai, EntityId,
    GameState, Item, ItemEffect, Position, Severity, Slot, TurnOutcome, UseOutcome,
};
use crate::input::PlayerInterface;
use crate::{RougeError, RougeResult};
use std::cmp::Ordering;

impl GameState {
    /// Picks up the topmost item or gear on the player's tile.
    pub fn pick_up(&mut self) -> RougeResult<TurnOutcome> {
        let position = self.player_position();
        let found = self
            .dungeon
            .entities
            .iter()
            .rev()
            .find(|e| e.position == position && e.is_pickable())
            .map(|e| (e.id, e.name.clone(), e.item.is_some()));

        let Some((id, name, is_item)) = found else {
            self.messages
                .add("There is nothing here to pick up.", Severity::Warning);
            return Ok(TurnOutcome::DidntTakeTurn);
        };

        let carried = if is_item {
            self.inventory.len()
        } else {
            self.equipment_bag.len()
        };
        if carried >= self.balance.inventory_capacity {
            self.messages.add(
                format!("Your inventory is full, cannot pick up {}.", name),
                Severity::Warning,
            );
            return Ok(TurnOutcome::DidntTakeTurn);
        }

        let entity = self
            .dungeon
            .remove(id)
            .ok_or_else(|| RougeError::InvalidState(format!("{} vanished from the floor", name)))?;
        if is_item {
            self.inventory.push(entity);
        } else {
            self.equipment_bag.push(entity);
        }
        self.messages
            .add(format!("You picked up a {}!", name), Severity::Good);
        Ok(TurnOutcome::TookTurn)
    }

    /// Uses the inventory item at `index`. Cancelled uses keep the item and cost no turn.
    pub fn use_item(
        &mut self,
        index: usize,
        ui: &mut dyn PlayerInterface,
    ) -> RougeResult<TurnOutcome> {
        let Some((item, name)) = self
            .inventory
            .get(index)
            .and_then(|e| e.item.map(|item| (item, e.name.clone())))
        else {
            self.messages
                .add("You don't have that item.", Severity::Warning);
            return Ok(TurnOutcome::DidntTakeTurn);
        };

        match self.apply_item(item, ui)? {
            UseOutcome::Used => {
                self.inventory.remove(index);
                self.statistics.items_used += 1;
                log::debug!("used {}", name);
                Ok(TurnOutcome::TookTurn)
            }
            UseOutcome::Cancelled => Ok(TurnOutcome::DidntTakeTurn),
        }
    }

    /// Resolves an item's effect without touching the inventory.
    pub fn apply_item(
        &mut self,
        item: Item,
        ui: &mut dyn PlayerInterface,
    ) -> RougeResult<UseOutcome> {
        match item.effect {
            ItemEffect::Heal => self.cast_heal(item.tier),
            ItemEffect::RestoreMana => self.cast_restore_mana(item.tier),
            ItemEffect::Lightning => self.cast_lightning(item.tier),
            ItemEffect::Fireball => self.cast_fireball(item.tier, ui),
            ItemEffect::Confuse => self.cast_confuse(item.tier, ui),
        }
    }

    fn cast_heal(&mut self, tier: u32) -> RougeResult<UseOutcome> {
        let base = self.balance.heal_amount;
        let fighter = self.player_fighter_mut()?;
        if fighter.is_at_full_health() {
            self.messages
                .add("You are already at full health.", Severity::Warning);
            return Ok(UseOutcome::Cancelled);
        }
        let amount = heal_amount(tier, fighter.max_hp, base);
        fighter.heal(amount);
        self.messages
            .add("Your wounds start to feel better!", Severity::Good);
        Ok(UseOutcome::Used)
    }

    fn cast_restore_mana(&mut self, tier: u32) -> RougeResult<UseOutcome> {
        let base = self.balance.mana_amount;
        let fighter = self.player_fighter_mut()?;
        let Some(max_mana) = fighter.max_mana.filter(|_| !fighter.is_at_full_mana()) else {
            self.messages
                .add("Your mana is already full.", Severity::Warning);
            return Ok(UseOutcome::Cancelled);
        };
        fighter.restore_mana(mana_amount(tier, max_mana, base));
        self.messages
            .add("You feel your mana flowing back.", Severity::Good);
        Ok(UseOutcome::Used)
    }

    fn cast_lightning(&mut self, tier: u32) -> RougeResult<UseOutcome> {
        let Some(target) = self.closest_monster(self.balance.lightning_range) else {
            self.messages
                .add("No enemy is close enough to strike.", Severity::Warning);
            return Ok(UseOutcome::Cancelled);
        };

        let damage = lightning_damage(tier, self.balance.lightning_damage);
        let name = self.entity_name(target);
        self.messages.add(
            format!(
                "A lightning bolt strikes the {} with a loud thunder! The damage is {} hit points.",
                name, damage
            ),
            Severity::Magic,
        );
        self.apply_damage(target, damage)?;
        Ok(UseOutcome::Used)
    }

    fn cast_confuse(
        &mut self,
        tier: u32,
        ui: &mut dyn PlayerInterface,
    ) -> RougeResult<UseOutcome> {
        self.messages.add(
            "Select an enemy to confuse, or cancel.",
            Severity::Prompt,
        );
        let Some(target) = self.target_monster(ui, Some(self.balance.confuse_range)) else {
            self.messages.add("Cancelled.", Severity::Warning);
            return Ok(UseOutcome::Cancelled);
        };

        let turns = confuse_turns(tier, self.balance.confuse_turns);
        let entity = self
            .dungeon
            .entity_mut(target)
            .ok_or_else(|| RougeError::InvalidState(format!("target {} vanished", target)))?;
        let current = entity.ai.take().unwrap_or(Ai::Basic);
        entity.ai = Some(current.confused(turns));
        let text = format!(
            "The eyes of the {} look vacant, as it starts to stumble around!",
            entity.name
        );
        self.messages.add(text, Severity::Magic);
        log::debug!("confused {} for {} turns", target, turns);
        Ok(UseOutcome::Used)
    }

    fn cast_fireball(
        &mut self,
        tier: u32,
        ui: &mut dyn PlayerInterface,
    ) -> RougeResult<UseOutcome> {
        self.messages.add(
            "Select a target tile for the fireball, or cancel.",
            Severity::Prompt,
        );
        let Some(center) = self.target_tile(ui, None) else {
            self.messages.add("Cancelled.", Severity::Warning);
            return Ok(UseOutcome::Cancelled);
        };

        let radius = self.balance.fireball_radius;
        let damage = fireball_damage(tier, self.balance.fireball_damage);
        self.messages.add(
            format!(
                "The fireball explodes, burning everything within {} tiles!",
                radius
            ),
            Severity::Magic,
        );

        let victims: Vec<(EntityId, String)> = self
            .dungeon
            .entities
            .iter()
            .filter(|e| e.is_alive() && e.position.euclidean_distance(center) <= radius)
            .map(|e| (e.id, e.name.clone()))
            .collect();
        for (id, name) in victims {
            self.messages.add(
                format!("The {} gets burned for {} hit points.", name, damage),
                Severity::Magic,
            );
            self.apply_damage(id, damage)?;
        }
        Ok(UseOutcome::Used)
    }

    fn entity_name(&self, id: EntityId) -> String {
        self.dungeon
            .entity(id)
            .map(|e| e.name.clone())
            .unwrap_or_default()
    }

    /// The nearest living monster in view within `range`.
    pub fn closest_monster(&self, range: f64) -> Option<EntityId> {
        let origin = self.player_position();
        self.dungeon
            .entities
            .iter()
            .filter(|e| e.id != self.player_id && e.is_alive())
            .filter(|e| self.visibility.is_visible(e.position))
            .map(|e| (e.id, e.position.euclidean_distance(origin)))
            .filter(|&(_, distance)| distance <= range)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
            .map(|(id, _)| id)
    }

    /// Asks for a tile until the answer is in view and within `max_range`, or cancelled.
    pub fn target_tile(
        &self,
        ui: &mut dyn PlayerInterface,
        max_range: Option<f64>,
    ) -> Option<Position> {
        let origin = self.player_position();
        loop {
            let tile = ui.select_tile(self, max_range)?;
            let in_range = max_range
                .map(|range| origin.euclidean_distance(tile) <= range)
                .unwrap_or(true);
            if in_range && self.visibility.is_visible(tile) {
                return Some(tile);
            }
        }
    }

    /// Asks for tiles until one holds a living monster, or the prompt is cancelled.
    pub fn target_monster(
        &self,
        ui: &mut dyn PlayerInterface,
        max_range: Option<f64>,
    ) -> Option<EntityId> {
        loop {
            let tile = self.target_tile(ui, max_range)?;
            if let Some(id) = self
                .dungeon
                .fighter_at(tile)
                .filter(|&id| id != self.player_id)
            {
                return Some(id);
            }
        }
    }

    /// Puts an inventory item down on the player's tile.
    pub fn drop_item(&mut self, index: usize) -> RougeResult<TurnOutcome> {
        if index >= self.inventory.len() {
            self.messages
                .add("You don't have that item.", Severity::Warning);
            return Ok(TurnOutcome::DidntTakeTurn);
        }
        let mut entity = self.inventory.remove(index);
        entity.position = self.player_position();
        self.messages
            .add(format!("You dropped a {}.", entity.name), Severity::Info);
        self.dungeon.push_to_back(entity);
        Ok(TurnOutcome::DidntTakeTurn)
    }

    /// Wears the equipment-bag entry at `index`, replacing whatever occupies its slot.
    pub fn equip(&mut self, index: usize) -> RougeResult<TurnOutcome> {
        let Some((gear_id, equipment, name)) = self
            .equipment_bag
            .get(index)
            .and_then(|e| e.equipment.map(|eq| (e.id, eq, e.name.clone())))
        else {
            self.messages
                .add("You don't have that equipment.", Severity::Warning);
            return Ok(TurnOutcome::DidntTakeTurn);
        };
        if equipment.wearer == Some(self.player_id) {
            self.messages
                .add(format!("The {} is already equipped.", name), Severity::Warning);
            return Ok(TurnOutcome::DidntTakeTurn);
        }

        let slot = equipment.slot;
        if let Some(incumbent) = self.player_fighter().and_then(|f| f.equipped.get(slot)) {
            self.take_off(incumbent)?;
        }

        let fighter = self.player_fighter_mut()?;
        if slot.is_armor() {
            fighter.defense += equipment.stat_bonus;
        } else {
            fighter.power += equipment.stat_bonus;
        }
        fighter.equipped.set(slot, Some(gear_id));

        let player_id = self.player_id;
        if let Some(gear) = self.equipment_bag[index].equipment.as_mut() {
            gear.wearer = Some(player_id);
        }
        self.messages.add(
            format!("Equipped {} on {}.", name, slot.name()),
            Severity::Good,
        );
        Ok(TurnOutcome::TookTurn)
    }

    /// Takes off whatever occupies `slot`.
    pub fn unequip(&mut self, slot: Slot) -> RougeResult<TurnOutcome> {
        let Some(gear_id) = self.player_fighter().and_then(|f| f.equipped.get(slot)) else {
            self.messages.add(
                format!("Nothing is equipped on your {}.", slot.name()),
                Severity::Warning,
            );
            return Ok(TurnOutcome::DidntTakeTurn);
        };
        let name = self.take_off(gear_id)?;
        self.messages.add(
            format!("Dequipped {} from {}.", name, slot.name()),
            Severity::Info,
        );
        Ok(TurnOutcome::TookTurn)
    }

    /// Removes a worn piece's bonus and clears its slot. Returns its name.
    fn take_off(&mut self, gear_id: EntityId) -> RougeResult<String> {
        let gear = self
            .equipment_bag
            .iter_mut()
            .find(|e| e.id == gear_id)
            .ok_or_else(|| {
                RougeError::InvalidState(format!("equipped gear {} is not in the bag", gear_id))
            })?;
        let name = gear.name.clone();
        let equipment = gear.equipment.as_mut().ok_or_else(|| {
            RougeError::InvalidState(format!("{} is not equipment", name))
        })?;
        equipment.wearer = None;
        let (slot, bonus) = (equipment.slot, equipment.stat_bonus);

        let fighter = self.player_fighter_mut()?;
        if slot.is_armor() {
            fighter.defense -= bonus;
        } else {
            fighter.power -= bonus;
        }
        fighter.equipped.set(slot, None);
        Ok(name)
    }

    /// Puts an equipment-bag entry down on the player's tile, taking it off first if worn.
    pub fn drop_equipment(&mut self, index: usize) -> RougeResult<TurnOutcome> {
        let Some((gear_id, worn)) = self.equipment_bag.get(index).map(|e| {
            (
                e.id,
                e.equipment.map(|eq| eq.wearer.is_some()).unwrap_or(false),
            )
        }) else {
            self.messages
                .add("You don't have that equipment.", Severity::Warning);
            return Ok(TurnOutcome::DidntTakeTurn);
        };

        if worn {
            self.take_off(gear_id)?;
        }
        let mut entity = self.equipment_bag.remove(index);
        entity.position = self.player_position();
        self.messages
            .add(format!("You dropped a {}.", entity.name), Severity::Info);
        self.dungeon.push_to_back(entity);
        Ok(TurnOutcome::DidntTakeTurn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Balance;
    use crate::game::state::fixtures::{arena, orc};
    use crate::game::{Equipment, PlayerAction};
    use crate::generation::{equipment_entity, item_entity};
    use crate::input::ScriptedInterface;

    fn give(state: &mut GameState, effect: ItemEffect, tier: u32) {
        let pos = state.player_position();
        state.inventory.push(item_entity(pos, Item::new(effect, tier)));
    }

    #[test]
    fn test_pick_up_moves_item_into_inventory() {
        let mut state = arena();
        let pos = state.player_position();
        let id = state
            .dungeon
            .push_to_back(item_entity(pos, Item::new(ItemEffect::Heal, 1)));

        assert_eq!(state.pick_up().unwrap(), TurnOutcome::TookTurn);
        assert!(state.dungeon.entity(id).is_none());
        assert_eq!(state.inventory.len(), 1);
        assert!(state.messages.contains("You picked up a healing potion!"));
    }

    #[test]
    fn test_pick_up_with_nothing_there() {
        let mut state = arena();
        assert_eq!(state.pick_up().unwrap(), TurnOutcome::DidntTakeTurn);
    }

    #[test]
    fn test_heal_at_full_health_is_cancelled() {
        let mut state = arena();
        give(&mut state, ItemEffect::Heal, 1);
        let mut ui = ScriptedInterface::new();

        assert_eq!(state.use_item(0, &mut ui).unwrap(), TurnOutcome::DidntTakeTurn);
        assert_eq!(state.inventory.len(), 1);
        assert!(state.messages.contains("You are already at full health."));
    }

    #[test]
    fn test_heal_consumes_item() {
        let mut state = arena();
        state.player_fighter_mut().unwrap().hp = 50;
        give(&mut state, ItemEffect::Heal, 1);
        let mut ui = ScriptedInterface::new();

        assert_eq!(state.use_item(0, &mut ui).unwrap(), TurnOutcome::TookTurn);
        assert!(state.inventory.is_empty());
        assert_eq!(state.player_fighter().unwrap().hp, 50 + state.balance.heal_amount);
        assert_eq!(state.statistics.items_used, 1);
    }

    #[test]
    fn test_restore_mana() {
        let mut state = arena();
        give(&mut state, ItemEffect::RestoreMana, 1);
        let mut ui = ScriptedInterface::new();
        assert_eq!(state.use_item(0, &mut ui).unwrap(), TurnOutcome::DidntTakeTurn);

        state.player_fighter_mut().unwrap().mana = Some(0);
        assert_eq!(state.use_item(0, &mut ui).unwrap(), TurnOutcome::TookTurn);
        assert_eq!(state.player_fighter().unwrap().mana, Some(state.balance.mana_amount));
    }

    #[test]
    fn test_lightning_without_target_is_cancelled() {
        let mut state = arena();
        give(&mut state, ItemEffect::Lightning, 1);
        state.dungeon.push(orc(Position::new(10, 10)));
        let mut ui = ScriptedInterface::new();

        assert_eq!(state.use_item(0, &mut ui).unwrap(), TurnOutcome::DidntTakeTurn);
        assert_eq!(state.inventory.len(), 1);
        assert!(state.messages.contains("No enemy is close enough to strike."));
    }

    #[test]
    fn test_lightning_hits_nearest_monster() {
        let mut state = arena();
        give(&mut state, ItemEffect::Lightning, 1);
        let mut far = orc(Position::new(6, 3));
        far.fighter.as_mut().unwrap().max_hp = 100;
        far.fighter.as_mut().unwrap().hp = 100;
        let far = state.dungeon.push(far);
        let mut near = orc(Position::new(5, 3));
        near.fighter.as_mut().unwrap().max_hp = 100;
        near.fighter.as_mut().unwrap().hp = 100;
        let near = state.dungeon.push(near);
        let mut ui = ScriptedInterface::new();

        state.use_item(0, &mut ui).unwrap();
        let hp = |id| state.dungeon.entity(id).unwrap().fighter.as_ref().unwrap().hp;
        assert_eq!(hp(near), 100 - state.balance.lightning_damage);
        assert_eq!(hp(far), 100);
    }

    #[test]
    fn test_fireball_hits_everyone_in_radius() {
        let mut state = arena().with_balance(Balance {
            fireball_damage: 10,
            fireball_radius: 3.0,
            ..Balance::default()
        });
        give(&mut state, ItemEffect::Fireball, 2);

        let sturdy = |pos| {
            let mut monster = orc(pos);
            let fighter = monster.fighter.as_mut().unwrap();
            fighter.max_hp = 100;
            fighter.hp = 100;
            fighter.defense = 50;
            monster
        };
        let inside = state.dungeon.push(sturdy(Position::new(6, 6)));
        let edge = state.dungeon.push(sturdy(Position::new(6, 3)));
        let outside = state.dungeon.push(sturdy(Position::new(10, 6)));

        let target = Position::new(6, 5);
        let mut ui = ScriptedInterface::new().with_targets([Some(target)]);
        assert_eq!(state.use_item(0, &mut ui).unwrap(), TurnOutcome::TookTurn);

        let hp = |id| state.dungeon.entity(id).unwrap().fighter.as_ref().unwrap().hp;
        assert_eq!(hp(inside), 80);
        assert_eq!(hp(edge), 80);
        assert_eq!(hp(outside), 100);
        // the player at (3, 3) is sqrt(13) away
        assert_eq!(state.player_fighter().unwrap().hp, crate::config::PLAYER_MAX_HP);
    }

    #[test]
    fn test_fireball_burns_the_caster() {
        let mut state = arena().with_balance(Balance {
            fireball_damage: 10,
            ..Balance::default()
        });
        give(&mut state, ItemEffect::Fireball, 2);
        let mut ui = ScriptedInterface::new().with_targets([Some(Position::new(4, 4))]);

        state.use_item(0, &mut ui).unwrap();
        assert_eq!(
            state.player_fighter().unwrap().hp,
            crate::config::PLAYER_MAX_HP - 20
        );
    }

    #[test]
    fn test_cancelled_targeting_keeps_scroll() {
        let mut state = arena();
        give(&mut state, ItemEffect::Fireball, 1);
        give(&mut state, ItemEffect::Confuse, 1);
        let mut ui = ScriptedInterface::new();

        assert_eq!(state.use_item(0, &mut ui).unwrap(), TurnOutcome::DidntTakeTurn);
        assert_eq!(state.use_item(1, &mut ui).unwrap(), TurnOutcome::DidntTakeTurn);
        assert_eq!(state.inventory.len(), 2);
    }

    #[test]
    fn test_targeting_reprompts_until_valid() {
        let mut state = arena();
        give(&mut state, ItemEffect::Confuse, 1);
        let id = state.dungeon.push(orc(Position::new(6, 6)));
        let mut ui = ScriptedInterface::new().with_targets([
            Some(Position::new(0, 0)),
            Some(Position::new(5, 5)),
            Some(Position::new(6, 6)),
        ]);

        assert_eq!(state.use_item(0, &mut ui).unwrap(), TurnOutcome::TookTurn);
        assert_eq!(ui.prompts, 3);
        let ai = state.dungeon.entity(id).unwrap().ai.clone().unwrap();
        assert!(ai.is_confused());
    }

    #[test]
    fn test_confusing_twice_keeps_original_ai() {
        let mut state = arena();
        let id = state.dungeon.push(orc(Position::new(6, 6)));
        let mut ui = ScriptedInterface::new()
            .with_targets([Some(Position::new(6, 6)), Some(Position::new(6, 6))]);

        state.apply_item(Item::new(ItemEffect::Confuse, 1), &mut ui).unwrap();
        state.apply_item(Item::new(ItemEffect::Confuse, 2), &mut ui).unwrap();
        let ai = state.dungeon.entity(id).unwrap().ai.clone().unwrap();
        assert_eq!(ai.confusion_depth(), 2);
        assert_eq!(
            ai,
            Ai::Basic
                .confused(state.balance.confuse_turns)
                .confused(state.balance.confuse_turns + 5)
        );
    }

    #[test]
    fn test_equip_swap_and_unequip() {
        let mut state = arena();
        let pos = state.player_position();
        state
            .equipment_bag
            .push(equipment_entity(pos, Equipment::new(Slot::Weapon, 3, 1)));
        state
            .equipment_bag
            .push(equipment_entity(pos, Equipment::new(Slot::Weapon, 5, 2)));
        let base_power = state.player_fighter().unwrap().power;

        assert_eq!(state.equip(0).unwrap(), TurnOutcome::TookTurn);
        assert_eq!(state.player_fighter().unwrap().power, base_power + 3);

        assert_eq!(state.equip(1).unwrap(), TurnOutcome::TookTurn);
        let fighter = state.player_fighter().unwrap();
        assert_eq!(fighter.power, base_power + 5);
        assert_eq!(fighter.equipped.get(Slot::Weapon), Some(state.equipment_bag[1].id));
        assert_eq!(state.equipment_bag[0].equipment.unwrap().wearer, None);

        assert_eq!(state.unequip(Slot::Weapon).unwrap(), TurnOutcome::TookTurn);
        assert_eq!(state.player_fighter().unwrap().power, base_power);
        assert_eq!(state.unequip(Slot::Weapon).unwrap(), TurnOutcome::DidntTakeTurn);
    }

    #[test]
    fn test_drop_worn_armor_unequips_it() {
        let mut state = arena();
        let pos = state.player_position();
        state
            .equipment_bag
            .push(equipment_entity(pos, Equipment::new(Slot::Helmet, 2, 1)));
        let base_defense = state.player_fighter().unwrap().defense;
        state.equip(0).unwrap();

        assert_eq!(state.drop_equipment(0).unwrap(), TurnOutcome::DidntTakeTurn);
        let fighter = state.player_fighter().unwrap();
        assert_eq!(fighter.defense, base_defense);
        assert_eq!(fighter.equipped.get(Slot::Helmet), None);
        assert_eq!(state.dungeon.entities[0].position, pos);
        assert!(state.dungeon.entities[0].equipment.is_some());
    }

    #[test]
    fn test_drop_item_goes_under_everything() {
        let mut state = arena();
        give(&mut state, ItemEffect::Heal, 1);
        let mut ui = ScriptedInterface::new();

        let outcome = state.play_turn(PlayerAction::DropItem(0), &mut ui).unwrap();
        assert_eq!(outcome, TurnOutcome::DidntTakeTurn);
        assert!(state.inventory.is_empty());
        assert_eq!(state.dungeon.entities[0].name, "healing potion");
        assert!(state.messages.contains("You dropped a healing potion."));
    }
}
