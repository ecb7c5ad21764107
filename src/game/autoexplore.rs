//! # Autoexplore Module
//!
//! A bot that plays the game: it fights what it sees, loots, drinks potions when hurt,
//! explores toward the nearest unexplored frontier and takes the stairs once a floor is clear.
//!
//! The headless binary and the soak tests drive games with it. It also answers the blocking
//! prompts, so it doubles as a [`PlayerInterface`].

use crate::game::{
    Direction, EntityId, GameState, ItemEffect, PlayerAction, Position, Skill, StatChoice,
};
use crate::input::PlayerInterface;
use crate::utils::{find_nearest, find_path};
use std::cmp::Ordering;

/// Autopilot state.
#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Path currently being followed, excluding the player's tile
    pub current_path: Vec<Position>,
    /// Current target position
    pub target: Option<Position>,
    /// Fraction of max hp below which healing potions are used
    pub heal_threshold: f64,
    stat_cursor: usize,
    skill_cursor: usize,
}

impl Autopilot {
    pub fn new() -> Self {
        Self {
            current_path: Vec::new(),
            target: None,
            heal_threshold: 0.4,
            stat_cursor: 0,
            skill_cursor: 0,
        }
    }

    /// Picks the next action, or `None` once the game is over.
    ///
    /// # Examples
    ///
    /// ```
    /// use rouge::{Autopilot, GameState};
    ///
    /// let mut state = GameState::new_game(3).unwrap();
    /// let mut bot = Autopilot::new();
    /// for _ in 0..50 {
    ///     let Some(action) = bot.next_action(&state) else { break };
    ///     state.play_turn(action, &mut bot).unwrap();
    /// }
    /// assert!(state.turn_number > 0);
    /// ```
    pub fn next_action(&mut self, state: &GameState) -> Option<PlayerAction> {
        if state.is_game_over() {
            return None;
        }
        let player = state.player()?;
        let fighter = player.fighter.as_ref()?;
        let position = player.position;
        self.current_path.clear();
        self.target = None;

        if (fighter.hp as f64) < fighter.max_hp as f64 * self.heal_threshold {
            if let Some(index) = find_item(state, ItemEffect::Heal) {
                return Some(PlayerAction::UseItem(index));
            }
        }

        if let Some(direction) = adjacent_monster(state, position) {
            return Some(PlayerAction::Move(direction));
        }

        if let Some(index) = gear_upgrade(state) {
            return Some(PlayerAction::Equip(index));
        }

        if can_pick_up(state, position) {
            return Some(PlayerAction::PickUp);
        }

        let on_stairs = state
            .dungeon
            .stairs()
            .map(|s| s.position == position)
            .unwrap_or(false);
        if on_stairs && !state.dungeon.boss_present {
            return Some(PlayerAction::Descend);
        }

        if let Some(goal) = nearest_visible_monster(state, position) {
            if let Some(action) = self.walk_to(state, position, goal) {
                return Some(action);
            }
        }

        let loot = state
            .dungeon
            .entities
            .iter()
            .filter(|e| e.is_pickable() && state.visibility.is_visible(e.position))
            .filter(|e| has_room_for(state, e.item.is_some()))
            .map(|e| e.position)
            .min_by_key(|p| p.chebyshev_distance(position));
        if let Some(goal) = loot {
            if let Some(action) = self.walk_to(state, position, goal) {
                return Some(action);
            }
        }

        if !state.dungeon.boss_present {
            let stairs = state
                .dungeon
                .stairs()
                .map(|s| s.position)
                .filter(|&p| state.dungeon.is_explored(p));
            if let Some(goal) = stairs {
                if let Some(action) = self.walk_to(state, position, goal) {
                    return Some(action);
                }
            }
        }

        let frontier = find_nearest(
            position,
            |p| state.dungeon.is_explored(p) && !state.dungeon.is_blocked(p),
            |p| is_frontier(state, p),
        );
        if let Some(path) = frontier {
            return self.follow(position, path);
        }

        Some(PlayerAction::Wait)
    }

    fn walk_to(&mut self, state: &GameState, from: Position, goal: Position) -> Option<PlayerAction> {
        let path = find_path(from, goal, |p| {
            state.dungeon.is_explored(p) && !state.dungeon.is_blocked(p)
        })?;
        self.follow(from, path)
    }

    fn follow(&mut self, from: Position, path: Vec<Position>) -> Option<PlayerAction> {
        let next = *path.first()?;
        self.target = path.last().copied();
        self.current_path = path;
        Direction::from_delta(next - from).map(PlayerAction::Move)
    }
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerInterface for Autopilot {
    /// Cycles through the stat menu.
    fn choose_stat(&mut self, _state: &GameState, options: &[StatChoice]) -> usize {
        let index = self.stat_cursor % options.len().max(1);
        self.stat_cursor += 1;
        index
    }

    fn choose_skill(&mut self, _state: &GameState, options: &[Skill]) -> usize {
        let index = self.skill_cursor % options.len().max(1);
        self.skill_cursor += 1;
        index
    }

    /// Aims at the nearest monster in view, keeping area effects off the player.
    fn select_tile(&mut self, state: &GameState, max_range: Option<f64>) -> Option<Position> {
        let origin = state.player_position();
        let min_distance = match max_range {
            Some(_) => 0.0,
            None => state.balance.fireball_radius,
        };
        let max_distance = max_range.unwrap_or(f64::INFINITY);

        state
            .dungeon
            .entities
            .iter()
            .filter(|e| e.id != state.player_id && e.is_alive())
            .filter(|e| state.visibility.is_visible(e.position))
            .map(|e| (e.position, e.position.euclidean_distance(origin)))
            .filter(|&(_, d)| d > min_distance && d <= max_distance)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
            .map(|(pos, _)| pos)
    }
}

fn find_item(state: &GameState, effect: ItemEffect) -> Option<usize> {
    state
        .inventory
        .iter()
        .position(|e| e.item.map(|i| i.effect == effect).unwrap_or(false))
}

fn adjacent_monster(state: &GameState, position: Position) -> Option<Direction> {
    Direction::ALL.into_iter().find(|direction| {
        let target = position + direction.to_delta();
        state.visibility.is_visible(target)
            && state
                .dungeon
                .fighter_at(target)
                .map(|id| id != state.player_id)
                .unwrap_or(false)
    })
}

fn nearest_visible_monster(state: &GameState, position: Position) -> Option<Position> {
    state
        .dungeon
        .entities
        .iter()
        .filter(|e| e.id != state.player_id && e.is_alive() && e.ai.is_some())
        .filter(|e| state.visibility.is_visible(e.position))
        .map(|e| e.position)
        .min_by_key(|p| p.chebyshev_distance(position))
}

fn has_room_for(state: &GameState, is_item: bool) -> bool {
    let carried = if is_item {
        state.inventory.len()
    } else {
        state.equipment_bag.len()
    };
    carried < state.balance.inventory_capacity
}

fn can_pick_up(state: &GameState, position: Position) -> bool {
    state
        .dungeon
        .entities
        .iter()
        .rev()
        .find(|e| e.position == position && e.is_pickable())
        .map(|e| has_room_for(state, e.item.is_some()))
        .unwrap_or(false)
}

/// Index of an unworn bag entry that beats whatever occupies its slot.
fn gear_upgrade(state: &GameState) -> Option<usize> {
    let fighter = state.player_fighter()?;
    let worn_bonus = |id: EntityId| {
        state
            .equipment_bag
            .iter()
            .find(|e| e.id == id)
            .and_then(|e| e.equipment)
            .map(|eq| eq.stat_bonus)
            .unwrap_or(0)
    };

    state.equipment_bag.iter().position(|entity| {
        entity
            .equipment
            .filter(|eq| eq.wearer.is_none())
            .map(|eq| {
                let current = fighter.equipped.get(eq.slot).map(worn_bonus).unwrap_or(0);
                eq.stat_bonus > current
            })
            .unwrap_or(false)
    })
}

/// An explored, walkable tile with an unexplored tile next to it.
fn is_frontier(state: &GameState, position: Position) -> bool {
    !state.dungeon.is_wall(position)
        && position.adjacent_positions().into_iter().any(|p| {
            state.dungeon.is_valid_position(p) && !state.dungeon.is_explored(p)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::fixtures::{arena, orc};
    use crate::game::{Equipment, Item, Slot};
    use crate::generation::{equipment_entity, item_entity};

    #[test]
    fn test_attacks_adjacent_monster_first() {
        let mut state = arena();
        state.dungeon.push(orc(Position::new(4, 3)));
        let mut bot = Autopilot::new();
        assert_eq!(
            bot.next_action(&state),
            Some(PlayerAction::Move(Direction::East))
        );
    }

    #[test]
    fn test_heals_when_low() {
        let mut state = arena();
        state.player_fighter_mut().unwrap().hp = 10;
        let pos = state.player_position();
        state
            .inventory
            .push(item_entity(pos, Item::new(ItemEffect::Heal, 1)));
        let mut bot = Autopilot::new();
        assert_eq!(bot.next_action(&state), Some(PlayerAction::UseItem(0)));
    }

    #[test]
    fn test_picks_up_and_equips() {
        let mut state = arena();
        let pos = state.player_position();
        state
            .dungeon
            .push_to_back(item_entity(pos, Item::new(ItemEffect::Confuse, 1)));
        let mut bot = Autopilot::new();
        assert_eq!(bot.next_action(&state), Some(PlayerAction::PickUp));

        state.dungeon.entities.retain(|e| e.item.is_none());
        state
            .equipment_bag
            .push(equipment_entity(pos, Equipment::new(Slot::Boots, 1, 1)));
        assert_eq!(bot.next_action(&state), Some(PlayerAction::Equip(0)));
    }

    #[test]
    fn test_walks_to_stairs_and_descends() {
        let mut state = arena();
        let mut bot = Autopilot::new();
        let mut descended = false;
        for _ in 0..30 {
            let action = bot.next_action(&state).unwrap();
            if action == PlayerAction::Descend {
                descended = true;
                break;
            }
            state.play_turn(action, &mut bot).unwrap();
        }
        assert!(descended);
        assert_eq!(state.player_position(), Position::new(8, 8));
    }

    #[test]
    fn test_targets_keep_fireball_off_the_player() {
        let mut state = arena();
        state.dungeon.push(orc(Position::new(4, 4)));
        state.dungeon.push(orc(Position::new(9, 9)));
        let mut bot = Autopilot::new();

        assert_eq!(bot.select_tile(&state, None), Some(Position::new(9, 9)));
        assert_eq!(bot.select_tile(&state, Some(8.0)), Some(Position::new(4, 4)));
        assert_eq!(bot.choose_stat(&state, &StatChoice::ALL), 0);
        assert_eq!(bot.choose_stat(&state, &StatChoice::ALL), 1);
    }
}
