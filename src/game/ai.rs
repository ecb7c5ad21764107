//! # Monster AI
//!
//! One tick per monster per player turn. [`Ai::Basic`] chases and attacks whatever it can see;
//! [`Ai::Confused`] stumbles around and then peels back to the behaviour it wraps.

use crate::game::{Ai, EntityId, GameState, Position, Severity};
use crate::utils::step_towards;
use crate::RougeResult;
use rand::Rng;

impl GameState {
    /// Gives every monster holding an AI exactly one tick, in entity-list order.
    ///
    /// The actor list is fixed before the first tick, so monsters spawned mid-pass wait for the
    /// next turn and monsters killed mid-pass are skipped once their AI is gone.
    pub(crate) fn run_monster_turns(&mut self) -> RougeResult<()> {
        let player_id = self.player_id;
        let actors: Vec<EntityId> = self
            .dungeon
            .entities
            .iter()
            .filter(|e| e.id != player_id && e.ai.is_some())
            .map(|e| e.id)
            .collect();

        for id in actors {
            let ai = match self.dungeon.entity_mut(id).and_then(|e| e.ai.take()) {
                Some(ai) => ai,
                None => continue,
            };

            let next = match ai {
                Ai::Basic => {
                    self.basic_tick(id)?;
                    Ai::Basic
                }
                Ai::Confused {
                    previous_ai,
                    turns_remaining,
                } => self.confused_tick(id, *previous_ai, turns_remaining),
            };

            if let Some(entity) = self.dungeon.entity_mut(id) {
                if entity.fighter.is_some() {
                    entity.ai = Some(next);
                }
            }
        }
        Ok(())
    }

    /// Chase the player while in view; attack when adjacent.
    fn basic_tick(&mut self, id: EntityId) -> RougeResult<()> {
        let position = match self.dungeon.entity(id) {
            Some(entity) => entity.position,
            None => return Ok(()),
        };
        // Visibility is treated as symmetric: if the player sees the tile, the monster sees the player.
        if !self.visibility.is_visible(position) {
            return Ok(());
        }

        let target = self.player_position();
        if position.euclidean_distance(target) >= 2.0 {
            self.move_by(id, step_towards(position, target));
        } else if self.player_fighter().map(|f| f.hp > 0).unwrap_or(false) {
            self.attack(id, self.player_id)?;
        }
        Ok(())
    }

    /// One random step while confused; unwraps one layer once the counter has run out.
    fn confused_tick(&mut self, id: EntityId, previous_ai: Ai, turns_remaining: u32) -> Ai {
        if turns_remaining > 0 {
            let delta = Position::new(self.rng.gen_range(-1..=1), self.rng.gen_range(-1..=1));
            self.move_by(id, delta);
            return Ai::Confused {
                previous_ai: Box::new(previous_ai),
                turns_remaining: turns_remaining - 1,
            };
        }

        if let Some(entity) = self.dungeon.entity(id) {
            let text = format!("The {} is no longer confused!", entity.name);
            self.messages.add(text, Severity::Warning);
            log::debug!("{} recovered from confusion", id);
        }
        previous_ai
    }

    /// Moves an entity by `delta` unless the destination is blocked.
    ///
    /// Monsters never turn a blocked step into an attack.
    fn move_by(&mut self, id: EntityId, delta: Position) -> bool {
        if delta == Position::new(0, 0) {
            return false;
        }
        let destination = match self.dungeon.entity(id) {
            Some(entity) => entity.position + delta,
            None => return false,
        };
        if self.dungeon.is_blocked(destination) {
            return false;
        }
        if let Some(entity) = self.dungeon.entity_mut(id) {
            entity.position = destination;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::fixtures::{arena, orc};
    use crate::game::{PlayerAction, TurnOutcome};
    use crate::input::ScriptedInterface;

    fn wait(state: &mut GameState) -> TurnOutcome {
        let mut ui = ScriptedInterface::new();
        state.play_turn(PlayerAction::Wait, &mut ui).unwrap()
    }

    #[test]
    fn test_basic_ai_chases_visible_player() {
        let mut state = arena();
        let id = state.dungeon.push(orc(Position::new(7, 3)));

        wait(&mut state);
        assert_eq!(state.dungeon.entity(id).unwrap().position, Position::new(6, 3));
    }

    #[test]
    fn test_basic_ai_attacks_when_adjacent() {
        let mut state = arena();
        state.dungeon.push(orc(Position::new(4, 4)));

        wait(&mut state);
        let hp = state.player_fighter().unwrap().hp;
        // power 3 against the player's 2 defense
        assert_eq!(hp, crate::config::PLAYER_MAX_HP - 2);
        assert!(state.messages.contains("Orc attacks player for 2 hit points."));
    }

    #[test]
    fn test_basic_ai_idles_out_of_sight() {
        let mut state = arena();
        // wall off the orc's corner
        for y in 1..11 {
            state.dungeon.tiles[y][6] = crate::game::Tile::wall();
        }
        state.visibility.request_recompute();
        state.update_fov();
        let id = state.dungeon.push(orc(Position::new(9, 3)));

        wait(&mut state);
        assert_eq!(state.dungeon.entity(id).unwrap().position, Position::new(9, 3));
    }

    #[test]
    fn test_confusion_lasts_exactly_n_ticks() {
        let mut state = arena();
        let mut monster = orc(Position::new(8, 3));
        monster.ai = Some(Ai::Basic.confused(3));
        let id = state.dungeon.push(monster);

        for expected in [2, 1, 0] {
            wait(&mut state);
            match state.dungeon.entity(id).unwrap().ai.as_ref().unwrap() {
                Ai::Confused { turns_remaining, .. } => assert_eq!(*turns_remaining, expected),
                Ai::Basic => panic!("recovered too early"),
            }
        }
        wait(&mut state);
        assert_eq!(state.dungeon.entity(id).unwrap().ai, Some(Ai::Basic));
        assert!(state.messages.contains("The orc is no longer confused!"));
    }

    #[test]
    fn test_double_confusion_unwraps_one_layer_at_a_time() {
        let mut state = arena();
        let mut monster = orc(Position::new(8, 8));
        monster.ai = Some(Ai::Basic.confused(1).confused(1));
        let id = state.dungeon.push(monster);

        // outer: one step, then unwrap to the inner layer
        wait(&mut state);
        wait(&mut state);
        let ai = state.dungeon.entity(id).unwrap().ai.clone().unwrap();
        assert_eq!(ai, Ai::Basic.confused(1));

        wait(&mut state);
        wait(&mut state);
        assert_eq!(state.dungeon.entity(id).unwrap().ai, Some(Ai::Basic));
    }

    #[test]
    fn test_confused_monster_never_attacks() {
        let mut state = arena();
        let mut monster = orc(Position::new(4, 3));
        monster.ai = Some(Ai::Basic.confused(5));
        state.dungeon.push(monster);

        for _ in 0..5 {
            wait(&mut state);
        }
        assert_eq!(
            state.player_fighter().unwrap().hp,
            crate::config::PLAYER_MAX_HP
        );
    }
}
