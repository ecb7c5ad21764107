//! # Game State Module
//!
//! The simulation context threaded through every turn.
//!
//! [`GameState`] owns the current [`Dungeon`], the player's carried collections, the message log
//! and the shared random number generator. Every player action, AI tick and combat resolution
//! takes it explicitly; nothing in the simulation reaches for globals. One call to
//! [`GameState::play_turn`] is one player tick.

use crate::config::Balance;
use crate::game::{
    Direction, Dungeon, Entity, EntityId, Fighter, MessageLog, PlayerAction, PlayerProgression,
    Position, Severity, Skill, SkillPoints, StatChoice, TurnOutcome, Visibility,
};
use crate::generation::{utils, DungeonGenerator, FloorPlan, GenerationConfig, Generator};
use crate::input::PlayerInterface;
use crate::{RougeError, RougeResult};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Overall game flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Dead,
}

/// Game statistics tracking player progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatistics {
    /// Number of monsters killed by any means
    pub monsters_slain: u32,
    /// Number of consumables used up
    pub items_used: u32,
    /// Total damage dealt to monsters
    pub damage_dealt: u64,
    /// Total damage taken by the player
    pub damage_taken: u64,
    /// Deepest floor reached
    pub max_depth_reached: u32,
    /// Total steps taken
    pub steps_taken: u64,
}

/// What the character screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSheet {
    pub level: u32,
    pub xp: i32,
    pub xp_to_next: i32,
    pub hp: i32,
    pub max_hp: i32,
    pub power: i32,
    pub defense: i32,
    pub mana: Option<i32>,
    pub max_mana: Option<i32>,
    pub gold: i32,
    pub depth: u32,
    pub skill_points: SkillPoints,
}

/// Central game state containing all simulation data.
///
/// The player entity lives in `dungeon.entities` like everything else and is found through
/// `player_id`. On descent it is lifted out of the old floor and pushed into the new one.
#[derive(Debug, Clone)]
pub struct GameState {
    /// The current floor
    pub dungeon: Dungeon,
    pub player_id: EntityId,
    /// Carried consumables
    pub inventory: Vec<Entity>,
    /// Carried gear, worn or not
    pub equipment_bag: Vec<Entity>,
    pub messages: MessageLog,
    pub status: GameStatus,
    pub progression: PlayerProgression,
    pub balance: Balance,
    pub generation: GenerationConfig,
    pub statistics: GameStatistics,
    /// Number of turns the player has taken
    pub turn_number: u64,
    /// Random number generator seed
    pub rng_seed: u64,
    /// Shared generator for spawning, combat rolls and confused wandering
    pub rng: StdRng,
    /// Derived field of view; rebuilt, never persisted
    pub visibility: Visibility,
}

impl GameState {
    /// Starts a new game with the standard configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use rouge::{GameState, GameStatus};
    ///
    /// let state = GameState::new_game(42).unwrap();
    /// assert_eq!(state.dungeon.depth, 1);
    /// assert_eq!(state.status, GameStatus::Playing);
    /// assert!(state.visibility.is_visible(state.player_position()));
    /// ```
    pub fn new_game(seed: u64) -> RougeResult<Self> {
        Self::with_config(GenerationConfig::new(seed), Balance::default())
    }

    /// Starts a new game on the first floor of `generation`.
    pub fn with_config(generation: GenerationConfig, balance: Balance) -> RougeResult<Self> {
        generation.validate()?;
        balance.validate()?;
        let mut rng = utils::create_rng(&generation);
        let plan = FloorPlan::new(1, 1);
        let dungeon = DungeonGenerator::new(generation.clone()).generate(&plan, &mut rng)?;
        let player = Entity::player(dungeon.player_spawn);

        let mut state = Self::assemble(dungeon, player, generation, rng);
        state.balance = balance;
        state.messages.add(
            "Welcome, stranger! Prepare to perish in the depths below.",
            Severity::Danger,
        );
        state.update_fov();
        log::info!(
            "new game with seed {}: {} entities on depth 1",
            state.rng_seed,
            state.dungeon.entities.len()
        );
        Ok(state)
    }

    /// Wraps an existing floor and player into a game, e.g. for hand-built scenarios.
    ///
    /// The player is placed on top of the render order at its own position. Later floors come
    /// from `generation`.
    pub fn from_dungeon(dungeon: Dungeon, player: Entity, generation: GenerationConfig) -> Self {
        let rng = utils::create_rng(&generation);
        let mut state = Self::assemble(dungeon, player, generation, rng);
        state.update_fov();
        state
    }

    /// Replaces the balance numbers.
    pub fn with_balance(mut self, balance: Balance) -> Self {
        self.balance = balance;
        self.visibility.request_recompute();
        self.update_fov();
        self
    }

    fn assemble(mut dungeon: Dungeon, player: Entity, generation: GenerationConfig, rng: StdRng) -> Self {
        let depth = dungeon.depth;
        let player_id = dungeon.push(player);
        Self {
            dungeon,
            player_id,
            inventory: Vec::new(),
            equipment_bag: Vec::new(),
            messages: MessageLog::default(),
            status: GameStatus::Playing,
            progression: PlayerProgression::new(),
            balance: Balance::default(),
            rng_seed: generation.seed,
            generation,
            statistics: GameStatistics {
                max_depth_reached: depth,
                ..GameStatistics::default()
            },
            turn_number: 0,
            rng,
            visibility: Visibility::new(),
        }
    }

    pub fn player(&self) -> Option<&Entity> {
        self.dungeon.entity(self.player_id)
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.dungeon.entity_mut(self.player_id)
    }

    pub fn player_fighter(&self) -> Option<&Fighter> {
        self.player().and_then(|p| p.fighter.as_ref())
    }

    pub(crate) fn player_fighter_mut(&mut self) -> RougeResult<&mut Fighter> {
        self.player_mut()
            .and_then(|p| p.fighter.as_mut())
            .ok_or_else(|| RougeError::InvalidState("the player has no fighter".to_string()))
    }

    /// Current player position, or the floor's spawn point if the player is missing.
    pub fn player_position(&self) -> Position {
        self.player()
            .map(|p| p.position)
            .unwrap_or(self.dungeon.player_spawn)
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::Dead
    }

    /// Recomputes the field of view if a recompute was requested.
    pub fn update_fov(&mut self) -> bool {
        let origin = self.player_position();
        self.visibility.update(
            &mut self.dungeon,
            origin,
            self.balance.torch_radius,
            self.balance.light_walls,
        )
    }

    /// Runs one player tick.
    ///
    /// The action is resolved first. If it took a turn, every monster holding an AI gets
    /// exactly one tick, in entity-list order. Level-ups are resolved afterwards, prompting the
    /// player once per threshold crossed.
    pub fn play_turn(
        &mut self,
        action: PlayerAction,
        ui: &mut dyn PlayerInterface,
    ) -> RougeResult<TurnOutcome> {
        if self.is_game_over() {
            return Ok(TurnOutcome::GameOver);
        }
        log::debug!("turn {}: player chose {}", self.turn_number, action.name());

        let outcome = match action {
            PlayerAction::Move(direction) => self.move_or_attack(direction)?,
            PlayerAction::Wait => TurnOutcome::TookTurn,
            PlayerAction::PickUp => self.pick_up()?,
            PlayerAction::UseItem(index) => self.use_item(index, ui)?,
            PlayerAction::DropItem(index) => self.drop_item(index)?,
            PlayerAction::Equip(index) => self.equip(index)?,
            PlayerAction::Unequip(slot) => self.unequip(slot)?,
            PlayerAction::DropEquipment(index) => self.drop_equipment(index)?,
            PlayerAction::Descend => self.descend()?,
        };
        self.update_fov();

        if outcome.took_turn() {
            self.turn_number += 1;
        }
        if self.is_game_over() {
            return Ok(TurnOutcome::GameOver);
        }

        if outcome == TurnOutcome::TookTurn {
            self.run_monster_turns()?;
            if self.is_game_over() {
                return Ok(TurnOutcome::GameOver);
            }
        }

        self.check_level_up(ui)?;
        Ok(outcome)
    }

    /// Steps into `direction`, or attacks the fighter standing there.
    ///
    /// Walking into a wall still spends the turn but leaves the field of view alone.
    fn move_or_attack(&mut self, direction: Direction) -> RougeResult<TurnOutcome> {
        let destination = self.player_position() + direction.to_delta();

        let target = self
            .dungeon
            .fighter_at(destination)
            .filter(|&id| id != self.player_id);
        if let Some(target) = target {
            self.attack(self.player_id, target)?;
            return Ok(TurnOutcome::TookTurn);
        }

        if !self.dungeon.is_blocked(destination) {
            if let Some(player) = self.player_mut() {
                player.position = destination;
            }
            self.visibility.request_recompute();
            self.statistics.steps_taken += 1;
        }
        Ok(TurnOutcome::TookTurn)
    }

    /// Takes the stairs if the player stands on them and no boss guards the floor.
    pub fn descend(&mut self) -> RougeResult<TurnOutcome> {
        let on_stairs = self
            .dungeon
            .stairs()
            .map(|stairs| stairs.position == self.player_position())
            .unwrap_or(false);
        if !on_stairs {
            self.messages.add("There are no stairs here.", Severity::Warning);
            return Ok(TurnOutcome::DidntTakeTurn);
        }
        if self.dungeon.boss_present {
            self.messages.add(
                "A powerful presence bars the way down. Defeat it first!",
                Severity::Danger,
            );
            return Ok(TurnOutcome::DidntTakeTurn);
        }

        self.next_level()?;
        Ok(TurnOutcome::Descended)
    }

    /// Rests, then replaces the floor with a freshly generated one a level deeper.
    pub fn next_level(&mut self) -> RougeResult<()> {
        let depth = self.dungeon.depth + 1;
        self.build_floor(depth)?;

        self.messages.add(
            "You take a moment to rest, and recover your strength.",
            Severity::Progress,
        );
        let fighter = self.player_fighter_mut()?;
        let half = fighter.max_hp / 2;
        fighter.heal(half);

        self.messages
            .add(format!("Level {}!", depth), Severity::Progress);
        if self.dungeon.boss_present {
            if self.generation.is_boss_floor(depth) {
                self.messages.add(
                    "The ground trembles. Something ancient waits on this floor.",
                    Severity::Danger,
                );
            } else {
                self.messages
                    .add("A chill runs down your spine...", Severity::Danger);
            }
        }

        self.statistics.max_depth_reached = self.statistics.max_depth_reached.max(depth);
        log::info!("descended to depth {}", depth);
        Ok(())
    }

    /// Generates floor `depth` and moves the player onto its spawn point.
    ///
    /// The old floor is left untouched if generation fails.
    fn build_floor(&mut self, depth: u32) -> RougeResult<()> {
        let plan = FloorPlan::new(depth, self.progression.level);
        let mut dungeon =
            DungeonGenerator::new(self.generation.clone()).generate(&plan, &mut self.rng)?;

        let mut player = self.dungeon.remove(self.player_id).ok_or_else(|| {
            RougeError::InvalidState("the player is missing from the dungeon".to_string())
        })?;
        player.position = dungeon.player_spawn;
        dungeon.push(player);

        self.dungeon = dungeon;
        self.visibility.reset();
        self.update_fov();
        Ok(())
    }

    /// Resolves every pending level-up, asking for one stat and one skill per level.
    fn check_level_up(&mut self, ui: &mut dyn PlayerInterface) -> RougeResult<()> {
        while self
            .progression
            .try_level_up(self.balance.level_up_base, self.balance.level_up_factor)
        {
            let level = self.progression.level;
            self.messages.add(
                format!("Your battle skills grow stronger! You reached level {}!", level),
                Severity::Progress,
            );
            log::info!("player reached level {}", level);

            let stat = loop {
                let index = ui.choose_stat(self, &StatChoice::ALL);
                if let Some(&choice) = StatChoice::ALL.get(index) {
                    break choice;
                }
            };
            stat.apply(self.player_fighter_mut()?);

            let skill = loop {
                let index = ui.choose_skill(self, &Skill::ALL);
                if let Some(&choice) = Skill::ALL.get(index) {
                    break choice;
                }
            };
            self.progression.skill_points.add(skill);
            log::debug!("level {}: chose {:?} and {:?}", level, stat, skill);
        }
        Ok(())
    }

    /// Numbers for the character screen.
    pub fn character_sheet(&self) -> Option<CharacterSheet> {
        let fighter = self.player_fighter()?;
        Some(CharacterSheet {
            level: self.progression.level,
            xp: self.progression.xp,
            xp_to_next: self
                .progression
                .xp_to_next(self.balance.level_up_base, self.balance.level_up_factor),
            hp: fighter.hp,
            max_hp: fighter.max_hp,
            power: fighter.power,
            defense: fighter.defense,
            mana: fighter.mana,
            max_mana: fighter.max_mana,
            gold: self.progression.gold,
            depth: self.dungeon.depth,
            skill_points: self.progression.skill_points,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{arena, orc};
    use super::*;
    use crate::input::ScriptedInterface;

    #[test]
    fn test_new_game_places_player_on_spawn() {
        let state = GameState::new_game(99).unwrap();
        let player = state.player().unwrap();
        assert_eq!(player.position, state.dungeon.player_spawn);
        assert_eq!(state.dungeon.entities.last().map(|e| e.id), Some(state.player_id));
        assert!(!state.messages.is_empty());
        assert!(state.dungeon.is_explored(player.position));
        assert_eq!(state.statistics.max_depth_reached, 1);
    }

    #[test]
    fn test_move_updates_position_and_fov() {
        let mut state = arena();
        let mut ui = ScriptedInterface::new();
        let outcome = state
            .play_turn(PlayerAction::Move(Direction::East), &mut ui)
            .unwrap();
        assert_eq!(outcome, TurnOutcome::TookTurn);
        assert_eq!(state.player_position(), Position::new(4, 3));
        assert!(!state.visibility.needs_recompute());
        assert_eq!(state.statistics.steps_taken, 1);
        assert_eq!(state.turn_number, 1);
    }

    #[test]
    fn test_move_into_wall_spends_turn_without_fov() {
        let mut state = arena();
        state.player_mut().unwrap().position = Position::new(1, 1);
        state.visibility.request_recompute();
        state.update_fov();

        let mut ui = ScriptedInterface::new();
        let outcome = state
            .play_turn(PlayerAction::Move(Direction::North), &mut ui)
            .unwrap();
        assert_eq!(outcome, TurnOutcome::TookTurn);
        assert_eq!(state.player_position(), Position::new(1, 1));
        assert_eq!(state.statistics.steps_taken, 0);
    }

    #[test]
    fn test_bump_attacks_instead_of_moving() {
        let mut state = arena();
        let orc_id = state.dungeon.push(orc(Position::new(4, 3)));
        let mut ui = ScriptedInterface::new();

        state
            .play_turn(PlayerAction::Move(Direction::East), &mut ui)
            .unwrap();
        assert_eq!(state.player_position(), Position::new(3, 3));
        let orc = state.dungeon.entity(orc_id).unwrap();
        assert_eq!(orc.fighter.as_ref().unwrap().hp, 2);
        assert!(state.messages.contains("Player attacks orc for 8 hit points."));
    }

    #[test]
    fn test_descend_requires_stairs() {
        let mut state = arena();
        let mut ui = ScriptedInterface::new();
        let outcome = state.play_turn(PlayerAction::Descend, &mut ui).unwrap();
        assert_eq!(outcome, TurnOutcome::DidntTakeTurn);
        assert!(state.messages.contains("There are no stairs here."));
        assert_eq!(state.dungeon.depth, 1);
        assert_eq!(state.turn_number, 0);
    }

    #[test]
    fn test_level_up_prompts_once_per_threshold() {
        let mut state = arena();
        state.progression.xp = 350 + 500 + 10;
        let mut ui = ScriptedInterface::new().with_stats([1, 2]).with_skills([3, 0]);

        state.play_turn(PlayerAction::Wait, &mut ui).unwrap();
        assert_eq!(state.progression.level, 3);
        assert_eq!(state.progression.xp, 10);
        assert_eq!(ui.prompts, 4);

        let fighter = state.player_fighter().unwrap();
        assert_eq!(fighter.power, crate::config::PLAYER_POWER + 1);
        assert_eq!(fighter.defense, crate::config::PLAYER_DEFENSE + 1);
        assert_eq!(state.progression.skill_points.last_stand, 1);
        assert_eq!(state.progression.skill_points.wild, 1);
    }

    #[test]
    fn test_dead_player_cannot_act() {
        let mut state = arena();
        state.status = GameStatus::Dead;
        let mut ui = ScriptedInterface::new();
        let outcome = state.play_turn(PlayerAction::Wait, &mut ui).unwrap();
        assert_eq!(outcome, TurnOutcome::GameOver);
        assert_eq!(state.turn_number, 0);
    }

    #[test]
    fn test_character_sheet() {
        let mut state = arena();
        state.progression.gold = 12;
        let sheet = state.character_sheet().unwrap();
        assert_eq!(sheet.level, 1);
        assert_eq!(sheet.xp_to_next, 350);
        assert_eq!(sheet.max_hp, crate::config::PLAYER_MAX_HP);
        assert_eq!(sheet.gold, 12);
        assert_eq!(sheet.depth, 1);
    }
}
