//! # Input Module
//!
//! The seam between the simulation and whatever collects player input.
//!
//! Discrete intents arrive as [`PlayerAction`](crate::PlayerAction)s. Prompts that must block
//! the simulation (level-up choices, tile targeting) go through a [`PlayerInterface`], which the
//! turn loop calls synchronously; a graphical front end keeps rendering inside those calls.

use crate::game::{GameState, Position, Skill, StatChoice};
use std::collections::VecDeque;

/// Blocking prompts the simulation needs answered.
pub trait PlayerInterface {
    /// Returns an index into `options`. Called again until the index is valid.
    fn choose_stat(&mut self, state: &GameState, options: &[StatChoice]) -> usize;

    /// Returns an index into `options`. Called again until the index is valid.
    fn choose_skill(&mut self, state: &GameState, options: &[Skill]) -> usize;

    /// Returns the clicked tile, or `None` when the player cancels.
    ///
    /// The simulation re-asks while the answer is out of sight or beyond `max_range`.
    fn select_tile(&mut self, state: &GameState, max_range: Option<f64>) -> Option<Position>;
}

/// Answers prompts from pre-recorded queues.
///
/// Once a queue runs dry it answers with the first option, or cancels targeting.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInterface {
    stats: VecDeque<usize>,
    skills: VecDeque<usize>,
    targets: VecDeque<Option<Position>>,
    /// Number of prompts answered so far
    pub prompts: usize,
}

impl ScriptedInterface {
    /// Creates an interface with empty queues.
    ///
    /// # Examples
    ///
    /// ```
    /// use rouge::{Position, ScriptedInterface};
    ///
    /// let ui = ScriptedInterface::new()
    ///     .with_stats([1, 2])
    ///     .with_targets([Some(Position::new(3, 3)), None]);
    /// assert_eq!(ui.prompts, 0);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stats(mut self, stats: impl IntoIterator<Item = usize>) -> Self {
        self.stats.extend(stats);
        self
    }

    pub fn with_skills(mut self, skills: impl IntoIterator<Item = usize>) -> Self {
        self.skills.extend(skills);
        self
    }

    pub fn with_targets(mut self, targets: impl IntoIterator<Item = Option<Position>>) -> Self {
        self.targets.extend(targets);
        self
    }

    pub fn push_target(&mut self, target: Option<Position>) {
        self.targets.push_back(target);
    }
}

impl PlayerInterface for ScriptedInterface {
    fn choose_stat(&mut self, _state: &GameState, options: &[StatChoice]) -> usize {
        self.prompts += 1;
        self.stats
            .pop_front()
            .filter(|&index| index < options.len())
            .unwrap_or(0)
    }

    fn choose_skill(&mut self, _state: &GameState, options: &[Skill]) -> usize {
        self.prompts += 1;
        self.skills
            .pop_front()
            .filter(|&index| index < options.len())
            .unwrap_or(0)
    }

    fn select_tile(&mut self, _state: &GameState, _max_range: Option<f64>) -> Option<Position> {
        self.prompts += 1;
        self.targets.pop_front().flatten()
    }
}
