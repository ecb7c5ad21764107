//! # Message Log
//!
//! The scrolling log shown to the player. Each line carries a [`Severity`] that the renderer
//! turns into a colour; the log keeps a fixed number of lines and drops the oldest first.

use crate::config;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// 24-bit colour handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GREY: Color = Color::rgb(128, 128, 128);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const DARK_RED: Color = Color::rgb(128, 0, 0);
    pub const ORANGE: Color = Color::rgb(255, 127, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const DARK_GREEN: Color = Color::rgb(0, 128, 0);
    pub const LIGHT_CYAN: Color = Color::rgb(115, 255, 255);
    pub const LIGHT_BLUE: Color = Color::rgb(115, 115, 255);
    pub const LIGHT_VIOLET: Color = Color::rgb(185, 115, 255);
    pub const SKY: Color = Color::rgb(0, 191, 255);
    pub const PURPLE: Color = Color::rgb(191, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Category of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Plain narration
    Info,
    /// Something went the player's way
    Good,
    /// Refused or cancelled actions
    Warning,
    /// Player death, boss warnings
    Danger,
    /// Level-ups and floor changes
    Progress,
    /// Targeting prompts
    Prompt,
    /// Spell and item effects
    Magic,
}

impl Severity {
    pub fn color(self) -> Color {
        match self {
            Severity::Info => Color::WHITE,
            Severity::Good => Color::GREEN,
            Severity::Warning => Color::RED,
            Severity::Danger => Color::DARK_RED,
            Severity::Progress => Color::LIGHT_VIOLET,
            Severity::Prompt => Color::LIGHT_CYAN,
            Severity::Magic => Color::ORANGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub severity: Severity,
}

impl Message {
    pub fn color(&self) -> Color {
        self.severity.color()
    }
}

/// Bounded message log, oldest line first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLog {
    lines: VecDeque<Message>,
    capacity: usize,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Appends a line, evicting the oldest once the log is full.
    ///
    /// # Examples
    ///
    /// ```
    /// use rouge::{MessageLog, Severity};
    ///
    /// let mut log = MessageLog::new(2);
    /// log.add("one", Severity::Info);
    /// log.add("two", Severity::Info);
    /// log.add("three", Severity::Warning);
    /// let texts: Vec<_> = log.iter().map(|m| m.text.as_str()).collect();
    /// assert_eq!(texts, vec!["two", "three"]);
    /// ```
    pub fn add(&mut self, text: impl Into<String>, severity: Severity) {
        while self.lines.len() >= self.capacity.max(1) {
            self.lines.pop_front();
        }
        self.lines.push_back(Message {
            text: text.into(),
            severity,
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.lines.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.lines.back()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether any kept line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|m| m.text.contains(needle))
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(config::MESSAGE_LOG_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_drops_oldest_first() {
        let mut log = MessageLog::new(3);
        for i in 0..5 {
            log.add(format!("line {}", i), Severity::Info);
        }
        assert_eq!(log.len(), 3);
        let texts: Vec<_> = log.iter().map(|m| m.text.clone()).collect();
        assert_eq!(texts, vec!["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn test_severity_colors_are_kept() {
        let mut log = MessageLog::default();
        log.add("You died!", Severity::Danger);
        assert_eq!(log.last().unwrap().color(), Color::DARK_RED);
        assert!(log.contains("died"));
    }

    #[test]
    fn test_zero_capacity_still_holds_one_line() {
        let mut log = MessageLog::new(0);
        log.add("a", Severity::Info);
        log.add("b", Severity::Info);
        assert_eq!(log.len(), 1);
        assert_eq!(log.last().unwrap().text, "b");
    }

    #[test]
    fn test_deserialized_zero_capacity_does_not_spin() {
        let mut log: MessageLog =
            serde_json::from_str(r#"{"lines": [], "capacity": 0}"#).unwrap();
        log.add("a", Severity::Info);
        log.add("b", Severity::Info);
        assert_eq!(log.len(), 1);
        assert_eq!(log.last().unwrap().text, "b");
    }
}
