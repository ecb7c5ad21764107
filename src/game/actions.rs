//! # Actions
//!
//! What the player can ask for on a tick, and what came of it.

use crate::game::{Direction, Slot};
use serde::{Deserialize, Serialize};

/// A discrete player intent supplied by the input collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Step one tile, or attack whatever fighter stands there
    Move(Direction),
    /// Pass the turn
    Wait,
    /// Pick up the topmost item or gear on the player's tile
    PickUp,
    /// Use the inventory item at this index
    UseItem(usize),
    /// Drop the inventory item at this index
    DropItem(usize),
    /// Equip the equipment-bag entry at this index
    Equip(usize),
    Unequip(Slot),
    /// Drop the equipment-bag entry at this index
    DropEquipment(usize),
    /// Take the stairs on the player's tile
    Descend,
}

impl PlayerAction {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            PlayerAction::Move(_) => "move",
            PlayerAction::Wait => "wait",
            PlayerAction::PickUp => "pick up",
            PlayerAction::UseItem(_) => "use item",
            PlayerAction::DropItem(_) => "drop item",
            PlayerAction::Equip(_) => "equip",
            PlayerAction::Unequip(_) => "unequip",
            PlayerAction::DropEquipment(_) => "drop equipment",
            PlayerAction::Descend => "descend",
        }
    }
}

/// Result of one player tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOutcome {
    /// The player acted; every monster got its tick
    TookTurn,
    /// Nothing happened that costs a turn
    DidntTakeTurn,
    /// The player reached a new floor
    Descended,
    /// The player is dead; no further actions are accepted
    GameOver,
}

impl TurnOutcome {
    pub fn took_turn(self) -> bool {
        matches!(self, TurnOutcome::TookTurn | TurnOutcome::Descended)
    }
}

/// Result of using an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UseOutcome {
    /// The effect happened and the item is consumed
    Used,
    /// No valid target or nothing to restore; the item stays in the inventory
    Cancelled,
}
