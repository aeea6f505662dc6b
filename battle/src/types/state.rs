//! Per-turn battle snapshots

use std::collections::HashMap;

use porygon_protocol::{Event, Player};

use super::side::Side;

/// The state of the entire battle at one turn boundary.
///
/// One snapshot is produced per boundary; each is immutable once
/// published. `field` is complete for exactly the players that must
/// decide (or are informed of the end).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BattleState {
    /// Current turn, starting at 1. Forced-switch snapshots report the
    /// ongoing turn number.
    pub turn: u32,

    /// Per-player side updates
    pub field: HashMap<Player, Side>,

    /// Everything that happened since the previous snapshot, in
    /// simulator order
    pub events: Vec<Event>,

    /// Winning player name; set only once the battle is over
    pub winner: Option<String>,
}

impl BattleState {
    /// True once a winner has been declared
    pub fn ended(&self) -> bool {
        self.winner.is_some()
    }

    /// This player's side of the field, if it was part of the update
    pub fn side(&self, player: Player) -> Option<&Side> {
        self.field.get(&player)
    }
}
