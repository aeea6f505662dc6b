//! Turn collation
//!
//! The simulator never says "the turn is over" - it interleaves side
//! updates and events, and the only boundary signals are the turn
//! counter advancing, a winner being declared, or a mid-turn forced
//! switch (which looks like a new turn except the counter stands
//! still). The collator accumulates everything and emits a snapshot the
//! moment one of those conditions holds with enough of the field known.

use std::collections::HashMap;

use porygon_protocol::{Event, EventKind, ParseError, Player, SimMessage};

use crate::types::{BattleState, Side};

/// Accumulates parsed messages into per-turn [`BattleState`] snapshots
#[derive(Debug)]
pub struct Collator {
    /// How many players must report a side update for the state to be
    /// complete
    players: usize,

    /// Turn number of the last emitted snapshot
    last_turn: u32,

    /// Turn number seen since the last emission, if any
    turn: Option<u32>,

    field: HashMap<Player, Side>,
    events: Vec<Event>,
    winner: Option<String>,
}

impl Collator {
    pub fn new(players: usize) -> Self {
        Collator {
            players,
            last_turn: 0,
            turn: None,
            field: HashMap::new(),
            events: Vec::new(),
            winner: None,
        }
    }

    /// Fold one message into the scratch state. Returns a snapshot when
    /// this message completed a turn boundary.
    ///
    /// Faults are not collated; route them to error handling before
    /// calling this.
    pub fn apply(&mut self, message: &SimMessage) -> Result<Option<BattleState>, ParseError> {
        match message {
            SimMessage::Event(event) => {
                match event.kind {
                    EventKind::Turn => self.turn = Some(event.magnitude.max(0) as u32),
                    EventKind::Win => self.winner = Some(event.name.clone()),
                    _ => {}
                }
                self.events.push(event.clone());
            }
            SimMessage::SideUpdate { player, request } => {
                // a later request for the same player before the
                // boundary supersedes the earlier one
                let side = Side::decode(*player, request)?;
                self.field.insert(*player, side);
            }
            SimMessage::Fault(_) => {}
        }

        Ok(self.emit())
    }

    fn emit(&mut self) -> Option<BattleState> {
        let complete = self.field.len() == self.players;
        let won = self.winner.is_some();
        let turn_progressed = self.turn.is_some_and(|t| t > self.last_turn);
        let force_switch_pending = complete && self.field.values().any(Side::must_switch);

        if !((turn_progressed || won || force_switch_pending) && (complete || won)) {
            return None;
        }

        // a forced-switch snapshot reports the ongoing turn
        let turn = self.turn.unwrap_or(self.last_turn);
        self.last_turn = turn;
        self.turn = None;

        Some(BattleState {
            turn,
            field: std::mem::take(&mut self.field),
            events: std::mem::take(&mut self.events),
            winner: self.winner.clone(),
        })
    }
}
