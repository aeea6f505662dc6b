//! Choice commands written to the simulator
//!
//! One [`Action`] carries a player's full decision for a turn: one
//! [`ActionSpec`] per on-field slot, in slot order. `pack` renders the
//! simulator's choice syntax, e.g. `>p1 move 3 -1 mega,pass`.

use crate::server::Player;

/// What a single slot does this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Use an attack / status move
    Move,

    /// Switch out to another team member
    Switch,

    /// The slot cannot act, e.g. in doubles with one pokemon left
    Pass,
}

/// One player's decision(s) for one turn
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    /// Player making the choices
    pub player: Player,

    /// One spec per on-field slot, in slot order
    pub specs: Vec<ActionSpec>,
}

/// The desired action for a single slot.
///
/// `id` is zero-based here - move slot index or team roster index - and
/// converted to the simulator's one-based form when packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSpec {
    pub kind: ActionKind,

    /// Zero-based move slot (for moves) or roster index (for switches).
    /// Technically the simulator also accepts move and pokemon names,
    /// but indexes are much easier to validate.
    pub id: usize,

    /// Target slot for doubles:
    ///
    /// ```text
    /// +2 +1   [foes]
    /// -1 -2   [allies]
    /// ```
    ///
    /// Zero means unspecified and is omitted from the packed form.
    /// Specifying a target on a non-targeting move is invalid.
    pub target: i32,

    /// Transformations applied before a move; at most one is honoured
    pub mega: bool,
    pub zmove: bool,
    pub max: bool,
}

impl ActionSpec {
    pub fn mov(id: usize) -> Self {
        ActionSpec {
            kind: ActionKind::Move,
            id,
            target: 0,
            mega: false,
            zmove: false,
            max: false,
        }
    }

    pub fn switch(id: usize) -> Self {
        ActionSpec {
            kind: ActionKind::Switch,
            id,
            target: 0,
            mega: false,
            zmove: false,
            max: false,
        }
    }

    pub fn pass() -> Self {
        ActionSpec {
            kind: ActionKind::Pass,
            id: 0,
            target: 0,
            mega: false,
            zmove: false,
            max: false,
        }
    }

    pub fn with_target(mut self, target: i32) -> Self {
        self.target = target;
        self
    }

    fn pack(&self) -> String {
        match self.kind {
            ActionKind::Pass => "pass".to_string(),
            ActionKind::Switch => format!("switch {}", self.id + 1),
            ActionKind::Move => {
                let mut packed = format!("move {}", self.id + 1);
                if self.target != 0 {
                    packed.push_str(&format!(" {}", self.target));
                }
                // mega wins over zmove wins over max if misused
                if self.mega {
                    packed.push_str(" mega");
                } else if self.zmove {
                    packed.push_str(" zmove");
                } else if self.max {
                    packed.push_str(" max");
                }
                packed
            }
        }
    }
}

impl Action {
    pub fn new(player: Player, specs: Vec<ActionSpec>) -> Self {
        Action { player, specs }
    }

    /// Render this action as a simulator compliant choice line
    pub fn pack(&self) -> String {
        let specs: Vec<String> = self.specs.iter().map(ActionSpec::pack).collect();
        format!(">{} {}\n", self.player.as_str(), specs.join(","))
    }
}
