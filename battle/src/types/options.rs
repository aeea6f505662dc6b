//! What an active pokemon may do next turn

use porygon_protocol::{ActiveSlot, MaxMoveSlot, MoveSlot, ZMoveSlot};

/// One usable move with its in-battle bookkeeping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOption {
    /// Move id: the name string, lowercase and symbol free
    pub id: String,

    /// Human readable name
    pub name: String,

    pub pp: u32,
    pub max_pp: u32,

    /// Target category (normal, self, allySide, ...) detailing what can
    /// be targeted in doubles+
    pub target: String,

    pub disabled: bool,
}

impl MoveOption {
    fn from_move(slot: &MoveSlot) -> Self {
        MoveOption {
            id: slot.id.clone(),
            name: slot.name.clone(),
            pp: slot.pp,
            max_pp: slot.max_pp,
            target: slot.target.clone(),
            disabled: slot.disabled,
        }
    }

    fn from_zmove(slot: &ZMoveSlot) -> Self {
        MoveOption {
            id: String::new(),
            name: slot.name.clone(),
            pp: 0,
            max_pp: 0,
            target: slot.target.clone(),
            disabled: false,
        }
    }

    fn from_max_move(slot: &MaxMoveSlot) -> Self {
        MoveOption {
            id: String::new(),
            name: slot.name.clone(),
            pp: 0,
            max_pp: 0,
            target: slot.target.clone(),
            disabled: false,
        }
    }
}

/// Options (set only on occupied slots) describing what the pokemon in
/// a slot can do next turn
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub can_mega_evolve: bool,
    pub can_dynamax: bool,
    pub can_z_move: bool,

    /// Moves including PP and target data
    pub moves: Vec<MoveOption>,

    /// Z-moves, parallel to `moves`; holes mark moves with no z-variant.
    /// Available only while a z-crystal is held.
    pub zmoves: Vec<Option<MoveOption>>,

    /// Dynamax moves, if available
    pub dynamax_moves: Vec<MoveOption>,
}

impl Options {
    /// Convert the simulator's active-data block into options
    pub fn decode(active: &ActiveSlot) -> Self {
        let moves = active.moves.iter().map(MoveOption::from_move).collect();

        let zmoves: Vec<Option<MoveOption>> = active
            .can_z_move
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|slot| slot.as_ref().map(MoveOption::from_zmove))
            .collect();

        let dynamax_moves = active
            .max_moves
            .as_ref()
            .map(|wrapper| {
                wrapper
                    .max_moves
                    .iter()
                    .map(MoveOption::from_max_move)
                    .collect()
            })
            .unwrap_or_default();

        Options {
            can_mega_evolve: active.can_mega_evo,
            can_dynamax: active.can_dynamax,
            can_z_move: !zmoves.is_empty(),
            moves,
            zmoves,
            dynamax_moves,
        }
    }
}
