mod options;
mod pokemon;
mod side;
mod state;

pub use options::{MoveOption, Options};
pub use pokemon::{Pokemon, StatusFlags};
pub use side::{Side, Slot, slot_id};
pub use state::BattleState;
