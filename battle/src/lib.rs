//! Battle state decoding and turn collation for the pokemon-showdown
//! simulator.
//!
//! This crate turns the wire-level messages of `porygon-protocol` into
//! coherent per-turn snapshots:
//!
//! ```text
//! porygon-protocol (wire format)
//!        │
//!        ▼
//! porygon-battle (domain types + collation) ← THIS CRATE
//!        │
//!        └─> porygon-sim (sessions driving the subprocess)
//! ```
//!
//! # Main types
//!
//! - [`Side`] / [`Slot`] - one player's view: team roster plus per
//!   on-field-slot state and options
//! - [`Pokemon`] - a roster entry with fields derived from the raw
//!   details and condition strings
//! - [`Options`] - what an active pokemon may do next turn
//! - [`BattleState`] - everything that happened since the last turn
//!   boundary, for every player that must decide
//! - [`Collator`] - accumulates parsed messages and decides when a
//!   turn boundary has been crossed
//!
//! # Example
//!
//! ```no_run
//! use porygon_battle::Collator;
//! use porygon_protocol::parse_frame;
//!
//! let mut collator = Collator::new(2);
//! let frame = "|turn|1";
//! for message in parse_frame(frame).unwrap() {
//!     if let Some(state) = collator.apply(&message).unwrap() {
//!         println!("turn {} ready, {} events", state.turn, state.events.len());
//!     }
//! }
//! ```

pub mod tracking;
pub mod types;

pub use tracking::Collator;
pub use types::{BattleState, MoveOption, Options, Pokemon, Side, Slot, StatusFlags, slot_id};

// Re-export commonly used protocol types
pub use porygon_protocol::{Event, EventKind, Player, Subject};
