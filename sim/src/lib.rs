//! Async subprocess driver for the pokemon-showdown battle simulator.
//!
//! This crate owns a `pokemon-showdown simulate-battle` child process
//! and exposes it as a structured, typed API: feed it a [`BattleSpec`],
//! submit [`Action`]s turn by turn, get back [`BattleState`] snapshots.
//!
//! # One-shot simulation
//!
//! ```no_run
//! use porygon_sim::{Action, ActionSpec, BattleSpec, Format, Player, simulate};
//! use porygon_team::Dex;
//!
//! # async fn run(teams: Vec<Vec<porygon_team::PokemonSpec>>, dex: Dex) -> Result<(), porygon_sim::SimError> {
//! let spec = BattleSpec::new(Format::Gen8AnythingGoes, teams);
//! let actions = vec![
//!     Action::new(Player::P1, vec![ActionSpec::mov(1)]),
//!     Action::new(Player::P2, vec![ActionSpec::mov(0)]),
//! ];
//!
//! let state = simulate(&spec, &actions, &dex).await?;
//! println!("turn {} winner {:?}", state.turn, state.winner);
//! # Ok(())
//! # }
//! ```
//!
//! # Interactive sessions
//!
//! ```no_run
//! use porygon_sim::{Action, ActionSpec, BattleSpec, Format, Player, Session};
//! use porygon_team::Dex;
//!
//! # async fn run(spec: BattleSpec, dex: Dex) -> Result<(), porygon_sim::SimError> {
//! let mut session = Session::start("pokemon-showdown", &spec, &dex).await?;
//!
//! let state = session
//!     .turn(&[
//!         Action::new(Player::P1, vec![ActionSpec::mov(0)]),
//!         Action::new(Player::P2, vec![ActionSpec::switch(1)]),
//!     ])
//!     .await?;
//!
//! for event in &state.events {
//!     println!("{}", event);
//! }
//! session.stop().await;
//! # Ok(())
//! # }
//! ```
//!
//! Invalid and unavailable choices are returned as recoverable errors:
//! the session stays healthy and a corrected `turn` may be submitted.
//! Everything else (protocol violations, the child dying) is fatal and
//! latches.

pub mod error;
pub mod pump;
pub mod random;
pub mod session;
pub mod simulate;
pub mod spec;

pub use error::SimError;
pub use pump::Pump;
pub use random::random_team;
pub use session::Session;
pub use simulate::{ENV_POKEMON_SHOWDOWN, ENV_SIMULATION_TIMEOUT, simulate};
pub use spec::{BattleSpec, Format};

// Re-export the caller-facing types from the layer crates
pub use porygon_battle::{BattleState, MoveOption, Options, Pokemon, Side, Slot, StatusFlags};
pub use porygon_protocol::{Action, ActionKind, ActionSpec, Event, EventKind, Player, Subject};
pub use porygon_team::{Dex, PokemonSpec, Stats};
