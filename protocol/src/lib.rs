use thiserror::Error;

pub mod client;
pub mod server;

pub use client::{Action, ActionKind, ActionSpec};
pub use server::{
    ActiveSlot, BattleRequest, ChoiceFault, Condition, Event, EventKind, MaxMoveSlot, MaxMoves,
    MoveSlot, Player, PokemonStats, SideInfo, SidePokemon, SimMessage, Subject, ZMoveSlot,
    extract_metadata, parse_condition, parse_event, parse_frame, parse_subjects,
};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid message format: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Unreadable condition: {0}")]
    BadCondition(String),

    #[error("Malformed request payload: {0}")]
    BadRequest(#[from] serde_json::Error),
}
