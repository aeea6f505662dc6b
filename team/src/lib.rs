use thiserror::Error;

pub mod dex;
pub mod natures;
pub mod spec;

pub use dex::{Dex, DexMove, DexSpecies, strip};
pub use natures::{NATURES, valid_nature};
pub use spec::{PokemonSpec, Stats, pack_team};

#[derive(Error, Debug)]
pub enum TeamError {
    #[error("no {kind} found matching '{id}'")]
    NotFound { kind: &'static str, id: String },

    #[error("invalid pokemon spec: {0}")]
    InvalidSpec(String),

    #[error("unreadable dex data: {0}")]
    BadData(#[from] serde_json::Error),

    #[error("unreadable dex file: {0}")]
    Io(#[from] std::io::Error),
}
