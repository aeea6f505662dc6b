//! Reference-data lookup
//!
//! A [`Dex`] answers `lookup(id) -> descriptor | not-found` over the
//! showdown data files:
//!
//! - https://play.pokemonshowdown.com/data/pokedex.json
//! - https://play.pokemonshowdown.com/data/moves.json
//!
//! The data itself is not bundled; load it from disk or pass the JSON
//! directly. Lookups are by id: the name lowercased and stripped of
//! symbols, so `Charizard-Mega-X` and `charizardmegax` find the same
//! entry.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::TeamError;
use crate::spec::Stats;

/// Removes non alpha-num chars and switches to lowercase.
/// 'Charizard-Mega-X' -> 'charizardmegax'. This makes name fields match
/// id fields as understood by pokemon-showdown.
pub fn strip(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// Species data parsed from the showdown pokedex
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexSpecies {
    /// National dex number; formes share the number of their base
    /// species
    pub num: i32,

    pub name: String,

    #[serde(default)]
    pub types: Vec<String>,

    /// Ability set keyed by slot ("0", "1", "H" for hidden)
    #[serde(default)]
    pub abilities: HashMap<String, String>,

    #[serde(default)]
    pub base_stats: Stats,

    #[serde(default)]
    pub tier: String,
}

impl DexSpecies {
    /// Some ability this species can carry, preferring the primary slot
    pub fn any_ability(&self) -> Option<&str> {
        if let Some(primary) = self.abilities.get("0") {
            return Some(primary);
        }
        let mut slots: Vec<&String> = self.abilities.keys().collect();
        slots.sort();
        slots
            .first()
            .and_then(|slot| self.abilities.get(*slot))
            .map(String::as_str)
    }

    /// Whether this species can carry the given ability, compared
    /// case- and symbol-insensitively
    pub fn has_ability(&self, ability: &str) -> bool {
        let wanted = strip(ability);
        self.abilities.values().any(|a| strip(a) == wanted)
    }
}

/// Move data parsed from the showdown move dex
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexMove {
    pub num: i32,

    pub name: String,

    #[serde(default)]
    pub target: String,

    /// Maximum PP
    #[serde(default, rename = "pp")]
    pub max_pp: u32,

    #[serde(default)]
    pub base_power: u32,

    #[serde(default)]
    pub category: String,

    #[serde(default, rename = "type")]
    pub move_type: String,

    #[serde(default)]
    pub priority: i32,

    // accuracy can be either a bool or an int .. irritating
    #[serde(default)]
    accuracy: serde_json::Value,
}

impl DexMove {
    /// Accuracy out of 100; moves that cannot miss report 1000
    pub fn accuracy(&self) -> u32 {
        match &self.accuracy {
            serde_json::Value::Bool(_) => 1000,
            serde_json::Value::Number(n) => n.as_u64().unwrap_or(0) as u32,
            _ => 0,
        }
    }
}

/// The reference-data lookup service
#[derive(Debug, Clone, Default)]
pub struct Dex {
    species: HashMap<String, DexSpecies>,
    moves: HashMap<String, DexMove>,
}

impl Dex {
    /// Build a dex from showdown-format pokedex and move JSON
    pub fn from_json(pokedex: &str, movedex: &str) -> Result<Self, TeamError> {
        let species: HashMap<String, DexSpecies> = serde_json::from_str(pokedex)?;
        let moves: HashMap<String, DexMove> = serde_json::from_str(movedex)?;

        Ok(Dex {
            species: species.into_iter().map(|(k, v)| (strip(&k), v)).collect(),
            moves: moves.into_iter().map(|(k, v)| (strip(&k), v)).collect(),
        })
    }

    /// Load a dex from showdown-format JSON files on disk
    pub fn load(
        pokedex: impl AsRef<Path>,
        movedex: impl AsRef<Path>,
    ) -> Result<Self, TeamError> {
        let pokedex = std::fs::read_to_string(pokedex)?;
        let movedex = std::fs::read_to_string(movedex)?;
        Self::from_json(&pokedex, &movedex)
    }

    /// Species data by name or id
    pub fn species(&self, id: &str) -> Result<&DexSpecies, TeamError> {
        self.species
            .get(&strip(id))
            .ok_or_else(|| TeamError::NotFound {
                kind: "pokemon",
                id: strip(id),
            })
    }

    /// Move data by name or id
    pub fn mov(&self, id: &str) -> Result<&DexMove, TeamError> {
        self.moves.get(&strip(id)).ok_or_else(|| TeamError::NotFound {
            kind: "move",
            id: strip(id),
        })
    }
}
