//! Declarative pokemon specs and packed-team serialization
//!
//! A [`PokemonSpec`] describes a pokemon as given in order to *start* a
//! battle; pokemon returned during battle have different, derived
//! fields. `pack` renders the simulator's packed format after clamping
//! values into range and cross-checking names, abilities and moves
//! against the reference data.

use serde::{Deserialize, Serialize};

use crate::TeamError;
use crate::dex::Dex;
use crate::natures::valid_nature;

/// Values for the 6 pokemon stats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub hp: i32,
    pub atk: i32,
    pub def: i32,
    pub spa: i32,
    pub spd: i32,
    pub spe: i32,
}

impl Stats {
    /// The total of all six stats
    pub fn sum(&self) -> i32 {
        self.hp + self.atk + self.def + self.spa + self.spd + self.spe
    }

    fn clamp_all(&mut self, min: i32, max: i32) {
        self.hp = self.hp.clamp(min, max);
        self.atk = self.atk.clamp(min, max);
        self.def = self.def.clamp(min, max);
        self.spa = self.spa.clamp(min, max);
        self.spd = self.spd.clamp(min, max);
        self.spe = self.spe.clamp(min, max);
    }

    fn pack(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.hp, self.atk, self.def, self.spa, self.spd, self.spe
        )
    }
}

/// Effort values all set to 85: six stats summing under the 510 cap
const DEFAULT_EVS: Stats = Stats {
    hp: 85,
    atk: 85,
    def: 85,
    spa: 85,
    spd: 85,
    spe: 85,
};

/// A pokemon with battle relevant stats, items, moves etc as specified
/// in order to start a battle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PokemonSpec {
    pub name: String,
    pub species: String,
    pub item: String,
    pub ability: String,

    /// 1-4 move ids
    pub moves: Vec<String>,

    pub nature: String,

    /// Effort values, 0-255 each with the sum capped at 510.
    /// None means the default spread of 85 across the board.
    #[serde(rename = "evs")]
    pub effort_values: Option<Stats>,

    /// One of M F N, or empty
    pub gender: String,

    /// Individual values, 0-31 each. None means all 31.
    #[serde(rename = "ivs")]
    pub individual_values: Option<Stats>,

    pub shiny: bool,

    /// 1-100
    pub level: i32,

    /// 0-255
    pub happiness: i32,

    #[serde(rename = "hpType")]
    pub hp_type: String,

    #[serde(rename = "pokeball")]
    pub pokeball_type: String,

    pub gigantamax: bool,
}

impl PokemonSpec {
    /// Clamps int values into their acceptable ranges
    pub fn enforce_limits(&mut self) {
        if self.moves.len() > 4 {
            self.moves.truncate(4);
        }

        if let Some(evs) = &mut self.effort_values {
            evs.clamp_all(0, 255);
            if evs.sum() > 510 {
                *evs = DEFAULT_EVS;
            }
        }

        if let Some(ivs) = &mut self.individual_values {
            ivs.clamp_all(0, 31);
        }

        match self.gender.as_str() {
            "M" | "F" | "N" => {}
            _ => self.gender = String::new(),
        }

        self.level = self.level.clamp(1, 100);
        self.happiness = self.happiness.clamp(0, 255);
    }

    /// Pack this pokemon into the simulator format.
    ///
    /// Nb. the simulator packs things more tightly than we do: default
    /// EVs/IVs can collapse to "" and the trailing quad is omitted when
    /// every value is default. We always include them - it's much
    /// easier and this isn't going over a network. Note that *not*
    /// giving any IVs means they're all considered 31, not 0.
    pub fn pack(&self, dex: &Dex) -> Result<String, TeamError> {
        let mut spec = self.clone();
        spec.enforce_limits();

        if spec.moves.is_empty() {
            return Err(TeamError::InvalidSpec(
                "at least one move required".to_string(),
            ));
        }
        if spec.species.is_empty() && spec.name.is_empty() {
            return Err(TeamError::InvalidSpec(
                "one of name/species is required".to_string(),
            ));
        }

        // name and species may both be given; they must agree
        let entry = match (dex.species(&spec.species), dex.species(&spec.name)) {
            (Err(_), Err(_)) => {
                return Err(TeamError::InvalidSpec(format!(
                    "no pokemon by species '{}' or name '{}'",
                    spec.species, spec.name
                )));
            }
            (Ok(by_species), Ok(by_name)) => {
                if by_species.num != by_name.num {
                    return Err(TeamError::InvalidSpec(format!(
                        "name & species indicate different pokemon {} ({}) {} ({})",
                        spec.species, by_species.name, spec.name, by_name.name
                    )));
                }
                by_species
            }
            (Ok(by_species), Err(_)) => by_species,
            (Err(_), Ok(by_name)) => by_name,
        };

        if spec.ability.is_empty() {
            spec.ability = entry
                .any_ability()
                .map(str::to_string)
                .ok_or_else(|| {
                    TeamError::InvalidSpec(format!("species {} has no abilities", entry.name))
                })?;
        } else if !entry.has_ability(&spec.ability) {
            return Err(TeamError::InvalidSpec(format!(
                "pokemon {} cannot get ability {}",
                entry.name, spec.ability
            )));
        }

        for move_id in &spec.moves {
            dex.mov(move_id)?;
        }

        if !spec.nature.is_empty() && !valid_nature(&spec.nature) {
            return Err(TeamError::InvalidSpec(format!(
                "no nature found matching {}",
                spec.nature
            )));
        }

        let packed_evs = spec
            .effort_values
            .map(|evs| evs.pack())
            .unwrap_or_else(|| DEFAULT_EVS.pack());
        let packed_ivs = spec
            .individual_values
            .map(|ivs| ivs.pack())
            .unwrap_or_else(|| "31,31,31,31,31,31".to_string());

        let packed_species = if spec.species == spec.name {
            String::new()
        } else {
            spec.species.clone()
        };
        let shiny_marker = if spec.shiny { "S" } else { "" };

        Ok([
            spec.name,
            packed_species,
            spec.item,
            spec.ability,
            spec.moves.join(","),
            spec.nature,
            packed_evs,
            spec.gender,
            packed_ivs,
            shiny_marker.to_string(),
            spec.level.to_string(),
            format!(
                "{},{},{},{}",
                spec.happiness,
                spec.hp_type,
                spec.pokeball_type,
                if spec.gigantamax { "G" } else { "" },
            ),
        ]
        .join("|"))
    }
}

/// Turns a list of specs into a pokemon-showdown compliant packed
/// string; records are joined with `]`
pub fn pack_team(team: &[PokemonSpec], dex: &Dex) -> Result<String, TeamError> {
    let members: Vec<String> = team
        .iter()
        .map(|spec| spec.pack(dex))
        .collect::<Result<_, _>>()?;
    Ok(members.join("]"))
}
