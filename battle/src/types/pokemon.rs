//! Roster pokemon and their derived battle status

use porygon_protocol::{ParseError, PokemonStats, SidePokemon, parse_condition};

/// HP and status effects derived from a pokemon's condition string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusFlags {
    /// Current HP
    pub hp_now: i32,

    /// Full HP. -1 once the pokemon has fainted (the simulator no
    /// longer reports it).
    pub hp_max: i32,

    pub asleep: bool,
    pub burned: bool,
    /// Set for regular and bad poison both
    pub poisoned: bool,
    /// "Badly" poisoned
    pub toxiced: bool,
    pub frozen: bool,
    pub paralyzed: bool,
    pub fainted: bool,
}

/// A pokemon taking part in a battle, as one side update reported it
#[derive(Debug, Clone, PartialEq)]
pub struct Pokemon {
    /// Unique `player: name` string for this pokemon
    pub ident: String,

    /// Index on the team. Stable across turns; switch instructions use
    /// this.
    pub index: usize,

    /// True if the pokemon is on the field currently
    pub active: bool,

    /// Raw core stats
    pub stats: PokemonStats,

    /// Learned move ids
    pub moves: Vec<String>,

    /// Current ability
    pub ability: String,

    /// Natural ability (differs from `ability` only in special
    /// circumstances, e.g. after Transform)
    pub base_ability: String,

    /// Held item
    pub item: String,

    /// Pokeball the pokemon was caught in
    pub pokeball: String,

    /// Species, level and gender run together with ','.
    /// Nb. level is omitted when it is 100. e.g. "Chesnaught, L82, M"
    pub details: String,

    /// Raw `cur/max [status]` or `0 fnt` string
    pub condition: String,

    // fields below are derived from details / condition
    pub species: String,
    pub level: u32,
    pub shiny: bool,
    /// One of M F N, or empty; not all pokemon have a gender
    pub gender: String,
    pub status: StatusFlags,
}

impl Pokemon {
    /// Build a pokemon from the raw simulator roster entry, deriving
    /// the parsed fields
    pub fn decode(raw: &SidePokemon, index: usize) -> Result<Self, ParseError> {
        let cond = parse_condition(&raw.condition)?;

        let status = StatusFlags {
            hp_now: cond.hp_now,
            hp_max: cond.hp_max,
            asleep: cond.status == "slp",
            burned: cond.status == "brn",
            poisoned: cond.status == "psn" || cond.status == "tox",
            toxiced: cond.status == "tox",
            frozen: cond.status == "frz",
            paralyzed: cond.status == "par",
            fainted: cond.status == "fnt",
        };

        let chunks: Vec<&str> = raw.details.split(", ").collect();
        let species = chunks.first().unwrap_or(&"").to_string();

        // level is omitted from details when it is 100
        let mut level = 100;
        for chunk in chunks.iter().skip(1) {
            if let Some(digits) = chunk.strip_prefix('L') {
                level = digits
                    .parse()
                    .map_err(|_| ParseError::InvalidFormat(raw.details.clone()))?;
                break;
            }
        }

        let gender = chunks
            .iter()
            .skip(1)
            .find(|c| matches!(**c, "M" | "F" | "N"))
            .unwrap_or(&"")
            .to_string();

        Ok(Pokemon {
            ident: raw.ident.clone(),
            index,
            active: raw.active,
            stats: raw.stats,
            moves: raw.moves.clone(),
            ability: raw.ability.clone(),
            base_ability: raw.base_ability.clone(),
            item: raw.item.clone(),
            pokeball: raw.pokeball.clone(),
            details: raw.details.clone(),
            condition: raw.condition.clone(),
            species,
            level,
            shiny: raw.details.contains(", shiny"),
            gender,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(details: &str, condition: &str) -> SidePokemon {
        SidePokemon {
            ident: "p1: Test".to_string(),
            details: details.to_string(),
            condition: condition.to_string(),
            active: false,
            stats: PokemonStats::default(),
            moves: vec![],
            base_ability: String::new(),
            ability: String::new(),
            item: String::new(),
            pokeball: String::new(),
        }
    }

    #[test]
    fn test_decode_hp() {
        let cases = vec![
            ("150/150", 150, 150),
            ("0 fnt", 0, -1),
            ("100/150", 100, 150),
        ];

        for (condition, now, max) in cases {
            let pkm = Pokemon::decode(&raw("Umbreon, L5, F", condition), 0).unwrap();
            assert_eq!(pkm.status.hp_now, now, "condition: {}", condition);
            assert_eq!(pkm.status.hp_max, max, "condition: {}", condition);
        }
    }

    #[test]
    fn test_decode_status_flags() {
        struct Case {
            condition: &'static str,
            asleep: bool,
            burned: bool,
            paralyzed: bool,
            fainted: bool,
            poisoned: bool,
            toxiced: bool,
            frozen: bool,
        }
        let cases = vec![
            Case {
                condition: "150/150",
                asleep: false,
                burned: false,
                paralyzed: false,
                fainted: false,
                poisoned: false,
                toxiced: false,
                frozen: false,
            },
            Case {
                condition: "150/150 slp",
                asleep: true,
                burned: false,
                paralyzed: false,
                fainted: false,
                poisoned: false,
                toxiced: false,
                frozen: false,
            },
            Case {
                condition: "150/150 brn",
                asleep: false,
                burned: true,
                paralyzed: false,
                fainted: false,
                poisoned: false,
                toxiced: false,
                frozen: false,
            },
            Case {
                condition: "150/150 par",
                asleep: false,
                burned: false,
                paralyzed: true,
                fainted: false,
                poisoned: false,
                toxiced: false,
                frozen: false,
            },
            Case {
                condition: "0 fnt",
                asleep: false,
                burned: false,
                paralyzed: false,
                fainted: true,
                poisoned: false,
                toxiced: false,
                frozen: false,
            },
            Case {
                condition: "150/150 psn",
                asleep: false,
                burned: false,
                paralyzed: false,
                fainted: false,
                poisoned: true,
                toxiced: false,
                frozen: false,
            },
            Case {
                condition: "150/150 tox",
                asleep: false,
                burned: false,
                paralyzed: false,
                fainted: false,
                poisoned: true,
                toxiced: true,
                frozen: false,
            },
            Case {
                condition: "150/150 frz",
                asleep: false,
                burned: false,
                paralyzed: false,
                fainted: false,
                poisoned: false,
                toxiced: false,
                frozen: true,
            },
        ];

        for case in cases {
            let pkm = Pokemon::decode(&raw("Umbreon, L5, F", case.condition), 0).unwrap();
            assert_eq!(pkm.status.asleep, case.asleep, "{}", case.condition);
            assert_eq!(pkm.status.burned, case.burned, "{}", case.condition);
            assert_eq!(pkm.status.paralyzed, case.paralyzed, "{}", case.condition);
            assert_eq!(pkm.status.fainted, case.fainted, "{}", case.condition);
            assert_eq!(pkm.status.poisoned, case.poisoned, "{}", case.condition);
            assert_eq!(pkm.status.toxiced, case.toxiced, "{}", case.condition);
            assert_eq!(pkm.status.frozen, case.frozen, "{}", case.condition);

            if case.fainted {
                assert_eq!(pkm.status.hp_now, 0);
                assert_eq!(pkm.status.hp_max, -1);
            }
        }
    }

    #[test]
    fn test_decode_species() {
        let cases = vec![
            ("Umbreon, L5, F", "Umbreon"),
            ("Umbreon, F", "Umbreon"),
            ("Whatever, L10, M", "Whatever"),
        ];

        for (details, species) in cases {
            let pkm = Pokemon::decode(&raw(details, "10/10"), 0).unwrap();
            assert_eq!(pkm.species, species, "details: {}", details);
        }
    }

    #[test]
    fn test_decode_level() {
        let cases = vec![
            ("Umbreon, L5, F", 5),
            ("Umbreon, F", 100), // level omitted means 100
            ("Whatever, L10, M", 10),
            ("Arceus", 100),
        ];

        for (details, level) in cases {
            let pkm = Pokemon::decode(&raw(details, "10/10"), 0).unwrap();
            assert_eq!(pkm.level, level, "details: {}", details);
        }
    }

    #[test]
    fn test_decode_gender_and_shiny() {
        let female = Pokemon::decode(&raw("Umbreon, L5, F", "10/10"), 0).unwrap();
        assert_eq!(female.gender, "F");
        assert!(!female.shiny);

        let genderless = Pokemon::decode(&raw("Lugia, L5", "10/10"), 0).unwrap();
        assert_eq!(genderless.gender, "");

        let shiny = Pokemon::decode(&raw("Umbreon, L5, M, shiny", "10/10"), 0).unwrap();
        assert!(shiny.shiny);
        assert_eq!(shiny.gender, "M");
    }

    #[test]
    fn test_decode_bad_condition() {
        assert!(Pokemon::decode(&raw("Umbreon, L5, F", "???"), 0).is_err());
    }
}
