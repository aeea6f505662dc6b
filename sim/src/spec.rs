//! Battle configuration

use porygon_team::PokemonSpec;

use crate::error::SimError;

/// A battle format our simulator understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// SS singles battle with given teams
    Gen8AnythingGoes,

    /// SS doubles battle with given teams
    Gen8DoublesUbers,
}

impl Format {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "[Gen 8] Anything Goes" => Some(Format::Gen8AnythingGoes),
            "[Gen 8] Doubles Ubers" => Some(Format::Gen8DoublesUbers),
            _ => None,
        }
    }

    /// The format id the simulator expects
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Gen8AnythingGoes => "[Gen 8] Anything Goes",
            Format::Gen8DoublesUbers => "[Gen 8] Doubles Ubers",
        }
    }

    /// At present not-doubles is assumed to be singles
    pub fn is_doubles(&self) -> bool {
        matches!(self, Format::Gen8DoublesUbers)
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All the required data to start a new battle. Read-only from session
/// construction onward.
#[derive(Debug, Clone)]
pub struct BattleSpec {
    /// The battle style (singles/doubles)
    pub format: Format,

    /// Player teams, in order: the simulator refers to players as
    /// p1, p2, ... Random formats can use empty teams.
    pub players: Vec<Vec<PokemonSpec>>,

    /// Seed for the simulator's internal RNG; zero means pick one at
    /// random when the session starts
    pub seed: i64,
}

impl BattleSpec {
    pub fn new(format: Format, players: Vec<Vec<PokemonSpec>>) -> Self {
        BattleSpec {
            format,
            players,
            seed: 0,
        }
    }

    /// Some simple sanity checks before anything is spawned
    pub fn validate(&self) -> Result<(), SimError> {
        if self.players.len() != 2 {
            return Err(SimError::InvalidSpec("two players are required".to_string()));
        }

        for team in &self.players {
            if team.len() > 6 {
                return Err(SimError::InvalidSpec(
                    "players cannot have more than six pokemon".to_string(),
                ));
            }
            // empty teams are permitted for random-team formats
            if team.is_empty() {
                continue;
            }
            if self.format.is_doubles() && team.len() < 2 {
                return Err(SimError::InvalidSpec(
                    "doubles players must have at least two pokemon".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_pokemon() -> Vec<PokemonSpec> {
        vec![PokemonSpec {
            name: "Umbreon".to_string(),
            moves: vec!["bite".to_string()],
            level: 50,
            ..PokemonSpec::default()
        }]
    }

    #[test]
    fn test_format_strings() {
        assert_eq!(Format::Gen8AnythingGoes.as_str(), "[Gen 8] Anything Goes");
        assert_eq!(Format::Gen8DoublesUbers.as_str(), "[Gen 8] Doubles Ubers");
        assert_eq!(
            Format::parse("[Gen 8] Doubles Ubers"),
            Some(Format::Gen8DoublesUbers)
        );
        assert!(!Format::Gen8AnythingGoes.is_doubles());
        assert!(Format::Gen8DoublesUbers.is_doubles());
    }

    #[test]
    fn test_validate_player_count() {
        let spec = BattleSpec::new(Format::Gen8AnythingGoes, vec![one_pokemon()]);
        assert!(spec.validate().is_err());

        let spec = BattleSpec::new(Format::Gen8AnythingGoes, vec![one_pokemon(), one_pokemon()]);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_validate_team_sizes() {
        let big_team: Vec<PokemonSpec> = (0..7).flat_map(|_| one_pokemon()).collect();
        let spec = BattleSpec::new(Format::Gen8AnythingGoes, vec![big_team, one_pokemon()]);
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_validate_doubles_needs_two() {
        let spec = BattleSpec::new(Format::Gen8DoublesUbers, vec![one_pokemon(), one_pokemon()]);
        assert!(spec.validate().is_err());

        let pair: Vec<PokemonSpec> = (0..2).flat_map(|_| one_pokemon()).collect();
        let spec = BattleSpec::new(
            Format::Gen8DoublesUbers,
            vec![pair.clone(), pair],
        );
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_team_permitted() {
        let spec = BattleSpec::new(Format::Gen8AnythingGoes, vec![vec![], vec![]]);
        assert!(spec.validate().is_ok());
    }
}
