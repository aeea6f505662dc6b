//! One player's view of the battle

use porygon_protocol::{BattleRequest, ParseError, Player};

use super::options::Options;
use super::pokemon::Pokemon;

/// A place on the field that can hold a pokemon. Nb. it may not
/// necessarily hold one (in the case of doubles).
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    /// Showdown slot address, e.g. `p1a` or `p2b`
    pub id: String,

    /// This slot is required to switch in a new pokemon
    pub switch: bool,

    /// Identity string of the occupying pokemon
    pub ident: String,

    /// Roster index of the occupying pokemon
    pub index: usize,

    /// The occupying pokemon is unable to switch out
    pub trapped: bool,

    /// Options of the occupying pokemon. None under a force switch,
    /// where the simulator attaches no active block.
    pub options: Option<Options>,
}

/// Makes a showdown slot address from a player and field position
pub fn slot_id(player: Player, position: usize) -> String {
    let letter = match position {
        1 => 'b',
        2 => 'c',
        _ => 'a',
    };
    format!("{}{}", player.as_str(), letter)
}

/// The current status and options of one side in a battle
#[derive(Debug, Clone, PartialEq)]
pub struct Side {
    pub player: Player,

    /// True if this side needs no decision for the battle to progress
    /// (e.g. the opponent is resolving a forced switch)
    pub wait: bool,

    /// The on-field slots, in position order
    pub field: Vec<Slot>,

    /// The team roster. Order matters: switch instructions index into
    /// this and it is stable across turns.
    pub pokemon: Vec<Pokemon>,
}

impl Side {
    /// Decode a side update payload.
    ///
    /// Two request schemas exist and produce the same shape here:
    /// under a force switch there is no active block, so slots carry
    /// switch flags and no options; on a normal turn the active block
    /// supplies trapped flags and options. The i-th active entry maps
    /// to the i-th roster pokemon whose active flag is set - the
    /// simulator gives no other cross-reference.
    pub fn decode(player: Player, request: &BattleRequest) -> Result<Self, ParseError> {
        let info = request
            .side
            .as_ref()
            .ok_or_else(|| ParseError::MissingField("side".to_string()))?;

        let pokemon: Vec<Pokemon> = info
            .pokemon
            .iter()
            .enumerate()
            .map(|(i, raw)| Pokemon::decode(raw, i))
            .collect::<Result<_, _>>()?;

        let mut field = Vec::new();
        match request.force_switch.as_deref() {
            Some(force_switch) if !force_switch.is_empty() => {
                for (i, must_switch) in force_switch.iter().enumerate() {
                    field.push(Slot {
                        id: slot_id(player, i),
                        switch: *must_switch,
                        ident: pokemon.get(i).map(|p| p.ident.clone()).unwrap_or_default(),
                        index: i,
                        trapped: false,
                        options: None,
                    });
                }
            }
            _ => {
                let roster_active: Vec<usize> = pokemon
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.active)
                    .map(|(i, _)| i)
                    .collect();

                for (i, data) in request.active.as_deref().unwrap_or_default().iter().enumerate() {
                    let index = roster_active.get(i).copied().ok_or_else(|| {
                        ParseError::InvalidFormat(format!(
                            "active entry {} has no active roster pokemon",
                            i
                        ))
                    })?;

                    field.push(Slot {
                        id: slot_id(player, i),
                        switch: false,
                        ident: pokemon[index].ident.clone(),
                        index,
                        trapped: data.trapped,
                        options: Some(Options::decode(data)),
                    });
                }
            }
        }

        Ok(Side {
            player,
            wait: request.wait,
            field,
            pokemon,
        })
    }

    /// True if any slot on this side is required to switch
    pub fn must_switch(&self) -> bool {
        self.field.iter().any(|slot| slot.switch)
    }

    /// The pokemon occupying the given field position, if any
    pub fn at(&self, position: usize) -> Option<&Pokemon> {
        self.field
            .get(position)
            .and_then(|slot| self.pokemon.get(slot.index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NORMAL_TURN: &str = r#"{
        "active":[{
            "moves":[
                {"move":"Nasty Plot","id":"nastyplot","pp":32,"maxpp":32,"target":"self","disabled":false},
                {"move":"Dark Pulse","id":"darkpulse","pp":24,"maxpp":24,"target":"any","disabled":false},
                {"move":"Sludge Bomb","id":"sludgebomb","pp":16,"maxpp":16,"target":"normal","disabled":false},
                {"move":"Flamethrower","id":"flamethrower","pp":24,"maxpp":24,"target":"normal","disabled":false}
            ],
            "canDynamax":true,
            "maxMoves":{"maxMoves":[
                {"move":"maxguard","target":"self"},
                {"move":"maxdarkness","target":"adjacentFoe"},
                {"move":"maxooze","target":"adjacentFoe"},
                {"move":"maxflare","target":"adjacentFoe"}
            ]}
        }],
        "side":{"name":"p2","id":"p2","pokemon":[
            {"ident":"p2: Zoroark","details":"Zoroark, L5, F","condition":"23/23","active":true,"stats":{"atk":18,"def":13,"spa":19,"spd":13,"spe":18},"moves":["nastyplot","darkpulse","sludgebomb","flamethrower"],"baseAbility":"illusion","item":"lifeorb","pokeball":"pokeball","ability":"illusion"},
            {"ident":"p2: Umbreon","details":"Umbreon, L5, F","condition":"27/27","active":false,"stats":{"atk":14,"def":18,"spa":13,"spd":20,"spe":14},"moves":["protect","foulplay","wish","toxic"],"baseAbility":"synchronize","item":"leftovers","pokeball":"pokeball","ability":"synchronize"}
        ]}
    }"#;

    const FORCE_SWITCH: &str = r#"{
        "forceSwitch":[true],
        "side":{"name":"p1","id":"p1","pokemon":[
            {"ident":"p1: Pikachu","details":"Pikachu, L50, M","condition":"0 fnt","active":true,"stats":{"atk":76,"def":55,"spa":65,"spd":70,"spe":110},"moves":["tackle"],"baseAbility":"voltabsorb","item":"","pokeball":"pokeball","ability":"voltabsorb"},
            {"ident":"p1: Ninetales","details":"Ninetales, L1, M","condition":"12/12","active":false,"stats":{"atk":6,"def":6,"spa":7,"spd":7,"spe":7},"moves":["solarbeam","flamethrower","willowisp","sunnyday"],"baseAbility":"flashfire","item":"","pokeball":"pokeball","ability":"flashfire"}
        ]}
    }"#;

    const WAITING: &str = r#"{
        "wait":true,
        "side":{"name":"p2","id":"p2","pokemon":[
            {"ident":"p2: Umbreon","details":"Umbreon, L50, F","condition":"181/181","active":true,"stats":{"atk":81,"def":130,"spa":70,"spd":150,"spe":81},"moves":["wish","toxic","protect","bite"],"baseAbility":"synchronize","item":"leftovers","pokeball":"pokeball","ability":"synchronize"}
        ]}
    }"#;

    fn decode(player: Player, payload: &str) -> Side {
        let request: BattleRequest = serde_json::from_str(payload).unwrap();
        Side::decode(player, &request).unwrap()
    }

    #[test]
    fn test_decode_normal_turn() {
        let side = decode(Player::P2, NORMAL_TURN);

        assert_eq!(side.player, Player::P2);
        assert!(!side.wait);
        assert!(!side.must_switch());
        assert_eq!(side.pokemon.len(), 2);

        assert_eq!(side.field.len(), 1);
        let slot = &side.field[0];
        assert_eq!(slot.id, "p2a");
        assert!(!slot.switch);
        assert!(!slot.trapped);
        assert_eq!(slot.ident, "p2: Zoroark");
        assert_eq!(slot.index, 0);

        let options = slot.options.as_ref().unwrap();
        assert_eq!(options.moves.len(), 4);
        assert_eq!(options.moves[0].name, "Nasty Plot");
        assert!(options.can_dynamax);
        assert_eq!(options.dynamax_moves.len(), 4);

        assert_eq!(side.at(0).unwrap().species, "Zoroark");
        assert_eq!(side.pokemon[1].species, "Umbreon");
        assert_eq!(side.pokemon[1].moves[1], "foulplay");
        assert_eq!(side.pokemon[1].index, 1);
    }

    #[test]
    fn test_decode_force_switch() {
        let side = decode(Player::P1, FORCE_SWITCH);

        assert!(side.must_switch());
        assert_eq!(side.field.len(), 1);

        let slot = &side.field[0];
        assert_eq!(slot.id, "p1a");
        assert!(slot.switch);
        assert_eq!(slot.ident, "p1: Pikachu");
        assert_eq!(slot.index, 0);
        assert!(slot.options.is_none());

        assert!(side.pokemon[0].status.fainted);
        assert_eq!(side.pokemon[0].status.hp_max, -1);
    }

    #[test]
    fn test_decode_waiting_side() {
        let side = decode(Player::P2, WAITING);

        assert!(side.wait);
        assert!(side.field.is_empty());
        assert!(!side.must_switch());
        assert_eq!(side.pokemon.len(), 1);
    }

    #[test]
    fn test_slot_id() {
        assert_eq!(slot_id(Player::P1, 0), "p1a");
        assert_eq!(slot_id(Player::P2, 1), "p2b");
        assert_eq!(slot_id(Player::P1, 2), "p1c");
    }

    #[test]
    fn test_decode_missing_side_is_error() {
        let request: BattleRequest = serde_json::from_str(r#"{"wait":true}"#).unwrap();
        assert!(Side::decode(Player::P1, &request).is_err());
    }
}
