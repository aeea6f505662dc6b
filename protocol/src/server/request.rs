//! Battle request payloads
//!
//! These types mirror the JSON carried by `|request|` lines: the
//! simulator asking a player to make a decision. Fields the simulator
//! omits in a given schema (force switch vs normal turn vs wait) all
//! default, so one shape decodes every variant.

use serde::Deserialize;

/// A battle request asking the player to make a decision
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleRequest {
    /// Request ID for synchronization
    pub rqid: Option<u64>,

    /// Active pokemon and their available moves.
    /// Absent under a force switch or while waiting.
    #[serde(default)]
    pub active: Option<Vec<ActiveSlot>>,

    /// The player's side and team roster
    pub side: Option<SideInfo>,

    /// Which on-field slots must switch, parallel to the side's slots
    #[serde(default)]
    pub force_switch: Option<Vec<bool>>,

    /// Whether this is team preview
    #[serde(default)]
    pub team_preview: bool,

    /// Whether this side is waiting on the opponent
    #[serde(default)]
    pub wait: bool,

    #[serde(default)]
    pub no_cancel: bool,
}

impl BattleRequest {
    /// Check if this is a force switch request
    pub fn is_force_switch(&self) -> bool {
        self.force_switch
            .as_ref()
            .map(|fs| fs.iter().any(|&b| b))
            .unwrap_or(false)
    }

    /// Check if this request requires a decision
    pub fn needs_decision(&self) -> bool {
        !self.wait && (self.team_preview || self.force_switch.is_some() || self.active.is_some())
    }
}

/// Move options for one active (on-field) pokemon.
///
/// Nb. the simulator gives no identifier tying an entry to a specific
/// team member; entries are positional over the roster's active
/// pokemon, in roster order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSlot {
    #[serde(default)]
    pub moves: Vec<MoveSlot>,

    /// Whether the pokemon is unable to switch out
    #[serde(default)]
    pub trapped: bool,

    #[serde(default)]
    pub maybe_trapped: bool,

    /// Whether mega evolution is available
    #[serde(default)]
    pub can_mega_evo: bool,

    /// Z-moves, parallel to `moves`; entries are null for moves with no
    /// z-variant. Present only while a z-crystal is held.
    #[serde(default)]
    pub can_z_move: Option<Vec<Option<ZMoveSlot>>>,

    /// Whether dynamax is available
    #[serde(default)]
    pub can_dynamax: bool,

    /// Max moves (when dynamax is available or active)
    #[serde(default)]
    pub max_moves: Option<MaxMoves>,
}

/// A move slot on an active pokemon
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveSlot {
    /// Display name of the move
    #[serde(rename = "move")]
    pub name: String,

    /// Move ID (lowercase, no symbols)
    #[serde(default)]
    pub id: String,

    /// Current PP
    #[serde(default)]
    pub pp: u32,

    /// Maximum PP
    #[serde(rename = "maxpp", default)]
    pub max_pp: u32,

    /// Target category (normal, self, allySide, ...)
    #[serde(default)]
    pub target: String,

    /// Whether the move is disabled this turn
    #[serde(default)]
    pub disabled: bool,
}

/// Z-move information; the simulator only supplies name and target
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZMoveSlot {
    #[serde(rename = "move")]
    pub name: String,

    #[serde(default)]
    pub target: String,
}

/// Wrapper for the nested maxMoves object
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxMoves {
    #[serde(default)]
    pub max_moves: Vec<MaxMoveSlot>,
}

/// A max move slot (for dynamax)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxMoveSlot {
    #[serde(rename = "move")]
    pub name: String,

    #[serde(default)]
    pub target: String,
}

/// Information about the player's side
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideInfo {
    /// Player's display name (the driver names players p1/p2)
    pub name: String,

    /// Player ID (p1, p2, ...)
    #[serde(default)]
    pub id: String,

    /// The team roster. Order matters: switch instructions are indexes
    /// into this sequence.
    #[serde(default)]
    pub pokemon: Vec<SidePokemon>,
}

/// A pokemon on the player's side, as the simulator reports it
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidePokemon {
    /// Unique `player: name` string, e.g. "p1: Pikachu"
    pub ident: String,

    /// Species, level and gender run together with ','.
    /// Nb. level is not given if it is 100. e.g. "Chesnaught, L82, M"
    #[serde(default)]
    pub details: String,

    /// HP and status, e.g. "30/130", "130/240 slp" or "0 fnt"
    #[serde(default)]
    pub condition: String,

    /// True if the pokemon is on the field right now
    #[serde(default)]
    pub active: bool,

    #[serde(default)]
    pub stats: PokemonStats,

    /// Learned move ids
    #[serde(default)]
    pub moves: Vec<String>,

    #[serde(default)]
    pub base_ability: String,

    /// Current ability (usually the base ability outside of special
    /// circumstances)
    #[serde(default)]
    pub ability: String,

    #[serde(default)]
    pub item: String,

    #[serde(default)]
    pub pokeball: String,
}

/// Core pokemon battle stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct PokemonStats {
    #[serde(default)]
    pub atk: u32,
    #[serde(default)]
    pub def: u32,
    #[serde(default)]
    pub spa: u32,
    #[serde(default)]
    pub spd: u32,
    #[serde(default)]
    pub spe: u32,
}
