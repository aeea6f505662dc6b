mod tests;

pub mod battle;
pub mod event;
pub mod request;

pub use battle::{Condition, Player, Subject, parse_condition, parse_subjects};
pub use event::{Event, EventKind, extract_metadata, parse_event};
pub use request::{
    ActiveSlot, BattleRequest, MaxMoveSlot, MaxMoves, MoveSlot, PokemonStats, SideInfo,
    SidePokemon, ZMoveSlot,
};

use anyhow::Result;

use crate::ParseError;

/// Lines the simulator prints that carry nothing we don't already know:
/// diagnostic info, format rules, team preview chatter, server time.
const DROPPED_PREFIXES: [&str; 10] = [
    "|split|",
    "|start",
    "|poke|",
    "|t:|",
    "|player|",
    "|teamsize|",
    "|gametype|",
    "|gen|",
    "|tier|",
    "|rule|",
];

/// Prefixes the simulator is known to replay twice about the same
/// pokemon, once with absolute HP and once with a percentage
const DEDUP_PREFIXES: [&str; 3] = ["|switch|", "|-damage|", "|-heal|"];

/// Classification of an `|error|` line from the simulator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceFault {
    /// `[Invalid choice]` - the choice could not be parsed or is
    /// logically wrong for this turn. The battle is still waiting.
    Invalid(String),

    /// `[Unavailable choice]` - a syntactically valid choice the
    /// simulator refused (disabled move, trapped switch, ...)
    Unavailable(String),

    /// Any other error text; the battle is in an unknown state
    Protocol(String),
}

impl ChoiceFault {
    pub fn message(&self) -> &str {
        match self {
            ChoiceFault::Invalid(m) | ChoiceFault::Unavailable(m) | ChoiceFault::Protocol(m) => m,
        }
    }
}

/// One parsed item from a simulator stdout frame, in source order
#[derive(Debug, Clone, PartialEq)]
pub enum SimMessage {
    /// Something happened on the field
    Event(Event),

    /// The simulator is describing one side's state and options
    SideUpdate {
        player: Player,
        request: Box<BattleRequest>,
    },

    /// The simulator rejected input or hit an error
    Fault(ChoiceFault),
}

/// Parse one stdout frame (everything up to a blank line) into an
/// ordered sequence of events, side updates and faults.
///
/// Not every line is kept: diagnostics are dropped, team preview
/// requests are discarded, and duplicated switch/damage/heal lines are
/// collapsed onto the first copy.
pub fn parse_frame(frame: &str) -> Result<Vec<SimMessage>> {
    let cleaned = frame.trim_matches(|c: char| c.is_whitespace() || c == '\0');
    let lines: Vec<&str> = cleaned.lines().collect();

    let mut out = Vec::new();
    for (i, line) in lines.iter().copied().enumerate() {
        if let Some(encoded) = line.strip_prefix("|request|") {
            if encoded.trim().is_empty() || encoded.contains("\"teamPreview\":true") {
                // we order teams up front, so preview requests carry
                // nothing actionable
                continue;
            }

            // the player id precedes the |request| line
            let player = i
                .checked_sub(1)
                .and_then(|j| Player::parse(lines[j].trim()))
                .ok_or_else(|| {
                    ParseError::MissingField("player line preceding |request|".to_string())
                })?;

            let request: BattleRequest =
                serde_json::from_str(encoded).map_err(ParseError::BadRequest)?;
            if request.team_preview {
                continue;
            }

            out.push(SimMessage::SideUpdate {
                player,
                request: Box::new(request),
            });
        } else if line.starts_with("|error|") {
            if line.contains("Can't choose for Team Preview") {
                // we always send a team ordering; formats without team
                // preview reject it harmlessly
                continue;
            }

            let text = line
                .strip_prefix("|error|")
                .unwrap_or(line)
                .trim()
                .to_string();
            let fault = if line.contains("[Invalid choice]") {
                ChoiceFault::Invalid(text)
            } else if line.contains("[Unavailable choice]") {
                ChoiceFault::Unavailable(text)
            } else {
                ChoiceFault::Protocol(text)
            };
            out.push(SimMessage::Fault(fault));
        } else if DEDUP_PREFIXES.iter().any(|p| line.starts_with(p)) {
            if i > 0 && is_duplicate(lines[i - 1], line) {
                continue;
            }
            if let Some(evt) = parse_event(line) {
                out.push(SimMessage::Event(evt));
            }
        } else if DROPPED_PREFIXES.iter().any(|p| line.starts_with(p)) {
            continue;
        } else if line.starts_with('|') && line.matches('|').count() > 1 {
            // anything left with at least two pipes is a candidate event
            if let Some(evt) = parse_event(line) {
                out.push(SimMessage::Event(evt));
            }
        }
    }

    Ok(out)
}

/// True if both lines share the tag and the second field (the pokemon
/// concerned) - the simulator's absolute/percentage replay pattern
fn is_duplicate(prev: &str, line: &str) -> bool {
    let prev_bits: Vec<&str> = prev.splitn(4, '|').collect();
    let line_bits: Vec<&str> = line.splitn(4, '|').collect();

    prev_bits.len() >= 3
        && line_bits.len() >= 3
        && prev_bits[1] == line_bits[1]
        && prev_bits[2] == line_bits[2]
}
