//! Shared vocabulary for battle protocol messages

use crate::ParseError;

/// Player in a battle (p1, p2, p3, p4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    P1,
    P2,
    P3,
    P4,
}

impl Player {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "p1" => Some(Player::P1),
            "p2" => Some(Player::P2),
            "p3" => Some(Player::P3),
            "p4" => Some(Player::P4),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Player::P1 => "p1",
            Player::P2 => "p2",
            Player::P3 => "p3",
            Player::P4 => "p4",
        }
    }

    /// Zero-based index of this player (p1 -> 0)
    pub fn index(&self) -> usize {
        match self {
            Player::P1 => 0,
            Player::P2 => 1,
            Player::P3 => 2,
            Player::P4 => 3,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pokemon referenced by field address, e.g. `p2a` is the first slot
/// of the second player. The first subject found on a line is the source
/// or principal of the event; the rest are targets or otherwise related.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subject {
    pub player: Player,
    /// Position letter: `a`, `b` or `c` for field slots 1-3
    pub position: char,
}

impl Subject {
    /// Parse a token beginning with a slot address like `p1a` or `p2c`
    pub fn parse(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        if chars.next()? != 'p' {
            return None;
        }
        let digit = chars.next()?;
        let position = chars.next()?;
        if !('a'..='c').contains(&position) {
            return None;
        }
        let player = match digit {
            '1' => Player::P1,
            '2' => Player::P2,
            '3' => Player::P3,
            '4' => Player::P4,
            _ => return None,
        };
        Some(Subject { player, position })
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.player.as_str(), self.position)
    }
}

/// Returns all slot addresses found in a line, in source order.
///
/// Addresses can appear anywhere: the pokemon fields, `[of]` tags,
/// `[spread]` target lists. Non-alphanumerics are treated as separators
/// so `p1a: Lugia` and `p1b,p2a,p2b` both yield their addresses.
pub fn parse_subjects(line: &str) -> Vec<Subject> {
    let normalized: String = line
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();

    normalized
        .split_whitespace()
        .filter_map(Subject::parse)
        .collect()
}

/// HP and status parsed from a showdown condition string.
///
/// Observed shapes: `30/130`, `130/240 slp`, `0 fnt`. A fainted pokemon
/// reports `hp_max` of -1 since the simulator no longer tells us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub hp_now: i32,
    pub hp_max: i32,
    /// One of `slp brn par psn tox frz fnt`, or empty if healthy
    pub status: String,
}

/// Parse a showdown style pokemon condition string
pub fn parse_condition(condition: &str) -> Result<Condition, ParseError> {
    if condition.contains("fnt") {
        return Ok(Condition {
            hp_now: 0,
            hp_max: -1,
            status: "fnt".to_string(),
        });
    }

    let (hp_part, status) = match condition.split_once(' ') {
        Some((hp, rest)) => (hp, rest.to_string()),
        None => (condition, String::new()),
    };

    if hp_part == "0" {
        return Ok(Condition {
            hp_now: 0,
            hp_max: -1,
            status: "fnt".to_string(),
        });
    }

    let (now, max) = hp_part
        .split_once('/')
        .ok_or_else(|| ParseError::BadCondition(condition.to_string()))?;

    let hp_now = now
        .parse()
        .map_err(|_| ParseError::BadCondition(condition.to_string()))?;
    let hp_max = max
        .parse()
        .map_err(|_| ParseError::BadCondition(condition.to_string()))?;

    Ok(Condition {
        hp_now,
        hp_max,
        status,
    })
}
