//! Typed battle events
//!
//! Every noteworthy line in the simulator output becomes one [`Event`]:
//! a tag, an optional name and magnitude, the subjects involved and any
//! bracketed metadata tags. The shape is uniform across tags so callers
//! can log, filter or replay events without a 60-arm match.
//!
//! Reference: github.com/smogon/pokemon-showdown/blob/master/sim/SIM-PROTOCOL.md

use std::collections::HashMap;

use super::battle::{Subject, parse_condition, parse_subjects};

/// The closed set of event tags we recognise. Lines with any other tag
/// are silently dropped by the frame parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Win,
    Turn,
    Move,
    Switch,
    /// A forced "switch" essentially
    Drag,
    DetailsChange,
    FormeChange,
    Replace,
    Swap,
    Cant,
    Faint,
    Fail,
    Block,
    NoTarget,
    Miss,
    Damage,
    Heal,
    SetHp,
    Status,
    CureStatus,
    CureTeam,
    Boost,
    Unboost,
    SetBoost,
    SwapBoost,
    InvertBoost,
    ClearBoost,
    ClearAllBoost,
    ClearPositiveBoost,
    ClearNegativeBoost,
    CopyBoost,
    Weather,
    FieldStart,
    FieldEnd,
    SideStart,
    SideEnd,
    Start,
    End,
    Crit,
    SuperEffective,
    Resisted,
    Immune,
    Item,
    EndItem,
    Ability,
    EndAbility,
    Transform,
    Mega,
    Primal,
    Burst,
    ZPower,
    ZBroken,
    Activate,
    Hint,
    Center,
    Message,
    Combine,
    Waiting,
    Prepare,
    MustRecharge,
    HitCount,
    SingleMove,
    SingleTurn,
}

impl EventKind {
    pub fn parse(tag: &str) -> Option<Self> {
        let kind = match tag {
            "win" => EventKind::Win,
            "turn" => EventKind::Turn,
            "move" => EventKind::Move,
            "switch" => EventKind::Switch,
            "drag" => EventKind::Drag,
            "detailschange" => EventKind::DetailsChange,
            "-formechange" => EventKind::FormeChange,
            "replace" => EventKind::Replace,
            "swap" => EventKind::Swap,
            "cant" => EventKind::Cant,
            "faint" => EventKind::Faint,
            "-fail" => EventKind::Fail,
            "-block" => EventKind::Block,
            "-notarget" => EventKind::NoTarget,
            "-miss" => EventKind::Miss,
            "-damage" => EventKind::Damage,
            "-heal" => EventKind::Heal,
            "-sethp" => EventKind::SetHp,
            "-status" => EventKind::Status,
            "-curestatus" => EventKind::CureStatus,
            "-cureteam" => EventKind::CureTeam,
            "-boost" => EventKind::Boost,
            "-unboost" => EventKind::Unboost,
            "-setboost" => EventKind::SetBoost,
            "-swapboost" => EventKind::SwapBoost,
            "-invertboost" => EventKind::InvertBoost,
            "-clearboost" => EventKind::ClearBoost,
            "-clearallboost" => EventKind::ClearAllBoost,
            "-clearpositiveboost" => EventKind::ClearPositiveBoost,
            "-clearnegativeboost" => EventKind::ClearNegativeBoost,
            "-copyboost" => EventKind::CopyBoost,
            "-weather" => EventKind::Weather,
            "-fieldstart" => EventKind::FieldStart,
            "-fieldend" => EventKind::FieldEnd,
            "-sidestart" => EventKind::SideStart,
            "-sideend" => EventKind::SideEnd,
            "-start" => EventKind::Start,
            "-end" => EventKind::End,
            "-crit" => EventKind::Crit,
            "-supereffective" => EventKind::SuperEffective,
            "-resisted" => EventKind::Resisted,
            "-immune" => EventKind::Immune,
            "-item" => EventKind::Item,
            "-enditem" => EventKind::EndItem,
            "-ability" => EventKind::Ability,
            "-endability" => EventKind::EndAbility,
            "-transform" => EventKind::Transform,
            "-mega" => EventKind::Mega,
            "-primal" => EventKind::Primal,
            "-burst" => EventKind::Burst,
            "-zpower" => EventKind::ZPower,
            "-zbroken" => EventKind::ZBroken,
            "-activate" => EventKind::Activate,
            "-hint" => EventKind::Hint,
            "-center" => EventKind::Center,
            "-message" => EventKind::Message,
            "-combine" => EventKind::Combine,
            "-waiting" => EventKind::Waiting,
            "-prepare" => EventKind::Prepare,
            "-mustrecharge" => EventKind::MustRecharge,
            "-hitcount" => EventKind::HitCount,
            "-singlemove" => EventKind::SingleMove,
            "-singleturn" => EventKind::SingleTurn,
            _ => return None,
        };
        Some(kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Win => "win",
            EventKind::Turn => "turn",
            EventKind::Move => "move",
            EventKind::Switch => "switch",
            EventKind::Drag => "drag",
            EventKind::DetailsChange => "detailschange",
            EventKind::FormeChange => "-formechange",
            EventKind::Replace => "replace",
            EventKind::Swap => "swap",
            EventKind::Cant => "cant",
            EventKind::Faint => "faint",
            EventKind::Fail => "-fail",
            EventKind::Block => "-block",
            EventKind::NoTarget => "-notarget",
            EventKind::Miss => "-miss",
            EventKind::Damage => "-damage",
            EventKind::Heal => "-heal",
            EventKind::SetHp => "-sethp",
            EventKind::Status => "-status",
            EventKind::CureStatus => "-curestatus",
            EventKind::CureTeam => "-cureteam",
            EventKind::Boost => "-boost",
            EventKind::Unboost => "-unboost",
            EventKind::SetBoost => "-setboost",
            EventKind::SwapBoost => "-swapboost",
            EventKind::InvertBoost => "-invertboost",
            EventKind::ClearBoost => "-clearboost",
            EventKind::ClearAllBoost => "-clearallboost",
            EventKind::ClearPositiveBoost => "-clearpositiveboost",
            EventKind::ClearNegativeBoost => "-clearnegativeboost",
            EventKind::CopyBoost => "-copyboost",
            EventKind::Weather => "-weather",
            EventKind::FieldStart => "-fieldstart",
            EventKind::FieldEnd => "-fieldend",
            EventKind::SideStart => "-sidestart",
            EventKind::SideEnd => "-sideend",
            EventKind::Start => "-start",
            EventKind::End => "-end",
            EventKind::Crit => "-crit",
            EventKind::SuperEffective => "-supereffective",
            EventKind::Resisted => "-resisted",
            EventKind::Immune => "-immune",
            EventKind::Item => "-item",
            EventKind::EndItem => "-enditem",
            EventKind::Ability => "-ability",
            EventKind::EndAbility => "-endability",
            EventKind::Transform => "-transform",
            EventKind::Mega => "-mega",
            EventKind::Primal => "-primal",
            EventKind::Burst => "-burst",
            EventKind::ZPower => "-zpower",
            EventKind::ZBroken => "-zbroken",
            EventKind::Activate => "-activate",
            EventKind::Hint => "-hint",
            EventKind::Center => "-center",
            EventKind::Message => "-message",
            EventKind::Combine => "-combine",
            EventKind::Waiting => "-waiting",
            EventKind::Prepare => "-prepare",
            EventKind::MustRecharge => "-mustrecharge",
            EventKind::HitCount => "-hitcount",
            EventKind::SingleMove => "-singlemove",
            EventKind::SingleTurn => "-singleturn",
        }
    }
}

/// Something that happened during a turn
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: EventKind,

    /// Name of the ability, pokemon, item, move or stat (if known)
    pub name: String,

    /// Magnitude of the event, if applicable: remaining HP, stat boost,
    /// hit count, turn number, field position
    pub magnitude: i32,

    pub subject: Option<Subject>,
    pub targets: Vec<Subject>,

    pub metadata: HashMap<String, String>,
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let subject = self.subject.map(|s| s.to_string()).unwrap_or_default();
        let targets: Vec<String> = self.targets.iter().map(|t| t.to_string()).collect();
        write!(
            f,
            "{} {} {} {} {:?} {:?}",
            self.kind.as_str(),
            self.name,
            self.magnitude,
            subject,
            targets,
            self.metadata,
        )
    }
}

/// Returns key/value tags from an event line.
///
/// Showdown attaches metadata as `[key] some value` where the value is
/// optional and runs until the next `|` or `[`.
pub fn extract_metadata(line: &str) -> HashMap<String, String> {
    let mut found = HashMap::new();
    let mut rest = line;

    loop {
        let Some(open) = rest.find('[') else {
            return found;
        };
        rest = &rest[open..];

        let Some(close) = rest.find(']') else {
            return found;
        };
        let key = rest[1..close].to_string();
        rest = &rest[close + 1..];

        let end = match (rest.find('|'), rest.find('[')) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        let value = match end {
            Some(idx) => &rest[..idx],
            None => rest,
        };
        found.insert(key, value.trim().to_string());
    }
}

/// Returns an event (if possible) from a line
pub fn parse_event(line: &str) -> Option<Event> {
    let parts: Vec<&str> = line.split('|').collect();
    if parts.len() < 2 {
        // not an event
        return None;
    }

    let kind = EventKind::parse(parts[1])?;

    let mut event = Event {
        kind,
        name: String::new(),
        magnitude: 0,
        subject: None,
        targets: Vec::new(),
        metadata: extract_metadata(line),
    };

    let subjects = parse_subjects(line);
    if let Some((first, rest)) = subjects.split_first() {
        event.subject = Some(*first);
        // remaining subjects are (generally) targets of the event.
        // Nb. this can include the principal too - explosion is used by
        // one pokemon but affects everyone, including the user.
        event.targets = rest.to_vec();
    }

    // subjects and [tag] metadata are uniform, so only the event
    // specific name / magnitude remains per tag
    match kind {
        EventKind::Switch | EventKind::Drag => {
            //|switch|p1a: Ninetales|Ninetales, L5, M|24/24
            event.name = field(&parts, 3);
            let mut status = String::new();
            if let Ok(cond) = parse_condition(parts.get(4).copied().unwrap_or_default()) {
                if cond.hp_max > 0 {
                    // a percentage represented as an int 0-100
                    event.magnitude =
                        (100.0 * cond.hp_now as f64 / cond.hp_max as f64).round() as i32;
                }
                status = cond.status;
            }
            event.metadata.insert("status".to_string(), status);
        }
        EventKind::Move
        | EventKind::SingleTurn
        | EventKind::SingleMove
        | EventKind::Status
        | EventKind::CureStatus
        | EventKind::Start
        | EventKind::End
        | EventKind::Item
        | EventKind::EndItem
        | EventKind::Ability
        | EventKind::Transform
        | EventKind::Prepare
        | EventKind::FormeChange
        | EventKind::DetailsChange
        | EventKind::Replace
        | EventKind::EndAbility => {
            //|move|p1a: Ninetales|Inferno|p2a: Umbreon|[miss]
            //|-start|p2a: Cinccino|Disable|Rock Blast|[from] ability: Cursed Body
            event.name = field(&parts, 3);
        }
        EventKind::Win | EventKind::Activate | EventKind::Weather | EventKind::FieldStart
        | EventKind::FieldEnd => {
            //|win|USER
            //|-weather|WEATHER
            event.name = field(&parts, 2);
        }
        EventKind::Turn => {
            //|turn|NUMBER
            event.magnitude = parse_int(&field(&parts, 2));
        }
        EventKind::Damage | EventKind::Heal | EventKind::SetHp => {
            //|-heal|p2a: Umbreon|100/100 brn|[from] item: Leftovers
            event.name = field(&parts, 3);
            if let Ok(cond) = parse_condition(&event.name) {
                event.magnitude = cond.hp_now;
            }
        }
        EventKind::Swap => {
            //|swap|POKEMON|POSITION
            event.name = field(&parts, 2);
            event.magnitude = parse_int(&field(&parts, 3));
        }
        EventKind::Cant => {
            //|cant|POKEMON|REASON or |cant|POKEMON|REASON|MOVE
            if parts.len() >= 5 {
                event.name = field(&parts, 4);
            }
            event
                .metadata
                .insert("reason".to_string(), field(&parts, 3));
        }
        EventKind::Boost | EventKind::Unboost | EventKind::SetBoost => {
            //|-boost|p2a: Gallade|atk|2
            event.name = field(&parts, 3);
            event.magnitude = parse_int(&field(&parts, 4));
        }
        EventKind::Fail => {
            //|-fail|p2a: Umbreon|ACTION (the action is optional)
            if parts.len() >= 4 {
                event.name = field(&parts, 3);
            }
        }
        EventKind::ClearPositiveBoost | EventKind::SwapBoost | EventKind::Mega => {
            //|-mega|p2a: Gallade|Gallade|Galladite
            //|-swapboost|SOURCE|TARGET|STATS
            event.name = field(&parts, 4);
        }
        EventKind::SideStart | EventKind::SideEnd => {
            //|-sidestart|SIDE|CONDITION
            event.name = field(&parts, 3);
            event.metadata.insert("side".to_string(), field(&parts, 2));
        }
        EventKind::Burst => {
            //|-burst|POKEMON|SPECIES|ITEM
            event.name = field(&parts, 4);
            event
                .metadata
                .insert("species".to_string(), field(&parts, 3));
        }
        EventKind::HitCount => {
            //|-hitcount|POKEMON|NUM
            event.magnitude = parse_int(&field(&parts, 3));
        }
        _ => {}
    }

    Some(event)
}

fn field(parts: &[&str], index: usize) -> String {
    parts.get(index).unwrap_or(&"").to_string()
}

/// Parse the int. If not possible we return the default value (0).
fn parse_int(s: &str) -> i32 {
    s.trim().parse().unwrap_or(0)
}
