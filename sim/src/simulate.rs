//! One-shot simulation
//!
//! [`simulate`] runs a whole battle from a spec and a flat list of
//! actions: actions are bucketed into turns by per-player progress,
//! pushed through a session, and the final state returned. A wall-clock
//! timeout guards against incomplete input leaving the simulator
//! silently waiting.

use std::collections::HashMap;
use std::time::Duration;

use tracing::warn;

use porygon_battle::BattleState;
use porygon_protocol::{Action, Player};
use porygon_team::Dex;

use crate::error::SimError;
use crate::session::Session;
use crate::spec::BattleSpec;

/// The env var we check for a pokemon-showdown binary.
/// Defaults to `pokemon-showdown` if not given.
pub const ENV_POKEMON_SHOWDOWN: &str = "PATH_POKEMON_SHOWDOWN";

/// Dictates how long a simulation may last before we declare a timeout.
/// A duration string such as `500ms`, `2s` or `1m`; defaults to 2s if
/// not given or unparseable.
pub const ENV_SIMULATION_TIMEOUT: &str = "SIMULATION_TIMEOUT";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Runs pokemon-showdown, passing in the given actions as turn(s), and
/// returns the final battle state
pub async fn simulate(
    spec: &BattleSpec,
    actions: &[Action],
    dex: &Dex,
) -> Result<BattleState, SimError> {
    let binary =
        std::env::var(ENV_POKEMON_SHOWDOWN).unwrap_or_else(|_| "pokemon-showdown".to_string());

    let mut session = Session::start(&binary, spec, dex).await?;

    let outcome = tokio::time::timeout(timeout_duration(), async {
        for turn in bucket_turns(actions) {
            session.turn(&turn).await?;
        }
        Ok::<(), SimError>(())
    })
    .await;

    let result = match outcome {
        Ok(Ok(())) => Ok(session.state().clone()),
        Ok(Err(err)) => Err(err),
        // probably the simulator was waiting for input, which would
        // imply the actions were out of order or simply incomplete
        Err(_) => Err(SimError::Timeout),
    };

    session.stop().await;
    result
}

/// Breaks an ordered list of actions into per-"turn" batches.
///
/// Strictly speaking this doesn't know what turn an action lands on -
/// forced switches produce extra exchanges mid-turn. What matters is
/// that each batch makes the simulator write out the next state, so the
/// k-th action from a player goes into batch k: one player can stall
/// behind the other's forced switches without reordering anything.
fn bucket_turns(actions: &[Action]) -> Vec<Vec<Action>> {
    let mut progress: HashMap<Player, usize> = HashMap::new();
    let mut turns: Vec<Vec<Action>> = Vec::new();

    for action in actions {
        let turn = progress.entry(action.player).or_insert(0);
        if turns.len() <= *turn {
            turns.push(Vec::new());
        }
        turns[*turn].push(action.clone());
        *turn += 1;
    }

    turns
}

/// How long the simulation may run before raising [`SimError::Timeout`]
fn timeout_duration() -> Duration {
    let Ok(raw) = std::env::var(ENV_SIMULATION_TIMEOUT) else {
        return DEFAULT_TIMEOUT;
    };

    match parse_duration(&raw) {
        Some(duration) => duration,
        None => {
            warn!(raw = %raw, "unparseable {}, using 2s", ENV_SIMULATION_TIMEOUT);
            DEFAULT_TIMEOUT
        }
    }
}

/// Parses duration strings of the `500ms` / `2s` / `1.5m` shape
fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let (digits, millis_per_unit) = if let Some(v) = raw.strip_suffix("ms") {
        (v, 1.0)
    } else if let Some(v) = raw.strip_suffix('s') {
        (v, 1_000.0)
    } else if let Some(v) = raw.strip_suffix('m') {
        (v, 60_000.0)
    } else {
        return None;
    };

    let value: f64 = digits.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(Duration::from_millis((value * millis_per_unit) as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use porygon_protocol::ActionSpec;

    fn action(player: Player) -> Action {
        Action::new(player, vec![ActionSpec::mov(0)])
    }

    #[test]
    fn test_bucket_turns_pairs() {
        let actions = vec![
            action(Player::P1),
            action(Player::P2),
            action(Player::P1),
            action(Player::P2),
        ];

        let turns = bucket_turns(&actions);
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].len(), 2);
        assert_eq!(turns[1].len(), 2);
    }

    #[test]
    fn test_bucket_turns_stalled_player() {
        // p2 acts twice in a row (a forced switch); p1's next action
        // still lands in p1's own second bucket
        let actions = vec![
            action(Player::P1),
            action(Player::P2),
            action(Player::P2),
            action(Player::P1),
            action(Player::P2),
        ];

        let turns = bucket_turns(&actions);
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].len(), 2); // p1, p2
        assert_eq!(turns[1].len(), 2); // p2, p1
        assert_eq!(turns[2].len(), 1); // p2
    }

    #[test]
    fn test_bucket_turns_empty() {
        assert!(bucket_turns(&[]).is_empty());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("2s"), Some(Duration::from_secs(2)));
        assert_eq!(parse_duration("500ms"), Some(Duration::from_millis(500)));
        assert_eq!(parse_duration("1.5s"), Some(Duration::from_millis(1500)));
        assert_eq!(parse_duration("1m"), Some(Duration::from_secs(60)));
        assert_eq!(parse_duration("2"), None);
        assert_eq!(parse_duration("fast"), None);
        assert_eq!(parse_duration("-1s"), None);
    }
}
