//! Random team generation via the simulator itself
//!
//! `pokemon-showdown generate-team` emits a packed team;
//! `pokemon-showdown unpack-team` turns a packed team back into JSON we
//! can read as [`PokemonSpec`]s. Chaining the two gives a legal random
//! team for random-team formats.

use std::time::Duration;

use porygon_team::PokemonSpec;

use crate::error::SimError;
use crate::pump::Pump;

const UNPACK_TIMEOUT: Duration = Duration::from_secs(1);

/// Uses pokemon-showdown to generate a random team of pokemon
pub async fn random_team(binary: &str) -> Result<Vec<PokemonSpec>, SimError> {
    let generated = tokio::process::Command::new(binary)
        .arg("generate-team")
        .output()
        .await
        .map_err(|err| SimError::ChildDied(err.to_string()))?;

    if !generated.status.success() {
        return Err(SimError::ChildDied(format!(
            "generate-team exited with {}",
            generated.status
        )));
    }

    let packed = String::from_utf8_lossy(&generated.stdout).trim().to_string();
    unpack_team(binary, &packed).await
}

/// Feed a packed team through `unpack-team` and decode the JSON answer
async fn unpack_team(binary: &str, packed: &str) -> Result<Vec<PokemonSpec>, SimError> {
    // unpack-team answers in single lines, not blank-line frames
    let mut pump = Pump::spawn_with(binary, &["unpack-team"], "\n")?;

    pump.stdin
        .send(format!("{}\n\n", packed))
        .await
        .map_err(|_| SimError::ChildDied("unpack-team stdin closed".to_string()))?;

    tokio::select! {
        answer = pump.stdout.recv() => {
            let data = answer
                .ok_or_else(|| SimError::ChildDied("unpack-team closed stdout".to_string()))?;
            serde_json::from_str(&data).map_err(|err| SimError::Protocol(err.to_string()))
        }
        noise = pump.stderr.recv() => Err(SimError::Protocol(format!(
            "failed to unpack team: {}",
            noise.unwrap_or_default()
        ))),
        failure = pump.errors.recv() => Err(match failure {
            Some(err) => SimError::from(err),
            None => SimError::ChildDied("unpack-team exited".to_string()),
        }),
        _ = tokio::time::sleep(UNPACK_TIMEOUT) => Err(SimError::Timeout),
    }
}
