//! Battle sessions
//!
//! A [`Session`] owns one simulator subprocess, runs the startup
//! handshake, and collates the child's interleaved output into per-turn
//! [`BattleState`] snapshots. Background task failures are buffered and
//! surfaced on the next synchronous call, so callers only ever deal
//! with `turn` and `stop`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{Notify, mpsc};
use tracing::{debug, warn};

use porygon_battle::{BattleState, Collator};
use porygon_protocol::{Action, SimMessage, parse_frame};
use porygon_team::Dex;

use crate::error::SimError;
use crate::pump::Pump;
use crate::spec::BattleSpec;

/// The simulator drops team-order lines that arrive too quickly after
/// the player announcements; this pause gives it time to absorb each
/// one. Only this phase of the handshake is sensitive.
const TEAM_ORDER_PAUSE: Duration = Duration::from_millis(100);

/// Errors from background tasks, parked until the next synchronous call
#[derive(Default)]
pub(crate) struct ErrorBuffer {
    unread: Mutex<Vec<SimError>>,
    notify: Notify,
}

impl ErrorBuffer {
    pub(crate) fn push(&self, err: SimError) {
        if let Ok(mut unread) = self.unread.lock() {
            unread.push(err);
        }
        // notify_one stores a permit, so a drain that races this push
        // still wakes
        self.notify.notify_one();
    }

    /// Takes every parked error, joined into one
    pub(crate) fn drain(&self) -> Option<SimError> {
        let errors = self
            .unread
            .lock()
            .map(|mut unread| std::mem::take(&mut *unread))
            .unwrap_or_default();
        SimError::join(errors)
    }

    pub(crate) async fn wait(&self) {
        self.notify.notified().await;
    }
}

/// A running battle against one simulator subprocess
pub struct Session {
    stdin: mpsc::Sender<String>,
    ctrl: mpsc::Sender<()>,
    states: mpsc::Receiver<BattleState>,
    errors: Arc<ErrorBuffer>,
    last_state: BattleState,
    fatal: Option<SimError>,
    stopped: bool,
}

impl Session {
    /// Start a battle: spawn the simulator, run the startup handshake
    /// and wait for the initial (pre-turn-1) state, so the first
    /// `turn` call always has a prior state to reference.
    ///
    /// The dex backs team validation; for random formats with empty
    /// teams a `Dex::default()` will do.
    pub async fn start(binary: &str, spec: &BattleSpec, dex: &Dex) -> Result<Session, SimError> {
        spec.validate()?;

        let mut spec = spec.clone();
        if spec.seed == 0 {
            spec.seed = rand::random::<u32>() as i64;
        }

        let pump = Pump::spawn(binary, &["simulate-battle"])?;
        let mut session = Session::wire(pump, spec.players.len());

        if let Err(err) = session.handshake(&spec, dex).await {
            session.stop().await;
            return Err(err);
        }

        match session.next_state().await {
            Ok(state) => session.last_state = state,
            Err(err) => {
                session.stop().await;
                return Err(err);
            }
        }

        Ok(session)
    }

    /// Plumb the pump's streams into the error buffer and the collator
    fn wire(pump: Pump, players: usize) -> Session {
        let Pump {
            stdin,
            ctrl,
            mut stdout,
            mut stderr,
            errors: mut pump_errors,
        } = pump;

        let errors = Arc::new(ErrorBuffer::default());

        // roll pump I/O failures into the buffer
        let buffer = errors.clone();
        tokio::spawn(async move {
            while let Some(err) = pump_errors.recv().await {
                buffer.push(SimError::from(err));
            }
        });

        // the simulator's stderr is diagnostic only
        tokio::spawn(async move {
            while let Some(line) = stderr.recv().await {
                let line = line.trim();
                if !line.is_empty() {
                    warn!(line, "simulator stderr");
                }
            }
        });

        // collation: decode each stdout frame, park faults, publish
        // completed turn states
        let (state_tx, state_rx) = mpsc::channel(1);
        let buffer = errors.clone();
        tokio::spawn(async move {
            let mut collator = Collator::new(players);
            while let Some(frame) = stdout.recv().await {
                debug!(bytes = frame.len(), "sim frame");
                let messages = match parse_frame(&frame) {
                    Ok(messages) => messages,
                    Err(err) => {
                        buffer.push(SimError::Protocol(err.to_string()));
                        continue;
                    }
                };

                for message in messages {
                    if let SimMessage::Fault(fault) = message {
                        buffer.push(SimError::from(fault));
                        continue;
                    }
                    match collator.apply(&message) {
                        Ok(Some(state)) => {
                            if state_tx.send(state).await.is_err() {
                                return;
                            }
                        }
                        Ok(None) => {}
                        Err(err) => buffer.push(SimError::from(err)),
                    }
                }
            }
            // stdout closed: the child is gone. Dropping state_tx lets
            // blocked callers observe the end.
        });

        Session {
            stdin,
            ctrl,
            states: state_rx,
            errors,
            last_state: BattleState::default(),
            fatal: None,
            stopped: false,
        }
    }

    /// The three-phase startup handshake: format, player teams, team
    /// orders. Orders MUST come after every `>player` line.
    async fn handshake(&mut self, spec: &BattleSpec, dex: &Dex) -> Result<(), SimError> {
        let start = serde_json::json!({
            "seed": [spec.seed, spec.seed, spec.seed, spec.seed],
            "formatid": spec.format.as_str(),
        });
        self.write(format!(">start {}\n", start)).await?;

        let mut orders = Vec::new();
        for (index, team) in spec.players.iter().enumerate() {
            let player = format!("p{}", index + 1);

            let packed = if team.is_empty() {
                String::new()
            } else {
                porygon_team::pack_team(team, dex)
                    .map_err(|err| SimError::InvalidSpec(err.to_string()))?
            };

            let announce = serde_json::json!({ "name": player, "team": packed });
            self.write(format!(">player {} {}\n", player, announce))
                .await?;

            if team.is_empty() {
                continue;
            }

            // battle order is the order the team was given in
            let members: Vec<String> = (1..=team.len()).map(|i| i.to_string()).collect();
            orders.push(format!(">{} team {}\n", player, members.join(",")));
        }

        for order in orders {
            self.write(order).await?;
            tokio::time::sleep(TEAM_ORDER_PAUSE).await;
        }

        match self.errors.drain() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn write(&self, line: String) -> Result<(), SimError> {
        self.stdin
            .send(line)
            .await
            .map_err(|_| SimError::ChildDied("simulator stdin closed".to_string()))
    }

    /// Submit one turn's worth of actions and block for the resulting
    /// state.
    ///
    /// Non-fatal errors (`InvalidChoice`, `UnavailableChoice`) leave
    /// the session usable: submit a corrected action. Fatal errors
    /// latch - every subsequent call returns the same error.
    pub async fn turn(&mut self, actions: &[Action]) -> Result<BattleState, SimError> {
        if let Some(err) = &self.fatal {
            return Err(err.clone());
        }

        for action in actions {
            self.write(action.pack()).await?;
            if let Some(err) = self.errors.drain() {
                return self.fail(err);
            }
        }

        match self.next_state().await {
            Ok(state) => {
                self.last_state = state.clone();
                Ok(state)
            }
            Err(err) => self.fail(err),
        }
    }

    /// Wait for the next collated state, surfacing buffered errors as
    /// they arrive rather than blocking through them
    async fn next_state(&mut self) -> Result<BattleState, SimError> {
        loop {
            if let Some(err) = self.errors.drain() {
                return Err(err);
            }

            let errors = self.errors.clone();
            tokio::select! {
                state = self.states.recv() => {
                    return state.ok_or_else(|| {
                        SimError::ChildDied("simulator closed the battle stream".to_string())
                    });
                }
                _ = errors.wait() => {}
            }
        }
    }

    fn fail(&mut self, err: SimError) -> Result<BattleState, SimError> {
        if err.is_fatal() {
            self.fatal = Some(err.clone());
        }
        Err(err)
    }

    /// The last published battle state
    pub fn state(&self) -> &BattleState {
        &self.last_state
    }

    /// Kill the simulator and release the session's resources.
    /// Idempotent, tolerates the child having already exited, and never
    /// reports an error.
    pub async fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;

        let _ = self.ctrl.send(()).await;
        self.states.close();
    }
}
