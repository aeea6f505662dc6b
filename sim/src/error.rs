//! The session error taxonomy
//!
//! Everything a caller can see goes through [`SimError`]. Choice errors
//! are recoverable - the session stays usable and a corrected action
//! may be submitted. Everything else is fatal to the session.

use thiserror::Error;

use porygon_protocol::ChoiceFault;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// The action could not be parsed or was logically wrong for this
    /// turn (e.g. switching to an already active pokemon). Non-fatal.
    #[error("invalid choice: {0}")]
    InvalidChoice(String),

    /// The action was syntactically valid but refused (disabled move,
    /// trapped switch). Non-fatal.
    #[error("unavailable choice: {0}")]
    UnavailableChoice(String),

    /// Any other simulator error, a malformed payload or an
    /// unparseable condition. Fatal to the session.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Subprocess exit or pipe failure. Fatal; subsequent operations
    /// return this same error.
    #[error("simulator process died: {0}")]
    ChildDied(String),

    /// The battle spec failed validation before any process was
    /// started
    #[error("invalid battle spec: {0}")]
    InvalidSpec(String),

    /// The simulation blocked for too long. Usually means the actions
    /// given were out of order or incomplete and the simulator is
    /// waiting for input.
    #[error("timeout (check input?)")]
    Timeout,
}

impl SimError {
    /// Non-fatal errors leave the session usable; the caller may retry
    /// with a corrected action
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            SimError::InvalidChoice(_) | SimError::UnavailableChoice(_)
        )
    }

    /// Collapse buffered errors into one value. The earliest error
    /// decides the kind; later messages are appended so none is lost.
    pub(crate) fn join(errors: Vec<SimError>) -> Option<SimError> {
        let mut iter = errors.into_iter();
        let first = iter.next()?;
        Some(iter.fold(first, |joined, next| joined.chain(&next.to_string())))
    }

    fn chain(self, message: &str) -> SimError {
        match self {
            SimError::InvalidChoice(m) => SimError::InvalidChoice(format!("{}: {}", m, message)),
            SimError::UnavailableChoice(m) => {
                SimError::UnavailableChoice(format!("{}: {}", m, message))
            }
            SimError::Protocol(m) => SimError::Protocol(format!("{}: {}", m, message)),
            SimError::ChildDied(m) => SimError::ChildDied(format!("{}: {}", m, message)),
            SimError::InvalidSpec(m) => SimError::InvalidSpec(format!("{}: {}", m, message)),
            SimError::Timeout => SimError::Timeout,
        }
    }
}

impl From<ChoiceFault> for SimError {
    fn from(fault: ChoiceFault) -> Self {
        match fault {
            ChoiceFault::Invalid(m) => SimError::InvalidChoice(m),
            ChoiceFault::Unavailable(m) => SimError::UnavailableChoice(m),
            ChoiceFault::Protocol(m) => SimError::Protocol(m),
        }
    }
}

impl From<porygon_protocol::ParseError> for SimError {
    fn from(err: porygon_protocol::ParseError) -> Self {
        SimError::Protocol(err.to_string())
    }
}

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        SimError::ChildDied(err.to_string())
    }
}
