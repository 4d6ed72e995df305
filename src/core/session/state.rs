use serde::Serialize;
use std::fmt;

/// Whether the single serial session is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Closed,
    Open,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Closed => write!(f, "Closed"),
            SessionState::Open => write!(f, "Open"),
        }
    }
}

/// Traffic counters for the open session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStatistics {
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub chunks_received: u64,
}

/// What became of a transport error
#[derive(Debug)]
pub enum FaultOutcome {
    /// The session was closed; the error is what the user should see
    Closed(crate::domain::error::SerialComError),
    /// Non-fatal; the session stays open
    Ignored,
}
