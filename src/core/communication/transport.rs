use crate::domain::{config::PortConfig, error::SerialComResult};
use std::fmt;

/// Transport error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The device is gone; the session cannot continue
    Resource,
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::Resource => write!(f, "resource"),
            TransportErrorKind::Other => write!(f, "other"),
        }
    }
}

/// Error signalled by an open transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFault {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportFault {
    pub fn resource(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Resource,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Other,
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} error)", self.message, self.kind)
    }
}

/// What a readiness poll produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Data(Vec<u8>),
    Error(TransportFault),
}

/// An open, exclusively owned serial handle.
///
/// Closing is dropping: implementations release the device in `Drop`.
pub trait Transport: Send {
    /// Non-blocking: `Ok(None)` when nothing is ready
    fn poll_read(&mut self) -> Result<Option<Vec<u8>>, TransportFault>;

    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportFault>;

    fn flush(&mut self) -> Result<(), TransportFault>;
}

/// Opens transports for a given port configuration
pub trait Connector {
    fn connect(&self, config: &PortConfig) -> SerialComResult<Box<dyn Transport>>;
}
