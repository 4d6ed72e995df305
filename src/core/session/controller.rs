use crate::core::communication::{Connector, Transport, TransportErrorKind, TransportEvent, TransportFault};
use crate::core::session::state::{FaultOutcome, SessionState, SessionStatistics};
use crate::domain::{
    config::{PortConfig, PortSelection},
    error::{SerialComError, SerialComResult},
};
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

struct ActiveSession {
    id: Uuid,
    config: PortConfig,
    transport: Box<dyn Transport>,
    opened_at: Instant,
    statistics: SessionStatistics,
}

/// Owns the one serial session and its open/closed transitions.
///
/// The transport is only reachable while the session is open, so nothing
/// can be read from (or transformed out of) a closed port.
pub struct SessionController {
    connector: Box<dyn Connector>,
    active: Option<ActiveSession>,
}

impl SessionController {
    pub fn new(connector: Box<dyn Connector>) -> Self {
        Self {
            connector,
            active: None,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.active.is_some() {
            SessionState::Open
        } else {
            SessionState::Closed
        }
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// Configuration of the open session
    pub fn config(&self) -> Option<&PortConfig> {
        self.active.as_ref().map(|session| &session.config)
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.active.as_ref().map(|session| session.id)
    }

    pub fn statistics(&self) -> SessionStatistics {
        self.active
            .as_ref()
            .map(|session| session.statistics)
            .unwrap_or_default()
    }

    /// Open the port described by `config`. On failure the state stays Closed.
    pub fn open(&mut self, config: PortConfig) -> SerialComResult<()> {
        if let Some(session) = &self.active {
            return Err(SerialComError::Configuration(format!(
                "{} is already open",
                session.config.name
            )));
        }

        let transport = self.connector.connect(&config)?;
        let id = Uuid::new_v4();
        info!(session = %id, port = %config, "Serial port opened");

        self.active = Some(ActiveSession {
            id,
            config,
            transport,
            opened_at: Instant::now(),
            statistics: SessionStatistics::default(),
        });
        Ok(())
    }

    /// Close the open session. Returns false when there was nothing to close.
    pub fn close(&mut self) -> bool {
        let Some(mut session) = self.active.take() else {
            return false;
        };

        if let Err(fault) = session.transport.flush() {
            warn!(session = %session.id, "Flush before close failed: {}", fault);
        }
        info!(
            session = %session.id,
            port = %session.config.name,
            uptime_ms = session.opened_at.elapsed().as_millis() as u64,
            bytes_sent = session.statistics.bytes_sent,
            bytes_received = session.statistics.bytes_received,
            "Serial port closed"
        );
        // dropping the transport releases the device
        drop(session);
        true
    }

    /// Open from the current selection when closed, close when open
    pub fn toggle_open(&mut self, selection: &PortSelection) -> SerialComResult<SessionState> {
        if self.is_open() {
            self.close();
        } else {
            let config = selection.to_port_config()?;
            self.open(config)?;
        }
        Ok(self.state())
    }

    /// Readiness check: at most one event, never any while closed
    pub fn poll(&mut self) -> Option<TransportEvent> {
        let session = self.active.as_mut()?;
        match session.transport.poll_read() {
            Ok(Some(bytes)) if !bytes.is_empty() => {
                session.statistics.bytes_received += bytes.len() as u64;
                session.statistics.chunks_received += 1;
                debug!(session = %session.id, "Received {} bytes", bytes.len());
                Some(TransportEvent::Data(bytes))
            }
            Ok(_) => None,
            Err(fault) => Some(TransportEvent::Error(fault)),
        }
    }

    pub fn write(&mut self, data: &[u8]) -> SerialComResult<()> {
        let session = self.active.as_mut().ok_or(SerialComError::NotConnected)?;
        match session.transport.write_all(data) {
            Ok(()) => {
                session.statistics.bytes_sent += data.len() as u64;
                debug!(session = %session.id, "Sent {} bytes", data.len());
                Ok(())
            }
            Err(fault) => {
                let port = session.config.name.clone();
                Err(match fault.kind {
                    TransportErrorKind::Resource => SerialComError::TransportResource {
                        port,
                        message: fault.message,
                    },
                    TransportErrorKind::Other => SerialComError::Transport {
                        port,
                        message: fault.message,
                    },
                })
            }
        }
    }

    /// Resource errors close the session; anything else leaves it open
    pub fn on_transport_error(&mut self, fault: TransportFault) -> FaultOutcome {
        let port = self
            .active
            .as_ref()
            .map(|session| session.config.name.clone())
            .unwrap_or_default();

        match fault.kind {
            TransportErrorKind::Resource => {
                warn!(port = %port, "Device lost: {}", fault.message);
                self.close();
                FaultOutcome::Closed(SerialComError::TransportResource {
                    port,
                    message: fault.message,
                })
            }
            TransportErrorKind::Other => {
                warn!(port = %port, "Transport error ignored: {}", fault.message);
                FaultOutcome::Ignored
            }
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.close();
    }
}
