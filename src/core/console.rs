//! Console: the application-scoped owner of the serial session, the data
//! relay and the user's settings.
//!
//! Front ends construct one `Console` at startup, feed it [`UiCommand`]s and
//! call [`Console::pump`] from their event loop. Every failure turns into a
//! [`Notice`] that the front end shows to the user.

use crate::core::communication::{frame_outgoing, Connector, TransportEvent, TransportFault};
use crate::core::relay::{DataRelay, Route};
use crate::core::session::{FaultOutcome, SessionController, SessionState};
use crate::domain::{
    config::{PortSelection, SerialComConfig},
    error::{SerialComError, SerialComResult},
};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// Upper bound on transport reads handled by one `pump` call
const MAX_EVENTS_PER_PUMP: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Info,
    Warning,
    /// Shown modally
    Critical,
}

/// User-facing notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn critical(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Critical,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn is_modal(&self) -> bool {
        self.severity == Severity::Critical
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

/// Line endings appended to outgoing messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendOptions {
    pub append_cr: bool,
    pub append_lf: bool,
}

/// Commands exposed to the user interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    TogglePort,
    ToggleHexDisplay,
    ToggleFileOutput,
    ClearLog,
    SaveLog,
    SendMessage(String),
    SelectReceiveFile(PathBuf),
}

pub struct Console {
    session: SessionController,
    relay: DataRelay,
    selection: PortSelection,
    send_options: SendOptions,
    notices: VecDeque<Notice>,
    last_ignored_fault: Option<String>,
}

impl Console {
    pub fn new(config: &SerialComConfig, connector: Box<dyn Connector>) -> Self {
        Self {
            session: SessionController::new(connector),
            relay: DataRelay::new(config.display.hex_display, config.display.receive_file.clone()),
            selection: PortSelection::from_defaults(&config.port),
            send_options: SendOptions {
                append_cr: config.display.append_cr,
                append_lf: config.display.append_lf,
            },
            notices: VecDeque::new(),
            last_ignored_fault: None,
        }
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionController {
        &mut self.session
    }

    pub fn relay(&self) -> &DataRelay {
        &self.relay
    }

    pub fn relay_mut(&mut self) -> &mut DataRelay {
        &mut self.relay
    }

    pub fn selection(&self) -> &PortSelection {
        &self.selection
    }

    /// Port settings are frozen while a session is open
    pub fn selection_mut(&mut self) -> Option<&mut PortSelection> {
        if self.session.is_open() {
            None
        } else {
            Some(&mut self.selection)
        }
    }

    pub fn send_options(&self) -> SendOptions {
        self.send_options
    }

    pub fn send_options_mut(&mut self) -> &mut SendOptions {
        &mut self.send_options
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// Run a UI command, reporting failures as critical notices
    pub fn dispatch(&mut self, command: UiCommand) {
        debug!(?command, "Dispatching UI command");
        let result = match command {
            UiCommand::TogglePort => self.toggle_port().map(|_| ()),
            UiCommand::ToggleHexDisplay => {
                self.relay.toggle_hex_display();
                Ok(())
            }
            UiCommand::ToggleFileOutput => self.toggle_file_output().map(|_| ()),
            UiCommand::ClearLog => {
                self.relay.clear_log();
                Ok(())
            }
            UiCommand::SaveLog => self.save_log(),
            UiCommand::SendMessage(text) => self.send_message(&text),
            UiCommand::SelectReceiveFile(path) => self.relay.select_receive_file(&path),
        };

        if let Err(e) = result {
            self.report(&e);
        }
    }

    pub fn toggle_port(&mut self) -> SerialComResult<SessionState> {
        let state = self.session.toggle_open(&self.selection)?;
        self.last_ignored_fault = None;
        Ok(state)
    }

    pub fn toggle_file_output(&mut self) -> SerialComResult<bool> {
        self.relay.toggle_file_output()
    }

    /// Export the display log to the receive-file path
    pub fn save_log(&mut self) -> SerialComResult<()> {
        if self.relay.controls_locked() {
            return Err(SerialComError::Configuration(
                "Saving is disabled while logging to file".to_string(),
            ));
        }
        let path = self
            .relay
            .receive_path()
            .map(PathBuf::from)
            .ok_or_else(|| SerialComError::Configuration("No file selected".to_string()))?;

        self.relay.save_display_log_to_file(&path)?;
        self.notices.push_back(Notice::info(
            "Saved",
            format!("Wrote display log to file [{}]", path.display()),
        ));
        Ok(())
    }

    pub fn send_message(&mut self, text: &str) -> SerialComResult<()> {
        let data = frame_outgoing(text, self.send_options.append_cr, self.send_options.append_lf);
        match self.session.write(&data) {
            Err(e) if e.is_fatal_for_session() => {
                self.session.close();
                Err(e)
            }
            other => other,
        }
    }

    /// Handle every transport event that is ready now.
    ///
    /// Returns the number of events handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while handled < MAX_EVENTS_PER_PUMP {
            let Some(event) = self.session.poll() else {
                break;
            };
            handled += 1;
            match event {
                TransportEvent::Data(bytes) => {
                    self.on_data_received(&bytes);
                }
                TransportEvent::Error(fault) => {
                    let fatal = self.on_transport_error(fault);
                    if fatal {
                        break;
                    }
                }
            }
        }
        handled
    }

    /// Received bytes are only rendered while the session is open
    pub fn on_data_received(&mut self, bytes: &[u8]) -> Option<Route> {
        if !self.session.is_open() {
            debug!("Dropping {} bytes received while closed", bytes.len());
            return None;
        }
        Some(self.relay.on_data_received(bytes))
    }

    /// Returns true when the error closed the session
    pub fn on_transport_error(&mut self, fault: TransportFault) -> bool {
        let message = fault.message.clone();
        match self.session.on_transport_error(fault) {
            FaultOutcome::Closed(e) => {
                self.last_ignored_fault = None;
                error!("{}", e);
                self.notices.push_back(Notice::critical("Critical Error", e.to_string()));
                true
            }
            FaultOutcome::Ignored => {
                if self.last_ignored_fault.as_deref() != Some(message.as_str()) {
                    self.notices
                        .push_back(Notice::warning("Serial port warning", message.clone()));
                    self.last_ignored_fault = Some(message);
                }
                false
            }
        }
    }

    /// Close the port and the receive file
    pub fn shutdown(&mut self) {
        self.session.close();
        self.relay.disable_file_output();
        info!("Console shut down");
    }

    fn report(&mut self, e: &SerialComError) {
        error!("{}", e);
        let title = match e {
            SerialComError::TransportOpen { .. } | SerialComError::Configuration(_) => "Error",
            SerialComError::NotConnected => "Not connected",
            _ => "Critical Error",
        };
        self.notices.push_back(Notice::critical(title, e.to_string()));
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        if self.session.is_open() || self.relay.is_logging_to_file() {
            warn!("Console dropped with open handles; releasing them");
            self.shutdown();
        }
    }
}
