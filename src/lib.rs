//! SerialCom Library
//!
//! Interactive serial port terminal: port discovery, a single open session,
//! text or hex rendering of received data, and logging it to screen or file.

pub mod cli;
pub mod tui;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use domain::error::{SerialComError, SerialComResult};
pub use domain::config::{PortConfig, PortSelection, SerialComConfig};
pub use core::communication::{Connector, Transport, TransportErrorKind, TransportEvent, TransportFault};
pub use core::console::{Console, Notice, SendOptions, Severity, UiCommand};
pub use core::relay::{DataRelay, OutputSink, Route};
pub use core::session::{SessionController, SessionState};
