use crate::core::communication::{Connector, Transport, TransportErrorKind, TransportFault};
use crate::domain::{
    config::{DataBits, FlowControl, Parity, PortConfig, StopBits},
    error::{SerialComError, SerialComResult},
};
use serialport::SerialPort;
use std::io::{self, Read, Write};
use std::time::Duration;
use tracing::{debug, info};

const READ_CHUNK: usize = 4096;

impl From<DataBits> for serialport::DataBits {
    fn from(bits: DataBits) -> Self {
        match bits {
            DataBits::Five => serialport::DataBits::Five,
            DataBits::Six => serialport::DataBits::Six,
            DataBits::Seven => serialport::DataBits::Seven,
            DataBits::Eight => serialport::DataBits::Eight,
        }
    }
}

impl From<StopBits> for serialport::StopBits {
    fn from(bits: StopBits) -> Self {
        match bits {
            StopBits::One => serialport::StopBits::One,
            StopBits::Two => serialport::StopBits::Two,
        }
    }
}

impl From<Parity> for serialport::Parity {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::None => serialport::Parity::None,
            Parity::Odd => serialport::Parity::Odd,
            Parity::Even => serialport::Parity::Even,
        }
    }
}

impl From<FlowControl> for serialport::FlowControl {
    fn from(flow_control: FlowControl) -> Self {
        match flow_control {
            FlowControl::None => serialport::FlowControl::None,
            FlowControl::Software => serialport::FlowControl::Software,
            FlowControl::Hardware => serialport::FlowControl::Hardware,
        }
    }
}

/// Opens real serial ports
#[derive(Debug, Clone)]
pub struct SerialConnector {
    timeout: Duration,
}

impl SerialConnector {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_millis(10),
        }
    }

    /// Read/write timeout applied to opened ports
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for SerialConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for SerialConnector {
    fn connect(&self, config: &PortConfig) -> SerialComResult<Box<dyn Transport>> {
        let port = serialport::new(&config.name, config.baud_rate)
            .data_bits(config.data_bits.into())
            .stop_bits(config.stop_bits.into())
            .parity(config.parity.into())
            .flow_control(config.flow_control.into())
            .timeout(self.timeout)
            .open()
            .map_err(|e| SerialComError::TransportOpen {
                port: config.name.clone(),
                message: e.description,
            })?;

        info!(port = %config, "Serial port handle acquired");

        Ok(Box::new(SerialTransport {
            name: config.name.clone(),
            port,
            buffer: vec![0u8; READ_CHUNK],
        }))
    }
}

/// An open serial port. Dropping it closes the device.
pub struct SerialTransport {
    name: String,
    port: Box<dyn SerialPort>,
    buffer: Vec<u8>,
}

impl Transport for SerialTransport {
    fn poll_read(&mut self) -> Result<Option<Vec<u8>>, TransportFault> {
        let available = self.port.bytes_to_read().map_err(classify_readiness_error)? as usize;
        if available == 0 {
            return Ok(None);
        }

        let want = available.min(self.buffer.len());
        match self.port.read(&mut self.buffer[..want]) {
            Ok(0) => Ok(None),
            Ok(n) => Ok(Some(self.buffer[..n].to_vec())),
            Err(e) if is_transient(e.kind()) => Ok(None),
            Err(e) => Err(classify_io_error(&e)),
        }
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportFault> {
        self.port.write_all(data).map_err(|e| classify_io_error(&e))
    }

    fn flush(&mut self) -> Result<(), TransportFault> {
        match self.port.flush() {
            Err(e) if !is_transient(e.kind()) => Err(classify_io_error(&e)),
            _ => Ok(()),
        }
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        debug!(port = %self.name, "Releasing serial port handle");
    }
}

fn is_transient(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

/// The readiness query on an open port only fails once the device is gone.
/// serialport drops the errno (a hung-up tty reports `Unknown`), so every
/// non-transient failure counts as a lost device.
fn classify_readiness_error(e: serialport::Error) -> TransportFault {
    let kind = match e.kind {
        serialport::ErrorKind::Io(kind) if is_transient(kind) => TransportErrorKind::Other,
        serialport::ErrorKind::InvalidInput => TransportErrorKind::Other,
        _ => TransportErrorKind::Resource,
    };
    TransportFault {
        kind,
        message: e.description,
    }
}

fn classify_io_error(e: &io::Error) -> TransportFault {
    TransportFault {
        kind: classify_io_kind(e.kind(), e.raw_os_error()),
        message: e.to_string(),
    }
}

/// Map an I/O failure on an open port to "device gone" or "something else"
pub(crate) fn classify_io_kind(kind: io::ErrorKind, os_error: Option<i32>) -> TransportErrorKind {
    match kind {
        io::ErrorKind::BrokenPipe
        | io::ErrorKind::NotFound
        | io::ErrorKind::NotConnected
        | io::ErrorKind::UnexpectedEof
        | io::ErrorKind::PermissionDenied
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted => TransportErrorKind::Resource,
        _ if os_error.is_some_and(is_device_gone_os_error) => TransportErrorKind::Resource,
        _ => TransportErrorKind::Other,
    }
}

#[cfg(unix)]
fn is_device_gone_os_error(code: i32) -> bool {
    // EIO, ENXIO, ENODEV
    matches!(code, 5 | 6 | 19)
}

#[cfg(windows)]
fn is_device_gone_os_error(code: i32) -> bool {
    // ERROR_BAD_COMMAND, ERROR_GEN_FAILURE, ERROR_DEVICE_NOT_CONNECTED
    matches!(code, 22 | 31 | 1167)
}

#[cfg(not(any(unix, windows)))]
fn is_device_gone_os_error(_code: i32) -> bool {
    false
}
