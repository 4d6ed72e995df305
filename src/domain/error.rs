use std::path::PathBuf;
use thiserror::Error;

/// SerialCom unified error type
#[derive(Error, Debug)]
pub enum SerialComError {
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unselected port settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Configuration file could not be read, parsed or written
    #[error("Config file error: {message}")]
    Config { message: String },

    #[error("Failed to open {port}: {message}")]
    TransportOpen { port: String, message: String },

    #[error("Serial port {port} error: {message}")]
    Transport { port: String, message: String },

    /// The device went away underneath an open session
    #[error("Serial port {port} is no longer available: {message}")]
    TransportResource { port: String, message: String },

    #[error("Cannot open [{}]: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write [{}]: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid file: [{}]", path.display())]
    InvalidFile { path: PathBuf },

    #[error("Serial port is not open")]
    NotConnected,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error("Terminal error: {0}")]
    Tui(String),
}

impl SerialComError {
    /// Whether the error ends the current session
    pub fn is_fatal_for_session(&self) -> bool {
        matches!(self, SerialComError::TransportResource { .. })
    }
}

pub type SerialComResult<T> = Result<T, SerialComError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_open_display_names_path() {
        let err = SerialComError::FileOpen {
            path: PathBuf::from("/nope/rx.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let text = err.to_string();
        assert!(text.contains("[/nope/rx.txt]"));
        assert!(text.contains("missing"));
    }

    #[test]
    fn test_only_resource_errors_are_fatal() {
        let resource = SerialComError::TransportResource {
            port: "ttyUSB0".to_string(),
            message: "device removed".to_string(),
        };
        assert!(resource.is_fatal_for_session());
        assert!(!SerialComError::NotConnected.is_fatal_for_session());
        assert!(!SerialComError::Configuration("no port".to_string()).is_fatal_for_session());
    }
}
