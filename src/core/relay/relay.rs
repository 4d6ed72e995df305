use crate::core::communication::DisplayEncoding;
use crate::core::relay::sink::{DisplayLog, FileLog, OutputSink};
use crate::domain::error::{SerialComError, SerialComResult};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Destination a received chunk was routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Display,
    File,
}

/// Renders received bytes and routes them to the display log or the
/// receive file.
#[derive(Debug, Default)]
pub struct DataRelay {
    encoding: DisplayEncoding,
    display: DisplayLog,
    sink: OutputSink,
    receive_path: Option<PathBuf>,
}

impl DataRelay {
    pub fn new(hex_display: bool, receive_path: Option<PathBuf>) -> Self {
        Self {
            encoding: DisplayEncoding::from_hex_flag(hex_display),
            display: DisplayLog::new(),
            sink: OutputSink::Display,
            receive_path,
        }
    }

    /// Render one inbound chunk and send it to exactly one destination
    pub fn on_data_received(&mut self, bytes: &[u8]) -> Route {
        let rendered = self.encoding.render(bytes);
        match &mut self.sink {
            OutputSink::File(log) => {
                if let Err(e) = log.append(&rendered) {
                    warn!("{}", e);
                }
                Route::File
            }
            OutputSink::Display => {
                self.display.append(&rendered);
                Route::Display
            }
        }
    }

    pub fn hex_display(&self) -> bool {
        self.encoding == DisplayEncoding::Hex
    }

    /// Changing the encoding always clears the display log
    pub fn set_hex_display(&mut self, enabled: bool) {
        self.encoding = DisplayEncoding::from_hex_flag(enabled);
        self.display.clear();
        debug!(hex = enabled, "Receive display encoding changed");
    }

    pub fn toggle_hex_display(&mut self) -> bool {
        let enabled = !self.hex_display();
        self.set_hex_display(enabled);
        enabled
    }

    pub fn clear_log(&mut self) {
        self.display.clear();
    }

    pub fn display(&self) -> &DisplayLog {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut DisplayLog {
        &mut self.display
    }

    pub fn sink(&self) -> &OutputSink {
        &self.sink
    }

    pub fn is_logging_to_file(&self) -> bool {
        self.sink.is_file()
    }

    /// The receive-file field and its buttons are locked while logging to file
    pub fn controls_locked(&self) -> bool {
        self.sink.is_file()
    }

    pub fn receive_path(&self) -> Option<&Path> {
        self.receive_path.as_deref()
    }

    /// Direct edit of the receive-file field
    pub fn set_receive_path(&mut self, text: &str) -> SerialComResult<()> {
        self.ensure_unlocked()?;
        let text = text.trim();
        self.receive_path = if text.is_empty() {
            None
        } else {
            Some(PathBuf::from(text))
        };
        Ok(())
    }

    /// Pick an existing file; anything else clears the field
    pub fn select_receive_file(&mut self, path: &Path) -> SerialComResult<()> {
        self.ensure_unlocked()?;
        if !path.is_file() {
            self.receive_path = None;
            return Err(SerialComError::InvalidFile {
                path: path.to_path_buf(),
            });
        }
        self.receive_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Switch to file output. On failure the display log stays active.
    pub fn enable_file_output(&mut self) -> SerialComResult<PathBuf> {
        if let OutputSink::File(log) = &self.sink {
            return Ok(log.path().to_path_buf());
        }

        let path = self
            .receive_path
            .clone()
            .ok_or_else(|| SerialComError::Configuration("No receive file selected".to_string()))?;
        let log = FileLog::create(&path)?;

        self.sink = OutputSink::File(log);
        self.display
            .set_text(format!("Writing received data to file [{}]", path.display()));
        info!(path = %path.display(), "Receive output switched to file");
        Ok(path)
    }

    /// Back to the display log; the file is flushed and closed
    pub fn disable_file_output(&mut self) -> bool {
        match std::mem::take(&mut self.sink) {
            OutputSink::File(log) => {
                drop(log);
                self.display.clear();
                info!("Receive output switched to display");
                true
            }
            OutputSink::Display => false,
        }
    }

    /// Returns whether file output is now active
    pub fn toggle_file_output(&mut self) -> SerialComResult<bool> {
        if self.sink.is_file() {
            self.disable_file_output();
            Ok(false)
        } else {
            self.enable_file_output()?;
            Ok(true)
        }
    }

    /// Write the whole display log to `path`, replacing its contents
    pub fn save_display_log_to_file(&self, path: &Path) -> SerialComResult<()> {
        let mut file = File::create(path).map_err(|source| SerialComError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        file.write_all(self.display.as_str().as_bytes())
            .and_then(|()| file.flush())
            .map_err(|source| SerialComError::FileWrite {
                path: path.to_path_buf(),
                source,
            })?;
        info!(path = %path.display(), bytes = self.display.len(), "Display log saved");
        Ok(())
    }

    fn ensure_unlocked(&self) -> SerialComResult<()> {
        if self.controls_locked() {
            return Err(SerialComError::Configuration(
                "Receive file cannot change while logging to file".to_string(),
            ));
        }
        Ok(())
    }
}
