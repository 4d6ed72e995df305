use crate::domain::error::{SerialComError, SerialComResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// On-screen receive log. Text is only ever appended at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayLog {
    text: String,
}

impl DisplayLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Hand out everything accumulated so far and start empty
    pub fn drain(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// The last `count` lines, oldest first
    pub fn tail(&self, count: usize) -> Vec<&str> {
        let mut lines: Vec<&str> = self.text.lines().rev().take(count).collect();
        lines.reverse();
        lines
    }
}

/// Receive log file. The handle is flushed and closed when this is dropped.
#[derive(Debug)]
pub struct FileLog {
    path: PathBuf,
    writer: BufWriter<File>,
    bytes_written: u64,
}

impl FileLog {
    /// Create or truncate `path`
    pub fn create(path: &Path) -> SerialComResult<Self> {
        let file = File::create(path).map_err(|source| SerialComError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Receive file opened");
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            bytes_written: 0,
        })
    }

    pub fn append(&mut self, text: &str) -> SerialComResult<()> {
        self.writer
            .write_all(text.as_bytes())
            .map_err(|source| SerialComError::FileWrite {
                path: self.path.clone(),
                source,
            })?;
        self.bytes_written += text.len() as u64;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

impl Drop for FileLog {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            warn!(path = %self.path.display(), "Failed to flush receive file: {}", e);
        }
        info!(
            path = %self.path.display(),
            bytes = self.bytes_written,
            "Receive file closed"
        );
    }
}

/// Where received data goes; exactly one destination is active
#[derive(Debug, Default)]
pub enum OutputSink {
    #[default]
    Display,
    File(FileLog),
}

impl OutputSink {
    pub fn is_file(&self) -> bool {
        matches!(self, OutputSink::File(_))
    }

    pub fn file_path(&self) -> Option<&Path> {
        match self {
            OutputSink::Display => None,
            OutputSink::File(log) => Some(log.path()),
        }
    }
}
