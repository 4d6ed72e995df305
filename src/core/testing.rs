// In-memory transport used by unit tests
use crate::core::communication::{Connector, Transport, TransportFault};
use crate::domain::{
    config::PortConfig,
    error::{SerialComError, SerialComResult},
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
pub struct Line {
    pub inbound: VecDeque<Result<Vec<u8>, TransportFault>>,
    pub written: Vec<u8>,
    pub write_fault: Option<TransportFault>,
    pub open: bool,
    pub opened: usize,
    pub flushed: usize,
    pub last_config: Option<PortConfig>,
}

pub type SharedLine = Arc<Mutex<Line>>;

pub struct MockConnector {
    pub line: SharedLine,
    pub refuse: Option<String>,
}

impl MockConnector {
    pub fn new() -> (Self, SharedLine) {
        let line = SharedLine::default();
        (
            Self {
                line: Arc::clone(&line),
                refuse: None,
            },
            line,
        )
    }

    pub fn refusing(message: &str) -> (Self, SharedLine) {
        let (mut connector, line) = Self::new();
        connector.refuse = Some(message.to_string());
        (connector, line)
    }
}

impl Connector for MockConnector {
    fn connect(&self, config: &PortConfig) -> SerialComResult<Box<dyn Transport>> {
        if let Some(message) = &self.refuse {
            return Err(SerialComError::TransportOpen {
                port: config.name.clone(),
                message: message.clone(),
            });
        }
        let mut line = self.line.lock().unwrap();
        line.open = true;
        line.opened += 1;
        line.last_config = Some(config.clone());
        Ok(Box::new(MockTransport {
            line: Arc::clone(&self.line),
        }))
    }
}

struct MockTransport {
    line: SharedLine,
}

impl Transport for MockTransport {
    fn poll_read(&mut self) -> Result<Option<Vec<u8>>, TransportFault> {
        match self.line.lock().unwrap().inbound.pop_front() {
            Some(Ok(bytes)) => Ok(Some(bytes)),
            Some(Err(fault)) => Err(fault),
            None => Ok(None),
        }
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportFault> {
        let mut line = self.line.lock().unwrap();
        if let Some(fault) = line.write_fault.take() {
            return Err(fault);
        }
        line.written.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TransportFault> {
        self.line.lock().unwrap().flushed += 1;
        Ok(())
    }
}

impl Drop for MockTransport {
    fn drop(&mut self) {
        if let Ok(mut line) = self.line.lock() {
            line.open = false;
        }
    }
}
