use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serialcom::core::communication::encode_hex_spaced;
use serialcom::domain::config::{BaudRateSelector, BAUD_RATE_ITEMS};
use serialcom::{
    Connector, Console, DataRelay, PortConfig, Route, SerialComConfig, SerialComError,
    SerialComResult, SessionController, SessionState, Severity, Transport, TransportFault,
    UiCommand,
};
use tempfile::TempDir;

/// Loopback line shared between a test and the transport it hands out
#[derive(Default)]
struct Wire {
    inbound: VecDeque<Result<Vec<u8>, TransportFault>>,
    written: Vec<u8>,
    open_handles: usize,
}

type SharedWire = Arc<Mutex<Wire>>;

struct WireConnector {
    wire: SharedWire,
}

struct WireTransport {
    wire: SharedWire,
}

impl Connector for WireConnector {
    fn connect(&self, _config: &PortConfig) -> SerialComResult<Box<dyn Transport>> {
        self.wire.lock().unwrap().open_handles += 1;
        Ok(Box::new(WireTransport {
            wire: Arc::clone(&self.wire),
        }))
    }
}

impl Transport for WireTransport {
    fn poll_read(&mut self) -> Result<Option<Vec<u8>>, TransportFault> {
        match self.wire.lock().unwrap().inbound.pop_front() {
            Some(Ok(bytes)) => Ok(Some(bytes)),
            Some(Err(fault)) => Err(fault),
            None => Ok(None),
        }
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportFault> {
        self.wire.lock().unwrap().written.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TransportFault> {
        Ok(())
    }
}

impl Drop for WireTransport {
    fn drop(&mut self) {
        self.wire.lock().unwrap().open_handles -= 1;
    }
}

fn console(configure: impl FnOnce(&mut SerialComConfig)) -> (Console, SharedWire) {
    let wire = SharedWire::default();
    let mut config = SerialComConfig::default();
    config.port.name = Some("/dev/ttyLOOP0".to_string());
    configure(&mut config);
    let console = Console::new(
        &config,
        Box::new(WireConnector {
            wire: Arc::clone(&wire),
        }),
    );
    (console, wire)
}

#[test]
fn test_send_hi_with_cr() {
    let (mut console, wire) = console(|config| {
        config.display.append_cr = true;
        config.display.append_lf = false;
    });
    console.dispatch(UiCommand::TogglePort);
    console.dispatch(UiCommand::SendMessage("hi".to_string()));

    assert!(console.take_notices().is_empty());
    assert_eq!(wire.lock().unwrap().written, b"hi\r");
}

#[test]
fn test_hex_receive_lands_on_display() {
    let (mut console, wire) = console(|config| config.display.hex_display = true);
    console.toggle_port().unwrap();
    wire.lock().unwrap().inbound.push_back(Ok(vec![0x41, 0x42]));

    assert_eq!(console.pump(), 1);
    assert!(console.relay().display().as_str().ends_with("41 42"));
}

#[test]
fn test_open_close_close() {
    let wire = SharedWire::default();
    let mut session = SessionController::new(Box::new(WireConnector {
        wire: Arc::clone(&wire),
    }));

    session.open(PortConfig::new("/dev/ttyLOOP0", 115_200)).unwrap();
    assert_eq!(session.state(), SessionState::Open);
    assert_eq!(wire.lock().unwrap().open_handles, 1);

    assert!(session.close());
    assert_eq!(session.state(), SessionState::Closed);
    assert_eq!(wire.lock().unwrap().open_handles, 0);
    assert!(!session.close());
}

#[test]
fn test_unwritable_receive_file_rolls_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("rx.log");
    let mut relay = DataRelay::new(false, Some(path));

    let err = relay.toggle_file_output().unwrap_err();
    assert!(matches!(err, SerialComError::FileOpen { .. }));
    assert!(!relay.is_logging_to_file());
    assert_eq!(relay.on_data_received(b"ok"), Route::Display);
}

#[test]
fn test_baud_rate_items() {
    let labels = BaudRateSelector::labels();
    assert_eq!(
        labels,
        vec!["460800", "2008000", "250000", "128000", "115200", "76800", "57600", "38400", "custom"]
    );

    let mut selector = BaudRateSelector::new();
    assert_eq!(selector.text(), "460800");
    assert!(!selector.is_editable());

    selector.select(BAUD_RATE_ITEMS.len() - 1);
    assert!(selector.is_editable());
    assert_eq!(selector.text(), "");
}

#[test]
fn test_toggle_hex_clears_display() {
    let (mut console, wire) = console(|_| {});
    console.toggle_port().unwrap();
    wire.lock().unwrap().inbound.push_back(Ok(b"hello".to_vec()));
    console.pump();
    assert_eq!(console.relay().display().as_str(), "hello");

    console.dispatch(UiCommand::ToggleHexDisplay);
    assert!(console.relay().display().is_empty());
    assert!(console.relay().hex_display());
}

#[test]
fn test_device_loss_closes_session() {
    let (mut console, wire) = console(|_| {});
    console.toggle_port().unwrap();
    wire.lock()
        .unwrap()
        .inbound
        .push_back(Err(TransportFault::resource("device unplugged")));

    console.pump();
    assert!(!console.session().is_open());
    assert_eq!(wire.lock().unwrap().open_handles, 0);

    let notices = console.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Critical);
}

#[test]
fn test_receive_to_file_and_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rx.log");
    let (mut console, wire) = console(|config| config.display.receive_file = Some(path.clone()));

    console.toggle_port().unwrap();
    console.dispatch(UiCommand::ToggleFileOutput);
    assert!(console.relay().is_logging_to_file());
    assert!(console.relay().display().as_str().contains("rx.log"));

    wire.lock().unwrap().inbound.push_back(Ok(vec![0x01, 0xFF]));
    console.pump();

    console.dispatch(UiCommand::ToggleFileOutput);
    assert!(!console.relay().is_logging_to_file());
    assert!(console.relay().display().is_empty());
    assert_eq!(std::fs::read(&path).unwrap(), vec![0x01, 0xEF, 0xBF, 0xBD]);
}

#[test]
fn test_save_log_writes_display() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved.txt");
    let (mut console, wire) = console(|config| config.display.receive_file = Some(path.clone()));

    console.toggle_port().unwrap();
    wire.lock().unwrap().inbound.push_back(Ok(b"line one\n".to_vec()));
    console.pump();
    console.dispatch(UiCommand::SaveLog);

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "line one\n");
    let notices = console.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Info);
}

#[test]
fn test_hex_length_matches_formula() {
    for len in 1..=32usize {
        let bytes: Vec<u8> = (0..len as u8).collect();
        assert_eq!(encode_hex_spaced(&bytes).len(), 3 * len - 1);
    }
}
