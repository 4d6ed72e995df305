use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, warn};

use crate::{
    core::console::{Console, Notice, UiCommand},
    domain::error::{SerialComError, SerialComResult},
    infrastructure::serial::scan_ports,
};

use super::{
    event::{AppEvent, EventHandler},
    state::AppState,
    ui::draw_ui,
};

pub struct App {
    console: Console,
    state: AppState,
    events: EventHandler,
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    should_quit: bool,
    tick_rate: Duration,
}

fn tui_error(e: io::Error) -> SerialComError {
    SerialComError::Tui(e.to_string())
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Undo whatever part of `setup_terminal` ran
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

impl App {
    pub fn new(console: Console) -> SerialComResult<Self> {
        let ports = match scan_ports() {
            Ok(ports) => ports,
            Err(e) => {
                warn!("{}", e);
                Vec::new()
            }
        };
        let mut app_state = AppState::new(ports);

        let terminal = setup_terminal().map_err(|e| {
            restore_terminal();
            tui_error(e)
        })?;

        let current = console.selection().port_name.clone();
        let ports = std::mem::take(&mut app_state.ports);
        app_state.set_ports(ports, current.as_deref());

        let mut app = Self {
            console,
            state: app_state,
            events: EventHandler::new(),
            terminal,
            should_quit: false,
            tick_rate: Duration::from_millis(20),
        };
        if current.is_none() {
            app.sync_selected_port();
        }
        Ok(app)
    }

    pub async fn run(&mut self) -> SerialComResult<()> {
        loop {
            // Handle input
            if event::poll(self.tick_rate).map_err(tui_error)? {
                match event::read().map_err(tui_error)? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if let Some(app_event) =
                            self.events.handle_key_event(key, &mut self.state, &self.console)
                        {
                            self.apply(app_event);
                        }
                    }
                    Event::Resize(width, height) => {
                        self.state.terminal_size = (width, height);
                    }
                    _ => {}
                }
            }

            // Serial data and errors
            self.console.pump();
            for notice in self.console.take_notices() {
                self.state.push_notice(notice);
            }

            // Draw UI
            let (state, console) = (&mut self.state, &self.console);
            self.terminal
                .draw(|f| draw_ui(f, state, console))
                .map_err(tui_error)?;

            if self.should_quit {
                break;
            }
            tokio::task::yield_now().await;
        }

        Ok(())
    }

    fn apply(&mut self, app_event: AppEvent) {
        debug!(?app_event, "Handling TUI event");
        match app_event {
            AppEvent::Quit => self.should_quit = true,
            AppEvent::Command(command) => {
                let toggles_port = command == UiCommand::TogglePort;
                self.state.clear_status_message();
                self.console.dispatch(command);
                if toggles_port {
                    let message = match self.console.session().config() {
                        Some(port) => format!("Opened {}", port),
                        None => "Port closed".to_string(),
                    };
                    self.state.set_status_message(message);
                }
            }
            AppEvent::NextPort => {
                self.state.select_next_port();
                self.sync_selected_port();
            }
            AppEvent::PreviousPort => {
                self.state.select_previous_port();
                self.sync_selected_port();
            }
            AppEvent::RescanPorts => self.rescan_ports(),
            AppEvent::NextBaud => {
                if let Some(selection) = self.console.selection_mut() {
                    selection.baud.select_next();
                }
            }
            AppEvent::PreviousBaud => {
                if let Some(selection) = self.console.selection_mut() {
                    selection.baud.select_previous();
                }
            }
            AppEvent::SetCustomBaud(text) => {
                if let Some(selection) = self.console.selection_mut() {
                    if let Err(e) = selection.baud.set_custom_text(text) {
                        self.state.push_notice(Notice::critical("Error", e.to_string()));
                    }
                }
            }
            AppEvent::ReceivePathEntered(text) => self.set_receive_path(text),
            AppEvent::ToggleCr => {
                let options = self.console.send_options_mut();
                options.append_cr = !options.append_cr;
            }
            AppEvent::ToggleLf => {
                let options = self.console.send_options_mut();
                options.append_lf = !options.append_lf;
            }
        }
    }

    /// An existing path goes through file selection; a new one is taken as typed
    fn set_receive_path(&mut self, text: String) {
        let path = PathBuf::from(text.trim());
        if !text.trim().is_empty() && path.exists() {
            self.console.dispatch(UiCommand::SelectReceiveFile(path));
        } else if let Err(e) = self.console.relay_mut().set_receive_path(&text) {
            self.state.push_notice(Notice::critical("Error", e.to_string()));
        }
    }

    fn sync_selected_port(&mut self) {
        let location = self
            .state
            .selected_port()
            .map(|port| port.system_location.clone());
        if let (Some(location), Some(selection)) = (location, self.console.selection_mut()) {
            selection.port_name = Some(location);
        }
    }

    fn rescan_ports(&mut self) {
        match scan_ports() {
            Ok(ports) => {
                let count = ports.len();
                let current = self.console.selection().port_name.clone();
                self.state.set_ports(ports, current.as_deref());
                self.sync_selected_port();
                self.state
                    .set_status_message(format!("Found {} serial port(s)", count));
            }
            Err(e) => self.state.push_notice(Notice::critical("Error", e.to_string())),
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.console.shutdown();

        // Restore terminal
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}
