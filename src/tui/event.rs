use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::console::{Console, UiCommand};

use super::state::{AppState, InputTarget};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    Command(UiCommand),
    NextPort,
    PreviousPort,
    RescanPorts,
    NextBaud,
    PreviousBaud,
    SetCustomBaud(String),
    /// Free-typed receive-file path
    ReceivePathEntered(String),
    ToggleCr,
    ToggleLf,
}

/// Maps key presses to application events. Pure apart from `AppState`.
pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(
        &self,
        key: KeyEvent,
        state: &mut AppState,
        console: &Console,
    ) -> Option<AppEvent> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(AppEvent::Quit);
        }

        // Any key acknowledges a popup
        if state.active_notice().is_some() {
            state.dismiss_notice();
            return None;
        }

        if state.is_editing() {
            return self.handle_input_mode(key, state);
        }

        if state.show_help {
            if matches!(key.code, KeyCode::Char('h') | KeyCode::Esc) {
                state.toggle_help();
            }
            return None;
        }

        let open = console.session().is_open();
        let locked = console.relay().controls_locked();

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(AppEvent::Quit),
            KeyCode::Char('h') => {
                state.toggle_help();
                None
            }
            KeyCode::Char('o') => Some(AppEvent::Command(UiCommand::TogglePort)),
            KeyCode::Char('x') => Some(AppEvent::Command(UiCommand::ToggleHexDisplay)),
            KeyCode::Char('f') => Some(AppEvent::Command(UiCommand::ToggleFileOutput)),
            KeyCode::Char('c') => Some(AppEvent::Command(UiCommand::ClearLog)),
            KeyCode::Char('s') if locked => {
                state.set_status_message("Saving is disabled while logging to file");
                None
            }
            KeyCode::Char('s') => Some(AppEvent::Command(UiCommand::SaveLog)),
            KeyCode::Char('i') | KeyCode::Enter => {
                state.begin_input(InputTarget::Message, "");
                None
            }
            KeyCode::Char('r') if locked => {
                state.set_status_message("Receive file cannot change while logging to file");
                None
            }
            KeyCode::Char('r') => {
                let current = console
                    .relay()
                    .receive_path()
                    .map(|path| path.display().to_string())
                    .unwrap_or_default();
                state.begin_input(InputTarget::ReceiveFile, current);
                None
            }
            KeyCode::Char('1') => Some(AppEvent::ToggleCr),
            KeyCode::Char('2') => Some(AppEvent::ToggleLf),
            KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char('R')
            | KeyCode::Char('b') | KeyCode::Char('B') | KeyCode::Char('e')
                if open =>
            {
                state.set_status_message("Close the port to change its settings");
                None
            }
            KeyCode::Char('p') => Some(AppEvent::NextPort),
            KeyCode::Char('P') => Some(AppEvent::PreviousPort),
            KeyCode::Char('R') => Some(AppEvent::RescanPorts),
            KeyCode::Char('b') => Some(AppEvent::NextBaud),
            KeyCode::Char('B') => Some(AppEvent::PreviousBaud),
            KeyCode::Char('e') if console.selection().baud.is_editable() => {
                state.begin_input(InputTarget::CustomBaud, console.selection().baud.text());
                None
            }
            KeyCode::Char('e') => {
                state.set_status_message("Select 'custom' baud rate first");
                None
            }
            _ => None,
        }
    }

    fn handle_input_mode(&self, key: KeyEvent, state: &mut AppState) -> Option<AppEvent> {
        match key.code {
            KeyCode::Esc => {
                state.end_input();
                None
            }
            KeyCode::Enter => match state.input_target {
                // The send line stays open for the next message
                Some(InputTarget::Message) => {
                    let text = state.input.take();
                    Some(AppEvent::Command(UiCommand::SendMessage(text)))
                }
                Some(InputTarget::ReceiveFile) => {
                    Some(AppEvent::ReceivePathEntered(state.end_input()))
                }
                Some(InputTarget::CustomBaud) => Some(AppEvent::SetCustomBaud(state.end_input())),
                None => None,
            },
            _ => {
                state.input.handle_key(key);
                None
            }
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::console::Notice;
    use crate::core::testing::MockConnector;
    use crate::domain::config::{SerialComConfig, BAUD_RATE_ITEMS};
    use tempfile::TempDir;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn code(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn setup() -> (EventHandler, AppState, Console) {
        let (connector, _line) = MockConnector::new();
        let mut config = SerialComConfig::default();
        config.port.name = Some("/dev/ttyMOCK0".to_string());
        let console = Console::new(&config, Box::new(connector));
        (EventHandler::new(), AppState::new(Vec::new()), console)
    }

    #[test]
    fn test_command_keys() {
        let (handler, mut state, console) = setup();
        let expected = [
            ('o', UiCommand::TogglePort),
            ('x', UiCommand::ToggleHexDisplay),
            ('f', UiCommand::ToggleFileOutput),
            ('c', UiCommand::ClearLog),
            ('s', UiCommand::SaveLog),
        ];
        for (c, command) in expected {
            assert_eq!(
                handler.handle_key_event(key(c), &mut state, &console),
                Some(AppEvent::Command(command))
            );
        }
        assert_eq!(
            handler.handle_key_event(key('q'), &mut state, &console),
            Some(AppEvent::Quit)
        );
    }

    #[test]
    fn test_send_line_stays_open() {
        let (handler, mut state, console) = setup();
        handler.handle_key_event(key('i'), &mut state, &console);
        for c in "hi".chars() {
            assert_eq!(handler.handle_key_event(key(c), &mut state, &console), None);
        }

        let event = handler.handle_key_event(code(KeyCode::Enter), &mut state, &console);
        assert_eq!(
            event,
            Some(AppEvent::Command(UiCommand::SendMessage("hi".to_string())))
        );
        assert_eq!(state.input_target, Some(InputTarget::Message));
        assert!(state.input.is_empty());

        handler.handle_key_event(code(KeyCode::Esc), &mut state, &console);
        assert!(!state.is_editing());
    }

    #[test]
    fn test_letters_in_input_do_not_trigger_commands() {
        let (handler, mut state, console) = setup();
        handler.handle_key_event(key('i'), &mut state, &console);
        assert_eq!(handler.handle_key_event(key('q'), &mut state, &console), None);
        assert_eq!(state.input.content(), "q");
    }

    #[test]
    fn test_popup_swallows_next_key() {
        let (handler, mut state, console) = setup();
        state.push_notice(Notice::critical("Error", "boom"));
        assert_eq!(handler.handle_key_event(key('q'), &mut state, &console), None);
        assert!(state.active_notice().is_none());
        assert_eq!(
            handler.handle_key_event(key('q'), &mut state, &console),
            Some(AppEvent::Quit)
        );
    }

    #[test]
    fn test_port_settings_locked_while_open() {
        let (handler, mut state, mut console) = setup();
        assert_eq!(
            handler.handle_key_event(key('b'), &mut state, &console),
            Some(AppEvent::NextBaud)
        );

        console.toggle_port().unwrap();
        assert_eq!(handler.handle_key_event(key('b'), &mut state, &console), None);
        assert_eq!(handler.handle_key_event(key('p'), &mut state, &console), None);
        assert!(state.status_message.unwrap().contains("Close the port"));
    }

    #[test]
    fn test_custom_baud_requires_custom_item() {
        let (handler, mut state, mut console) = setup();
        handler.handle_key_event(key('e'), &mut state, &console);
        assert!(!state.is_editing());

        if let Some(selection) = console.selection_mut() {
            selection.baud.select(BAUD_RATE_ITEMS.len() - 1);
        }
        handler.handle_key_event(key('e'), &mut state, &console);
        assert_eq!(state.input_target, Some(InputTarget::CustomBaud));
        for c in "9600".chars() {
            handler.handle_key_event(key(c), &mut state, &console);
        }
        assert_eq!(
            handler.handle_key_event(code(KeyCode::Enter), &mut state, &console),
            Some(AppEvent::SetCustomBaud("9600".to_string()))
        );
    }

    #[test]
    fn test_file_controls_locked_while_logging() {
        let (handler, mut state, mut console) = setup();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rx.log");
        console
            .relay_mut()
            .set_receive_path(path.to_str().unwrap())
            .unwrap();

        handler.handle_key_event(key('r'), &mut state, &console);
        assert_eq!(state.input.content(), path.to_str().unwrap());
        assert_eq!(
            handler.handle_key_event(code(KeyCode::Enter), &mut state, &console),
            Some(AppEvent::ReceivePathEntered(path.to_str().unwrap().to_string()))
        );

        console.toggle_file_output().unwrap();
        assert_eq!(handler.handle_key_event(key('s'), &mut state, &console), None);
        assert_eq!(handler.handle_key_event(key('r'), &mut state, &console), None);
        assert!(!state.is_editing());
        assert_eq!(
            handler.handle_key_event(key('f'), &mut state, &console),
            Some(AppEvent::Command(UiCommand::ToggleFileOutput))
        );
    }
}
