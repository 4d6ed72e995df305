use std::collections::VecDeque;

use crate::{core::console::Notice, infrastructure::serial::PortListing};

use super::input::InputBuffer;

/// What the input line is currently editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTarget {
    Message,
    ReceiveFile,
    CustomBaud,
}

impl std::fmt::Display for InputTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputTarget::Message => write!(f, "Send"),
            InputTarget::ReceiveFile => write!(f, "Receive file"),
            InputTarget::CustomBaud => write!(f, "Custom baud"),
        }
    }
}

#[derive(Debug)]
pub struct AppState {
    pub ports: Vec<PortListing>,
    pub port_index: Option<usize>,
    pub input: InputBuffer,
    /// `None` while not editing
    pub input_target: Option<InputTarget>,
    pub terminal_size: (u16, u16),
    pub status_message: Option<String>,
    pub show_help: bool,
    /// Critical notices waiting to be acknowledged, oldest first
    pub modal_notices: VecDeque<Notice>,
}

impl AppState {
    pub fn new(ports: Vec<PortListing>) -> Self {
        let port_index = if ports.is_empty() { None } else { Some(0) };
        Self {
            ports,
            port_index,
            input: InputBuffer::new(),
            input_target: None,
            terminal_size: (80, 24),
            status_message: Some("Welcome to SerialCom! Press 'h' for help.".to_string()),
            show_help: false,
            modal_notices: VecDeque::new(),
        }
    }

    pub fn selected_port(&self) -> Option<&PortListing> {
        self.port_index.and_then(|index| self.ports.get(index))
    }

    pub fn select_next_port(&mut self) -> Option<&PortListing> {
        if !self.ports.is_empty() {
            self.port_index = Some(match self.port_index {
                Some(index) => (index + 1) % self.ports.len(),
                None => 0,
            });
        }
        self.selected_port()
    }

    pub fn select_previous_port(&mut self) -> Option<&PortListing> {
        if !self.ports.is_empty() {
            let len = self.ports.len();
            self.port_index = Some(match self.port_index {
                Some(index) => (index + len - 1) % len,
                None => len - 1,
            });
        }
        self.selected_port()
    }

    /// Replace the port list, keeping `current` selected when it is still there
    pub fn set_ports(&mut self, ports: Vec<PortListing>, current: Option<&str>) {
        self.port_index = current
            .and_then(|location| ports.iter().position(|p| p.system_location == location))
            .or(if ports.is_empty() { None } else { Some(0) });
        self.ports = ports;
    }

    pub fn begin_input(&mut self, target: InputTarget, initial: impl Into<String>) {
        self.input.set(initial);
        self.input_target = Some(target);
    }

    pub fn end_input(&mut self) -> String {
        self.input_target = None;
        self.input.take()
    }

    pub fn is_editing(&self) -> bool {
        self.input_target.is_some()
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status_message(&mut self) {
        self.status_message = None;
    }

    /// Critical notices become popups; the rest go to the status bar
    pub fn push_notice(&mut self, notice: Notice) {
        if notice.is_modal() {
            self.modal_notices.push_back(notice);
        } else {
            self.status_message = Some(notice.to_string());
        }
    }

    pub fn active_notice(&self) -> Option<&Notice> {
        self.modal_notices.front()
    }

    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.modal_notices.pop_front()
    }
}
