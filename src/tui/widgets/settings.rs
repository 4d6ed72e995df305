use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::core::console::Console;
use crate::domain::config::{Parity, PortSelection};
use crate::infrastructure::serial::ports::BLANK;
use crate::tui::state::AppState;

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

fn line_settings(selection: &PortSelection) -> String {
    let parity = match selection.parity {
        Parity::None => 'N',
        Parity::Odd => 'O',
        Parity::Even => 'E',
    };
    format!(
        "{}{}{} flow {}",
        u8::from(selection.data_bits),
        parity,
        u8::from(selection.stop_bits),
        selection.flow_control
    )
}

pub fn render_settings_bar(f: &mut Frame, area: Rect, state: &AppState, console: &Console) {
    let selection = console.selection();
    let open = console.session().is_open();

    let port_label = match state.selected_port() {
        Some(port) if selection.port_name.as_deref() == Some(port.system_location.as_str()) => {
            format!("{} ({})", port.port_name, port.description)
        }
        _ => selection.port_name.clone().unwrap_or_else(|| BLANK.to_string()),
    };
    let baud_label = match selection.baud.text() {
        text if text.is_empty() => "custom: <type with e>".to_string(),
        text if selection.baud.is_editable() => format!("custom: {}", text),
        text => text,
    };

    let (state_label, state_style) = if open {
        ("OPEN", Style::default().fg(Color::Black).bg(Color::Green))
    } else {
        ("CLOSED", Style::default().fg(Color::White).bg(Color::DarkGray))
    };

    let relay = console.relay();
    let send_options = console.send_options();
    let receive_file = relay
        .receive_path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| BLANK.to_string());

    let lines = vec![
        Line::from(vec![
            Span::styled(format!(" {} ", state_label), state_style.add_modifier(Modifier::BOLD)),
            Span::raw(format!(" Port: {}", port_label)),
            Span::raw(format!(" | Baud: {}", baud_label)),
            Span::raw(format!(" | {}", line_settings(selection))),
        ]),
        Line::from(vec![
            Span::raw(format!(
                "Display: {}",
                if relay.hex_display() { "HEX" } else { "TEXT" }
            )),
            Span::raw(format!(
                " | CR: {} LF: {}",
                on_off(send_options.append_cr),
                on_off(send_options.append_lf)
            )),
            Span::styled(
                format!(
                    " | Output: {}",
                    if relay.is_logging_to_file() { "file" } else { "screen" }
                ),
                if relay.is_logging_to_file() {
                    Style::default().fg(Color::Magenta)
                } else {
                    Style::default()
                },
            ),
            Span::raw(format!(" | Receive file: {}", receive_file)),
        ]),
    ];

    let settings = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("SerialCom")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(settings, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{DataBits, FlowControl, StopBits};

    #[test]
    fn test_line_settings_summary() {
        let mut selection = PortSelection::default();
        assert_eq!(line_settings(&selection), "8N1 flow none");

        selection.data_bits = DataBits::Seven;
        selection.parity = Parity::Even;
        selection.stop_bits = StopBits::Two;
        selection.flow_control = FlowControl::Hardware;
        assert_eq!(line_settings(&selection), "7E2 flow rts/cts");
    }
}
