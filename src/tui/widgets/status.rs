use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::core::console::Console;
use crate::tui::state::{AppState, InputTarget};

pub fn render_input_box(f: &mut Frame, area: Rect, state: &AppState) {
    let (title, style) = match state.input_target {
        Some(target) => (
            format!("{} (Enter: confirm, Esc: cancel)", target),
            Style::default().fg(Color::Yellow),
        ),
        None => ("Send (press i to type)".to_string(), Style::default().fg(Color::Gray)),
    };

    let content = if state.input.is_empty() && state.is_editing() {
        Span::styled(input_hint(state.input_target), Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(state.input.content(), style)
    };
    let input = Paragraph::new(Line::from(content))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(input, area);

    if state.is_editing() {
        let cursor_x = area.x + 1 + state.input.cursor_position() as u16;
        f.set_cursor(cursor_x.min(area.right().saturating_sub(2)), area.y + 1);
    }
}

pub fn render_status_bar(f: &mut Frame, area: Rect, state: &AppState, console: &Console) {
    let status_text = if let Some(message) = &state.status_message {
        message.clone()
    } else {
        let stats = console.session().statistics();
        format!(
            "Session: {} | Sent: {} B | Received: {} B | Help: h | Quit: q",
            console.session().state(),
            stats.bytes_sent,
            stats.bytes_received
        )
    };

    let status_style = if state.status_message.is_some() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };

    let status = Paragraph::new(Line::from(vec![Span::styled(status_text, status_style)]));
    f.render_widget(status, area);
}

/// Placeholder shown in an empty input line
fn input_hint(target: Option<InputTarget>) -> &'static str {
    match target {
        Some(InputTarget::Message) => "Type a message and press Enter to send",
        Some(InputTarget::ReceiveFile) => "Path of the file received data is written to",
        Some(InputTarget::CustomBaud) => "Baud rate in bits per second",
        None => "",
    }
}
