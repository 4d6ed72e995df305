use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::core::console::Console;

/// Wrap `text` at `width` columns and keep the last `height` rows.
///
/// Only the end of the text is examined, so a huge log costs the same as a
/// screenful.
pub fn visible_tail(text: &str, width: usize, height: usize) -> Vec<String> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let budget = width * height * 4;
    let mut start = text.len().saturating_sub(budget);
    while !text.is_char_boundary(start) {
        start += 1;
    }

    let mut rows: Vec<String> = Vec::new();
    for line in text[start..].lines() {
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            rows.push(String::new());
            continue;
        }
        rows.extend(chars.chunks(width).map(|chunk| chunk.iter().collect()));
    }

    let skip = rows.len().saturating_sub(height);
    rows.split_off(skip)
}

pub fn render_log_panel(f: &mut Frame, area: Rect, console: &Console) {
    let relay = console.relay();
    let title = match relay.sink().file_path() {
        Some(path) => format!("Receive [file: {}]", path.display()),
        None if relay.hex_display() => "Receive [hex]".to_string(),
        None => "Receive".to_string(),
    };

    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = visible_tail(relay.display().as_str(), inner_width, inner_height)
        .into_iter()
        .map(Line::from)
        .collect();

    let border_color = if relay.is_logging_to_file() {
        Color::Magenta
    } else {
        Color::Green
    };

    let log = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(border_color)),
    );
    f.render_widget(log, area);
}
