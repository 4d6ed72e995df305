use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use crate::core::console::Console;

use super::{
    state::AppState,
    widgets::{
        help::render_help_popup,
        log::render_log_panel,
        notice::render_notice_popup,
        settings::render_settings_bar,
        status::{render_input_box, render_status_bar},
    },
};

pub fn draw_ui(f: &mut Frame, state: &mut AppState, console: &Console) {
    let size = f.size();
    state.terminal_size = (size.width, size.height);

    // Main layout
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Port and display settings
            Constraint::Min(3),    // Receive log
            Constraint::Length(3), // Input line
            Constraint::Length(1), // Status bar
        ])
        .split(size);

    render_settings_bar(f, chunks[0], state, console);
    render_log_panel(f, chunks[1], console);
    render_input_box(f, chunks[2], state);
    render_status_bar(f, chunks[3], state, console);

    if state.show_help {
        render_help_popup(f, size);
    }

    if let Some(notice) = state.active_notice() {
        render_notice_popup(f, size, notice, state.modal_notices.len());
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
