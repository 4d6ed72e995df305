use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::tui::ui::centered_rect;

pub fn render_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(70, 80, area);

    // Clear the background
    f.render_widget(Clear, popup_area);

    let help_content = vec![
        Line::from("SerialCom - Key Bindings"),
        Line::from(""),
        Line::from("Port:"),
        Line::from("  o        - Open / close the selected port"),
        Line::from("  p / P    - Next / previous port"),
        Line::from("  R        - Rescan ports"),
        Line::from("  b / B    - Next / previous baud rate"),
        Line::from("  e        - Edit custom baud rate"),
        Line::from(""),
        Line::from("Receive:"),
        Line::from("  x        - Toggle hex display (clears the log)"),
        Line::from("  c        - Clear the log"),
        Line::from("  r        - Set receive file"),
        Line::from("  f        - Toggle writing received data to the receive file"),
        Line::from("  s        - Save the log to the receive file"),
        Line::from(""),
        Line::from("Send:"),
        Line::from("  i / Enter - Type a message (Enter sends, Esc leaves)"),
        Line::from("  1 / 2    - Toggle appending CR / LF"),
        Line::from(""),
        Line::from("  h        - Toggle help"),
        Line::from("  q / Esc  - Quit"),
    ];

    let help = Paragraph::new(help_content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(ratatui::widgets::Wrap { trim: true });

    f.render_widget(help, popup_area);
}
