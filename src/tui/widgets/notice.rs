use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::core::console::Notice;
use crate::tui::ui::centered_rect;

/// Modal popup for a critical notice; any key dismisses it
pub fn render_notice_popup(f: &mut Frame, area: Rect, notice: &Notice, pending: usize) {
    let popup_area = centered_rect(60, 30, area);
    f.render_widget(Clear, popup_area);

    let mut lines = vec![
        Line::from(notice.message.as_str()),
        Line::from(""),
        Line::from("Press any key to continue"),
    ];
    if pending > 1 {
        lines.push(Line::from(format!("({} more)", pending - 1)));
    }

    let popup = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(
                    notice.title.as_str(),
                    Style::default().add_modifier(Modifier::BOLD),
                ))
                .border_style(Style::default().fg(Color::Red)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(popup, popup_area);
}
