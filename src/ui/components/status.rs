//! Status box below the list.

use crate::ui::theme::Theme;
use ratatui::layout::Rect;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_status(frame: &mut Frame, area: Rect, status: &str, theme: &Theme) {
    let block = Block::default().borders(Borders::ALL).border_style(theme.border());
    let paragraph = Paragraph::new(status.to_string())
        .style(theme.text_dim())
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
