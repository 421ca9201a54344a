//! Notification overlay in the top-right corner of the detail pane.

use crate::app::{Notification, Severity};
use crate::ui::theme::Theme;
use ratatui::layout::Rect;
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

const MAX_WIDTH: u16 = 48;
const HEIGHT: u16 = 5;

/// Area of the overlay inside `detail`, or `None` when the pane is too small.
#[must_use]
pub fn overlay_area(detail: Rect) -> Option<Rect> {
    let width = MAX_WIDTH.min(detail.width.saturating_sub(2));
    if width < 10 || detail.height < HEIGHT + 2 {
        return None;
    }
    Some(Rect {
        x: detail.x + detail.width - width - 1,
        y: detail.y + 1,
        width,
        height: HEIGHT,
    })
}

const fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Information => "info",
        Severity::Warning => "warning",
        Severity::Error => "error",
    }
}

pub fn render_notification(frame: &mut Frame, detail: Rect, notification: &Notification, theme: &Theme) {
    let Some(area) = overlay_area(detail) else {
        return;
    };
    let style = theme.severity(notification.severity);
    let title = format!(" {} · {} ", notification.title, severity_label(notification.severity));

    let block = Block::default()
        .title(Span::styled(title, style))
        .borders(Borders::ALL)
        .border_style(style);
    let paragraph = Paragraph::new(notification.message.clone())
        .style(theme.text())
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}
