//! Indicator line above the list: channel, platforms, filter and download.

use crate::ui::theme::Theme;
use crate::ui::viewmodel::Indicator;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

const SEPARATOR: &str = " │ ";
const CURSOR: &str = "▏";

fn spans(indicator: &Indicator, theme: &Theme) -> Vec<Span<'static>> {
    match indicator {
        Indicator::Channel(channel) => vec![Span::styled(channel.clone(), theme.indicator())],
        Indicator::ChannelDraft(draft) => vec![
            Span::styled("channel: ", theme.text_dim()),
            Span::styled(draft.clone(), theme.text().add_modifier(Modifier::BOLD)),
            Span::styled(CURSOR, theme.border_focused()),
        ],
        Indicator::Platforms(summary) => vec![Span::styled(summary.clone(), theme.indicator())],
        Indicator::Filter(query) => vec![
            Span::styled("/", theme.text_dim()),
            Span::styled(query.clone(), theme.match_highlight()),
            Span::styled(CURSOR, theme.border_focused()),
        ],
        Indicator::Download(file_name) => vec![Span::styled(format!("⇣ {file_name}"), theme.indicator())],
    }
}

/// Renders the indicators on one line, separated by thin bars.
pub fn render_indicators(frame: &mut Frame, area: Rect, indicators: &[Indicator], theme: &Theme) {
    let mut line = vec![Span::raw(" ")];
    for (index, indicator) in indicators.iter().enumerate() {
        if index > 0 {
            line.push(Span::styled(SEPARATOR, theme.border()));
        }
        line.extend(spans(indicator, theme));
    }
    frame.render_widget(Paragraph::new(Line::from(line)), area);
}
