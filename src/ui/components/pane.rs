//! Detail pane renderer.
//!
//! The detail text is plain text produced by [`crate::ui::detail`]. The `# title`
//! heading, section labels (`Dependencies:`) and box edges get styled here; all
//! other lines are drawn as-is.

use crate::ui::theme::Theme;
use crate::ui::viewmodel::DetailInfo;
use ratatui::layout::{Margin, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

/// `Dependencies:` or `Other Versions (3):`, but not `Name: value` rows.
fn is_section_label(line: &str) -> bool {
    line.ends_with(':') && line.chars().next().is_some_and(char::is_alphabetic) && line.matches(':').count() == 1
}

fn styled_line(line: &str, theme: &Theme) -> Line<'static> {
    if let Some(title) = line.strip_prefix("# ") {
        Line::from(Span::styled(title.to_string(), theme.title()))
    } else if is_section_label(line) {
        Line::from(Span::styled(line.to_string(), theme.section()))
    } else if line.starts_with(['╭', '╰']) {
        Line::from(Span::styled(line.to_string(), theme.border()))
    } else {
        Line::from(Span::styled(line.to_string(), theme.text()))
    }
}

/// Styles the detail text line by line.
#[must_use]
pub fn detail_lines(text: &str, theme: &Theme) -> Vec<Line<'static>> {
    text.lines().map(|line| styled_line(line, theme)).collect()
}

pub fn render_detail(frame: &mut Frame, area: Rect, detail: &DetailInfo, theme: &Theme) {
    let block = Block::default()
        .title(Span::styled(format!(" {} ", detail.title), theme.title()))
        .borders(Borders::ALL)
        .border_style(theme.border());
    let inner = block.inner(area).inner(Margin {
        horizontal: 1,
        vertical: 0,
    });
    frame.render_widget(block, area);

    let paragraph = Paragraph::new(detail_lines(&detail.text, theme)).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_and_sections_are_styled() {
        let theme = Theme::default();
        let lines = detail_lines("# numpy\n\nDependencies:\n - python", &theme);

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].spans[0].content, "numpy");
        assert_eq!(lines[0].spans[0].style, theme.title());
        assert_eq!(lines[2].spans[0].style, theme.section());
        assert_eq!(lines[3].spans[0].content, " - python");
        assert_eq!(lines[3].spans[0].style, theme.text());
    }

    #[test]
    fn value_rows_are_not_section_labels() {
        assert!(is_section_label("Other Versions (3):"));
        assert!(!is_section_label("URL: https://example.org:"));
        assert!(!is_section_label(" - none:"));
    }
}
