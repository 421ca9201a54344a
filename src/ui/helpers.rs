//! Shared rendering utilities.
//!
//! Fuzzy match highlighting works on character indices, not byte indices, so
//! names with multi-byte characters highlight correctly.

use ratatui::style::Style;
use ratatui::text::Span;

/// Formats an integer with `,` thousands separators.
///
/// ```
/// use conda_browse::ui::helpers::group_thousands;
///
/// assert_eq!(group_thousands(0), "0");
/// assert_eq!(group_thousands(1_234_567), "1,234,567");
/// ```
#[must_use]
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Splits `text` into spans, styling the characters at `positions` with
/// `highlight` and everything else with `base`.
///
/// `positions` must be sorted; out-of-range positions are ignored.
#[must_use]
pub fn highlighted_spans(text: &str, positions: &[usize], base: Style, highlight: Style) -> Vec<Span<'static>> {
    if positions.is_empty() {
        return vec![Span::styled(text.to_string(), base)];
    }

    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_highlighted = false;
    let mut next = positions.iter().peekable();

    for (index, ch) in text.chars().enumerate() {
        let highlighted = next.peek().is_some_and(|&&position| position == index);
        if highlighted {
            next.next();
        }
        if highlighted != run_highlighted && !run.is_empty() {
            let style = if run_highlighted { highlight } else { base };
            spans.push(Span::styled(std::mem::take(&mut run), style));
        }
        run_highlighted = highlighted;
        run.push(ch);
    }

    if !run.is_empty() {
        let style = if run_highlighted { highlight } else { base };
        spans.push(Span::styled(run, style));
    }
    spans
}

/// Shortens `text` to at most `width` characters, ending with `…` when cut.
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(width - 1).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::{Color, Modifier};

    #[test]
    fn groups_digits() {
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(12_345), "12,345");
    }

    #[test]
    fn highlights_matched_characters() {
        let base = Style::default();
        let highlight = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

        let spans = highlighted_spans("numpy", &[0, 1, 3], base, highlight);
        let parts: Vec<(&str, Style)> = spans.iter().map(|span| (span.content.as_ref(), span.style)).collect();

        assert_eq!(
            parts,
            vec![("nu", highlight), ("m", base), ("p", highlight), ("y", base)]
        );
    }

    #[test]
    fn highlight_uses_character_indices() {
        let highlight = Style::default().fg(Color::Red);
        let spans = highlighted_spans("ünï", &[2], Style::default(), highlight);

        assert_eq!(spans.len(), 2);
        assert_eq!(spans[1].content, "ï");
        assert_eq!(spans[1].style, highlight);
    }

    #[test]
    fn truncates_with_ellipsis() {
        assert_eq!(truncate("python", 10), "python");
        assert_eq!(truncate("python", 4), "pyt…");
        assert_eq!(truncate("python", 0), "");
    }
}
