//! Footer component renderer.
//!
//! Renders the key hints centered on the bottom row with dimmed styling.

use crate::ui::helpers::truncate;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FooterInfo;
use ratatui::layout::{Alignment, Rect};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Renders the footer into `area`. Hints wider than the terminal are cut so the
/// line never wraps.
pub fn render_footer(frame: &mut Frame, area: Rect, footer: &FooterInfo, theme: &Theme) {
    let text = truncate(&footer.keybindings, usize::from(area.width));
    let paragraph = Paragraph::new(text).style(theme.text_dim()).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
