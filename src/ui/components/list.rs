//! List component renderer.
//!
//! Draws the visible window of the package, version or platform list. The view
//! model already cut the window to the viewport, so the widget never scrolls by
//! itself.

use crate::ui::helpers::highlighted_spans;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{DisplayItem, ListInfo};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

fn item_line(item: &DisplayItem, theme: &Theme) -> Line<'static> {
    match item {
        DisplayItem::Package {
            name,
            highlight_positions,
        } => Line::from(highlighted_spans(
            name,
            highlight_positions,
            theme.text(),
            theme.match_highlight(),
        )),
        DisplayItem::Back => Line::from(Span::styled("← back to packages", theme.text_dim())),
        DisplayItem::Empty => Line::from(Span::styled("no artifacts in selected platforms", theme.text_dim())),
        DisplayItem::Section {
            subdir,
            collapsed,
            count,
        } => {
            let marker = if *collapsed { "▸" } else { "▾" };
            Line::from(vec![
                Span::styled(format!("{marker} {subdir}"), theme.section()),
                Span::styled(format!(" ({count})"), theme.text_dim()),
            ])
        }
        DisplayItem::Entry { version, build } => Line::from(vec![
            Span::styled(format!("   {version}"), theme.text()),
            Span::styled(format!("  {build}"), theme.text_dim()),
        ]),
        DisplayItem::Platform {
            name,
            checked,
            current,
        } => {
            let checkbox = if *checked { "[x]" } else { "[ ]" };
            let mut spans = vec![
                Span::styled(format!("{checkbox} "), theme.indicator()),
                Span::styled(name.clone(), theme.text()),
            ];
            if *current {
                spans.push(Span::styled(" (this machine)", theme.text_dim()));
            }
            Line::from(spans)
        }
    }
}

/// Renders the list with its title and highlight.
pub fn render_list(frame: &mut Frame, area: Rect, list: &ListInfo, theme: &Theme) {
    let border = if list.loading { theme.border() } else { theme.border_focused() };
    let block = Block::default()
        .title(Span::styled(format!(" {} ", list.title), theme.title()))
        .borders(Borders::ALL)
        .border_style(border);

    let items: Vec<ListItem> = list
        .items
        .iter()
        .map(|item| ListItem::new(item_line(item, theme)))
        .collect();

    let widget = List::new(items).block(block).highlight_style(theme.selection());
    let mut state = ListState::default().with_selected(list.selected);
    frame.render_stateful_widget(widget, area, &mut state);
}
