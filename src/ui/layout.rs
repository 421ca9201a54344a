//! Screen geometry shared by the renderer and the controller.
//!
//! ```text
//! ┌ indicators ──────────┐┌ detail ──────────────────────────┐
//! ├ list ────────────────┤│                                  │
//! │                      ││                                  │
//! ├ status ──────────────┤│                                  │
//! └──────────────────────┘└──────────────────────────────────┘
//!  footer
//! ```
//!
//! The controller needs the list height and the detail width before anything is
//! drawn, so both are derived here from the terminal size alone.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Detail pane text width assumed before the first resize event.
pub const DEFAULT_CONTENT_WIDTH: u16 = 80;

/// Share of the terminal width taken by the sidebar.
const SIDEBAR_PERCENT: u16 = 35;
const SIDEBAR_MIN: u16 = 24;
const SIDEBAR_MAX: u16 = 60;

const INDICATOR_ROWS: u16 = 1;
const STATUS_ROWS: u16 = 4;
const FOOTER_ROWS: u16 = 1;
const BORDER: u16 = 2;
const PADDING: u16 = 2;

/// Areas of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    pub indicators: Rect,
    pub list: Rect,
    pub status: Rect,
    pub detail: Rect,
    pub footer: Rect,
}

fn sidebar_width(total: u16) -> u16 {
    let share = u32::from(total) * u32::from(SIDEBAR_PERCENT) / 100;
    u16::try_from(share).unwrap_or(SIDEBAR_MAX).clamp(SIDEBAR_MIN, SIDEBAR_MAX).min(total)
}

/// Text width inside the detail pane for a terminal `total` columns wide.
///
/// ```
/// use conda_browse::ui::layout::content_width;
///
/// assert_eq!(content_width(120), 120 - 42 - 4);
/// assert_eq!(content_width(10), 0);
/// ```
#[must_use]
pub fn content_width(total: u16) -> u16 {
    total.saturating_sub(sidebar_width(total)).saturating_sub(BORDER + PADDING)
}

/// Number of list rows visible in a terminal `height` rows tall.
#[must_use]
pub fn list_rows(height: u16) -> usize {
    usize::from(height.saturating_sub(FOOTER_ROWS + INDICATOR_ROWS + STATUS_ROWS + BORDER))
}

/// Splits the frame into its areas.
#[must_use]
pub fn split(area: Rect) -> ScreenAreas {
    let [body, footer] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(FOOTER_ROWS)])
        .areas(area);

    let [sidebar, detail] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(sidebar_width(area.width)), Constraint::Min(0)])
        .areas(body);

    let [indicators, list, status] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(INDICATOR_ROWS),
            Constraint::Min(0),
            Constraint::Length(STATUS_ROWS),
        ])
        .areas(sidebar);

    ScreenAreas {
        indicators,
        list,
        status,
        detail,
        footer,
    }
}
