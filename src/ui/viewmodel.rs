//! View model types representing renderable UI state.
//!
//! View models are computed from [`ControllerState`] once per frame and contain
//! display-ready data only: labels, highlight positions and the visible window of
//! the list. Components never look at the controller state directly.
//!
//! Only the rows inside the viewport are materialized, so channels with tens of
//! thousands of packages cost the same to draw as small ones.

use crate::app::rows::VersionRow;
use crate::app::search::fuzzy_match;
use crate::app::{ControllerState, InputMode, Mode, Notification};
use crate::domain::summarize_platforms;
use crate::ui::helpers::group_thousands;
use std::sync::Arc;

/// Complete view model for one frame.
#[derive(Debug, Clone)]
pub struct UIViewModel {
    pub list: ListInfo,
    pub indicators: Vec<Indicator>,
    pub status: String,
    pub detail: DetailInfo,
    pub footer: FooterInfo,
    pub notification: Option<Notification>,
}

/// The visible window of the list widget.
#[derive(Debug, Clone)]
pub struct ListInfo {
    pub title: String,
    /// Rows inside the viewport, starting at the scroll offset.
    pub items: Vec<DisplayItem>,
    /// Index of the highlighted row within `items`.
    pub selected: Option<usize>,
    /// The list is locked while a catalog loads.
    pub loading: bool,
}

/// One row of the list widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayItem {
    Package {
        name: String,
        /// Character indices matched by the filter query.
        highlight_positions: Vec<usize>,
    },
    Back,
    Section {
        subdir: String,
        collapsed: bool,
        count: usize,
    },
    Entry {
        version: String,
        build: String,
    },
    Empty,
    Platform {
        name: String,
        checked: bool,
        current: bool,
    },
}

/// A small state badge above the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indicator {
    Channel(String),
    /// Channel name being typed.
    ChannelDraft(String),
    Platforms(String),
    Filter(String),
    Download(String),
}

#[derive(Debug, Clone)]
pub struct DetailInfo {
    pub title: String,
    pub text: Arc<str>,
}

#[derive(Debug, Clone)]
pub struct FooterInfo {
    pub keybindings: String,
}

impl ControllerState {
    /// Computes the view model for the current frame.
    #[must_use]
    pub fn compute_viewmodel(&self) -> UIViewModel {
        UIViewModel {
            list: self.list_info(),
            indicators: self.indicators(),
            status: self.status.clone(),
            detail: DetailInfo {
                title: match (&self.mode, &self.versions) {
                    (Mode::Versions, Some(view)) => view.package().to_string(),
                    (Mode::Platforms, _) => "Platforms".to_string(),
                    _ => self.channel.clone(),
                },
                text: Arc::clone(&self.detail_text),
            },
            footer: FooterInfo {
                keybindings: self.keybindings().to_string(),
            },
            notification: self.notification.clone(),
        }
    }

    fn list_info(&self) -> ListInfo {
        let offset = self.list.offset;
        let window = offset..(offset + self.viewport_rows.max(1)).min(self.list_len());

        let (title, items) = match self.mode {
            Mode::Packages => {
                let title = format!("Packages ({})", group_thousands(self.visible.len() as u64));
                let items = self.visible.get(window.clone()).unwrap_or_default().iter().map(|name| {
                    let highlight_positions = if self.filter_active {
                        fuzzy_match(&self.query, name).map(|m| m.positions).unwrap_or_default()
                    } else {
                        Vec::new()
                    };
                    DisplayItem::Package {
                        name: name.clone(),
                        highlight_positions,
                    }
                });
                (title, items.collect())
            }
            Mode::Versions => {
                let Some(view) = &self.versions else {
                    return ListInfo {
                        title: String::new(),
                        items: Vec::new(),
                        selected: None,
                        loading: self.loading,
                    };
                };
                let rows = view.rows().get(window.clone()).unwrap_or_default();
                let items = rows.iter().map(|row| match row {
                    VersionRow::Back => DisplayItem::Back,
                    VersionRow::Empty => DisplayItem::Empty,
                    VersionRow::Section(subdir) => DisplayItem::Section {
                        subdir: subdir.clone(),
                        collapsed: view.is_collapsed(subdir),
                        count: view.section_len(subdir),
                    },
                    VersionRow::Entry { artifact, .. } => DisplayItem::Entry {
                        version: artifact.version.to_string(),
                        build: artifact.build.clone(),
                    },
                });
                (format!("{} versions", view.package()), items.collect())
            }
            Mode::Platforms => {
                let draft = self.editor.as_ref().map(|editor| editor.draft());
                let platforms = self.catalog.available.get(window.clone()).unwrap_or_default();
                let items = platforms.iter().map(|platform| DisplayItem::Platform {
                    name: platform.to_string(),
                    checked: draft.is_some_and(|draft| draft.contains(platform)),
                    current: *platform == self.current_platform,
                });
                ("Platforms".to_string(), items.collect())
            }
        };

        let selected = self
            .list
            .highlight
            .checked_sub(offset)
            .filter(|index| window.contains(&self.list.highlight) && *index < window.len());

        ListInfo {
            title,
            items,
            selected,
            loading: self.loading,
        }
    }

    fn indicators(&self) -> Vec<Indicator> {
        let mut indicators = Vec::new();

        match &self.channel_draft {
            Some(draft) => indicators.push(Indicator::ChannelDraft(draft.clone())),
            None => indicators.push(Indicator::Channel(self.channel.clone())),
        }
        if !self.catalog.selected.is_empty() {
            indicators.push(Indicator::Platforms(summarize_platforms(&self.catalog.selected)));
        }
        if self.filter_active {
            indicators.push(Indicator::Filter(self.query.clone()));
        }
        if let Some(file_name) = self.downloads.active() {
            indicators.push(Indicator::Download(file_name.to_string()));
        }
        indicators
    }

    fn keybindings(&self) -> &'static str {
        if self.loading {
            return "loading... | q: quit";
        }
        match (self.input_mode(), self.mode) {
            (InputMode::ChannelEdit, _) => "type channel name | enter: switch | esc: cancel",
            (InputMode::Filter, _) => "type to filter | ↑↓: move | enter: versions | esc: clear filter",
            (InputMode::Normal, Mode::Packages) => {
                "enter: versions | /: filter | p: platforms | c: channel | q: quit"
            }
            (InputMode::Normal, Mode::Versions) => "enter: open/toggle | d: download | esc: back | q: quit",
            (InputMode::Normal, Mode::Platforms) => "space: toggle | a: all/defaults | enter: apply | esc: cancel",
        }
    }
}
