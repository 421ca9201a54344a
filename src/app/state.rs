//! Controller state and its mutation methods.
//!
//! [`ControllerState`] is the single aggregate behind the browser. Every change
//! goes through one of its methods so the invariants hold in one place:
//!
//! - exactly one [`Mode`] is active
//! - the committed platform selection is never empty once a catalog is loaded
//! - the detail pane only ever shows the latest requested preview
//! - at most one download runs at a time
//!
//! Methods that need background work return the [`Action`]s to execute; the
//! state itself never performs I/O.

use super::actions::Action;
use super::download::{self, DownloadGuard};
use super::modes::{InputMode, Mode};
use super::platforms::{CommitPlan, PlatformEditor, ToggleOutcome};
use super::preview::{PreviewCoordinator, PreviewKey, PreviewRequest};
use super::rows::{VersionRow, VersionView};
use super::search;
use super::snapshot::ChannelSnapshot;
use super::streams::{Stream, StreamTracker, Ticket};
use crate::cache::{DetailCache, RecordCache};
use crate::domain::{sort_records_descending, ArtifactKey, ArtifactSet, Platform, Record};
use crate::ui::theme::Theme;
use crate::ui::{detail, helpers::group_thousands, layout};
use crate::worker::{CatalogPayload, RecordsPurpose, WorkerMessage};
use crate::Config;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Seconds a notification stays visible.
pub const NOTIFICATION_TTL_SECS: i64 = 4;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Information,
    Warning,
    Error,
}

/// A transient message shown over the detail pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub raised_at: DateTime<Utc>,
}

impl Notification {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        (now - self.raised_at).num_seconds() >= NOTIFICATION_TTL_SECS
    }
}

/// Highlight and scroll offset of the list widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListPosition {
    pub highlight: usize,
    pub offset: usize,
}

impl ListPosition {
    /// Moves the highlight by `delta`, stopping at both ends.
    pub fn step(&mut self, delta: isize, len: usize) {
        if len == 0 {
            *self = Self::default();
            return;
        }
        self.highlight = self.highlight.saturating_add_signed(delta).min(len - 1);
    }

    pub fn clamp(&mut self, len: usize) {
        self.highlight = self.highlight.min(len.saturating_sub(1));
        self.offset = self.offset.min(self.highlight);
    }

    /// Scrolls so the highlight stays inside a viewport of `rows` lines.
    pub fn follow(&mut self, rows: usize) {
        let rows = rows.max(1);
        if self.highlight < self.offset {
            self.offset = self.highlight;
        } else if self.highlight >= self.offset + rows {
            self.offset = self.highlight + 1 - rows;
        }
    }
}

/// The loaded catalog of the current channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    /// Platforms discovered for the channel, `noarch` last.
    pub available: Vec<Platform>,
    /// Committed platform selection.
    pub selected: BTreeSet<Platform>,
    /// Sorted, unique package names across the selected platforms.
    pub names: Vec<String>,
}

/// Central controller state.
#[derive(Debug, Clone)]
pub struct ControllerState {
    pub mode: Mode,
    pub channel: String,
    /// Platforms requested at startup, reconciled on the first load.
    pub requested_platforms: Vec<Platform>,
    pub current_platform: Platform,
    pub catalog: Catalog,
    /// Package names passing the filter, in ranked order.
    pub visible: Vec<String>,
    pub filter_active: bool,
    pub query: String,
    /// Channel name being typed, when editing.
    pub channel_draft: Option<String>,
    pub list: ListPosition,
    /// Package list position to restore when leaving versions or platforms.
    pub saved_list: Option<ListPosition>,
    pub versions: Option<VersionView>,
    pub editor: Option<PlatformEditor>,
    pub records: RecordCache,
    pub details: DetailCache,
    pub previews: PreviewCoordinator,
    pub streams: StreamTracker,
    /// Current detail pane content.
    pub detail_text: Arc<str>,
    pub status: String,
    pub notification: Option<Notification>,
    pub downloads: DownloadGuard,
    /// A catalog load is in flight; the list ignores input.
    pub loading: bool,
    /// State to restore if the in-flight catalog load fails.
    pub rollback: Option<ChannelSnapshot>,
    /// Package whose versions view waits for records.
    pub pending_open: Option<String>,
    pub viewport_rows: usize,
    pub download_dir: PathBuf,
    pub theme: Theme,
    pub should_quit: bool,
}

fn resolve_preview(key: &PreviewKey, records: &RecordCache, details: &mut DetailCache) -> Option<Arc<str>> {
    if let Some(text) = details.get(key) {
        return Some(text);
    }

    let package_records = records.get(key.package_name())?;
    let text = match key {
        PreviewKey::Package(package) => detail::render_package_preview(package, &package_records),
        PreviewKey::Version { package, artifact } => {
            match package_records.iter().find(|record| record.matches(artifact)) {
                Some(record) => {
                    detail::render_version_details(package, record, usize::from(details.width()))
                }
                None => format!("# {package} {}\n\nNo metadata record found.", artifact.version),
            }
        }
    };
    Some(details.insert(key.clone(), text))
}

impl ControllerState {
    /// Creates the initial state for `config`. Nothing is loaded until
    /// [`ControllerState::start`] is called.
    #[must_use]
    pub fn new(config: &Config, theme: Theme) -> Self {
        Self {
            mode: Mode::Packages,
            channel: config.channel.clone(),
            requested_platforms: config.platforms.clone(),
            current_platform: Platform::current(),
            catalog: Catalog::default(),
            visible: Vec::new(),
            filter_active: false,
            query: String::new(),
            channel_draft: None,
            list: ListPosition::default(),
            saved_list: None,
            versions: None,
            editor: None,
            records: RecordCache::new(),
            details: DetailCache::new(layout::DEFAULT_CONTENT_WIDTH),
            previews: PreviewCoordinator::new(),
            streams: StreamTracker::new(),
            detail_text: Arc::from(""),
            status: String::new(),
            notification: None,
            downloads: DownloadGuard::new(),
            loading: false,
            rollback: None,
            pending_open: None,
            viewport_rows: 20,
            download_dir: config.download_dir.clone(),
            theme,
            should_quit: false,
        }
    }

    /// How printable keys are routed right now.
    #[must_use]
    pub const fn input_mode(&self) -> InputMode {
        if self.channel_draft.is_some() {
            InputMode::ChannelEdit
        } else if self.filter_active && matches!(self.mode, Mode::Packages) {
            InputMode::Filter
        } else {
            InputMode::Normal
        }
    }

    /// Issues the initial catalog load.
    pub fn start(&mut self) -> Vec<Action> {
        tracing::info!(channel = %self.channel, requested = ?self.requested_platforms, "starting");
        let requested = self.requested_platforms.clone();
        self.begin_catalog_load(Stream::ChannelSwitch, requested, None)
    }

    fn begin_catalog_load(
        &mut self,
        stream: Stream,
        requested: Vec<Platform>,
        known_available: Option<Vec<Platform>>,
    ) -> Vec<Action> {
        self.loading = true;
        self.detail_text = Arc::from(format!("# {}\n\nLoading repodata...", self.channel));
        self.status = if known_available.is_some() {
            "Loading repodata for selected platforms...".to_string()
        } else {
            "Discovering available platforms...".to_string()
        };

        let ticket = self.streams.issue(stream);
        vec![Action::PostToWorker(WorkerMessage::load_catalog(
            ticket,
            self.channel.clone(),
            requested,
            known_available,
        ))]
    }

    /// Drops every cache and makes every outstanding result stale.
    fn invalidate_loaded_state(&mut self) {
        self.records.clear();
        self.details.clear();
        self.streams.advance_generation();
        self.previews.reset(&mut self.streams);
        self.pending_open = None;
    }

    fn selected_platforms(&self) -> Vec<Platform> {
        self.catalog.selected.iter().copied().collect()
    }

    /// Number of rows in the list widget for the current mode.
    #[must_use]
    pub fn list_len(&self) -> usize {
        match self.mode {
            Mode::Packages => self.visible.len(),
            Mode::Versions => self.versions.as_ref().map_or(0, |view| view.rows().len()),
            Mode::Platforms => self.catalog.available.len(),
        }
    }

    /// Highlighted package name in packages mode.
    #[must_use]
    pub fn highlighted_package(&self) -> Option<&str> {
        self.visible.get(self.list.highlight).map(String::as_str)
    }

    /// Highlighted row in versions mode.
    #[must_use]
    pub fn highlighted_row(&self) -> Option<&VersionRow> {
        self.versions.as_ref()?.row(self.list.highlight)
    }

    /// Moves the highlight and requests the matching preview.
    pub fn move_highlight(&mut self, delta: isize) -> Vec<Action> {
        let before = self.list.highlight;
        self.list.step(delta, self.list_len());
        self.list.follow(self.viewport_rows);
        if self.list.highlight == before && self.list_len() > 0 {
            return Vec::new();
        }
        self.on_highlight_changed()
    }

    /// Jumps to the first or last row.
    pub fn jump(&mut self, to_end: bool) -> Vec<Action> {
        let len = self.list_len();
        let delta = if to_end { isize::MAX } else { isize::MIN };
        self.list.step(delta, len);
        self.list.follow(self.viewport_rows);
        self.on_highlight_changed()
    }

    fn on_highlight_changed(&mut self) -> Vec<Action> {
        match self.mode {
            Mode::Packages => match self.highlighted_package().map(str::to_string) {
                Some(package) => self.request_package_preview(&package),
                None => Vec::new(),
            },
            Mode::Versions => self.preview_highlighted_row(),
            Mode::Platforms => Vec::new(),
        }
    }

    fn preview_highlighted_row(&mut self) -> Vec<Action> {
        let Some(view) = &self.versions else {
            return Vec::new();
        };
        let package = view.package().to_string();

        match view.row(self.list.highlight).cloned() {
            Some(VersionRow::Entry { artifact, .. }) => self.request_version_preview(&package, artifact),
            Some(VersionRow::Section(subdir)) => {
                self.previews.clear(Stream::VersionDetail, &mut self.streams);
                self.detail_text = Arc::from(detail::render_section_hint(&package, &subdir));
                Vec::new()
            }
            Some(VersionRow::Back) => {
                self.previews.clear(Stream::VersionDetail, &mut self.streams);
                let key = PreviewKey::package(package);
                if let Some(text) = resolve_preview(&key, &self.records, &mut self.details) {
                    self.detail_text = text;
                }
                Vec::new()
            }
            Some(VersionRow::Empty) | None => Vec::new(),
        }
    }

    fn request_preview(&mut self, key: PreviewKey) -> Vec<Action> {
        let records = &self.records;
        let details = &mut self.details;
        let request = self
            .previews
            .request(key.clone(), &mut self.streams, |key| resolve_preview(key, records, details));

        match request {
            PreviewRequest::Unchanged => Vec::new(),
            PreviewRequest::Ready(text) => {
                self.detail_text = text;
                Vec::new()
            }
            PreviewRequest::Loading { placeholder, ticket } => {
                self.detail_text = Arc::from(placeholder);
                let package = key.package_name().to_string();
                vec![Action::PostToWorker(WorkerMessage::query_records(
                    ticket,
                    self.channel.clone(),
                    self.selected_platforms(),
                    package,
                    RecordsPurpose::Preview(key),
                ))]
            }
        }
    }

    /// Requests the package summary for the detail pane.
    pub fn request_package_preview(&mut self, package: &str) -> Vec<Action> {
        self.request_preview(PreviewKey::package(package))
    }

    /// Requests one artifact's details for the detail pane.
    pub fn request_version_preview(&mut self, package: &str, artifact: ArtifactKey) -> Vec<Action> {
        self.request_preview(PreviewKey::version(package, artifact))
    }

    /// Recomputes the visible package list from the query.
    ///
    /// With `preserve` the previous highlight and scroll offset are restored
    /// (clamped), otherwise the list starts at the top.
    pub fn apply_filter(&mut self, preserve: Option<ListPosition>) -> Vec<Action> {
        self.visible = if self.query.trim().is_empty() {
            self.catalog.names.clone()
        } else {
            search::rank(&self.query, &self.catalog.names)
        };

        self.list = preserve.unwrap_or_default();
        self.list.clamp(self.visible.len());
        self.list.follow(self.viewport_rows);
        self.status = format!("{} packages in selection.", group_thousands(self.visible.len() as u64));

        self.previews.clear(Stream::PackagePreview, &mut self.streams);
        match self.highlighted_package().map(str::to_string) {
            Some(package) => self.request_package_preview(&package),
            None => {
                self.detail_text = Arc::from("No packages match the current selection.");
                Vec::new()
            }
        }
    }

    /// Enters filter mode with an empty query.
    pub fn start_filter(&mut self) -> Vec<Action> {
        if self.mode != Mode::Packages {
            return Vec::new();
        }
        self.filter_active = true;
        self.query.clear();
        self.apply_filter(None)
    }

    /// Leaves filter mode and clears the query.
    pub fn exit_filter(&mut self) -> Vec<Action> {
        self.filter_active = false;
        self.query.clear();
        self.apply_filter(None)
    }

    /// Appends typed text to the active text input.
    pub fn insert_text(&mut self, text: &str) -> Vec<Action> {
        let text: String = text.chars().filter(|c| !c.is_control()).collect();
        if text.is_empty() {
            return Vec::new();
        }

        match self.input_mode() {
            InputMode::ChannelEdit => {
                if let Some(draft) = &mut self.channel_draft {
                    draft.push_str(&text);
                }
                Vec::new()
            }
            InputMode::Filter => {
                self.query.push_str(&text);
                self.apply_filter(None)
            }
            InputMode::Normal => Vec::new(),
        }
    }

    /// Removes the last character of the active text input.
    pub fn delete_char(&mut self) -> Vec<Action> {
        match self.input_mode() {
            InputMode::ChannelEdit => {
                if let Some(draft) = &mut self.channel_draft {
                    draft.pop();
                }
                Vec::new()
            }
            InputMode::Filter => {
                self.query.pop();
                self.apply_filter(None)
            }
            InputMode::Normal => Vec::new(),
        }
    }

    /// Opens the versions view of `package`, loading its records if needed.
    pub fn open_versions(&mut self, package: &str) -> Vec<Action> {
        self.saved_list = Some(self.list);

        if let Some(records) = self.records.get(package) {
            self.enter_versions(package, &records);
            return Vec::new();
        }

        tracing::debug!(package, "loading records before opening versions");
        self.pending_open = Some(package.to_string());
        self.status = format!("Loading versions for {package}...");
        let ticket = self.streams.issue(Stream::OpenVersions);
        vec![Action::PostToWorker(WorkerMessage::query_records(
            ticket,
            self.channel.clone(),
            self.selected_platforms(),
            package.to_string(),
            RecordsPurpose::OpenVersions,
        ))]
    }

    fn enter_versions(&mut self, package: &str, records: &[Record]) {
        tracing::debug!(package, record_count = records.len(), "entering versions mode");
        self.pending_open = None;
        self.versions = Some(VersionView::new(package, ArtifactSet::from_records(records)));
        self.mode = Mode::Versions;
        self.list = ListPosition::default();
        self.previews.clear(Stream::VersionDetail, &mut self.streams);

        let key = PreviewKey::package(package);
        if let Some(text) = resolve_preview(&key, &self.records, &mut self.details) {
            self.detail_text = text;
        }
        self.previews.mark_shown(key);
        self.update_versions_status();
    }

    /// Status line of the versions view.
    pub fn update_versions_status(&mut self) {
        if let Some(view) = &self.versions {
            self.status = format!(
                "{} entries across {} platform(s). Enter toggles section.",
                group_thousands(view.artifacts().len() as u64),
                view.artifacts().subdir_count()
            );
        }
    }

    /// Returns to the package list, restoring the saved position.
    pub fn back_to_packages(&mut self) -> Vec<Action> {
        tracing::debug!(from = ?self.mode, "returning to packages");
        self.mode = Mode::Packages;
        self.editor = None;
        self.versions = None;
        self.previews.clear(Stream::VersionDetail, &mut self.streams);
        let saved = self.saved_list.take();
        self.apply_filter(saved)
    }

    /// Handles Enter in every mode.
    pub fn select(&mut self) -> Vec<Action> {
        match self.mode {
            Mode::Packages => match self.highlighted_package().map(str::to_string) {
                Some(package) => self.open_versions(&package),
                None => Vec::new(),
            },
            Mode::Platforms => self.apply_platforms(),
            Mode::Versions => match self.highlighted_row().cloned() {
                Some(VersionRow::Back) => self.back_to_packages(),
                Some(VersionRow::Section(subdir)) => {
                    self.toggle_section(&subdir);
                    Vec::new()
                }
                Some(VersionRow::Entry { artifact, .. }) => {
                    let package = self
                        .versions
                        .as_ref()
                        .map(|view| view.package().to_string())
                        .unwrap_or_default();
                    self.request_version_preview(&package, artifact)
                }
                Some(VersionRow::Empty) | None => Vec::new(),
            },
        }
    }

    fn toggle_section(&mut self, subdir: &str) {
        let Some(view) = &mut self.versions else {
            return;
        };
        if let Some(index) = view.toggle_section(subdir) {
            self.list.highlight = index;
        }
        self.list.clamp(self.list_len());
        self.list.follow(self.viewport_rows);
        self.update_versions_status();
    }

    /// Opens the platform selector from the package list.
    pub fn open_platforms(&mut self) {
        if self.mode != Mode::Packages || self.catalog.available.is_empty() {
            return;
        }
        tracing::debug!(selected = ?self.catalog.selected, "opening platform selector");
        self.saved_list = Some(self.list);
        self.editor = Some(PlatformEditor::open(&self.catalog.selected));
        self.mode = Mode::Platforms;
        self.list = ListPosition::default();
        self.update_platform_status();
    }

    /// Status line of the platform selector.
    pub fn update_platform_status(&mut self) {
        if let Some(editor) = &self.editor {
            let hint = if editor.selects_all(&self.catalog.available) {
                "Select default platforms"
            } else {
                "Select all platforms"
            };
            self.status = format!(
                "{} platforms selected. Press Enter to apply.\n{hint}",
                editor.draft().len()
            );
        }
    }

    /// Toggles the highlighted platform in the draft.
    pub fn toggle_platform(&mut self) {
        let Some(platform) = self.catalog.available.get(self.list.highlight).copied() else {
            return;
        };
        let Some(editor) = &mut self.editor else {
            return;
        };

        if editor.toggle(platform) == ToggleOutcome::KeptLast {
            self.status = "At least one platform must remain selected.".to_string();
            return;
        }
        self.update_platform_status();
    }

    /// Selects all platforms or returns to the recommended defaults.
    pub fn toggle_all_platforms(&mut self) {
        if self.catalog.available.is_empty() {
            return;
        }
        if let Some(editor) = &mut self.editor {
            editor.toggle_all(&self.catalog.available, self.current_platform);
        }
        self.list.clamp(self.list_len());
        self.update_platform_status();
    }

    /// Commits the draft selection, reloading the catalog if it changed.
    pub fn apply_platforms(&mut self) -> Vec<Action> {
        let Some(editor) = &self.editor else {
            return Vec::new();
        };

        match editor.commit(&self.catalog.selected) {
            CommitPlan::Empty => {
                self.status = "Select at least one platform before applying.".to_string();
                Vec::new()
            }
            CommitPlan::Unchanged => {
                tracing::debug!("platform selection unchanged");
                self.back_to_packages()
            }
            CommitPlan::Replace(selected) => {
                tracing::info!(?selected, "applying platform selection");
                self.rollback = Some(ChannelSnapshot::capture(self));
                self.catalog.selected = selected;
                self.invalidate_loaded_state();
                let requested = self.selected_platforms();
                let known = Some(self.catalog.available.clone());
                self.begin_catalog_load(Stream::PlatformApply, requested, known)
            }
        }
    }

    /// Starts typing a new channel name.
    pub fn begin_channel_edit(&mut self) {
        self.channel_draft = Some(String::new());
    }

    /// Abandons the channel name being typed.
    pub fn cancel_channel_edit(&mut self) {
        self.channel_draft = None;
    }

    /// Switches to the typed channel.
    pub fn confirm_channel_edit(&mut self) -> Vec<Action> {
        let Some(draft) = &self.channel_draft else {
            return Vec::new();
        };
        let channel = draft.trim().to_string();
        if channel.is_empty() {
            self.notify(Severity::Warning, "Channel", "Channel cannot be empty.");
            return Vec::new();
        }

        self.channel_draft = None;
        if channel == self.channel {
            return Vec::new();
        }

        tracing::info!(from = %self.channel, to = %channel, "switching channel");
        self.rollback = Some(ChannelSnapshot::capture(self));
        self.channel = channel;
        self.mode = Mode::Packages;
        self.versions = None;
        self.editor = None;
        self.saved_list = None;
        self.catalog.available.clear();
        self.catalog.names.clear();
        self.visible.clear();
        self.list = ListPosition::default();
        self.invalidate_loaded_state();

        let requested = self.selected_platforms();
        self.begin_catalog_load(Stream::ChannelSwitch, requested, None)
    }

    /// Applies a finished catalog load.
    pub fn on_catalog_loaded(
        &mut self,
        ticket: &Ticket,
        channel: &str,
        result: Result<CatalogPayload, String>,
    ) -> Vec<Action> {
        if !self.streams.is_current(ticket) {
            tracing::debug!(channel, id = ticket.id, "discarding stale catalog");
            return Vec::new();
        }
        self.loading = false;
        let rollback = self.rollback.take();

        match result {
            Ok(payload) => {
                tracing::info!(
                    channel,
                    platforms = ?payload.selected,
                    names = payload.names.len(),
                    "catalog loaded"
                );
                self.catalog = Catalog {
                    available: payload.available,
                    selected: payload.selected,
                    names: payload.names,
                };
                if ticket.stream == Stream::ChannelSwitch && rollback.is_some() {
                    self.notify(
                        Severity::Information,
                        "Channel",
                        format!("Switched to channel: {channel}"),
                    );
                }
                self.mode = Mode::Packages;
                self.editor = None;
                self.versions = None;
                let saved = self.saved_list.take();
                self.apply_filter(saved)
            }
            Err(message) => {
                tracing::warn!(channel, error = %message, "catalog load failed");
                let Some(snapshot) = rollback else {
                    self.detail_text = Arc::from(format!("# {channel}\n\nNo package metadata available."));
                    self.status = format!("Failed to load repodata: {message}");
                    return Vec::new();
                };

                let list = snapshot_list(&snapshot, self);
                snapshot.restore(self);
                self.previews.reset(&mut self.streams);
                self.mode = Mode::Packages;
                self.editor = None;
                self.versions = None;
                self.saved_list = None;
                let actions = self.apply_filter(Some(list));

                if ticket.stream == Stream::PlatformApply {
                    self.status = format!("Failed to load selected platforms: {message}");
                    self.notify(Severity::Error, "Platforms", format!("Failed to load selected platforms: {message}"));
                } else {
                    self.notify(Severity::Error, "Channel", format!("Failed to load channel: {channel}"));
                }
                actions
            }
        }
    }

    /// Applies a finished record query.
    pub fn on_records_loaded(
        &mut self,
        ticket: &Ticket,
        package: &str,
        purpose: RecordsPurpose,
        result: Result<Vec<Record>, String>,
    ) -> Vec<Action> {
        if !self.streams.same_generation(ticket) {
            tracing::debug!(package, id = ticket.id, "discarding records from previous catalog");
            return Vec::new();
        }

        let result = result.map(|mut records| {
            sort_records_descending(&mut records);
            match self.records.get(package) {
                Some(cached) => cached,
                None => self.records.insert(package, records),
            }
        });

        match purpose {
            RecordsPurpose::Preview(key) => {
                if !self.previews.complete(ticket, &key, self.mode, &self.streams) {
                    return Vec::new();
                }
                match result {
                    Ok(_) => {
                        if let Some(text) = resolve_preview(&key, &self.records, &mut self.details) {
                            self.detail_text = text;
                        }
                    }
                    Err(message) => {
                        tracing::warn!(package, error = %message, "preview load failed");
                        self.previews.clear(key.stream(), &mut self.streams);
                        self.detail_text = Arc::from(format!("# {package}\n\nFailed to load repodata: {message}"));
                        self.status = format!("Failed to load repodata: {message}");
                    }
                }
                Vec::new()
            }
            RecordsPurpose::OpenVersions => {
                let awaited = self.streams.is_current(ticket)
                    && self.mode == Mode::Packages
                    && self.pending_open.as_deref() == Some(package);
                if !awaited {
                    tracing::debug!(package, "discarding stale versions load");
                    return Vec::new();
                }
                self.pending_open = None;
                match result {
                    Ok(records) => self.enter_versions(package, &records),
                    Err(message) => {
                        tracing::warn!(package, error = %message, "versions load failed");
                        self.status = format!("Failed to load repodata: {message}");
                    }
                }
                Vec::new()
            }
        }
    }

    /// Starts downloading the highlighted artifact.
    pub fn request_download(&mut self) -> Vec<Action> {
        if self.mode != Mode::Versions || self.downloads.active().is_some() {
            return Vec::new();
        }

        let Some(VersionRow::Entry { artifact, .. }) = self.highlighted_row().cloned() else {
            self.notify(Severity::Warning, "Download", "Select a specific version entry to download.");
            return Vec::new();
        };
        let package = self
            .versions
            .as_ref()
            .map(|view| view.package().to_string())
            .unwrap_or_default();

        let destination = match download::destination(&self.download_dir, &artifact.file_name) {
            Ok(destination) => destination,
            Err(e) => {
                tracing::warn!(file_name = %artifact.file_name, error = %e, "download rejected");
                self.notify(Severity::Error, "Download", e.to_string());
                return Vec::new();
            }
        };

        let cached = self.records.get(&package);
        let url = download::resolve_url(cached.as_deref().map(Vec::as_slice), &self.channel, &artifact);
        if !self.downloads.try_begin(&artifact.file_name) {
            return Vec::new();
        }

        tracing::info!(url = %url, destination = %destination.display(), "starting download");
        let ticket = self.streams.issue(Stream::Download);
        vec![Action::PostToWorker(WorkerMessage::download(ticket, url, destination))]
    }

    /// Releases the download guard and reports the outcome.
    pub fn on_download_finished(&mut self, file_name: &str, result: Result<PathBuf, String>) {
        self.downloads.finish();
        match result {
            Ok(path) => {
                tracing::info!(path = %path.display(), "download finished");
                self.notify(
                    Severity::Information,
                    "Download",
                    format!("Downloaded successfully to {}", path.display()),
                );
            }
            Err(message) => {
                tracing::warn!(file_name, error = %message, "download failed");
                self.notify(
                    Severity::Error,
                    "Download",
                    format!("Download failed for {file_name}: {message}"),
                );
            }
        }
    }

    /// Adapts to a new terminal size.
    pub fn resize(&mut self, width: u16, height: u16) -> Vec<Action> {
        self.viewport_rows = layout::list_rows(height);
        self.list.follow(self.viewport_rows);

        let width_changed = self.details.set_width(layout::content_width(width));
        if !width_changed || self.mode != Mode::Versions {
            return Vec::new();
        }

        // detail boxes are wrapped to the old width
        self.previews.clear(Stream::VersionDetail, &mut self.streams);
        match self.highlighted_row() {
            Some(VersionRow::Entry { .. }) => self.preview_highlighted_row(),
            _ => Vec::new(),
        }
    }

    /// Raises a notification, replacing the current one.
    pub fn notify(&mut self, severity: Severity, title: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(?severity, title, message = %message, "notification");
        self.notification = Some(Notification {
            title: title.to_string(),
            message,
            severity,
            raised_at: Utc::now(),
        });
    }

    /// Drops an expired notification. Returns `true` if one was dropped.
    pub fn expire_notification(&mut self, now: DateTime<Utc>) -> bool {
        if self.notification.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notification = None;
            return true;
        }
        false
    }
}

/// List position to restore after a failed reload: the saved package position if
/// the failure happened while away from the package list, else the snapshot's.
fn snapshot_list(snapshot: &ChannelSnapshot, state: &ControllerState) -> ListPosition {
    state.saved_list.or_else(|| snapshot.saved_list()).unwrap_or_else(|| snapshot.list())
}
