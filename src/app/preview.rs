//! Detail pane coordination for asynchronously loaded previews.
//!
//! The detail pane must always show the most recently requested item even though
//! fetches complete out of order. Each preview stream (package previews and version
//! details) keeps the key it is waiting for and the key currently on screen. A
//! completion is applied only if its ticket is current, the owning mode is still
//! active and its key is still the pending one.

use crate::app::modes::Mode;
use crate::app::streams::{Stream, StreamTracker, Ticket};
use crate::domain::ArtifactKey;
use std::sync::Arc;

/// What the detail pane should show.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PreviewKey {
    /// Summary of a package across all of its records.
    Package(String),
    /// Full metadata of one artifact.
    Version { package: String, artifact: ArtifactKey },
}

impl PreviewKey {
    #[must_use]
    pub fn package(name: impl Into<String>) -> Self {
        Self::Package(name.into())
    }

    #[must_use]
    pub fn version(package: impl Into<String>, artifact: ArtifactKey) -> Self {
        Self::Version {
            package: package.into(),
            artifact,
        }
    }

    #[must_use]
    pub fn package_name(&self) -> &str {
        match self {
            Self::Package(name) | Self::Version { package: name, .. } => name,
        }
    }

    /// Stream this key's fetches belong to.
    #[must_use]
    pub const fn stream(&self) -> Stream {
        match self {
            Self::Package(_) => Stream::PackagePreview,
            Self::Version { .. } => Stream::VersionDetail,
        }
    }

    /// Transient text shown while the key is being fetched.
    #[must_use]
    pub fn placeholder(&self) -> String {
        match self {
            Self::Package(name) => format!("# {name}\n\nLoading repodata..."),
            Self::Version { package, artifact } => format!(
                "# {package} {}\n\nLoading repodata for selected version...",
                artifact.version
            ),
        }
    }
}

/// Outcome of a preview request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewRequest {
    /// The key is already on screen.
    Unchanged,
    /// Text was available synchronously and is now the pane content.
    Ready(Arc<str>),
    /// The placeholder should be shown and the key fetched with `ticket`.
    Loading { placeholder: String, ticket: Ticket },
}

#[derive(Debug, Clone, Default)]
struct Lane {
    pending: Option<PreviewKey>,
    shown: Option<PreviewKey>,
}

/// Per-stream pending/shown bookkeeping for the detail pane.
#[derive(Debug, Clone, Default)]
pub struct PreviewCoordinator {
    package: Lane,
    version: Lane,
}

impl PreviewCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lane_mut(&mut self, stream: Stream) -> &mut Lane {
        match stream {
            Stream::VersionDetail => &mut self.version,
            _ => &mut self.package,
        }
    }

    fn lane(&self, stream: Stream) -> &Lane {
        match stream {
            Stream::VersionDetail => &self.version,
            _ => &self.package,
        }
    }

    /// Requests `key` for the detail pane.
    ///
    /// `resolve` is asked for text that can be produced without a fetch (a cached
    /// rendering or records already in memory). When it has none, a ticket is
    /// issued and the caller must show the placeholder and start the fetch.
    pub fn request(
        &mut self,
        key: PreviewKey,
        tracker: &mut StreamTracker,
        resolve: impl FnOnce(&PreviewKey) -> Option<Arc<str>>,
    ) -> PreviewRequest {
        let stream = key.stream();
        let lane = self.lane_mut(stream);
        lane.pending = Some(key.clone());

        if lane.shown.as_ref() == Some(&key) {
            return PreviewRequest::Unchanged;
        }

        if let Some(text) = resolve(&key) {
            tracing::debug!(package = key.package_name(), ?stream, "preview resolved synchronously");
            lane.shown = Some(key);
            tracker.retire(stream);
            return PreviewRequest::Ready(text);
        }

        lane.shown = None;
        let ticket = tracker.issue(stream);
        tracing::debug!(package = key.package_name(), ?stream, id = ticket.id, "preview fetch scheduled");
        PreviewRequest::Loading {
            placeholder: key.placeholder(),
            ticket,
        }
    }

    /// Decides whether a fetched result for `key` may be applied to the pane, and
    /// records it as shown if so.
    pub fn complete(
        &mut self,
        ticket: &Ticket,
        key: &PreviewKey,
        active: Mode,
        tracker: &StreamTracker,
    ) -> bool {
        let stream = key.stream();
        let current = tracker.is_current(ticket)
            && stream.owning_mode() == Some(active)
            && self.lane(stream).pending.as_ref() == Some(key);

        if !current {
            tracing::debug!(package = key.package_name(), ?stream, id = ticket.id, "discarding stale preview");
            return false;
        }

        self.lane_mut(stream).shown = Some(key.clone());
        true
    }

    /// Forgets the stream's pending and shown keys, so outstanding fetches are
    /// discarded and the next request renders again.
    pub fn clear(&mut self, stream: Stream, tracker: &mut StreamTracker) {
        *self.lane_mut(stream) = Lane::default();
        tracker.retire(stream);
    }

    /// Marks `key` as on screen without going through a request, e.g. when the
    /// package preview stays visible while entering the versions view.
    pub fn mark_shown(&mut self, key: PreviewKey) {
        let lane = self.lane_mut(key.stream());
        lane.pending = Some(key.clone());
        lane.shown = Some(key);
    }

    #[must_use]
    pub fn pending(&self, stream: Stream) -> Option<&PreviewKey> {
        self.lane(stream).pending.as_ref()
    }

    #[must_use]
    pub fn shown(&self, stream: Stream) -> Option<&PreviewKey> {
        self.lane(stream).shown.as_ref()
    }

    /// Clears both streams.
    pub fn reset(&mut self, tracker: &mut StreamTracker) {
        self.clear(Stream::PackagePreview, tracker);
        self.clear(Stream::VersionDetail, tracker);
    }
}
