//! Request tickets for background work streams.
//!
//! Every background request carries a [`Ticket`]. A result may only touch visible
//! state when its ticket is still the latest one issued in its stream and was issued
//! in the current cache generation. There is no real cancellation: superseded tasks
//! run to completion and their results are dropped on arrival.

use crate::app::modes::Mode;
use std::collections::HashMap;

/// Independent streams of background work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    PackagePreview,
    VersionDetail,
    OpenVersions,
    ChannelSwitch,
    PlatformApply,
    Download,
}

impl Stream {
    /// Mode whose pane a preview stream writes to.
    #[must_use]
    pub const fn owning_mode(self) -> Option<Mode> {
        match self {
            Self::PackagePreview | Self::OpenVersions => Some(Mode::Packages),
            Self::VersionDetail => Some(Mode::Versions),
            Self::ChannelSwitch | Self::PlatformApply | Self::Download => None,
        }
    }
}

/// Identity of one background request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub stream: Stream,
    pub id: u64,
    pub generation: u64,
}

/// Issues tickets and answers whether a ticket is still current.
///
/// The generation advances whenever caches are invalidated wholesale (channel
/// switch, platform commit), which makes every outstanding ticket stale at once.
#[derive(Debug, Clone, Default)]
pub struct StreamTracker {
    next_id: u64,
    generation: u64,
    latest: HashMap<Stream, u64>,
}

impl StreamTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new ticket, superseding every earlier ticket of the stream.
    pub fn issue(&mut self, stream: Stream) -> Ticket {
        self.next_id += 1;
        self.latest.insert(stream, self.next_id);
        tracing::debug!(?stream, id = self.next_id, generation = self.generation, "issued ticket");
        Ticket {
            stream,
            id: self.next_id,
            generation: self.generation,
        }
    }

    /// Returns `true` if `ticket` is the latest of its stream in this generation.
    #[must_use]
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.generation == self.generation && self.latest.get(&ticket.stream) == Some(&ticket.id)
    }

    /// Returns `true` if `ticket` was issued in this generation, regardless of
    /// whether it has been superseded.
    #[must_use]
    pub const fn same_generation(&self, ticket: &Ticket) -> bool {
        ticket.generation == self.generation
    }

    /// Makes every outstanding ticket of `stream` stale.
    pub fn retire(&mut self, stream: Stream) {
        self.latest.remove(&stream);
    }

    /// Starts a new generation, making every outstanding ticket stale.
    pub fn advance_generation(&mut self) -> u64 {
        self.generation += 1;
        self.latest.clear();
        tracing::debug!(generation = self.generation, "advanced cache generation");
        self.generation
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes_older_in_same_stream() {
        let mut tracker = StreamTracker::new();
        let first = tracker.issue(Stream::PackagePreview);
        let second = tracker.issue(Stream::PackagePreview);

        assert!(!tracker.is_current(&first));
        assert!(tracker.is_current(&second));
    }

    #[test]
    fn streams_are_independent() {
        let mut tracker = StreamTracker::new();
        let preview = tracker.issue(Stream::PackagePreview);
        let download = tracker.issue(Stream::Download);

        assert!(tracker.is_current(&preview));
        assert!(tracker.is_current(&download));
    }

    #[test]
    fn generation_change_invalidates_everything() {
        let mut tracker = StreamTracker::new();
        let preview = tracker.issue(Stream::VersionDetail);
        tracker.advance_generation();

        assert!(!tracker.is_current(&preview));
        assert!(!tracker.same_generation(&preview));
    }

    #[test]
    fn retire_marks_stream_stale() {
        let mut tracker = StreamTracker::new();
        let ticket = tracker.issue(Stream::ChannelSwitch);
        tracker.retire(Stream::ChannelSwitch);
        assert!(!tracker.is_current(&ticket));
        assert!(tracker.same_generation(&ticket));
    }
}
