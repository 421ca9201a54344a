//! Rollback point for channel switches and platform commits.

use crate::app::state::{Catalog, ControllerState, ListPosition};
use crate::cache::{DetailCache, RecordCache};
use std::sync::Arc;

/// Everything a failed catalog reload must put back.
///
/// Captured before the channel or committed platform set changes; restoring it
/// returns the browser to the last working catalog, including its caches.
#[derive(Debug, Clone)]
pub struct ChannelSnapshot {
    channel: String,
    catalog: Catalog,
    visible: Vec<String>,
    list: ListPosition,
    saved_list: Option<ListPosition>,
    records: RecordCache,
    details: DetailCache,
    detail_text: Arc<str>,
    status: String,
}

impl ChannelSnapshot {
    #[must_use]
    pub fn capture(state: &ControllerState) -> Self {
        Self {
            channel: state.channel.clone(),
            catalog: state.catalog.clone(),
            visible: state.visible.clone(),
            list: state.list,
            saved_list: state.saved_list,
            records: state.records.clone(),
            details: state.details.clone(),
            detail_text: Arc::clone(&state.detail_text),
            status: state.status.clone(),
        }
    }

    #[must_use]
    pub const fn list(&self) -> ListPosition {
        self.list
    }

    /// Package list position saved while versions or platforms were open.
    #[must_use]
    pub const fn saved_list(&self) -> Option<ListPosition> {
        self.saved_list
    }

    /// Writes the captured state back. The detail cache keeps the current width.
    pub fn restore(self, state: &mut ControllerState) {
        tracing::debug!(channel = %self.channel, "restoring channel snapshot");
        let width = state.details.width();

        state.channel = self.channel;
        state.catalog = self.catalog;
        state.visible = self.visible;
        state.list = self.list;
        state.saved_list = self.saved_list;
        state.records = self.records;
        state.details = self.details;
        state.details.set_width(width);
        state.detail_text = self.detail_text;
        state.status = self.status;
    }
}
