//! Single-flight download bookkeeping on the UI loop.
//!
//! The transfer itself runs in the worker; this module decides whether a download
//! may start, where it goes and which URL it uses.

use crate::domain::error::{BrowseError, Result};
use crate::domain::{ArtifactKey, Record};
use std::path::{Component, Path, PathBuf};

/// Base URL used when no cached record provides a download URL.
pub const FALLBACK_BASE_URL: &str = "https://conda.anaconda.org";

/// Canonical artifact URL for a channel, subdir and file name.
#[must_use]
pub fn fallback_url(channel: &str, subdir: &str, file_name: &str) -> String {
    format!("{FALLBACK_BASE_URL}/{channel}/{subdir}/{file_name}")
}

/// Resolves the download URL for `artifact`: the URL of the first cached record
/// with the same identity, otherwise the canonical channel URL.
#[must_use]
pub fn resolve_url(records: Option<&[Record]>, channel: &str, artifact: &ArtifactKey) -> String {
    records
        .and_then(|records| records.iter().find(|record| record.matches(artifact)))
        .map(|record| record.url.clone())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| fallback_url(channel, &artifact.subdir, &artifact.file_name))
}

/// Tracks the one download allowed to run at a time.
#[derive(Debug, Clone, Default)]
pub struct DownloadGuard {
    active: Option<String>,
}

impl DownloadGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the guard for `file_name`. Returns `false` while another download runs.
    pub fn try_begin(&mut self, file_name: &str) -> bool {
        if let Some(active) = &self.active {
            tracing::debug!(active = %active, requested = file_name, "download already in flight");
            return false;
        }
        self.active = Some(file_name.to_string());
        true
    }

    /// Releases the guard.
    pub fn finish(&mut self) {
        self.active = None;
    }

    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }
}

/// Destination of an artifact in the download directory.
///
/// # Errors
///
/// Returns [`BrowseError::Download`] when `file_name` is not a single plain path
/// component, so the file would land outside `directory`.
pub fn destination(directory: &Path, file_name: &str) -> Result<PathBuf> {
    let mut components = Path::new(file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if name == file_name => Ok(directory.join(name)),
        _ => Err(BrowseError::Download(format!("Refusing unsafe file name: {file_name}"))),
    }
}
