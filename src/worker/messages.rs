//! Worker message types for UI loop to background task communication.
//!
//! This module defines the request and response protocol between the UI loop and
//! the background tasks that talk to the metadata gateway and download artifacts.
//! Every message carries the [`Ticket`] it was issued with, so the controller can
//! tell current results from superseded ones. Messages also carry the tracing span
//! they were created in, letting worker spans link back to the UI event that
//! caused them.

use crate::app::preview::PreviewKey;
use crate::app::streams::Ticket;
use crate::domain::{Platform, Record};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Tracing origin of a worker message.
///
/// Captured from the current span when a message is built and used by the worker
/// as a `follows_from` link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    /// Span that was current when the message was created.
    pub origin: tracing::span::Id,
}

impl TraceContext {
    /// Captures the current span, if there is one.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        let origin = tracing::Span::current().id()?;
        tracing::trace!(?origin, "capturing trace context");
        Some(Self { origin })
    }
}

/// Why records are being queried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordsPurpose {
    /// Fill the detail pane for this key.
    Preview(PreviewKey),
    /// Enter the versions view of the package.
    OpenVersions,
}

/// Generates builder functions for `WorkerMessage` variants that automatically
/// capture the current trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    load_catalog(LoadCatalog {
        ticket: Ticket,
        channel: String,
        requested: Vec<Platform>,
        known_available: Option<Vec<Platform>>,
    }),
    query_records(QueryRecords {
        ticket: Ticket,
        channel: String,
        platforms: Vec<Platform>,
        package: String,
        purpose: RecordsPurpose,
    }),
    download(Download { ticket: Ticket, url: String, destination: PathBuf }),
}

/// Requests sent from the UI loop to a background task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerMessage {
    /// Discover platforms (unless already known), reconcile the selection and list
    /// package names.
    LoadCatalog {
        ticket: Ticket,
        channel: String,
        /// Platforms the user asked for; empty means recommended defaults.
        requested: Vec<Platform>,
        /// Platforms discovered earlier for this channel; skips discovery.
        known_available: Option<Vec<Platform>>,
        trace_context: Option<TraceContext>,
    },

    /// Query all records of one package.
    QueryRecords {
        ticket: Ticket,
        channel: String,
        platforms: Vec<Platform>,
        package: String,
        purpose: RecordsPurpose,
        trace_context: Option<TraceContext>,
    },

    /// Download one artifact to `destination`.
    Download {
        ticket: Ticket,
        url: String,
        destination: PathBuf,
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    #[must_use]
    pub const fn ticket(&self) -> &Ticket {
        match self {
            Self::LoadCatalog { ticket, .. }
            | Self::QueryRecords { ticket, .. }
            | Self::Download { ticket, .. } => ticket,
        }
    }

    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::LoadCatalog { trace_context, .. }
            | Self::QueryRecords { trace_context, .. }
            | Self::Download { trace_context, .. } => trace_context.as_ref(),
        }
    }

    /// Builds the failed response for this message, used when the task handling it
    /// dies before answering.
    #[must_use]
    pub fn failure(&self, message: impl Into<String>) -> WorkerResponse {
        let message = message.into();
        match self {
            Self::LoadCatalog { ticket, channel, .. } => WorkerResponse::CatalogLoaded {
                ticket: *ticket,
                channel: channel.clone(),
                result: Err(message),
            },
            Self::QueryRecords {
                ticket,
                package,
                purpose,
                ..
            } => WorkerResponse::RecordsLoaded {
                ticket: *ticket,
                package: package.clone(),
                purpose: purpose.clone(),
                result: Err(message),
            },
            Self::Download {
                ticket, destination, ..
            } => WorkerResponse::DownloadFinished {
                ticket: *ticket,
                file_name: file_name_of(destination),
                result: Err(message),
            },
        }
    }
}

/// File name component of a download destination.
#[must_use]
pub fn file_name_of(destination: &std::path::Path) -> String {
    destination
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// A loaded catalog: discovered platforms, effective selection and package names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPayload {
    pub available: Vec<Platform>,
    pub selected: BTreeSet<Platform>,
    pub names: Vec<String>,
}

/// Results sent from background tasks back to the UI loop.
///
/// Errors travel as display strings; the controller turns them into status text
/// and notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerResponse {
    CatalogLoaded {
        ticket: Ticket,
        channel: String,
        result: Result<CatalogPayload, String>,
    },

    RecordsLoaded {
        ticket: Ticket,
        package: String,
        purpose: RecordsPurpose,
        result: Result<Vec<Record>, String>,
    },

    DownloadFinished {
        ticket: Ticket,
        file_name: String,
        result: Result<PathBuf, String>,
    },
}
