//! Background task implementation for gateway queries and downloads.
//!
//! The UI loop never awaits gateway calls. Each [`WorkerMessage`] is handled in
//! its own tokio task by [`CatalogWorker::dispatch`], and the response travels
//! back over an unbounded channel. Tasks only read their inputs and return
//! results; caches are owned by the controller.

use crate::domain::error::{BrowseError, Result};
use crate::domain::{reconcile_platforms, ArtifactKey, Platform, Record};
use crate::gateway::MetadataGateway;
use crate::worker::download::download_to_path;
use crate::worker::messages::file_name_of;
use crate::worker::{CatalogPayload, WorkerMessage, WorkerResponse};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::Instrument;

/// Handles worker messages against a metadata gateway.
#[derive(Debug)]
pub struct CatalogWorker<G> {
    gateway: G,
    client: reqwest::Client,
    download_timeout: Duration,
    current_platform: Platform,
}

impl<G: MetadataGateway> CatalogWorker<G> {
    /// Creates a worker over `gateway`. Downloads give up when no data arrives
    /// within `download_timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the download client cannot be built.
    pub fn new(gateway: G, download_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("conda-browse/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            gateway,
            client,
            download_timeout,
            current_platform: Platform::current(),
        })
    }

    /// Overrides the platform used for recommended defaults.
    #[must_use]
    pub const fn with_current_platform(mut self, platform: Platform) -> Self {
        self.current_platform = platform;
        self
    }

    /// Handles `message` in a new task and sends the response to `responses`.
    ///
    /// A panicking task still answers: the panic is turned into a failed response
    /// so the controller can release whatever waits on it.
    pub fn dispatch(self: &Arc<Self>, message: WorkerMessage, responses: UnboundedSender<WorkerResponse>) {
        let worker = Arc::clone(self);
        let fallback = message.clone();

        tokio::spawn(async move {
            let task = tokio::spawn(async move { worker.handle_message(message).await });
            let response = match task.await {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(error = %e, message = ?fallback, "worker task failed");
                    fallback.failure(format!("worker task failed: {e}"))
                }
            };

            if responses.send(response).is_err() {
                tracing::debug!("response dropped, UI loop has exited");
            }
        });
    }

    /// Helper for turning operation results into responses with consistent logging.
    fn into_response<T, F>(operation: &str, result: Result<T>, on_done: F) -> WorkerResponse
    where
        F: FnOnce(std::result::Result<T, String>) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation, "worker operation successful");
                on_done(Ok(value))
            }
            Err(e) => {
                tracing::debug!(operation, error = %e, "worker operation failed");
                on_done(Err(e.to_string()))
            }
        }
    }

    async fn load_catalog(
        &self,
        channel: &str,
        requested: &[Platform],
        known_available: Option<Vec<Platform>>,
    ) -> Result<CatalogPayload> {
        let available = match known_available {
            Some(available) => available,
            None => self.gateway.discover_platforms(channel).await?,
        };

        let selected = reconcile_platforms(requested, &available, self.current_platform);
        if selected.is_empty() {
            return Err(BrowseError::NoPlatforms);
        }

        let platforms: Vec<Platform> = selected.iter().copied().collect();
        let names = self.gateway.list_names(channel, &platforms).await?;
        tracing::debug!(channel, ?platforms, name_count = names.len(), "catalog assembled");

        Ok(CatalogPayload {
            available,
            selected,
            names,
        })
    }

    async fn query_records(&self, channel: &str, platforms: &[Platform], package: &str) -> Result<Vec<Record>> {
        let lists = self.gateway.query_records(channel, platforms, package).await?;
        Ok(flatten_records(lists))
    }

    async fn download(&self, url: &str, destination: &Path) -> Result<PathBuf> {
        download_to_path(&self.client, url, destination, self.download_timeout).await
    }

    /// Processes a worker message and returns the matching response.
    ///
    /// The span follows from the span the message was created in.
    pub async fn handle_message(&self, message: WorkerMessage) -> WorkerResponse {
        let span = tracing::debug_span!(
            "worker_handle_message",
            id = message.ticket().id,
            stream = ?message.ticket().stream
        );
        if let Some(context) = message.trace_context() {
            span.follows_from(context.origin.clone());
        }

        self.process(message).instrument(span).await
    }

    async fn process(&self, message: WorkerMessage) -> WorkerResponse {
        match message {
            WorkerMessage::LoadCatalog {
                ticket,
                channel,
                requested,
                known_available,
                ..
            } => {
                let result = self.load_catalog(&channel, &requested, known_available).await;
                Self::into_response("load catalog", result, |result| WorkerResponse::CatalogLoaded {
                    ticket,
                    channel,
                    result,
                })
            }

            WorkerMessage::QueryRecords {
                ticket,
                channel,
                platforms,
                package,
                purpose,
                ..
            } => {
                let result = self.query_records(&channel, &platforms, &package).await;
                Self::into_response("query records", result, |result| WorkerResponse::RecordsLoaded {
                    ticket,
                    package,
                    purpose,
                    result,
                })
            }

            WorkerMessage::Download {
                ticket,
                url,
                destination,
                ..
            } => {
                let result = self.download(&url, &destination).await;
                Self::into_response("download", result, |result| WorkerResponse::DownloadFinished {
                    ticket,
                    file_name: file_name_of(&destination),
                    result,
                })
            }
        }
    }
}

/// Flattens per-platform record lists, keeping one record per artifact. A later
/// record with the same identity replaces an earlier one.
#[must_use]
pub fn flatten_records(lists: Vec<Vec<Record>>) -> Vec<Record> {
    let mut order: Vec<ArtifactKey> = Vec::new();
    let mut unique: HashMap<ArtifactKey, Record> = HashMap::new();

    for record in lists.into_iter().flatten() {
        let key = record.artifact_key();
        if unique.insert(key.clone(), record).is_none() {
            order.push(key);
        }
    }

    order
        .into_iter()
        .filter_map(|key| unique.remove(&key))
        .collect()
}
