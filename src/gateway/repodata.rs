//! HTTP gateway over plain `repodata.json` documents.
//!
//! Each (channel, platform) document is fetched at most once per gateway and kept
//! in memory, so listing names and querying records after discovery never refetch.
//! Only documents of the most recently fetched channel are kept.
//!
//! Every request gives up when the server stays silent for longer than the
//! configured timeout: probes and response headers as a whole, bodies per chunk.

use crate::domain::error::{BrowseError, Result};
use crate::domain::{Platform, Record};
use crate::gateway::models::RepodataDocument;
use crate::gateway::MetadataGateway;
use futures_util::future::try_join_all;
use futures_util::stream::{self, StreamExt};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::timeout;

/// Channel host used for bare channel names.
pub const DEFAULT_BASE_URL: &str = "https://conda.anaconda.org";

/// Maximum number of platform probes in flight.
const PROBE_CONCURRENCY: usize = 12;

const USER_AGENT: &str = concat!("conda-browse/", env!("CARGO_PKG_VERSION"));

type SubdirKey = (String, Platform);

/// Metadata gateway reading `repodata.json` over HTTP.
#[derive(Debug, Clone)]
pub struct RepodataGateway {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    subdirs: Arc<Mutex<HashMap<SubdirKey, Arc<Vec<Record>>>>>,
}

impl RepodataGateway {
    /// Creates a gateway whose requests give up after `timeout` without data.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
            subdirs: Arc::default(),
        })
    }

    /// Points bare channel names at another host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Full URL of a channel. Channels given as URLs are used verbatim.
    #[must_use]
    pub fn channel_url(&self, channel: &str) -> String {
        if channel.contains("://") {
            channel.trim_end_matches('/').to_string()
        } else {
            format!("{}/{channel}", self.base_url)
        }
    }

    fn repodata_url(&self, channel: &str, platform: Platform) -> String {
        format!("{}/{platform}/repodata.json", self.channel_url(channel))
    }

    fn cached(&self, key: &SubdirKey) -> Option<Arc<Vec<Record>>> {
        self.subdirs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Stores a decoded document, dropping documents of other channels.
    fn remember(&self, key: SubdirKey, records: Arc<Vec<Record>>) {
        let mut subdirs = self.subdirs.lock().unwrap_or_else(PoisonError::into_inner);
        let before = subdirs.len();
        subdirs.retain(|(channel, _), _| *channel == key.0);
        if subdirs.len() < before {
            tracing::debug!(channel = %key.0, evicted = before - subdirs.len(), "dropped repodata of other channels");
        }
        subdirs.insert(key, records);
    }

    async fn probe(&self, channel: &str, platform: Platform) -> bool {
        let url = self.repodata_url(channel, platform);
        match timeout(self.timeout, self.client.head(&url).send()).await {
            Ok(Ok(response)) => response.status().is_success(),
            Ok(Err(e)) => {
                tracing::debug!(url = %url, error = %e, "platform probe failed");
                false
            }
            Err(_) => {
                tracing::debug!(url = %url, "platform probe timed out");
                false
            }
        }
    }

    /// Reads a response body, failing when no chunk arrives within the timeout.
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = timeout(self.timeout, self.client.get(url).send())
            .await
            .map_err(|_| BrowseError::Timeout(self.timeout))??
            .error_for_status()?;

        let mut body = Vec::new();
        let mut chunks = std::pin::pin!(response.bytes_stream());
        while let Some(chunk) = timeout(self.timeout, chunks.next())
            .await
            .map_err(|_| BrowseError::Timeout(self.timeout))?
        {
            body.extend_from_slice(&chunk?);
        }
        Ok(body)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn fetch_subdir(&self, channel: &str, platform: Platform) -> Result<Arc<Vec<Record>>> {
        let key = (channel.to_string(), platform);
        if let Some(records) = self.cached(&key) {
            return Ok(records);
        }

        let url = self.repodata_url(channel, platform);
        tracing::debug!(url = %url, "fetching repodata");
        let bytes = self.fetch_bytes(&url).await?;

        let document: RepodataDocument = serde_json::from_slice(&bytes)?;
        let records = Arc::new(document.into_records(&self.channel_url(channel), channel, platform.as_str()));
        tracing::debug!(url = %url, record_count = records.len(), "repodata decoded");

        self.remember(key, Arc::clone(&records));
        Ok(records)
    }

    async fn fetch_all(&self, channel: &str, platforms: &[Platform]) -> Result<Vec<Arc<Vec<Record>>>> {
        try_join_all(platforms.iter().map(|platform| self.fetch_subdir(channel, *platform))).await
    }
}

impl MetadataGateway for RepodataGateway {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn discover_platforms(&self, channel: &str) -> Result<Vec<Platform>> {
        let probes = stream::iter(Platform::ALL)
            .map(|platform| async move { (platform, self.probe(channel, platform).await) })
            .buffer_unordered(PROBE_CONCURRENCY)
            .collect::<Vec<_>>()
            .await;

        let mut available: Vec<Platform> = probes
            .into_iter()
            .filter_map(|(platform, reachable)| reachable.then_some(platform))
            .collect();
        if available.is_empty() {
            return Err(BrowseError::NoPlatforms);
        }

        available.sort();
        tracing::debug!(?available, "platforms discovered");
        Ok(available)
    }

    async fn list_names(&self, channel: &str, platforms: &[Platform]) -> Result<Vec<String>> {
        let subdirs = self.fetch_all(channel, platforms).await?;
        let names: BTreeSet<&str> = subdirs
            .iter()
            .flat_map(|records| records.iter())
            .map(|record| record.name.as_str())
            .collect();
        Ok(names.into_iter().map(str::to_string).collect())
    }

    async fn query_records(&self, channel: &str, platforms: &[Platform], package: &str) -> Result<Vec<Vec<Record>>> {
        let subdirs = self.fetch_all(channel, platforms).await?;
        Ok(subdirs
            .iter()
            .map(|records| {
                records
                    .iter()
                    .filter(|record| record.name == package)
                    .cloned()
                    .collect()
            })
            .collect())
    }
}
