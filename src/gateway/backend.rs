//! Metadata gateway abstraction.
//!
//! This module defines the [`MetadataGateway`] trait the worker uses to reach a
//! channel's catalog. The trait is minimal and maps directly onto the three
//! queries the browser needs, not onto the repodata format.

use crate::domain::error::Result;
use crate::domain::{Platform, Record};
use std::future::Future;

/// Source of channel metadata.
///
/// Implementations are shared between concurrently running worker tasks, so they
/// must be `Send + Sync` and their futures `Send`.
///
/// # Implementations
///
/// - [`crate::gateway::RepodataGateway`]: `repodata.json` over HTTP
/// - [`crate::gateway::MemoryGateway`]: fixed in-memory catalogs
pub trait MetadataGateway: Send + Sync + 'static {
    /// Lists the platforms the channel serves, `noarch` last.
    ///
    /// # Errors
    ///
    /// Returns an error if no platform of the channel is reachable.
    fn discover_platforms(&self, channel: &str) -> impl Future<Output = Result<Vec<Platform>>> + Send;

    /// Lists the sorted, unique package names across `platforms`.
    ///
    /// # Errors
    ///
    /// Returns an error if any platform's metadata cannot be fetched.
    fn list_names(
        &self,
        channel: &str,
        platforms: &[Platform],
    ) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Returns every record of `package`, one list per platform.
    ///
    /// # Errors
    ///
    /// Returns an error if any platform's metadata cannot be fetched.
    fn query_records(
        &self,
        channel: &str,
        platforms: &[Platform],
        package: &str,
    ) -> impl Future<Output = Result<Vec<Vec<Record>>>> + Send;
}
