//! Record cache keyed by package name.

use crate::domain::Record;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// Records for one package, newest first, shared cheaply with background tasks.
pub type PackageRecords = Arc<Vec<Record>>;

/// Memoized record lists for the current channel and platform selection.
#[derive(Debug, Clone, Default)]
pub struct RecordCache {
    entries: HashMap<String, PackageRecords>,
}

impl RecordCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns cached records for `package`, if any.
    #[must_use]
    pub fn get(&self, package: &str) -> Option<PackageRecords> {
        self.entries.get(package).cloned()
    }

    #[must_use]
    pub fn contains(&self, package: &str) -> bool {
        self.entries.contains_key(package)
    }

    /// Stores records for `package`, replacing any previous entry.
    pub fn insert(&mut self, package: impl Into<String>, records: Vec<Record>) -> PackageRecords {
        let records = Arc::new(records);
        self.entries.insert(package.into(), Arc::clone(&records));
        records
    }

    /// Returns the cached records, or awaits `loader`, stores its result and
    /// returns it. Concurrent callers are not coalesced.
    ///
    /// This is the memoizing helper for callers that may await in place. The UI
    /// loop never awaits: it checks [`RecordCache::get`], posts a worker query on
    /// a miss and stores the response with [`RecordCache::insert`].
    ///
    /// # Errors
    ///
    /// Returns the loader's error unchanged; nothing is cached in that case.
    pub async fn get_or_load<F, Fut, E>(&mut self, package: &str, loader: F) -> Result<PackageRecords, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Record>, E>>,
    {
        if let Some(records) = self.get(package) {
            tracing::debug!(package, "record cache hit");
            return Ok(records);
        }

        tracing::debug!(package, "record cache miss");
        let records = loader().await?;
        Ok(self.insert(package, records))
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        tracing::debug!(entries = self.entries.len(), "clearing record cache");
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PackageVersion;

    fn records(version: &str) -> Vec<Record> {
        vec![Record {
            name: "demo".to_string(),
            version: PackageVersion::new(version),
            ..Record::default()
        }]
    }

    #[tokio::test]
    async fn get_or_load_invokes_loader_once() {
        let mut cache = RecordCache::new();
        let mut calls = 0;

        let first = cache
            .get_or_load("demo", || {
                calls += 1;
                async { Ok::<_, String>(records("1.0")) }
            })
            .await
            .unwrap();
        let second = cache
            .get_or_load("demo", || {
                calls += 1;
                async { Ok::<_, String>(records("2.0")) }
            })
            .await
            .unwrap();

        assert_eq!(calls, 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second[0].version.as_str(), "1.0");
    }

    #[tokio::test]
    async fn failed_load_is_not_cached() {
        let mut cache = RecordCache::new();
        let result = cache
            .get_or_load("demo", || async { Err::<Vec<Record>, _>("offline") })
            .await;

        assert_eq!(result.unwrap_err(), "offline");
        assert!(!cache.contains("demo"));
    }

    #[test]
    fn clear_drops_everything() {
        let mut cache = RecordCache::new();
        cache.insert("a", records("1"));
        cache.insert("b", records("2"));
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get("a").is_none());
    }
}
