//! In-memory gateway over fixed catalogs.

use crate::domain::error::{BrowseError, Result};
use crate::domain::{Platform, Record};
use crate::gateway::MetadataGateway;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Duration;

/// Gateway answering from records registered up front.
///
/// Unknown channels fail discovery like unreachable ones. An optional per-package
/// delay makes record queries resolve out of order, and platforms marked
/// unreachable are discovered but fail every later query.
#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    channels: HashMap<String, HashMap<Platform, Vec<Record>>>,
    delays: HashMap<String, Duration>,
    unreachable: HashSet<Platform>,
}

impl MemoryGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `records` for `channel` under `platform`. The records' `subdir`
    /// and `channel` fields are filled in.
    #[must_use]
    pub fn with_records(mut self, channel: &str, platform: Platform, records: Vec<Record>) -> Self {
        let records = records.into_iter().map(|mut record| {
            record.subdir = platform.as_str().to_string();
            record.channel = channel.to_string();
            record
        });
        self.channels
            .entry(channel.to_string())
            .or_default()
            .entry(platform)
            .or_default()
            .extend(records);
        self
    }

    /// Delays record queries for `package`.
    #[must_use]
    pub fn with_delay(mut self, package: &str, delay: Duration) -> Self {
        self.delays.insert(package.to_string(), delay);
        self
    }

    /// Makes name listings and record queries fail when they include `platform`.
    #[must_use]
    pub fn with_unreachable(mut self, platform: Platform) -> Self {
        self.unreachable.insert(platform);
        self
    }

    fn check_reachable(&self, platforms: &[Platform]) -> Result<()> {
        match platforms.iter().find(|platform| self.unreachable.contains(platform)) {
            Some(platform) => Err(BrowseError::Gateway(format!("{platform} repodata is unreachable"))),
            None => Ok(()),
        }
    }

    fn catalog(&self, channel: &str) -> Result<&HashMap<Platform, Vec<Record>>> {
        self.channels
            .get(channel)
            .ok_or_else(|| BrowseError::Gateway(format!("unknown channel: {channel}")))
    }

    fn platform_records<'a>(
        catalog: &'a HashMap<Platform, Vec<Record>>,
        platforms: &'a [Platform],
    ) -> impl Iterator<Item = &'a [Record]> {
        platforms
            .iter()
            .map(|platform| catalog.get(platform).map_or(&[][..], Vec::as_slice))
    }
}

impl MetadataGateway for MemoryGateway {
    async fn discover_platforms(&self, channel: &str) -> Result<Vec<Platform>> {
        let catalog = self.catalog(channel).map_err(|_| BrowseError::NoPlatforms)?;
        let mut platforms: Vec<Platform> = catalog
            .iter()
            .filter(|(_, records)| !records.is_empty())
            .map(|(platform, _)| *platform)
            .collect();
        if platforms.is_empty() {
            return Err(BrowseError::NoPlatforms);
        }
        platforms.sort();
        Ok(platforms)
    }

    async fn list_names(&self, channel: &str, platforms: &[Platform]) -> Result<Vec<String>> {
        self.check_reachable(platforms)?;
        let catalog = self.catalog(channel)?;
        let names: BTreeSet<String> = Self::platform_records(catalog, platforms)
            .flatten()
            .map(|record| record.name.clone())
            .collect();
        Ok(names.into_iter().collect())
    }

    async fn query_records(&self, channel: &str, platforms: &[Platform], package: &str) -> Result<Vec<Vec<Record>>> {
        if let Some(delay) = self.delays.get(package) {
            tokio::time::sleep(*delay).await;
        }

        self.check_reachable(platforms)?;
        let catalog = self.catalog(channel)?;
        Ok(Self::platform_records(catalog, platforms)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PackageVersion;

    fn record(name: &str, version: &str) -> Record {
        Record {
            name: name.to_string(),
            version: PackageVersion::new(version),
            build: "0".to_string(),
            file_name: format!("{name}-{version}-0.conda"),
            ..Record::default()
        }
    }

    fn gateway() -> MemoryGateway {
        MemoryGateway::new()
            .with_records("demo", Platform::NoArch, vec![record("alpha", "1.0"), record("beta", "2.0")])
            .with_records("demo", Platform::Linux64, vec![record("alpha", "1.1")])
    }

    #[tokio::test]
    async fn discovers_registered_platforms_with_noarch_last() {
        let platforms = gateway().discover_platforms("demo").await.unwrap();
        assert_eq!(platforms, vec![Platform::Linux64, Platform::NoArch]);
    }

    #[tokio::test]
    async fn unknown_channel_has_no_platforms() {
        let error = gateway().discover_platforms("missing").await.unwrap_err();
        assert!(matches!(error, BrowseError::NoPlatforms));
    }

    #[tokio::test]
    async fn lists_names_across_selected_platforms() {
        let gateway = gateway();
        assert_eq!(
            gateway.list_names("demo", &[Platform::Linux64]).await.unwrap(),
            vec!["alpha"]
        );
        assert_eq!(
            gateway
                .list_names("demo", &[Platform::Linux64, Platform::NoArch])
                .await
                .unwrap(),
            vec!["alpha", "beta"]
        );
    }

    #[tokio::test]
    async fn queries_records_per_platform() {
        let lists = gateway()
            .query_records("demo", &[Platform::Linux64, Platform::NoArch], "alpha")
            .await
            .unwrap();

        assert_eq!(lists.len(), 2);
        assert_eq!(lists[0][0].subdir, "linux-64");
        assert_eq!(lists[1][0].version.as_str(), "1.0");
    }

    #[tokio::test]
    async fn unreachable_platform_is_discovered_but_fails_queries() {
        let gateway = gateway().with_unreachable(Platform::Linux64);

        assert!(gateway.discover_platforms("demo").await.unwrap().contains(&Platform::Linux64));
        assert!(gateway.list_names("demo", &[Platform::NoArch]).await.is_ok());
        assert!(matches!(
            gateway.list_names("demo", &[Platform::Linux64]).await,
            Err(BrowseError::Gateway(_))
        ));
        assert!(gateway
            .query_records("demo", &[Platform::NoArch, Platform::Linux64], "alpha")
            .await
            .is_err());
    }
}
