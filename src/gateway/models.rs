//! Wire models for `repodata.json` documents.
//!
//! These types mirror the on-disk JSON layout and stay separate from the domain
//! [`Record`] so the controller never depends on repodata quirks (millisecond
//! timestamps, string-or-list `track_features`, boolean `noarch`).

use crate::domain::{NoArchKind, PackageVersion, Record};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// Timestamps above this are milliseconds since the epoch (year 9999 in seconds).
const MAX_SECONDS_TIMESTAMP: i64 = 253_402_300_799;

/// The `info` block of a repodata document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepodataInfo {
    #[serde(default)]
    pub subdir: Option<String>,
}

/// A whole `repodata.json` document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepodataDocument {
    #[serde(default)]
    pub info: Option<RepodataInfo>,

    /// Legacy `.tar.bz2` artifacts keyed by file name.
    #[serde(default)]
    pub packages: HashMap<String, RawRecord>,

    /// `.conda` artifacts keyed by file name.
    #[serde(default, rename = "packages.conda")]
    pub conda_packages: HashMap<String, RawRecord>,
}

impl RepodataDocument {
    /// Returns `true` if the document lists no artifacts at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.conda_packages.is_empty()
    }

    /// Decodes every entry into domain records.
    ///
    /// `subdir` is used when an entry does not name its own subdir.
    #[must_use]
    pub fn into_records(self, channel_url: &str, channel: &str, subdir: &str) -> Vec<Record> {
        let subdir = self
            .info
            .and_then(|info| info.subdir)
            .unwrap_or_else(|| subdir.to_string());

        self.packages
            .into_iter()
            .chain(self.conda_packages)
            .map(|(file_name, raw)| raw.into_record(file_name, channel_url, channel, &subdir))
            .collect()
    }
}

/// One package entry as stored in repodata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub build: String,
    #[serde(default)]
    pub build_number: u64,
    #[serde(default)]
    pub subdir: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub license_family: Option<String>,
    #[serde(default)]
    pub md5: Option<String>,
    #[serde(default)]
    pub sha256: Option<String>,
    #[serde(default)]
    pub legacy_bz2_md5: Option<String>,
    #[serde(default)]
    pub legacy_bz2_size: Option<u64>,
    #[serde(default)]
    pub arch: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub noarch: Option<serde_json::Value>,
    #[serde(default)]
    pub features: Option<String>,
    #[serde(default)]
    pub track_features: Option<serde_json::Value>,
    #[serde(default)]
    pub python_site_packages_path: Option<String>,
    #[serde(default)]
    pub depends: Vec<String>,
    #[serde(default)]
    pub constrains: Vec<String>,
}

impl RawRecord {
    /// Converts the entry into a domain record.
    #[must_use]
    pub fn into_record(self, file_name: String, channel_url: &str, channel: &str, subdir: &str) -> Record {
        let subdir = self.subdir.unwrap_or_else(|| subdir.to_string());
        let url = format!("{channel_url}/{subdir}/{file_name}");

        Record {
            name: self.name,
            version: PackageVersion::new(self.version),
            build: self.build,
            build_number: self.build_number,
            file_name,
            url,
            channel: channel.to_string(),
            size: self.size,
            timestamp: self.timestamp.and_then(parse_timestamp),
            license: self.license,
            license_family: self.license_family,
            md5: self.md5,
            sha256: self.sha256,
            legacy_bz2_md5: self.legacy_bz2_md5,
            legacy_bz2_size: self.legacy_bz2_size,
            arch: self.arch,
            platform: self.platform,
            noarch: NoArchKind::from_repodata(self.noarch.as_ref()),
            features: self.features.filter(|features| !features.trim().is_empty()),
            track_features: parse_track_features(self.track_features.as_ref()),
            python_site_packages_path: self.python_site_packages_path,
            depends: self.depends,
            constrains: self.constrains,
            subdir,
        }
    }
}

fn parse_timestamp(value: i64) -> Option<DateTime<Utc>> {
    if value > MAX_SECONDS_TIMESTAMP {
        DateTime::from_timestamp_millis(value)
    } else {
        DateTime::from_timestamp(value, 0)
    }
}

/// `track_features` is either a space or comma separated string or a list.
fn parse_track_features(value: Option<&serde_json::Value>) -> Vec<String> {
    match value {
        Some(serde_json::Value::String(features)) => features
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|feature| !feature.is_empty())
            .map(str::to_string)
            .collect(),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(serde_json::Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "info": {"subdir": "linux-64"},
        "packages": {
            "demo-1.0-h0_0.tar.bz2": {
                "name": "demo", "version": "1.0", "build": "h0_0", "build_number": 0,
                "depends": ["libc"], "timestamp": 1700000000000,
                "track_features": "a b,c", "noarch": true
            }
        },
        "packages.conda": {
            "demo-1.0-h0_0.conda": {
                "name": "demo", "version": "1.0", "build": "h0_0", "build_number": 0,
                "size": 1024, "license": "MIT", "timestamp": 1700000000
            }
        }
    }"#;

    #[test]
    fn decodes_both_package_tables() {
        let document: RepodataDocument = serde_json::from_str(DOCUMENT).unwrap();
        let mut records = document.into_records("https://conda.anaconda.org/demo", "demo", "noarch");
        records.sort_by(|a, b| a.file_name.cmp(&b.file_name));

        assert_eq!(records.len(), 2);
        let conda = &records[0];
        assert_eq!(conda.file_name, "demo-1.0-h0_0.conda");
        assert_eq!(conda.subdir, "linux-64");
        assert_eq!(conda.url, "https://conda.anaconda.org/demo/linux-64/demo-1.0-h0_0.conda");
        assert_eq!(conda.size, Some(1024));
        assert_eq!(conda.license.as_deref(), Some("MIT"));
    }

    #[test]
    fn normalizes_legacy_fields() {
        let document: RepodataDocument = serde_json::from_str(DOCUMENT).unwrap();
        let records = document.into_records("https://conda.anaconda.org/demo", "demo", "linux-64");
        let legacy = records
            .iter()
            .find(|record| record.file_name.ends_with(".tar.bz2"))
            .unwrap();
        let modern = records.iter().find(|record| record.file_name.ends_with(".conda")).unwrap();

        assert_eq!(legacy.noarch, NoArchKind::Generic);
        assert_eq!(legacy.track_features, vec!["a", "b", "c"]);
        assert_eq!(legacy.timestamp, modern.timestamp);
        assert_eq!(legacy.depends, vec!["libc"]);
    }

    #[test]
    fn empty_document_is_empty() {
        let document: RepodataDocument = serde_json::from_str("{}").unwrap();
        assert!(document.is_empty());
    }
}
