//! Package metadata records and artifact identity.
//!
//! A [`Record`] is one repodata entry as decoded by the gateway. The browser only
//! interprets the five fields that make up an [`ArtifactKey`]; everything else is
//! display data.

use crate::domain::version::PackageVersion;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fmt;

/// How a package declares architecture independence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoArchKind {
    #[default]
    None,
    Generic,
    Python,
}

impl NoArchKind {
    /// Interprets the repodata `noarch` field, which is either a string or the
    /// legacy boolean form.
    #[must_use]
    pub fn from_repodata(value: Option<&serde_json::Value>) -> Self {
        match value {
            Some(serde_json::Value::String(kind)) if kind == "python" => Self::Python,
            Some(serde_json::Value::String(kind)) if kind == "generic" => Self::Generic,
            Some(serde_json::Value::Bool(true)) => Self::Generic,
            _ => Self::None,
        }
    }
}

impl fmt::Display for NoArchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Generic => "generic",
            Self::Python => "python",
        })
    }
}

/// One metadata record for a downloadable artifact.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    pub name: String,
    pub version: PackageVersion,
    pub build: String,
    pub build_number: u64,
    pub subdir: String,
    pub file_name: String,
    pub url: String,
    pub channel: String,
    pub size: Option<u64>,
    pub timestamp: Option<DateTime<Utc>>,
    pub license: Option<String>,
    pub license_family: Option<String>,
    pub md5: Option<String>,
    pub sha256: Option<String>,
    pub legacy_bz2_md5: Option<String>,
    pub legacy_bz2_size: Option<u64>,
    pub arch: Option<String>,
    pub platform: Option<String>,
    pub noarch: NoArchKind,
    pub features: Option<String>,
    pub track_features: Vec<String>,
    pub python_site_packages_path: Option<String>,
    pub depends: Vec<String>,
    pub constrains: Vec<String>,
}

impl Record {
    /// Returns the identity of the artifact this record describes.
    #[must_use]
    pub fn artifact_key(&self) -> ArtifactKey {
        ArtifactKey {
            version: self.version.clone(),
            build: self.build.clone(),
            build_number: self.build_number,
            subdir: self.subdir.clone(),
            file_name: self.file_name.clone(),
        }
    }

    /// Returns `true` if this record describes the given artifact.
    #[must_use]
    pub fn matches(&self, key: &ArtifactKey) -> bool {
        self.version == key.version
            && self.build == key.build
            && self.build_number == key.build_number
            && self.subdir == key.subdir
            && self.file_name == key.file_name
    }
}

/// Unique identity of one downloadable artifact.
///
/// Two formats of the same build (`.conda` and `.tar.bz2`) differ in `file_name` and
/// are therefore distinct artifacts.
///
/// Ordering is ascending by version, build string, subdir, build number and file
/// name, in that order; listings sort it in reverse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactKey {
    pub version: PackageVersion,
    pub build: String,
    pub build_number: u64,
    pub subdir: String,
    pub file_name: String,
}

impl Ord for ArtifactKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.version
            .cmp(&other.version)
            .then_with(|| self.build.cmp(&other.build))
            .then_with(|| self.subdir.cmp(&other.subdir))
            .then_with(|| self.build_number.cmp(&other.build_number))
            .then_with(|| self.file_name.cmp(&other.file_name))
    }
}

impl PartialOrd for ArtifactKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
