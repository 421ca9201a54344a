//! Conda-style version ordering.
//!
//! Versions are compared by meaning, not by text: `1.10` sorts above `1.9`, `1.0rc1`
//! sorts below `1.0`, and `1.0.post1` sorts above it. The parsed form is kept next to
//! the source text so rendering always shows what the channel published.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// One run of digits or letters inside a version segment.
///
/// Variant order is the comparison order: `dev` is below every other word, words
/// compare alphabetically and stay below numbers, and `post` is above everything.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Component {
    Dev,
    Text(String),
    Number(u64),
    Post,
}

const PADDING: Component = Component::Number(0);

/// A package version with conda ordering semantics.
///
/// Equality and hashing use the source text, while ordering compares the parsed
/// value first and falls back to the text, so two spellings of the same version
/// (`1.1` and `1.1.0`) are adjacent but still distinct.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PackageVersion {
    source: String,
    epoch: u64,
    release: Vec<Vec<Component>>,
    local: Vec<Vec<Component>>,
}

impl PackageVersion {
    /// Parses a version string. Parsing never fails; unusual text simply compares
    /// as words.
    ///
    /// # Example
    ///
    /// ```
    /// use conda_browse::domain::PackageVersion;
    ///
    /// let older = PackageVersion::new("1.9");
    /// let newer = PackageVersion::new("1.10");
    /// assert!(older < newer);
    /// assert_eq!(newer.as_str(), "1.10");
    /// ```
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let normalized = source.trim().to_lowercase();

        let (epoch, rest) = match normalized.split_once('!') {
            Some((epoch, rest)) if !epoch.is_empty() && epoch.bytes().all(|b| b.is_ascii_digit()) => {
                (epoch.parse().unwrap_or(u64::MAX), rest.to_string())
            }
            _ => (0, normalized),
        };

        let (public, local) = match rest.split_once('+') {
            Some((public, local)) => (public.to_string(), local.to_string()),
            None => (rest, String::new()),
        };

        Self {
            source,
            epoch,
            release: parse_segments(&public),
            local: parse_segments(&local),
        }
    }

    /// Returns the version as published.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

fn parse_segments(text: &str) -> Vec<Vec<Component>> {
    text.split(['.', '_', '-'])
        .filter(|segment| !segment.is_empty())
        .map(parse_segment)
        .collect()
}

fn parse_segment(segment: &str) -> Vec<Component> {
    let mut components = Vec::new();
    let mut chars = segment.chars().peekable();

    if chars.peek().is_some_and(|c| !c.is_ascii_digit()) {
        components.push(PADDING);
    }

    while let Some(&first) = chars.peek() {
        let numeric = first.is_ascii_digit();
        let mut run = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_ascii_digit() != numeric {
                break;
            }
            run.push(c);
            chars.next();
        }

        components.push(if numeric {
            Component::Number(run.parse().unwrap_or(u64::MAX))
        } else {
            match run.as_str() {
                "dev" => Component::Dev,
                "post" => Component::Post,
                _ => Component::Text(run),
            }
        });
    }

    components
}

fn compare_segments(left: &[Vec<Component>], right: &[Vec<Component>]) -> Ordering {
    let padding = [PADDING];
    let pad = &padding[0];
    for index in 0..left.len().max(right.len()) {
        let a = left.get(index).map_or(&padding[..], Vec::as_slice);
        let b = right.get(index).map_or(&padding[..], Vec::as_slice);

        for part in 0..a.len().max(b.len()) {
            let x = a.get(part).unwrap_or(pad);
            let y = b.get(part).unwrap_or(pad);
            match x.cmp(y) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
    }
    Ordering::Equal
}

impl Ord for PackageVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| compare_segments(&self.release, &other.release))
            .then_with(|| compare_segments(&self.local, &other.local))
            .then_with(|| self.source.cmp(&other.source))
    }
}

impl PartialOrd for PackageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PackageVersion {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for PackageVersion {}

impl Hash for PackageVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
    }
}

impl Default for PackageVersion {
    fn default() -> Self {
        Self::new("0")
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl From<String> for PackageVersion {
    fn from(source: String) -> Self {
        Self::new(source)
    }
}

impl From<&str> for PackageVersion {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl From<PackageVersion> for String {
    fn from(version: PackageVersion) -> Self {
        version.source
    }
}

#[cfg(test)]
mod tests {
    use super::PackageVersion;

    fn sorted(versions: &[&str]) -> Vec<String> {
        let mut parsed: Vec<PackageVersion> =
            versions.iter().map(|v| PackageVersion::new(*v)).collect();
        parsed.sort();
        parsed.into_iter().map(String::from).collect()
    }

    #[test]
    fn numeric_segments_compare_numerically() {
        assert_eq!(sorted(&["1.10", "1.9", "1.2"]), vec!["1.2", "1.9", "1.10"]);
    }

    #[test]
    fn prereleases_sort_below_releases() {
        assert_eq!(
            sorted(&["1.0", "1.0rc1", "1.0dev1", "1.0a2", "1.0b1", "1.0.post1"]),
            vec!["1.0dev1", "1.0a2", "1.0b1", "1.0rc1", "1.0", "1.0.post1"]
        );
    }

    #[test]
    fn epoch_dominates_release() {
        assert!(PackageVersion::new("1!0.1") > PackageVersion::new("2024.1"));
    }

    #[test]
    fn separators_and_case_are_normalized() {
        let dashed = PackageVersion::new("1-2_3");
        assert!(dashed > PackageVersion::new("1.2.2"));
        assert!(dashed < PackageVersion::new("1.2.4"));
        assert!(PackageVersion::new("1.0RC1") < PackageVersion::new("1.0"));
    }

    #[test]
    fn equivalent_spellings_are_distinct_but_adjacent() {
        let short = PackageVersion::new("1.1");
        let long = PackageVersion::new("1.1.0");
        assert_ne!(short, long);
        assert!(short < long);
        assert!(long < PackageVersion::new("1.1.1"));
        assert!(PackageVersion::new("1.0.9") < short);
    }

    #[test]
    fn local_versions_compare_after_public_part() {
        assert!(PackageVersion::new("1.0+1") > PackageVersion::new("1.0"));
        assert!(PackageVersion::new("1.0+2") > PackageVersion::new("1.0+1"));
        assert!(PackageVersion::new("1.1") > PackageVersion::new("1.0+99"));
    }

    #[test]
    fn displays_source_text() {
        assert_eq!(PackageVersion::new("2.0.0RC1").to_string(), "2.0.0RC1");
    }
}
