//! Deduplicated, ordered artifact listings.
//!
//! Gateways return one record list per platform source, and the same artifact can
//! show up more than once. [`ArtifactSet`] collapses those into unique
//! [`ArtifactKey`]s, newest first, and groups them by subdir for the versions view.

use crate::domain::record::{ArtifactKey, Record};
use std::cmp::{Ordering, Reverse};
use std::collections::HashSet;

/// Orders subdir names alphabetically with `noarch` after every real platform.
#[must_use]
pub fn compare_subdirs(a: &str, b: &str) -> Ordering {
    (a == "noarch", a).cmp(&(b == "noarch", b))
}

/// Artifacts of one subdir, in listing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubdirGroup<'a> {
    pub subdir: &'a str,
    pub artifacts: Vec<&'a ArtifactKey>,
}

/// The unique artifacts of one package, sorted descending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSet {
    artifacts: Vec<ArtifactKey>,
}

impl ArtifactSet {
    /// Builds the set from records of a single package.
    ///
    /// # Example
    ///
    /// ```
    /// use conda_browse::domain::{ArtifactSet, PackageVersion, Record};
    ///
    /// let record = |version: &str, file: &str| Record {
    ///     name: "demo".to_string(),
    ///     version: PackageVersion::new(version),
    ///     build: "h0_0".to_string(),
    ///     subdir: "noarch".to_string(),
    ///     file_name: file.to_string(),
    ///     ..Record::default()
    /// };
    ///
    /// let set = ArtifactSet::from_records(&[
    ///     record("1.0", "demo-1.0-h0_0.conda"),
    ///     record("1.0", "demo-1.0-h0_0.conda"),
    ///     record("1.2", "demo-1.2-h0_0.conda"),
    /// ]);
    /// assert_eq!(set.len(), 2);
    /// assert_eq!(set.artifacts()[0].version.as_str(), "1.2");
    /// ```
    #[must_use]
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut seen = HashSet::new();
        let mut artifacts: Vec<ArtifactKey> = records
            .into_iter()
            .map(Record::artifact_key)
            .filter(|key| seen.insert(key.clone()))
            .collect();

        artifacts.sort_by(|a, b| b.cmp(a));

        tracing::debug!(artifact_count = artifacts.len(), "built artifact set");
        Self { artifacts }
    }

    /// Returns all artifacts, newest first.
    #[must_use]
    pub fn artifacts(&self) -> &[ArtifactKey] {
        &self.artifacts
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Groups artifacts by subdir, with groups ordered by [`compare_subdirs`] and
    /// each group keeping the descending artifact order.
    #[must_use]
    pub fn groups(&self) -> Vec<SubdirGroup<'_>> {
        let mut groups: Vec<SubdirGroup<'_>> = Vec::new();
        for artifact in &self.artifacts {
            match groups.iter_mut().find(|g| g.subdir == artifact.subdir) {
                Some(group) => group.artifacts.push(artifact),
                None => groups.push(SubdirGroup {
                    subdir: &artifact.subdir,
                    artifacts: vec![artifact],
                }),
            }
        }
        groups.sort_by(|a, b| compare_subdirs(a.subdir, b.subdir));
        groups
    }

    /// Number of distinct subdirs in the set.
    #[must_use]
    pub fn subdir_count(&self) -> usize {
        self.artifacts
            .iter()
            .map(|a| a.subdir.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

/// Sorts records newest first using artifact ordering.
pub fn sort_records_descending(records: &mut [Record]) {
    records.sort_by_cached_key(|record| Reverse(record.artifact_key()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PackageVersion;

    fn record(version: &str, build: &str, number: u64, subdir: &str, file: &str) -> Record {
        Record {
            name: "demo".to_string(),
            version: PackageVersion::new(version),
            build: build.to_string(),
            build_number: number,
            subdir: subdir.to_string(),
            file_name: file.to_string(),
            ..Record::default()
        }
    }

    #[test]
    fn keeps_both_formats_of_one_build() {
        let set = ArtifactSet::from_records(&[
            record("1.2.3", "py313h123_0", 0, "noarch", "demo-1.2.3-py313h123_0.conda"),
            record("1.2.3", "py313h123_0", 0, "noarch", "demo-1.2.3-py313h123_0.tar.bz2"),
        ]);

        let files: HashSet<&str> = set.artifacts().iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(
            files,
            HashSet::from(["demo-1.2.3-py313h123_0.conda", "demo-1.2.3-py313h123_0.tar.bz2"])
        );
    }

    #[test]
    fn duplicates_differing_only_in_payload_collapse() {
        let mut first = record("1.0", "h1_0", 0, "linux-64", "demo-1.0-h1_0.conda");
        first.size = Some(10);
        let mut second = first.clone();
        second.size = Some(20);
        second.url = "https://mirror.example/demo-1.0-h1_0.conda".to_string();

        let set = ArtifactSet::from_records(&[first, second]);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn sorts_by_semantic_version_then_build_then_subdir() {
        let set = ArtifactSet::from_records(&[
            record("1.9", "a", 0, "linux-64", "f1"),
            record("1.10", "a", 0, "linux-64", "f2"),
            record("1.10", "b", 0, "linux-64", "f3"),
            record("1.10", "b", 0, "osx-64", "f4"),
            record("1.10", "b", 1, "osx-64", "f5"),
        ]);

        let files: Vec<&str> = set.artifacts().iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(files, vec!["f5", "f4", "f3", "f2", "f1"]);
    }

    #[test]
    fn groups_pin_noarch_last() {
        let set = ArtifactSet::from_records(&[
            record("1.0", "a", 0, "noarch", "n"),
            record("1.0", "a", 0, "win-64", "w"),
            record("2.0", "a", 0, "linux-64", "l2"),
            record("1.0", "a", 0, "linux-64", "l1"),
        ]);

        let groups = set.groups();
        let subdirs: Vec<&str> = groups.iter().map(|g| g.subdir).collect();
        assert_eq!(subdirs, vec!["linux-64", "win-64", "noarch"]);

        let linux: Vec<&str> = groups[0].artifacts.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(linux, vec!["l2", "l1"]);
        assert_eq!(set.subdir_count(), 3);
    }

    #[test]
    fn sorts_records_newest_first() {
        let mut records = vec![
            record("0.9", "a", 0, "noarch", "old"),
            record("1.1", "a", 0, "noarch", "new"),
        ];
        sort_records_descending(&mut records);
        assert_eq!(records[0].file_name, "new");
    }
}
