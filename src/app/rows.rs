//! Flattened, collapsible rows of the versions view.
//!
//! The versions list starts with a back row, then one section row per subdir
//! followed by that subdir's artifacts. Collapsing a section hides its artifact rows
//! without touching the underlying [`ArtifactSet`].

use crate::domain::{ArtifactKey, ArtifactSet};
use std::collections::BTreeSet;

/// One row of the versions list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRow {
    /// Returns to the package list.
    Back,
    /// Header of a subdir group.
    Section(String),
    /// One artifact.
    Entry { subdir: String, artifact: ArtifactKey },
    /// Shown instead of sections when the package has no artifacts.
    Empty,
}

/// The versions view of one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionView {
    package: String,
    artifacts: ArtifactSet,
    collapsed: BTreeSet<String>,
    rows: Vec<VersionRow>,
}

impl VersionView {
    /// Builds the view with every section expanded.
    #[must_use]
    pub fn new(package: impl Into<String>, artifacts: ArtifactSet) -> Self {
        let mut view = Self {
            package: package.into(),
            artifacts,
            collapsed: BTreeSet::new(),
            rows: Vec::new(),
        };
        view.rebuild();
        view
    }

    fn rebuild(&mut self) {
        let mut rows = vec![VersionRow::Back];

        if self.artifacts.is_empty() {
            rows.push(VersionRow::Empty);
        }

        for group in self.artifacts.groups() {
            rows.push(VersionRow::Section(group.subdir.to_string()));
            if self.collapsed.contains(group.subdir) {
                continue;
            }
            rows.extend(group.artifacts.into_iter().map(|artifact| VersionRow::Entry {
                subdir: group.subdir.to_string(),
                artifact: artifact.clone(),
            }));
        }

        self.rows = rows;
    }

    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    #[must_use]
    pub const fn artifacts(&self) -> &ArtifactSet {
        &self.artifacts
    }

    #[must_use]
    pub fn rows(&self) -> &[VersionRow] {
        &self.rows
    }

    #[must_use]
    pub fn row(&self, index: usize) -> Option<&VersionRow> {
        self.rows.get(index)
    }

    #[must_use]
    pub fn is_collapsed(&self, subdir: &str) -> bool {
        self.collapsed.contains(subdir)
    }

    /// Number of artifacts in `subdir`, collapsed or not.
    #[must_use]
    pub fn section_len(&self, subdir: &str) -> usize {
        self.artifacts
            .artifacts()
            .iter()
            .filter(|artifact| artifact.subdir == subdir)
            .count()
    }

    /// Collapses or expands `subdir` and returns the new index of its section row.
    pub fn toggle_section(&mut self, subdir: &str) -> Option<usize> {
        if !self.collapsed.remove(subdir) {
            self.collapsed.insert(subdir.to_string());
        }
        tracing::debug!(subdir, collapsed = self.is_collapsed(subdir), "toggled section");
        self.rebuild();
        self.rows
            .iter()
            .position(|row| matches!(row, VersionRow::Section(s) if s == subdir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PackageVersion, Record};

    fn record(version: &str, subdir: &str) -> Record {
        Record {
            name: "demo".to_string(),
            version: PackageVersion::new(version),
            build: "h0_0".to_string(),
            subdir: subdir.to_string(),
            file_name: format!("demo-{version}-{subdir}.conda"),
            ..Record::default()
        }
    }

    fn view() -> VersionView {
        let records = [
            record("1.0", "noarch"),
            record("2.0", "linux-64"),
            record("1.0", "linux-64"),
            record("2.0", "osx-64"),
        ];
        VersionView::new("demo", ArtifactSet::from_records(&records))
    }

    fn shape(rows: &[VersionRow]) -> Vec<String> {
        rows.iter()
            .map(|row| match row {
                VersionRow::Back => "back".to_string(),
                VersionRow::Section(subdir) => format!("[{subdir}]"),
                VersionRow::Entry { artifact, .. } => artifact.version.to_string(),
                VersionRow::Empty => "empty".to_string(),
            })
            .collect()
    }

    #[test]
    fn rows_are_grouped_by_subdir_with_noarch_last() {
        assert_eq!(
            shape(view().rows()),
            vec!["back", "[linux-64]", "2.0", "1.0", "[osx-64]", "2.0", "[noarch]", "1.0"]
        );
    }

    #[test]
    fn collapse_and_expand_restores_original_rows() {
        let mut view = view();
        let original = view.rows().to_vec();

        assert_eq!(view.toggle_section("linux-64"), Some(1));
        assert_eq!(
            shape(view.rows()),
            vec!["back", "[linux-64]", "[osx-64]", "2.0", "[noarch]", "1.0"]
        );
        assert_eq!(view.section_len("linux-64"), 2);

        assert_eq!(view.toggle_section("linux-64"), Some(1));
        assert_eq!(view.rows(), original.as_slice());
    }

    #[test]
    fn empty_package_shows_empty_row() {
        let view = VersionView::new("demo", ArtifactSet::default());
        assert_eq!(view.rows(), &[VersionRow::Back, VersionRow::Empty]);
    }
}
