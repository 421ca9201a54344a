//! Draft editing of the platform selection.
//!
//! The committed selection only changes on apply. While the editor is open every
//! toggle goes to a draft seeded from the committed set, so cancelling is free.

use crate::domain::{recommended_platforms, Platform};
use std::collections::BTreeSet;

/// Result of toggling one platform in the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// The platform is the last one selected and stays selected.
    KeptLast,
}

/// What applying the draft requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitPlan {
    /// The draft matches the committed set; nothing to reload.
    Unchanged,
    /// The draft is empty and cannot be applied.
    Empty,
    /// The committed set must be replaced and the catalog reloaded.
    Replace(BTreeSet<Platform>),
}

/// Draft platform selection for the platforms mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformEditor {
    draft: BTreeSet<Platform>,
}

impl PlatformEditor {
    /// Opens the editor with a draft equal to the committed selection.
    #[must_use]
    pub fn open(committed: &BTreeSet<Platform>) -> Self {
        Self {
            draft: committed.clone(),
        }
    }

    #[must_use]
    pub const fn draft(&self) -> &BTreeSet<Platform> {
        &self.draft
    }

    /// Toggles `platform`, refusing to remove the last selected one.
    pub fn toggle(&mut self, platform: Platform) -> ToggleOutcome {
        if self.draft.contains(&platform) {
            if self.draft.len() == 1 {
                tracing::debug!(%platform, "refusing to deselect last platform");
                return ToggleOutcome::KeptLast;
            }
            self.draft.remove(&platform);
            ToggleOutcome::Removed
        } else {
            self.draft.insert(platform);
            ToggleOutcome::Added
        }
    }

    /// Selects every available platform, or the recommended defaults when every
    /// platform is already selected.
    pub fn toggle_all(&mut self, available: &[Platform], current: Platform) {
        let all: BTreeSet<Platform> = available.iter().copied().collect();
        self.draft = if self.draft == all {
            recommended_platforms(available, current)
        } else {
            all
        };
        tracing::debug!(selected = self.draft.len(), "toggled all platforms");
    }

    /// Returns `true` when every available platform is in the draft.
    #[must_use]
    pub fn selects_all(&self, available: &[Platform]) -> bool {
        available.len() == self.draft.len() && available.iter().all(|p| self.draft.contains(p))
    }

    /// Compares the draft against the committed selection.
    #[must_use]
    pub fn commit(&self, committed: &BTreeSet<Platform>) -> CommitPlan {
        if self.draft.is_empty() {
            CommitPlan::Empty
        } else if &self.draft == committed {
            CommitPlan::Unchanged
        } else {
            CommitPlan::Replace(self.draft.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(platforms: &[Platform]) -> BTreeSet<Platform> {
        platforms.iter().copied().collect()
    }

    #[test]
    fn draft_starts_from_committed_selection() {
        let committed = set(&[Platform::Linux64, Platform::NoArch]);
        let editor = PlatformEditor::open(&committed);
        assert_eq!(editor.draft(), &committed);
        assert_eq!(editor.commit(&committed), CommitPlan::Unchanged);
    }

    #[test]
    fn last_platform_cannot_be_removed() {
        let committed = set(&[Platform::NoArch]);
        let mut editor = PlatformEditor::open(&committed);

        assert_eq!(editor.toggle(Platform::NoArch), ToggleOutcome::KeptLast);
        assert_eq!(editor.draft(), &committed);
    }

    #[test]
    fn toggling_changes_only_the_draft() {
        let committed = set(&[Platform::Linux64, Platform::NoArch]);
        let mut editor = PlatformEditor::open(&committed);

        assert_eq!(editor.toggle(Platform::Osx64), ToggleOutcome::Added);
        assert_eq!(editor.toggle(Platform::Linux64), ToggleOutcome::Removed);

        assert_eq!(
            editor.commit(&committed),
            CommitPlan::Replace(set(&[Platform::Osx64, Platform::NoArch]))
        );
        assert_eq!(committed.len(), 2);
    }

    #[test]
    fn toggle_all_alternates_with_defaults() {
        let available = [Platform::Linux64, Platform::Osx64, Platform::NoArch];
        let mut editor = PlatformEditor::open(&set(&[Platform::NoArch]));

        editor.toggle_all(&available, Platform::Linux64);
        assert!(editor.selects_all(&available));

        editor.toggle_all(&available, Platform::Linux64);
        assert_eq!(editor.draft(), &set(&[Platform::Linux64, Platform::NoArch]));
        assert!(!editor.selects_all(&available));
    }

    #[test]
    fn empty_draft_cannot_be_committed() {
        let mut editor = PlatformEditor::open(&set(&[Platform::NoArch]));
        editor.toggle_all(&[], Platform::Linux64);
        assert_eq!(editor.commit(&set(&[Platform::NoArch])), CommitPlan::Empty);
    }
}
