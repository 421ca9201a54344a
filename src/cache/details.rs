//! Rendered preview cache, tied to the content width.

use crate::app::preview::PreviewKey;
use std::collections::HashMap;
use std::sync::Arc;

/// Rendered detail text keyed by what it shows.
///
/// Detail boxes are wrapped to the content width, so the cache remembers the width
/// its entries were rendered for and empties itself when that changes.
#[derive(Debug, Clone, Default)]
pub struct DetailCache {
    width: u16,
    entries: HashMap<PreviewKey, Arc<str>>,
}

impl DetailCache {
    #[must_use]
    pub fn new(width: u16) -> Self {
        Self {
            width,
            entries: HashMap::new(),
        }
    }

    /// Width the cached entries were rendered for.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Updates the content width, clearing the cache when it differs.
    ///
    /// Returns `true` if entries were invalidated.
    pub fn set_width(&mut self, width: u16) -> bool {
        if width == self.width {
            return false;
        }
        tracing::debug!(old = self.width, new = width, "content width changed");
        self.width = width;
        self.clear();
        true
    }

    #[must_use]
    pub fn get(&self, key: &PreviewKey) -> Option<Arc<str>> {
        self.entries.get(key).cloned()
    }

    pub fn insert(&mut self, key: PreviewKey, text: impl Into<Arc<str>>) -> Arc<str> {
        let text = text.into();
        self.entries.insert(key, Arc::clone(&text));
        text
    }

    pub fn clear(&mut self) {
        tracing::debug!(entries = self.entries.len(), "clearing detail cache");
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

    #[test]
    fn width_change_invalidates_entries() {
        let mut cache = DetailCache::new(80);
        cache.insert(PreviewKey::package("numpy"), "# numpy");

        assert!(!cache.set_width(80));
        assert_eq!(cache.len(), 1);

        assert!(cache.set_width(100));
        assert!(cache.is_empty());
        assert_eq!(cache.width(), 100);
    }

    #[test]
    fn returns_stored_text() {
        let mut cache = DetailCache::new(80);
        let key = PreviewKey::package("numpy");
        cache.insert(key.clone(), "# numpy");
        assert_eq!(cache.get(&key).as_deref(), Some("# numpy"));
        assert!(cache.get(&PreviewKey::package("scipy")).is_none());
    }
}
