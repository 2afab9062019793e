//! Insertion-ordered set of selected paths.
//!
//! Membership checks and insertion order are both needed: the panel asks
//! "is this entry selected?" once per visible row, and bulk actions process
//! items in the order the user picked them.

use indexmap::IndexSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    items: IndexSet<PathBuf>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the path was already selected. Its position is kept.
    pub fn add(&mut self, path: PathBuf) -> bool {
        self.items.insert(path)
    }

    /// Keeps the relative order of the remaining items.
    pub fn remove(&mut self, path: &Path) -> bool {
        self.items.shift_remove(path)
    }

    /// Adds the path if absent, removes it otherwise. Returns the new membership.
    pub fn toggle(&mut self, path: PathBuf) -> bool {
        if self.remove(&path) {
            false
        } else {
            self.add(path)
        }
    }

    #[inline]
    pub fn contains(&self, path: &Path) -> bool {
        self.items.contains(path)
    }

    /// Paths in the order they were first selected.
    pub fn ordered_keys(&self) -> impl Iterator<Item = &Path> {
        self.items.iter().map(PathBuf::as_path)
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Drops paths for which `keep` returns false, e.g. after a directory
    /// listing no longer contains them.
    pub fn retain(&mut self, mut keep: impl FnMut(&Path) -> bool) {
        self.items.retain(|p| keep(p));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let mut sel = SelectionSet::new();
        assert!(sel.add("/b".into()));
        assert!(sel.add("/a".into()));
        assert!(sel.add("/c".into()));
        assert!(!sel.add("/b".into()));

        let keys: Vec<&Path> = sel.ordered_keys().collect();
        assert_eq!(keys, [Path::new("/b"), Path::new("/a"), Path::new("/c")]);
        assert_eq!(sel.count(), 3);
    }

    #[test]
    fn remove_preserves_order() {
        let mut sel = SelectionSet::new();
        for p in ["/1", "/2", "/3", "/4"] {
            sel.add(p.into());
        }
        assert!(sel.remove(Path::new("/2")));
        assert!(!sel.remove(Path::new("/2")));

        let keys: Vec<_> = sel.ordered_keys().map(|p| p.to_string_lossy().into_owned()).collect();
        assert_eq!(keys, ["/1", "/3", "/4"]);
        assert!(!sel.contains(Path::new("/2")));
        assert!(sel.contains(Path::new("/4")));
    }

    #[test]
    fn toggle_and_retain() {
        let mut sel = SelectionSet::new();
        assert!(sel.toggle("/x".into()));
        assert!(!sel.toggle("/x".into()));
        assert!(sel.is_empty());

        sel.add("/keep/a".into());
        sel.add("/drop/b".into());
        sel.retain(|p| p.starts_with("/keep"));
        assert_eq!(sel.count(), 1);
    }
}
