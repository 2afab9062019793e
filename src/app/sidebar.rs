//! Directory sidebar: well-known user directories followed by pinned ones.
//!
//! Both groups form one list for the cursor; the renderer puts a divider
//! between them. Pins added at runtime last for the session.

use crate::app::keymap::NavAction;
use crate::app::viewport::Viewport;
use crate::config::Sidebar;
use crate::utils::resolve_initial_dir;

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    name: String,
    path: PathBuf,
}

impl SidebarEntry {
    pub fn new(name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            name: name.into(),
            path,
        }
    }

    /// Entry named after the last component of `path`.
    pub fn pinned(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { name, path }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Home and the XDG user directories that exist on this machine.
pub fn well_known_dirs() -> Vec<SidebarEntry> {
    let candidates = [
        ("Home", dirs::home_dir()),
        ("Desktop", dirs::desktop_dir()),
        ("Downloads", dirs::download_dir()),
        ("Documents", dirs::document_dir()),
        ("Pictures", dirs::picture_dir()),
        ("Videos", dirs::video_dir()),
        ("Music", dirs::audio_dir()),
        ("Templates", dirs::template_dir()),
        ("Public", dirs::public_dir()),
    ];
    let mut entries: Vec<SidebarEntry> = Vec::with_capacity(candidates.len());
    for (name, path) in candidates {
        let Some(path) = path.filter(|p| p.is_dir()) else {
            continue;
        };
        // Unset XDG dirs often point at home itself
        if entries.iter().any(|e| e.path == path) {
            continue;
        }
        entries.push(SidebarEntry::new(name, path));
    }
    entries
}

#[derive(Debug, Default)]
pub struct SidebarState {
    well_known: Vec<SidebarEntry>,
    pinned: Vec<SidebarEntry>,
    viewport: Viewport,
}

impl SidebarState {
    pub fn new(well_known: Vec<SidebarEntry>, pinned: Vec<PathBuf>) -> Self {
        let mut state = Self {
            well_known,
            ..Self::default()
        };
        for path in pinned {
            state.pin(path);
        }
        state
    }

    /// Builds the sidebar from the `[sidebar]` table. Pinned paths that are
    /// not directories are skipped with a warning.
    pub fn from_config(cfg: &Sidebar) -> Self {
        let well_known = if cfg.well_known() {
            well_known_dirs()
        } else {
            Vec::new()
        };
        let pinned = cfg
            .pinned()
            .iter()
            .filter_map(|raw| {
                let resolved = resolve_initial_dir(Path::new(raw));
                if resolved.is_none() {
                    log::warn!("pinned directory {raw:?} skipped: not a directory");
                }
                resolved
            })
            .collect();
        Self::new(well_known, pinned)
    }

    // Getters / Accessors

    #[inline]
    pub fn well_known(&self) -> &[SidebarEntry] {
        &self.well_known
    }

    #[inline]
    pub fn pinned_entries(&self) -> &[SidebarEntry] {
        &self.pinned
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.well_known.len() + self.pinned.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, idx: usize) -> Option<&SidebarEntry> {
        if idx < self.well_known.len() {
            self.well_known.get(idx)
        } else {
            self.pinned.get(idx - self.well_known.len())
        }
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selected(&self) -> Option<&SidebarEntry> {
        self.get(self.viewport.cursor())
    }

    pub fn is_pinned(&self, path: &Path) -> bool {
        self.pinned.iter().any(|e| e.path == path)
    }

    /// Rows left for entries in `content_height`: the divider between the
    /// groups takes one when both are present.
    pub fn list_height(&self, content_height: usize) -> usize {
        let divider = usize::from(!self.well_known.is_empty() && !self.pinned.is_empty());
        content_height.saturating_sub(divider).max(1)
    }

    // Mutation

    fn pin(&mut self, path: PathBuf) -> bool {
        if self.is_pinned(&path) {
            return false;
        }
        self.pinned.push(SidebarEntry::pinned(path));
        true
    }

    /// Pins `path`, or unpins it if already pinned. Returns true when the
    /// path ends up pinned.
    pub fn toggle_pin(&mut self, path: &Path, height: usize) -> bool {
        let pinned = if self.is_pinned(path) {
            self.pinned.retain(|e| e.path != path);
            false
        } else {
            self.pin(path.to_path_buf())
        };
        self.viewport.clamp(self.len(), height);
        pinned
    }

    pub fn navigate(&mut self, action: NavAction, height: usize) {
        let count = self.len();
        let vp = &mut self.viewport;
        match action {
            NavAction::Up => vp.list_up(count, height),
            NavAction::Down => vp.list_down(count, height),
            NavAction::PageUp => vp.page_up(count, height),
            NavAction::PageDown => vp.page_down(count, height),
            NavAction::FastUp => vp.fast_up(5, count, height),
            NavAction::FastDown => vp.fast_down(5, count, height),
            NavAction::Top => vp.to_top(count, height),
            NavAction::Bottom => vp.to_bottom(count, height),
            NavAction::Parent | NavAction::Enter => {}
        }
    }

    pub fn resize(&mut self, height: usize) {
        self.viewport.clamp(self.len(), height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entries(names: &[&str]) -> Vec<SidebarEntry> {
        names
            .iter()
            .map(|n| SidebarEntry::new(*n, PathBuf::from("/").join(n)))
            .collect()
    }

    #[test]
    fn cursor_spans_both_groups() {
        let mut side = SidebarState::new(
            entries(&["home", "docs"]),
            vec![PathBuf::from("/srv/a"), PathBuf::from("/srv/b")],
        );
        assert_eq!(side.len(), 4);
        assert_eq!(side.list_height(10), 9);

        side.navigate(NavAction::Bottom, 3);
        assert_eq!(side.selected().map(SidebarEntry::name), Some("b"));
        side.navigate(NavAction::Down, 3);
        assert_eq!(side.selected().map(SidebarEntry::name), Some("home"));
        side.navigate(NavAction::Up, 3);
        assert_eq!(side.viewport().cursor(), 3);
        assert_eq!(side.viewport().render_index(), 1);
    }

    #[test]
    fn pins_toggle_and_dedupe() {
        let mut side = SidebarState::new(Vec::new(), vec![PathBuf::from("/a"), PathBuf::from("/a")]);
        assert_eq!(side.pinned_entries().len(), 1);
        assert_eq!(side.list_height(10), 10);

        assert!(side.toggle_pin(Path::new("/b"), 5));
        assert!(side.is_pinned(Path::new("/b")));
        side.navigate(NavAction::Bottom, 5);
        assert_eq!(side.viewport().cursor(), 1);

        assert!(!side.toggle_pin(Path::new("/b"), 5));
        assert_eq!(side.viewport().cursor(), 0, "cursor clamped after unpin");
        assert!(!side.toggle_pin(Path::new("/a"), 5));
        assert!(side.is_empty());
        assert!(side.selected().is_none());
    }

    #[test]
    fn config_pins_must_exist() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let raw = format!(
            "well_known = false\npinned = [{:?}, \"/no/such/dir\"]",
            dir.path().display().to_string()
        );
        let cfg: Sidebar = toml::from_str(&raw)?;
        let side = SidebarState::from_config(&cfg);
        assert!(side.well_known().is_empty());
        assert_eq!(side.pinned_entries().len(), 1);
        assert_eq!(side.pinned_entries()[0].path(), dir.path().canonicalize()?);
        Ok(())
    }

    #[test]
    fn well_known_dirs_exist_and_are_unique() {
        let dirs = well_known_dirs();
        for (i, entry) in dirs.iter().enumerate() {
            assert!(entry.path().is_dir());
            assert!(dirs[i + 1..].iter().all(|other| other.path() != entry.path()));
        }
    }
}
