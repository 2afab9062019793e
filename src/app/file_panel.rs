//! File panel state for panefm.
//!
//! A [FilePanel] is one directory view: its location, the last applied
//! listing, a [Viewport] over it, the ordered selection and the inputs that
//! shape the listing (search query, sort, hidden files). Those inputs form the
//! panel's [ListingContext]; a listing computed for any other context is
//! discarded on arrival.

use crate::app::keymap::NavAction;
use crate::app::request::{Completed, Outcome, RequestTracker, Ticket};
use crate::app::selection::SelectionSet;
use crate::app::throttle::RefreshPolicy;
use crate::app::viewport::Viewport;
use crate::core::sort::SortOptions;
use crate::core::worker::ListingContext;
use crate::core::{FileEntry, entry_path};

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Step used by the fast up/down movement.
pub const FAST_STEP: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelMode {
    #[default]
    Browser,
    Select,
}

/// Result of activating the entry under the cursor.
#[derive(Debug, PartialEq, Eq)]
pub enum EnterOutcome {
    /// Moved into a directory; a new listing is needed.
    Entered,
    OpenFile(PathBuf),
    Nothing,
}

pub struct FilePanel {
    id: u64,
    location: PathBuf,
    /// Location the current `entries` were listed from.
    shown: Option<PathBuf>,
    entries: Vec<FileEntry>,
    viewport: Viewport,
    selection: SelectionSet,
    mode: PanelMode,
    query: String,
    sort: SortOptions,
    show_hidden: bool,
    positions: HashMap<PathBuf, usize>,
    focus: Option<OsString>,
    listing: RequestTracker<ListingContext>,
    last_refresh: Option<Instant>,
    error: Option<String>,
}

impl FilePanel {
    pub fn new(id: u64, location: PathBuf, sort: SortOptions, show_hidden: bool) -> Self {
        Self {
            id,
            location,
            shown: None,
            entries: Vec::new(),
            viewport: Viewport::new(),
            selection: SelectionSet::new(),
            mode: PanelMode::Browser,
            query: String::new(),
            sort,
            show_hidden,
            positions: HashMap::new(),
            focus: None,
            listing: RequestTracker::new(),
            last_refresh: None,
            error: None,
        }
    }

    // Getters / Accessors

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn location(&self) -> &Path {
        &self.location
    }

    #[inline]
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[inline]
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    #[inline]
    pub fn mode(&self) -> PanelMode {
        self.mode
    }

    #[inline]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[inline]
    pub fn sort(&self) -> SortOptions {
        self.sort
    }

    #[inline]
    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    #[inline]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// A listing for the current inputs is still on its way.
    #[inline]
    pub fn is_loading(&self) -> bool {
        self.listing.is_pending()
    }

    pub fn selected_entry(&self) -> Option<&FileEntry> {
        self.entries.get(self.viewport.cursor())
    }

    pub fn selected_path(&self) -> Option<PathBuf> {
        self.selected_entry().map(|e| entry_path(&self.location, e))
    }

    pub fn is_selected(&self, entry: &FileEntry) -> bool {
        !self.selection.is_empty() && self.selection.contains(&entry_path(&self.location, entry))
    }

    /// The inputs a listing for this panel must match.
    pub fn context(&self) -> ListingContext {
        ListingContext {
            location: self.location.clone(),
            query: self.query.clone(),
            sort: self.sort,
            show_hidden: self.show_hidden,
        }
    }

    // Listing requests

    /// Issues a listing request for the current context.
    pub fn issue_listing(&mut self, now: Instant) -> Ticket<ListingContext> {
        self.last_refresh = Some(now);
        self.listing.issue(self.context())
    }

    /// Whether the periodic refresh is due. Never stacks a refresh on top of
    /// a request that is still pending.
    pub fn needs_refresh(&self, policy: &RefreshPolicy, now: Instant, focused: bool) -> bool {
        !self.listing.is_pending()
            && policy.should_refresh(self.last_refresh, now, focused, self.entries.len(), false)
    }

    /// Applies a finished listing if it still matches the panel's inputs.
    pub fn apply_listing(
        &mut self,
        result: Completed<ListingContext, Result<Vec<FileEntry>, String>>,
        height: usize,
    ) -> Outcome {
        let current = self.context();
        let mut value = None;
        let outcome = self.listing.apply(result, &current, |v| value = Some(v));
        if let Some(v) = value {
            self.install(v, height);
        }
        outcome
    }

    fn install(&mut self, result: Result<Vec<FileEntry>, String>, height: usize) {
        let same_dir = self.shown.as_deref() == Some(self.location.as_path());
        let previous = self.selected_entry().map(|e| e.name().to_os_string());

        let entries = match result {
            Ok(entries) => {
                self.error = None;
                entries
            }
            Err(e) => {
                self.error = Some(e);
                Vec::new()
            }
        };
        self.entries = entries;
        self.shown = Some(self.location.clone());

        let count = self.entries.len();
        let target = if let Some(name) = self.focus.take() {
            self.position_of(&name)
        } else if same_dir {
            previous
                .and_then(|name| self.position_of(&name))
                .or(Some(self.viewport.cursor()))
        } else {
            self.positions.get(&self.location).copied()
        };

        if !same_dir {
            self.viewport.reset();
        }
        self.viewport.clamp(count, height);
        if let Some(idx) = target {
            self.viewport.scroll_to(idx.min(count.saturating_sub(1)), count, height);
        }

        if self.error.is_none() {
            let location = &self.location;
            let names: Vec<&std::ffi::OsStr> = self.entries.iter().map(|e| e.name()).collect();
            // Entries filtered out by the query are still on disk; keep them
            if self.query.is_empty() {
                self.selection.retain(|p| {
                    p.parent() != Some(location.as_path())
                        || p.file_name().is_some_and(|n| names.contains(&n))
                });
            }
        }
    }

    fn position_of(&self, name: &std::ffi::OsStr) -> Option<usize> {
        self.entries.iter().position(|e| e.name() == name)
    }

    // Navigation

    /// Moves the cursor. `Parent` and `Enter` are handled by
    /// [FilePanel::go_parent] and [FilePanel::enter].
    pub fn navigate(&mut self, action: NavAction, height: usize, page_unit: usize) {
        let count = self.entries.len();
        let vp = &mut self.viewport;
        match action {
            NavAction::Up => vp.list_up(count, height),
            NavAction::Down => vp.list_down(count, height),
            NavAction::PageUp => vp.page_by(count, height, page_unit.max(1), false),
            NavAction::PageDown => vp.page_by(count, height, page_unit.max(1), true),
            NavAction::FastUp => vp.fast_up(FAST_STEP, count, height),
            NavAction::FastDown => vp.fast_down(FAST_STEP, count, height),
            NavAction::Top => vp.to_top(count, height),
            NavAction::Bottom => vp.to_bottom(count, height),
            NavAction::Parent | NavAction::Enter => {}
        }
    }

    /// Re-clamps the cursor after the visible height changed.
    pub fn resize(&mut self, height: usize) {
        self.viewport.clamp(self.entries.len(), height);
    }

    /// Switches to `path`, remembering the cursor of the directory left
    /// behind. `focus` names the entry to put the cursor on once listed.
    pub fn set_location(&mut self, path: PathBuf, focus: Option<OsString>) {
        if self.shown.as_deref() == Some(self.location.as_path()) && !self.entries.is_empty() {
            self.positions
                .insert(self.location.clone(), self.viewport.cursor());
        }
        self.location = path;
        self.entries.clear();
        self.viewport.reset();
        self.query.clear();
        self.error = None;
        self.focus = focus;
    }

    /// Returns false at the file system root.
    pub fn go_parent(&mut self) -> bool {
        let Some(parent) = self.location.parent().map(Path::to_path_buf) else {
            return false;
        };
        let focus = self.location.file_name().map(|n| n.to_os_string());
        self.set_location(parent, focus);
        true
    }

    pub fn enter(&mut self) -> EnterOutcome {
        let Some(entry) = self.selected_entry() else {
            return EnterOutcome::Nothing;
        };
        let path = entry_path(&self.location, entry);
        if entry.is_dir() {
            self.set_location(path, None);
            EnterOutcome::Entered
        } else if entry.is_broken_sym() {
            EnterOutcome::Nothing
        } else {
            EnterOutcome::OpenFile(path)
        }
    }

    // Listing inputs

    pub fn cycle_sort(&mut self) {
        self.sort.kind = self.sort.kind.next();
    }

    pub fn reverse_sort(&mut self) {
        self.sort.reversed = !self.sort.reversed;
    }

    pub fn toggle_hidden(&mut self) {
        self.show_hidden = !self.show_hidden;
    }

    pub fn push_query(&mut self, c: char) {
        self.query.push(c);
    }

    /// Returns false if the query was already empty.
    pub fn pop_query(&mut self) -> bool {
        self.query.pop().is_some()
    }

    pub fn clear_query(&mut self) -> bool {
        let had = !self.query.is_empty();
        self.query.clear();
        had
    }

    // Selection

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            PanelMode::Browser => PanelMode::Select,
            PanelMode::Select => PanelMode::Browser,
        };
    }

    /// In select mode, toggles the entry under the cursor and advances.
    /// Returns false in browser mode or on an empty listing.
    pub fn toggle_select(&mut self, height: usize) -> bool {
        if self.mode != PanelMode::Select {
            return false;
        }
        let Some(path) = self.selected_path() else {
            return false;
        };
        self.selection.toggle(path);
        self.viewport.list_down(self.entries.len(), height);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // Footer

    /// Footer info items: sort, mode and `cursor/count`. The `compact` form
    /// is used when the worded one does not fit the bottom edge.
    pub fn info_items(&self, compact: bool) -> Vec<String> {
        let arrow = if self.sort.reversed { "↓" } else { "↑" };
        let label = self.sort.kind.label();
        let sort = if compact {
            format!("{}{}", &label[..1], arrow)
        } else {
            format!("{} {}", label, arrow)
        };

        let count = self.selection.count();
        let mode = match (self.mode, compact) {
            (PanelMode::Browser, false) => "Browser".to_string(),
            (PanelMode::Browser, true) => "B".to_string(),
            (PanelMode::Select, false) => format!("Select ({count})"),
            (PanelMode::Select, true) => format!("S{count}"),
        };

        let position = if self.entries.is_empty() {
            "0/0".to_string()
        } else {
            format!("{}/{}", self.viewport.cursor() + 1, self.entries.len())
        };

        vec![sort, mode, position]
    }
}
