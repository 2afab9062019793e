//! Application state and main controller module for panefm.
//!
//! [AppState] holds everything the UI shows: the file panels, the preview,
//! the find and help overlays, the prompt and status line, the layout
//! metrics and the channels to the worker threads.
//!
//! The terminal loop feeds it one [Message] at a time. [AppState::update]
//! mutates state and returns plain [Command] values; [AppState::dispatch]
//! sends those to the workers or turns them into a [Control] for the loop.
//! Worker results come back as messages too and are merged through each
//! owner's staleness gate, so nothing but this loop ever mutates the state.

use crate::app::file_panel::{EnterOutcome, FilePanel};
use crate::app::find_state::FindState;
use crate::app::help::HelpMenu;
use crate::app::keymap::{Action, KeyPrefix, Keymap, NavAction, PanelAction, SystemAction};
use crate::app::message::{Command, Control, Message};
use crate::app::preview::PreviewState;
use crate::app::request::RequestTracker;
use crate::app::sidebar::SidebarState;
use crate::app::throttle::RefreshPolicy;
use crate::config::Config;
use crate::core::worker::{PreviewContext, ShellContext, WorkerResponse, WorkerTask, Workers};
use crate::utils::{format_file_size, format_file_time, shorten_home_path};

use crossbeam_channel::Sender;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Rows of a file panel that are not list rows: border, path, search line
/// and the two dividers.
pub const PANEL_CHROME: usize = 6;
/// Status line at the bottom of the screen.
pub const STATUS_ROWS: usize = 1;
/// Narrower screens hide the preview.
pub const MIN_PREVIEW_SCREEN_WIDTH: usize = 60;
/// Narrower screens hide the sidebar.
pub const MIN_SIDEBAR_SCREEN_WIDTH: usize = 80;

const PREFIX_TIMEOUT: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing the focused panel's filter.
    Search,
    Find,
    /// Typing a shell command after `:`.
    Shell,
    Help,
    /// Cursor is in the directory sidebar.
    Sidebar,
}

/// Screen geometry derived from the terminal size and the panel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutMetrics {
    pub width: usize,
    pub height: usize,
    pub panels: usize,
    pub preview_width: usize,
    pub sidebar_width: usize,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self::compute(80, 24, 1)
    }
}

impl LayoutMetrics {
    pub fn compute(width: u16, height: u16, panels: usize) -> Self {
        let width = width as usize;
        let preview_width = if width >= MIN_PREVIEW_SCREEN_WIDTH {
            width / 3
        } else {
            0
        };
        Self {
            width,
            height: height as usize,
            panels: panels.max(1),
            preview_width,
            sidebar_width: 0,
        }
    }

    /// Reserves `width` columns on the left for the sidebar when the screen
    /// is wide enough.
    pub fn with_sidebar(mut self, width: usize) -> Self {
        self.sidebar_width = if self.width >= MIN_SIDEBAR_SCREEN_WIDTH {
            width.min(self.width / 4)
        } else {
            0
        };
        self
    }

    /// Height of every panel, preview included.
    #[inline]
    pub fn main_height(&self) -> usize {
        self.height.saturating_sub(STATUS_ROWS)
    }

    /// Widths of the file panels, left to right. The last one takes the
    /// columns left over by the division.
    pub fn panel_widths(&self) -> Vec<usize> {
        let total = self.width - self.preview_width - self.sidebar_width;
        let each = total / self.panels;
        let mut widths = vec![each; self.panels];
        if let Some(last) = widths.last_mut() {
            *last += total - each * self.panels;
        }
        widths
    }

    /// Visible entries per file panel.
    pub fn list_height(&self) -> usize {
        self.main_height().saturating_sub(PANEL_CHROME).max(1)
    }

    /// Content area of the preview, `None` when it is hidden.
    pub fn preview_content(&self) -> Option<(usize, usize)> {
        let h = self.main_height().saturating_sub(2);
        let w = self.preview_width.saturating_sub(2);
        (w > 0 && h > 0).then_some((w, h))
    }

    /// Centered overlay used by the help menu and the find results.
    pub fn overlay(&self) -> (usize, usize) {
        let w = (self.width * 4 / 5).max(self.width.min(20));
        let h = (self.main_height() * 4 / 5).max(self.main_height().min(8));
        (w, h)
    }

    /// Help overlay: border, filter line and a divider.
    pub fn help_list_height(&self) -> usize {
        self.overlay().1.saturating_sub(4).max(1)
    }

    /// Content rows of the sidebar, `None` when it is hidden.
    pub fn sidebar_content_height(&self) -> Option<usize> {
        (self.sidebar_width > 0).then(|| self.main_height().saturating_sub(2).max(1))
    }

    /// Find overlay: border, query line and a divider.
    pub fn find_list_height(&self) -> usize {
        self.overlay().1.saturating_sub(4).max(1)
    }
}

/// Main struct which holds the central application state of panefm.
pub struct AppState<'a> {
    config: &'a Config,
    keymap: Keymap,
    prefix: KeyPrefix,
    metrics: LayoutMetrics,

    panels: Vec<FilePanel>,
    focused: usize,
    next_panel_id: u64,

    preview: PreviewState,
    find: FindState,
    help: HelpMenu,
    sidebar: SidebarState,

    mode: InputMode,
    prompt: String,
    shell: RequestTracker<ShellContext>,
    status: Option<String>,

    refresh: RefreshPolicy,
    workers: Workers,
    /// Set by anything that changes what is on screen.
    dirty: bool,
}

impl<'a> AppState<'a> {
    pub fn new(config: &'a Config) -> std::io::Result<Self> {
        let current_dir = std::env::current_dir()?;
        Ok(Self::from_dir(config, &current_dir))
    }

    /// Opens the configured number of panels at `start` and requests their
    /// first listings.
    pub fn from_dir(config: &'a Config, start: &Path) -> Self {
        let general = config.general();
        let mut app = Self {
            config,
            keymap: Keymap::from_keys(config.keys()),
            prefix: KeyPrefix::new(PREFIX_TIMEOUT),
            metrics: LayoutMetrics::compute(80, 24, general.panels())
                .with_sidebar(sidebar_width(config)),
            panels: Vec::with_capacity(general.max_panels()),
            focused: 0,
            next_panel_id: 0,
            preview: PreviewState::new(),
            find: FindState::default(),
            help: HelpMenu::new(config.keys()),
            sidebar: SidebarState::from_config(config.sidebar()),
            mode: InputMode::Normal,
            prompt: String::new(),
            shell: RequestTracker::new(),
            status: None,
            refresh: RefreshPolicy::default(),
            workers: Workers::spawn(),
            dirty: true,
        };

        let now = Instant::now();
        let mut cmds = Vec::new();
        for _ in 0..general.panels() {
            let idx = app.push_panel(start.to_path_buf(), app.panels.len());
            app.relist(idx, now, &mut cmds);
        }
        app.dispatch(cmds);
        app
    }

    // Getters / Accessors

    #[inline]
    pub fn config(&self) -> &Config {
        self.config
    }

    #[inline]
    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    #[inline]
    pub fn panels(&self) -> &[FilePanel] {
        &self.panels
    }

    #[inline]
    pub fn focused(&self) -> usize {
        self.focused
    }

    #[inline]
    pub fn focused_panel(&self) -> &FilePanel {
        &self.panels[self.focused]
    }

    #[inline]
    pub fn preview(&self) -> &PreviewState {
        &self.preview
    }

    #[inline]
    pub fn find(&self) -> &FindState {
        &self.find
    }

    #[inline]
    pub fn help(&self) -> &HelpMenu {
        &self.help
    }

    #[inline]
    pub fn sidebar(&self) -> &SidebarState {
        &self.sidebar
    }

    #[inline]
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    #[inline]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[inline]
    pub fn workers(&self) -> &Workers {
        &self.workers
    }

    /// Text of the bottom line: the active prompt, the last status message,
    /// or details of the entry under the cursor.
    pub fn status_line(&self) -> String {
        let panel = self.focused_panel();
        match self.mode {
            InputMode::Search => return format!("/{}", panel.query()),
            InputMode::Shell => return format!(":{}", self.prompt),
            InputMode::Help if self.help.is_filtering() => {
                return format!("/{}", self.help.query());
            }
            InputMode::Sidebar if self.status.is_none() => {
                return self
                    .sidebar
                    .selected()
                    .map(|e| shorten_home_path(e.path()))
                    .unwrap_or_default();
            }
            _ => {}
        }
        if let Some(status) = &self.status {
            return status.clone();
        }
        if let Some(err) = panel.error() {
            return err.to_string();
        }
        let Some(entry) = panel.selected_entry() else {
            return String::new();
        };
        let mut line = format!(
            "{}  {}  {}",
            entry.name_str(),
            format_file_size(Some(entry.size()), entry.is_dir()),
            format_file_time(entry.modified())
        );
        let selected = panel.selection().count();
        if selected > 0 {
            line.push_str(&format!("  [{selected} selected]"));
        }
        line
    }

    // Message handling

    /// Handles one message and runs the resulting commands.
    pub fn handle(&mut self, msg: Message) -> Control {
        let cmds = self.update(msg);
        self.dispatch(cmds)
    }

    pub fn update(&mut self, msg: Message) -> Vec<Command> {
        self.update_at(msg, Instant::now())
    }

    /// [AppState::update] with an explicit clock, for debounce and throttle.
    pub fn update_at(&mut self, msg: Message, now: Instant) -> Vec<Command> {
        let mut cmds = Vec::new();
        let changed = match msg {
            Message::Key(key) => {
                self.on_key(key, now, &mut cmds);
                true
            }
            Message::Resize { width, height } => {
                self.on_resize(width, height);
                true
            }
            Message::Worker(response) => {
                self.on_worker(response, now, &mut cmds);
                true
            }
            Message::Tick => {
                self.on_tick(now, &mut cmds);
                false
            }
        };
        let retargeted = self.sync_preview(now);
        self.dirty |= changed || retargeted || !cmds.is_empty();
        cmds
    }

    /// Whether the screen needs a redraw since the last call.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Sends commands to the workers. Returns what the terminal loop has to
    /// do itself.
    pub fn dispatch(&self, cmds: Vec<Command>) -> Control {
        let mut control = Control::Continue;
        for cmd in cmds {
            match cmd {
                Command::LoadDirectory { panel_id, ticket } => send(
                    self.workers.io_tx(),
                    WorkerTask::LoadDirectory { panel_id, ticket },
                ),
                Command::LoadPreview(ticket) => send(
                    self.workers.preview_tx(),
                    WorkerTask::LoadPreview {
                        ticket,
                        options: self.config.general().preview().clone(),
                    },
                ),
                Command::Find {
                    ticket,
                    max_results,
                } => send(
                    self.workers.find_tx(),
                    WorkerTask::FindRecursive {
                        ticket,
                        max_results,
                    },
                ),
                Command::RunShell(ticket) => send(
                    self.workers.shell_tx(),
                    WorkerTask::RunShell {
                        ticket,
                        timeout: self.config.general().shell_timeout(),
                    },
                ),
                Command::OpenEditor(path) => {
                    if control != Control::Quit {
                        control = Control::Suspend(path);
                    }
                }
                Command::Quit => control = Control::Quit,
            }
        }
        control
    }

    /// Called by the terminal loop once the editor has exited.
    pub fn after_editor(&mut self) {
        let mut cmds = Vec::new();
        self.relist(self.focused, Instant::now(), &mut cmds);
        self.dispatch(cmds);
        self.dirty = true;
    }

    fn on_resize(&mut self, width: u16, height: u16) {
        self.metrics = LayoutMetrics::compute(width, height, self.panels.len())
            .with_sidebar(sidebar_width(self.config));
        let list_height = self.metrics.list_height();
        for panel in &mut self.panels {
            panel.resize(list_height);
        }
        match self.metrics.sidebar_content_height() {
            Some(h) => self.sidebar.resize(self.sidebar.list_height(h)),
            None if self.mode == InputMode::Sidebar => self.mode = InputMode::Normal,
            None => {}
        }
    }

    fn on_tick(&mut self, now: Instant, cmds: &mut Vec<Command>) {
        for idx in 0..self.panels.len() {
            if self.panels[idx].needs_refresh(&self.refresh, now, idx == self.focused) {
                self.relist(idx, now, cmds);
            }
        }

        if let Some(ticket) = self.preview.take_request(now) {
            cmds.push(Command::LoadPreview(ticket));
        }

        if self.mode == InputMode::Find
            && let Some(ticket) = self.find.take_request(now)
        {
            cmds.push(Command::Find {
                ticket,
                max_results: self.find.max_results(),
            });
        }
    }

    fn on_worker(&mut self, response: WorkerResponse, now: Instant, cmds: &mut Vec<Command>) {
        match response {
            WorkerResponse::DirectoryLoaded { panel_id, result } => {
                let height = self.metrics.list_height();
                match self.panels.iter_mut().find(|p| p.id() == panel_id) {
                    Some(panel) => {
                        panel.apply_listing(result, height);
                    }
                    None => log::debug!("listing for closed panel {panel_id} dropped"),
                }
            }
            WorkerResponse::PreviewLoaded(result) => {
                self.preview.apply(result);
            }
            WorkerResponse::FindBatch(batch) => {
                self.find.apply_batch(batch, self.metrics.find_list_height());
            }
            WorkerResponse::FindFinished(done) => {
                self.find.apply_finished(done);
            }
            WorkerResponse::ShellFinished(result) => {
                let workdir = result.ticket().context().workdir.clone();
                let mut finished = None;
                self.shell.apply_latest(result, |outcome| finished = Some(outcome));
                let Some(outcome) = finished else {
                    return;
                };
                if !outcome.succeeded() {
                    log::warn!("shell command failed: {}", outcome.summary());
                }
                self.status = Some(outcome.summary());
                for idx in 0..self.panels.len() {
                    if self.panels[idx].location() == workdir {
                        self.relist(idx, now, cmds);
                    }
                }
            }
        }
    }

    // Key handling

    fn on_key(&mut self, key: KeyEvent, now: Instant, cmds: &mut Vec<Command>) {
        match self.mode {
            InputMode::Normal => self.on_normal_key(key, now, cmds),
            InputMode::Search => self.on_search_key(key, now, cmds),
            InputMode::Find => self.on_find_key(key, now, cmds),
            InputMode::Shell => self.on_shell_key(key, cmds),
            InputMode::Help => self.on_help_key(key),
            InputMode::Sidebar => self.on_sidebar_key(key, now, cmds),
        }
    }

    fn on_normal_key(&mut self, key: KeyEvent, now: Instant, cmds: &mut Vec<Command>) {
        self.status = None;

        let (consumed, chord) = self.prefix.feed(&key, self.keymap.gmap());
        if let Some(action) = chord {
            self.on_action(action, now, cmds);
            return;
        }
        if consumed {
            return;
        }

        if key.code == KeyCode::Esc {
            if self.panels[self.focused].clear_query() {
                self.relist(self.focused, now, cmds);
            }
            return;
        }

        if let Some(action) = self.keymap.lookup(key) {
            self.on_action(action, now, cmds);
        }
    }

    fn on_action(&mut self, action: Action, now: Instant, cmds: &mut Vec<Command>) {
        match action {
            Action::Nav(nav) => self.on_nav(nav, now, cmds),
            Action::Panel(panel) => self.on_panel_action(panel, now, cmds),
            Action::System(SystemAction::Quit) => cmds.push(Command::Quit),
            Action::System(SystemAction::Help) => {
                self.help.reset();
                self.mode = InputMode::Help;
            }
        }
    }

    fn on_nav(&mut self, nav: NavAction, now: Instant, cmds: &mut Vec<Command>) {
        let height = self.metrics.list_height();
        let page = match self.config.general().page_scroll() {
            0 => height,
            n => n,
        };
        match nav {
            NavAction::Parent => {
                if self.panels[self.focused].go_parent() {
                    self.relist(self.focused, now, cmds);
                }
            }
            NavAction::Enter => self.open_selected(now, cmds),
            other => self.panels[self.focused].navigate(other, height, page),
        }
    }

    fn on_panel_action(&mut self, action: PanelAction, now: Instant, cmds: &mut Vec<Command>) {
        let focused = self.focused;
        match action {
            PanelAction::OpenFile => self.open_selected(now, cmds),
            PanelAction::Next => self.focused = (focused + 1) % self.panels.len(),
            PanelAction::Prev => {
                self.focused = (focused + self.panels.len() - 1) % self.panels.len()
            }
            PanelAction::Open => {
                if self.panels.len() >= self.config.general().max_panels() {
                    self.status = Some(format!(
                        "At most {} panels can be open",
                        self.config.general().max_panels()
                    ));
                    return;
                }
                let location = self.panels[focused].location().to_path_buf();
                let idx = self.push_panel(location, focused + 1);
                self.focused = idx;
                self.on_panel_count_changed();
                self.relist(idx, now, cmds);
            }
            PanelAction::Close => {
                if self.panels.len() == 1 {
                    self.status = Some("Cannot close the last panel".into());
                    return;
                }
                self.panels.remove(focused);
                self.focused = focused.min(self.panels.len() - 1);
                self.on_panel_count_changed();
            }
            PanelAction::CycleSort => {
                self.panels[focused].cycle_sort();
                self.relist(focused, now, cmds);
            }
            PanelAction::ReverseSort => {
                self.panels[focused].reverse_sort();
                self.relist(focused, now, cmds);
            }
            PanelAction::ToggleHidden => {
                self.panels[focused].toggle_hidden();
                self.relist(focused, now, cmds);
            }
            PanelAction::SelectMode => self.panels[focused].toggle_mode(),
            PanelAction::ToggleSelect => {
                let height = self.metrics.list_height();
                if !self.panels[focused].toggle_select(height) {
                    self.status = Some("Switch to select mode to pick entries".into());
                }
            }
            PanelAction::ClearSelection => self.panels[focused].clear_selection(),
            PanelAction::Search => self.mode = InputMode::Search,
            PanelAction::Find => {
                let base = self.panels[focused].location().to_path_buf();
                self.find.open(base, self.config.general().max_find_results());
                self.mode = InputMode::Find;
            }
            PanelAction::Shell => {
                self.prompt.clear();
                self.mode = InputMode::Shell;
            }
            PanelAction::Refresh => self.relist(focused, now, cmds),
            PanelAction::Sidebar => {
                if self.metrics.sidebar_width == 0 {
                    self.status = Some("Sidebar is hidden at this width".into());
                } else if self.sidebar.is_empty() {
                    self.status = Some("Sidebar has no directories".into());
                } else {
                    self.mode = InputMode::Sidebar;
                }
            }
            PanelAction::TogglePin => {
                let location = self.panels[focused].location().to_path_buf();
                let height = self.sidebar_list_height();
                let verb = if self.sidebar.toggle_pin(&location, height) {
                    "Pinned"
                } else {
                    "Unpinned"
                };
                self.status = Some(format!("{} {}", verb, shorten_home_path(&location)));
            }
        }
    }

    fn on_search_key(&mut self, key: KeyEvent, now: Instant, cmds: &mut Vec<Command>) {
        let focused = self.focused;
        match key.code {
            KeyCode::Esc => {
                self.mode = InputMode::Normal;
                if self.panels[focused].clear_query() {
                    self.relist(focused, now, cmds);
                }
            }
            KeyCode::Enter => self.mode = InputMode::Normal,
            KeyCode::Backspace => {
                if self.panels[focused].pop_query() {
                    self.relist(focused, now, cmds);
                }
            }
            KeyCode::Up | KeyCode::Down => {
                let nav = if key.code == KeyCode::Up {
                    NavAction::Up
                } else {
                    NavAction::Down
                };
                let height = self.metrics.list_height();
                self.panels[focused].navigate(nav, height, height);
            }
            KeyCode::Char(c) if is_text(&key) => {
                self.panels[focused].push_query(c);
                self.relist(focused, now, cmds);
            }
            _ => {}
        }
    }

    fn on_find_key(&mut self, key: KeyEvent, now: Instant, cmds: &mut Vec<Command>) {
        let height = self.metrics.find_list_height();
        match key.code {
            KeyCode::Esc => self.mode = InputMode::Normal,
            KeyCode::Enter => {
                let Some(result) = self.find.selected() else {
                    return;
                };
                let path = result.path().to_path_buf();
                let (location, focus) = if result.is_dir() {
                    (path, None)
                } else {
                    match path.parent() {
                        Some(parent) => (
                            parent.to_path_buf(),
                            path.file_name().map(|n| n.to_os_string()),
                        ),
                        None => return,
                    }
                };
                self.panels[self.focused].set_location(location, focus);
                self.relist(self.focused, now, cmds);
                self.mode = InputMode::Normal;
            }
            KeyCode::Backspace => self.find.pop_char(now),
            KeyCode::Up => self.find.navigate(NavAction::Up, height),
            KeyCode::Down => self.find.navigate(NavAction::Down, height),
            KeyCode::PageUp => self.find.navigate(NavAction::PageUp, height),
            KeyCode::PageDown => self.find.navigate(NavAction::PageDown, height),
            KeyCode::Char(c) if is_text(&key) => self.find.push_char(c, now),
            _ => {}
        }
    }

    fn on_shell_key(&mut self, key: KeyEvent, cmds: &mut Vec<Command>) {
        match key.code {
            KeyCode::Esc => self.mode = InputMode::Normal,
            KeyCode::Backspace => {
                self.prompt.pop();
            }
            KeyCode::Enter => {
                self.mode = InputMode::Normal;
                let command = std::mem::take(&mut self.prompt);
                if command.trim().is_empty() {
                    return;
                }
                self.status = Some(format!("running `{}`...", command));
                let ticket = self.shell.issue(ShellContext {
                    workdir: self.panels[self.focused].location().to_path_buf(),
                    command,
                });
                cmds.push(Command::RunShell(ticket));
            }
            KeyCode::Char(c) if is_text(&key) => self.prompt.push(c),
            _ => {}
        }
    }

    fn on_help_key(&mut self, key: KeyEvent) {
        let height = self.metrics.help_list_height();
        if self.help.is_filtering() {
            match key.code {
                KeyCode::Esc => {
                    self.help.clear_filter();
                }
                KeyCode::Enter => self.help.stop_filter(),
                KeyCode::Backspace => self.help.pop_char(),
                KeyCode::Up => self.help.navigate(NavAction::Up, height),
                KeyCode::Down => self.help.navigate(NavAction::Down, height),
                KeyCode::Char(c) if is_text(&key) => self.help.push_char(c),
                _ => {}
            }
            return;
        }
        if key.code == KeyCode::Esc {
            if !self.help.clear_filter() {
                self.mode = InputMode::Normal;
            }
            return;
        }
        match self.keymap.lookup(key) {
            Some(Action::System(_)) => self.mode = InputMode::Normal,
            Some(Action::Nav(nav)) => self.help.navigate(nav, height),
            Some(Action::Panel(PanelAction::Search)) => self.help.start_filter(),
            _ => {}
        }
    }

    fn on_sidebar_key(&mut self, key: KeyEvent, now: Instant, cmds: &mut Vec<Command>) {
        self.status = None;
        if key.code == KeyCode::Esc {
            self.mode = InputMode::Normal;
            return;
        }
        let height = self.sidebar_list_height();
        match self.keymap.lookup(key) {
            Some(Action::Nav(NavAction::Enter)) | Some(Action::Panel(PanelAction::OpenFile)) => {
                let Some(entry) = self.sidebar.selected() else {
                    return;
                };
                let path = entry.path().to_path_buf();
                self.panels[self.focused].set_location(path, None);
                self.relist(self.focused, now, cmds);
                self.mode = InputMode::Normal;
            }
            Some(Action::Nav(NavAction::Parent)) | Some(Action::Panel(PanelAction::Sidebar)) => {
                self.mode = InputMode::Normal;
            }
            Some(Action::Nav(nav)) => self.sidebar.navigate(nav, height),
            Some(Action::Panel(PanelAction::TogglePin)) => {
                if let Some(entry) = self.sidebar.selected()
                    && self.sidebar.is_pinned(entry.path())
                {
                    let path = entry.path().to_path_buf();
                    self.sidebar.toggle_pin(&path, height);
                    self.status = Some(format!("Unpinned {}", shorten_home_path(&path)));
                    if self.sidebar.is_empty() {
                        self.mode = InputMode::Normal;
                    }
                }
            }
            Some(Action::System(SystemAction::Quit)) => cmds.push(Command::Quit),
            Some(Action::System(SystemAction::Help)) => {
                self.help.reset();
                self.mode = InputMode::Help;
            }
            _ => {}
        }
    }

    // Helpers

    fn open_selected(&mut self, now: Instant, cmds: &mut Vec<Command>) {
        match self.panels[self.focused].enter() {
            EnterOutcome::Entered => self.relist(self.focused, now, cmds),
            EnterOutcome::OpenFile(path) => {
                let editor = self.config.editor();
                if editor.exists() {
                    cmds.push(Command::OpenEditor(path));
                } else {
                    self.status = Some(format!("Editor `{}` not found", editor.cmd()));
                }
            }
            EnterOutcome::Nothing => {}
        }
    }

    fn push_panel(&mut self, location: PathBuf, at: usize) -> usize {
        let general = self.config.general();
        self.next_panel_id += 1;
        let panel = FilePanel::new(
            self.next_panel_id,
            location,
            general.sort(),
            general.show_hidden(),
        );
        let at = at.min(self.panels.len());
        self.panels.insert(at, panel);
        at
    }

    fn sidebar_list_height(&self) -> usize {
        let content = self.metrics.sidebar_content_height().unwrap_or(1);
        self.sidebar.list_height(content)
    }

    fn on_panel_count_changed(&mut self) {
        self.on_resize(self.metrics.width as u16, self.metrics.height as u16);
    }

    fn relist(&mut self, idx: usize, now: Instant, cmds: &mut Vec<Command>) {
        let Some(panel) = self.panels.get_mut(idx) else {
            return;
        };
        let ticket = panel.issue_listing(now);
        cmds.push(Command::LoadDirectory {
            panel_id: panel.id(),
            ticket,
        });
    }

    /// Points the preview at the focused panel's cursor entry.
    fn sync_preview(&mut self, now: Instant) -> bool {
        let target = self.metrics.preview_content().and_then(|(width, height)| {
            self.panels[self.focused]
                .selected_path()
                .map(|path| PreviewContext {
                    path,
                    width,
                    height,
                })
        });
        self.preview.retarget(target, now)
    }
}

fn sidebar_width(config: &Config) -> usize {
    let sidebar = config.sidebar();
    if sidebar.enabled() { sidebar.width() } else { 0 }
}

/// Plain characters typed into a prompt; control chords are not text.
fn is_text(key: &KeyEvent) -> bool {
    !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

fn send(tx: &Sender<WorkerTask>, task: WorkerTask) {
    if let Err(e) = tx.send(task) {
        log::error!("worker channel closed, task dropped: {:?}", e.into_inner());
    }
}
