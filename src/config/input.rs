//! Input configuration options for panefm
//!
//! The `[keys]` and `[editor]` tables of panefm.toml.

use serde::Deserialize;

/// Key lists per action. Each entry is parsed by the keymap, e.g. `"j"`,
/// `"Down"`, `"Ctrl+d"` or `"<C-u>"`.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Keys {
    go_up: Vec<String>,
    go_down: Vec<String>,
    go_parent: Vec<String>,
    go_into_dir: Vec<String>,
    page_up: Vec<String>,
    page_down: Vec<String>,
    fast_up: Vec<String>,
    fast_down: Vec<String>,
    go_to_top: Vec<String>,
    go_to_bottom: Vec<String>,
    open_file: Vec<String>,
    next_panel: Vec<String>,
    prev_panel: Vec<String>,
    open_panel: Vec<String>,
    close_panel: Vec<String>,
    cycle_sort: Vec<String>,
    reverse_sort: Vec<String>,
    toggle_hidden: Vec<String>,
    select_mode: Vec<String>,
    toggle_select: Vec<String>,
    clear_selection: Vec<String>,
    search: Vec<String>,
    find: Vec<String>,
    shell: Vec<String>,
    refresh: Vec<String>,
    sidebar: Vec<String>,
    toggle_pin: Vec<String>,
    help: Vec<String>,
    quit: Vec<String>,
}

macro_rules! accessor {
    ($($name:ident => $label:literal),+ $(,)?) => {
        impl Keys {
            $(
                #[inline]
                pub fn $name(&self) -> &[String] {
                    &self.$name
                }
            )+

            /// Every action with a readable label, in help-menu order.
            pub fn bindings(&self) -> Vec<(&'static str, &[String])> {
                vec![$(($label, self.$name.as_slice())),+]
            }
        }
    };
}

accessor!(
    go_up => "Move up",
    go_down => "Move down",
    go_parent => "Parent directory",
    go_into_dir => "Enter directory",
    page_up => "Page up",
    page_down => "Page down",
    fast_up => "Fast up",
    fast_down => "Fast down",
    go_to_top => "Go to top (after g)",
    go_to_bottom => "Go to bottom",
    open_file => "Open in editor",
    next_panel => "Next panel",
    prev_panel => "Previous panel",
    open_panel => "Open panel",
    close_panel => "Close panel",
    cycle_sort => "Cycle sort",
    reverse_sort => "Reverse sort",
    toggle_hidden => "Toggle hidden files",
    select_mode => "Browser/Select mode",
    toggle_select => "Toggle selection",
    clear_selection => "Clear selection",
    search => "Search panel",
    find => "Recursive find",
    shell => "Shell command",
    refresh => "Refresh",
    sidebar => "Focus sidebar",
    toggle_pin => "Pin/unpin directory",
    help => "Help",
    quit => "Quit",
);

impl Default for Keys {
    fn default() -> Self {
        Keys {
            go_up: vec!["k".into(), "Up".into()],
            go_down: vec!["j".into(), "Down".into()],
            go_parent: vec!["h".into(), "Left".into(), "Backspace".into()],
            go_into_dir: vec!["l".into(), "Right".into()],
            page_up: vec!["PageUp".into(), "Ctrl+b".into()],
            page_down: vec!["PageDown".into(), "Ctrl+f".into()],
            fast_up: vec!["K".into(), "Ctrl+u".into()],
            fast_down: vec!["J".into(), "Ctrl+d".into()],
            go_to_top: vec!["g".into()],
            go_to_bottom: vec!["G".into()],
            open_file: vec!["Enter".into(), "e".into()],

            next_panel: vec!["Tab".into()],
            prev_panel: vec!["BackTab".into()],
            open_panel: vec!["n".into()],
            close_panel: vec!["w".into()],

            cycle_sort: vec!["o".into()],
            reverse_sort: vec!["r".into()],
            toggle_hidden: vec![".".into()],
            select_mode: vec!["v".into()],
            toggle_select: vec![" ".into()],
            clear_selection: vec!["Ctrl+c".into()],

            search: vec!["/".into()],
            find: vec!["s".into()],
            shell: vec![":".into()],
            refresh: vec!["Ctrl+r".into()],
            sidebar: vec!["b".into()],
            toggle_pin: vec!["p".into()],

            help: vec!["?".into()],
            quit: vec!["q".into()],
        }
    }
}

/// Editor configuration options
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Editor {
    cmd: String,
}

impl Editor {
    #[inline]
    pub fn cmd(&self) -> &str {
        let trimmed = self.cmd.trim();
        if trimmed.is_empty() { "vi" } else { trimmed }
    }

    pub fn exists(&self) -> bool {
        which::which(self.cmd()).is_ok()
    }
}

impl Default for Editor {
    fn default() -> Self {
        let cmd = std::env::var("EDITOR").unwrap_or_else(|_| "nvim".into());
        Editor { cmd }
    }
}
