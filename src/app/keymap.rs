//! Key mapping and action lookup for panefm
//!
//! Maps parsed key events to an [Action]: navigation inside the focused
//! list, panel-level operations, or system actions. Bindings come from the
//! `[keys]` table of the config.

use crate::config::Keys;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Represents any action in the app: navigation, panel, or system.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Nav(NavAction),
    Panel(PanelAction),
    System(SystemAction),
}

/// Movement inside whichever list has focus.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NavAction {
    Up,
    Down,
    PageUp,
    PageDown,
    FastUp,
    FastDown,
    Top,
    Bottom,
    Parent,
    Enter,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PanelAction {
    OpenFile,
    Next,
    Prev,
    Open,
    Close,
    CycleSort,
    ReverseSort,
    ToggleHidden,
    SelectMode,
    ToggleSelect,
    ClearSelection,
    Search,
    Find,
    Shell,
    Refresh,
    Sidebar,
    TogglePin,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SystemAction {
    Quit,
    Help,
}

/// Key + modifiers as used in the keymap
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub struct Key {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

/// Mapping from key to action, plus the second keys of `g` prefix chords.
pub struct Keymap {
    map: HashMap<Key, Action>,
    gmap: HashMap<KeyCode, Action>,
}

impl Keymap {
    #[rustfmt::skip]
    pub fn from_keys(keys: &Keys) -> Self {
        let mut map = HashMap::new();
        let mut gmap = HashMap::new();

        macro_rules! bind {
            ($keys:expr, $action:expr) => {
                bind($keys, $action, &mut map);
            };
        }

        use NavAction as N;
        use PanelAction as P;
        use SystemAction as S;

        bind!(keys.go_up(),           Action::Nav(N::Up));
        bind!(keys.go_down(),         Action::Nav(N::Down));
        bind!(keys.page_up(),         Action::Nav(N::PageUp));
        bind!(keys.page_down(),       Action::Nav(N::PageDown));
        bind!(keys.fast_up(),         Action::Nav(N::FastUp));
        bind!(keys.fast_down(),       Action::Nav(N::FastDown));
        bind!(keys.go_to_bottom(),    Action::Nav(N::Bottom));
        bind!(keys.go_parent(),       Action::Nav(N::Parent));
        bind!(keys.go_into_dir(),     Action::Nav(N::Enter));

        bind!(keys.open_file(),       Action::Panel(P::OpenFile));
        bind!(keys.next_panel(),      Action::Panel(P::Next));
        bind!(keys.prev_panel(),      Action::Panel(P::Prev));
        bind!(keys.open_panel(),      Action::Panel(P::Open));
        bind!(keys.close_panel(),     Action::Panel(P::Close));
        bind!(keys.cycle_sort(),      Action::Panel(P::CycleSort));
        bind!(keys.reverse_sort(),    Action::Panel(P::ReverseSort));
        bind!(keys.toggle_hidden(),   Action::Panel(P::ToggleHidden));
        bind!(keys.select_mode(),     Action::Panel(P::SelectMode));
        bind!(keys.toggle_select(),   Action::Panel(P::ToggleSelect));
        bind!(keys.clear_selection(), Action::Panel(P::ClearSelection));
        bind!(keys.search(),          Action::Panel(P::Search));
        bind!(keys.find(),            Action::Panel(P::Find));
        bind!(keys.shell(),           Action::Panel(P::Shell));
        bind!(keys.refresh(),         Action::Panel(P::Refresh));
        bind!(keys.sidebar(),         Action::Panel(P::Sidebar));
        bind!(keys.toggle_pin(),      Action::Panel(P::TogglePin));

        bind!(keys.help(),            Action::System(S::Help));
        bind!(keys.quit(),            Action::System(S::Quit));

        bind_prefix(keys.go_to_top(), Action::Nav(N::Top), &mut gmap);

        Keymap { map, gmap }
    }

    /// Looks up the action for a key event. Shifted characters fall back to
    /// their unshifted binding, since terminals disagree on reporting SHIFT.
    pub fn lookup(&self, key: KeyEvent) -> Option<Action> {
        let k = Key {
            code: key.code,
            modifiers: key.modifiers,
        };
        if let Some(action) = self.map.get(&k).copied() {
            return Some(action);
        }

        if matches!(key.code, KeyCode::Char(_) | KeyCode::BackTab)
            && key.modifiers.contains(KeyModifiers::SHIFT)
        {
            let k2 = Key {
                code: key.code,
                modifiers: key.modifiers - KeyModifiers::SHIFT,
            };
            return self.map.get(&k2).copied();
        }
        None
    }

    #[inline]
    pub fn gmap(&self) -> &HashMap<KeyCode, Action> {
        &self.gmap
    }
}

/// Tracks the `g` prefix of two-key chords such as `gg`.
pub struct KeyPrefix {
    since: Option<Instant>,
    timeout: Duration,
}

impl KeyPrefix {
    pub fn new(timeout: Duration) -> Self {
        Self {
            since: None,
            timeout,
        }
    }

    /// Feeds a key. Returns `(consumed, chord_action)`.
    pub fn feed(&mut self, key: &KeyEvent, gmap: &HashMap<KeyCode, Action>) -> (bool, Option<Action>) {
        match self.since.take() {
            None => {
                if key.code == KeyCode::Char('g') && key.modifiers.is_empty() {
                    self.since = Some(Instant::now());
                    (true, None)
                } else {
                    (false, None)
                }
            }
            Some(t) if t.elapsed() <= self.timeout => (true, gmap.get(&key.code).copied()),
            Some(_) => (false, None),
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.since.is_some()
    }

    pub fn cancel(&mut self) {
        self.since = None;
    }
}

pub fn parse_key(s: &str) -> Option<Key> {
    let mut modifiers = KeyModifiers::NONE;
    let mut code: Option<KeyCode> = None;

    // A lone separator character is a key, not a modifier joiner
    if s == "+" || s == "-" {
        return s.chars().next().map(|c| Key {
            code: KeyCode::Char(c),
            modifiers,
        });
    }

    let is_bracketed = s.starts_with('<') && s.ends_with('>');
    let mut input = s.trim_start_matches('<').trim_end_matches('>').to_string();

    if is_bracketed && input.contains('-') {
        let parts: Vec<&str> = input.split('-').collect();
        for &prefix in parts.iter().take(parts.len().saturating_sub(1)) {
            match prefix.to_lowercase().as_str() {
                "c" | "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "a" | "m" | "alt" => modifiers |= KeyModifiers::ALT,
                "s" | "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }
        input = parts.last()?.to_string();
    }

    let normalized = input.replace('-', "+");
    for part in normalized.split('+') {
        let p_low = part.to_lowercase();
        match p_low.as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "alt" | "meta" => modifiers |= KeyModifiers::ALT,
            "shift" => modifiers |= KeyModifiers::SHIFT,

            "up" => code = Some(KeyCode::Up),
            "down" => code = Some(KeyCode::Down),
            "left" => code = Some(KeyCode::Left),
            "right" => code = Some(KeyCode::Right),
            "pageup" | "pgup" => code = Some(KeyCode::PageUp),
            "pagedown" | "pgdn" => code = Some(KeyCode::PageDown),
            "home" => code = Some(KeyCode::Home),
            "end" => code = Some(KeyCode::End),
            "enter" => code = Some(KeyCode::Enter),
            "esc" => code = Some(KeyCode::Esc),
            "backspace" | "back" => code = Some(KeyCode::Backspace),
            "tab" => code = Some(KeyCode::Tab),
            "backtab" => code = Some(KeyCode::BackTab),
            "space" | "spc" => code = Some(KeyCode::Char(' ')),

            _ => {
                if part.chars().count() == 1 {
                    let mut c = part.chars().next()?;
                    if modifiers.contains(KeyModifiers::SHIFT) {
                        c = c.to_ascii_uppercase();
                    }
                    code = Some(KeyCode::Char(c));
                } else if p_low.starts_with('f')
                    && p_low.len() > 1
                    && p_low[1..].chars().all(|c| c.is_ascii_digit())
                {
                    let n = p_low[1..].parse().ok()?;
                    code = Some(KeyCode::F(n));
                } else if part.is_empty() {
                    continue;
                } else {
                    return None;
                }
            }
        }
    }

    Some(Key {
        code: code?,
        modifiers,
    })
}

fn bind(key_list: &[String], action: Action, map: &mut HashMap<Key, Action>) {
    for k in key_list {
        match parse_key(k) {
            Some(key) => {
                map.insert(key, action);
            }
            None => log::warn!("ignoring unparsable key binding {k:?}"),
        }
    }
}

fn bind_prefix(key_list: &[String], action: Action, gmap: &mut HashMap<KeyCode, Action>) {
    for k in key_list {
        if let Some(key) = parse_key(k)
            && key.modifiers.is_empty()
            && let KeyCode::Char(c) = key.code
        {
            gmap.insert(KeyCode::Char(c), action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn parses_key_forms() {
        let k = |s| parse_key(s).map(|k| (k.code, k.modifiers));
        assert_eq!(k("j"), Some((KeyCode::Char('j'), KeyModifiers::NONE)));
        assert_eq!(k("Ctrl+d"), Some((KeyCode::Char('d'), KeyModifiers::CONTROL)));
        assert_eq!(k("<C-u>"), Some((KeyCode::Char('u'), KeyModifiers::CONTROL)));
        assert_eq!(k("Shift+n"), Some((KeyCode::Char('N'), KeyModifiers::SHIFT)));
        assert_eq!(k("PageDown"), Some((KeyCode::PageDown, KeyModifiers::NONE)));
        assert_eq!(k("F5"), Some((KeyCode::F(5), KeyModifiers::NONE)));
        assert_eq!(k(" "), Some((KeyCode::Char(' '), KeyModifiers::NONE)));
        assert_eq!(k("-"), Some((KeyCode::Char('-'), KeyModifiers::NONE)));
        assert_eq!(k("<X-q>"), None);
        assert_eq!(k("notakey"), None);
    }

    #[test]
    fn lookup_default_bindings() {
        let km = Keymap::from_keys(&Keys::default());
        assert_eq!(
            km.lookup(ev(KeyCode::Char('j'), KeyModifiers::NONE)),
            Some(Action::Nav(NavAction::Down))
        );
        // Terminals report uppercase letters with SHIFT
        assert_eq!(
            km.lookup(ev(KeyCode::Char('G'), KeyModifiers::SHIFT)),
            Some(Action::Nav(NavAction::Bottom))
        );
        assert_eq!(
            km.lookup(ev(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Some(Action::Panel(PanelAction::Prev))
        );
        assert_eq!(km.lookup(ev(KeyCode::Char('z'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn g_prefix_chord() {
        let km = Keymap::from_keys(&Keys::default());
        let mut prefix = KeyPrefix::new(Duration::from_secs(1));
        let g = ev(KeyCode::Char('g'), KeyModifiers::NONE);

        assert_eq!(prefix.feed(&g, km.gmap()), (true, None));
        assert!(prefix.is_pending());
        assert_eq!(prefix.feed(&g, km.gmap()), (true, Some(Action::Nav(NavAction::Top))));
        assert!(!prefix.is_pending());

        let j = ev(KeyCode::Char('j'), KeyModifiers::NONE);
        assert_eq!(prefix.feed(&j, km.gmap()), (false, None));
    }
}
