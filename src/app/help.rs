//! Help menu: the active key bindings as a scrollable, filterable list.
//!
//! Typing after `/` narrows the list with the same fuzzy matcher the
//! recursive find uses. The cursor moves over the matching rows only.

use crate::app::keymap::NavAction;
use crate::app::viewport::Viewport;
use crate::config::Keys;
use crate::core::find::search;

pub struct HelpMenu {
    rows: Vec<(String, String)>,
    /// Indices into `rows` matching the query, best first.
    matches: Vec<usize>,
    query: String,
    filtering: bool,
    viewport: Viewport,
}

impl HelpMenu {
    pub fn new(keys: &Keys) -> Self {
        let rows: Vec<(String, String)> = keys
            .bindings()
            .into_iter()
            .map(|(label, bound)| {
                let shown: Vec<String> = bound
                    .iter()
                    .map(|k| {
                        if k == " " {
                            "Space".to_string()
                        } else {
                            k.chars().filter(|c| !c.is_control()).collect()
                        }
                    })
                    .collect();
                (label.to_string(), shown.join(", "))
            })
            .collect();
        Self {
            matches: (0..rows.len()).collect(),
            rows,
            query: String::new(),
            filtering: false,
            viewport: Viewport::new(),
        }
    }

    #[inline]
    pub fn rows(&self) -> &[(String, String)] {
        &self.rows
    }

    /// Rows left by the filter, in display order.
    pub fn matching(&self) -> impl Iterator<Item = &(String, String)> {
        self.matches.iter().map(|&i| &self.rows[i])
    }

    #[inline]
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[inline]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// True while keys are typed into the filter.
    #[inline]
    pub fn is_filtering(&self) -> bool {
        self.filtering
    }

    pub fn reset(&mut self) {
        self.query.clear();
        self.filtering = false;
        self.refilter();
    }

    // Filter input

    pub fn start_filter(&mut self) {
        self.filtering = true;
    }

    pub fn stop_filter(&mut self) {
        self.filtering = false;
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.refilter();
    }

    pub fn pop_char(&mut self) {
        if self.query.pop().is_some() {
            self.refilter();
        }
    }

    /// Drops the query. Returns false if there was none.
    pub fn clear_filter(&mut self) -> bool {
        self.filtering = false;
        if self.query.is_empty() {
            return false;
        }
        self.query.clear();
        self.refilter();
        true
    }

    fn refilter(&mut self) {
        let haystack: Vec<String> = self
            .rows
            .iter()
            .map(|(label, keys)| format!("{keys} {label}"))
            .collect();
        self.matches = search(&self.query, &haystack)
            .into_iter()
            .map(|(i, _)| i)
            .collect();
        self.viewport.reset();
    }

    pub fn navigate(&mut self, action: NavAction, height: usize) {
        let count = self.matches.len();
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

    /// Rows in view, with the key column padded to `key_width`.
    pub fn visible_lines(&self, height: usize, key_width: usize) -> Vec<(bool, String)> {
        let cursor = self.viewport.cursor();
        self.viewport
            .visible_range(self.matches.len(), height)
            .map(|i| {
                let (label, keys) = &self.rows[self.matches[i]];
                (i == cursor, format!("{:<key_width$} {}", keys, label))
            })
            .collect()
    }

    pub fn info_items(&self) -> Vec<String> {
        if self.matches.is_empty() {
            return vec!["0/0".to_string()];
        }
        vec![format!("{}/{}", self.viewport.cursor() + 1, self.matches.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_binding() {
        let keys = Keys::default();
        let help = HelpMenu::new(&keys);
        assert_eq!(help.rows().len(), keys.bindings().len());
        assert_eq!(help.match_count(), help.rows().len());
        assert!(help.rows().iter().any(|(_, k)| k.contains("Space")));
    }

    #[test]
    fn scrolls_within_height() {
        let mut help = HelpMenu::new(&Keys::default());
        let height = 5;
        help.navigate(NavAction::Up, height);
        let lines = help.visible_lines(height, 10);
        assert_eq!(lines.len(), height);
        assert!(lines.last().is_some_and(|(cursor, _)| *cursor));
        assert_eq!(help.info_items()[0], format!("{0}/{0}", help.rows().len()));
    }

    #[test]
    fn filter_narrows_and_ranks() {
        let mut help = HelpMenu::new(&Keys::default());
        help.navigate(NavAction::Down, 5);
        help.start_filter();
        for c in "sidebar".chars() {
            help.push_char(c);
        }
        assert!(help.match_count() >= 1);
        assert!(help.match_count() < help.rows().len());
        assert_eq!(help.viewport().cursor(), 0, "filtering resets the cursor");
        let first = help.matching().next().map(|(label, _)| label.clone());
        assert_eq!(first.as_deref(), Some("Focus sidebar"));

        help.push_char('#');
        assert_eq!(help.match_count(), 0);
        assert_eq!(help.info_items(), ["0/0"]);
        assert!(help.visible_lines(5, 10).is_empty());

        help.pop_char();
        assert!(help.match_count() >= 1);
        assert!(help.clear_filter());
        assert!(!help.is_filtering());
        assert_eq!(help.match_count(), help.rows().len());
        assert!(!help.clear_filter());
    }

    #[test]
    fn key_names_lose_control_chars() {
        let keys: Keys = match toml::from_str("quit = [\"q\\u0007\"]") {
            Ok(keys) => keys,
            Err(e) => panic!("keys should parse: {e}"),
        };
        let help = HelpMenu::new(&keys);
        assert!(help.rows().iter().any(|(label, k)| label == "Quit" && k == "q"));
    }
}
