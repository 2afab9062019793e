//! The general configuration settings for panefm.
//!
//! [General] is the `[general]` table as deserialized from panefm.toml;
//! [InternalGeneral] is the validated form the rest of the app reads.

use crate::core::preview::{PreviewMethod, PreviewOptions};
use crate::core::sort::{SortKind, SortOptions};
use crate::utils::{DEFAULT_FIND_RESULTS, clamp_find_results};

use serde::Deserialize;

use std::ffi::OsString;
use std::time::Duration;

const DEFAULT_SHELL_TIMEOUT_MS: u64 = 5_000;
const MIN_SHELL_TIMEOUT_MS: u64 = 100;
const MAX_PANELS: usize = 4;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct General {
    show_hidden: bool,
    dirs_first: bool,
    case_sensitive: bool,
    sort: SortKind,
    reversed: bool,
    max_find_results: usize,
    shell_timeout_ms: u64,
    preview: PreviewMethod,
    bat_args: Vec<String>,
    footer_labels: bool,
    panels: usize,
    page_scroll: usize,
}

impl Default for General {
    fn default() -> Self {
        General {
            show_hidden: false,
            dirs_first: true,
            case_sensitive: false,
            sort: SortKind::Name,
            reversed: false,
            max_find_results: DEFAULT_FIND_RESULTS,
            shell_timeout_ms: DEFAULT_SHELL_TIMEOUT_MS,
            preview: PreviewMethod::Internal,
            bat_args: Vec::new(),
            footer_labels: true,
            panels: 1,
            page_scroll: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InternalGeneral {
    show_hidden: bool,
    sort: SortOptions,
    max_find_results: usize,
    shell_timeout: Duration,
    preview: PreviewOptions,
    footer_labels: bool,
    panels: usize,
    page_scroll: usize,
}

impl From<General> for InternalGeneral {
    fn from(g: General) -> Self {
        let mut preview = PreviewOptions {
            method: g.preview,
            timeout: Duration::from_millis(g.shell_timeout_ms.max(MIN_SHELL_TIMEOUT_MS)),
            ..PreviewOptions::default()
        };
        if !g.bat_args.is_empty() {
            preview.bat_args = g.bat_args.into_iter().map(OsString::from).collect();
        }
        Self {
            show_hidden: g.show_hidden,
            sort: SortOptions {
                kind: g.sort,
                reversed: g.reversed,
                case_sensitive: g.case_sensitive,
                dirs_first: g.dirs_first,
            },
            max_find_results: clamp_find_results(g.max_find_results),
            shell_timeout: Duration::from_millis(g.shell_timeout_ms.max(MIN_SHELL_TIMEOUT_MS)),
            preview,
            footer_labels: g.footer_labels,
            panels: g.panels.clamp(1, MAX_PANELS),
            page_scroll: g.page_scroll,
        }
    }
}

impl InternalGeneral {
    #[inline]
    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    /// Initial sort options of every new panel.
    #[inline]
    pub fn sort(&self) -> SortOptions {
        self.sort
    }

    #[inline]
    pub fn max_find_results(&self) -> usize {
        self.max_find_results
    }

    #[inline]
    pub fn shell_timeout(&self) -> Duration {
        self.shell_timeout
    }

    #[inline]
    pub fn preview(&self) -> &PreviewOptions {
        &self.preview
    }

    /// Whether footers start with word labels rather than icons.
    #[inline]
    pub fn footer_labels(&self) -> bool {
        self.footer_labels
    }

    #[inline]
    pub fn panels(&self) -> usize {
        self.panels
    }

    #[inline]
    pub fn max_panels(&self) -> usize {
        MAX_PANELS
    }

    /// Rows moved by page up/down; 0 means one viewport.
    #[inline]
    pub fn page_scroll(&self) -> usize {
        self.page_scroll
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_clamps() -> Result<(), Box<dyn std::error::Error>> {
        let raw: General = toml::from_str(
            r#"
            sort = "natural"
            reversed = true
            panels = 9
            shell_timeout_ms = 1
            preview = "bat"
            max_find_results = 0
            "#,
        )?;
        let g = InternalGeneral::from(raw);
        assert_eq!(g.sort().kind, SortKind::Natural);
        assert!(g.sort().reversed);
        assert!(g.sort().dirs_first);
        assert_eq!(g.panels(), MAX_PANELS);
        assert_eq!(g.shell_timeout(), Duration::from_millis(MIN_SHELL_TIMEOUT_MS));
        assert_eq!(g.preview().method, PreviewMethod::Bat);
        assert!(g.max_find_results() > 0);
        Ok(())
    }

    #[test]
    fn unknown_sort_is_rejected() {
        let raw: Result<General, _> = toml::from_str(r#"sort = "random""#);
        assert!(raw.is_err());
    }
}
