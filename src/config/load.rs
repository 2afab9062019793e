//! The main config loading module for panefm.
//!
//! Handles loading and deserializing settings from `panefm.toml` into the
//! immutable [Config] used for the lifetime of the app. A missing file means
//! internal defaults; a broken file is reported and also falls back to
//! defaults so the file manager still starts.

use crate::config::{Editor, General, InternalGeneral, Keys, Sidebar, Theme};
use crate::utils::get_home;

use serde::Deserialize;
use thiserror::Error;

use std::path::{Path, PathBuf};
use std::{fs, io};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Raw configuration as read from the toml file, converted into [Config].
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct RawConfig {
    general: General,
    theme: Theme,
    editor: Editor,
    keys: Keys,
    sidebar: Sidebar,
}

#[derive(Debug, Clone)]
pub struct Config {
    general: InternalGeneral,
    theme: Theme,
    editor: Editor,
    keys: Keys,
    sidebar: Sidebar,
}

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        Self {
            general: InternalGeneral::from(raw.general),
            theme: raw.theme.with_overrides(),
            editor: raw.editor,
            keys: raw.keys,
            sidebar: raw.sidebar,
        }
    }
}

impl Config {
    /// Loads the config from [Config::default_path], falling back to the
    /// internal defaults when the file is missing or invalid.
    pub fn load() -> Self {
        let path = Self::default_path();
        if !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::error!("{e}");
                eprintln!("[panefm] {e}. Using internal defaults.");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<RawConfig>(content).map(Config::from)
    }

    #[inline]
    pub fn general(&self) -> &InternalGeneral {
        &self.general
    }

    #[inline]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    #[inline]
    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    #[inline]
    pub fn keys(&self) -> &Keys {
        &self.keys
    }

    #[inline]
    pub fn sidebar(&self) -> &Sidebar {
        &self.sidebar
    }

    /// Determine the configuration file path.
    /// Checks the PANEFM_CONFIG environment variable first,
    /// then XDG_CONFIG_HOME, then defaults to ~/.config/panefm/panefm.toml.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("PANEFM_CONFIG") {
            return PathBuf::from(path);
        }
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("panefm/panefm.toml");
        }
        if let Some(home) = get_home() {
            return home.join(".config/panefm/panefm.toml");
        }
        PathBuf::from("panefm.toml")
    }

    /// Writes a commented default config to `path`. Fails if it exists.
    pub fn generate_default(path: &Path) -> io::Result<()> {
        if path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("Config file already exists at {:?}", path),
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_TOML)
    }
}

impl Default for Config {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

const DEFAULT_TOML: &str = r##"# panefm.toml - default configuration for panefm
#
# Commented values are the internal defaults.
# Colors take hex codes ("#RRGGBB") or terminal color names ("cyan").

[general]
# show_hidden = false
# dirs_first = true
# case_sensitive = false
# sort = "name"              # name, size, date, type, natural
# reversed = false
# max_find_results = 2000
# shell_timeout_ms = 5000    # also bounds bat previews
# preview = "internal"       # internal, bat
# bat_args = ["--color=always", "--style=plain", "--paging=never"]
# footer_labels = true
# panels = 1
# page_scroll = 0            # 0 = one screen

[theme]
# glyphs = "rounded"         # rounded, square, double, ascii

# [theme.glyph_overrides]
# top_left = "╭"

# [theme.colors]
# border = "#444444"
# focused_border = "cyan"
# content_fg = "default"
# content_bg = "default"
# cursor = "#303030"
# directory = "blue"
# selected = "yellow"
# status_line = "default"

# [editor]
# cmd = "nvim"

# [sidebar]
# enabled = true
# width = 20
# well_known = true          # home, downloads, documents, ...
# pinned = ["~/projects"]

# [keys]
# go_up = ["k", "Up"]
# go_down = ["j", "Down"]
# go_parent = ["h", "Left", "Backspace"]
# go_into_dir = ["l", "Right"]
# page_up = ["PageUp", "Ctrl+b"]
# page_down = ["PageDown", "Ctrl+f"]
# fast_up = ["K", "Ctrl+u"]
# fast_down = ["J", "Ctrl+d"]
# go_to_top = ["g"]          # after pressing "g"
# go_to_bottom = ["G"]
# open_file = ["Enter", "e"]
# next_panel = ["Tab"]
# prev_panel = ["BackTab"]
# open_panel = ["n"]
# close_panel = ["w"]
# cycle_sort = ["o"]
# reverse_sort = ["r"]
# toggle_hidden = ["."]
# select_mode = ["v"]
# toggle_select = [" "]
# clear_selection = ["Ctrl+c"]
# search = ["/"]
# find = ["s"]
# shell = [":"]
# refresh = ["Ctrl+r"]
# sidebar = ["b"]
# toggle_pin = ["p"]
# help = ["?"]
# quit = ["q"]
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn generated_default_parses() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("nested/panefm.toml");
        Config::generate_default(&path)?;
        let cfg = Config::load_from(&path)?;
        assert_eq!(cfg.general().panels(), 1);
        assert!(Config::generate_default(&path).is_err(), "must not overwrite");
        Ok(())
    }

    #[test]
    fn parse_errors_name_the_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[general]\npanels = \"many\"\n")?;
        match Config::load_from(&path) {
            Err(e @ ConfigError::Parse { .. }) => assert!(e.to_string().contains("bad.toml")),
            other => panic!("expected parse error, got {other:?}"),
        }
        assert!(matches!(
            Config::load_from(&dir.path().join("missing.toml")),
            Err(ConfigError::Read { .. })
        ));
        Ok(())
    }
}
