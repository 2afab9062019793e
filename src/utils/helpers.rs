//! Helpers for panefm.
//!
//! Find result limits, color parsing, size/time formatting, home-directory
//! handling and running the configured editor.

use crate::config::Editor;

use chrono::{DateTime, Local};
use humansize::{DECIMAL, format_size};
use ratatui::style::Color;
use std::io;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use std::time::SystemTime;

/// The minimum results which is set to if the maximum is overset in the panefm.toml.
pub const MIN_FIND_RESULTS: usize = 15;
/// The default find results. Can be overwritten in the panefm.toml.
pub const DEFAULT_FIND_RESULTS: usize = 2000;
/// The maximum find result limit which is possible.
pub const MAX_FIND_RESULTS_LIMIT: usize = 1_000_000;

/// Parses a string (color name or hex) into a ratatui::style::Color
///
/// Supports standard names (red, green, etc.), hex values (#RRGGBB or #RGB)
/// and 256-color indices ("238"). Anything else is the terminal default.
pub fn parse_color(s: &str) -> Color {
    match s.to_lowercase().as_str() {
        "default" | "reset" => Color::Reset,
        "yellow" => Color::Yellow,
        "red" => Color::Red,
        "blue" => Color::Blue,
        "green" => Color::Green,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "black" => Color::Black,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        _ => {
            if let Some(color) = s.strip_prefix('#') {
                let expanded = match color.len() {
                    6 => Some(color.to_string()),
                    3 => Some(color.chars().flat_map(|c| [c, c]).collect()),
                    _ => None,
                };
                if let Some(hex) = expanded
                    && let Ok(rgb) = u32::from_str_radix(&hex, 16)
                {
                    return Color::Rgb(
                        ((rgb >> 16) & 0xFF) as u8,
                        ((rgb >> 8) & 0xFF) as u8,
                        (rgb & 0xFF) as u8,
                    );
                }
            } else if let Ok(idx) = s.parse::<u8>() {
                return Color::Indexed(idx);
            }
            log::warn!("unknown color {s:?}, using terminal default");
            Color::Reset
        }
    }
}

/// Human readable size, `-` for directories and unknown sizes.
pub fn format_file_size(size: Option<u64>, is_dir: bool) -> String {
    match size {
        Some(sz) if !is_dir => format_size(sz, DECIMAL),
        _ => "-".to_string(),
    }
}

/// Local modification time, `-` if unknown.
pub fn format_file_time(modified: Option<SystemTime>) -> String {
    modified
        .map(|mtime| {
            let dt: DateTime<Local> = DateTime::from(mtime);
            dt.format("%Y-%m-%d %H:%M").to_string()
        })
        .unwrap_or_else(|| "-".to_string())
}

/// Runs the configured editor on `file_path` and waits for it. The caller
/// is responsible for suspending and restoring the terminal around this.
pub fn open_in_editor(editor: &Editor, file_path: &Path) -> io::Result<()> {
    let status = std::process::Command::new(editor.cmd())
        .arg(file_path)
        .status()?;
    if !status.success() {
        log::warn!("{} exited with {}", editor.cmd(), status);
    }
    Ok(())
}

pub fn get_home() -> Option<PathBuf> {
    dirs::home_dir()
}

/// Util function to shorten home directory to ~.
pub fn shorten_home_path<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    if let Some(home_dir) = get_home()
        && let Ok(stripped) = path.strip_prefix(&home_dir)
    {
        if stripped.as_os_str().is_empty() {
            return "~".to_string();
        }
        let mut short = stripped.display().to_string();
        if short.starts_with(MAIN_SEPARATOR) {
            short.remove(0);
        }
        return format!("~{}{}", MAIN_SEPARATOR, short);
    }
    path.display().to_string()
}

/// Clamp the find result count into the supported range.
pub fn clamp_find_results(value: usize) -> usize {
    let clamped = value.clamp(MIN_FIND_RESULTS, MAX_FIND_RESULTS_LIMIT);
    if clamped != value {
        log::warn!(
            "max_find_results={} out of range ({}..={}), clamped to {}",
            value,
            MIN_FIND_RESULTS,
            MAX_FIND_RESULTS_LIMIT,
            clamped
        );
    }
    clamped
}

/// Resolves the directory given on the command line: `~` expansion, then
/// canonicalization. Returns `None` unless it is an existing directory.
pub fn resolve_initial_dir(arg: &Path) -> Option<PathBuf> {
    let expanded = match arg.strip_prefix("~") {
        Ok(rest) => get_home()?.join(rest),
        Err(_) => arg.to_path_buf(),
    };
    let canonical = expanded.canonicalize().ok()?;
    canonical.is_dir().then_some(canonical)
}
