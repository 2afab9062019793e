//! Miscellaneous utilities for panefm.
//!
//! - [helpers]: color parsing, size/time formatting, home path handling,
//!   find result limits and the editor launcher.
//! - [cli]: command-line parsing.
//! - [logging]: `env_logger` setup writing to the cache directory.

pub mod cli;
pub mod helpers;
pub mod logging;

pub use helpers::{
    DEFAULT_FIND_RESULTS, clamp_find_results, format_file_size, format_file_time, get_home,
    open_in_editor, parse_color, resolve_initial_dir, shorten_home_path,
};
