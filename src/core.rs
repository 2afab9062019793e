//! Core runtime logic for panefm.
//!
//! This module contains the non-UI "engine" pieces used by the application:
//! - [fm]: directory listing and file metadata (see [browse_dir], [FileEntry]).
//! - [sort]: the pluggable sort provider.
//! - [find]: fuzzy matching and the streamed recursive find.
//! - [proc]: the bounded external process executor (`bat`, shell commands).
//! - [preview]: preview generation and the shared preview cache.
//! - [worker]: background threads and the task/response protocol.
//! - [terminal]: terminal setup/teardown and the crossterm/ratatui event loop.

pub mod find;
pub mod fm;
pub mod preview;
pub mod proc;
pub mod sort;
pub mod terminal;
pub mod worker;

pub use find::{FindResult, find_streamed, search};
pub use fm::{FileEntry, browse_dir, entry_path};
pub use preview::{PreviewCache, PreviewMethod, PreviewOptions, render_preview};
pub use proc::{CommandOutcome, ProcError, run, run_shell};
pub use sort::{SortKind, SortOptions};
