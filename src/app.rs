//! Application state and the models behind every panel.
//!
//! - [state]: [AppState], the single-threaded controller fed by [Message]s.
//! - [file_panel], [preview], [find_state], [help], [sidebar]: per-panel models.
//! - [viewport]: the scrollable cursor shared by every list.
//! - [request]: tickets and the stale-result gate for background work.
//! - [selection], [throttle], [keymap], [message]: supporting types.

pub mod file_panel;
pub mod find_state;
pub mod help;
pub mod keymap;
pub mod message;
pub mod preview;
pub mod request;
pub mod selection;
pub mod sidebar;
pub mod state;
pub mod throttle;
pub mod viewport;

pub use file_panel::{FilePanel, PanelMode};
pub use message::{Command, Control, Message};
pub use request::{Completed, Outcome, RequestTracker, Ticket};
pub use sidebar::{SidebarEntry, SidebarState};
pub use state::{AppState, InputMode, LayoutMetrics};
pub use viewport::Viewport;
