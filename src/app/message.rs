//! Messages into the UI loop and commands out of it.
//!
//! Everything that can change [crate::app::AppState] arrives as one
//! [Message] and is handled to completion before the next one, so a frame is
//! only ever drawn against settled state. Handling a message never performs
//! side effects directly: it returns plain [Command] values which the
//! dispatcher sends to the workers or hands to the terminal loop.

use crate::app::request::Ticket;
use crate::core::worker::{FindContext, ListingContext, PreviewContext, ShellContext, WorkerResponse};

use crossterm::event::KeyEvent;
use std::path::PathBuf;

/// Input to [crate::app::AppState::update].
#[derive(Debug)]
pub enum Message {
    Key(KeyEvent),
    Resize { width: u16, height: u16 },
    Worker(WorkerResponse),
    /// Periodic wake-up: debounced previews and finds, throttled refreshes.
    Tick,
}

/// Work requested by a message handler.
#[derive(Debug)]
pub enum Command {
    LoadDirectory {
        panel_id: u64,
        ticket: Ticket<ListingContext>,
    },
    LoadPreview(Ticket<PreviewContext>),
    Find {
        ticket: Ticket<FindContext>,
        max_results: usize,
    },
    RunShell(Ticket<ShellContext>),
    OpenEditor(PathBuf),
    Quit,
}

/// What the terminal loop should do after a batch of commands.
#[derive(Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
    /// Leave the alternate screen, run the editor on the path, come back.
    Suspend(PathBuf),
}
