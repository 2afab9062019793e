//! Terminal rendering and event loop for panefm.
//!
//! Handles setup/teardown of raw mode and the alternate screen, redraws, and
//! turns terminal events and worker responses into [Message]s for the app.

use crate::app::{AppState, Control, Message};
use crate::ui;
use crate::utils::open_in_editor;

use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};

use std::path::Path;
use std::{io, time::Duration};

/// Initializes the terminal in raw mode and alternate screen and runs the main event loop.
///
/// Blocks until quit. Returns an std::io::Error if terminal setup or teardown fails.
pub fn run_terminal(app: &mut AppState) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, Show)?;
    result
}

/// Main event loop: drains worker responses, ticks, draws when something
/// changed, then polls for input.
/// Returns on quit.
fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut AppState) -> io::Result<()>
where
    io::Error: From<<B as Backend>::Error>,
{
    let size = terminal.size()?;
    app.handle(Message::Resize {
        width: size.width,
        height: size.height,
    });

    loop {
        let responses: Vec<_> = app.workers().response_rx().try_iter().collect();
        for response in responses {
            app.handle(Message::Worker(response));
        }

        if let Control::Quit = app.handle(Message::Tick) {
            break;
        }

        if app.take_redraw() {
            terminal.draw(|f| ui::render(f, app))?;
        }

        if !event::poll(Duration::from_millis(16))? {
            continue;
        }
        let control = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => app.handle(Message::Key(key)),
            Event::Resize(width, height) => app.handle(Message::Resize { width, height }),
            _ => Control::Continue,
        };

        match control {
            Control::Continue => {}
            Control::Quit => break,
            Control::Suspend(path) => {
                suspend_for_editor(terminal, app, &path)?;
                // full clear/reset
                terminal.clear()?;
                app.after_editor();
            }
        }
    }
    Ok(())
}

/// Hands the terminal to the editor and takes it back afterwards.
fn suspend_for_editor<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &AppState,
    path: &Path,
) -> io::Result<()>
where
    io::Error: From<<B as Backend>::Error>,
{
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, Show)?;

    if let Err(e) = open_in_editor(app.config().editor(), path) {
        log::error!("editor failed on {}: {}", path.display(), e);
    }

    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, Hide)?;
    terminal.hide_cursor()?;
    Ok(())
}
