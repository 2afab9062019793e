//! main.rs
//! Entry point for panefm

use panefm::app::AppState;
use panefm::config::Config;
use panefm::core::terminal;
use panefm::utils::cli::{CliAction, handle_args};
use panefm::utils::{logging, resolve_initial_dir};

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let mut stdout = std::io::stdout();
        let _ = crossterm::execute!(
            stdout,
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::cursor::Show
        );

        log::error!("panic: {}", info);
        eprintln!("\n[panefm] Error occurred: {}", info);

        #[cfg(debug_assertions)]
        {
            let bt = std::backtrace::Backtrace::force_capture();
            eprintln!("\nStack Backtrace:\n{}", bt);
        }
    }));

    let action = handle_args();
    if let CliAction::Exit = action {
        return Ok(());
    }

    logging::init();
    let config = Config::load();

    let mut app = match action {
        CliAction::RunAppAtPath(path_arg) => match resolve_initial_dir(&path_arg) {
            Some(dir) => AppState::from_dir(&config, &dir),
            None => {
                eprintln!(
                    "\n[panefm] Error: Path '{}' cannot be opened.",
                    path_arg.display()
                );
                std::process::exit(1);
            }
        },
        _ => AppState::new(&config)?,
    };

    log::info!("starting in {}", app.focused_panel().location().display());
    terminal::run_terminal(&mut app)
}
