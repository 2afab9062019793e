//! Command-line argument parsing and help for panefm.
//!
//! When invoked without arguments (`pfm`), panefm launches the TUI in the
//! current directory.

use crate::config::{Config, Keys};

use std::path::PathBuf;

#[derive(Debug, PartialEq, Eq)]
pub enum CliAction {
    RunApp,
    RunAppAtPath(PathBuf),
    Init,
    Help,
    Version,
    Keybinds,
    Invalid(String),
    /// Informational flag handled; nothing left to run.
    Exit,
}

/// Pure parse of the arguments after the program name.
pub fn parse_args(args: &[String]) -> CliAction {
    match args {
        [] => CliAction::RunApp,
        [arg] => match arg.as_str() {
            "--version" | "-v" => CliAction::Version,
            "-h" | "--help" => CliAction::Help,
            "--keybinds" | "--keys" => CliAction::Keybinds,
            "--init" => CliAction::Init,
            arg if !arg.starts_with('-') && !arg.trim().is_empty() => {
                CliAction::RunAppAtPath(PathBuf::from(arg))
            }
            arg => CliAction::Invalid(format!("Unknown argument: {arg}")),
        },
        _ => CliAction::Invalid("panefm accepts only one argument at a time.".into()),
    }
}

/// Parses `std::env::args` and handles the informational flags. Returns
/// [CliAction::RunApp], [CliAction::RunAppAtPath] or [CliAction::Exit].
pub fn handle_args() -> CliAction {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match parse_args(&args) {
        run @ (CliAction::RunApp | CliAction::RunAppAtPath(_) | CliAction::Exit) => run,
        CliAction::Version => {
            println!("panefm {}", env!("CARGO_PKG_VERSION"));
            CliAction::Exit
        }
        CliAction::Help => {
            print_help();
            CliAction::Exit
        }
        CliAction::Keybinds => {
            print_keybinds(&Keys::default());
            CliAction::Exit
        }
        CliAction::Init => {
            let path = Config::default_path();
            match Config::generate_default(&path) {
                Ok(()) => println!("Default config generated at {:?}", path),
                Err(e) => eprintln!("Error: {}", e),
            }
            CliAction::Exit
        }
        CliAction::Invalid(msg) => {
            eprintln!("{msg}");
            eprintln!("Usage: pfm [PATH] or pfm [OPTION]. Try --help for available options");
            CliAction::Exit
        }
    }
}

fn print_help() {
    println!(
        r#"panefm - a multi-panel terminal file manager

USAGE:
  pfm [PATH]

PATH:
  Directory to open (defaults to current directory)

OPTIONS:
      --init              Generate a default configuration file
      --keybinds          Display the default key bindings
  -h, --help              Print help information
  -v, --version           Display the installed version

ENVIRONMENT:
  PANEFM_CONFIG           Override the default config path
  PANEFM_LOG              Log filter, e.g. "debug" (written to the cache dir)
"#
    );
}

fn print_keybinds(keys: &Keys) {
    println!("[keys]");
    for (label, bound) in keys.bindings() {
        println!("  {:<24} {:?}", label, bound);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_flags_and_path() {
        assert_eq!(parse_args(&[]), CliAction::RunApp);
        assert_eq!(parse_args(&args(&["-v"])), CliAction::Version);
        assert_eq!(parse_args(&args(&["--init"])), CliAction::Init);
        assert_eq!(
            parse_args(&args(&["/tmp"])),
            CliAction::RunAppAtPath(PathBuf::from("/tmp"))
        );
        assert!(matches!(parse_args(&args(&["--nope"])), CliAction::Invalid(_)));
        assert!(matches!(parse_args(&args(&["a", "b"])), CliAction::Invalid(_)));
    }
}
