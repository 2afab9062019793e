use panefm::app::keymap::{Action, Keymap, SystemAction};
use panefm::config::Config;
use panefm::core::{PreviewMethod, SortKind};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::Color;
use std::time::Duration;

const SAMPLE: &str = r##"
[general]
show_hidden = true
dirs_first = false
sort = "natural"
reversed = true
max_find_results = 3
shell_timeout_ms = 1500
preview = "bat"
footer_labels = false
panels = 9

[theme]
glyphs = "ascii"
[theme.glyph_overrides]
top_left = "*"
[theme.colors]
focused_border = "#ff0000"
directory = "green"

[editor]
cmd = "nano"

[keys]
quit = ["Ctrl+q"]
"##;

#[test]
fn full_file_is_applied() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::parse(SAMPLE)?;
    let general = cfg.general();

    assert!(general.show_hidden());
    let sort = general.sort();
    assert_eq!(sort.kind, SortKind::Natural);
    assert!(sort.reversed);
    assert!(!sort.dirs_first);
    assert_eq!(general.shell_timeout(), Duration::from_millis(1500));
    assert_eq!(general.preview().method, PreviewMethod::Bat);
    assert!(!general.footer_labels());

    // Out of range values are clamped
    assert_eq!(general.panels(), general.max_panels());
    assert!(general.max_find_results() > 3);

    let glyphs = cfg.theme().glyphs();
    assert_eq!(glyphs.top_left, "*");
    assert_eq!(glyphs.top_right, "+");
    let rc = cfg.theme().renderer_config(10, 10, true, "focused");
    assert_eq!(rc.border_paint.fg, Some(Color::Rgb(255, 0, 0)));
    assert_eq!(cfg.theme().directory_paint().fg, Some(Color::Green));

    assert_eq!(cfg.editor().cmd(), "nano");
    Ok(())
}

#[test]
fn custom_keys_replace_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::parse(SAMPLE)?;
    let keymap = Keymap::from_keys(cfg.keys());

    let ctrl_q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
    assert_eq!(keymap.lookup(ctrl_q), Some(Action::System(SystemAction::Quit)));
    let plain_q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
    assert_eq!(keymap.lookup(plain_q), None);

    // Tables that are not mentioned keep their defaults
    let j = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
    assert!(keymap.lookup(j).is_some());
    Ok(())
}

#[test]
fn empty_file_means_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::parse("")?;
    let defaults = Config::default();
    assert_eq!(cfg.general().panels(), defaults.general().panels());
    assert_eq!(cfg.general().sort(), defaults.general().sort());
    assert_eq!(cfg.theme().glyphs(), defaults.theme().glyphs());
    Ok(())
}

#[test]
fn bad_values_are_errors() {
    assert!(Config::parse("[general]\nsort = \"random\"\n").is_err());
    assert!(Config::parse("[general\n").is_err());
}
