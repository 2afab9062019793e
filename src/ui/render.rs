//! UI renderer implementation.
//!
//! Contains the top-level `render` entry point used by the terminal loop. It
//! splits the screen into the sidebar, file panels, the preview and the
//! status line, and places the help or find overlay on top. The blocks
//! themselves come from [crate::ui::panes] as ANSI text and are converted
//! for ratatui here.
//!
//! This module stays "pure rendering": it reads state and config and produces
//! widgets, it never mutates the app.

use crate::app::{AppState, InputMode};
use crate::ui::panes;
use crate::ui::rendering::{TruncateStyle, strip_ansi, truncate};

use ansi_to_tui::IntoText;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::Text,
    widgets::{Clear, Paragraph},
};

/// Renders the whole terminal UI for one frame.
pub fn render(frame: &mut Frame, app: &AppState) {
    let cfg = app.config();
    let theme = cfg.theme();
    let metrics = app.metrics();

    let [main, status] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    let mut constraints: Vec<Constraint> = Vec::with_capacity(app.panels().len() + 2);
    let offset = usize::from(metrics.sidebar_width > 0);
    if offset == 1 {
        constraints.push(Constraint::Length(metrics.sidebar_width as u16));
    }
    constraints.extend(
        metrics
            .panel_widths()
            .into_iter()
            .map(|w| Constraint::Length(w as u16)),
    );
    if metrics.preview_width > 0 {
        constraints.push(Constraint::Length(metrics.preview_width as u16));
    }
    let chunks = Layout::horizontal(constraints).split(main);

    if offset == 1
        && let Some(area) = chunks.first().copied()
    {
        let block = panes::sidebar(
            app.sidebar(),
            theme,
            area.width as usize,
            area.height as usize,
            app.mode() == InputMode::Sidebar,
            app.focused_panel().location(),
        );
        draw_block(frame, area, &block);
    }

    for (idx, panel) in app.panels().iter().enumerate() {
        let Some(area) = chunks.get(offset + idx).copied() else {
            break;
        };
        let block = panes::file_panel(
            panel,
            theme,
            area.width as usize,
            area.height as usize,
            idx == app.focused() && app.mode() != InputMode::Sidebar,
            cfg.general().footer_labels(),
        );
        draw_block(frame, area, &block);
    }

    if metrics.preview_width > 0
        && let Some(area) = chunks.get(offset + app.panels().len()).copied()
    {
        let block = panes::preview(
            app.preview(),
            theme,
            area.width as usize,
            area.height as usize,
        );
        draw_block(frame, area, &block);
    }

    let (w, h) = metrics.overlay();
    match app.mode() {
        InputMode::Help => {
            let bounds = centered(main, w, h);
            let block = panes::help(
                app.help(),
                theme,
                bounds.width as usize,
                bounds.height as usize,
            );
            // The menu shrinks to its rows
            let rows = block.lines().count();
            let area = centered(main, bounds.width as usize, rows);
            frame.render_widget(Clear, area);
            draw_block(frame, area, &block);
        }
        InputMode::Find => {
            let area = centered(main, w, h);
            frame.render_widget(Clear, area);
            let block = panes::find(app.find(), theme, area.width as usize, area.height as usize);
            draw_block(frame, area, &block);
        }
        _ => {}
    }

    let line = truncate(&app.status_line(), status.width as usize, TruncateStyle::Tail);
    frame.render_widget(
        Paragraph::new(strip_ansi(&line)).style(theme.status_line_style()),
        status,
    );
}

/// Draws a pre-rendered ANSI block into `area`.
fn draw_block(frame: &mut Frame, area: Rect, block: &str) {
    let text = block
        .into_text()
        .unwrap_or_else(|_| Text::from(strip_ansi(block)));
    frame.render_widget(Paragraph::new(text), area);
}

/// A `width` x `height` rect centered in `area`, clipped to it.
fn centered(area: Rect, width: usize, height: usize) -> Rect {
    let w = (width as u16).min(area.width);
    let h = (height as u16).min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_stays_inside() {
        let area = Rect::new(0, 0, 100, 30);
        let r = centered(area, 80, 24);
        assert_eq!((r.x, r.y, r.width, r.height), (10, 3, 80, 24));

        let clipped = centered(Rect::new(5, 5, 10, 4), 80, 24);
        assert_eq!(clipped, Rect::new(5, 5, 10, 4));
    }
}
