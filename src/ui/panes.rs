//! Block builders for every panel on screen.
//!
//! Each function fills one [Renderer] from app state and returns the rendered
//! block: exactly `height` rows of `width` cells, ANSI styled. The layout in
//! [crate::ui::render] only decides where the blocks go.

use crate::app::file_panel::FilePanel;
use crate::app::find_state::FindState;
use crate::app::help::HelpMenu;
use crate::app::preview::PreviewState;
use crate::app::sidebar::SidebarState;
use crate::app::state::PANEL_CHROME;
use crate::config::Theme;
use crate::ui::rendering::{
    Paint, Renderer, TruncateStyle, display_width, sanitize, truncate, truncate_left,
};
use crate::utils::shorten_home_path;

use std::path::Path;

/// Marker in front of entries that are in the selection.
const SELECTED_MARK: &str = "+ ";
const UNSELECTED_MARK: &str = "  ";

/// Pads `line` to exactly `width` cells, cutting it first when longer.
fn fit(line: &str, width: usize) -> String {
    let mut out = truncate(line, width, TruncateStyle::Tail);
    let pad = width.saturating_sub(display_width(&out));
    out.push_str(&" ".repeat(pad));
    out
}

fn title_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// One file panel: path, divider, search line, divider, entries.
pub fn file_panel(
    panel: &FilePanel,
    theme: &Theme,
    width: usize,
    height: usize,
    focused: bool,
    footer_labels: bool,
) -> String {
    let name = format!("panel-{}", panel.id());
    let mut r = Renderer::new_auto_fix(theme.renderer_config(height, width, focused, &name));
    let cw = r.content_width();

    r.set_border_title(&title_of(panel.location()));
    r.set_border_info_items(panel.info_items(!footer_labels));
    if r.are_info_items_truncated() {
        r.set_border_info_items(panel.info_items(true));
    }

    r.add_lines([truncate_left(&shorten_home_path(panel.location()), cw)]);
    r.add_section();
    r.add_lines([format!("/{}", panel.query())]);
    r.add_section();

    let list_height = height.saturating_sub(PANEL_CHROME);
    if let Some(err) = panel.error() {
        r.add_lines([format!("[{}]", err)]);
    } else if panel.entries().is_empty() {
        let note = if panel.is_loading() {
            "loading..."
        } else if !panel.query().is_empty() {
            "[no matches]"
        } else {
            "[empty]"
        };
        r.add_lines([note]);
    } else {
        r.add_lines(entry_lines(panel, theme, cw, list_height, focused));
    }

    r.render()
}

fn entry_lines(
    panel: &FilePanel,
    theme: &Theme,
    width: usize,
    height: usize,
    focused: bool,
) -> Vec<String> {
    let entries = panel.entries();
    let cursor = panel.viewport().cursor();
    panel
        .viewport()
        .visible_range(entries.len(), height)
        .map(|idx| {
            let entry = &entries[idx];
            let selected = panel.is_selected(entry);
            let mark = if selected { SELECTED_MARK } else { UNSELECTED_MARK };
            let suffix = if entry.is_dir() { "/" } else { "" };
            let text = fit(
                &format!("{}{}{}", mark, sanitize(&entry.name_str()), suffix),
                width,
            );

            let mut paint = if selected {
                theme.selected_paint()
            } else if entry.is_dir() {
                theme.directory_paint()
            } else {
                Paint::NONE
            };
            if idx == cursor && focused {
                paint.bg = theme.cursor_paint().bg;
            }
            paint.apply(&text)
        })
        .collect()
}

/// The preview panel for the focused panel's cursor entry.
pub fn preview(state: &PreviewState, theme: &Theme, width: usize, height: usize) -> String {
    let mut r = Renderer::new_auto_fix(theme.renderer_config(height, width, false, "preview"));
    r.set_border_title(&state.path().map(title_of).unwrap_or_default());
    if state.lines().is_empty() && state.is_loading() {
        r.add_lines(["loading..."]);
    } else {
        // File contents are cut at the edge, not marked
        for line in state.lines() {
            r.add_line_with_style(line, TruncateStyle::Plain);
        }
    }
    r.render()
}

/// Key bindings overlay: filter line, divider, matching bindings. At most
/// `height` rows; shorter when fewer bindings match than fit.
pub fn help(menu: &HelpMenu, theme: &Theme, width: usize, height: usize) -> String {
    let mut cfg = theme.renderer_config(height, width, true, "help");
    cfg.truncate_height = true;
    // Rows are composed from key names and fixed descriptions
    cfg.sanitize = false;
    let mut r = Renderer::new_auto_fix(cfg);
    let cw = r.content_width();
    r.set_border_title("Help");
    r.set_border_info_items(menu.info_items());

    let caret = if menu.is_filtering() { "_" } else { "" };
    r.add_lines([format!("/{}{}", sanitize(menu.query()), caret)]);
    r.add_section();

    if menu.match_count() == 0 {
        r.add_lines(["[no matches]"]);
        return r.render();
    }

    let key_width = menu
        .matching()
        .map(|(_, keys)| display_width(keys))
        .max()
        .unwrap_or(0)
        .min(cw / 2);
    let cursor = theme.cursor_paint();
    let list_height = r.content_height().saturating_sub(2);
    let lines = menu
        .visible_lines(list_height, key_width)
        .into_iter()
        .map(|(is_cursor, line)| {
            if is_cursor {
                cursor.apply(&fit(&line, cw))
            } else {
                line
            }
        });
    r.add_lines(lines);
    r.render()
}

/// Directory sidebar: well-known directories, divider, pinned ones.
pub fn sidebar(
    state: &SidebarState,
    theme: &Theme,
    width: usize,
    height: usize,
    focused: bool,
    current: &Path,
) -> String {
    let mut r = Renderer::new_auto_fix(theme.renderer_config(height, width, focused, "sidebar"));
    let cw = r.content_width();
    r.set_border_title("Places");
    if !state.is_empty() {
        r.set_border_info_items([format!("{}/{}", state.viewport().cursor() + 1, state.len())]);
    }

    let list_height = state.list_height(r.content_height());
    let cursor = state.viewport().cursor();
    let split = state.well_known().len();
    let paint_row = |idx: usize| -> Option<String> {
        let entry = state.get(idx)?;
        let line = fit(&sanitize(entry.name()), cw);
        let paint = if idx == cursor && focused {
            theme.cursor_paint()
        } else if entry.path() == current {
            theme.directory_paint()
        } else {
            Paint::NONE
        };
        Some(paint.apply(&line))
    };

    let range = state.viewport().visible_range(state.len(), list_height);
    let (upper, lower): (Vec<usize>, Vec<usize>) = range.partition(|&idx| idx < split);
    r.add_lines(upper.iter().filter_map(|&idx| paint_row(idx)));
    if !upper.is_empty() && !lower.is_empty() {
        r.add_section();
    }
    r.add_lines(lower.iter().filter_map(|&idx| paint_row(idx)));
    r.render()
}

/// Find overlay: query line, divider, results relative to the base.
pub fn find(state: &FindState, theme: &Theme, width: usize, height: usize) -> String {
    let mut r = Renderer::new_auto_fix(theme.renderer_config(height, width, true, "find"));
    let cw = r.content_width();
    r.set_border_title(&format!("Find in {}", shorten_home_path(state.base())));
    r.set_border_info_items(state.info_items());

    r.add_lines([format!("> {}", state.query())]);
    r.add_section();

    if let Some(err) = state.error() {
        r.add_lines([format!("[{}]", err)]);
        return r.render();
    }

    let list_height = height.saturating_sub(4);
    let results = state.results();
    let cursor = state.viewport().cursor();
    let lines = state
        .viewport()
        .visible_range(results.len(), list_height)
        .map(|idx| {
            let result = &results[idx];
            let suffix = if result.is_dir() { "/" } else { "" };
            let line = fit(
                &format!("{}{}", sanitize(&result.relative(state.base())), suffix),
                cw,
            );
            if idx == cursor {
                theme.cursor_paint().apply(&line)
            } else if result.is_dir() {
                theme.directory_paint().apply(&line)
            } else {
                line
            }
        });
    r.add_lines(lines);
    r.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::sidebar::SidebarEntry;
    use crate::config::Keys;
    use crate::core::sort::SortOptions;
    use crate::core::worker::load_listing;
    use crate::ui::rendering::strip_ansi;
    use std::fs::File;
    use std::time::Instant;
    use tempfile::tempdir;

    fn assert_block(block: &str, width: usize, height: usize) {
        let rows: Vec<&str> = block.lines().collect();
        assert_eq!(rows.len(), height);
        for row in rows {
            assert_eq!(display_width(&strip_ansi(row)), width, "row {:?}", row);
        }
    }

    fn loaded_panel(dir: &Path) -> FilePanel {
        let mut panel = FilePanel::new(1, dir.to_path_buf(), SortOptions::default(), false);
        let ticket = panel.issue_listing(Instant::now());
        let listing = load_listing(ticket.context());
        panel.apply_listing(ticket.complete(listing), 20);
        panel
    }

    #[test]
    fn file_panel_has_exact_geometry() -> Result<(), Box<dyn std::error::Error>> {
        let temp = tempdir()?;
        for i in 0..30 {
            File::create(temp.path().join(format!("file_with_a_long_name_{i}.txt")))?;
        }
        let panel = loaded_panel(temp.path());
        let theme = Theme::default().with_overrides();
        for (w, h) in [(40, 20), (12, 8), (80, 7)] {
            let block = file_panel(&panel, &theme, w, h, true, true);
            assert_block(&block, w, h);
        }
        Ok(())
    }

    #[test]
    fn file_panel_layout_rows() -> Result<(), Box<dyn std::error::Error>> {
        let temp = tempdir()?;
        File::create(temp.path().join("notes.txt"))?;
        let panel = loaded_panel(temp.path());
        let theme = Theme::default().with_overrides();
        let block = strip_ansi(&file_panel(&panel, &theme, 40, 10, false, true));
        let rows: Vec<&str> = block.lines().collect();
        assert!(rows[3].contains('/'));
        assert!(rows[5].contains("notes.txt"));
        assert!(rows[9].contains("1/1"));
        Ok(())
    }

    #[test]
    fn empty_directory_note() -> Result<(), Box<dyn std::error::Error>> {
        let temp = tempdir()?;
        let panel = loaded_panel(temp.path());
        let theme = Theme::default().with_overrides();
        let block = strip_ansi(&file_panel(&panel, &theme, 30, 10, true, false));
        assert!(block.contains("[empty]"));
        Ok(())
    }

    #[test]
    fn preview_title_matches_shown_content() -> Result<(), Box<dyn std::error::Error>> {
        use crate::core::worker::PreviewContext;
        use std::sync::Arc;
        use std::time::Duration;

        let theme = Theme::default().with_overrides();
        let target = |name: &str| PreviewContext {
            path: Path::new("/tmp").join(name),
            width: 28,
            height: 8,
        };
        let mut state = PreviewState::new();
        let t0 = Instant::now();
        let later = t0 + Duration::from_millis(100);
        state.retarget(Some(target("alpha.txt")), t0);
        let ticket = state.take_request(later).ok_or("preview not requested")?;
        state.apply(ticket.complete(Arc::new(vec!["alpha body".to_string()])));

        state.retarget(Some(target("beta.txt")), later);
        let block = strip_ansi(&preview(&state, &theme, 30, 10));
        let top = block.lines().next().ok_or("empty block")?;
        assert!(top.contains("alpha.txt"));
        assert!(!block.contains("beta.txt"));
        assert!(block.contains("alpha body"));
        Ok(())
    }

    #[test]
    fn help_and_preview_blocks_fit() {
        let theme = Theme::default().with_overrides();
        let menu = HelpMenu::new(&Keys::default());
        assert_block(&help(&menu, &theme, 50, 12), 50, 12);

        let tall = help(&menu, &theme, 50, 500);
        let rows = tall.lines().count();
        assert!(rows < 500);
        assert_block(&tall, 50, rows);

        let state = PreviewState::new();
        assert_block(&preview(&state, &theme, 30, 10), 30, 10);

        let find_state = FindState::default();
        assert_block(&find(&find_state, &theme, 40, 10), 40, 10);
    }

    #[test]
    fn sidebar_groups_split_by_divider() {
        let theme = Theme::default().with_overrides();
        let state = SidebarState::new(
            vec![SidebarEntry::new("Home", "/home/me".into())],
            vec!["/srv/pinned".into()],
        );
        let block = sidebar(&state, &theme, 20, 8, true, Path::new("/srv/pinned"));
        assert_block(&block, 20, 8);
        let rows: Vec<String> = block.lines().map(strip_ansi).collect();
        assert!(rows[0].contains("Places"));
        assert!(rows[7].contains("1/2"));
        assert!(rows[1].contains("Home"));
        assert!(!rows[2].chars().any(char::is_alphanumeric), "divider row");
        assert!(rows[3].contains("pinned"));
    }
}
