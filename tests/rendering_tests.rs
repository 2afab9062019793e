use panefm::config::Theme;
use panefm::ui::rendering::{
    Paint, Renderer, RendererConfig, TruncateStyle, display_width, strip_ansi,
};

use rand::{Rng, rng};
use ratatui::style::Color;

const SAMPLES: &[&str] = &[
    "",
    "plain",
    "a fairly long line that will need to be cut somewhere",
    "\x1b[31mred\x1b[0m and plain",
    "wide 日本語テキスト here",
    "tab\tand\rcarriage",
    "emoji 🦀🦀🦀",
];

fn rows(block: &str) -> Vec<String> {
    block.split('\n').map(strip_ansi).collect()
}

fn assert_grid(block: &str, width: usize, height: usize) {
    let rows = rows(block);
    assert_eq!(rows.len(), height, "block:\n{block}");
    for row in &rows {
        assert_eq!(display_width(row), width, "row {row:?} in\n{block}");
    }
}

#[test]
fn random_blocks_keep_their_size() {
    let mut rng = rng();
    let theme = Theme::default().with_overrides();

    for _ in 0..500 {
        let width = rng.random_range(1..70);
        let height = rng.random_range(1..25);

        let mut cfg = if rng.random_bool(0.7) {
            theme.renderer_config(height, width, rng.random_bool(0.5), "random")
        } else {
            RendererConfig::new(height, width)
        };
        if rng.random_bool(0.5) {
            cfg.truncate_style = TruncateStyle::Plain;
        }
        if rng.random_bool(0.3) {
            cfg.content_paint = Paint::new(Some(Color::Green), Some(Color::Black));
        }

        let mut r = Renderer::new_auto_fix(cfg);
        r.set_border_title(SAMPLES[rng.random_range(0..SAMPLES.len())]);
        let items: Vec<&str> = (0..rng.random_range(0..5))
            .map(|_| SAMPLES[rng.random_range(0..SAMPLES.len())])
            .collect();
        r.set_border_info_items(items);

        for _ in 0..rng.random_range(0..4) {
            let lines: Vec<&str> = (0..rng.random_range(0..30))
                .map(|_| SAMPLES[rng.random_range(0..SAMPLES.len())])
                .collect();
            r.add_lines(lines);
            if rng.random_bool(0.5) {
                r.add_section();
            }
        }

        assert_grid(&r.render(), width, height);
    }
}

#[test]
fn sections_are_separated_by_dividers() {
    let theme = Theme::default().with_overrides();
    let mut r = Renderer::new_auto_fix(theme.renderer_config(8, 20, false, "sections"));
    r.add_lines(["first"]);
    r.add_section();
    r.add_lines(["second", "third"]);

    let rows = rows(&r.render());
    assert_eq!(rows.len(), 8);
    assert!(rows[1].contains("first"));
    assert!(rows[2].starts_with('├'));
    assert!(rows[3].contains("second"));
    assert!(rows[4].contains("third"));
}

#[test]
fn long_line_gets_tail_marker() {
    let mut cfg = RendererConfig::new(1, 10);
    cfg.truncate_style = TruncateStyle::Tail;
    let mut r = Renderer::new_auto_fix(cfg);
    r.add_lines(["abcdefghijklmnop"]);
    assert_eq!(r.render(), "abcdefg...");
}

#[test]
fn info_items_report_truncation() {
    let theme = Theme::default().with_overrides();
    let mut r = Renderer::new_auto_fix(theme.renderer_config(5, 20, false, "footer"));
    r.set_border_info_items(["Natural ↑", "Select (12)", "100/2000"]);
    assert!(r.are_info_items_truncated());

    r.set_border_info_items(["N↑", "S12"]);
    assert!(!r.are_info_items_truncated());
    let rendered = rows(&r.render());
    assert!(rendered[4].contains("N↑"));
}
