//! Fixed-size block renderer.
//!
//! A [Renderer] collects lines into sections, then on [Renderer::render]
//! joins them with divider rules, pads everything to the content size, applies
//! the composed border and the colors, and returns exactly
//! `total_width x total_height` cells (fewer rows in truncate-height mode).
//!
//! Nothing is computed before `render`. Callers build the renderer, add
//! content, query [Renderer::are_info_items_truncated] if they need to pick a
//! denser footer, and render once.

use thiserror::Error;

use crate::ui::rendering::border::{BorderConfig, BorderGlyphs};
use crate::ui::rendering::content::ContentBuffer;
use crate::ui::rendering::style::Paint;
use crate::ui::rendering::truncate::{TruncateStyle, display_width, truncate};

const BORDER_CELLS: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("border needs at least 2x2 cells, got {width}x{height}")]
    BorderTooSmall { width: usize, height: usize },
    #[error("border glyph `{0}` must be exactly one cell wide")]
    BadGlyph(&'static str),
}

/// Everything a renderer needs up front. Built from the theme for each panel.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub total_height: usize,
    pub total_width: usize,
    pub truncate_style: TruncateStyle,
    /// Render only as many content rows as were added instead of padding.
    pub truncate_height: bool,
    /// Scrub control characters from added lines. Off only for text the
    /// caller composed itself.
    pub sanitize: bool,
    pub border: bool,
    pub content_paint: Paint,
    pub border_paint: Paint,
    pub glyphs: BorderGlyphs,
    pub name: String,
}

impl RendererConfig {
    pub fn new(total_height: usize, total_width: usize) -> Self {
        Self {
            total_height,
            total_width,
            truncate_style: TruncateStyle::Plain,
            truncate_height: false,
            sanitize: true,
            border: false,
            content_paint: Paint::NONE,
            border_paint: Paint::NONE,
            glyphs: BorderGlyphs::default(),
            name: "renderer".into(),
        }
    }

    fn validate(&self) -> Result<(), RenderError> {
        if !self.border {
            return Ok(());
        }
        if self.total_width < BORDER_CELLS || self.total_height < BORDER_CELLS {
            return Err(RenderError::BorderTooSmall {
                width: self.total_width,
                height: self.total_height,
            });
        }
        let g = &self.glyphs;
        let named = [
            ("top", &g.top),
            ("bottom", &g.bottom),
            ("left", &g.left),
            ("right", &g.right),
            ("top_left", &g.top_left),
            ("top_right", &g.top_right),
            ("bottom_left", &g.bottom_left),
            ("bottom_right", &g.bottom_right),
            ("middle_left", &g.middle_left),
            ("middle_right", &g.middle_right),
        ];
        for (name, glyph) in named {
            if display_width(glyph) != 1 {
                return Err(RenderError::BadGlyph(name));
            }
        }
        Ok(())
    }
}

enum Row<'a> {
    Content(&'a str),
    Divider,
}

pub struct Renderer {
    sections: Vec<ContentBuffer>,
    /// Rows taken by closed sections and their dividers.
    closed_height: usize,
    truncate_style: TruncateStyle,
    truncate_height: bool,
    sanitize: bool,

    border: BorderConfig,
    has_border: bool,
    glyphs: BorderGlyphs,
    content_paint: Paint,
    border_paint: Paint,

    total_height: usize,
    total_width: usize,
    content_height: usize,
    content_width: usize,
    name: String,
}

impl Renderer {
    pub fn new(cfg: RendererConfig) -> Result<Self, RenderError> {
        cfg.validate()?;
        Ok(Self::from_valid(cfg))
    }

    /// Like [Renderer::new], but falls back to a borderless frame (or the
    /// default glyphs) instead of failing.
    pub fn new_auto_fix(mut cfg: RendererConfig) -> Self {
        match cfg.validate() {
            Ok(()) => {}
            Err(RenderError::BadGlyph(glyph)) => {
                log::warn!("{}: invalid border glyph `{}`, using defaults", cfg.name, glyph);
                cfg.glyphs = BorderGlyphs::default();
            }
            Err(e) => {
                log::warn!("{}: {}, rendering without border", cfg.name, e);
                cfg.border = false;
            }
        }
        Self::from_valid(cfg)
    }

    fn from_valid(cfg: RendererConfig) -> Self {
        let (content_height, content_width) = if cfg.border {
            (
                cfg.total_height - BORDER_CELLS,
                cfg.total_width - BORDER_CELLS,
            )
        } else {
            (cfg.total_height, cfg.total_width)
        };

        Self {
            sections: vec![
                ContentBuffer::new(content_height, content_width, cfg.truncate_style)
                    .with_sanitize(cfg.sanitize),
            ],
            closed_height: 0,
            truncate_style: cfg.truncate_style,
            truncate_height: cfg.truncate_height,
            sanitize: cfg.sanitize,
            border: BorderConfig::new(cfg.total_width, cfg.total_height),
            has_border: cfg.border,
            glyphs: cfg.glyphs,
            content_paint: cfg.content_paint,
            border_paint: cfg.border_paint,
            total_height: cfg.total_height,
            total_width: cfg.total_width,
            content_height,
            content_width,
            name: cfg.name,
        }
    }

    #[inline]
    pub fn content_width(&self) -> usize {
        self.content_width
    }

    #[inline]
    pub fn content_height(&self) -> usize {
        self.content_height
    }

    fn current(&mut self) -> &mut ContentBuffer {
        let idx = self.sections.len() - 1;
        &mut self.sections[idx]
    }

    /// Adds lines to the current section, as many as its capacity allows.
    pub fn add_lines<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.current().add_lines(lines);
        self
    }

    pub fn add_line_with_style(&mut self, line: &str, style: TruncateStyle) -> &mut Self {
        self.current().add_line_with_style(line, style);
        self
    }

    /// Freezes the current section and opens a new one below a divider.
    /// Does nothing (besides logging) when no row is left for the divider.
    pub fn add_section(&mut self) {
        let used = self.closed_height + self.sections[self.sections.len() - 1].len();
        if used >= self.content_height {
            log::error!(
                "{}: no room for another section (used {}, content height {})",
                self.name,
                used,
                self.content_height
            );
            return;
        }

        if self.has_border {
            self.border.add_divider(used);
        }
        self.closed_height = used + 1;
        let remaining = self.content_height - self.closed_height;
        self.sections.push(
            ContentBuffer::new(remaining, self.content_width, self.truncate_style)
                .with_sanitize(self.sanitize),
        );
    }

    pub fn set_border_title(&mut self, title: &str) {
        self.border.set_title(title);
    }

    pub fn set_border_info_items<I, S>(&mut self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.border.set_info_items(items);
    }

    pub fn are_info_items_truncated(&self) -> bool {
        self.border.are_info_items_truncated()
    }

    /// Content rows from each section's rendered buffer, with a divider
    /// between sections.
    fn rows<'a>(&self, rendered: &'a [String]) -> Vec<Row<'a>> {
        let mut rows = Vec::with_capacity(self.content_height);
        for (i, (section, text)) in self.sections.iter().zip(rendered).enumerate() {
            if i > 0 {
                rows.push(Row::Divider);
            }
            if !section.is_empty() {
                rows.extend(text.split('\n').map(Row::Content));
            }
        }
        rows
    }

    pub fn render(&self) -> String {
        let rendered: Vec<String> = self.sections.iter().map(ContentBuffer::render).collect();
        let mut rows = self.rows(&rendered);
        let height = if self.truncate_height {
            rows.len()
        } else {
            self.content_height
        };
        while rows.len() < height {
            rows.push(Row::Content(""));
        }

        let divider = self
            .border_paint
            .apply(&self.glyphs.top.repeat(self.content_width));

        let body = rows.iter().map(|row| match row {
            Row::Divider => divider.clone(),
            Row::Content(line) => {
                let pad = self.content_width.saturating_sub(display_width(line));
                let mut padded = String::with_capacity(line.len() + pad);
                padded.push_str(line);
                padded.push_str(&" ".repeat(pad));
                self.content_paint.apply(&padded)
            }
        });

        let mut out: Vec<String> = Vec::with_capacity(rows.len() + BORDER_CELLS);
        if self.has_border {
            let g = &self.glyphs;
            out.push(self.border_paint.apply(&format!(
                "{}{}{}",
                g.top_left,
                self.border.top_edge(g),
                g.top_right
            )));
            for (idx, line) in body.enumerate() {
                let (left, right) = self.border.side_glyphs(idx, g);
                out.push(format!(
                    "{}{}{}",
                    self.border_paint.apply(left),
                    line,
                    self.border_paint.apply(right)
                ));
            }
            out.push(self.border_paint.apply(&format!(
                "{}{}{}",
                g.bottom_left,
                self.border.bottom_edge(g),
                g.bottom_right
            )));
        } else {
            out.extend(body);
        }

        self.enforce_bounds(out).join("\n")
    }

    /// Last line of defense for the size contract: anything that still
    /// overflows is logged and cut.
    fn enforce_bounds(&self, lines: Vec<String>) -> Vec<String> {
        let mut lines: Vec<String> = if lines.iter().any(|l| l.contains('\n')) {
            lines
                .iter()
                .flat_map(|l| l.split('\n'))
                .map(str::to_owned)
                .collect()
        } else {
            lines
        };
        let max_w = lines.iter().map(|l| display_width(l)).max().unwrap_or(0);
        if max_w <= self.total_width && lines.len() <= self.total_height {
            return lines;
        }

        log::error!(
            "{}: rendered block out of bounds ({} lines, max width {}), limits {}x{}",
            self.name,
            lines.len(),
            max_w,
            self.total_width,
            self.total_height
        );
        lines.truncate(self.total_height);
        lines
            .iter()
            .map(|l| truncate(l, self.total_width, TruncateStyle::Plain))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const S: &str = "\u{0}SECTION";

    fn bordered(height: usize, width: usize) -> RendererConfig {
        let mut cfg = RendererConfig::new(height, width);
        cfg.border = true;
        cfg
    }

    fn render_with(cfg: RendererConfig, items: &[&str]) -> Result<String, RenderError> {
        let mut r = Renderer::new(cfg)?;
        for item in items {
            if *item == S {
                r.add_section();
            } else {
                r.add_lines([*item]);
            }
        }
        Ok(r.render())
    }

    #[test]
    fn drops_overflowing_content() -> Result<(), RenderError> {
        let out = render_with(bordered(4, 4), &["L1", "L2--...", "L3..."])?;
        assert_eq!(out, "╭──╮\n│L1│\n│L2│\n╰──╯");
        Ok(())
    }

    #[test]
    fn control_chars_in_labels_keep_geometry() -> Result<(), RenderError> {
        let mut r = Renderer::new(bordered(4, 20))?;
        r.set_border_title("a\nb");
        r.set_border_info_items(["x\ty", "1\r\n2"]);
        r.add_lines(["x"]);
        let out = r.render();
        let rows: Vec<&str> = out.split('\n').collect();
        assert_eq!(rows.len(), 4);
        for row in &rows {
            assert_eq!(display_width(row), 20, "row {:?}", row);
        }
        assert!(rows[0].contains("a b"));
        Ok(())
    }

    #[test]
    fn bounds_check_counts_embedded_newlines() -> Result<(), RenderError> {
        let r = Renderer::new(RendererConfig::new(2, 3))?;
        let lines = r.enforce_bounds(vec!["ab\ncd".into(), "ef\ngh".into()]);
        assert_eq!(lines, vec!["ab".to_string(), "cd".to_string()]);
        Ok(())
    }

    #[test]
    fn empty_frames() -> Result<(), RenderError> {
        assert_eq!(render_with(RendererConfig::new(0, 0), &[])?, "");
        assert_eq!(
            Renderer::new(bordered(0, 0)).err(),
            Some(RenderError::BorderTooSmall {
                width: 0,
                height: 0
            })
        );
        assert_eq!(render_with(bordered(2, 8), &["x"])?, "╭──────╮\n╰──────╯");
        Ok(())
    }

    #[test]
    fn auto_fix_drops_border() {
        let mut r = Renderer::new_auto_fix(bordered(1, 4));
        r.add_lines(["abcdef"]);
        assert_eq!(r.render(), "abcd");

        let mut cfg = bordered(3, 3);
        cfg.glyphs.top = "".into();
        let r = Renderer::new_auto_fix(cfg);
        assert_eq!(r.render(), "╭─╮\n│ │\n╰─╯");
    }

    #[test]
    fn rejects_wide_glyphs() {
        let mut cfg = bordered(4, 4);
        cfg.glyphs.left = "||".into();
        assert_eq!(Renderer::new(cfg).err(), Some(RenderError::BadGlyph("left")));
    }

    #[test]
    fn sections_and_dividers() -> Result<(), RenderError> {
        let cases: [(usize, usize, Vec<&str>, Vec<&str>); 5] = [
            (
                7,
                4,
                vec!["L1", S, "L2", S, S, "L3", S],
                vec!["╭──╮", "│L1│", "├──┤", "│L2│", "├──┤", "├──┤", "╰──╯"],
            ),
            (
                7,
                4,
                vec![S, S, "", S, S],
                vec!["╭──╮", "├──┤", "├──┤", "│  │", "├──┤", "├──┤", "╰──╯"],
            ),
            (
                7,
                4,
                vec![S, S, S, S, "L1"],
                vec!["╭──╮", "├──┤", "├──┤", "├──┤", "├──┤", "│L1│", "╰──╯"],
            ),
            (3, 4, vec![S], vec!["╭──╮", "├──┤", "╰──╯"]),
            (4, 2, vec![S, "L1", S, S], vec!["╭╮", "├┤", "││", "╰╯"]),
        ];

        for (height, width, input, expected) in cases {
            let out = render_with(bordered(height, width), &input)?;
            assert_eq!(out, expected.join("\n"), "input {:?}", input);
        }
        Ok(())
    }

    #[test]
    fn borderless_sections_use_blank_rows() -> Result<(), RenderError> {
        let mut cfg = RendererConfig::new(4, 4);
        cfg.glyphs.top = " ".into();
        let out = render_with(cfg, &[S, "L1", S])?;
        assert_eq!(out, "    \nL1  \n    \n    ");
        Ok(())
    }

    #[test]
    fn unsanitized_sections_keep_raw_text() -> Result<(), RenderError> {
        let mut cfg = RendererConfig::new(3, 6);
        cfg.sanitize = false;
        let out = render_with(cfg.clone(), &["a\u{fffd}b", S, "cd"])?;
        assert_eq!(out, "a\u{fffd}b   \n──────\ncd    ");

        cfg.sanitize = true;
        let out = render_with(cfg, &["a\u{fffd}b", S, "cd"])?;
        assert_eq!(out, "ab    \n──────\ncd    ");
        Ok(())
    }

    #[test]
    fn truncate_height_mode() -> Result<(), RenderError> {
        let mut cfg = bordered(7, 4);
        cfg.truncate_height = true;
        assert_eq!(render_with(cfg, &["L1", ""])?, "╭──╮\n│L1│\n│  │\n╰──╯");

        let mut cfg = bordered(100, 4);
        cfg.truncate_height = true;
        let out = render_with(cfg, &["L1", "", S, "L2", "", "L3"])?;
        let expected = ["╭──╮", "│L1│", "│  │", "├──┤", "│L2│", "│  │", "│L3│", "╰──╯"];
        assert_eq!(out, expected.join("\n"));

        let out = render_with(bordered(5, 4), &["L1"])?;
        assert_eq!(out, "╭──╮\n│L1│\n│  │\n│  │\n╰──╯");
        Ok(())
    }

    #[test]
    fn custom_glyphs_with_decorations() -> Result<(), RenderError> {
        let mut cfg = bordered(6, 10);
        cfg.glyphs.left = "+".into();
        cfg.glyphs.bottom = "*".into();
        let mut r = Renderer::new(cfg)?;
        r.set_border_title("Title");
        r.set_border_info_items(["A"]);
        r.add_lines(["L1"]);
        r.add_section();
        r.add_lines(["", "L2"]);

        let expected = [
            "╭┤ Titl ├╮",
            "+L1      │",
            "├────────┤",
            "+        │",
            "+L2      │",
            "╰****┤A├*╯",
        ];
        assert_eq!(r.render(), expected.join("\n"));
        Ok(())
    }

    #[test]
    fn info_item_queries() -> Result<(), RenderError> {
        let mut r = Renderer::new(bordered(4, 10))?;
        r.set_border_info_items(["A", ""]);
        assert!(!r.are_info_items_truncated());
        r.add_lines(["L1", "L2"]);
        assert_eq!(r.render(), "╭────────╮\n│L1      │\n│L2      │\n╰─┤A├─┤├─╯");

        r.set_border_info_items(["AA", ""]);
        assert!(r.are_info_items_truncated());
        Ok(())
    }

    #[test]
    fn colors_wrap_every_cell() -> Result<(), RenderError> {
        use ratatui::style::Color;

        let mut cfg = bordered(3, 4);
        cfg.content_paint = Paint::fg(Color::Red);
        cfg.border_paint = Paint::fg(Color::Blue);
        let out = render_with(cfg, &["ab"])?;
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        let blue = Paint::fg(Color::Blue);
        let red = Paint::fg(Color::Red);
        assert_eq!(
            lines[1],
            format!("{}{}{}", blue.apply("│"), red.apply("ab"), blue.apply("│"))
        );
        for line in lines {
            assert_eq!(display_width(line), 4);
        }
        Ok(())
    }
}
