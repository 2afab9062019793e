//! Theme configuration options for panefm
//!
//! The `[theme]` table: a border glyph preset with optional per-glyph
//! overrides, and the colors used by the renderers. The theme is loaded once
//! and passed by reference into every renderer construction; it is never
//! mutated afterwards.
//!
//! ```toml
//! [theme]
//! glyphs = "square"
//! [theme.glyph_overrides]
//! top_left = "+"
//! [theme.colors]
//! focused_border = "#89b4fa"
//! directory = "blue"
//! ```

use crate::ui::rendering::{BorderGlyphs, Paint, RendererConfig, TruncateStyle};
use crate::utils::parse_color;

use ratatui::style::{Color, Style};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GlyphPreset {
    #[default]
    Rounded,
    Square,
    Double,
    Ascii,
}

impl GlyphPreset {
    fn glyphs(self) -> BorderGlyphs {
        match self {
            GlyphPreset::Rounded => BorderGlyphs::rounded(),
            GlyphPreset::Square => BorderGlyphs::square(),
            GlyphPreset::Double => BorderGlyphs::double(),
            GlyphPreset::Ascii => BorderGlyphs::ascii(),
        }
    }
}

/// Individual glyph replacements on top of the preset.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GlyphOverrides {
    top: Option<String>,
    bottom: Option<String>,
    left: Option<String>,
    right: Option<String>,
    top_left: Option<String>,
    top_right: Option<String>,
    bottom_left: Option<String>,
    bottom_right: Option<String>,
    middle_left: Option<String>,
    middle_right: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ThemeColors {
    #[serde(deserialize_with = "deserialize_color_field")]
    border: Color,
    #[serde(deserialize_with = "deserialize_color_field")]
    focused_border: Color,
    #[serde(deserialize_with = "deserialize_color_field")]
    content_fg: Color,
    #[serde(deserialize_with = "deserialize_color_field")]
    content_bg: Color,
    #[serde(deserialize_with = "deserialize_color_field")]
    cursor: Color,
    #[serde(deserialize_with = "deserialize_color_field")]
    directory: Color,
    #[serde(deserialize_with = "deserialize_color_field")]
    selected: Color,
    #[serde(deserialize_with = "deserialize_color_field")]
    status_line: Color,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            border: Color::Indexed(238),
            focused_border: Color::Cyan,
            content_fg: Color::Reset,
            content_bg: Color::Reset,
            cursor: Color::Indexed(236),
            directory: Color::Blue,
            selected: Color::Yellow,
            status_line: Color::Reset,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Theme {
    glyphs: GlyphPreset,
    glyph_overrides: GlyphOverrides,
    colors: ThemeColors,
    #[serde(skip)]
    resolved: BorderGlyphs,
}

impl Theme {
    /// Resolves the glyph preset and overrides into the final glyph set.
    /// Called once after deserializing.
    pub fn with_overrides(mut self) -> Self {
        let mut g = self.glyphs.glyphs();
        let o = &self.glyph_overrides;

        macro_rules! apply {
            ($($field:ident),+) => {
                $(
                    if let Some(v) = &o.$field {
                        g.$field = v.clone();
                    }
                )+
            };
        }
        apply!(
            top,
            bottom,
            left,
            right,
            top_left,
            top_right,
            bottom_left,
            bottom_right,
            middle_left,
            middle_right
        );

        self.resolved = g;
        self
    }

    #[inline]
    pub fn glyphs(&self) -> &BorderGlyphs {
        &self.resolved
    }

    /// Renderer configuration for a bordered frame of `height` x `width`.
    pub fn renderer_config(&self, height: usize, width: usize, focused: bool, name: &str) -> RendererConfig {
        let mut cfg = RendererConfig::new(height, width);
        cfg.truncate_style = TruncateStyle::Tail;
        cfg.border = true;
        cfg.glyphs = self.resolved.clone();
        cfg.content_paint = Paint::new(opt(self.colors.content_fg), opt(self.colors.content_bg));
        let border = if focused {
            self.colors.focused_border
        } else {
            self.colors.border
        };
        cfg.border_paint = Paint::new(opt(border), opt(self.colors.content_bg));
        cfg.name = name.to_string();
        cfg
    }

    /// Highlight for the row under the cursor.
    pub fn cursor_paint(&self) -> Paint {
        Paint::new(None, opt(self.colors.cursor))
    }

    pub fn directory_paint(&self) -> Paint {
        Paint::new(opt(self.colors.directory), None).bold()
    }

    pub fn selected_paint(&self) -> Paint {
        Paint::new(opt(self.colors.selected), None)
    }

    pub fn status_line_style(&self) -> Style {
        Style::default().fg(self.colors.status_line)
    }
}

/// `Reset` stands for "terminal default" and emits nothing.
fn opt(c: Color) -> Option<Color> {
    (c != Color::Reset).then_some(c)
}

fn deserialize_color_field<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(parse_color(&s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_with_overrides() -> Result<(), Box<dyn std::error::Error>> {
        let theme: Theme = toml::from_str(
            r##"
            glyphs = "ascii"
            [glyph_overrides]
            top_left = "#"
            "##,
        )?;
        let theme = theme.with_overrides();
        assert_eq!(theme.glyphs().top_left, "#");
        assert_eq!(theme.glyphs().top_right, BorderGlyphs::ascii().top_right);
        Ok(())
    }

    #[test]
    fn default_theme_is_rounded() {
        let theme = Theme::default();
        assert_eq!(theme.glyphs(), &BorderGlyphs::rounded());
        assert_eq!(theme.clone().with_overrides().glyphs(), &BorderGlyphs::rounded());
    }

    #[test]
    fn focused_border_color_differs() -> Result<(), Box<dyn std::error::Error>> {
        let theme: Theme = toml::from_str(
            r##"
            [colors]
            border = "red"
            focused_border = "#00ff00"
            content_fg = "default"
            "##,
        )?;
        let focused = theme.renderer_config(5, 10, true, "p");
        let blurred = theme.renderer_config(5, 10, false, "p");
        assert_eq!(focused.border_paint.fg, Some(Color::Rgb(0, 255, 0)));
        assert_eq!(blurred.border_paint.fg, Some(Color::Red));
        assert_eq!(focused.content_paint.fg, None);
        assert!(focused.border);
        Ok(())
    }
}
