//! SGR escape emission for theme colors.
//!
//! The renderer produces plain strings with embedded escape sequences; the
//! frame drawing code turns them back into ratatui text with `ansi-to-tui`.
//! Theme colors are ratatui colors and are written out through
//! `crossterm::style`.

use crossterm::style::{
    Attribute, Color as TermColor, ResetColor, SetAttribute, SetBackgroundColor,
    SetForegroundColor,
};
use ratatui::style::Color;

/// Foreground/background pair applied to a run of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Paint {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
}

impl Paint {
    pub const NONE: Paint = Paint {
        fg: None,
        bg: None,
        bold: false,
    };

    pub fn new(fg: Option<Color>, bg: Option<Color>) -> Self {
        Self {
            fg,
            bg,
            bold: false,
        }
    }

    pub fn fg(color: Color) -> Self {
        Self::new(Some(color), None)
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    #[inline]
    pub fn is_plain(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && !self.bold
    }

    /// Escape sequence that switches this paint on.
    pub fn open(&self) -> String {
        let mut open = String::new();
        if self.bold {
            open.push_str(&format!("{}", SetAttribute(Attribute::Bold)));
        }
        if let Some(fg) = self.fg {
            open.push_str(&format!("{}", SetForegroundColor(term_color(fg))));
        }
        if let Some(bg) = self.bg {
            open.push_str(&format!("{}", SetBackgroundColor(term_color(bg))));
        }
        open
    }

    /// Wraps `text` in this paint. Resets inside `text` are followed by the
    /// paint again so a styled fragment does not clear the background of the
    /// rest of the line.
    pub fn apply(&self, text: &str) -> String {
        if self.is_plain() || text.is_empty() {
            return text.to_owned();
        }
        let open = self.open();
        let reset = reset();
        let reopened = format!("{reset}{open}");
        let body = text
            .replace(reset.as_str(), &reopened)
            .replace("\x1b[m", &reopened);
        format!("{open}{body}{reset}")
    }
}

/// The sequence that clears every color and attribute.
pub fn reset() -> String {
    format!("{}", ResetColor)
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::Reset => TermColor::Reset,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightMagenta => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(i) => TermColor::AnsiValue(i),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::rendering::{display_width, strip_ansi};

    #[test]
    fn plain_paint_is_passthrough() {
        assert_eq!(Paint::NONE.apply("abc"), "abc");
        assert_eq!(Paint::fg(Color::Red).apply(""), "");
    }

    #[test]
    fn open_uses_crossterm_sequences() {
        let p = Paint::new(Some(Color::Rgb(1, 2, 3)), Some(Color::Indexed(236))).bold();
        let expected = format!(
            "{}{}{}",
            SetAttribute(Attribute::Bold),
            SetForegroundColor(TermColor::Rgb { r: 1, g: 2, b: 3 }),
            SetBackgroundColor(TermColor::AnsiValue(236)),
        );
        assert_eq!(p.open(), expected);
        assert_eq!(p.apply("x"), format!("{expected}x{}", reset()));
    }

    #[test]
    fn named_colors_keep_their_shade() {
        assert_eq!(term_color(Color::Red), TermColor::DarkRed);
        assert_eq!(term_color(Color::LightRed), TermColor::Red);
        assert_eq!(term_color(Color::DarkGray), TermColor::DarkGrey);
    }

    #[test]
    fn inner_reset_reopens_paint() {
        let p = Paint::new(None, Some(Color::Blue));
        let open = p.open();
        let reset = reset();
        let out = p.apply(&format!("a\x1b[31mb{reset}c"));
        assert_eq!(out, format!("{open}a\x1b[31mb{reset}{open}c{reset}"));
        assert_eq!(strip_ansi(&out), "abc");
        assert_eq!(display_width(&out), 3);
    }
}
