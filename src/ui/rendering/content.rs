//! Line buffer with a fixed capacity and a fixed line width.
//!
//! A [ContentBuffer] is one section of a rendered panel. Lines are split on
//! `\n`, sanitized, truncated and appended until the capacity runs out. Lines
//! past the capacity are dropped and logged, never an error.

use crate::ui::rendering::truncate::{TruncateStyle, sanitize, truncate};

/// Ordered, bounded set of display lines.
#[derive(Debug, Clone)]
pub struct ContentBuffer {
    lines: Vec<String>,
    max_lines: usize,
    max_width: usize,
    truncate_style: TruncateStyle,
    sanitize: bool,
}

impl ContentBuffer {
    pub fn new(max_lines: usize, max_width: usize, truncate_style: TruncateStyle) -> Self {
        Self {
            lines: Vec::with_capacity(max_lines.min(256)),
            max_lines,
            max_width,
            truncate_style,
            sanitize: true,
        }
    }

    /// Turns the control-character scrub on or off. Only safe to disable for
    /// text the caller built itself.
    pub fn with_sanitize(mut self, sanitize: bool) -> Self {
        self.sanitize = sanitize;
        self
    }

    #[inline]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[inline]
    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    #[inline]
    pub fn max_width(&self) -> usize {
        self.max_width
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.max_lines.saturating_sub(self.lines.len())
    }

    /// Appends every line of every text, using the buffer's truncate style.
    pub fn add_lines<I, S>(&mut self, texts: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let style = self.truncate_style;
        for text in texts {
            self.push_text(text.as_ref(), style);
        }
    }

    /// Appends the lines of `text` with a one-off truncate style.
    pub fn add_line_with_style(&mut self, text: &str, style: TruncateStyle) {
        self.push_text(text, style);
    }

    fn push_text(&mut self, text: &str, style: TruncateStyle) {
        let mut dropped = 0usize;
        for line in text.split('\n') {
            if self.lines.len() >= self.max_lines {
                dropped += 1;
                continue;
            }
            let line = if self.sanitize {
                truncate(&sanitize(line), self.max_width, style)
            } else {
                truncate(line, self.max_width, style)
            };
            self.lines.push(line);
        }
        if dropped > 0 {
            log::error!(
                "content buffer full: dropped {} line(s), capacity {}",
                dropped,
                self.max_lines
            );
        }
    }

    /// Joins the lines with `\n`. Zero capacity or zero width renders as "".
    pub fn render(&self) -> String {
        if self.max_lines == 0 || self.max_width == 0 {
            return String::new();
        }
        self.lines.join("\n")
    }
}
