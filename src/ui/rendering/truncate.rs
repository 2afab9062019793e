//! Width-bounded, escape-aware text shortening.
//!
//! Every function in here treats ANSI escape sequences (CSI, OSC, and the
//! string-terminated families) as zero-width and copies them through
//! verbatim, even past the point where visible text is cut. Only printable
//! characters count toward the display width.
//!
//! [sanitize] must run before [truncate] whenever input comes from an
//! untrusted source (file previews, command output), since expanding tabs
//! and dropping control characters changes the width.

use unicode_width::UnicodeWidthChar;

const ESC: char = '\x1b';
const BEL: char = '\x07';
const NBSP: char = '\u{a0}';
const TAB_SPACES: &str = "    ";

/// The marker appended by [TruncateStyle::Tail].
pub const TAIL: &str = "...";
const TAIL_WIDTH: usize = 3;

/// How overflowing text is shortened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TruncateStyle {
    /// Drop the overflow, no marker.
    #[default]
    Plain,
    /// Reserve three cells for [TAIL]. Widths below that yield an empty string.
    Tail,
}

/// A piece of a styled string: either a whole escape sequence or one visible char.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Escape(&'a str),
    Text(char),
}

/// Splits a string into escape sequences and visible characters.
pub(crate) struct Segments<'a> {
    src: &'a str,
    pos: usize,
}

pub(crate) fn segments(src: &str) -> Segments<'_> {
    Segments { src, pos: 0 }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.src[self.pos..];
        let mut chars = rest.chars();
        let first = chars.next()?;

        if first != ESC {
            self.pos += first.len_utf8();
            return Some(Segment::Text(first));
        }

        let len = escape_len(rest);
        self.pos += len;
        Some(Segment::Escape(&rest[..len]))
    }
}

/// Byte length of the escape sequence at the start of `s` (which begins with ESC).
fn escape_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let Some(&kind) = bytes.get(1) else {
        return 1;
    };

    match kind {
        // CSI: parameters and intermediates, then one final byte in 0x40..=0x7e
        b'[' => {
            for (i, &b) in bytes.iter().enumerate().skip(2) {
                if (0x40..=0x7e).contains(&b) {
                    return i + 1;
                }
            }
            bytes.len()
        }
        // OSC ends with BEL or ST, DCS/SOS/PM/APC end with ST
        b']' | b'P' | b'X' | b'^' | b'_' => {
            let mut i = 2;
            while i < bytes.len() {
                if kind == b']' && bytes[i] == BEL as u8 {
                    return i + 1;
                }
                if bytes[i] == ESC as u8 && bytes.get(i + 1) == Some(&b'\\') {
                    return i + 2;
                }
                i += 1;
            }
            bytes.len()
        }
        // Two-byte escape, keep the following char whole
        _ => {
            let next = s[1..].chars().next().map_or(0, char::len_utf8);
            1 + next
        }
    }
}

#[inline]
fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Display width of `s`, ignoring escape sequences.
pub fn display_width(s: &str) -> usize {
    segments(s)
        .map(|seg| match seg {
            Segment::Text(c) => char_width(c),
            Segment::Escape(_) => 0,
        })
        .sum()
}

/// Removes every escape sequence from `s`.
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for seg in segments(s) {
        if let Segment::Text(c) = seg {
            out.push(c);
        }
    }
    out
}

/// Shortens `line` so its display width is at most `max_width`.
///
/// Escape sequences are copied through untouched, including the ones that
/// follow the cut, so a trailing reset survives. A wide character that would
/// straddle the boundary is dropped whole.
pub fn truncate(line: &str, max_width: usize, style: TruncateStyle) -> String {
    match style {
        TruncateStyle::Plain => cut(line, max_width, ""),
        TruncateStyle::Tail => {
            if display_width(line) <= max_width {
                return line.to_owned();
            }
            if max_width < TAIL_WIDTH {
                return String::new();
            }
            cut(line, max_width - TAIL_WIDTH, TAIL)
        }
    }
}

/// Keeps visible text up to `budget` cells, writes `marker` at the cut point (if
/// a cut happened) and keeps only escapes after it.
fn cut(line: &str, budget: usize, marker: &str) -> String {
    let mut out = String::with_capacity(line.len().min(budget * 4 + 16));
    let mut used = 0;
    let mut cut = false;

    for seg in segments(line) {
        match seg {
            Segment::Escape(esc) => out.push_str(esc),
            Segment::Text(_) if cut => {}
            Segment::Text(c) => {
                let w = char_width(c);
                if used + w > budget {
                    cut = true;
                    out.push_str(marker);
                    continue;
                }
                used += w;
                out.push(c);
            }
        }
    }
    out
}

/// Keeps the end of an unstyled string, prefixing [TAIL] when something was cut.
/// Used for paths, where the last components matter most.
pub fn truncate_left(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_owned();
    }
    if max_width < TAIL_WIDTH {
        return String::new();
    }
    let budget = max_width - TAIL_WIDTH;
    let mut used = 0;
    let mut start = s.len();
    for (idx, c) in s.char_indices().rev() {
        let w = char_width(c);
        if used + w > budget {
            break;
        }
        used += w;
        start = idx;
    }
    format!("{TAIL}{}", &s[start..])
}

/// Removes characters that would corrupt a fixed-width grid.
///
/// Tabs become four spaces, multi-byte whitespace becomes a plain space,
/// U+FFFD and control characters are dropped. ESC is kept so styled text
/// stays styled, and newlines are kept for the caller to split on.
pub fn sanitize(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            char::REPLACEMENT_CHARACTER => {}
            NBSP => out.push(c),
            '\t' => out.push_str(TAB_SPACES),
            ESC | '\n' => out.push(c),
            c if !c.is_ascii() => {
                if c.is_control() {
                    continue;
                }
                out.push(if c.is_whitespace() { ' ' } else { c });
            }
            c if c.is_ascii_graphic() || c == ' ' => out.push(c),
            _ => {}
        }
    }
    out
}
