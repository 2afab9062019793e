//! Border composition for one rectangular frame.
//!
//! [BorderGlyphs] is the plain glyph template. [BorderConfig] specializes it for
//! a frame: a title embedded in the top edge, info items along the bottom edge
//! and divider junctions on the side edges. The three decorations are computed
//! independently and each touches only its own edge.
//!
//! All glyphs are expected to be one cell wide.

use crate::ui::rendering::truncate::{
    TruncateStyle, display_width, sanitize, strip_ansi, truncate,
};

/// Smallest inner width that can show one character of a title:
/// two junction glyphs, two spaces and the character.
pub const MIN_TITLE_WIDTH: usize = 5;
/// Smallest inner width per info item: two junction glyphs, one fill glyph and
/// one character.
pub const MIN_INFO_ITEM_WIDTH: usize = 4;
/// Junctions plus the trailing fill glyph around each info item.
const INFO_ITEM_DECORATION: usize = 3;
/// Junctions plus the padding spaces around the title.
const TITLE_DECORATION: usize = 4;
const CORNERS: usize = 2;

/// Text that has to stay on one edge row: no escapes, no control characters.
fn edge_label(text: &str) -> String {
    sanitize(&strip_ansi(text)).replace('\n', " ")
}

/// The glyphs used to draw a frame.
///
/// `middle_left` and `middle_right` are the junction glyphs: `├` and `┤` in the
/// rounded set. They close off titles and info items and mark section
/// dividers on the side edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorderGlyphs {
    pub top: String,
    pub bottom: String,
    pub left: String,
    pub right: String,
    pub top_left: String,
    pub top_right: String,
    pub bottom_left: String,
    pub bottom_right: String,
    pub middle_left: String,
    pub middle_right: String,
}

impl BorderGlyphs {
    #[allow(clippy::too_many_arguments)]
    fn from_chars(
        top: char,
        bottom: char,
        left: char,
        right: char,
        corners: [char; 4],
        middle_left: char,
        middle_right: char,
    ) -> Self {
        Self {
            top: top.into(),
            bottom: bottom.into(),
            left: left.into(),
            right: right.into(),
            top_left: corners[0].into(),
            top_right: corners[1].into(),
            bottom_left: corners[2].into(),
            bottom_right: corners[3].into(),
            middle_left: middle_left.into(),
            middle_right: middle_right.into(),
        }
    }

    pub fn rounded() -> Self {
        Self::from_chars('─', '─', '│', '│', ['╭', '╮', '╰', '╯'], '├', '┤')
    }

    pub fn square() -> Self {
        Self::from_chars('─', '─', '│', '│', ['┌', '┐', '└', '┘'], '├', '┤')
    }

    pub fn double() -> Self {
        Self::from_chars('═', '═', '║', '║', ['╔', '╗', '╚', '╝'], '╠', '╣')
    }

    pub fn ascii() -> Self {
        Self::from_chars('-', '-', '|', '|', ['+', '+', '+', '+'], '+', '+')
    }
}

impl Default for BorderGlyphs {
    fn default() -> Self {
        Self::rounded()
    }
}

/// Decorations for one frame. `width` and `height` include the corners.
#[derive(Debug, Clone)]
pub struct BorderConfig {
    width: usize,
    height: usize,
    title: String,
    info_items: Vec<String>,
    dividers: Vec<usize>,
    title_left_margin: usize,
}

impl BorderConfig {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            title: String::new(),
            info_items: Vec::new(),
            dividers: Vec::new(),
            title_left_margin: 1,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn dividers(&self) -> &[usize] {
        &self.dividers
    }

    /// Width between the corners.
    #[inline]
    fn inner_width(&self) -> usize {
        self.width.saturating_sub(CORNERS)
    }

    /// Escape sequences are stripped; the title takes the border's style.
    pub fn set_title(&mut self, title: &str) {
        self.title = edge_label(title);
    }

    pub fn set_title_left_margin(&mut self, margin: usize) {
        self.title_left_margin = margin;
    }

    /// Escape sequences are stripped; items take the border's style.
    pub fn set_info_items<I, S>(&mut self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.info_items = items
            .into_iter()
            .map(|item| edge_label(item.as_ref()))
            .collect();
    }

    /// Marks content row `row` (0-based, below the top edge) as a divider.
    pub fn add_divider(&mut self, row: usize) {
        if row >= self.height.saturating_sub(CORNERS) {
            log::warn!(
                "divider row {} outside of frame height {}",
                row,
                self.height
            );
            return;
        }
        if !self.dividers.contains(&row) {
            self.dividers.push(row);
        }
    }

    fn info_items_fit(&self) -> bool {
        let count = self.info_items.len();
        count > 0 && self.inner_width() >= count * MIN_INFO_ITEM_WIDTH
    }

    fn info_item_width(&self) -> usize {
        match self.info_items.len() {
            0 => 0,
            count => (self.inner_width() / count).saturating_sub(INFO_ITEM_DECORATION),
        }
    }

    /// True when the info items will not render in full: either the group
    /// does not fit at all, or at least one item is cut.
    pub fn are_info_items_truncated(&self) -> bool {
        if self.info_items.is_empty() {
            return false;
        }
        if !self.info_items_fit() {
            return true;
        }
        let avail = self.info_item_width();
        self.info_items
            .iter()
            .any(|item| display_width(item) > avail)
    }

    /// Top edge between the corners, with the title embedded when it fits.
    pub fn top_edge(&self, glyphs: &BorderGlyphs) -> String {
        let inner = self.inner_width();
        if self.title.is_empty() || inner < MIN_TITLE_WIDTH {
            return glyphs.top.repeat(inner);
        }

        let title = truncate(&self.title, inner - TITLE_DECORATION, TruncateStyle::Plain);
        let mut remaining = inner - TITLE_DECORATION - display_width(&title);

        let mut edge = String::with_capacity(self.width * 4);
        if remaining > self.title_left_margin {
            edge.push_str(&glyphs.top.repeat(self.title_left_margin));
            remaining -= self.title_left_margin;
        }
        edge.push_str(&glyphs.middle_right);
        edge.push(' ');
        edge.push_str(&title);
        edge.push(' ');
        edge.push_str(&glyphs.middle_left);
        edge.push_str(&glyphs.top.repeat(remaining));
        edge
    }

    /// Bottom edge between the corners, info items right-aligned when they fit
    /// as a group.
    pub fn bottom_edge(&self, glyphs: &BorderGlyphs) -> String {
        let inner = self.inner_width();
        if !self.info_items_fit() {
            return glyphs.bottom.repeat(inner);
        }

        let avail = self.info_item_width();
        let mut items = String::new();
        let mut used = 0;
        for item in &self.info_items {
            let item = truncate(item, avail, TruncateStyle::Plain);
            used += display_width(&item) + INFO_ITEM_DECORATION;
            items.push_str(&glyphs.middle_right);
            items.push_str(&item);
            items.push_str(&glyphs.middle_left);
            items.push_str(&glyphs.bottom);
        }

        let mut edge = glyphs.bottom.repeat(inner.saturating_sub(used));
        edge.push_str(&items);
        edge
    }

    /// Left and right glyphs for content row `row`.
    pub fn side_glyphs<'g>(&self, row: usize, glyphs: &'g BorderGlyphs) -> (&'g str, &'g str) {
        if self.dividers.contains(&row) {
            (&glyphs.middle_left, &glyphs.middle_right)
        } else {
            (&glyphs.left, &glyphs.right)
        }
    }
}
