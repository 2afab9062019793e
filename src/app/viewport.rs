//! Scrollable list cursor shared by every list-like panel.
//!
//! A [Viewport] only stores `cursor` and `render_index`. The item count and
//! the visible height are passed into each operation, since both change under
//! it (directory reloads, terminal resizes). Every operation first re-clamps
//! the stored state against the current count and height, so the invariant
//!
//! ```text
//! count == 0  =>  cursor == render_index == 0
//! count  > 0  =>  render_index <= cursor <= render_index + height - 1 < ...
//!                 and cursor < count
//! ```
//!
//! holds after every call.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    cursor: usize,
    render_index: usize,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn render_index(&self) -> usize {
        self.render_index
    }

    /// Range of item indices currently visible.
    pub fn visible_range(&self, count: usize, height: usize) -> std::ops::Range<usize> {
        let end = (self.render_index + height).min(count);
        self.render_index.min(end)..end
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Restores the invariant after the list or the height changed. Moves the
    /// viewport only as far as needed.
    pub fn clamp(&mut self, count: usize, height: usize) {
        if count == 0 {
            self.reset();
            return;
        }
        let height = height.max(1);
        self.cursor = self.cursor.min(count - 1);
        self.render_index = self
            .render_index
            .min(self.cursor)
            .min(Self::tail_index(count, height));
        if self.cursor > self.render_index + height - 1 {
            self.render_index = self.cursor + 1 - height;
        }
    }

    fn tail_index(count: usize, height: usize) -> usize {
        count.saturating_sub(height)
    }

    /// Moves up one item, wrapping to the last one.
    pub fn list_up(&mut self, count: usize, height: usize) {
        self.clamp(count, height);
        if count == 0 {
            return;
        }
        let height = height.max(1);
        if self.cursor == 0 {
            self.cursor = count - 1;
            self.render_index = Self::tail_index(count, height);
            return;
        }
        self.cursor -= 1;
        if self.cursor < self.render_index {
            self.render_index = self.cursor;
        }
    }

    /// Moves down one item, wrapping to the first one.
    pub fn list_down(&mut self, count: usize, height: usize) {
        self.clamp(count, height);
        if count == 0 {
            return;
        }
        let height = height.max(1);
        if self.cursor == count - 1 {
            self.cursor = 0;
            self.render_index = 0;
            return;
        }
        self.cursor += 1;
        if self.cursor > self.render_index + height - 1 {
            self.render_index = self.cursor + 1 - height;
        }
    }

    /// Moves up by `height` items and recenters. Snaps to the first item when
    /// the list fits in one screen.
    pub fn page_up(&mut self, count: usize, height: usize) {
        self.page(count, height, height, false);
    }

    /// Moves down by `height` items and recenters. Snaps to the last item when
    /// the list fits in one screen.
    pub fn page_down(&mut self, count: usize, height: usize) {
        self.page(count, height, height, true);
    }

    /// Paging with a custom scroll unit.
    pub fn page_by(&mut self, count: usize, height: usize, unit: usize, down: bool) {
        self.page(count, height, unit, down);
    }

    fn page(&mut self, count: usize, height: usize, unit: usize, down: bool) {
        self.clamp(count, height);
        if count == 0 {
            return;
        }
        let height = height.max(1);

        self.cursor = if height >= count {
            if down { count - 1 } else { 0 }
        } else if down {
            (self.cursor + unit).min(count - 1)
        } else {
            self.cursor.saturating_sub(unit)
        };

        self.render_index = self
            .cursor
            .saturating_sub(height / 2)
            .min(Self::tail_index(count, height));
    }

    /// Jumps to `target` if it is in range and scrolls just enough to show it.
    pub fn scroll_to(&mut self, target: usize, count: usize, height: usize) {
        self.clamp(count, height);
        if target >= count {
            return;
        }
        let height = height.max(1);
        self.cursor = target;
        if self.cursor < self.render_index {
            self.render_index = self.cursor;
        } else if self.cursor > self.render_index + height - 1 {
            self.render_index = self.cursor + 1 - height;
        }
    }

    /// Moves up by `step` without wrapping.
    pub fn fast_up(&mut self, step: usize, count: usize, height: usize) {
        self.clamp(count, height);
        if count == 0 {
            return;
        }
        let target = self.cursor.saturating_sub(step);
        self.scroll_to(target, count, height);
    }

    /// Moves down by `step` without wrapping.
    pub fn fast_down(&mut self, step: usize, count: usize, height: usize) {
        self.clamp(count, height);
        if count == 0 {
            return;
        }
        let target = (self.cursor + step).min(count - 1);
        self.scroll_to(target, count, height);
    }

    pub fn to_top(&mut self, count: usize, height: usize) {
        self.scroll_to(0, count, height);
    }

    pub fn to_bottom(&mut self, count: usize, height: usize) {
        self.scroll_to(count.saturating_sub(1), count, height);
    }

    #[cfg(test)]
    pub(crate) fn with_state(cursor: usize, render_index: usize) -> Self {
        Self {
            cursor,
            render_index,
        }
    }
}
