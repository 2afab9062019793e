//! Preview panel state.
//!
//! The preview follows the entry under the focused panel's cursor. A change
//! of target or geometry only marks the preview pending; the request goes
//! out once input has been quiet for [PREVIEW_DEBOUNCE], so holding a
//! navigation key does not queue a preview per row.

use crate::app::request::{Completed, Outcome, RequestTracker, Ticket};
use crate::core::worker::PreviewContext;

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const PREVIEW_DEBOUNCE: Duration = Duration::from_millis(75);

#[derive(Default)]
pub struct PreviewState {
    lines: Arc<Vec<String>>,
    /// Context the current `lines` were rendered for.
    shown: Option<PreviewContext>,
    /// Target and geometry the preview should currently show.
    wanted: Option<PreviewContext>,
    pending_since: Option<Instant>,
    tracker: RequestTracker<PreviewContext>,
}

impl PreviewState {
    pub fn new() -> Self {
        Self::default()
    }

    // Getters / Accessors

    #[inline]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Path of the content on screen, which lags the cursor until the
    /// newest preview has been applied.
    pub fn path(&self) -> Option<&Path> {
        self.shown.as_ref().map(|c| c.path.as_path())
    }

    /// True once the lines on screen belong to the wanted target.
    pub fn is_current(&self) -> bool {
        self.shown.is_some() && self.shown == self.wanted
    }

    #[inline]
    pub fn wanted(&self) -> Option<&PreviewContext> {
        self.wanted.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending_since.is_some() || self.tracker.is_pending()
    }

    // Request lifecycle

    /// Points the preview at `target`. Returns false if nothing changed.
    pub fn retarget(&mut self, target: Option<PreviewContext>, now: Instant) -> bool {
        if target == self.wanted {
            return false;
        }
        match target {
            Some(ctx) => {
                self.wanted = Some(ctx);
                self.pending_since = Some(now);
            }
            None => self.clear(),
        }
        true
    }

    pub fn should_trigger(&self, now: Instant) -> bool {
        self.pending_since
            .is_some_and(|since| now.saturating_duration_since(since) > PREVIEW_DEBOUNCE)
    }

    /// Issues the debounced request once it is due.
    pub fn take_request(&mut self, now: Instant) -> Option<Ticket<PreviewContext>> {
        if !self.should_trigger(now) {
            return None;
        }
        self.pending_since = None;
        let ctx = self.wanted.clone()?;
        Some(self.tracker.issue(ctx))
    }

    pub fn apply(&mut self, result: Completed<PreviewContext, Arc<Vec<String>>>) -> Outcome {
        let Some(current) = self.wanted.clone() else {
            return Outcome::Discarded;
        };
        let mut lines = None;
        let outcome = self.tracker.apply(result, &current, |v| lines = Some(v));
        if let Some(lines) = lines {
            self.lines = lines;
            self.shown = Some(current);
        }
        outcome
    }

    pub fn clear(&mut self) {
        self.lines = Arc::default();
        self.shown = None;
        self.wanted = None;
        self.pending_since = None;
    }
}
