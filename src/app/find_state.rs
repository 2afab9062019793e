//! Recursive find state.
//!
//! Results stream in as partial batches. Each batch passes the same
//! staleness gate as a whole listing would: it is merged only while the
//! query and base directory are still the ones it was computed for.

use crate::app::keymap::NavAction;
use crate::app::request::{Completed, Outcome, RequestTracker, Ticket};
use crate::app::viewport::Viewport;
use crate::core::find::FindResult;
use crate::core::worker::FindContext;

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Quiet time after the last keystroke before the query is sent.
pub const FIND_DEBOUNCE: Duration = Duration::from_millis(120);

#[derive(Default)]
pub struct FindState {
    base: PathBuf,
    query: String,
    results: Vec<FindResult>,
    seen: HashSet<PathBuf>,
    viewport: Viewport,
    tracker: RequestTracker<FindContext>,
    debounce: Option<Instant>,
    finished: bool,
    error: Option<String>,
    max_results: usize,
}

impl FindState {
    // Getters / Accessors

    #[inline]
    pub fn base(&self) -> &std::path::Path {
        &self.base
    }

    #[inline]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[inline]
    pub fn results(&self) -> &[FindResult] {
        &self.results
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[inline]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_searching(&self) -> bool {
        !self.query.is_empty() && (!self.is_finished() || self.debounce.is_some())
    }

    pub fn selected(&self) -> Option<&FindResult> {
        self.results.get(self.viewport.cursor())
    }

    pub fn context(&self) -> FindContext {
        FindContext {
            base: self.base.clone(),
            query: self.query.clone(),
        }
    }

    // Input

    /// Starts a fresh find rooted at `base`.
    pub fn open(&mut self, base: PathBuf, max_results: usize) {
        *self = Self {
            base,
            max_results,
            finished: true,
            ..Self::default()
        };
    }

    pub fn push_char(&mut self, c: char, now: Instant) {
        self.query.push(c);
        self.debounce = Some(now + FIND_DEBOUNCE);
    }

    pub fn pop_char(&mut self, now: Instant) {
        if self.query.pop().is_some() {
            self.debounce = Some(now + FIND_DEBOUNCE);
        }
    }

    /// Issues the request for the current query once typing has paused.
    /// An empty query clears the results instead.
    pub fn take_request(&mut self, now: Instant) -> Option<Ticket<FindContext>> {
        let until = self.debounce?;
        if now < until {
            return None;
        }
        self.debounce = None;
        self.reset_results();
        if self.query.is_empty() {
            self.finished = true;
            return None;
        }
        self.finished = false;
        Some(self.tracker.issue(self.context()))
    }

    #[inline]
    pub fn max_results(&self) -> usize {
        self.max_results
    }

    fn reset_results(&mut self) {
        self.results.clear();
        self.seen.clear();
        self.viewport.reset();
        self.error = None;
    }

    // Worker results

    /// Merges one batch: keeps score order, drops duplicates, caps the total.
    pub fn apply_batch(
        &mut self,
        batch: Completed<FindContext, Vec<FindResult>>,
        height: usize,
    ) -> Outcome {
        let current = self.context();
        let mut merged = None;
        let outcome = self.tracker.apply(batch, &current, |v| merged = Some(v));
        if let Some(batch) = merged {
            for result in batch {
                if self.seen.insert(result.path().to_path_buf()) {
                    self.results.push(result);
                }
            }
            self.results.sort();
            self.results.truncate(self.max_results.max(1));
            self.viewport.clamp(self.results.len(), height);
        }
        outcome
    }

    pub fn apply_finished(&mut self, done: Completed<FindContext, Result<usize, String>>) -> Outcome {
        let current = self.context();
        let mut status = None;
        let outcome = self.tracker.apply(done, &current, |v| status = Some(v));
        if let Some(status) = status {
            self.finished = true;
            if let Err(e) = status {
                self.error = Some(e);
            }
        }
        outcome
    }

    pub fn navigate(&mut self, action: NavAction, height: usize) {
        let count = self.results.len();
        let vp = &mut self.viewport;
        match action {
            NavAction::Up => vp.list_up(count, height),
            NavAction::Down => vp.list_down(count, height),
            NavAction::PageUp => vp.page_up(count, height),
            NavAction::PageDown => vp.page_down(count, height),
            NavAction::FastUp => vp.fast_up(5, count, height),
            NavAction::FastDown => vp.fast_down(5, count, height),
            NavAction::Top => vp.to_top(count, height),
            NavAction::Bottom => vp.to_bottom(count, height),
            NavAction::Parent | NavAction::Enter => {}
        }
    }

    /// Footer items: match count and completion state.
    pub fn info_items(&self) -> Vec<String> {
        let state = if self.error.is_some() {
            "error"
        } else if self.is_searching() {
            "searching"
        } else {
            "done"
        };
        let position = if self.results.is_empty() {
            "0/0".to_string()
        } else {
            format!("{}/{}", self.viewport.cursor() + 1, self.results.len())
        };
        vec![position, state.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEIGHT: usize = 8;

    fn result(path: &str, score: i64) -> FindResult {
        FindResult::new(PathBuf::from(path), false, score)
    }

    fn typed(find: &mut FindState, query: &str) -> Option<Ticket<FindContext>> {
        let now = Instant::now();
        for c in query.chars() {
            find.push_char(c, now);
        }
        find.take_request(now + FIND_DEBOUNCE)
    }

    #[test]
    fn batches_merge_in_score_order() -> Result<(), Box<dyn std::error::Error>> {
        let mut find = FindState::default();
        find.open(PathBuf::from("/base"), 3);
        let ticket = typed(&mut find, "ab").ok_or("no request")?;

        find.apply_batch(ticket.clone().complete(vec![result("/base/ab", 10)]), HEIGHT);
        find.apply_batch(
            ticket.clone().complete(vec![
                result("/base/x/ab", 30),
                result("/base/ab", 10),
                result("/base/y/ab", 20),
                result("/base/z/ab", 5),
            ]),
            HEIGHT,
        );
        let paths: Vec<_> = find.results().iter().map(|r| r.path().to_path_buf()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/base/x/ab"),
                PathBuf::from("/base/y/ab"),
                PathBuf::from("/base/ab")
            ]
        );
        assert!(find.is_searching());

        find.apply_finished(ticket.complete(Ok(4)));
        assert!(!find.is_searching());
        Ok(())
    }

    #[test]
    fn batches_for_an_older_query_are_dropped() -> Result<(), Box<dyn std::error::Error>> {
        let mut find = FindState::default();
        find.open(PathBuf::from("/base"), 100);
        let old = typed(&mut find, "a").ok_or("no request")?;
        let new = typed(&mut find, "b").ok_or("no request")?;
        assert_eq!(find.query(), "ab");

        let outcome = find.apply_batch(old.complete(vec![result("/base/a", 1)]), HEIGHT);
        assert_eq!(outcome, Outcome::Discarded);
        assert!(find.results().is_empty());

        assert!(find.apply_batch(new.complete(vec![result("/base/ab", 1)]), HEIGHT).is_applied());
        assert_eq!(find.results().len(), 1);
        Ok(())
    }

    #[test]
    fn empty_query_clears_without_request() {
        let mut find = FindState::default();
        find.open(PathBuf::from("/base"), 100);
        let now = Instant::now();
        find.push_char('x', now);
        find.pop_char(now);
        assert!(find.take_request(now + FIND_DEBOUNCE).is_none());
        assert!(!find.is_searching());
        assert_eq!(find.info_items(), vec!["0/0", "done"]);
    }

    #[test]
    fn debounce_holds_request() {
        let mut find = FindState::default();
        find.open(PathBuf::from("/base"), 100);
        let now = Instant::now();
        find.push_char('x', now);
        assert!(find.take_request(now).is_none());
        assert!(find.take_request(now + FIND_DEBOUNCE).is_some());
    }

    #[test]
    fn walk_error_is_reported() -> Result<(), Box<dyn std::error::Error>> {
        let mut find = FindState::default();
        find.open(PathBuf::from("/missing"), 100);
        let ticket = typed(&mut find, "q").ok_or("no request")?;
        find.apply_finished(ticket.complete(Err("not found".into())));
        assert_eq!(find.error(), Some("not found"));
        assert_eq!(find.info_items()[1], "error");
        Ok(())
    }
}
