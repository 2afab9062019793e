//! Refresh throttling for directory listings.
//!
//! Panels re-list their directory periodically to pick up changes made by
//! other programs. Unfocused panels are held to a fixed cool-down. The
//! focused panel refreshes sooner, with a delay that grows with the number of
//! entries (one second per hundred, bounded) so a huge directory is not
//! re-scanned on every tick while a small one stays fresh.

use std::time::{Duration, Instant};

const BACKGROUND_COOLDOWN: Duration = Duration::from_secs(3);
const FOCUSED_MIN_DELAY: Duration = Duration::from_millis(500);
const FOCUSED_MAX_DELAY: Duration = Duration::from_secs(3);
const ITEMS_PER_SECOND: usize = 100;

#[derive(Debug, Clone, Copy)]
pub struct RefreshPolicy {
    background_cooldown: Duration,
    focused_min: Duration,
    focused_max: Duration,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            background_cooldown: BACKGROUND_COOLDOWN,
            focused_min: FOCUSED_MIN_DELAY,
            focused_max: FOCUSED_MAX_DELAY,
        }
    }
}

impl RefreshPolicy {
    pub fn new(background_cooldown: Duration, focused_min: Duration, focused_max: Duration) -> Self {
        Self {
            background_cooldown,
            focused_min,
            focused_max: focused_max.max(focused_min),
        }
    }

    /// Minimum time between two refreshes of a panel.
    pub fn delay(&self, focused: bool, item_count: usize) -> Duration {
        if !focused {
            return self.background_cooldown;
        }
        let scaled = Duration::from_secs((item_count / ITEMS_PER_SECOND) as u64);
        scaled.clamp(self.focused_min, self.focused_max)
    }

    /// Whether a panel last refreshed at `last` should refresh at `now`.
    pub fn should_refresh(
        &self,
        last: Option<Instant>,
        now: Instant,
        focused: bool,
        item_count: usize,
        forced: bool,
    ) -> bool {
        if forced {
            return true;
        }
        match last {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.delay(focused, item_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_uses_cooldown() {
        let p = RefreshPolicy::default();
        let start = Instant::now();
        assert!(!p.should_refresh(Some(start), start + Duration::from_secs(1), false, 5, false));
        assert!(p.should_refresh(Some(start), start + Duration::from_secs(3), false, 5, false));
        assert!(p.should_refresh(Some(start), start, false, 5, true));
    }

    #[test]
    fn focused_delay_scales_with_count() {
        let p = RefreshPolicy::default();
        assert_eq!(p.delay(true, 10), FOCUSED_MIN_DELAY);
        assert_eq!(p.delay(true, 250), Duration::from_secs(2));
        assert_eq!(p.delay(true, 100_000), FOCUSED_MAX_DELAY);
        assert!(p.delay(true, 10) < p.delay(false, 10));
    }

    #[test]
    fn never_refreshed_panel_refreshes() {
        let p = RefreshPolicy::default();
        assert!(p.should_refresh(None, Instant::now(), false, 0, false));
    }
}
