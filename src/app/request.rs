//! Request tracking with stale-result rejection.
//!
//! Every piece of background-computed content (a directory listing, a
//! preview, a find result set, a shell command outcome) has an owner that
//! keeps a [RequestTracker]. Issuing a request snapshots the inputs the result
//! must still match into a [Ticket]. The worker carries the ticket back with
//! its result, and the owner applies the result only if the snapshot equals
//! its *current* inputs. Anything else is superseded work and is dropped
//! without an error.
//!
//! In-flight work is never cancelled. Results may complete in any order; the
//! last matching result to be applied wins.

/// A pending request: its id and the context it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<C> {
    id: u64,
    context: C,
}

impl<C> Ticket<C> {
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Pairs the ticket with the value that was computed for it.
    pub fn complete<T>(self, value: T) -> Completed<C, T> {
        Completed {
            ticket: self,
            value,
        }
    }
}

/// A finished computation carrying its originating ticket.
#[derive(Debug, Clone)]
pub struct Completed<C, T> {
    ticket: Ticket<C>,
    value: T,
}

impl<C, T> Completed<C, T> {
    #[inline]
    pub fn ticket(&self) -> &Ticket<C> {
        &self.ticket
    }

    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_parts(self) -> (Ticket<C>, T) {
        (self.ticket, self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Discarded,
}

impl Outcome {
    #[inline]
    pub fn is_applied(self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Issues tickets and gates completed results.
#[derive(Debug, Clone)]
pub struct RequestTracker<C> {
    last_issued: u64,
    last_applied: u64,
    latest: Option<C>,
}

impl<C> Default for RequestTracker<C> {
    fn default() -> Self {
        Self {
            last_issued: 0,
            last_applied: 0,
            latest: None,
        }
    }
}

impl<C: Clone + PartialEq> RequestTracker<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots `context` and hands out a ticket with a fresh id.
    pub fn issue(&mut self, context: C) -> Ticket<C> {
        self.last_issued = self.last_issued.wrapping_add(1);
        self.latest = Some(context.clone());
        Ticket {
            id: self.last_issued,
            context,
        }
    }

    /// True while the newest request has not produced an applied result.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.last_applied != self.last_issued
    }

    /// Hands the value to `apply` if the result's context equals `current`.
    pub fn apply<T>(
        &mut self,
        result: Completed<C, T>,
        current: &C,
        apply: impl FnOnce(T),
    ) -> Outcome {
        let (ticket, value) = result.into_parts();
        if ticket.context != *current {
            log::debug!(
                "discarding stale result #{} (latest #{})",
                ticket.id,
                self.last_issued
            );
            return Outcome::Discarded;
        }
        if ticket.id == self.last_issued {
            self.last_applied = ticket.id;
        }
        apply(value);
        Outcome::Applied
    }

    /// Gate for owners whose current context is simply the latest one issued
    /// (a prompt that can run one command at a time, for example).
    pub fn apply_latest<T>(&mut self, result: Completed<C, T>, apply: impl FnOnce(T)) -> Outcome {
        match self.latest.clone() {
            Some(current) => self.apply(result, &current, apply),
            None => Outcome::Discarded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Ctx {
        location: String,
        width: usize,
    }

    fn ctx(location: &str, width: usize) -> Ctx {
        Ctx {
            location: location.into(),
            width,
        }
    }

    #[test]
    fn ids_increase() {
        let mut t = RequestTracker::new();
        let a = t.issue(ctx("/a", 10));
        let b = t.issue(ctx("/b", 10));
        assert!(b.id() > a.id());
    }

    #[test]
    fn stale_result_is_discarded() {
        let mut t = RequestTracker::new();
        let mut shown = None;

        let a = t.issue(ctx("/a", 10));
        let b = t.issue(ctx("/b", 10));
        let current = ctx("/b", 10);

        let out = t.apply(a.complete("A"), &current, |v| shown = Some(v));
        assert_eq!(out, Outcome::Discarded);
        assert_eq!(shown, None);
        assert!(t.is_pending());

        let out = t.apply(b.complete("B"), &current, |v| shown = Some(v));
        assert_eq!(out, Outcome::Applied);
        assert_eq!(shown, Some("B"));
        assert!(!t.is_pending());
    }

    #[test]
    fn geometry_is_part_of_the_context() {
        let mut t = RequestTracker::new();
        let a = t.issue(ctx("/a", 10));
        let out = t.apply(a.complete(()), &ctx("/a", 12), |_| {});
        assert_eq!(out, Outcome::Discarded);
    }

    #[test]
    fn out_of_order_matching_results_apply() {
        let mut t = RequestTracker::new();
        let first = t.issue(ctx("/a", 10));
        let second = t.issue(ctx("/a", 10));
        let current = ctx("/a", 10);
        let mut seen = Vec::new();

        assert!(t.apply(second.complete(2), &current, |v| seen.push(v)).is_applied());
        assert!(t.apply(first.complete(1), &current, |v| seen.push(v)).is_applied());
        assert_eq!(seen, [2, 1]);
        assert!(!t.is_pending());
    }

    #[test]
    fn apply_latest_uses_last_issued() {
        let mut t = RequestTracker::new();
        let old = t.issue(ctx("ls", 0));
        let new = t.issue(ctx("pwd", 0));
        assert_eq!(t.apply_latest(old.complete(()), |_| {}), Outcome::Discarded);
        assert_eq!(t.apply_latest(new.complete(()), |_| {}), Outcome::Applied);

        let mut fresh: RequestTracker<Ctx> = RequestTracker::new();
        let stray = Ticket {
            id: 9,
            context: ctx("x", 0),
        };
        assert_eq!(fresh.apply_latest(stray.complete(()), |_| {}), Outcome::Discarded);
    }
}
