use web_time::{Duration, Instant};

/// Deadline queue of one-shot events.
///
/// Events fire in deadline order; events sharing a deadline fire in the
/// order they were scheduled.
#[derive(Debug, Clone)]
pub struct Timers<E> {
    queue: Vec<(Instant, E)>,
}

impl<E> Default for Timers<E> {
    fn default() -> Self {
        Self { queue: Vec::new() }
    }
}

impl<E> Timers<E> {
    /// Empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `event` once `delay` has passed after `now`.
    pub fn schedule(&mut self, now: Instant, delay: Duration, event: E) {
        self.schedule_at(now + delay, event);
    }

    /// Fire `event` at `deadline`.
    pub fn schedule_at(&mut self, deadline: Instant, event: E) {
        let at = self.queue.partition_point(|(t, _)| *t <= deadline);
        self.queue.insert(at, (deadline, event));
    }

    /// Drop every pending event matching `pred`. Returns how many were
    /// dropped.
    pub fn cancel(&mut self, mut pred: impl FnMut(&E) -> bool) -> usize {
        let before = self.queue.len();
        self.queue.retain(|(_, e)| !pred(e));
        before - self.queue.len()
    }

    /// Remove and return every event due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<E> {
        let due = self.queue.partition_point(|(t, _)| *t <= now);
        self.queue.drain(..due).map(|(_, e)| e).collect()
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.first().map(|(t, _)| *t)
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop every pending event.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_fire_in_deadline_order() {
        let now = Instant::now();
        let mut timers = Timers::new();
        timers.schedule(now, Duration::from_millis(300), "c");
        timers.schedule(now, Duration::from_millis(100), "a");
        timers.schedule(now, Duration::from_millis(100), "b");
        assert_eq!(timers.next_deadline(), Some(now + Duration::from_millis(100)));

        assert!(timers.take_due(now).is_empty());
        assert_eq!(timers.take_due(now + Duration::from_millis(150)), vec!["a", "b"]);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.take_due(now + Duration::from_secs(1)), vec!["c"]);
        assert!(timers.is_empty());
    }

    #[test]
    fn cancel_drops_matching_events() {
        let now = Instant::now();
        let mut timers = Timers::new();
        timers.schedule(now, Duration::from_millis(10), 1);
        timers.schedule(now, Duration::from_millis(20), 2);
        timers.schedule(now, Duration::from_millis(30), 1);
        assert_eq!(timers.cancel(|e| *e == 1), 2);
        assert_eq!(timers.take_due(now + Duration::from_secs(1)), vec![2]);
    }
}
