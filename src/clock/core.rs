use std::time::Duration;

/// Handle returned when a timer is scheduled; used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A pending one-shot timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduled<K> {
    pub id: TimerId,
    pub deadline: Duration,
    pub kind: K,
}

/// Deadline-ordered one-shot timers on a virtual clock.
///
/// Timers sharing a deadline fire in scheduling order. Popping a timer moves
/// the queue's clock to that timer's deadline, so anything scheduled from
/// inside its handler is measured from the exact firing instant.
#[derive(Debug, Clone)]
pub struct TimerQueue<K> {
    now: Duration,
    next_id: u64,
    pending: Vec<Scheduled<K>>,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<K> TimerQueue<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule_after(&mut self, delay: Duration, kind: K) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled {
            id,
            deadline: self.now.saturating_add(delay),
            kind,
        });
        id
    }

    /// Remove a pending timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|timer| timer.id != id);
        before != self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|timer| timer.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn pending(&self) -> impl Iterator<Item = &Scheduled<K>> {
        self.pending.iter()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.iter().map(|timer| timer.deadline).min()
    }

    /// Take the earliest timer due at or before `until`.
    pub fn pop_due(&mut self, until: Duration) -> Option<Scheduled<K>> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.deadline <= until)
            .min_by_key(|(_, timer)| (timer.deadline, timer.id))
            .map(|(index, _)| index)?;
        let timer = self.pending.remove(index);
        if timer.deadline > self.now {
            self.now = timer.deadline;
        }
        Some(timer)
    }

    /// Move the clock forward once every due timer has been popped.
    pub fn settle(&mut self, now: Duration) {
        if now > self.now {
            self.now = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn pops_in_deadline_then_schedule_order() {
        let mut queue = TimerQueue::new();
        queue.schedule_after(ms(200), "late");
        queue.schedule_after(ms(100), "first");
        queue.schedule_after(ms(100), "second");

        let order: Vec<_> = std::iter::from_fn(|| queue.pop_due(ms(500)))
            .map(|timer| timer.kind)
            .collect();
        assert_eq!(order, vec!["first", "second", "late"]);
        assert_eq!(queue.now(), ms(200));
    }

    #[test]
    fn timers_not_yet_due_stay_pending() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule_after(ms(1000), ());
        assert!(queue.pop_due(ms(999)).is_none());
        assert!(queue.is_pending(id));
        assert_eq!(queue.next_deadline(), Some(ms(1000)));
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule_after(ms(10), ());
        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));
        assert!(queue.pop_due(ms(100)).is_none());
    }

    #[test]
    fn rescheduling_from_handler_is_measured_from_deadline() {
        let mut queue = TimerQueue::new();
        queue.schedule_after(ms(1000), 0u32);
        queue.settle(ms(350));

        let fired = queue.pop_due(ms(2500)).unwrap();
        assert_eq!(fired.deadline, ms(1350));
        queue.schedule_after(ms(1000), 1);
        let next = queue.pop_due(ms(2500)).unwrap();
        assert_eq!(next.deadline, ms(2350));
        queue.settle(ms(2500));
        assert_eq!(queue.now(), ms(2500));
    }
}
