//! Deferred actions with explicit cancellation.
//!
//! A task is scheduled with a delay and comes back out of [`Scheduler::advance`] once
//! enough time has passed. The returned [`TaskHandle`] is the only way to cancel it;
//! handles are never reused, so cancelling a handle whose task already fired is a no-op.

/// Tolerance used when deciding whether a task is due (seconds).
pub const SCHEDULE_EPS: f64 = 1.0e-5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug)]
struct ScheduledTask<T> {
    scheduled_id: u64,
    due_at: f64,
    task: T,
}

/// Single-threaded timer queue driven by the owner's tick.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: f64,
    next_id: u64,
    pending: Vec<ScheduledTask<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: 0.0,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to fire after `delay` seconds. Negative delays fire on the next advance.
    pub fn schedule(&mut self, delay: f32, task: T) -> TaskHandle {
        self.next_id += 1;
        let delay = if delay.is_finite() { delay.max(0.0) } else { 0.0 };
        self.pending.push(ScheduledTask {
            scheduled_id: self.next_id,
            due_at: self.now + delay as f64,
            task,
        });
        TaskHandle(self.next_id)
    }

    /// Cancel a pending task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        match self
            .pending
            .iter()
            .position(|t| t.scheduled_id == handle.0)
        {
            Some(idx) => {
                self.pending.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.pending.iter().any(|t| t.scheduled_id == handle.0)
    }

    /// Seconds left before the task fires.
    pub fn remaining(&self, handle: TaskHandle) -> Option<f32> {
        self.pending
            .iter()
            .find(|t| t.scheduled_id == handle.0)
            .map(|t| (t.due_at - self.now).max(0.0) as f32)
    }

    /// Advance the clock by `dt` and return every task that became due, earliest first.
    /// Tasks due at the same time come out in scheduling order.
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        if dt.is_finite() && dt > 0.0 {
            self.now += dt as f64;
        }

        let now = self.now;
        let (mut due, pending): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|t| t.due_at <= now + SCHEDULE_EPS);
        self.pending = pending;

        // Stable sort keeps FIFO order among equal due times.
        due.sort_by(|a, b| a.due_at.total_cmp(&b.due_at));
        due.into_iter().map(|t| t.task).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_after_delay() {
        let mut s = Scheduler::new();
        let h = s.schedule(0.2, "ready");
        assert!(s.advance(0.1).is_empty());
        assert!(s.is_pending(h));
        assert!((s.remaining(h).unwrap() - 0.1).abs() < 1.0e-5);
        assert_eq!(s.advance(0.1), vec!["ready"]);
        assert!(!s.is_pending(h));
        assert_eq!(s.remaining(h), None);
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut s = Scheduler::new();
        let h = s.schedule(0.1, 1);
        assert!(s.cancel(h));
        assert!(!s.cancel(h));
        assert!(s.advance(1.0).is_empty());
    }

    #[test]
    fn due_tasks_are_ordered_then_fifo() {
        let mut s = Scheduler::new();
        s.schedule(0.3, 'c');
        s.schedule(0.1, 'a');
        s.schedule(0.1, 'b');
        assert_eq!(s.advance(0.5), vec!['a', 'b', 'c']);
        assert!(s.is_empty());
    }

    #[test]
    fn handles_are_not_reused() {
        let mut s = Scheduler::new();
        let first = s.schedule(0.0, ());
        s.advance(0.0);
        let second = s.schedule(0.0, ());
        assert_ne!(first, second);
        assert!(!s.cancel(first));
        assert!(s.cancel(second));
    }

    #[test]
    fn clear_drops_everything() {
        let mut s = Scheduler::new();
        s.schedule(0.1, 1);
        s.schedule(0.2, 2);
        s.clear();
        assert_eq!(s.len(), 0);
        assert!(s.advance(1.0).is_empty());
    }
}
