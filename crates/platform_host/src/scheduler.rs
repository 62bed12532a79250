//! Cancellable deferred-callback scheduling.
//!
//! Runtime transitions that unfold over time (for example the virtual-desktop switch animation)
//! schedule their later phases through [`Scheduler`] instead of touching browser timers directly.
//! The browser adapter lives in `platform_host_web`; [`ManualScheduler`] advances virtual time so
//! tests can step through phases deterministically.

use std::{cell::RefCell, rc::Rc, time::Duration};

/// Deferred single-shot callback accepted by [`Scheduler::schedule`].
pub type ScheduledTask = Box<dyn FnOnce()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Opaque handle for a scheduled callback, used to cancel it.
pub struct TimerHandle(pub u64);

/// Host service for scheduling single-shot callbacks on the UI thread.
pub trait Scheduler {
    /// Runs `task` once after `delay` and returns a handle that can cancel it.
    fn schedule(&self, delay: Duration, task: ScheduledTask) -> TimerHandle;

    /// Cancels a pending callback. Cancelling a fired or unknown handle is a no-op.
    fn cancel(&self, handle: TimerHandle);
}

struct PendingTask {
    handle: TimerHandle,
    due_ms: u64,
    task: ScheduledTask,
}

#[derive(Default)]
struct ManualClock {
    now_ms: u64,
    next_handle: u64,
    pending: Vec<PendingTask>,
}

#[derive(Clone, Default)]
/// Virtual-time scheduler. Tasks run only when [`ManualScheduler::advance`] moves time past them.
///
/// Clones share one clock, so the runtime and the test can hold separate handles.
pub struct ManualScheduler {
    inner: Rc<RefCell<ManualClock>>,
}

impl ManualScheduler {
    /// Current virtual time in milliseconds since the scheduler was created.
    pub fn now_ms(&self) -> u64 {
        self.inner.borrow().now_ms
    }

    /// Number of callbacks waiting to fire.
    pub fn pending_count(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Advances virtual time by `by`, running every task that comes due in deadline order.
    ///
    /// Tasks scheduled by a running task are eligible within the same call when their deadline
    /// falls inside the advanced window.
    pub fn advance(&self, by: Duration) {
        let target = self.now_ms().saturating_add(by.as_millis() as u64);
        loop {
            let next = {
                let mut clock = self.inner.borrow_mut();
                let due_index = clock
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, pending)| pending.due_ms <= target)
                    .min_by_key(|(_, pending)| (pending.due_ms, pending.handle))
                    .map(|(index, _)| index);
                due_index.map(|index| {
                    let pending = clock.pending.remove(index);
                    clock.now_ms = clock.now_ms.max(pending.due_ms);
                    pending.task
                })
            };
            match next {
                Some(task) => task(),
                None => break,
            }
        }
        self.inner.borrow_mut().now_ms = target;
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: ScheduledTask) -> TimerHandle {
        let mut clock = self.inner.borrow_mut();
        clock.next_handle += 1;
        let handle = TimerHandle(clock.next_handle);
        let due_ms = clock.now_ms.saturating_add(delay.as_millis() as u64);
        clock.pending.push(PendingTask {
            handle,
            due_ms,
            task,
        });
        handle
    }

    fn cancel(&self, handle: TimerHandle) {
        self.inner
            .borrow_mut()
            .pending
            .retain(|pending| pending.handle != handle);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn manual_scheduler_runs_tasks_in_deadline_order() {
        let scheduler = ManualScheduler::default();
        let log = Rc::new(RefCell::new(Vec::new()));

        for (label, delay) in [("late", 200), ("early", 50), ("mid", 100)] {
            let log = log.clone();
            scheduler.schedule(
                Duration::from_millis(delay),
                Box::new(move || log.borrow_mut().push(label)),
            );
        }

        scheduler.advance(Duration::from_millis(99));
        assert_eq!(*log.borrow(), vec!["early"]);
        scheduler.advance(Duration::from_millis(200));
        assert_eq!(*log.borrow(), vec!["early", "mid", "late"]);
        assert_eq!(scheduler.now_ms(), 299);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn cancelled_tasks_never_run() {
        let scheduler = ManualScheduler::default();
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        let handle = scheduler.schedule(Duration::from_millis(10), Box::new(move || flag.set(true)));

        scheduler.cancel(handle);
        scheduler.advance(Duration::from_secs(1));
        assert!(!fired.get());
    }

    #[test]
    fn tasks_scheduled_while_advancing_fire_inside_the_window() {
        let scheduler = ManualScheduler::default();
        let fired_at = Rc::new(Cell::new(None));
        let nested_scheduler = scheduler.clone();
        let nested_fired_at = fired_at.clone();

        scheduler.schedule(
            Duration::from_millis(100),
            Box::new(move || {
                let clock = nested_scheduler.clone();
                nested_scheduler.schedule(
                    Duration::from_millis(50),
                    Box::new(move || nested_fired_at.set(Some(clock.now_ms()))),
                );
            }),
        );

        scheduler.advance(Duration::from_millis(149));
        assert_eq!(fired_at.get(), None);
        scheduler.advance(Duration::from_millis(1));
        assert_eq!(fired_at.get(), Some(150));
    }
}
