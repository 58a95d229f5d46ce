//! Auto-refresh scheduling.
//!
//! The tail view never touches a platform timer directly; it is handed a
//! [`Scheduler`], so the polling cadence can be driven by hand in tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Handle to a repeating timer.
pub trait CancelHandle: Send {
    /// Stop the timer. Cancelling an already-cancelled timer is a no-op.
    fn cancel(&self);
}

/// Repeating-timer facility injected into the tail view.
pub trait Scheduler: Send + Sync {
    /// Invoke `task` every `interval` until the returned handle is cancelled
    /// or dropped.
    fn schedule_repeating(
        &self,
        interval: Duration,
        task: Box<dyn Fn() + Send + Sync>,
    ) -> Box<dyn CancelHandle>;
}

/// Scheduler backed by one background thread per timer.
pub struct ThreadScheduler;

struct ThreadCancelHandle {
    stop: mpsc::Sender<()>,
}

impl CancelHandle for ThreadCancelHandle {
    fn cancel(&self) {
        // A failed send means the timer thread already exited.
        let _ = self.stop.send(());
    }
}

impl Scheduler for ThreadScheduler {
    fn schedule_repeating(
        &self,
        interval: Duration,
        task: Box<dyn Fn() + Send + Sync>,
    ) -> Box<dyn CancelHandle> {
        let (stop, ticks) = mpsc::channel();

        thread::spawn(move || loop {
            match ticks.recv_timeout(interval) {
                Err(mpsc::RecvTimeoutError::Timeout) => task(),
                // Cancelled, or the handle was dropped.
                _ => break,
            }
        });

        Box::new(ThreadCancelHandle { stop })
    }
}

/// Test scheduler whose timers fire only on demand.
#[derive(Default)]
pub struct ManualScheduler {
    timers: Mutex<Vec<ManualTimer>>,
}

struct ManualTimer {
    interval: Duration,
    task: Arc<dyn Fn() + Send + Sync>,
    cancelled: Arc<AtomicBool>,
}

struct ManualCancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle for ManualCancelHandle {
    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of timers armed and not yet cancelled.
    pub fn active_count(&self) -> usize {
        self.timers
            .lock()
            .unwrap()
            .iter()
            .filter(|timer| !timer.cancelled.load(Ordering::SeqCst))
            .count()
    }

    /// Number of timers ever armed, cancelled ones included.
    pub fn scheduled_count(&self) -> usize {
        self.timers.lock().unwrap().len()
    }

    /// Intervals of the timers still active.
    pub fn active_intervals(&self) -> Vec<Duration> {
        self.timers
            .lock()
            .unwrap()
            .iter()
            .filter(|timer| !timer.cancelled.load(Ordering::SeqCst))
            .map(|timer| timer.interval)
            .collect()
    }

    /// Fire every active timer once, as one elapsed period would.
    pub fn fire(&self) {
        // Collect first: a task may cancel its own timer while running.
        let tasks: Vec<Arc<dyn Fn() + Send + Sync>> = self
            .timers
            .lock()
            .unwrap()
            .iter()
            .filter(|timer| !timer.cancelled.load(Ordering::SeqCst))
            .map(|timer| Arc::clone(&timer.task))
            .collect();

        for task in tasks {
            task();
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(
        &self,
        interval: Duration,
        task: Box<dyn Fn() + Send + Sync>,
    ) -> Box<dyn CancelHandle> {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.timers.lock().unwrap().push(ManualTimer {
            interval,
            task: Arc::from(task),
            cancelled: Arc::clone(&cancelled),
        });
        Box::new(ManualCancelHandle { cancelled })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_manual_scheduler_fires_on_demand() {
        let scheduler = ManualScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fired);
        let handle = scheduler.schedule_repeating(
            Duration::from_secs(5),
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert_eq!(fired.load(Ordering::SeqCst), 0);
        scheduler.fire();
        scheduler.fire();
        assert_eq!(fired.load(Ordering::SeqCst), 2);

        handle.cancel();
        scheduler.fire();
        assert_eq!(fired.load(Ordering::SeqCst), 2);
        assert_eq!(scheduler.active_count(), 0);
        assert_eq!(scheduler.scheduled_count(), 1);
    }

    #[test]
    fn test_manual_cancel_is_idempotent() {
        let scheduler = ManualScheduler::new();
        let handle = scheduler.schedule_repeating(Duration::from_secs(5), Box::new(|| {}));

        handle.cancel();
        handle.cancel();
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn test_manual_scheduler_reports_intervals() {
        let scheduler = ManualScheduler::new();
        let _handle = scheduler.schedule_repeating(Duration::from_secs(5), Box::new(|| {}));
        assert_eq!(scheduler.active_intervals(), vec![Duration::from_secs(5)]);
    }

    #[test]
    fn test_thread_scheduler_fires_and_cancels() {
        let scheduler = ThreadScheduler;
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fired);
        let handle = scheduler.schedule_repeating(
            Duration::from_millis(10),
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        thread::sleep(Duration::from_millis(100));
        handle.cancel();
        let count_at_cancel = fired.load(Ordering::SeqCst);
        assert!(count_at_cancel >= 1);

        thread::sleep(Duration::from_millis(50));
        // At most one tick could have been in flight when cancel landed.
        assert!(fired.load(Ordering::SeqCst) <= count_at_cancel + 1);
    }
}
