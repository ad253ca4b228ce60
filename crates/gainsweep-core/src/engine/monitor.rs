use crate::engine::progress::{Progress, ProgressCounters, ProgressReporter, ProgressSnapshot};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tracing::trace;

const BAR_WIDTH: usize = 50;

/// Observer that samples the shared counters on a fixed interval and reports them.
///
/// The monitor only performs atomic reads; it never takes a lock and never slows the
/// workers down. It stops once every combination is processed or once `finished` is
/// raised (after the workers have joined), and always reports one final snapshot so a
/// rendered bar does not freeze short of the end.
pub struct ProgressMonitor<'a, 'r> {
    counters: &'a ProgressCounters,
    reporter: &'a ProgressReporter<'r>,
    interval: Duration,
    finished: &'a AtomicBool,
}

impl<'a, 'r> ProgressMonitor<'a, 'r> {
    pub fn new(
        counters: &'a ProgressCounters,
        reporter: &'a ProgressReporter<'r>,
        interval: Duration,
        finished: &'a AtomicBool,
    ) -> Self {
        Self {
            counters,
            reporter,
            interval,
            finished,
        }
    }

    /// Polls until done and returns the final snapshot.
    ///
    /// Sleeps with `thread::park_timeout`, so unparking the monitor thread after raising
    /// `finished` ends the wait immediately.
    pub fn run(&self) -> ProgressSnapshot {
        loop {
            let snapshot = self.counters.snapshot();
            if snapshot.is_complete() || self.finished.load(Ordering::Acquire) {
                break;
            }
            self.render(snapshot);
            thread::park_timeout(self.interval);
        }
        let last = self.counters.snapshot();
        self.render(last);
        last
    }

    fn render(&self, snapshot: ProgressSnapshot) {
        trace!(
            found = snapshot.found,
            "{}",
            snapshot.render_bar(BAR_WIDTH)
        );
        self.reporter.report(Progress::TaskUpdate(snapshot));
    }
}
