use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskUpdate(ProgressSnapshot),
    TaskFinish(ProgressSnapshot),

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}

/// A point-in-time reading of the search counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    pub processed: u64, // Combinations evaluated so far
    pub total: u64,     // Combinations in the search space
    pub found: u64,     // Solutions accepted so far
}

impl ProgressSnapshot {
    /// Completed share in `[0, 1]`; an empty search counts as complete.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.processed.min(self.total) as f64 / self.total as f64
        }
    }

    pub fn is_complete(&self) -> bool {
        self.processed >= self.total
    }

    /// Renders a proportional text bar such as `[#####     ] 50.0%`.
    pub fn render_bar(&self, width: usize) -> String {
        let fraction = self.fraction();
        let filled = ((fraction * width as f64).round() as usize).min(width);
        format!(
            "[{}{}] {:.1}%",
            "#".repeat(filled),
            " ".repeat(width - filled),
            fraction * 100.0
        )
    }
}

/// Lock-free counters shared by workers and observers for the duration of one run.
#[derive(Debug)]
pub struct ProgressCounters {
    processed: AtomicU64,
    found: AtomicU64,
    total: u64,
}

impl ProgressCounters {
    pub fn new(total: u64) -> Self {
        Self {
            processed: AtomicU64::new(0),
            found: AtomicU64::new(0),
            total,
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    #[inline]
    pub(crate) fn record_processed(&self, count: u64) {
        self.processed.fetch_add(count, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_found(&self, count: u64) {
        self.found.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            processed: self.processed.load(Ordering::Relaxed),
            total: self.total,
            found: self.found.load(Ordering::Relaxed),
        }
    }
}
