use crate::core::search_space::SearchSpace;
use crate::engine::cancel::CancellationToken;
use crate::engine::config::{ScheduleStrategy, SearchConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressCounters;
use crate::engine::solver::FeasibilitySolver;
use crate::engine::store::ResultStore;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerReport {
    pub worker: usize,
    pub processed: u64,
    pub found: u64,
    pub cancelled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleSummary {
    pub processed: u64,
    pub found: u64,
    pub cancelled: bool,
    pub workers: Vec<WorkerReport>,
}

/// Where a worker takes its next batch of combination indices from.
enum WorkSource<'c> {
    Cursor {
        cursor: &'c AtomicU64,
        batch: u64,
        total: u64,
    },
    Chunk {
        next: u64,
        end: u64,
        batch: u64,
    },
}

impl WorkSource<'_> {
    fn next_batch(&mut self) -> Option<Range<u64>> {
        match self {
            WorkSource::Cursor {
                cursor,
                batch,
                total,
            } => {
                let start = cursor.fetch_add(*batch, Ordering::Relaxed);
                (start < *total).then(|| start..start.saturating_add(*batch).min(*total))
            }
            WorkSource::Chunk { next, end, batch } => {
                if *next >= *end {
                    return None;
                }
                let start = *next;
                *next = start.saturating_add(*batch).min(*end);
                Some(start..*next)
            }
        }
    }
}

/// Contiguous slice of `0..total` owned by `worker` when the space is split statically.
///
/// The first `total % workers` workers take one extra index, so slice lengths differ by
/// at most one and the slices tile `0..total` in worker order.
pub fn chunk_bounds(worker: usize, workers: usize, total: u64) -> Range<u64> {
    let workers = workers.max(1) as u64;
    let worker = worker as u64;
    let base = total / workers;
    let remainder = total % workers;
    let start = worker * base + worker.min(remainder);
    let len = base + u64::from(worker < remainder);
    start..start + len
}

/// Distributes the combination space over a fixed pool of workers.
///
/// Every index is evaluated exactly once. Workers find out on their own that the space
/// is exhausted, and the only point where they can wait on each other is the append
/// to the result store.
pub struct WorkScheduler<'a> {
    space: &'a SearchSpace,
    config: &'a SearchConfig,
    counters: &'a ProgressCounters,
    store: &'a ResultStore,
    cancel: &'a CancellationToken,
}

impl<'a> WorkScheduler<'a> {
    pub fn new(
        space: &'a SearchSpace,
        config: &'a SearchConfig,
        counters: &'a ProgressCounters,
        store: &'a ResultStore,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            space,
            config,
            counters,
            store,
            cancel,
        }
    }

    pub fn run(&self) -> Result<ScheduleSummary, EngineError> {
        let workers = self.config.workers();
        let total = self.space.len();
        // Clamped to the space so `fetch_add` cannot wrap.
        let batch = self.config.batch_size().min(total.max(1));
        let cursor = AtomicU64::new(0);

        debug!(
            workers,
            total,
            batch,
            schedule = ?self.config.schedule(),
            "Dispatching search workers."
        );

        let reports = self.dispatch(workers, |worker| {
            let source = match self.config.schedule() {
                ScheduleStrategy::SharedCursor => WorkSource::Cursor {
                    cursor: &cursor,
                    batch,
                    total,
                },
                ScheduleStrategy::StaticChunks => {
                    let range = chunk_bounds(worker, workers, total);
                    WorkSource::Chunk {
                        next: range.start,
                        end: range.end,
                        batch,
                    }
                }
            };
            self.run_worker(worker, source)
        })?;

        let mut summary = ScheduleSummary::default();
        for report in reports {
            let report = report?;
            debug!(
                worker = report.worker,
                processed = report.processed,
                found = report.found,
                "Worker finished."
            );
            summary.processed += report.processed;
            summary.found += report.found;
            summary.cancelled |= report.cancelled;
            summary.workers.push(report);
        }

        if !summary.cancelled && summary.processed != total {
            return Err(EngineError::Internal(format!(
                "Workers processed {} of {} combinations.",
                summary.processed, total
            )));
        }
        Ok(summary)
    }

    #[cfg(feature = "parallel")]
    fn dispatch<F, R>(&self, workers: usize, job: F) -> Result<Vec<R>, EngineError>
    where
        F: Fn(usize) -> R + Sync,
        R: Send,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("gainsweep-worker-{i}"))
            .build()
            .map_err(|e| {
                EngineError::Initialization(format!("Failed to build worker pool: {e}"))
            })?;
        info!(threads = pool.current_num_threads(), "Worker pool ready.");
        Ok(pool.broadcast(|ctx| job(ctx.index())))
    }

    #[cfg(not(feature = "parallel"))]
    fn dispatch<F, R>(&self, workers: usize, job: F) -> Result<Vec<R>, EngineError>
    where
        F: Fn(usize) -> R + Sync,
        R: Send,
    {
        Ok((0..workers).map(job).collect())
    }

    #[instrument(skip_all, name = "search_worker", fields(worker = worker))]
    fn run_worker(
        &self,
        worker: usize,
        mut source: WorkSource<'_>,
    ) -> Result<WorkerReport, EngineError> {
        let solver = FeasibilitySolver::new(self.config);
        let mut report = WorkerReport {
            worker,
            ..WorkerReport::default()
        };

        while let Some(batch) = source.next_batch() {
            if self.cancel.is_cancelled() {
                debug!(worker, "Cancellation observed; worker stopping.");
                report.cancelled = true;
                break;
            }
            for combination in self.space.range(batch) {
                let solutions = solver.evaluate(&combination);
                let found = solutions.len() as u64;
                if found > 0 {
                    self.store.append(solutions).map_err(|e| EngineError::Worker {
                        worker,
                        reason: e.to_string(),
                    })?;
                    self.counters.record_found(found);
                    report.found += found;
                }
                self.counters.record_processed(1);
                report.processed += 1;
            }
        }
        Ok(report)
    }
}
