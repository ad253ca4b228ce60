use crate::core::models::solution::Solution;
use crate::core::search_space::SearchSpace;
use crate::engine::cancel::CancellationToken;
use crate::engine::config::SearchConfig;
use crate::engine::error::EngineError;
use crate::engine::monitor::ProgressMonitor;
use crate::engine::progress::{Progress, ProgressCounters, ProgressReporter, ProgressSnapshot};
use crate::engine::scheduler::WorkScheduler;
use crate::engine::store::ResultStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub solutions: Vec<Solution>,   // Unordered; see `sort_solutions`
    pub snapshot: ProgressSnapshot, // Counters as of the join
    pub cancelled: bool,            // True if a cancellation cut the run short
    pub elapsed: Duration,
}

/// One search run: the validated configuration, the search space derived from it and
/// the per-run shared state.
///
/// The counters and cancellation token can be cloned out before [`SearchEngine::run`]
/// so that other threads can poll progress or stop the run while it executes.
pub struct SearchEngine {
    config: SearchConfig,
    space: SearchSpace,
    counters: Arc<ProgressCounters>,
    cancel: CancellationToken,
}

impl SearchEngine {
    #[instrument(skip_all, name = "search_engine_setup")]
    pub fn new(config: SearchConfig) -> Result<Self, EngineError> {
        let (x1, _) = config.input_range();
        let (_, v_max) = config.output_range();
        let space = SearchSpace::build(x1, v_max, config.step())?;
        if space.is_empty() {
            warn!("No gain combination fits the grid; the search space is empty.");
        }
        let counters = Arc::new(ProgressCounters::new(space.len()));
        Ok(Self {
            config,
            space,
            counters,
            cancel: CancellationToken::new(),
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn space(&self) -> &SearchSpace {
        &self.space
    }

    pub fn counters(&self) -> Arc<ProgressCounters> {
        Arc::clone(&self.counters)
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs the search to completion (or cancellation) and returns every accepted solution.
    #[instrument(skip_all, name = "search_workflow")]
    pub fn run(self, reporter: &ProgressReporter) -> Result<SearchOutcome, EngineError> {
        let (x1, x2) = self.config.input_range();
        let (v_min, v_max) = self.config.output_range();
        info!(
            x1,
            x2,
            v_min,
            v_max,
            step = self.config.step(),
            workers = self.config.workers(),
            combinations = self.space.len(),
            "Starting gain configuration search."
        );

        reporter.report(Progress::PhaseStart {
            name: "Searching gain configurations",
        });
        reporter.report(Progress::TaskStart {
            total_steps: self.space.len(),
        });

        let store = ResultStore::new();
        let finished = AtomicBool::new(false);
        let started = Instant::now();

        let (summary, snapshot) = thread::scope(|scope| {
            let monitor = ProgressMonitor::new(
                &self.counters,
                reporter,
                self.config.poll_interval(),
                &finished,
            );
            let handle = scope.spawn(move || monitor.run());

            let summary = WorkScheduler::new(
                &self.space,
                &self.config,
                &self.counters,
                &store,
                &self.cancel,
            )
            .run();

            finished.store(true, Ordering::Release);
            handle.thread().unpark();
            let snapshot = handle.join().unwrap_or_else(|_| {
                warn!("Progress monitor panicked; using a direct counter reading.");
                self.counters.snapshot()
            });
            (summary, snapshot)
        });
        let summary = summary?;
        let elapsed = started.elapsed();

        reporter.report(Progress::TaskFinish(snapshot));
        let solutions = store.into_solutions()?;

        if summary.cancelled {
            warn!(
                processed = snapshot.processed,
                total = snapshot.total,
                "Search cancelled before the space was exhausted."
            );
            reporter.report(Progress::Message(format!(
                "Cancelled after {} of {} combinations.",
                snapshot.processed, snapshot.total
            )));
        }
        info!(
            solutions = solutions.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Search finished."
        );
        reporter.report(Progress::PhaseFinish);

        Ok(SearchOutcome {
            solutions,
            snapshot,
            cancelled: summary.cancelled,
            elapsed,
        })
    }
}

/// Builds the engine for `config` and runs it.
pub fn run(config: &SearchConfig, reporter: &ProgressReporter) -> Result<SearchOutcome, EngineError> {
    SearchEngine::new(config.clone())?.run(reporter)
}
