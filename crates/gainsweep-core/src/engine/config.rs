use crate::core::EPSILON;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BATCH_SIZE: u64 = 64;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Input range must satisfy x1 < x2 (got x1 = {x1}, x2 = {x2})")]
    InvalidInputRange { x1: f64, x2: f64 },

    #[error("Output range must satisfy Vmin < Vmax (got Vmin = {v_min}, Vmax = {v_max})")]
    InvalidOutputRange { v_min: f64, v_max: f64 },

    #[error("Gain step must be greater than the 1e-6 tolerance (got {0})")]
    InvalidStep(f64),

    #[error("Worker count must be at least 1")]
    InvalidWorkers,

    #[error("Batch size must be at least 1")]
    InvalidBatchSize,
}

/// How the combination index space is divided among workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScheduleStrategy {
    /// Workers claim batches from one atomically advanced cursor.
    #[default]
    SharedCursor,
    /// Each worker owns one precomputed contiguous slice.
    StaticChunks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentMode {
    /// Try all 24 gain-to-zone permutations.
    #[default]
    Exhaustive,
    /// Only try the largest-gain-first ordering. Fast path; may miss non-monotone layouts.
    SortedDescending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    /// Record every feasible assignment of a combination.
    #[default]
    All,
    /// Stop at the first feasible assignment. Incomplete: drops alternative layouts.
    FirstMatch,
}

/// A validated, immutable search configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    x1: f64,
    x2: f64,
    v_min: f64,
    v_max: f64,
    step: f64,
    workers: usize,
    schedule: ScheduleStrategy,
    assignment_mode: AssignmentMode,
    match_policy: MatchPolicy,
    batch_size: u64,
    poll_interval: Duration,
}

impl SearchConfig {
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::new()
    }

    pub fn input_range(&self) -> (f64, f64) {
        (self.x1, self.x2)
    }

    pub fn output_range(&self) -> (f64, f64) {
        (self.v_min, self.v_max)
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn schedule(&self) -> ScheduleStrategy {
        self.schedule
    }

    pub fn assignment_mode(&self) -> AssignmentMode {
        self.assignment_mode
    }

    pub fn match_policy(&self) -> MatchPolicy {
        self.match_policy
    }

    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

#[derive(Default)]
pub struct SearchConfigBuilder {
    input_range: Option<(f64, f64)>,
    output_range: Option<(f64, f64)>,
    step: Option<f64>,
    workers: Option<usize>,
    schedule: Option<ScheduleStrategy>,
    assignment_mode: Option<AssignmentMode>,
    match_policy: Option<MatchPolicy>,
    batch_size: Option<u64>,
    poll_interval: Option<Duration>,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_range(mut self, x1: f64, x2: f64) -> Self {
        self.input_range = Some((x1, x2));
        self
    }
    pub fn output_range(mut self, v_min: f64, v_max: f64) -> Self {
        self.output_range = Some((v_min, v_max));
        self
    }
    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }
    pub fn schedule(mut self, schedule: ScheduleStrategy) -> Self {
        self.schedule = Some(schedule);
        self
    }
    pub fn assignment_mode(mut self, mode: AssignmentMode) -> Self {
        self.assignment_mode = Some(mode);
        self
    }
    pub fn match_policy(mut self, policy: MatchPolicy) -> Self {
        self.match_policy = Some(policy);
        self
    }
    pub fn batch_size(mut self, batch_size: u64) -> Self {
        self.batch_size = Some(batch_size);
        self
    }
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    pub fn build(self) -> Result<SearchConfig, ConfigError> {
        let (x1, x2) = self
            .input_range
            .ok_or(ConfigError::MissingParameter("input_range"))?;
        let (v_min, v_max) = self
            .output_range
            .ok_or(ConfigError::MissingParameter("output_range"))?;
        let step = self.step.ok_or(ConfigError::MissingParameter("step"))?;

        if !(x1.is_finite() && x2.is_finite() && x1 < x2) {
            return Err(ConfigError::InvalidInputRange { x1, x2 });
        }
        if !(v_min.is_finite() && v_max.is_finite() && v_min < v_max) {
            return Err(ConfigError::InvalidOutputRange { v_min, v_max });
        }
        if !(step.is_finite() && step > EPSILON) {
            return Err(ConfigError::InvalidStep(step));
        }

        let workers = self.workers.unwrap_or_else(default_workers);
        if workers == 0 {
            return Err(ConfigError::InvalidWorkers);
        }
        let batch_size = self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE);
        if batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize);
        }

        Ok(SearchConfig {
            x1,
            x2,
            v_min,
            v_max,
            step,
            workers,
            schedule: self.schedule.unwrap_or_default(),
            assignment_mode: self.assignment_mode.unwrap_or_default(),
            match_policy: self.match_policy.unwrap_or_default(),
            batch_size,
            poll_interval: self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> SearchConfigBuilder {
        SearchConfigBuilder::new()
            .input_range(1.0, 4.0)
            .output_range(2.0, 8.0)
            .step(1.0)
    }

    #[test]
    fn build_applies_defaults_for_optional_knobs() {
        let config = base().build().unwrap();
        assert_eq!(config.input_range(), (1.0, 4.0));
        assert_eq!(config.output_range(), (2.0, 8.0));
        assert_eq!(config.step(), 1.0);
        assert_eq!(config.workers(), default_workers());
        assert_eq!(config.schedule(), ScheduleStrategy::SharedCursor);
        assert_eq!(config.assignment_mode(), AssignmentMode::Exhaustive);
        assert_eq!(config.match_policy(), MatchPolicy::All);
        assert_eq!(config.batch_size(), DEFAULT_BATCH_SIZE);
        assert_eq!(config.poll_interval(), DEFAULT_POLL_INTERVAL);
    }

    #[test]
    fn build_keeps_explicit_overrides() {
        let config = base()
            .workers(3)
            .schedule(ScheduleStrategy::StaticChunks)
            .assignment_mode(AssignmentMode::SortedDescending)
            .match_policy(MatchPolicy::FirstMatch)
            .batch_size(7)
            .poll_interval(Duration::from_millis(5))
            .build()
            .unwrap();
        assert_eq!(config.workers(), 3);
        assert_eq!(config.schedule(), ScheduleStrategy::StaticChunks);
        assert_eq!(config.assignment_mode(), AssignmentMode::SortedDescending);
        assert_eq!(config.match_policy(), MatchPolicy::FirstMatch);
        assert_eq!(config.batch_size(), 7);
        assert_eq!(config.poll_interval(), Duration::from_millis(5));
    }

    #[test]
    fn build_fails_on_missing_required_parameters() {
        let err = SearchConfigBuilder::new().build().unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("input_range"));
        let err = SearchConfigBuilder::new()
            .input_range(1.0, 2.0)
            .output_range(1.0, 2.0)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("step"));
    }

    #[test]
    fn build_rejects_inverted_or_empty_input_range() {
        let err = base().input_range(4.0, 4.0).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInputRange { .. }));
        let err = base().input_range(5.0, 1.0).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInputRange { .. }));
    }

    #[test]
    fn build_rejects_inverted_output_range() {
        let err = base().output_range(8.0, 2.0).build().unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidOutputRange {
                v_min: 8.0,
                v_max: 2.0
            }
        );
    }

    #[test]
    fn build_rejects_step_at_or_below_tolerance() {
        assert_eq!(
            base().step(EPSILON).build().unwrap_err(),
            ConfigError::InvalidStep(EPSILON)
        );
        assert!(matches!(
            base().step(-1.0).build(),
            Err(ConfigError::InvalidStep(_))
        ));
    }

    #[test]
    fn build_rejects_non_finite_values() {
        assert!(base().input_range(f64::NAN, 2.0).build().is_err());
        assert!(base().output_range(0.0, f64::INFINITY).build().is_err());
        assert!(base().step(f64::NAN).build().is_err());
    }

    #[test]
    fn build_rejects_zero_workers_and_zero_batch() {
        assert_eq!(
            base().workers(0).build().unwrap_err(),
            ConfigError::InvalidWorkers
        );
        assert_eq!(
            base().batch_size(0).build().unwrap_err(),
            ConfigError::InvalidBatchSize
        );
    }

    #[test]
    fn strategy_enums_parse_from_kebab_case() {
        #[derive(Deserialize)]
        struct Knobs {
            schedule: ScheduleStrategy,
            mode: AssignmentMode,
            policy: MatchPolicy,
        }
        let knobs: Knobs = toml::from_str(
            r#"
            schedule = "static-chunks"
            mode = "sorted-descending"
            policy = "first-match"
            "#,
        )
        .unwrap();
        assert_eq!(knobs.schedule, ScheduleStrategy::StaticChunks);
        assert_eq!(knobs.mode, AssignmentMode::SortedDescending);
        assert_eq!(knobs.policy, MatchPolicy::FirstMatch);
    }
}
