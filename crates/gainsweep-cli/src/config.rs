use crate::cli::SearchArgs;
use crate::error::{CliError, Result};
use gainsweep::engine::config::{
    AssignmentMode, MatchPolicy, ScheduleStrategy, SearchConfig, SearchConfigBuilder,
};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_STEP: f64 = 1.0;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialProblemConfig {
    input_range: Option<[f64; 2]>,
    output_range: Option<[f64; 2]>,
    step: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialExecutionConfig {
    threads: Option<usize>,
    schedule: Option<ScheduleStrategy>,
    batch_size: Option<u64>,
    assignment: Option<AssignmentMode>,
    match_policy: Option<MatchPolicy>,
}

/// Search configuration as read from a TOML file. Every field is optional; values
/// given on the command line take precedence.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PartialSearchConfig {
    problem: Option<PartialProblemConfig>,
    execution: Option<PartialExecutionConfig>,
}

impl PartialSearchConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn merge_with_cli(mut self, args: &SearchArgs, threads: Option<usize>) -> Result<SearchConfig> {
        let problem = self.problem.take().unwrap_or_default();
        let execution = self.execution.take().unwrap_or_default();

        let (x1, x2) = Self::resolve_pair(
            args.input_range.as_deref(),
            problem.input_range,
            "input-range",
        )?;
        let (v_min, v_max) = Self::resolve_pair(
            args.output_range.as_deref(),
            problem.output_range,
            "output-range",
        )?;
        let step = args.step.or(problem.step).unwrap_or(DEFAULT_STEP);

        let mut builder = SearchConfigBuilder::new()
            .input_range(x1, x2)
            .output_range(v_min, v_max)
            .step(step);

        if let Some(workers) = threads.or(execution.threads) {
            builder = builder.workers(workers);
        }
        if let Some(schedule) = args.schedule.map(Into::into).or(execution.schedule) {
            builder = builder.schedule(schedule);
        }
        if let Some(batch_size) = args.batch_size.or(execution.batch_size) {
            builder = builder.batch_size(batch_size);
        }
        builder = Self::merge_flag(
            builder,
            args.sorted_only,
            execution.assignment,
            AssignmentMode::SortedDescending,
            SearchConfigBuilder::assignment_mode,
        );
        builder = Self::merge_flag(
            builder,
            args.first_match,
            execution.match_policy,
            MatchPolicy::FirstMatch,
            SearchConfigBuilder::match_policy,
        );

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn resolve_pair(
        cli_val: Option<&[f64]>,
        file_val: Option<[f64; 2]>,
        key: &str,
    ) -> Result<(f64, f64)> {
        match (cli_val, file_val) {
            (Some([lo, hi]), _) => Ok((*lo, *hi)),
            (Some(values), _) => Err(CliError::Argument(format!(
                "'{}' takes exactly two values (got {}).",
                key,
                values.len()
            ))),
            (None, Some([lo, hi])) => Ok((lo, hi)),
            (None, None) => Err(CliError::Config(format!(
                "A value for '{}' is required either in the config file or via CLI argument.",
                key
            ))),
        }
    }

    /// A set CLI switch forces `forced`; otherwise the file value applies, if any.
    fn merge_flag<T>(
        builder: SearchConfigBuilder,
        cli_flag: bool,
        file_val: Option<T>,
        forced: T,
        apply: fn(SearchConfigBuilder, T) -> SearchConfigBuilder,
    ) -> SearchConfigBuilder {
        if cli_flag {
            apply(builder, forced)
        } else if let Some(value) = file_val {
            apply(builder, value)
        } else {
            builder
        }
    }
}
