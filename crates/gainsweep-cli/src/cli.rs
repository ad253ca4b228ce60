use clap::{Args, Parser, ValueEnum};
use gainsweep::engine::config::ScheduleStrategy;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "The gainsweep developers",
    version,
    about = "gainsweep - Exhaustive search for two-stage switchable gain configurations that map an input interval into an output window.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    #[command(flatten)]
    pub search: SearchArgs,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Number of search workers.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, value_name = "NUM")]
    pub threads: Option<usize>,
}

/// Search parameters. Every value here overrides the configuration file.
#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    // --- Problem ---
    /// Input signal interval.
    #[arg(
        short = 'i',
        long = "input-range",
        num_args = 2,
        value_names = ["X1", "X2"],
        allow_negative_numbers = true
    )]
    pub input_range: Option<Vec<f64>>,

    /// Admissible output window.
    #[arg(
        short = 'o',
        long = "output-range",
        num_args = 2,
        value_names = ["VMIN", "VMAX"],
        allow_negative_numbers = true
    )]
    pub output_range: Option<Vec<f64>>,

    /// Gain grid step.
    #[arg(short = 's', long, value_name = "STEP", allow_negative_numbers = true)]
    pub step: Option<f64>,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Strategy ---
    /// How combinations are distributed among workers.
    #[arg(long, value_enum, value_name = "STRATEGY")]
    pub schedule: Option<ScheduleArg>,

    /// Number of combinations a worker claims at a time.
    #[arg(long, value_name = "INT")]
    pub batch_size: Option<u64>,

    /// Only try the largest-gain-first zone ordering (faster, may miss layouts).
    #[arg(long)]
    pub sorted_only: bool,

    /// Keep only the first feasible ordering of each combination
    /// (incomplete: drops alternative layouts).
    #[arg(long)]
    pub first_match: bool,

    // --- Report ---
    /// Write the report to a file instead of standard output.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Sort solutions by stage ranges and assignment before reporting.
    #[arg(long)]
    pub sort: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleArg {
    SharedCursor,
    StaticChunks,
}

impl From<ScheduleArg> for ScheduleStrategy {
    fn from(arg: ScheduleArg) -> Self {
        match arg {
            ScheduleArg::SharedCursor => ScheduleStrategy::SharedCursor,
            ScheduleArg::StaticChunks => ScheduleStrategy::StaticChunks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn parses_ranges_and_step() {
        let cli = Cli::parse_from(["gainsweep", "-i", "0.03", "0.6", "-o", "1", "1.9", "-s", "0.5"]);
        assert_eq!(cli.search.input_range, Some(vec![0.03, 0.6]));
        assert_eq!(cli.search.output_range, Some(vec![1.0, 1.9]));
        assert_eq!(cli.search.step, Some(0.5));
        assert_eq!(cli.verbose, 0);
        assert!(cli.threads.is_none());
    }

    #[test]
    fn parses_strategy_and_report_flags() {
        let cli = Cli::parse_from([
            "gainsweep",
            "-j",
            "4",
            "--schedule",
            "static-chunks",
            "--batch-size",
            "16",
            "--sorted-only",
            "--first-match",
            "--sort",
            "--output",
            "report.txt",
            "-vv",
        ]);
        assert_eq!(cli.threads, Some(4));
        assert_eq!(cli.search.schedule, Some(ScheduleArg::StaticChunks));
        assert_eq!(cli.search.batch_size, Some(16));
        assert!(cli.search.sorted_only);
        assert!(cli.search.first_match);
        assert!(cli.search.sort);
        assert_eq!(cli.search.output, Some(PathBuf::from("report.txt")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn negative_range_bounds_are_accepted() {
        let cli = Cli::parse_from(["gainsweep", "-i", "-1", "2", "-o", "-5", "5"]);
        assert_eq!(cli.search.input_range, Some(vec![-1.0, 2.0]));
        assert_eq!(cli.search.output_range, Some(vec![-5.0, 5.0]));
    }

    #[test]
    fn input_range_requires_two_values() {
        assert!(Cli::try_parse_from(["gainsweep", "-i", "1"]).is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["gainsweep", "-q", "-v"]).is_err());
    }

    #[test]
    fn first_match_help_marks_results_incomplete() {
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("--first-match"));
        assert!(help.contains("incomplete: drops alternative layouts"));
    }

    #[test]
    fn schedule_arg_maps_to_core_strategy() {
        assert_eq!(
            ScheduleStrategy::from(ScheduleArg::SharedCursor),
            ScheduleStrategy::SharedCursor
        );
        assert_eq!(
            ScheduleStrategy::from(ScheduleArg::StaticChunks),
            ScheduleStrategy::StaticChunks
        );
    }
}
