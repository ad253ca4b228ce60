use crate::cli::SearchArgs;
use crate::config::PartialSearchConfig;
use crate::error::{CliError, Result};
use crate::report;
use crate::ui::{CliProgressHandler, UiEvent};
use gainsweep::core::models::gain::Stage;
use gainsweep::core::models::solution::sort_solutions;
use gainsweep::engine::progress::ProgressReporter;
use gainsweep::workflows::search::SearchEngine;
use std::path::Path;
use tokio::sync::mpsc;
use tokio::task;
use tracing::{info, warn};

pub async fn run(
    args: SearchArgs,
    threads: Option<usize>,
    ui_sender: mpsc::Sender<UiEvent>,
) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialSearchConfig::from_file(path)?,
        None => PartialSearchConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args, threads)?;

    let engine = SearchEngine::new(config.clone())?;
    info!(
        combinations = engine.space().len(),
        stage_candidates = engine.space().candidate_count(Stage::First),
        "Search space prepared."
    );

    let token = engine.cancellation_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received; cancelling search.");
            token.cancel();
        }
    });

    let callback = CliProgressHandler::new(ui_sender).get_callback();
    let search = task::spawn_blocking(move || {
        let reporter = ProgressReporter::with_callback(callback);
        engine.run(&reporter)
    })
    .await;
    interrupt.abort();

    let mut outcome = search
        .map_err(|e| CliError::Other(anyhow::anyhow!("Search task failed: {}", e)))??;

    if outcome.cancelled {
        warn!(
            processed = outcome.snapshot.processed,
            total = outcome.snapshot.total,
            "Search was cancelled; reporting partial results."
        );
    }
    if outcome.solutions.is_empty() {
        warn!("Search finished but found no valid solutions.");
    }
    if args.sort {
        sort_solutions(&mut outcome.solutions);
    }

    let rendered = report::render(&config, &outcome);
    match &args.output {
        Some(path) => {
            write_report(path, &rendered)?;
            println!(
                "Report with {} solution(s) written to: {}",
                outcome.solutions.len(),
                path.display()
            );
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

fn write_report(path: &Path, content: &str) -> Result<()> {
    info!("Writing report to {:?}", path);
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn search_writes_sorted_report_to_output_file() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("report.txt");
        let cli = Cli::parse_from([
            "gainsweep",
            "-i",
            "1",
            "8",
            "-o",
            "4",
            "8",
            "-s",
            "1",
            "-j",
            "2",
            "--sort",
            "--output",
            output.to_str().unwrap(),
        ]);
        let (sender, mut receiver) = mpsc::channel(1024);

        run(cli.search, cli.threads, sender).await.unwrap();

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.starts_with("Search Parameters:"));
        assert!(content.contains("Stage 1: [1 ~ 2]"));
        assert!(content.contains("Gains: 6 3 2 1"));

        let mut saw_finish = false;
        while let Ok(event) = receiver.try_recv() {
            if let UiEvent::Progress(gainsweep::engine::progress::Progress::TaskFinish(s)) = event {
                assert!(s.is_complete());
                saw_finish = true;
            }
        }
        assert!(saw_finish);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn invalid_configuration_fails_before_search() {
        let cli = Cli::parse_from(["gainsweep", "-i", "8", "1", "-o", "4", "8"]);
        let (sender, _receiver) = mpsc::channel(16);

        let result = run(cli.search, cli.threads, sender).await;

        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn missing_config_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let cli = Cli::parse_from(["gainsweep", "-c", missing.to_str().unwrap()]);
        let (sender, _receiver) = mpsc::channel(16);

        let result = run(cli.search, cli.threads, sender).await;

        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
