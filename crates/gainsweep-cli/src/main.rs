mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod report;
mod ui;

use crate::cli::Cli;
use crate::error::{CliError, Result};
use crate::ui::UiManager;
use clap::Parser;
use tokio::task;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_app() -> Result<()> {
    let (ui_manager, ui_sender, shutdown_sender) = UiManager::new();
    let ui_handle = task::spawn(ui_manager.run());

    let cli = Cli::parse();
    logging::setup_logging(
        cli.verbose,
        cli.quiet,
        cli.log_file.as_deref(),
        ui_sender.clone(),
    )?;

    std::panic::set_hook(Box::new(|panic_info| {
        error!("{}", panic_info);
    }));

    let command_result = async {
        info!("🚀 gainsweep v{} starting up.", env!("CARGO_PKG_VERSION"));
        debug!("Full CLI arguments parsed: {:?}", &cli);

        commands::search::run(cli.search, cli.threads, ui_sender).await
    }
    .await;

    match &command_result {
        Ok(_) => info!("✅ Search completed successfully."),
        Err(e) => error!("❌ Search failed: {}", e),
    }

    if shutdown_sender.send(true).is_err() {
        warn!("UI manager may have already exited before shutdown signal.");
    }

    ui_handle
        .await
        .map_err(|e| CliError::Other(anyhow::anyhow!("UI manager task failed: {}", e)))?;

    command_result
}
