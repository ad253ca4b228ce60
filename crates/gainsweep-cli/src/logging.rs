use crate::error::Result;
use crate::ui::UiEvent;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tokio::sync::mpsc;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self, MakeWriter},
    prelude::*,
};

pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Console log sink that hands each formatted record to the UI task, which prints it
/// above the live progress bar. Falls back to stderr once the UI is gone.
#[derive(Clone)]
pub struct UiLogWriter {
    sender: mpsc::Sender<UiEvent>,
}

impl UiLogWriter {
    pub fn new(sender: mpsc::Sender<UiEvent>) -> Self {
        Self { sender }
    }
}

/// Buffers one record; it is sent when the formatter drops the writer.
pub struct UiLogRecord {
    sender: mpsc::Sender<UiEvent>,
    buffer: Vec<u8>,
}

impl Write for UiLogRecord {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for UiLogRecord {
    fn drop(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.buffer).trim_end().to_string();
        if self.sender.try_send(UiEvent::Log(line)).is_err() {
            let _ = io::stderr().write_all(&self.buffer);
        }
    }
}

impl<'a> MakeWriter<'a> for UiLogWriter {
    type Writer = UiLogRecord;

    fn make_writer(&'a self) -> Self::Writer {
        UiLogRecord {
            sender: self.sender.clone(),
            buffer: Vec::new(),
        }
    }
}

pub fn setup_logging(
    verbosity: u8,
    quiet: bool,
    log_file: Option<&Path>,
    ui_sender: mpsc::Sender<UiEvent>,
) -> Result<()> {
    let console_layer = fmt::layer()
        .with_writer(UiLogWriter::new(ui_sender))
        .with_ansi(true)
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(level_filter(verbosity, quiet))
        .with(console_layer);

    if let Some(path) = log_file {
        let file = File::create(path)?;
        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_target(true);
        subscriber.with(file_layer).init();
    } else {
        subscriber.init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use serial_test::serial;
    use tracing::{debug, info, warn};

    #[test]
    fn verbosity_maps_to_level_filter() {
        assert_eq!(level_filter(0, false), LevelFilter::WARN);
        assert_eq!(level_filter(1, false), LevelFilter::INFO);
        assert_eq!(level_filter(2, false), LevelFilter::DEBUG);
        assert_eq!(level_filter(3, false), LevelFilter::TRACE);
        assert_eq!(level_filter(9, false), LevelFilter::TRACE);
    }

    #[test]
    fn quiet_keeps_only_errors() {
        assert_eq!(level_filter(0, true), LevelFilter::ERROR);
        assert_eq!(level_filter(3, true), LevelFilter::ERROR);
    }

    #[test]
    #[serial]
    fn console_records_are_routed_to_ui_channel() {
        let (sender, mut receiver) = mpsc::channel(16);
        let layer = fmt::layer()
            .with_writer(UiLogWriter::new(sender))
            .with_ansi(false)
            .with_target(false)
            .compact();
        let subscriber = tracing_subscriber::registry()
            .with(level_filter(0, false))
            .with(layer);

        tracing::subscriber::with_default(subscriber, || {
            warn!("Interrupt received; cancelling search.");
            info!("below the default level");
        });

        match receiver.try_recv() {
            Ok(UiEvent::Log(line)) => {
                assert!(line.contains("WARN"));
                assert!(line.contains("Interrupt received; cancelling search."));
                assert!(!line.ends_with('\n'));
            }
            other => panic!("Unexpected UI event: {:?}", other),
        }
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    #[serial]
    fn closed_ui_channel_falls_back_without_panicking() {
        let (sender, receiver) = mpsc::channel(1);
        drop(receiver);
        let writer = UiLogWriter::new(sender);

        let mut record = writer.make_writer();
        record.write_all(b"after shutdown\n").unwrap();
        drop(record);
    }

    #[test]
    #[serial]
    fn file_layer_records_worker_thread_and_fields() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("search.log");

        let file = File::create(&log_path).unwrap();
        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_thread_ids(true);
        let subscriber = tracing_subscriber::registry()
            .with(level_filter(2, false))
            .with(file_layer);

        tracing::subscriber::with_default(subscriber, || {
            debug!(combinations = 784, "Dispatching search workers.");
            tracing::trace!("filtered out at DEBUG");
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("Dispatching search workers."));
        assert!(content.contains("combinations=784"));
        assert!(content.contains("ThreadId"));
        assert!(!content.contains("filtered out"));
    }

    #[test]
    #[serial]
    fn unwritable_log_file_path_propagates_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let (sender, _receiver) = mpsc::channel(1);
        let result = setup_logging(0, false, Some(dir.path()), sender);
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
