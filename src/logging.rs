//! Per-run logging
//!
//! A [`RunLog`] is opened at the start of a run and closed at its end. While
//! open it routes `tracing` events to stdout and to a timestamped file in
//! the log directory. It installs a scoped default subscriber rather than a
//! global one, so library code and tests never depend on it.

use chrono::{DateTime, Local};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Maps CLI verbosity flags to a filter directive
pub fn filter_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        // Only show errors
        return "error";
    }
    match verbose {
        0 => "embed_scout=info,warn",
        1 => "embed_scout=debug,info",
        2 => "embed_scout=trace,debug",
        _ => "trace",
    }
}

/// Log file name for a run started at `started`
pub fn log_file_name(started: DateTime<Local>) -> String {
    format!("scraper_{}.log", started.format("%Y%m%d_%H%M%S"))
}

/// The logging collaborator for one run
pub struct RunLog {
    path: PathBuf,
    file: Arc<File>,
    guard: DefaultGuard,
}

impl RunLog {
    /// Creates `log_dir`, opens this run's log file and starts routing events
    ///
    /// # Arguments
    ///
    /// * `log_dir` - Directory receiving the log file
    /// * `verbose` - Verbosity count (`-v`, `-vv`, ...)
    /// * `quiet` - Only log errors
    ///
    /// # Returns
    ///
    /// * `Ok(RunLog)` - Logging is active until [`RunLog::close`]
    /// * `Err(io::Error)` - The directory or file could not be created
    pub fn open(log_dir: &Path, verbose: u8, quiet: bool) -> io::Result<Self> {
        fs::create_dir_all(log_dir)?;
        let path = log_dir.join(log_file_name(Local::now()));
        let file = Arc::new(OpenOptions::new().create(true).append(true).open(&path)?);

        let subscriber = Registry::default()
            .with(EnvFilter::new(filter_directive(verbose, quiet)))
            .with(fmt::layer().with_target(false))
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Arc::clone(&file)),
            );
        let guard = tracing::subscriber::set_default(subscriber);

        Ok(Self { path, file, guard })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stops routing events and flushes the log file to disk
    pub fn close(self) -> io::Result<()> {
        let Self { path, file, guard } = self;
        drop(guard);
        file.sync_all()?;
        tracing::debug!("Closed log file {}", path.display());
        Ok(())
    }
}
