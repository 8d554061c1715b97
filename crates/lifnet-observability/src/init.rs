// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for lifnet binaries
//!
//! Console output is always on. With the `file-logging` feature and a log
//! directory, every run also gets a JSON log under a timestamped folder:
//!
//! ```text
//! ./logs/
//!   └── run_20250101_120000/
//!       └── lifnet.log
//! ```

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;

#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Level for everything not raised by a debug flag
    pub level: String,
    /// Base directory for per-run log folders; `None` disables file output
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}

/// Keeps file writers alive; logs are flushed when it is dropped
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Folder this run writes its log file into, if any
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Build the `EnvFilter` for the given flags and base level
pub fn build_filter(debug_flags: &CrateDebugFlags, options: &LoggingOptions) -> Result<EnvFilter> {
    let directives = debug_flags.to_filter_string(&options.level.to_lowercase());
    EnvFilter::try_new(&directives).map_err(|e| anyhow!("invalid log filter '{}': {}", directives, e))
}

/// Install the global subscriber
pub fn init_logging(debug_flags: &CrateDebugFlags, options: &LoggingOptions) -> Result<LoggingGuard> {
    let filter = build_filter(debug_flags, options)?;

    let mut layers = Vec::new();
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(debug_flags.any_enabled())
        .with_file(false)
        .with_line_number(false)
        .with_filter(filter)
        .boxed();
    layers.push(console_layer);

    #[cfg(feature = "file-logging")]
    let (file_guard, log_dir) = match &options.log_dir {
        Some(base) => {
            let (layer, guard, run_folder) = file_layer(base, debug_flags, options)?;
            layers.push(layer);
            (Some(guard), Some(run_folder))
        }
        None => (None, None),
    };

    #[cfg(not(feature = "file-logging"))]
    let log_dir = {
        if options.log_dir.is_some() {
            eprintln!("Warning: file logging requested but the file-logging feature is disabled");
        }
        None
    };

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))?;

    Ok(LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guard: file_guard,
        log_dir,
    })
}

#[cfg(feature = "file-logging")]
fn file_layer(
    base: &Path,
    debug_flags: &CrateDebugFlags,
    options: &LoggingOptions,
) -> Result<(
    Box<dyn Layer<Registry> + Send + Sync>,
    tracing_appender::non_blocking::WorkerGuard,
    PathBuf,
)> {
    use anyhow::Context;

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let run_folder = base.join(format!("run_{}", timestamp));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;

    let appender = tracing_appender::rolling::never(&run_folder, "lifnet.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .json()
        .with_filter(build_filter(debug_flags, options)?)
        .boxed();

    Ok((layer, guard, run_folder))
}
