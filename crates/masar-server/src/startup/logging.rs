//! File-based logging module with per-component log files.
//!
//! Different components write to separate log files with daily rotation:
//!
//! | Log File        | Component                         | Target Prefixes   |
//! |-----------------|-----------------------------------|-------------------|
//! | masar.log       | Root logger (all components)      | (all)             |
//! | auth.log        | Authentication and authorization  | masar_auth        |
//! | catalog.log     | Course/track authoring and browse | masar_catalog     |
//! | learning.log    | Enrollment and progress tracking  | masar_learning    |
//! | persistence.log | Database persistence              | masar_persistence |
//! | server.log      | HTTP surface                      | masar_server      |
//!
//! Log files are stored in `~/masar/logs` by default.
//! Override with the `MASAR_LOG_DIR` environment variable or the
//! `masar.logs.path` config key.

use std::path::PathBuf;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

// ---------------------------------------------------------------------------
// Component log file definitions
// ---------------------------------------------------------------------------

/// Internal definition for a component log file.
struct ComponentLogDef {
    /// Log file name (e.g. "learning.log")
    file_name: &'static str,
    /// Target module prefixes routed to this file
    targets: &'static [&'static str],
}

/// Component log definitions.
///
/// Each entry produces a separate rolling log file. Events are routed based
/// on their `tracing` target (Rust module path). The root `masar.log` file
/// always captures *all* events regardless of target.
const COMPONENT_LOGS: &[ComponentLogDef] = &[
    ComponentLogDef {
        file_name: "auth.log",
        targets: &[
            "masar_auth",
            "masar_server::api::v3::auth",
            "masar_server::middleware",
        ],
    },
    ComponentLogDef {
        file_name: "catalog.log",
        targets: &["masar_catalog"],
    },
    ComponentLogDef {
        file_name: "learning.log",
        targets: &["masar_learning"],
    },
    ComponentLogDef {
        file_name: "persistence.log",
        targets: &["masar_persistence"],
    },
    ComponentLogDef {
        file_name: "server.log",
        targets: &["masar_server"],
    },
];

// ---------------------------------------------------------------------------
// Log rotation policy
// ---------------------------------------------------------------------------

/// Log rotation policy
#[derive(Debug, Clone, Copy)]
pub enum LogRotation {
    /// Rotate daily (default)
    Daily,
    /// Rotate hourly
    Hourly,
    /// Never rotate (single file)
    Never,
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

// ---------------------------------------------------------------------------
// Logging configuration
// ---------------------------------------------------------------------------

/// Logging configuration for the entire application.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Base log directory (default: `~/masar/logs`)
    pub log_dir: PathBuf,
    /// Enable console output
    pub console_output: bool,
    /// Console log level
    pub console_level: Level,
    /// Enable file logging
    pub file_logging: bool,
    /// Default log level for files
    pub file_level: Level,
    /// Log rotation policy
    pub rotation: LogRotation,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            console_output: true,
            console_level: Level::INFO,
            file_logging: true,
            file_level: Level::INFO,
            rotation: LogRotation::Daily,
        }
    }
}

fn default_log_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(format!("{}/masar/logs", home))
}

impl LoggingConfig {
    /// Create from application configuration, with `MASAR_LOG_DIR` taking
    /// precedence over the config key.
    pub fn from_config(log_dir: Option<String>, level: String) -> Self {
        let log_dir = std::env::var("MASAR_LOG_DIR")
            .ok()
            .or(log_dir)
            .map(PathBuf::from)
            .unwrap_or_else(default_log_dir);

        let level = level.parse().unwrap_or(Level::INFO);

        Self {
            log_dir,
            console_output: true,
            console_level: level,
            file_logging: true,
            file_level: level,
            rotation: LogRotation::Daily,
        }
    }
}

// ---------------------------------------------------------------------------
// Logging guard
// ---------------------------------------------------------------------------

/// Guard that keeps the logging system alive.
///
/// Holds file appender worker guards. Must be kept alive for the duration of
/// the application; dropping it flushes buffered log output.
pub struct LoggingGuard {
    _file_guards: Vec<WorkerGuard>,
}

// ---------------------------------------------------------------------------
// Initialization
// ---------------------------------------------------------------------------

/// Initialize the logging system with multi-file output.
///
/// This sets up:
/// - Console output (human-readable format with colors)
/// - Root log file `masar.log` that captures **all** events
/// - Component-specific log files with target-based routing (see [`COMPONENT_LOGS`])
///
/// The `RUST_LOG` env var controls the level for the console and root file;
/// component files use per-layer [`Targets`] filters routed by tracing
/// target.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard, Box<dyn std::error::Error>> {
    if config.file_logging {
        std::fs::create_dir_all(&config.log_dir)?;
    }

    let mut guards: Vec<WorkerGuard> = Vec::new();
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    // --- Console layer (human-readable with ANSI colors, per-layer EnvFilter) ---
    if config.console_output {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.console_level.to_string()));
        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(filter);
        layers.push(Box::new(console_layer));
    }

    // --- File layers ---
    if config.file_logging {
        // Root log file: masar.log (captures all events, per-layer EnvFilter)
        let root_appender =
            RollingFileAppender::new(config.rotation.into(), &config.log_dir, "masar.log");
        let (root_nb, root_guard) = tracing_appender::non_blocking(root_appender);
        guards.push(root_guard);

        let root_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.file_level.to_string()));
        let root_layer = fmt::layer()
            .with_writer(root_nb)
            .with_target(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_filter(root_filter);
        layers.push(Box::new(root_layer));

        // Component-specific log files with per-layer Targets filtering
        for component in COMPONENT_LOGS {
            let appender = RollingFileAppender::new(
                config.rotation.into(),
                &config.log_dir,
                component.file_name,
            );
            let (nb, guard) = tracing_appender::non_blocking(appender);
            guards.push(guard);

            // Component files capture everything from their targets; level
            // control lives on the console and root layers.
            let mut targets = Targets::new();
            for target in component.targets {
                targets = targets.with_target(*target, LevelFilter::TRACE);
            }

            let layer = fmt::layer()
                .with_writer(nb)
                .with_target(true)
                .with_thread_names(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
                .with_filter(targets);
            layers.push(Box::new(layer));
        }
    }

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| format!("Failed to initialize logging: {}", e))?;

    if config.file_logging {
        tracing::info!(
            log_dir = %config.log_dir.display(),
            component_files = COMPONENT_LOGS.len(),
            "file logging initialized"
        );
    }

    Ok(LoggingGuard {
        _file_guards: guards,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_log_targets_are_prefixed() {
        for component in COMPONENT_LOGS {
            assert!(component.file_name.ends_with(".log"));
            for target in component.targets {
                assert!(target.starts_with("masar_"), "{target}");
            }
        }
    }

    #[test]
    fn test_logging_config_from_config_level_fallback() {
        let config = LoggingConfig::from_config(Some("/tmp/masar-test-logs".into()), "bogus".into());
        assert_eq!(config.console_level, Level::INFO);
    }
}
