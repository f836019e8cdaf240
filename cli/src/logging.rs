//! Logging configuration with file-based output and size-based rotation.
//!
//! Writes logs to `~/.config/conflux/conflux.log` (or platform equivalent)
//! with 10 MB size-based rotation. Set `DEBUG_LOGGING=1` to enable debug
//! output for conflux crates.
//!
//! Console output goes to stderr so it never interleaves with REPL tables on
//! stdout. While the log file is available the console only shows warnings.

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEBUG_DIRECTIVE: &str = "info,conflux_core=debug,conflux_cli=debug";

/// Initialize logging with dual output (file + stderr).
///
/// Returns a `WorkerGuard` that must be held for the lifetime of the
/// program so buffered log lines are flushed on exit. Returns `None` when
/// the log directory is unavailable; stderr logging is installed instead.
pub fn init() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    let Some(log_dir) = dirs::config_dir().map(|config| config.join("conflux")) else {
        init_console_only(debug_logging);
        return None;
    };

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        // subscriber not installed yet
        eprintln!(
            "Failed to create log directory {:?}: {}, using stderr only",
            log_dir, e
        );
        init_console_only(debug_logging);
        return None;
    }

    // 10 MB, keep conflux.log and conflux.log.1
    let log_path = log_dir.join("conflux.log");
    let file_appender = match BasicRollingFileAppender::new(
        &log_path,
        RollingConditionBasic::new().max_size(10 * 1024 * 1024),
        1,
    ) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Failed to create log file at {:?}: {}", log_path, e);
            init_console_only(debug_logging);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE)
        .with_filter(console_level(true));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .with(filter(debug_logging))
        .init();

    tracing::info!(log_file = ?log_path, debug_logging, "Conflux logging initialized");

    Some(guard)
}

fn filter(debug_logging: bool) -> EnvFilter {
    EnvFilter::new(if debug_logging { DEBUG_DIRECTIVE } else { "info" })
}

/// Ceiling for the console layer; the `EnvFilter` still applies underneath.
fn console_level(has_file: bool) -> LevelFilter {
    if has_file {
        LevelFilter::WARN
    } else {
        LevelFilter::TRACE
    }
}

fn init_console_only(debug_logging: bool) {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE)
        .with_filter(console_level(false));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(filter(debug_logging))
        .init();
}
