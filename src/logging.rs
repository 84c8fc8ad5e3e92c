// src/logging.rs

//! Logging setup for `genomedag`.
//!
//! `genomedag` prints its results on stdout: the dry-run listing, the
//! plan summary, and the outcome report after `--submit`. Everything
//! emitted through `tracing` (graph construction, staging, per-task
//! completion events) goes to stderr, so stdout can be piped or diffed
//! between runs.
//!
//! Filter directives are taken from, in order:
//! 1. `--log-level` (one level for every target),
//! 2. `GENOMEDAG_LOG`, which accepts full `EnvFilter` directives such as
//!    `info,genomedag::exec=debug`,
//! 3. `info`.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "GENOMEDAG_LOG";

/// Install the global subscriber. Call once at startup.
///
/// Malformed directives are an error rather than being silently ignored.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let directives = resolve_directives(cli_level, env.as_deref());
    let filter = EnvFilter::try_new(&directives)
        .with_context(|| format!("invalid log directives '{directives}' (from --log-level or {LOG_ENV})"))?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Pick the filter directives from the CLI level and the env value.
pub fn resolve_directives(cli_level: Option<LogLevel>, env: Option<&str>) -> String {
    if let Some(level) = cli_level {
        return level_name(level).to_string();
    }
    match env.map(str::trim) {
        Some(directives) if !directives.is_empty() => directives.to_string(),
        _ => "info".to_string(),
    }
}

fn level_name(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
