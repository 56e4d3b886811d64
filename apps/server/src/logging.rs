use anyhow::{Context, Result};
use std::str::FromStr;
use vreg::domain::config::LoggingConfig;
use vreg_logger::{LevelFilter, Logger};

/// Installs the global subscriber as described by the `logging` config section.
///
/// # Errors
/// Fails on an unknown level, a bad filter directive, an unusable log directory, or when a
/// subscriber is already installed.
pub fn init_logger(cfg: &LoggingConfig) -> Result<Logger> {
    let level = LevelFilter::from_str(&cfg.level)
        .with_context(|| format!("Invalid log level '{}'", cfg.level))?;

    let builder = Logger::builder().name(env!("CARGO_PKG_NAME")).level(level).console(cfg.console);
    let builder = match &cfg.filter {
        Some(filter) => builder.env_filter(filter.as_str()),
        None => builder,
    };

    let logger = match &cfg.path {
        Some(path) => {
            let builder = builder.path(path).max_files(cfg.max_files);
            if cfg.json { builder.json().init() } else { builder.init() }
        },
        None => builder.init(),
    };

    logger.context("Failed to initialize logging")
}
