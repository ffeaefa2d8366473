//! Bridge from the dump tools' structured events into the `log` facade
//!
//! Events keep their codes and context in the rendered message; filtering is
//! done twice, first by the logging service's minimum level and then by
//! `env_logger` so that `RUST_LOG` still applies.

use dmp_parser::config::runtime::{LogLevel, LoggingPreferences};
use dmp_parser::logging::{self, events, LogEvent, Logger, LoggingService, StructuredLogger};
use dmp_parser::log_debug;
use std::sync::Arc;

pub const LOG_TARGET: &str = "dmptool";

/// Forwards every event to the matching `log` macro level
pub struct FacadeLogger;

impl FacadeLogger {
    fn level(level: events::LogLevel) -> log::Level {
        match level {
            events::LogLevel::Error => log::Level::Error,
            events::LogLevel::Warning => log::Level::Warn,
            events::LogLevel::Info => log::Level::Info,
            events::LogLevel::Debug => log::Level::Debug,
        }
    }
}

impl Logger for FacadeLogger {
    fn log(&self, event: &LogEvent) {
        log::log!(target: LOG_TARGET, Self::level(event.level), "{}", event.format());
    }
}

/// Minimum level after applying `-v` flags on top of the preferences
pub fn effective_level(preferred: LogLevel, verbosity: u8) -> LogLevel {
    let raised = match verbosity {
        0 => return preferred,
        1 => LogLevel::Info,
        _ => LogLevel::Debug,
    };

    if (raised as u8) > (preferred as u8) {
        raised
    } else {
        preferred
    }
}

fn filter_for(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warning => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
    }
}

/// Install `env_logger` and the global logging service
pub fn init_logging(verbosity: u8) -> Result<(), String> {
    let mut preferences = LoggingPreferences::default();
    let level = effective_level(preferences.min_log_level, verbosity);
    preferences.min_log_level = level;
    let structured = preferences.use_structured_logging;
    logging::config::init_runtime_preferences(preferences)?;

    let service = if structured {
        LoggingService::new(Arc::new(StructuredLogger), level.to_events_log_level())
    } else {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(filter_for(level)),
        )
        .format_timestamp(None)
        .format_target(false)
        .try_init()
        .map_err(|e| format!("Failed to initialize env_logger: {}", e))?;

        LoggingService::new(Arc::new(FacadeLogger), level.to_events_log_level())
    };

    logging::init_global_logging_with_service(Arc::new(service))?;
    log_debug!(
        "Logging configured",
        "summary" => logging::config::get_config_summary()
    );
    Ok(())
}
