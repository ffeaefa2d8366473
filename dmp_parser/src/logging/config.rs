//! Configuration access for logging
//!
//! Compile-time limits come from `crate::config::compile_time`; level and
//! output format are runtime preferences that may be installed once.

use crate::config::runtime::LoggingPreferences;
use std::sync::OnceLock;

type EventsLogLevel = crate::logging::events::LogLevel;

// ============================================================================
// RUNTIME PREFERENCES STORAGE
// ============================================================================

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Install runtime preferences (first caller wins)
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime preferences already initialized".to_string())
}

/// Get runtime preferences (with fallback to environment defaults)
fn get_runtime_preferences() -> LoggingPreferences {
    RUNTIME_PREFERENCES.get().cloned().unwrap_or_default()
}

// ============================================================================
// CONFIGURATION ACCESS FUNCTIONS
// ============================================================================

/// Get minimum log level
pub fn get_min_log_level() -> EventsLogLevel {
    get_runtime_preferences().min_log_level.to_events_log_level()
}

/// Check if structured logging is enabled
pub fn use_structured_logging() -> bool {
    get_runtime_preferences().use_structured_logging
}

/// Get configuration summary for diagnostics
pub fn get_config_summary() -> String {
    use crate::config::compile_time::logging::*;

    let preferences = get_runtime_preferences();
    format!(
        "Logging Configuration:\n\
         - Max message length: {}\n\
         - Memory logger capacity: {}\n\
         - Min log level: {}\n\
         - Structured logging: {}\n\
         - Limits: {}",
        MAX_LOG_MESSAGE_LENGTH,
        MEMORY_LOGGER_CAPACITY,
        preferences.min_log_level.as_str(),
        preferences.use_structured_logging,
        crate::config::build_info::source_info(),
    )
}
