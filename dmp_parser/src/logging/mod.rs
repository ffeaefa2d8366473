//! Global logging module for the dump tools
//!
//! Provides thread-safe global logging with a per-thread file context and a
//! small macro interface. Nothing is emitted until a logger is installed.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

// Re-export main types
pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

thread_local! {
    static FILE_CONTEXT: RefCell<Option<PathBuf>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging from runtime preferences
pub fn init_global_logging() -> Result<(), String> {
    let service = Arc::new(service::create_configured_service());
    init_global_logging_with_service(service.clone())?;

    service.log_success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    );

    Ok(())
}

/// Initialize with a caller-built service
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

/// Check if global logging is initialized
pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

/// Whether debug events would reach the installed logger
pub fn debug_enabled() -> bool {
    try_get_global_logger()
        .map(|logger| logger.should_log(LogLevel::Debug))
        .unwrap_or(false)
}

// ============================================================================
// FILE CONTEXT MANAGEMENT
// ============================================================================

/// Execute function with the current dump file recorded on this thread
pub fn with_file_context<F, R>(file_path: &Path, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = FILE_CONTEXT.with(|ctx| ctx.replace(Some(file_path.to_path_buf())));
    let result = f();
    FILE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = previous;
    });
    result
}

/// Get current file context (used by macros)
pub fn get_current_file_context() -> Option<PathBuf> {
    FILE_CONTEXT.with(|ctx| ctx.borrow().clone())
}

// ============================================================================
// MACRO SUPPORT
// ============================================================================

/// Attach line and file context, then hand the event to the global logger
pub fn dispatch_event(mut event: LogEvent, line: Option<usize>) {
    let Some(logger) = try_get_global_logger() else {
        return;
    };

    if let Some(line) = line {
        event = event.with_line(line);
    }

    if let Some(file) = get_current_file_context() {
        event = event.with_context("file", &file.display().to_string());
    }

    logger.log_event(event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_context_is_scoped() {
        let path = PathBuf::from("site.dmp");

        assert!(get_current_file_context().is_none());
        let seen = with_file_context(&path, get_current_file_context);
        assert_eq!(seen, Some(path));
        assert!(get_current_file_context().is_none());
    }

    #[test]
    fn test_nested_file_context_restores_outer() {
        let outer = PathBuf::from("outer.dmp");
        let inner = PathBuf::from("inner.dmp");

        with_file_context(&outer, || {
            with_file_context(&inner, || {
                assert_eq!(get_current_file_context(), Some(inner.clone()));
            });
            assert_eq!(get_current_file_context(), Some(outer.clone()));
        });
    }

    #[test]
    fn test_macros_without_logger_do_not_panic() {
        crate::log_error!(codes::system::INTERNAL_ERROR, "no logger", "k" => 1);
        crate::log_warning!(codes::parser::UNCLOSED_SCOPES, "no logger", line = 3);
        crate::log_info!("no logger");
        crate::log_debug!("no logger", "depth" => 2);
    }
}
