//! Logging macros taking `Code` values and Display context pairs
//!
//! All macros are no-ops until a global logger is installed.

// ============================================================================
// ERROR LOGGING
// ============================================================================

/// Log error with Code type - accepts Display types for context values
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr) => {
        $crate::logging::dispatch_event($crate::logging::LogEvent::error($code, $message), None)
    };

    ($code:expr, $message:expr, line = $line:expr) => {
        $crate::logging::dispatch_event(
            $crate::logging::LogEvent::error($code, $message),
            Some($line),
        )
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {
        {
            let mut event = $crate::logging::LogEvent::error($code, $message);
            $(
                event = event.with_context($key, &format!("{}", $value));
            )+
            $crate::logging::dispatch_event(event, None)
        }
    };

    ($code:expr, $message:expr, line = $line:expr, $($key:expr => $value:expr),+) => {
        {
            let mut event = $crate::logging::LogEvent::error($code, $message);
            $(
                event = event.with_context($key, &format!("{}", $value));
            )+
            $crate::logging::dispatch_event(event, Some($line))
        }
    };
}

// ============================================================================
// WARNING LOGGING
// ============================================================================

/// Log warning with Code type - accepts Display types for context values
#[macro_export]
macro_rules! log_warning {
    ($code:expr, $message:expr) => {
        $crate::logging::dispatch_event(
            $crate::logging::LogEvent::warning_with_code($code, $message),
            None,
        )
    };

    ($code:expr, $message:expr, line = $line:expr) => {
        $crate::logging::dispatch_event(
            $crate::logging::LogEvent::warning_with_code($code, $message),
            Some($line),
        )
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {
        {
            let mut event = $crate::logging::LogEvent::warning_with_code($code, $message);
            $(
                event = event.with_context($key, &format!("{}", $value));
            )+
            $crate::logging::dispatch_event(event, None)
        }
    };

    ($code:expr, $message:expr, line = $line:expr, $($key:expr => $value:expr),+) => {
        {
            let mut event = $crate::logging::LogEvent::warning_with_code($code, $message);
            $(
                event = event.with_context($key, &format!("{}", $value));
            )+
            $crate::logging::dispatch_event(event, Some($line))
        }
    };
}

// ============================================================================
// SUCCESS / INFO LOGGING
// ============================================================================

/// Log success with Code type - accepts Display types for context values
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr) => {
        $crate::logging::dispatch_event($crate::logging::LogEvent::success($code, $message), None)
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {
        {
            let mut event = $crate::logging::LogEvent::success($code, $message);
            $(
                event = event.with_context($key, &format!("{}", $value));
            )+
            $crate::logging::dispatch_event(event, None)
        }
    };
}

/// Log informational message - accepts Display types for context values
#[macro_export]
macro_rules! log_info {
    ($message:expr) => {
        $crate::logging::dispatch_event($crate::logging::LogEvent::info($message), None)
    };

    ($message:expr, $($key:expr => $value:expr),+) => {
        {
            let mut event = $crate::logging::LogEvent::info($message);
            $(
                event = event.with_context($key, &format!("{}", $value));
            )+
            $crate::logging::dispatch_event(event, None)
        }
    };
}

// ============================================================================
// DEBUG LOGGING
// ============================================================================

/// Log debug message; context is only formatted when debug output is enabled
#[macro_export]
macro_rules! log_debug {
    ($message:expr) => {
        if $crate::logging::debug_enabled() {
            $crate::logging::dispatch_event($crate::logging::LogEvent::debug($message), None)
        }
    };

    ($message:expr, $($key:expr => $value:expr),+) => {
        if $crate::logging::debug_enabled() {
            let mut event = $crate::logging::LogEvent::debug($message);
            $(
                event = event.with_context($key, &format!("{}", $value));
            )+
            $crate::logging::dispatch_event(event, None)
        }
    };
}
