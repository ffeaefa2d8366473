//! Error, warning and success codes with their classification metadata
//!
//! Every code emitted by the parser, the query engine and the CLI is declared
//! here together with the metadata the logging service reports alongside it.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Metadata attached to a registered code
#[derive(Debug, Clone)]
pub struct CodeMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
}

impl CodeMetadata {
    const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        description: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            description,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Line source / file access codes
pub mod source {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E010");
    pub const PERMISSION_DENIED: Code = Code::new("E011");
    pub const LINE_TOO_LONG: Code = Code::new("E012");
    pub const IO_ERROR: Code = Code::new("E013");
}

/// Dump structure codes (never fatal)
pub mod parser {
    use super::Code;

    pub const SCOPE_DEPTH_EXCEEDED: Code = Code::new("W020");
    pub const UNCLOSED_SCOPES: Code = Code::new("W021");
    pub const INVALID_TIMESTAMP: Code = Code::new("W022");
    pub const ORPHANED_BLOCK: Code = Code::new("W023");
}

/// Filter and ordering codes
pub mod query {
    use super::Code;

    pub const FILTER_PARSE_ERROR: Code = Code::new("E030");
    pub const QUERY_TOO_LONG: Code = Code::new("E031");
    pub const EXPRESSION_TOO_DEEP: Code = Code::new("E032");
    pub const UNKNOWN_SORT_FIELD: Code = Code::new("E035");
    pub const BAD_SORT_DIRECTION: Code = Code::new("E036");
    pub const MALFORMED_SORT_CLAUSE: Code = Code::new("E037");
}

/// Command-line tool codes
pub mod tool {
    use super::Code;

    pub const OUTPUT_ERROR: Code = Code::new("E050");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const PARSE_COMPLETED: Code = Code::new("I010");
    pub const FILTER_COMPILED: Code = Code::new("I030");
    pub const LIST_COMPLETED: Code = Code::new("I050");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

static CODE_REGISTRY: OnceLock<HashMap<&'static str, CodeMetadata>> = OnceLock::new();

fn get_code_registry() -> &'static HashMap<&'static str, CodeMetadata> {
    CODE_REGISTRY.get_or_init(|| {
        let entries = [
            CodeMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                "Critical internal error",
            ),
            CodeMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                "Logging or configuration failed to initialize",
            ),
            CodeMetadata::new(
                "E010",
                "Source",
                Severity::High,
                false,
                "Dump file does not exist",
            ),
            CodeMetadata::new(
                "E011",
                "Source",
                Severity::High,
                false,
                "Dump file cannot be read with current permissions",
            ),
            CodeMetadata::new(
                "E012",
                "Source",
                Severity::High,
                false,
                "A physical line exceeds the configured maximum length",
            ),
            CodeMetadata::new(
                "E013",
                "Source",
                Severity::High,
                false,
                "Reading the dump file failed",
            ),
            CodeMetadata::new(
                "W020",
                "Parser",
                Severity::Medium,
                true,
                "Section nesting exceeded the configured depth; section ignored",
            ),
            CodeMetadata::new(
                "W021",
                "Parser",
                Severity::Low,
                true,
                "Sections were still open at end of input and were discarded",
            ),
            CodeMetadata::new(
                "W022",
                "Parser",
                Severity::Low,
                true,
                "LastChange value is not a recognised timestamp",
            ),
            CodeMetadata::new(
                "W023",
                "Parser",
                Severity::Low,
                true,
                "A captured block closed without an owning object",
            ),
            CodeMetadata::new(
                "E030",
                "Query",
                Severity::Medium,
                true,
                "Filter expression could not be parsed",
            ),
            CodeMetadata::new(
                "E031",
                "Query",
                Severity::Medium,
                true,
                "Filter expression exceeds the configured length",
            ),
            CodeMetadata::new(
                "E032",
                "Query",
                Severity::Medium,
                true,
                "Filter expression nests deeper than the configured limit",
            ),
            CodeMetadata::new(
                "E035",
                "Query",
                Severity::Medium,
                true,
                "Sort key names a field that is not in the output",
            ),
            CodeMetadata::new(
                "E036",
                "Query",
                Severity::Medium,
                true,
                "Sort direction must be asc or desc",
            ),
            CodeMetadata::new(
                "E037",
                "Query",
                Severity::Medium,
                true,
                "Sort clause has too many words",
            ),
            CodeMetadata::new(
                "E050",
                "Tool",
                Severity::High,
                false,
                "Writing command output failed",
            ),
        ];

        entries
            .into_iter()
            .map(|metadata| (metadata.code, metadata))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get metadata for a specific code
pub fn get_metadata(code: &str) -> Option<&'static CodeMetadata> {
    get_code_registry().get(code)
}

/// Get severity from code
pub fn get_severity(code: &str) -> Severity {
    get_code_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if the condition behind a code is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_code_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Get human-readable description for code
pub fn get_description(code: &str) -> &'static str {
    get_code_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get category from code
pub fn get_category(code: &str) -> &'static str {
    get_code_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_error_code_is_registered() {
        let codes = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            source::FILE_NOT_FOUND,
            source::PERMISSION_DENIED,
            source::LINE_TOO_LONG,
            source::IO_ERROR,
            parser::SCOPE_DEPTH_EXCEEDED,
            parser::UNCLOSED_SCOPES,
            parser::INVALID_TIMESTAMP,
            parser::ORPHANED_BLOCK,
            query::FILTER_PARSE_ERROR,
            query::QUERY_TOO_LONG,
            query::EXPRESSION_TOO_DEEP,
            query::UNKNOWN_SORT_FIELD,
            query::BAD_SORT_DIRECTION,
            query::MALFORMED_SORT_CLAUSE,
            tool::OUTPUT_ERROR,
        ];

        for code in codes {
            assert!(
                get_metadata(code.as_str()).is_some(),
                "missing metadata for {}",
                code
            );
        }
    }

    #[test]
    fn test_classification() {
        assert_eq!(get_severity("ERR001"), Severity::Critical);
        assert_eq!(get_category("E012"), "Source");
        assert!(is_recoverable("W020"));
        assert!(!is_recoverable("E013"));
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_description("Z999"), "Unknown error");
        assert_eq!(get_category("Z999"), "Unknown");
        assert_eq!(get_severity("Z999"), Severity::Medium);
    }
}
