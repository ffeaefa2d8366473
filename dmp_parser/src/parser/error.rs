use crate::logging::Code;
use crate::source::SourceError;

/// Failures that abort a parse pass
///
/// Structural problems in the dump never appear here; they are tolerated
/// and at most logged.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("Cannot open dump: {0}")]
    Open(#[from] SourceError),

    #[error("Reading stopped at line {line}: {source}")]
    Read { line: usize, source: SourceError },
}

impl ParseError {
    /// Get the appropriate error code for this error type
    pub fn error_code(&self) -> Code {
        match self {
            ParseError::Open(source) => source.error_code(),
            ParseError::Read { source, .. } => source.error_code(),
        }
    }

    /// Line on which reading failed, when the file was opened
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Open(_) => None,
            ParseError::Read { line, .. } => Some(*line),
        }
    }
}
