use serde::Serialize;

/// Totals and root information from one completed parse pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseSummary {
    /// First root-level `Path:` value
    pub root_path: String,
    /// Root path joined with the most recent root-level dictionary name
    pub device_path: String,
    pub lines: usize,
    pub objects: usize,
    pub dictionaries: usize,
    /// Scopes still open at end of input; their records were discarded
    pub unclosed_scopes: usize,
}

impl ParseSummary {
    pub fn is_complete(&self) -> bool {
        self.unclosed_scopes == 0
    }
}
