//! Line source for dump files
//!
//! Supplies raw text one physical line at a time with line terminators and a
//! stray trailing carriage return removed. Individual lines may be very large
//! (embedded program code), bounded by the compile-time
//! `source::MAX_LINE_LENGTH` ceiling rather than a small fixed buffer.

mod lines;

pub use lines::{LineSource, SourceError, SourceLine};

use crate::config::compile_time::source::READ_BUFFER_CAPACITY;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;

/// Open a dump file and wrap it in a line source
pub fn open_file(path: &Path) -> Result<LineSource<BufReader<File>>, SourceError> {
    let file = File::open(path).map_err(|e| {
        let path = path.display().to_string();
        match e.kind() {
            ErrorKind::NotFound => SourceError::FileNotFound { path },
            ErrorKind::PermissionDenied => SourceError::PermissionDenied { path },
            _ => SourceError::Io {
                message: format!("{}: {}", path, e),
            },
        }
    })?;

    Ok(LineSource::new(BufReader::with_capacity(
        READ_BUFFER_CAPACITY,
        file,
    )))
}
