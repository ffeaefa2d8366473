use crate::config::compile_time::source::MAX_LINE_LENGTH;
use crate::logging::codes;
use std::io::{BufRead, ErrorKind};

/// Errors surfaced while reading dump text
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Line {line} exceeds the maximum line length of {max} bytes")]
    LineTooLong { line: usize, max: usize },

    #[error("I/O error reading dump: {message}")]
    Io { message: String },
}

impl SourceError {
    /// Get the appropriate error code for this error type
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            SourceError::FileNotFound { .. } => codes::source::FILE_NOT_FOUND,
            SourceError::PermissionDenied { .. } => codes::source::PERMISSION_DENIED,
            SourceError::LineTooLong { .. } => codes::source::LINE_TOO_LONG,
            SourceError::Io { .. } => codes::source::IO_ERROR,
        }
    }
}

/// One physical line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based line number
    pub number: usize,
    pub text: String,
}

/// Iterator over the lines of a reader
///
/// Yields the first read error and then stops. Invalid UTF-8 is replaced
/// rather than rejected since dump files come from legacy systems.
#[derive(Debug)]
pub struct LineSource<R> {
    reader: R,
    buffer: Vec<u8>,
    line_number: usize,
    max_line_length: usize,
    finished: bool,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self::with_max_line_length(reader, MAX_LINE_LENGTH)
    }

    pub fn with_max_line_length(reader: R, max_line_length: usize) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
            line_number: 0,
            max_line_length,
            finished: false,
        }
    }

    /// Number of lines produced so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Read up to and including the next newline into the buffer.
    /// Returns the number of bytes consumed; zero means end of input.
    fn read_line(&mut self) -> Result<usize, SourceError> {
        let mut consumed = 0;

        loop {
            let (done, used) = {
                let available = match self.reader.fill_buf() {
                    Ok(available) => available,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => {
                        return Err(SourceError::Io {
                            message: e.to_string(),
                        })
                    }
                };

                if available.is_empty() {
                    self.check_length(self.buffer.len() - line_ending_length(&self.buffer))?;
                    return Ok(consumed);
                }

                match available.iter().position(|&b| b == b'\n') {
                    Some(index) => {
                        self.buffer.extend_from_slice(&available[..=index]);
                        (true, index + 1)
                    }
                    None => {
                        self.buffer.extend_from_slice(available);
                        (false, available.len())
                    }
                }
            };

            self.reader.consume(used);
            consumed += used;

            if done {
                self.check_length(self.buffer.len() - line_ending_length(&self.buffer))?;
                return Ok(consumed);
            }

            // a trailing `\r` may still turn out to be part of the terminator
            let pending = self.buffer.iter().rev().take(2).take_while(|&&b| b == b'\r').count();
            self.check_length(self.buffer.len() - pending)?;
        }
    }

    fn check_length(&self, content_length: usize) -> Result<(), SourceError> {
        if content_length > self.max_line_length {
            return Err(SourceError::LineTooLong {
                line: self.line_number + 1,
                max: self.max_line_length,
            });
        }
        Ok(())
    }
}

/// Length of the line terminator (`\n` or `\r\n`) plus one further stray `\r`
fn line_ending_length(buffer: &[u8]) -> usize {
    let mut content = buffer;
    if let Some(rest) = content.strip_suffix(b"\n") {
        content = rest.strip_suffix(b"\r").unwrap_or(rest);
    }
    if let Some(rest) = content.strip_suffix(b"\r") {
        content = rest;
    }
    buffer.len() - content.len()
}

fn trim_line_ending(buffer: &mut Vec<u8>) {
    buffer.truncate(buffer.len() - line_ending_length(buffer));
}

impl<R: BufRead> Iterator for LineSource<R> {
    type Item = Result<SourceLine, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        self.buffer.clear();
        match self.read_line() {
            Ok(0) => {
                self.finished = true;
                None
            }
            Ok(_) => {
                self.line_number += 1;
                trim_line_ending(&mut self.buffer);
                Some(Ok(SourceLine {
                    number: self.line_number,
                    text: String::from_utf8_lossy(&self.buffer).into_owned(),
                }))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
