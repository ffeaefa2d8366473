//! Streaming dump parser
//!
//! One line at a time is dispatched to the innermost open scope. Each scope
//! answers with a transition; a line the scope cannot consume is closed out
//! and re-dispatched to the parent in memory, never re-read from the input.

mod alias;
mod error;
mod handler;
mod scope;
mod text;

pub use alias::{join_path, parent_path, AliasMap, PATH_SEPARATOR};
pub use error::ParseError;
pub use handler::{EmptyHandler, Event, Handler, RecordCollector, Tag};
pub use text::{fix_double_blank_lines, split_cells, split_key_value};

use crate::config::compile_time::parser::MAX_SCOPE_DEPTH;
use crate::config::runtime::ParserPreferences;
use crate::logging::{self, codes};
use crate::model::ParseSummary;
use crate::source::{self, LineSource};
use crate::{log_debug, log_error, log_success, log_warning};
use scope::{RootScope, Scope, ScopeContext, Transition};
use std::io::{BufRead, Cursor};
use std::path::Path;

/// Incremental parser state for one pass over a dump
pub struct DumpParser<'h> {
    stack: Vec<Scope>,
    aliases: AliasMap,
    handler: &'h mut dyn Handler,
    preferences: ParserPreferences,
    lines: usize,
    objects: usize,
    dictionaries: usize,
}

impl<'h> DumpParser<'h> {
    pub fn new(handler: &'h mut dyn Handler) -> Self {
        Self::with_preferences(handler, ParserPreferences::default())
    }

    pub fn with_preferences(handler: &'h mut dyn Handler, preferences: ParserPreferences) -> Self {
        Self {
            stack: vec![Scope::Root(RootScope::default())],
            aliases: AliasMap::new(),
            handler,
            preferences,
            lines: 0,
            objects: 0,
            dictionaries: 0,
        }
    }

    /// Number of open scopes, the root included
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn aliases(&self) -> &AliasMap {
        &self.aliases
    }

    /// Dispatch one line of input
    pub fn feed_line(&mut self, line: &str) {
        self.lines += 1;

        loop {
            let can_nest = self.stack.len() < MAX_SCOPE_DEPTH;
            let Some(active) = self.stack.last_mut() else {
                return;
            };

            let mut ctx = ScopeContext {
                aliases: &mut self.aliases,
                handler: &mut *self.handler,
                line: self.lines,
                can_nest,
            };

            match active.parse(line, &mut ctx) {
                Transition::Stay => return,
                Transition::Push(scope) => {
                    if self.preferences.trace_scopes {
                        log_debug!("Scope opened",
                            "scope" => scope.kind_name(),
                            "depth" => self.stack.len() + 1,
                            "line" => self.lines
                        );
                    }
                    self.stack.push(scope);
                    return;
                }
                Transition::Pop => {
                    self.close_active();
                    return;
                }
                Transition::Reparse => {
                    // The root consumes everything, so this always terminates
                    if self.stack.len() <= 1 {
                        return;
                    }
                    self.close_active();
                }
            }
        }
    }

    /// Close the innermost scope; the root is never closed
    fn close_active(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        let Some(scope) = self.stack.pop() else {
            return;
        };

        match &scope {
            Scope::Object(_) => self.objects += 1,
            Scope::Dictionary(_) => self.dictionaries += 1,
            _ => {}
        }

        if self.preferences.trace_scopes {
            log_debug!("Scope closed",
                "scope" => scope.kind_name(),
                "depth" => self.stack.len(),
                "line" => self.lines
            );
        }

        scope.close(self.stack.last_mut(), &mut *self.handler);
    }

    /// End the pass; scopes still open are discarded without emitting records
    pub fn finish(mut self) -> ParseSummary {
        let unclosed: Vec<&'static str> = self.stack[1..]
            .iter()
            .map(Scope::kind_name)
            .collect();

        if !unclosed.is_empty() && self.preferences.report_unclosed_scopes {
            log_warning!(
                codes::parser::UNCLOSED_SCOPES,
                "Input ended inside open sections",
                line = self.lines,
                "scopes" => unclosed.join(" > ")
            );
        }

        let (root_path, device_path) = match self.stack.first_mut() {
            Some(Scope::Root(root)) => (
                std::mem::take(&mut root.path),
                std::mem::take(&mut root.device_path),
            ),
            _ => (String::new(), String::new()),
        };

        ParseSummary {
            root_path,
            device_path,
            lines: self.lines,
            objects: self.objects,
            dictionaries: self.dictionaries,
            unclosed_scopes: unclosed.len(),
        }
    }
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Parse a dump from any buffered reader, delivering records to `handler`
pub fn parse<R: BufRead>(reader: R, handler: &mut dyn Handler) -> Result<ParseSummary, ParseError> {
    drive(LineSource::new(reader), handler)
}

/// Parse in-memory dump text
pub fn parse_str(text: &str, handler: &mut dyn Handler) -> Result<ParseSummary, ParseError> {
    parse(Cursor::new(text.as_bytes()), handler)
}

/// Open and parse a dump file; log events raised meanwhile carry the file name
pub fn parse_file(path: &Path, handler: &mut dyn Handler) -> Result<ParseSummary, ParseError> {
    logging::with_file_context(path, || -> Result<ParseSummary, ParseError> {
        let lines = source::open_file(path).map_err(|e| {
            log_error!(e.error_code(), "Failed to open dump file", "error" => &e);
            ParseError::Open(e)
        })?;

        let summary = drive(lines, handler)?;

        log_success!(
            codes::success::PARSE_COMPLETED,
            "Dump file parsed",
            "lines" => summary.lines,
            "objects" => summary.objects,
            "dictionaries" => summary.dictionaries
        );

        Ok(summary)
    })
}

fn drive<R: BufRead>(
    lines: LineSource<R>,
    handler: &mut dyn Handler,
) -> Result<ParseSummary, ParseError> {
    let mut parser = DumpParser::new(handler);

    for line in lines {
        match line {
            Ok(line) => parser.feed_line(&line.text),
            Err(source) => {
                let line = parser.lines + 1;
                log_error!(source.error_code(), "Dump read failed", line = line, "error" => &source);
                return Err(ParseError::Read { line, source });
            }
        }
    }

    Ok(parser.finish())
}
