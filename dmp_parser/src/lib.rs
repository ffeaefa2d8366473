//! Streaming parser for building-automation dump files
//!
//! Dump text is read line by line and delivered to a [`Handler`] as typed
//! [`Object`] and [`Dictionary`] records together with section boundary
//! events. The configuration and logging modules are shared with the query
//! engine and the command-line tool.

// Internal modules
pub mod config;
#[macro_use]
pub mod logging;
pub mod model;
pub mod parser;
pub mod source;

// Re-export key types for library consumers
pub use model::{parse_alarm_links, AlarmLink, Dictionary, Object, ParseSummary, Table};
pub use parser::{
    parse, parse_file, parse_str, DumpParser, EmptyHandler, Event, Handler, ParseError,
    RecordCollector, Tag,
};
pub use source::{LineSource, SourceError};
