//! # dmp_tool
//!
//! Command implementations behind the `dmptool` binary. Each command wires
//! the dump parser and the query engine together; the binary only maps
//! command-line flags onto these types.

pub mod commands;
pub mod logger;

pub use commands::{ListCommand, ListError, OutputFormat};
pub use logger::{init_logging, FacadeLogger};
