//! Subcommands of the `dmptool` binary

pub mod list;

pub use list::{build_table, list_fields, ListCommand, ListError, ListHandler, OutputFormat};
