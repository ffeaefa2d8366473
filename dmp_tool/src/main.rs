//! # dmptool
//!
//! Lists objects from building-automation dump files.

use clap::{Args, Parser, Subcommand};
use dmp_parser::{log_error, log_info};
use dmp_tool::{init_logging, ListCommand, OutputFormat};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dmptool", version, about = "Query building-automation dump files")]
struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List objects, optionally filtered and ordered, as a table
    List(ListArgs),
}

#[derive(Args)]
struct ListArgs {
    /// Dump file to read
    file: PathBuf,

    /// Columns to print; omit or pass `?` to list the available fields
    #[arg(short, long, value_delimiter = ',')]
    fields: Vec<String>,

    /// Keep objects whose Type is exactly this value (repeatable)
    #[arg(short = 't', long = "type")]
    types: Vec<String>,

    /// Keep objects whose Name contains this text (repeatable)
    #[arg(short, long = "name")]
    names: Vec<String>,

    /// Keep objects whose Path contains this text (repeatable)
    #[arg(short, long = "device")]
    devices: Vec<String>,

    /// WHERE expression, e.g. "Type = 'AnalogInput' AND Value > 10"
    #[arg(short = 'w', long = "where")]
    filter: Option<String>,

    /// Sort clauses, e.g. "desc name, id"
    #[arg(short = 's', long = "order-by")]
    order_by: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write results to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl From<ListArgs> for ListCommand {
    fn from(args: ListArgs) -> Self {
        ListCommand {
            file: args.file,
            fields: args
                .fields
                .into_iter()
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect(),
            types: args.types,
            names: args.names,
            devices: args.devices,
            filter: args.filter,
            ordering: args.order_by,
            format: args.format,
            output: args.output,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    log_info!("dmptool starting", "version" => env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::List(args) => {
            let command = ListCommand::from(args);
            if let Err(e) = command.execute() {
                log_error!(e.error_code(), "List failed", "error" => &e);
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
