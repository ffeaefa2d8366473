//! `list` command: filter objects from a dump and print them as a table

use dmp_parser::logging::{codes, Code};
use dmp_parser::model::Object;
use dmp_parser::{log_info, log_success};
use dmp_parser::{parse_file, Handler, ParseError};
use dmp_query::filter::{compile_filter, Expression, FilterError};
use dmp_query::ordering::{reorder, OrderingError};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Field arguments that ask for the list of available fields instead
const FIELD_LISTING: [&str; 3] = ["?", "-", "*"];

#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("could not reorder results: {0}")]
    Ordering(#[from] OrderingError),

    #[error("could not create file '{path}': {source}")]
    Create {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("could not write results: {0}")]
    Write(#[from] io::Error),

    #[error("could not encode results: {0}")]
    Json(#[from] serde_json::Error),
}

impl ListError {
    /// Get the appropriate error code for this error type
    pub fn error_code(&self) -> Code {
        match self {
            ListError::Parse(e) => e.error_code(),
            ListError::Filter(e) => e.error_code(),
            ListError::Ordering(e) => e.error_code(),
            ListError::Create { .. } | ListError::Write(_) | ListError::Json(_) => {
                codes::tool::OUTPUT_ERROR
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Options for one `list` invocation
#[derive(Debug, Clone, Default)]
pub struct ListCommand {
    pub file: PathBuf,
    pub fields: Vec<String>,
    /// Exact `Type` values to keep
    pub types: Vec<String>,
    /// Substrings of `Name` to keep
    pub names: Vec<String>,
    /// Substrings of `Path` to keep
    pub devices: Vec<String>,
    pub filter: Option<String>,
    pub ordering: Vec<String>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

/// Collects objects that pass every pre-filter and the WHERE expression
pub struct ListHandler {
    types: Vec<String>,
    names: Vec<String>,
    devices: Vec<String>,
    filter: Option<Expression>,
    pub results: Vec<Object>,
}

impl ListHandler {
    pub fn new(command: &ListCommand, filter: Option<Expression>) -> Self {
        Self {
            types: command.types.clone(),
            names: command.names.clone(),
            devices: command.devices.clone(),
            filter,
            results: Vec::new(),
        }
    }

    fn keep(&self, object: &Object) -> bool {
        if !self.types.is_empty() && !self.types.iter().any(|t| *t == object.object_type) {
            return false;
        }

        if !self.names.is_empty() && !self.names.iter().any(|n| object.name.contains(n.as_str())) {
            return false;
        }

        if !self.devices.is_empty()
            && !self.devices.iter().any(|d| object.path.contains(d.as_str()))
        {
            return false;
        }

        self.filter
            .as_ref()
            .map_or(true, |filter| filter.matches(object))
    }
}

impl Handler for ListHandler {
    fn object(&mut self, object: Object) {
        if self.keep(&object) {
            self.results.push(object);
        }
    }
}

impl ListCommand {
    /// Whether the field arguments ask for the available field names
    pub fn lists_fields(&self) -> bool {
        match self.fields.as_slice() {
            [] => true,
            [only] => FIELD_LISTING.contains(&only.as_str()),
            _ => false,
        }
    }

    /// Run the command, writing to `--output` or stdout
    pub fn execute(&self) -> Result<usize, ListError> {
        match &self.output {
            Some(path) => {
                let file = File::create(path).map_err(|source| ListError::Create {
                    path: path.display().to_string(),
                    source,
                })?;
                let mut writer = BufWriter::new(file);
                let rows = self.run(&mut writer)?;
                writer.flush()?;
                Ok(rows)
            }
            None => {
                let stdout = io::stdout();
                let mut writer = stdout.lock();
                self.run(&mut writer)
            }
        }
    }

    /// Parse, filter, order and print; returns the number of rows written
    pub fn run(&self, out: &mut dyn Write) -> Result<usize, ListError> {
        let filter = match self.filter.as_deref() {
            Some(text) if !text.trim().is_empty() => Some(compile_filter(text)?),
            _ => None,
        };

        let mut handler = ListHandler::new(self, filter);
        let summary = parse_file(&self.file, &mut handler)?;
        log_info!(
            "Dump parsed",
            "objects" => summary.objects,
            "matched" => handler.results.len()
        );

        if self.lists_fields() {
            let names = list_fields(&handler.results);
            self.write_field_names(out, &names)?;
            return Ok(names.len());
        }

        let mut table = build_table(&self.fields, &handler.results);
        if !self.ordering.is_empty() {
            reorder(self.ordering.as_slice(), self.fields.as_slice(), &mut table)?;
        }

        match self.format {
            OutputFormat::Text => write_text(out, &self.fields, &table)?,
            OutputFormat::Json => write_json(out, &self.fields, &table)?,
        }

        log_success!(
            codes::success::LIST_COMPLETED,
            "List completed",
            "rows" => table.len()
        );
        Ok(table.len())
    }

    fn write_field_names(&self, out: &mut dyn Write, names: &[String]) -> Result<(), ListError> {
        match self.format {
            OutputFormat::Text => {
                for name in names {
                    writeln!(out, "{}", name)?;
                }
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, names)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }
}

/// Sorted union of the property names of every object
pub fn list_fields(objects: &[Object]) -> Vec<String> {
    let names: BTreeSet<&str> = objects
        .iter()
        .flat_map(|object| object.field_names())
        .collect();
    names.into_iter().map(str::to_string).collect()
}

/// One row per object, one cell per field; missing properties are empty
pub fn build_table(fields: &[String], objects: &[Object]) -> Vec<Vec<String>> {
    objects
        .iter()
        .map(|object| {
            fields
                .iter()
                .map(|field| object.property(field).unwrap_or_default().to_string())
                .collect()
        })
        .collect()
}

fn column_widths(fields: &[String], table: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = fields.iter().map(|f| f.chars().count()).collect();
    for row in table {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths
}

fn write_row<S: AsRef<str>>(out: &mut dyn Write, widths: &[usize], cells: &[S]) -> io::Result<()> {
    for (index, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if index > 0 {
            out.write_all(b"  ")?;
        }
        write!(out, "{:<width$}", cell.as_ref(), width = *width)?;
    }
    writeln!(out)
}

/// Left-aligned columns with a header and a dashed separator row
pub fn write_text(out: &mut dyn Write, fields: &[String], table: &[Vec<String>]) -> io::Result<()> {
    let widths = column_widths(fields, table);

    write_row(out, &widths, fields)?;
    let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(out, &widths, &dashes)?;

    for row in table {
        write_row(out, &widths, row)?;
    }
    Ok(())
}

/// Array of objects keyed by field name
pub fn write_json(
    out: &mut dyn Write,
    fields: &[String],
    table: &[Vec<String>],
) -> Result<(), ListError> {
    let records: Vec<serde_json::Map<String, serde_json::Value>> = table
        .iter()
        .map(|row| {
            fields
                .iter()
                .zip(row)
                .map(|(field, cell)| (field.clone(), serde_json::Value::String(cell.clone())))
                .collect()
        })
        .collect();

    serde_json::to_writer_pretty(&mut *out, &records)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = "Path: \\\\SITE\r\n\
BeginController: CX1\r\n\
Object: AHU-2\r\n\
Type: AnalogInput\r\n\
Value: 10\r\n\
EndObject\r\n\
Object: AHU-10\r\n\
Type: AnalogInput\r\n\
Value: 7\r\n\
Units: degF\r\n\
EndObject\r\n\
Object: Fan\r\n\
Type: BinaryOutput\r\n\
Value: 1\r\n\
EndObject\r\n\
EndController\r\n";

    fn dump_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DUMP.as_bytes()).unwrap();
        file
    }

    fn command(file: &tempfile::NamedTempFile, fields: &[&str]) -> ListCommand {
        ListCommand {
            file: file.path().to_path_buf(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            ..ListCommand::default()
        }
    }

    fn run(command: &ListCommand) -> (Result<usize, ListError>, String) {
        let mut out = Vec::new();
        let result = command.run(&mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_text_table() {
        let file = dump_file();
        let (result, text) = run(&command(&file, &["Name", "Value"]));

        assert_eq!(result.unwrap(), 3);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Name    Value");
        assert_eq!(lines[1], "------  -----");
        assert_eq!(lines[2], "AHU-2   10   ");
        assert_eq!(lines[4], "Fan     1    ");
    }

    #[test]
    fn test_field_listing() {
        let file = dump_file();
        for fields in [&[][..], &["?"][..], &["*"][..]] {
            let (result, text) = run(&command(&file, fields));
            assert_eq!(result.unwrap(), 4);
            assert_eq!(text, "Name\nType\nUnits\nValue\n");
        }
    }

    #[test]
    fn test_prefilters_and_where() {
        let file = dump_file();

        let mut by_type = command(&file, &["Name"]);
        by_type.types = vec!["AnalogInput".to_string()];
        assert_eq!(run(&by_type).0.unwrap(), 2);

        let mut by_name = command(&file, &["Name"]);
        by_name.names = vec!["AHU-1".to_string()];
        assert_eq!(run(&by_name).0.unwrap(), 1);

        let mut by_device = command(&file, &["Name"]);
        by_device.devices = vec!["CX2".to_string()];
        assert_eq!(run(&by_device).0.unwrap(), 0);

        let mut by_filter = command(&file, &["Name"]);
        by_filter.filter = Some("Type = 'AnalogInput' AND Value > 8".to_string());
        let (result, text) = run(&by_filter);
        assert_eq!(result.unwrap(), 1);
        assert!(text.contains("AHU-2"));
    }

    #[test]
    fn test_natural_ordering() {
        let file = dump_file();
        let mut ordered = command(&file, &["Name", "Units"]);
        ordered.ordering = vec!["desc name".to_string()];

        let (result, text) = run(&ordered);
        assert_eq!(result.unwrap(), 3);
        let names: Vec<&str> = text
            .lines()
            .skip(2)
            .filter_map(|line| line.split_whitespace().next())
            .collect();
        assert_eq!(names, vec!["Fan", "AHU-10", "AHU-2"]);
    }

    #[test]
    fn test_bad_filter_and_ordering() {
        let file = dump_file();

        let mut bad_filter = command(&file, &["Name"]);
        bad_filter.filter = Some("Value = ".to_string());
        let error = run(&bad_filter).0.unwrap_err();
        assert!(error.to_string().starts_with("error parsing where at : "));

        let mut bad_order = command(&file, &["Name"]);
        bad_order.ordering = vec!["sideways name".to_string()];
        let error = run(&bad_order).0.unwrap_err();
        assert_eq!(
            error.to_string(),
            "could not reorder results: bad sort direction 'sideways'"
        );
    }

    #[test]
    fn test_json_output() {
        let file = dump_file();
        let mut json = command(&file, &["Name", "Units"]);
        json.format = OutputFormat::Json;
        json.types = vec!["AnalogInput".to_string()];

        let (result, text) = run(&json);
        assert_eq!(result.unwrap(), 2);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[1]["Name"], "AHU-10");
        assert_eq!(value[1]["Units"], "degF");
        assert_eq!(value[0]["Units"], "");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = ListCommand {
            file: dir.path().join("none.dmp"),
            fields: vec!["Name".to_string()],
            ..ListCommand::default()
        };
        assert!(matches!(run(&missing).0, Err(ListError::Parse(_))));
    }

    #[test]
    fn test_output_file() {
        let file = dump_file();
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");

        let mut to_file = command(&file, &["Name"]);
        to_file.output = Some(target.clone());
        assert_eq!(to_file.execute().unwrap(), 3);

        let written = std::fs::read_to_string(target).unwrap();
        assert!(written.starts_with("Name  \n------\n"));
    }
}
