//! Parsing scopes, one variant per nesting context of a dump file
//!
//! The active scope looks at each line and answers with a [`Transition`].
//! Scopes never read input themselves; a line a scope cannot consume is
//! handed back to the driver, which closes the scope and re-dispatches the
//! same line to the parent.

use super::alias::{join_path, parent_path, AliasMap};
use super::handler::{Handler, Tag};
use super::text::{fix_double_blank_lines, split_cells, split_key_value};
use crate::logging::codes;
use crate::log_warning;
use crate::model::{parse_timestamp, Dictionary, Object, Table};

/// What the driver does after the active scope has seen a line
pub(crate) enum Transition {
    /// Line consumed; scope stays active
    Stay,
    /// Line consumed; the new scope becomes active
    Push(Scope),
    /// Line consumed; the active scope is closed
    Pop,
    /// Line not consumed; close the active scope and give the line to its parent
    Reparse,
}

/// State shared by every scope during one parse pass
pub(crate) struct ScopeContext<'a> {
    pub aliases: &'a mut AliasMap,
    pub handler: &'a mut dyn Handler,
    /// 1-based number of the line being dispatched
    pub line: usize,
    /// False once the scope stack has reached its configured ceiling
    pub can_nest: bool,
}

impl ScopeContext<'_> {
    fn admit(&self, section: &str) -> bool {
        if !self.can_nest {
            log_warning!(
                codes::parser::SCOPE_DEPTH_EXCEEDED,
                "Section ignored; nesting too deep",
                line = self.line,
                "section" => section
            );
        }
        self.can_nest
    }
}

pub(crate) enum Scope {
    Root(RootScope),
    Section(SectionScope),
    Dictionary(DictionaryScope),
    Table(TableScope),
    Object(ObjectScope),
    Block(BlockScope),
    Code(CodeScope),
}

impl Scope {
    pub fn parse(&mut self, line: &str, ctx: &mut ScopeContext<'_>) -> Transition {
        match self {
            Scope::Root(scope) => scope.parse(line, ctx),
            Scope::Section(scope) => scope.parse(line, ctx),
            Scope::Dictionary(scope) => scope.parse(line, ctx),
            Scope::Table(scope) => scope.parse(line),
            Scope::Object(scope) => scope.parse(line, ctx),
            Scope::Block(scope) => scope.parse(line),
            Scope::Code(scope) => scope.parse(line),
        }
    }

    /// Deliver this scope's record to the handler or fold it into `parent`
    pub fn close(self, parent: Option<&mut Scope>, handler: &mut dyn Handler) {
        match self {
            Scope::Root(_) => {}
            Scope::Section(scope) => handler.end(scope.kind.tag(), &scope.name),
            Scope::Dictionary(scope) => {
                let name = scope.name.clone();
                handler.dictionary(Dictionary {
                    name: scope.name,
                    path: scope.path,
                    tables: scope.tables,
                });
                handler.end(Tag::Dictionary, &name);
            }
            Scope::Table(scope) => match parent {
                Some(Scope::Dictionary(dictionary)) => dictionary.tables.push(scope.table),
                _ => log_warning!(codes::parser::ORPHANED_BLOCK, "Table closed outside a dictionary"),
            },
            Scope::Object(scope) => {
                let name = scope.object.name.clone();
                handler.object(scope.object);
                handler.end(Tag::Object, &name);
            }
            Scope::Block(scope) => match parent {
                Some(Scope::Object(owner)) => owner
                    .object
                    .set_property(&scope.key, &scope.lines.join("\n")),
                _ => log_warning!(
                    codes::parser::ORPHANED_BLOCK,
                    "Block closed outside an object",
                    "key" => scope.key
                ),
            },
            Scope::Code(scope) => match parent {
                Some(Scope::Object(owner)) => owner.object.set_property(
                    BYTECODE,
                    &fix_double_blank_lines(scope.lines).join("\n"),
                ),
                _ => log_warning!(codes::parser::ORPHANED_BLOCK, "ByteCode closed outside an object"),
            },
        }
    }

    /// Short name used in trace output
    pub fn kind_name(&self) -> &'static str {
        match self {
            Scope::Root(_) => "root",
            Scope::Section(scope) => scope.kind.tag().as_str(),
            Scope::Dictionary(_) => "Dictionary",
            Scope::Table(_) => "Table",
            Scope::Object(_) => "Object",
            Scope::Block(_) => "Block",
            Scope::Code(_) => "ByteCode",
        }
    }
}

// ============================================================================
// CONTAINER-LIKE SCOPES
// ============================================================================

const BYTECODE: &str = "ByteCode";
const BYTECODE_END: &str = "EndByteCode";
const CDT_END: &str = "EndOfCDT";

/// Controller, InfinetCtlr, Container and Device sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SectionKind {
    Controller,
    InfinetCtlr,
    Container,
    Device,
}

impl SectionKind {
    fn from_begin_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "BeginController" => Some(SectionKind::Controller),
            "InfinetCtlr" => Some(SectionKind::InfinetCtlr),
            "BeginContainer" => Some(SectionKind::Container),
            "Device" => Some(SectionKind::Device),
            _ => None,
        }
    }

    fn end_keyword(&self) -> &'static str {
        match self {
            SectionKind::Controller => "EndController",
            SectionKind::InfinetCtlr => "EndInfinetCtlr",
            SectionKind::Container => "EndContainer",
            SectionKind::Device => "EndDevice",
        }
    }

    fn tag(&self) -> Tag {
        match self {
            SectionKind::Controller => Tag::Controller,
            SectionKind::InfinetCtlr => Tag::InfinetCtlr,
            SectionKind::Container => Tag::Container,
            SectionKind::Device => Tag::Device,
        }
    }

    /// Whether objects inside take this section's path as their device
    fn owns_devices(&self) -> bool {
        !matches!(self, SectionKind::Container)
    }
}

/// Open a child of a container-like scope, or `Stay` if `key` opens nothing
fn open_child(
    key: &str,
    value: &str,
    parent_path: &str,
    device_path: &str,
    ctx: &mut ScopeContext<'_>,
) -> Transition {
    match key {
        "Dictionary" => open_dictionary(value, parent_path, ctx),
        "Object" => {
            if !ctx.admit(Tag::Object.as_str()) {
                return Transition::Stay;
            }
            ctx.handler.begin(Tag::Object, value);
            let path = ctx.aliases.child_path(parent_path, value);
            Transition::Push(Scope::Object(ObjectScope {
                object: Object::new(value, path, device_path.to_string()),
                last_property: String::new(),
            }))
        }
        _ => {
            let Some(kind) = SectionKind::from_begin_keyword(key) else {
                return Transition::Stay;
            };
            if !ctx.admit(kind.tag().as_str()) {
                return Transition::Stay;
            }
            ctx.handler.begin(kind.tag(), value);
            let path = ctx.aliases.child_path(parent_path, value);
            let device_path = if kind.owns_devices() {
                path.clone()
            } else {
                device_path.to_string()
            };
            Transition::Push(Scope::Section(SectionScope {
                kind,
                name: value.to_string(),
                path,
                device_path,
            }))
        }
    }
}

fn open_dictionary(name: &str, parent_path: &str, ctx: &mut ScopeContext<'_>) -> Transition {
    if !ctx.admit(Tag::Dictionary.as_str()) {
        return Transition::Stay;
    }
    ctx.handler.begin(Tag::Dictionary, name);
    Transition::Push(Scope::Dictionary(DictionaryScope {
        name: name.to_string(),
        path: ctx.aliases.child_path(parent_path, name),
        tables: Vec::new(),
    }))
}

/// Top of a dump file
#[derive(Debug, Default)]
pub(crate) struct RootScope {
    /// First `Path:` value seen
    pub path: String,
    /// Root path joined with the most recent root-level dictionary name
    pub device_path: String,
}

impl RootScope {
    fn parse(&mut self, line: &str, ctx: &mut ScopeContext<'_>) -> Transition {
        let (key, value) = split_key_value(line);
        match key {
            "Path" => {
                if self.path.is_empty() {
                    self.path = value.to_string();
                }
                ctx.handler.path(value);
                Transition::Stay
            }
            "Dictionary" => {
                self.device_path = join_path(&self.path, value);
                open_dictionary(value, &self.path, ctx)
            }
            _ => open_child(key, value, &self.path, &self.path, ctx),
        }
    }
}

pub(crate) struct SectionScope {
    kind: SectionKind,
    name: String,
    path: String,
    device_path: String,
}

impl SectionScope {
    fn parse(&mut self, line: &str, ctx: &mut ScopeContext<'_>) -> Transition {
        let (key, value) = split_key_value(line);
        if key == self.kind.end_keyword() {
            return Transition::Pop;
        }
        open_child(key, value, &self.path, &self.device_path, ctx)
    }
}

// ============================================================================
// DICTIONARIES AND TABLES
// ============================================================================

pub(crate) struct DictionaryScope {
    name: String,
    path: String,
    tables: Vec<Table>,
}

impl DictionaryScope {
    fn parse(&mut self, line: &str, ctx: &mut ScopeContext<'_>) -> Transition {
        if line.trim().is_empty() {
            return Transition::Stay;
        }

        let (key, value) = split_key_value(line);
        match key {
            "Dictionary" => open_dictionary(value, &self.path, ctx),
            "EndDictionary" => Transition::Pop,
            "'TYPE" => {
                if !ctx.admit("Table") {
                    return Transition::Stay;
                }
                let header = split_cells(line)
                    .into_iter()
                    .enumerate()
                    .map(|(index, cell)| {
                        if index == 0 {
                            cell.trim_start_matches('\'').to_string()
                        } else {
                            cell.to_string()
                        }
                    })
                    .collect();
                Transition::Push(Scope::Table(TableScope {
                    table: Table::new(header),
                }))
            }
            // Rows outside a table and unknown lines are ignored
            _ => Transition::Stay,
        }
    }
}

pub(crate) struct TableScope {
    table: Table,
}

impl TableScope {
    fn parse(&mut self, line: &str) -> Transition {
        if line.trim().is_empty() {
            return Transition::Pop;
        }

        let cells = split_cells(line);
        if cells.len() != self.table.header.len() {
            return Transition::Reparse;
        }

        if matches!(cells[0], "Dictionary" | "EndDictionary" | "'TYPE") {
            return Transition::Reparse;
        }

        self.table
            .rows
            .push(cells.into_iter().map(str::to_string).collect());
        Transition::Stay
    }
}

// ============================================================================
// OBJECTS AND CAPTURED BLOCKS
// ============================================================================

pub(crate) struct ObjectScope {
    object: Object,
    /// Key of the most recent plain property line; names a following CDT
    last_property: String,
}

impl ObjectScope {
    fn parse(&mut self, line: &str, ctx: &mut ScopeContext<'_>) -> Transition {
        if line.trim().is_empty() {
            return Transition::Stay;
        }

        let (key, value) = split_key_value(line);
        match key {
            "EndObject" => return Transition::Pop,
            "LastChange" => {
                self.object.set_property(key, value);
                match parse_timestamp(value) {
                    Some(modified) => self.object.modified = Some(modified),
                    None if !value.is_empty() => log_warning!(
                        codes::parser::INVALID_TIMESTAMP,
                        "Unrecognised LastChange value",
                        line = ctx.line,
                        "value" => value
                    ),
                    None => {}
                }
            }
            "Alias" => {
                self.object.set_property(key, value);
                self.object.alias = Some(value.to_string());
                if value != self.object.name {
                    let renamed = join_path(parent_path(&self.object.path), value);
                    ctx.aliases
                        .register(self.object.path.clone(), renamed.clone());
                    self.object.path = renamed;
                }
            }
            "DeviceId" => {
                self.object.set_property(key, value);
                self.object.device_id = value.to_string();
            }
            "Type" => {
                self.object.set_property(key, value);
                self.object.object_type = value.to_string();
            }
            "{" => {
                let owner = if self.last_property.is_empty() {
                    "CDT"
                } else {
                    self.last_property.as_str()
                };
                let mut block = BlockScope::new(owner, CDT_END, true);
                block.lines.push(line.to_string());
                return open_block(Scope::Block(block), ctx);
            }
            "PanelObjectList" => {
                return open_block(Scope::Block(BlockScope::new(key, "}", true)), ctx)
            }
            "Array" | "Members" | "AlarmLinks" => {
                let end = format!("End{}", key);
                return open_block(Scope::Block(BlockScope::new(key, &end, false)), ctx);
            }
            BYTECODE => {
                return open_block(Scope::Code(CodeScope { lines: Vec::new() }), ctx);
            }
            _ => self.object.set_property(key, value),
        }

        self.last_property = key.to_string();
        Transition::Stay
    }
}

fn open_block(scope: Scope, ctx: &ScopeContext<'_>) -> Transition {
    if !ctx.admit(scope.kind_name()) {
        return Transition::Stay;
    }
    Transition::Push(scope)
}

/// Raw lines captured until an end marker
pub(crate) struct BlockScope {
    key: String,
    end_marker: String,
    include_end: bool,
    lines: Vec<String>,
}

impl BlockScope {
    fn new(key: &str, end_marker: &str, include_end: bool) -> Self {
        Self {
            key: key.to_string(),
            end_marker: end_marker.to_string(),
            include_end,
            lines: Vec::new(),
        }
    }

    fn parse(&mut self, line: &str) -> Transition {
        if line.trim_matches(' ') == self.end_marker {
            if self.include_end {
                self.lines.push(line.to_string());
            }
            return Transition::Pop;
        }
        self.lines.push(line.to_string());
        Transition::Stay
    }
}

/// Program text between `ByteCode` and `EndByteCode`
pub(crate) struct CodeScope {
    lines: Vec<String>,
}

impl CodeScope {
    fn parse(&mut self, line: &str) -> Transition {
        if line.trim() == BYTECODE_END {
            return Transition::Pop;
        }
        self.lines.push(line.to_string());
        Transition::Stay
    }
}
