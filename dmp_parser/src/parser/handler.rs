//! Callback boundary between the parser and its consumers

use crate::model::{Dictionary, Object};
use serde::Serialize;
use std::fmt;

/// Section kinds reported through `Handler::begin` / `Handler::end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tag {
    Dictionary,
    Controller,
    InfinetCtlr,
    Container,
    Device,
    Object,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Dictionary => "Dictionary",
            Tag::Controller => "Controller",
            Tag::InfinetCtlr => "InfinetCtlr",
            Tag::Container => "Container",
            Tag::Device => "Device",
            Tag::Object => "Object",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives parse events in document order.
///
/// Every method has a no-op default so consumers implement only what they
/// need. Records passed to `object` and `dictionary` are owned by the
/// handler from then on.
pub trait Handler {
    fn begin(&mut self, _tag: Tag, _name: &str) {}

    fn end(&mut self, _tag: Tag, _name: &str) {}

    fn object(&mut self, _object: Object) {}

    fn dictionary(&mut self, _dictionary: Dictionary) {}

    /// Root `Path:` value of the dump
    fn path(&mut self, _path: &str) {}
}

/// Handler that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyHandler;

impl Handler for EmptyHandler {}

/// One recorded parse event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Begin(Tag, String),
    End(Tag, String),
    /// Path of the emitted object
    Object(String),
    /// Path of the emitted dictionary
    Dictionary(String),
    Path(String),
}

/// Handler that keeps every record and the event order
#[derive(Debug, Default, Clone)]
pub struct RecordCollector {
    pub objects: Vec<Object>,
    pub dictionaries: Vec<Dictionary>,
    pub events: Vec<Event>,
}

impl RecordCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object_by_name(&self, name: &str) -> Option<&Object> {
        self.objects.iter().find(|o| o.name == name)
    }
}

impl Handler for RecordCollector {
    fn begin(&mut self, tag: Tag, name: &str) {
        self.events.push(Event::Begin(tag, name.to_string()));
    }

    fn end(&mut self, tag: Tag, name: &str) {
        self.events.push(Event::End(tag, name.to_string()));
    }

    fn object(&mut self, object: Object) {
        self.events.push(Event::Object(object.path.clone()));
        self.objects.push(object);
    }

    fn dictionary(&mut self, dictionary: Dictionary) {
        self.events.push(Event::Dictionary(dictionary.path.clone()));
        self.dictionaries.push(dictionary);
    }

    fn path(&mut self, path: &str) {
        self.events.push(Event::Path(path.to_string()));
    }
}
