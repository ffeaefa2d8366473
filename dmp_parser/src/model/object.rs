use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

/// Layout of `LastChange` values, e.g. `1/2/2006 3:04:05 PM`.
/// Interpreted as local wall-clock time.
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// A leaf or container entity from the dump hierarchy
///
/// Built up line by line while its `Object` section is open and handed to the
/// handler exactly once, at `EndObject`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Object {
    #[serde(rename = "Type")]
    pub object_type: String,
    pub name: String,
    pub alias: Option<String>,
    /// Owning device path; defaults to the enclosing device scope
    pub device_id: String,
    /// Unique hierarchical key computed from the enclosing scopes
    pub path: String,
    pub modified: Option<NaiveDateTime>,
    pub properties: BTreeMap<String, String>,
}

impl Object {
    pub fn new(name: &str, path: String, device_id: String) -> Self {
        let mut properties = BTreeMap::new();
        properties.insert("Name".to_string(), name.to_string());

        Self {
            object_type: String::new(),
            name: name.to_string(),
            alias: None,
            device_id,
            path,
            modified: None,
            properties,
        }
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn set_property(&mut self, key: &str, value: &str) {
        self.properties.insert(key.to_string(), value.to_string());
    }

    /// Property names in sorted order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }
}

/// Parse a `LastChange` value
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_new_object_always_has_name() {
        let obj = Object::new("AHU1", "site/AHU1".to_string(), String::new());
        assert_eq!(obj.property("Name"), Some("AHU1"));
        assert_eq!(obj.field_names().collect::<Vec<_>>(), vec!["Name"]);
    }

    #[test]
    fn test_parse_timestamp_unpadded() {
        let ts = parse_timestamp("1/2/2006 3:04:05 PM").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2006, 1, 2));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (15, 4, 5));
    }

    #[test]
    fn test_parse_timestamp_padded_morning() {
        let ts = parse_timestamp("12/25/2019 09:30:00 AM").unwrap();
        assert_eq!((ts.month(), ts.day(), ts.hour()), (12, 25, 9));
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_serialized_field_names() {
        let mut obj = Object::new("Fan", "a/Fan".to_string(), "a".to_string());
        obj.object_type = "BinaryOut".to_string();
        let json = serde_json::to_value(&obj).unwrap();

        assert_eq!(json["Type"], "BinaryOut");
        assert_eq!(json["Path"], "a/Fan");
        assert_eq!(json["DeviceId"], "a");
        assert_eq!(json["Properties"]["Name"], "Fan");
    }
}
