//! Typed records produced by the dump parser

mod alarm;
mod dictionary;
mod object;
mod summary;

pub use alarm::{parse_alarm_links, AlarmLink};
pub use dictionary::{Dictionary, Table};
pub use object::{parse_timestamp, Object, TIMESTAMP_FORMAT};
pub use summary::ParseSummary;
