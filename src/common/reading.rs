// src/common/reading.rs

//! Decoding of the sensor's JSON lines into [`Reading`]s.
//!
//! A line looks like
//! `{"ID":"dryCheck_1","cap":22,"freq":10000,"temp":25,"RH":33}`. The field
//! set is defined by the device firmware, so it is kept as an ordered map
//! rather than a fixed struct.

use core::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use tracing::{error, warn};

/// Field injected into every populated reading: the frequency that was asked
/// for, as opposed to `freq`, the one the device reports having used.
pub const ASKED_FREQUENCY_FIELD: &str = "asked_frequency";

/// Line the drainer hands over when the device sent nothing.
pub const EMPTY_FRAME: &str = "{}";

/// One line of text as received from the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame(String);

impl RawFrame {
    pub fn new(line: impl Into<String>) -> Self {
        RawFrame(line.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the frame returned when no line was read.
    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.0 == EMPTY_FRAME
    }
}

impl Default for RawFrame {
    fn default() -> Self {
        RawFrame(EMPTY_FRAME.to_owned())
    }
}

impl fmt::Display for RawFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.trim_end())
    }
}

/// Why a frame could not be turned into a populated reading.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The frame is not valid JSON.
    #[error("malformed JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    /// The frame is valid JSON but not an object.
    #[error("frame is not a JSON object")]
    NotAnObject,

    /// The frame is an object without any field.
    #[error("frame carries no fields")]
    NoFields,
}

/// Decoded measurement returned to the caller.
///
/// `Empty` is the "no result" value every failure degrades to; it is not an
/// error. A `Populated` reading always contains [`ASKED_FREQUENCY_FIELD`]:
/// its [`Fields`] can only be built through [`Reading::from_fields`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Reading {
    #[default]
    Empty,
    Populated(Fields),
}

/// Field map of a populated reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Fields(Map<String, Value>);

impl Fields {
    #[inline]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl Reading {
    /// Builds a populated reading, inserting or overwriting
    /// [`ASKED_FREQUENCY_FIELD`] with `requested_frequency`.
    pub fn from_fields(mut fields: Map<String, Value>, requested_frequency: u32) -> Self {
        fields.insert(
            ASKED_FREQUENCY_FIELD.to_owned(),
            Value::from(requested_frequency),
        );
        Reading::Populated(Fields(fields))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Reading::Empty)
    }

    /// Number of fields, `asked_frequency` included.
    pub fn len(&self) -> usize {
        match self {
            Reading::Empty => 0,
            Reading::Populated(fields) => fields.0.len(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        match self {
            Reading::Empty => None,
            Reading::Populated(fields) => fields.0.get(field),
        }
    }

    /// Frequency this reading was requested at.
    pub fn asked_frequency(&self) -> Option<u32> {
        self.get(ASKED_FREQUENCY_FIELD)
            .and_then(Value::as_u64)
            .and_then(|f| u32::try_from(f).ok())
    }

    /// Fields in the order the device sent them.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        let fields = match self {
            Reading::Empty => None,
            Reading::Populated(fields) => Some(fields.0.iter()),
        };
        fields
            .into_iter()
            .flatten()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn into_map(self) -> Map<String, Value> {
        match self {
            Reading::Empty => Map::new(),
            Reading::Populated(fields) => fields.0,
        }
    }
}

impl Serialize for Reading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.fields() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(fmt::Error),
        }
    }
}

/// Parses a frame as a non-empty JSON object.
pub fn parse_frame(frame: &str) -> Result<Map<String, Value>, DecodeError> {
    match serde_json::from_str::<Value>(frame)? {
        Value::Object(fields) if fields.is_empty() => Err(DecodeError::NoFields),
        Value::Object(fields) => Ok(fields),
        _ => Err(DecodeError::NotAnObject),
    }
}

/// Turns the freshest frame into a reading annotated with the requested
/// frequency. Never fails: anything unusable becomes [`Reading::Empty`] and is
/// logged together with the raw frame.
pub fn decode(frame: &str, requested_frequency: u32) -> Reading {
    match parse_frame(frame) {
        Ok(fields) => Reading::from_fields(fields, requested_frequency),
        Err(DecodeError::NoFields) => {
            warn!(frame = %frame.trim_end(), "no sensor data in frame");
            Reading::Empty
        }
        Err(e) => {
            error!(frame = %frame.trim_end(), error = %e, "could not decode frame");
            Reading::Empty
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_capture;
    use tracing::Level;

    const SAMPLE: &str = r#"{"ID":"dryCheck_1","cap":22,"freq":10000,"temp":25,"RH":33}"#;

    #[test]
    fn test_decode_injects_asked_frequency() {
        let reading = decode(SAMPLE, 10_000);
        assert!(!reading.is_empty());
        assert_eq!(reading.len(), 6);
        assert_eq!(reading.get("ID"), Some(&Value::from("dryCheck_1")));
        assert_eq!(reading.get("cap"), Some(&Value::from(22)));
        assert_eq!(reading.asked_frequency(), Some(10_000));
    }

    #[test]
    fn test_decode_keeps_device_field_order() {
        let reading = decode(SAMPLE, 500);
        let names: Vec<&str> = reading.fields().map(|(name, _)| name).collect();
        assert_eq!(names, ["ID", "cap", "freq", "temp", "RH", "asked_frequency"]);
    }

    #[test]
    fn test_decode_overwrites_device_asked_frequency() {
        let reading = decode(r#"{"cap":1,"asked_frequency":5}"#, 42);
        assert_eq!(reading.asked_frequency(), Some(42));
        assert_eq!(reading.len(), 2);
    }

    #[test]
    fn test_decode_tolerates_line_terminator() {
        let reading = decode("{\"cap\":7}\r\n", 100);
        assert_eq!(reading.get("cap"), Some(&Value::from(7)));
    }

    #[test]
    fn test_decode_sentinel_is_empty() {
        assert_eq!(decode(EMPTY_FRAME, 10_000), Reading::Empty);
        assert_eq!(decode(RawFrame::default().as_str(), 10_000), Reading::Empty);
    }

    #[test]
    fn test_decode_malformed_is_empty() {
        assert_eq!(decode("not json", 10_000), Reading::Empty);
        assert_eq!(decode("", 10_000), Reading::Empty);
        assert_eq!(decode(r#"{"cap":2"#, 10_000), Reading::Empty);
        assert_eq!(decode("42", 10_000), Reading::Empty);
        assert_eq!(decode("[1,2]", 10_000), Reading::Empty);
    }

    #[test]
    fn test_decode_failure_logs_frame() {
        let (reading, log) = log_capture::capture(|| decode("not json\n", 10_000));

        assert_eq!(reading, Reading::Empty);
        let failures = log.with_message("could not decode frame");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].level, Level::ERROR);
        assert_eq!(failures[0].field("frame"), Some("not json"));
        assert!(failures[0].field("error").is_some());
    }

    #[test]
    fn test_decode_empty_object_warns() {
        let (reading, log) = log_capture::capture(|| decode(EMPTY_FRAME, 10_000));

        assert_eq!(reading, Reading::Empty);
        let warnings = log.with_message("no sensor data in frame");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, Level::WARN);
        assert!(log.with_message("could not decode frame").is_empty());
    }

    #[test]
    fn test_parse_frame_errors() {
        assert!(matches!(parse_frame("{}"), Err(DecodeError::NoFields)));
        assert!(matches!(parse_frame("true"), Err(DecodeError::NotAnObject)));
        assert!(matches!(parse_frame("{oops}"), Err(DecodeError::Syntax(_))));
    }

    #[test]
    fn test_from_fields_always_carries_asked_frequency() {
        let reading = Reading::from_fields(Map::new(), 250);
        assert!(!reading.is_empty());
        assert_eq!(reading.asked_frequency(), Some(250));

        let mut fields = Map::new();
        fields.insert("cap".to_owned(), Value::from(4));
        fields.insert(ASKED_FREQUENCY_FIELD.to_owned(), Value::from("bogus"));
        let reading = Reading::from_fields(fields, 9);
        assert_eq!(reading.asked_frequency(), Some(9));
        match &reading {
            Reading::Populated(fields) => assert_eq!(fields.as_map().len(), 2),
            Reading::Empty => panic!("expected a populated reading"),
        }
    }

    #[test]
    fn test_reading_display() {
        assert_eq!(Reading::Empty.to_string(), "{}");
        assert_eq!(decode(r#"{"cap":3}"#, 7).to_string(), r#"{"cap":3,"asked_frequency":7}"#);
    }

    #[test]
    fn test_empty_reading_has_no_fields() {
        let reading = Reading::default();
        assert_eq!(reading.fields().count(), 0);
        assert_eq!(reading.asked_frequency(), None);
        assert!(reading.into_map().is_empty());
    }

    #[test]
    fn test_raw_frame_sentinel() {
        assert!(RawFrame::default().is_sentinel());
        assert!(!RawFrame::new("{\"cap\":1}\n").is_sentinel());
        assert_eq!(RawFrame::new("{\"cap\":1}\r\n").to_string(), "{\"cap\":1}");
    }
}
