// used for timestamps in requests and rehydrated records
use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
// used to classify the many accepted textual forms of a moment
use regex::Regex;
// raw values as they arrive from the search engine
use serde_json::{Map, Value};
use lazy_static::lazy_static;
use tracing::warn;

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{EsBuilderError, Result};

lazy_static! {
    static ref DATE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    static ref NAIVE_DATETIME: Regex =
        Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}(:\d{2}(\.\d+)?)?$").unwrap();
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// The format used for every temporal value sent to the search engine,
/// e.g. `2024-01-02T03:04:05+00:00`.
pub const ISO_8601: &str = "%Y-%m-%dT%H:%M:%S%:z";

pub type Timestamp = DateTime<FixedOffset>;

fn utc(naive: NaiveDateTime) -> Timestamp {
    naive.and_utc().fixed_offset()
}

fn midnight(date: NaiveDate) -> Timestamp {
    utc(date.and_time(NaiveTime::MIN))
}

/// Parses a moment written in any of the accepted forms: RFC 3339, naive
/// date-times with `T` or a space, plain dates, RFC 2822 and the keywords
/// `now`, `today`, `yesterday` and `tomorrow`. Naive forms are taken as UTC.
pub fn parse_time(input: &str) -> Result<Timestamp> {
    let trimmed = input.trim();
    let today = Utc::now().date_naive();
    match trimmed.to_lowercase().as_str() {
        "now" => return Ok(Utc::now().fixed_offset()),
        "today" => return Ok(midnight(today)),
        "yesterday" => {
            return today
                .checked_sub_days(Days::new(1))
                .map(midnight)
                .ok_or_else(|| EsBuilderError::temporal(input));
        }
        "tomorrow" => {
            return today
                .checked_add_days(Days::new(1))
                .map(midnight)
                .ok_or_else(|| EsBuilderError::temporal(input));
        }
        _ => (),
    }
    if DATE.is_match(trimmed) {
        return NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(midnight)
            .map_err(|_| EsBuilderError::temporal(input));
    }
    if NAIVE_DATETIME.is_match(trimmed) {
        return NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
            .map(utc)
            .ok_or_else(|| EsBuilderError::temporal(input));
    }
    DateTime::parse_from_rfc3339(trimmed)
        .or_else(|_| DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%:z"))
        .or_else(|_| DateTime::parse_from_rfc2822(trimmed))
        .map_err(|_| EsBuilderError::temporal(input))
}

/// Integers count seconds since the Unix epoch, strings go through [`parse_time`].
pub fn parse_time_value(value: &Value) -> Result<Timestamp> {
    match value {
        Value::String(s) => parse_time(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|t| t.fixed_offset())
            .ok_or_else(|| EsBuilderError::temporal(n)),
        other => Err(EsBuilderError::temporal(other)),
    }
}

pub fn to_iso8601(time: &Timestamp) -> String {
    time.format(ISO_8601).to_string()
}

/// A single rehydrated field: temporal fields are parsed, the rest is kept
/// exactly as the engine returned it.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Value(Value),
    Time(Timestamp),
}

impl Attribute {
    pub fn as_time(&self) -> Option<&Timestamp> {
        match self {
            Attribute::Time(t) => Some(t),
            Attribute::Value(_) => None,
        }
    }
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Attribute::Value(v) => Some(v),
            Attribute::Time(_) => None,
        }
    }
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }
    pub fn as_i64(&self) -> Option<i64> {
        self.as_value().and_then(Value::as_i64)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Attribute::Value(Value::String(s)) => write!(f, "{}", s),
            Attribute::Value(v) => write!(f, "{}", v),
            Attribute::Time(t) => write!(f, "{}", to_iso8601(t)),
        }
    }
}

/// The field map a record is built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    fields: BTreeMap<String, Attribute>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }
    /// Converts a raw `_source` map, parsing the listed temporal fields.
    /// Missing or null temporal fields are left alone, as are non-string ones.
    pub fn from_source(source: Map<String, Value>, dates: &[&str]) -> Result<Self> {
        let mut fields = BTreeMap::new();
        for (name, value) in source {
            let temporal = dates.contains(&name.as_str());
            let attribute = match value {
                Value::String(s) if temporal => Attribute::Time(parse_time(&s)?),
                other => {
                    if temporal && !other.is_null() {
                        warn!(
                            field = %name,
                            value = %other,
                            "temporal field is not a string, kept as is"
                        );
                    }
                    Attribute::Value(other)
                }
            };
            fields.insert(name, attribute);
        }
        Ok(Self { fields })
    }
    pub fn insert(&mut self, name: impl Into<String>, attribute: Attribute) {
        self.fields.insert(name.into(), attribute);
    }
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.fields.get(name)
    }
    pub fn remove(&mut self, name: &str) -> Option<Attribute> {
        self.fields.remove(name)
    }
    pub fn time(&self, name: &str) -> Option<Timestamp> {
        self.get(name).and_then(Attribute::as_time).copied()
    }
    pub fn string(&self, name: &str) -> Option<String> {
        self.get(name).and_then(Attribute::as_str).map(str::to_owned)
    }
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Attribute::as_i64)
    }
    pub fn len(&self) -> usize {
        self.fields.len()
    }
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Attribute)> {
        self.fields.iter()
    }
}
