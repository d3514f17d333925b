// clauses are written straight into the request document
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Value;

// used to print out readable forms of a construct
use std::fmt;
use std::str::FromStr;

use crate::error::EsBuilderError;

// ------------- Operator -------------
/// The operators understood by the three-argument filter form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Range(RangeKind),
    Like,
}

impl Operator {
    /// Returns `None` for anything outside the operator table.
    pub fn parse(operator: &str) -> Option<Operator> {
        match operator {
            "=" => Some(Operator::Eq),
            "!=" | "<>" => Some(Operator::Ne),
            ">" => Some(Operator::Range(RangeKind::Gt)),
            ">=" => Some(Operator::Range(RangeKind::Gte)),
            "<" => Some(Operator::Range(RangeKind::Lt)),
            "<=" => Some(Operator::Range(RangeKind::Lte)),
            like if like.eq_ignore_ascii_case("like") => Some(Operator::Like),
            _ => None,
        }
    }
}

// ------------- RangeKind -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeKind {
    Gt,
    Gte,
    Lt,
    Lte,
}

impl RangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeKind::Gt => "gt",
            RangeKind::Gte => "gte",
            RangeKind::Lt => "lt",
            RangeKind::Lte => "lte",
        }
    }
}

impl fmt::Display for RangeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ------------- Direction -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

impl FromStr for Direction {
    type Err = EsBuilderError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            _ => Err(EsBuilderError::InvalidDirection(s.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ------------- FieldValues -------------
/// Field names mapped to accepted (or rejected) values. Fields keep the order
/// in which they were first mentioned and values accumulate per field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldValues {
    entries: Vec<(String, Vec<Value>)>,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }
    /// Adds `values` to whatever the field already holds. An array counts as
    /// its elements, anything else as a single value.
    pub fn union(&mut self, field: &str, values: Value) {
        let values = match values {
            Value::Array(values) => values,
            single => vec![single],
        };
        match self.entries.iter_mut().find(|(name, _)| name == field) {
            Some((_, kept)) => kept.extend(values),
            None => self.entries.push((field.to_string(), values)),
        }
    }
    /// Replaces the values of `field`, keeping its position if already present.
    pub fn replace(&mut self, field: &str, values: Vec<Value>) {
        match self.entries.iter_mut().find(|(name, _)| name == field) {
            Some((_, kept)) => *kept = values,
            None => self.entries.push((field.to_string(), values)),
        }
    }
    pub fn remove(&mut self, field: &str) -> Option<Vec<Value>> {
        let position = self.entries.iter().position(|(name, _)| name == field)?;
        Some(self.entries.remove(position).1)
    }
    pub fn get(&self, field: &str) -> Option<&[Value]> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, values)| values.as_slice())
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.entries.iter().map(|(name, values)| (name.as_str(), values.as_slice()))
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ------------- Clause -------------
/// One predicate of the compiled query.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// A field whose value set ended up empty; goes on the wire as `[]`.
    Empty,
    Term { field: String, value: Value },
    Terms { field: String, values: Vec<Value> },
    Range { field: String, bounds: Vec<(RangeKind, String)> },
    Regexp { field: String, pattern: String },
}

impl Clause {
    /// Picks `term`, `terms` or nothing depending on how many distinct values remain.
    pub fn matching(field: &str, values: &[Value]) -> Clause {
        let mut distinct: Vec<Value> = Vec::with_capacity(values.len());
        for value in values {
            if !distinct.contains(value) {
                distinct.push(value.clone());
            }
        }
        match distinct.len() {
            0 => Clause::Empty,
            1 => Clause::Term {
                field: field.to_string(),
                value: distinct.remove(0),
            },
            _ => Clause::Terms {
                field: field.to_string(),
                values: distinct,
            },
        }
    }
    pub fn field(&self) -> Option<&str> {
        match self {
            Clause::Empty => None,
            Clause::Term { field, .. }
            | Clause::Terms { field, .. }
            | Clause::Range { field, .. }
            | Clause::Regexp { field, .. } => Some(field),
        }
    }
}

struct Bounds<'a>(&'a [(RangeKind, String)]);

impl Serialize for Bounds<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (kind, value) in self.0 {
            map.serialize_entry(kind.as_str(), value)?;
        }
        map.end()
    }
}

struct Single<'a, T: Serialize>(&'a str, T);

impl<T: Serialize> Serialize for Single<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.0, &self.1)?;
        map.end()
    }
}

impl Serialize for Clause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Clause::Empty => serializer.serialize_seq(Some(0))?.end(),
            Clause::Term { field, value } => {
                Single("term", Single(field, value)).serialize(serializer)
            }
            Clause::Terms { field, values } => {
                Single("terms", Single(field, values)).serialize(serializer)
            }
            Clause::Range { field, bounds } => {
                Single("range", Single(field, Bounds(bounds))).serialize(serializer)
            }
            Clause::Regexp { field, pattern } => {
                Single("regexp", Single(field, Single("value", pattern))).serialize(serializer)
            }
        }
    }
}

// ------------- SortClause -------------
/// Serialises as `{ field: "asc" | "desc" }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortClause {
    pub field: String,
    pub direction: Direction,
}

impl Serialize for SortClause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Single(&self.field, self.direction.as_str()).serialize(serializer)
    }
}

// ------------- RangeFilter / PatternFilter -------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeFilter {
    pub field: String,
    pub kind: RangeKind,
    /// Already normalised to ISO 8601.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternFilter {
    pub field: String,
    pub pattern: String,
}

impl PatternFilter {
    /// Turns a `like` style value into a regular expression: `%` becomes `.*`.
    pub fn from_like(field: &str, like: &str) -> Self {
        Self {
            field: field.to_string(),
            pattern: like.replace('%', ".*"),
        }
    }
}
