use crate::{
    duration::Duration,
    pem::{PemEntry, PemValue},
    Symbol,
};
use rust_decimal::Decimal;
use std::{fmt, str::FromStr};

/// The result of a conversion.
///
/// Which variant is produced depends on the requested type, see the table in the crate docs.
/// `Map` is never produced by a built-in conversion, but may be used in option defaults and by
/// injected json engines or code evaluators.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum Value {
    /// No value
    Nil,
    /// A boolean
    Boolean(bool),
    /// An integer
    Integer(i64),
    /// A float
    Float(f64),
    /// An exact decimal
    Decimal(Decimal),
    /// A utf8 string
    String(String),
    /// Decoded bytes
    Binary(Vec<u8>),
    /// A list of characters
    Charlist(Vec<char>),
    /// An atom
    Atom(Symbol),
    /// A module name
    Module(Symbol),
    /// A log level
    LogLevel(LogLevel),
    /// A json document
    Json(serde_json::Value),
    /// Decoded PEM entries
    Pem(PemValue),
    /// A timeout
    Timeout(Timeout),
    /// A duration, as written
    Duration(Duration),
    /// A list of values
    List(Vec<Value>),
    /// An association list
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// An atom with this name. This does not intern anything.
    pub fn atom(name: impl AsRef<str>) -> Self {
        Self::Atom(Symbol::new(name))
    }

    /// A module with this name. The `Elixir.` prefix is added if it is missing.
    pub fn module(name: impl AsRef<str>) -> Self {
        Self::Module(Symbol::new(module_name(name.as_ref())))
    }

    /// A list of values
    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// True if this is `Nil`
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Convert to a json document, if this value has a json representation.
    ///
    /// Nil, booleans, numbers, strings, lists, and maps whose keys are all strings have one,
    /// recursively. Json documents are returned as they are. Anything else does not.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        use serde_json::Value as Json;
        Some(match self {
            Self::Nil => Json::Null,
            Self::Boolean(b) => Json::Bool(*b),
            Self::Integer(i) => Json::from(*i),
            Self::Float(f) => Json::Number(serde_json::Number::from_f64(*f)?),
            Self::String(s) => Json::String(s.clone()),
            Self::Json(json) => json.clone(),
            Self::List(items) => Json::Array(
                items
                    .iter()
                    .map(Value::to_json)
                    .collect::<Option<Vec<_>>>()?,
            ),
            Self::Map(entries) => Json::Object(
                entries
                    .iter()
                    .map(|(k, v)| match k {
                        Self::String(k) => Some((k.clone(), v.to_json()?)),
                        _ => None,
                    })
                    .collect::<Option<serde_json::Map<_, _>>>()?,
            ),
            _ => return None,
        })
    }

    /// The integer, if this is one
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// The boolean, if this is one
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The string, if this is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The list items, if this is a list
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

// Module names are namespaced the way the Elixir compiler namespaces them
pub(crate) fn module_name(name: &str) -> String {
    if name.starts_with("Elixir.") {
        name.to_owned()
    } else {
        format!("Elixir.{name}")
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Boolean(src)
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Self {
        Self::Integer(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Self {
        Self::Integer(src.into())
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Self {
        Self::Float(src)
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_owned())
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<Decimal> for Value {
    fn from(src: Decimal) -> Self {
        Self::Decimal(src)
    }
}

impl From<LogLevel> for Value {
    fn from(src: LogLevel) -> Self {
        Self::LogLevel(src)
    }
}

impl From<Timeout> for Value {
    fn from(src: Timeout) -> Self {
        Self::Timeout(src)
    }
}

impl From<Duration> for Value {
    fn from(src: Duration) -> Self {
        Self::Duration(src)
    }
}

impl From<serde_json::Value> for Value {
    fn from(src: serde_json::Value) -> Self {
        Self::Json(src)
    }
}

impl From<PemEntry> for Value {
    fn from(src: PemEntry) -> Self {
        Self::Pem(PemValue::Entry(src))
    }
}

impl From<Vec<Value>> for Value {
    fn from(src: Vec<Value>) -> Self {
        Self::List(src)
    }
}

/// A log level, ordered from most to least severe
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "snake_case"))]
pub enum LogLevel {
    /// System is unusable
    Emergency,
    /// Action must be taken immediately
    Alert,
    /// Critical conditions
    Critical,
    /// Error conditions
    Error,
    /// Warning conditions
    Warning,
    /// Normal but significant conditions
    Notice,
    /// Informational messages
    Info,
    /// Debug-level messages
    Debug,
}

impl LogLevel {
    /// All levels, most severe first
    pub const ALL: [LogLevel; 8] = [
        Self::Emergency,
        Self::Alert,
        Self::Critical,
        Self::Error,
        Self::Warning,
        Self::Notice,
        Self::Info,
        Self::Debug,
    ];

    /// Name of the level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Emergency => "emergency",
            Self::Alert => "alert",
            Self::Critical => "critical",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Notice => "notice",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no log level
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown log level")]
pub struct UnknownLogLevel;

/// Case-insensitive. `warn` is accepted as a spelling of `warning`.
impl FromStr for LogLevel {
    type Err = UnknownLogLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("warn") {
            return Ok(Self::Warning);
        }
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or(UnknownLogLevel)
    }
}

/// A timeout, in milliseconds or unbounded
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "snake_case"))]
pub enum Timeout {
    /// Never time out
    Infinity,
    /// Time out after this many milliseconds
    Millis(u64),
}

impl Timeout {
    /// Convert to a `std::time::Duration`, or `None` for `Infinity`
    pub fn to_std(&self) -> Option<std::time::Duration> {
        match self {
            Self::Infinity => None,
            Self::Millis(ms) => Some(std::time::Duration::from_millis(*ms)),
        }
    }
}

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Infinity => f.write_str("infinity"),
            Self::Millis(ms) => write!(f, "{ms}"),
        }
    }
}
