use base64::Engine;
use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

/// A value as the ledger backend hands it to us.
///
/// Backend messages carry 64-bit integers and raw byte buffers that have no
/// lossless JSON rendering, so adapters assemble their results in this shape
/// and [`normalize`] projects it onto JSON at the very end.
#[derive(Debug, Clone, PartialEq)]
pub enum Native {
    /// Explicit null
    Null,
    /// Boolean value
    Bool(bool),
    /// JSON-safe number (counts, small enums, decoded passthrough numbers)
    Number(Number),
    /// UTF-8 string
    String(String),
    /// Unsigned 64-bit backend integer
    U64(u64),
    /// Signed 64-bit backend integer
    I64(i64),
    /// Raw byte buffer
    Bytes(Vec<u8>),
    /// Ordered list
    List(Vec<Native>),
    /// Record with insertion-ordered keys
    Record(IndexMap<String, Native>),
}

impl Native {
    /// Render a byte buffer as a standard base64 string instead of the
    /// default byte-array projection.
    pub fn base64(bytes: &[u8]) -> Native {
        Native::String(base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    /// A JSON number for small counts that should not be stringified.
    pub fn count(n: usize) -> Native {
        Native::Number(Number::from(n))
    }

    pub fn list<I, T>(items: I) -> Native
    where
        I: IntoIterator<Item = T>,
        T: Into<Native>,
    {
        Native::List(items.into_iter().map(Into::into).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Native::Null)
    }

    /// Look up a key on a record value.
    pub fn get(&self, key: &str) -> Option<&Native> {
        match self {
            Native::Record(fields) => fields.get(key),
            _ => None,
        }
    }
}

impl From<bool> for Native {
    fn from(value: bool) -> Self {
        Native::Bool(value)
    }
}

impl From<u64> for Native {
    fn from(value: u64) -> Self {
        Native::U64(value)
    }
}

impl From<i64> for Native {
    fn from(value: i64) -> Self {
        Native::I64(value)
    }
}

impl From<String> for Native {
    fn from(value: String) -> Self {
        Native::String(value)
    }
}

impl From<&str> for Native {
    fn from(value: &str) -> Self {
        Native::String(value.to_string())
    }
}

impl<T: Into<Native>> From<Option<T>> for Native {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Native::Null)
    }
}

impl From<Record> for Native {
    fn from(record: Record) -> Self {
        Native::Record(record.0)
    }
}

/// Passthrough values decoded from the backend's JSON transport.
impl From<Value> for Native {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Native::Null,
            Value::Bool(b) => Native::Bool(b),
            Value::Number(n) => Native::Number(n),
            Value::String(s) => Native::String(s),
            Value::Array(items) => Native::List(items.into_iter().map(Native::from).collect()),
            Value::Object(fields) => Native::Record(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, Native::from(value)))
                    .collect(),
            ),
        }
    }
}

impl<'de> serde::Deserialize<'de> for Native {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Native::from)
    }
}

/// Builder for legacy-shaped records.
///
/// `field_opt` skips `None` entirely, which is how the legacy API renders
/// fields the backend did not return (absent rather than `null`).
#[derive(Debug, Clone, Default)]
pub struct Record(IndexMap<String, Native>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: &str, value: impl Into<Native>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn field_opt<T: Into<Native>>(mut self, key: &str, value: Option<T>) -> Self {
        if let Some(value) = value {
            self.0.insert(key.to_string(), value.into());
        }
        self
    }

    /// Copy every entry of a record value into this one. Non-record values
    /// are ignored.
    pub fn extend_from(mut self, other: Native) -> Self {
        if let Native::Record(fields) = other {
            self.0.extend(fields);
        }
        self
    }
}

/// Project a backend value onto JSON.
///
/// 64-bit integers become decimal strings, byte buffers become arrays of
/// byte values, everything else keeps its shape. Total over every `Native`.
pub fn normalize(value: Native) -> Value {
    match value {
        Native::Null => Value::Null,
        Native::Bool(b) => Value::Bool(b),
        Native::Number(n) => Value::Number(n),
        Native::String(s) => Value::String(s),
        Native::U64(n) => Value::String(n.to_string()),
        Native::I64(n) => Value::String(n.to_string()),
        Native::Bytes(bytes) => Value::Array(
            bytes
                .into_iter()
                .map(|b| Value::Number(Number::from(b)))
                .collect(),
        ),
        Native::List(items) => Value::Array(items.into_iter().map(normalize).collect()),
        Native::Record(fields) => {
            let mut map = Map::with_capacity(fields.len());
            for (key, value) in fields {
                map.insert(key, normalize(value));
            }
            Value::Object(map)
        }
    }
}
