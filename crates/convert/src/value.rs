//! Source values fed to the converter.
//!
//! [`SourceValue`] is a closed set of the shapes an untyped producer can
//! hand over. JSON trees are wrapped whole in [`SourceValue::Json`] and
//! walked in place; the decoder never copies them into native variants.

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rust_decimal::Decimal;
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime, Time};

// ──────────────────────────────────────────────
// Source values
// ──────────────────────────────────────────────

/// A loosely typed input value.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceValue {
    Null,
    Bool(bool),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    /// Arbitrary precision decimal.
    Decimal(Decimal),
    Text(String),
    Bytes(Vec<u8>),
    Date(Date),
    /// Time of day, no date or zone.
    Time(Time),
    Timestamp(OffsetDateTime),
    Sequence(Vec<SourceValue>),
    /// Keyed collection. Keys may be any value and may repeat; lookups
    /// by name see the last matching entry.
    Mapping(Vec<(SourceValue, SourceValue)>),
    /// Self-describing tree from the interchange format.
    Json(serde_json::Value),
}

impl SourceValue {
    /// Build a mapping from string keys.
    pub fn mapping<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, SourceValue)>,
    {
        SourceValue::Mapping(
            pairs
                .into_iter()
                .map(|(k, v)| (SourceValue::Text(k.into()), v))
                .collect(),
        )
    }

    /// Returns a human-readable type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            SourceValue::Null => "null",
            SourceValue::Bool(_) => "boolean",
            SourceValue::Int16(_) => "int16",
            SourceValue::Int32(_) => "int32",
            SourceValue::Int64(_) => "int64",
            SourceValue::Float32(_) => "float32",
            SourceValue::Float64(_) => "float64",
            SourceValue::Decimal(_) => "decimal",
            SourceValue::Text(_) => "text",
            SourceValue::Bytes(_) => "bytes",
            SourceValue::Date(_) => "date",
            SourceValue::Time(_) => "time",
            SourceValue::Timestamp(_) => "timestamp",
            SourceValue::Sequence(_) => "sequence",
            SourceValue::Mapping(_) => "mapping",
            SourceValue::Json(json) => json_type_name(json),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SourceValue::Null | SourceValue::Json(serde_json::Value::Null))
    }

    /// True when the value is text equal to `name`; used for keyed lookups.
    fn is_key(&self, name: &str) -> bool {
        match self {
            SourceValue::Text(s) => s == name,
            SourceValue::Json(serde_json::Value::String(s)) => s == name,
            _ => false,
        }
    }
}

/// Return a descriptive type name for a JSON value (for error messages).
pub(crate) fn json_type_name(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "json null",
        serde_json::Value::Bool(_) => "json boolean",
        serde_json::Value::Number(_) => "json number",
        serde_json::Value::String(_) => "json string",
        serde_json::Value::Array(_) => "json array",
        serde_json::Value::Object(_) => "json object",
    }
}

/// Textual form used when a value is coerced to `string`.
impl fmt::Display for SourceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceValue::Null => f.write_str("null"),
            SourceValue::Bool(b) => write!(f, "{}", b),
            SourceValue::Int16(i) => write!(f, "{}", i),
            SourceValue::Int32(i) => write!(f, "{}", i),
            SourceValue::Int64(i) => write!(f, "{}", i),
            // Debug keeps the trailing ".0" on integral floats.
            SourceValue::Float32(x) => write!(f, "{:?}", x),
            SourceValue::Float64(x) => write!(f, "{:?}", x),
            SourceValue::Decimal(d) => write!(f, "{}", d),
            SourceValue::Text(s) => f.write_str(s),
            SourceValue::Bytes(b) => f.write_str(&BASE64.encode(b)),
            SourceValue::Date(d) => write!(f, "{}", d),
            SourceValue::Time(t) => write_time(f, *t),
            SourceValue::Timestamp(ts) => match ts.format(&Rfc3339) {
                Ok(s) => f.write_str(&s),
                Err(_) => write!(f, "{}", ts),
            },
            SourceValue::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            SourceValue::Mapping(pairs) => {
                f.write_str("{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}={}", k, v)?;
                }
                f.write_str("}")
            }
            SourceValue::Json(serde_json::Value::String(s)) => f.write_str(s),
            SourceValue::Json(json) => write!(f, "{}", json),
        }
    }
}

fn write_time(f: &mut fmt::Formatter<'_>, t: Time) -> fmt::Result {
    write!(f, "{:02}:{:02}:{:02}", t.hour(), t.minute(), t.second())?;
    let nanos = t.nanosecond();
    if nanos != 0 {
        let frac = format!("{:09}", nanos);
        write!(f, ".{}", frac.trim_end_matches('0'))?;
    }
    Ok(())
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for SourceValue {
                fn from(v: $ty) -> Self {
                    SourceValue::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
    Decimal => Decimal,
    String => Text,
    Vec<u8> => Bytes,
    Date => Date,
    Time => Time,
    OffsetDateTime => Timestamp,
    Vec<SourceValue> => Sequence,
    serde_json::Value => Json,
}

impl From<&str> for SourceValue {
    fn from(v: &str) -> Self {
        SourceValue::Text(v.to_string())
    }
}

impl<T: Into<SourceValue>> From<Option<T>> for SourceValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SourceValue::Null)
    }
}

// ──────────────────────────────────────────────
// Borrowed view used by the decoder
// ──────────────────────────────────────────────

/// A position in the value tree being decoded.
///
/// Native values and JSON nodes are walked without copying. `Key` is a
/// JSON object key; it behaves as native text.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Node<'a> {
    Absent,
    Native(&'a SourceValue),
    Json(&'a serde_json::Value),
    Key(&'a str),
}

impl<'a> Node<'a> {
    pub(crate) fn of(value: &'a SourceValue) -> Self {
        match value {
            SourceValue::Json(json) => Node::Json(json),
            other => Node::Native(other),
        }
    }

    pub(crate) fn is_null(&self) -> bool {
        match self {
            Node::Absent => true,
            Node::Native(v) => v.is_null(),
            Node::Json(j) => j.is_null(),
            Node::Key(_) => false,
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Node::Absent => "absent",
            Node::Native(v) => v.type_name(),
            Node::Json(j) => json_type_name(j),
            Node::Key(_) => "text",
        }
    }

    /// Elements of an ordered sequence, in order.
    pub(crate) fn elements(&self) -> Option<Vec<Node<'a>>> {
        match *self {
            Node::Native(SourceValue::Sequence(items)) => Some(items.iter().map(Node::of).collect()),
            Node::Json(serde_json::Value::Array(items)) => Some(items.iter().map(Node::Json).collect()),
            _ => None,
        }
    }

    /// Key/value pairs of a keyed collection, in source order.
    pub(crate) fn entries(&self) -> Option<Vec<(Node<'a>, Node<'a>)>> {
        match *self {
            Node::Native(SourceValue::Mapping(pairs)) => {
                Some(pairs.iter().map(|(k, v)| (Node::of(k), Node::of(v))).collect())
            }
            Node::Json(serde_json::Value::Object(obj)) => Some(
                obj.iter()
                    .map(|(k, v)| (Node::Key(k.as_str()), Node::Json(v)))
                    .collect(),
            ),
            _ => None,
        }
    }

    pub(crate) fn is_keyed(&self) -> bool {
        matches!(
            self,
            Node::Native(SourceValue::Mapping(_)) | Node::Json(serde_json::Value::Object(_))
        )
    }

    /// Value stored under `name`, or `Absent` when there is none.
    pub(crate) fn lookup(&self, name: &str) -> Node<'a> {
        match *self {
            Node::Native(SourceValue::Mapping(pairs)) => pairs
                .iter()
                .rev()
                .find(|(k, _)| k.is_key(name))
                .map(|(_, v)| Node::of(v))
                .unwrap_or(Node::Absent),
            Node::Json(serde_json::Value::Object(obj)) => {
                obj.get(name).map(Node::Json).unwrap_or(Node::Absent)
            }
            _ => Node::Absent,
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;
    use time::macros::{date, datetime, time};

    #[test]
    fn test_display_scalars() {
        assert_eq!(SourceValue::Bool(true).to_string(), "true");
        assert_eq!(SourceValue::Int16(-7).to_string(), "-7");
        assert_eq!(SourceValue::Float64(1.0).to_string(), "1.0");
        assert_eq!(SourceValue::Float32(2.5).to_string(), "2.5");
        assert_eq!(
            SourceValue::Decimal(Decimal::from_str("12.340").unwrap()).to_string(),
            "12.340"
        );
        assert_eq!(SourceValue::Bytes(vec![1, 2, 3]).to_string(), "AQID");
    }

    #[test]
    fn test_display_temporal() {
        assert_eq!(SourceValue::Date(date!(2024 - 01 - 15)).to_string(), "2024-01-15");
        assert_eq!(SourceValue::Time(time!(09:05:03)).to_string(), "09:05:03");
        assert_eq!(SourceValue::Time(time!(09:05:03.25)).to_string(), "09:05:03.25");
        assert_eq!(
            SourceValue::Timestamp(datetime!(2024-01-15 10:30:00 UTC)).to_string(),
            "2024-01-15T10:30:00Z"
        );
    }

    #[test]
    fn test_display_containers() {
        let seq = SourceValue::Sequence(vec![1i32.into(), "a".into()]);
        assert_eq!(seq.to_string(), "[1, a]");
        let map = SourceValue::mapping([("k", SourceValue::Int64(1)), ("j", SourceValue::Null)]);
        assert_eq!(map.to_string(), "{k=1, j=null}");
        assert_eq!(SourceValue::Json(json!("raw")).to_string(), "raw");
        assert_eq!(SourceValue::Json(json!({"a": [1, 2]})).to_string(), r#"{"a":[1,2]}"#);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(SourceValue::from(None::<i32>), SourceValue::Null);
        assert_eq!(SourceValue::from(Some(3i64)), SourceValue::Int64(3));
    }

    #[test]
    fn test_node_lookup_last_key_wins() {
        let value = SourceValue::Mapping(vec![
            ("x".into(), SourceValue::Int32(1)),
            ("y".into(), SourceValue::Int32(2)),
            ("x".into(), SourceValue::Int32(3)),
        ]);
        let node = Node::of(&value);
        assert!(node.is_keyed());
        match node.lookup("x") {
            Node::Native(SourceValue::Int32(3)) => {}
            other => panic!("expected Int32(3), got {:?}", other),
        }
        assert!(matches!(node.lookup("z"), Node::Absent));
    }

    #[test]
    fn test_node_walks_json_in_place() {
        let value = SourceValue::Json(json!({"items": [1, "two", null]}));
        let node = Node::of(&value);
        assert!(node.is_keyed());
        let items = node.lookup("items").elements().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[1].type_name(), "json string");
        assert!(items[2].is_null());
        let entries = node.entries().unwrap();
        assert!(matches!(entries[0].0, Node::Key("items")));
    }

    #[test]
    fn test_non_containers_have_no_children() {
        let value = SourceValue::Text("abc".into());
        let node = Node::of(&value);
        assert!(node.elements().is_none());
        assert!(node.entries().is_none());
        assert!(!node.is_keyed());
        assert!(matches!(node.lookup("a"), Node::Absent));
    }
}
