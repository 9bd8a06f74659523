//! Decoded values.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::record::Record;

/// The converter's output for a sub-tree.
///
/// Floats compare and hash by bit pattern so that any datum can key a
/// [`Datum::Map`].
#[derive(Debug, Clone)]
pub enum Datum {
    Null,
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    Array(Vec<Datum>),
    Map(HashMap<Datum, Datum>),
    Record(Record),
}

impl Datum {
    /// Returns a human-readable type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Datum::Null => "null",
            Datum::Boolean(_) => "boolean",
            Datum::Int(_) => "int32",
            Datum::Long(_) => "int64",
            Datum::Float(_) => "float32",
            Datum::Double(_) => "float64",
            Datum::String(_) => "string",
            Datum::Bytes(_) => "bytes",
            Datum::Array(_) => "array",
            Datum::Map(_) => "map",
            Datum::Record(_) => "record",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Datum::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer value of an `Int` or `Long`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Datum::Int(i) => Some(i64::from(*i)),
            Datum::Long(l) => Some(*l),
            _ => None,
        }
    }

    /// Floating value of a `Float` or `Double`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Datum::Float(x) => Some(f64::from(*x)),
            Datum::Double(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Datum::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Datum::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Datum]> {
        match self {
            Datum::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&HashMap<Datum, Datum>> {
        match self {
            Datum::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Datum::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Render as JSON. Bytes become base64 text; non-finite floats become
    /// null; map keys that are not strings use their compact JSON text.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Datum::Null => serde_json::Value::Null,
            Datum::Boolean(b) => serde_json::json!(b),
            Datum::Int(i) => serde_json::json!(i),
            Datum::Long(l) => serde_json::json!(l),
            Datum::Float(x) => float_to_json(f64::from(*x)),
            Datum::Double(x) => float_to_json(*x),
            Datum::String(s) => serde_json::Value::String(s.clone()),
            Datum::Bytes(b) => serde_json::Value::String(BASE64.encode(b)),
            Datum::Array(items) => {
                serde_json::Value::Array(items.iter().map(Datum::to_json).collect())
            }
            Datum::Map(map) => {
                let obj: serde_json::Map<String, serde_json::Value> = map
                    .iter()
                    .map(|(k, v)| {
                        let key = match k {
                            Datum::String(s) => s.clone(),
                            other => other.to_json().to_string(),
                        };
                        (key, v.to_json())
                    })
                    .collect();
                serde_json::Value::Object(obj)
            }
            Datum::Record(record) => record.to_json(),
        }
    }
}

fn float_to_json(x: f64) -> serde_json::Value {
    serde_json::Number::from_f64(x)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

impl PartialEq for Datum {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Datum::Null, Datum::Null) => true,
            (Datum::Boolean(a), Datum::Boolean(b)) => a == b,
            (Datum::Int(a), Datum::Int(b)) => a == b,
            (Datum::Long(a), Datum::Long(b)) => a == b,
            (Datum::Float(a), Datum::Float(b)) => a.to_bits() == b.to_bits(),
            (Datum::Double(a), Datum::Double(b)) => a.to_bits() == b.to_bits(),
            (Datum::String(a), Datum::String(b)) => a == b,
            (Datum::Bytes(a), Datum::Bytes(b)) => a == b,
            (Datum::Array(a), Datum::Array(b)) => a == b,
            (Datum::Map(a), Datum::Map(b)) => a == b,
            (Datum::Record(a), Datum::Record(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Datum {}

impl Hash for Datum {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Datum::Null => {}
            Datum::Boolean(b) => b.hash(state),
            Datum::Int(i) => i.hash(state),
            Datum::Long(l) => l.hash(state),
            Datum::Float(x) => x.to_bits().hash(state),
            Datum::Double(x) => x.to_bits().hash(state),
            Datum::String(s) => s.hash(state),
            Datum::Bytes(b) => b.hash(state),
            Datum::Array(items) => items.hash(state),
            // Entry order is unspecified; the length is order independent.
            Datum::Map(map) => map.len().hash(state),
            Datum::Record(record) => record.hash(state),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Datum {
                fn from(v: $ty) -> Self {
                    Datum::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
    bool => Boolean,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    Vec<u8> => Bytes,
    Vec<Datum> => Array,
    Record => Record,
}

impl From<&str> for Datum {
    fn from(v: &str) -> Self {
        Datum::String(v.to_string())
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_float_keys_compare_by_bits() {
        assert_eq!(Datum::Double(f64::NAN), Datum::Double(f64::NAN));
        assert_ne!(Datum::Double(0.0), Datum::Double(-0.0));
        assert_ne!(Datum::Int(1), Datum::Long(1));

        let mut map = HashMap::new();
        map.insert(Datum::Double(1.5), Datum::from("a"));
        map.insert(Datum::Double(1.5), Datum::from("b"));
        assert_eq!(map.len(), 1);
        assert_eq!(map[&Datum::Double(1.5)], Datum::from("b"));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Datum::Int(4).as_i64(), Some(4));
        assert_eq!(Datum::Float(0.5).as_f64(), Some(0.5));
        assert_eq!(Datum::from("x").as_str(), Some("x"));
        assert_eq!(Datum::Bytes(vec![9]).as_bytes(), Some(&[9u8][..]));
        assert!(Datum::Null.is_null());
        assert_eq!(Datum::Long(1).as_str(), None);
        assert_eq!(Datum::Boolean(true).type_name(), "boolean");
    }

    #[test]
    fn test_to_json() {
        let mut map = HashMap::new();
        map.insert(Datum::Int(7), Datum::Bytes(vec![0xff]));
        let value = Datum::Array(vec![
            Datum::Null,
            Datum::Long(-3),
            Datum::Double(2.25),
            Datum::Double(f64::INFINITY),
            Datum::Map(map),
        ]);
        assert_eq!(value.to_json(), json!([null, -3, 2.25, null, {"7": "/w=="}]));
    }
}
