//! Primitive coercion: the leaf step of every conversion.
//!
//! Null and absent values pass through as null for every target type.
//! JSON primitives are self-describing and, by default, are taken as they
//! are. Everything else is coerced according to the declared type.

use recast_schema::SchemaType;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value as Json;
use time::{Date, OffsetDateTime, Time};

use crate::config::JsonPrimitivePolicy;
use crate::datum::Datum;
use crate::encode;
use crate::error::ConvertError;
use crate::value::{json_type_name, Node, SourceValue};

/// Coerce `value` to the primitive `target` type.
///
/// JSON primitives are taken as they are; see
/// [`JsonPrimitivePolicy::Passthrough`].
pub fn coerce(field: &str, value: &SourceValue, target: SchemaType) -> Result<Datum, ConvertError> {
    coerce_node(field, Node::of(value), target, JsonPrimitivePolicy::Passthrough)
}

pub(crate) fn coerce_node(
    field: &str,
    node: Node<'_>,
    target: SchemaType,
    policy: JsonPrimitivePolicy,
) -> Result<Datum, ConvertError> {
    let owned;
    let value = match node {
        Node::Absent => return Ok(Datum::Null),
        Node::Native(v) => v,
        Node::Key(k) => {
            owned = SourceValue::Text(k.to_string());
            &owned
        }
        Node::Json(json) => match json {
            Json::Null => return Ok(Datum::Null),
            Json::Bool(_) | Json::Number(_) | Json::String(_) => match policy {
                JsonPrimitivePolicy::Passthrough => return Ok(json_primitive(json)),
                JsonPrimitivePolicy::Coerce => {
                    owned = native_scalar(field, json, target)?;
                    &owned
                }
            },
            Json::Array(_) | Json::Object(_) => return coerce_json_container(field, json, target),
        },
    };
    coerce_value(field, value, target)
}

/// Extract a JSON primitive without looking at the declared type.
fn json_primitive(json: &Json) -> Datum {
    match json {
        Json::Bool(b) => Datum::Boolean(*b),
        Json::Number(n) => normalize_number(n),
        Json::String(s) => Datum::String(s.clone()),
        _ => Datum::Null,
    }
}

/// Integers that fit i64 stay integral, larger unsigned values wrap to
/// i64, everything else is a double.
fn normalize_number(n: &serde_json::Number) -> Datum {
    if let Some(i) = n.as_i64() {
        Datum::Long(i)
    } else if let Some(u) = n.as_u64() {
        Datum::Long(u as i64)
    } else {
        n.as_f64().map(Datum::Double).unwrap_or(Datum::Null)
    }
}

fn native_scalar(field: &str, json: &Json, target: SchemaType) -> Result<SourceValue, ConvertError> {
    let value = match json {
        Json::Bool(b) => SourceValue::Bool(*b),
        Json::Number(n) => native_number(field, n, target)?,
        Json::String(s) => SourceValue::Text(s.clone()),
        other => SourceValue::Json(other.clone()),
    };
    Ok(value)
}

/// Narrow a JSON number to the width of the declared type. Integers that
/// do not fit the target are a parse error rather than a wrap.
fn native_number(
    field: &str,
    n: &serde_json::Number,
    target: SchemaType,
) -> Result<SourceValue, ConvertError> {
    let out_of_range = || parse_error(field, &n.to_string(), target);
    let double = || SourceValue::Float64(n.as_f64().unwrap_or(f64::NAN));

    match target {
        SchemaType::Int32 => match n.as_i64() {
            Some(i) => i32::try_from(i)
                .map(SourceValue::Int32)
                .map_err(|_| out_of_range()),
            None if n.is_u64() => Err(out_of_range()),
            None => Ok(double()),
        },
        SchemaType::Int64 => match n.as_i64() {
            Some(i) => Ok(SourceValue::Int64(i)),
            None if n.is_u64() => Err(out_of_range()),
            None => Ok(double()),
        },
        SchemaType::Float32 => Ok(SourceValue::Float32(n.as_f64().unwrap_or(f64::NAN) as f32)),
        _ => Ok(match normalize_number(n) {
            Datum::Long(l) => SourceValue::Int64(l),
            _ => double(),
        }),
    }
}

fn coerce_json_container(field: &str, json: &Json, target: SchemaType) -> Result<Datum, ConvertError> {
    match target {
        SchemaType::Null => Ok(Datum::Null),
        SchemaType::String => Ok(Datum::String(json.to_string())),
        _ => Err(mismatch(field, target, json_type_name(json))),
    }
}

fn coerce_value(field: &str, value: &SourceValue, target: SchemaType) -> Result<Datum, ConvertError> {
    use SourceValue as V;

    if value.is_null() {
        return Ok(Datum::Null);
    }

    match target {
        SchemaType::Null => Ok(Datum::Null),
        SchemaType::Int32 => match value {
            V::Int32(i) => Ok(Datum::Int(*i)),
            V::Int16(i) => Ok(Datum::Int(i32::from(*i))),
            V::Text(s) => s
                .parse::<i32>()
                .map(Datum::Int)
                .map_err(|_| parse_error(field, s, target)),
            other => Err(mismatch(field, target, other.type_name())),
        },
        SchemaType::Int64 => match value {
            V::Int64(i) => Ok(Datum::Long(*i)),
            V::Int32(i) => Ok(Datum::Long(i64::from(*i))),
            V::Int16(i) => Ok(Datum::Long(i64::from(*i))),
            V::Date(d) => Ok(Datum::Long(date_epoch_seconds(*d))),
            V::Time(t) => Ok(Datum::Long(time_epoch_seconds(*t))),
            V::Timestamp(ts) => Ok(Datum::Long(timestamp_epoch_seconds(*ts))),
            V::Text(s) => s
                .parse::<i64>()
                .map(Datum::Long)
                .map_err(|_| parse_error(field, s, target)),
            other => Err(mismatch(field, target, other.type_name())),
        },
        SchemaType::Float32 => match value {
            V::Float32(x) => Ok(Datum::Float(*x)),
            V::Int64(i) => Ok(Datum::Float(*i as f32)),
            V::Int32(i) => Ok(Datum::Float(*i as f32)),
            V::Int16(i) => Ok(Datum::Float(f32::from(*i))),
            V::Text(s) => s
                .trim()
                .parse::<f32>()
                .map(Datum::Float)
                .map_err(|_| parse_error(field, s, target)),
            other => Err(mismatch(field, target, other.type_name())),
        },
        SchemaType::Float64 => match value {
            V::Float64(x) => Ok(Datum::Double(*x)),
            V::Decimal(d) => d
                .to_f64()
                .map(Datum::Double)
                .ok_or_else(|| parse_error(field, &d.to_string(), target)),
            V::Float32(x) => Ok(Datum::Double(f64::from(*x))),
            V::Int64(i) => Ok(Datum::Double(*i as f64)),
            V::Int32(i) => Ok(Datum::Double(f64::from(*i))),
            V::Int16(i) => Ok(Datum::Double(f64::from(*i))),
            V::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(Datum::Double)
                .map_err(|_| parse_error(field, s, target)),
            other => Err(mismatch(field, target, other.type_name())),
        },
        SchemaType::Boolean => match value {
            V::Bool(b) => Ok(Datum::Boolean(*b)),
            V::Text(s) => Ok(Datum::Boolean(parse_bool_lenient(field, s))),
            other => Err(mismatch(field, target, other.type_name())),
        },
        SchemaType::String => Ok(Datum::String(value.to_string())),
        SchemaType::Bytes => match value {
            V::Bytes(b) => Ok(Datum::Bytes(b.clone())),
            V::Bool(b) => Ok(Datum::Bytes(encode::bool_bytes(*b))),
            V::Float64(x) => Ok(Datum::Bytes(encode::f64_bytes(*x))),
            V::Float32(x) => Ok(Datum::Bytes(encode::f32_bytes(*x))),
            V::Int64(i) => Ok(Datum::Bytes(encode::i64_bytes(*i))),
            V::Int32(i) => Ok(Datum::Bytes(encode::i32_bytes(*i))),
            V::Int16(i) => Ok(Datum::Bytes(encode::i16_bytes(*i))),
            V::Text(s) => Ok(Datum::Bytes(encode::text_bytes(s))),
            V::Decimal(d) => Ok(Datum::Bytes(encode::decimal_bytes(d))),
            other => Err(parse_error(field, &other.to_string(), target)),
        },
        other => Err(ConvertError::Unsupported {
            field: field.to_string(),
            schema_type: other,
        }),
    }
}

/// Case-insensitive `"true"` is true; any other text is false.
fn parse_bool_lenient(field: &str, text: &str) -> bool {
    if text.eq_ignore_ascii_case("true") {
        return true;
    }
    if !text.eq_ignore_ascii_case("false") {
        tracing::debug!(field, value = text, "unrecognized boolean text, using false");
    }
    false
}

fn date_epoch_seconds(d: Date) -> i64 {
    d.midnight().assume_utc().unix_timestamp()
}

/// Seconds since midnight, i.e. the time of day on the epoch date.
fn time_epoch_seconds(t: Time) -> i64 {
    i64::from(t.hour()) * 3600 + i64::from(t.minute()) * 60 + i64::from(t.second())
}

/// Whole seconds; sub-second precision is dropped.
fn timestamp_epoch_seconds(ts: OffsetDateTime) -> i64 {
    ts.unix_timestamp()
}

fn parse_error(field: &str, value: &str, target: SchemaType) -> ConvertError {
    ConvertError::Parse {
        field: field.to_string(),
        value: value.to_string(),
        target,
    }
}

fn mismatch(field: &str, declared: SchemaType, actual: &str) -> ConvertError {
    ConvertError::TypeMismatch {
        field: field.to_string(),
        declared,
        actual: actual.to_string(),
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
