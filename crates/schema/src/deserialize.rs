//! Reading and writing the JSON schema document form.
//!
//! The main entry point is [`parse_schema`], which walks a
//! `&serde_json::Value` and produces a [`Schema`]. Documents follow the
//! Avro layout: bare type names, arrays for unions, and objects with a
//! `type` key for everything else.

use crate::types::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

/// Errors while reading a schema document.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The document is structurally wrong at `path`.
    #[error("invalid schema at '{path}': {message}")]
    Invalid { path: String, message: String },

    /// The text is not JSON at all.
    #[error("schema is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn invalid(path: &str, message: impl Into<String>) -> SchemaError {
    SchemaError::Invalid {
        path: path.to_string(),
        message: message.into(),
    }
}

/// Parse a schema document held in a JSON value.
pub fn parse_schema(doc: &Value) -> Result<Schema, SchemaError> {
    parse_node(doc, "$")
}

/// Parse a schema document from JSON text.
pub fn parse_schema_str(text: &str) -> Result<Schema, SchemaError> {
    let doc: Value = serde_json::from_str(text)?;
    parse_schema(&doc)
}

fn parse_node(node: &Value, path: &str) -> Result<Schema, SchemaError> {
    match node {
        Value::String(name) => primitive(name)
            .ok_or_else(|| invalid(path, format!("unknown type name '{}'", name))),
        Value::Array(alternatives) => {
            let mut parsed = Vec::with_capacity(alternatives.len());
            for (i, alt) in alternatives.iter().enumerate() {
                parsed.push(parse_node(alt, &format!("{}[{}]", path, i))?);
            }
            Ok(Schema::Union(parsed))
        }
        Value::Object(obj) => parse_object(obj, path),
        other => Err(invalid(
            path,
            format!("expected a type name, union array or object, got {}", other),
        )),
    }
}

fn parse_object(obj: &Map<String, Value>, path: &str) -> Result<Schema, SchemaError> {
    let type_val = obj
        .get("type")
        .ok_or_else(|| invalid(path, "missing 'type' field"))?;

    let type_name = match type_val {
        Value::String(s) => s.as_str(),
        // {"type": {...}} and {"type": [...]} wrap a nested schema.
        nested => return parse_node(nested, &format!("{}.type", path)),
    };

    if let Some(schema) = primitive(type_name) {
        return Ok(schema);
    }

    match type_name {
        "array" => {
            let items = obj
                .get("items")
                .ok_or_else(|| invalid(path, "array schema missing 'items'"))?;
            Ok(Schema::array(parse_node(items, &format!("{}.items", path))?))
        }
        "map" => {
            let key = match obj.get("keys") {
                Some(keys) => parse_node(keys, &format!("{}.keys", path))?,
                None => Schema::String,
            };
            let values = obj
                .get("values")
                .ok_or_else(|| invalid(path, "map schema missing 'values'"))?;
            Ok(Schema::map(key, parse_node(values, &format!("{}.values", path))?))
        }
        "record" => parse_record(obj, path),
        "enum" => {
            let symbols = obj
                .get("symbols")
                .and_then(|s| s.as_array())
                .ok_or_else(|| invalid(path, "enum schema missing 'symbols' array"))?
                .iter()
                .map(|v| {
                    v.as_str()
                        .map(|s| s.to_string())
                        .ok_or_else(|| invalid(path, "enum symbols must be strings"))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Schema::Enum { symbols })
        }
        other => Err(invalid(path, format!("unknown type name '{}'", other))),
    }
}

fn parse_record(obj: &Map<String, Value>, path: &str) -> Result<Schema, SchemaError> {
    let name = obj
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| invalid(path, "record schema missing 'name'"))?
        .to_string();

    let fields_arr = obj
        .get("fields")
        .and_then(|f| f.as_array())
        .ok_or_else(|| invalid(path, format!("record '{}' missing 'fields' array", name)))?;

    let mut fields = Vec::with_capacity(fields_arr.len());
    for (i, field) in fields_arr.iter().enumerate() {
        let field_path = format!("{}.fields[{}]", path, i);
        let field_name = field
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| invalid(&field_path, "field missing 'name'"))?;
        let field_type = field
            .get("type")
            .ok_or_else(|| invalid(&field_path, format!("field '{}' missing 'type'", field_name)))?;
        let schema = parse_node(field_type, &format!("{}.{}", field_path, field_name))?;
        fields.push(Field::new(field_name, schema));
    }

    Ok(Schema::record(name, fields))
}

fn primitive(name: &str) -> Option<Schema> {
    let schema = match name {
        "null" => Schema::Null,
        "boolean" => Schema::Boolean,
        "int" | "int32" => Schema::Int32,
        "long" | "int64" => Schema::Int64,
        "float" | "float32" => Schema::Float32,
        "double" | "float64" => Schema::Float64,
        "string" => Schema::String,
        "bytes" => Schema::Bytes,
        _ => return None,
    };
    Some(schema)
}

// ── Rendering ───────────────────────────────────────────────────────

impl Schema {
    /// Render the schema in document form. `parse_schema` reads it back.
    pub fn to_json(&self) -> Value {
        match self {
            Schema::Null => json!("null"),
            Schema::Boolean => json!("boolean"),
            Schema::Int32 => json!("int"),
            Schema::Int64 => json!("long"),
            Schema::Float32 => json!("float"),
            Schema::Float64 => json!("double"),
            Schema::String => json!("string"),
            Schema::Bytes => json!("bytes"),
            Schema::Enum { symbols } => json!({ "type": "enum", "symbols": symbols }),
            Schema::Array(component) => json!({ "type": "array", "items": component.to_json() }),
            Schema::Map(map) => json!({
                "type": "map",
                "keys": map.key.to_json(),
                "values": map.value.to_json(),
            }),
            Schema::Record(record) => {
                let fields: Vec<Value> = record
                    .fields
                    .iter()
                    .map(|f| json!({ "name": f.name, "type": f.schema.to_json() }))
                    .collect();
                json!({ "type": "record", "name": record.name, "fields": fields })
            }
            Schema::Union(alternatives) => {
                Value::Array(alternatives.iter().map(Schema::to_json).collect())
            }
        }
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let doc = Value::deserialize(deserializer)?;
        parse_schema(&doc).map_err(serde::de::Error::custom)
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_primitive_names() {
        assert_eq!(parse_schema(&json!("int")).unwrap(), Schema::Int32);
        assert_eq!(parse_schema(&json!("int32")).unwrap(), Schema::Int32);
        assert_eq!(parse_schema(&json!("long")).unwrap(), Schema::Int64);
        assert_eq!(parse_schema(&json!("double")).unwrap(), Schema::Float64);
        assert_eq!(parse_schema(&json!({"type": "bytes"})).unwrap(), Schema::Bytes);
    }

    #[test]
    fn test_parse_record() {
        let doc = json!({
            "type": "record",
            "name": "trade",
            "fields": [
                {"name": "symbol", "type": "string"},
                {"name": "price", "type": ["null", "double"]},
                {"name": "fills", "type": {"type": "array", "items": "long"}},
                {"name": "meta", "type": {"type": "map", "values": "string"}}
            ]
        });
        let schema = parse_schema(&doc).unwrap();
        assert_eq!(schema.record_name(), Some("trade"));
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["symbol", "price", "fills", "meta"]);
        assert_eq!(
            schema.field("price").unwrap().schema,
            Schema::nullable_of(Schema::Float64)
        );
        assert_eq!(
            schema.field("fills").unwrap().schema,
            Schema::array(Schema::Int64)
        );
        // Map keys default to string.
        assert_eq!(
            schema.field("meta").unwrap().schema,
            Schema::map(Schema::String, Schema::String)
        );
    }

    #[test]
    fn test_parse_nested_type_wrapper() {
        let doc = json!({"type": {"type": "array", "items": "int"}});
        assert_eq!(parse_schema(&doc).unwrap(), Schema::array(Schema::Int32));
    }

    #[test]
    fn test_parse_enum() {
        let doc = json!({"type": "enum", "symbols": ["BUY", "SELL"]});
        assert_eq!(
            parse_schema(&doc).unwrap(),
            Schema::enumeration(["BUY", "SELL"])
        );
    }

    #[test]
    fn test_unknown_type_name() {
        match parse_schema(&json!({"type": "decimal"})).unwrap_err() {
            SchemaError::Invalid { path, message } => {
                assert_eq!(path, "$");
                assert!(message.contains("decimal"));
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_error_path_points_at_field() {
        let doc = json!({
            "type": "record",
            "name": "r",
            "fields": [{"name": "bad", "type": {"type": "array"}}]
        });
        match parse_schema(&doc).unwrap_err() {
            SchemaError::Invalid { path, .. } => assert_eq!(path, "$.fields[0].bad"),
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_record_fields() {
        let err = parse_schema(&json!({"type": "record", "name": "r"})).unwrap_err();
        assert!(err.to_string().contains("missing 'fields'"));
    }

    #[test]
    fn test_parse_schema_str_rejects_bad_json() {
        assert!(matches!(
            parse_schema_str("{not json").unwrap_err(),
            SchemaError::Json(_)
        ));
    }

    #[test]
    fn test_to_json_reads_back() {
        let schema = Schema::record(
            "event",
            vec![
                Field::new("at", Schema::Int64),
                Field::new("kind", Schema::enumeration(["a", "b"])),
                Field::new("payload", Schema::nullable_of(Schema::Bytes)),
                Field::new("scores", Schema::map(Schema::Int32, Schema::Float32)),
            ],
        );
        assert_eq!(parse_schema(&schema.to_json()).unwrap(), schema);
    }

    #[test]
    fn test_serde_impls() {
        let schema: Schema =
            serde_json::from_str(r#"{"type":"array","items":["null","string"]}"#).unwrap();
        assert_eq!(schema, Schema::array(Schema::nullable_of(Schema::String)));
        let text = serde_json::to_string(&schema).unwrap();
        assert_eq!(text, r#"{"type":"array","items":["null","string"]}"#);
    }
}
