//! Typed schema tree.
//!
//! A [`Schema`] node declares the expected type of a value and, for
//! container types, the schemas of its children. The enum shape makes the
//! type tag and its children inseparable: an array always has a component
//! schema, a record always has a field list, and so on.

use std::fmt;

// ── Type tags ───────────────────────────────────────────────────────

/// The category of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    Null,
    Boolean,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    Bytes,
    Enum,
    Array,
    Map,
    Record,
    Union,
}

impl SchemaType {
    /// Lowercase tag used in error messages and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Null => "null",
            SchemaType::Boolean => "boolean",
            SchemaType::Int32 => "int32",
            SchemaType::Int64 => "int64",
            SchemaType::Float32 => "float32",
            SchemaType::Float64 => "float64",
            SchemaType::String => "string",
            SchemaType::Bytes => "bytes",
            SchemaType::Enum => "enum",
            SchemaType::Array => "array",
            SchemaType::Map => "map",
            SchemaType::Record => "record",
            SchemaType::Union => "union",
        }
    }

    /// True for the leaf types handled by primitive coercion.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            SchemaType::Null
                | SchemaType::Boolean
                | SchemaType::Int32
                | SchemaType::Int64
                | SchemaType::Float32
                | SchemaType::Float64
                | SchemaType::String
                | SchemaType::Bytes
        )
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Schema nodes ────────────────────────────────────────────────────

/// A named field of a record schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub schema: Schema,
}

impl Field {
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

/// Key and value schemas of a map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSchema {
    pub key: Box<Schema>,
    pub value: Box<Schema>,
}

/// Record schema: a name plus fields in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    pub name: String,
    pub fields: Vec<Field>,
}

/// A node of the schema tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Null,
    Boolean,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    Bytes,
    /// Enumerated symbols. Declared for completeness; conversion rejects it.
    Enum { symbols: Vec<String> },
    Array(Box<Schema>),
    Map(MapSchema),
    Record(RecordSchema),
    /// Alternatives in declaration order.
    Union(Vec<Schema>),
}

impl Schema {
    pub fn array(component: Schema) -> Self {
        Schema::Array(Box::new(component))
    }

    pub fn map(key: Schema, value: Schema) -> Self {
        Schema::Map(MapSchema {
            key: Box::new(key),
            value: Box::new(value),
        })
    }

    pub fn record(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Schema::Record(RecordSchema {
            name: name.into(),
            fields,
        })
    }

    pub fn union(alternatives: Vec<Schema>) -> Self {
        Schema::Union(alternatives)
    }

    /// `[null, inner]`, the conventional optional field.
    pub fn nullable_of(inner: Schema) -> Self {
        Schema::Union(vec![Schema::Null, inner])
    }

    pub fn enumeration<S: Into<String>>(symbols: impl IntoIterator<Item = S>) -> Self {
        Schema::Enum {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }

    pub fn schema_type(&self) -> SchemaType {
        match self {
            Schema::Null => SchemaType::Null,
            Schema::Boolean => SchemaType::Boolean,
            Schema::Int32 => SchemaType::Int32,
            Schema::Int64 => SchemaType::Int64,
            Schema::Float32 => SchemaType::Float32,
            Schema::Float64 => SchemaType::Float64,
            Schema::String => SchemaType::String,
            Schema::Bytes => SchemaType::Bytes,
            Schema::Enum { .. } => SchemaType::Enum,
            Schema::Array(_) => SchemaType::Array,
            Schema::Map(_) => SchemaType::Map,
            Schema::Record(_) => SchemaType::Record,
            Schema::Union(_) => SchemaType::Union,
        }
    }

    /// Element schema of an array.
    pub fn component_schema(&self) -> Option<&Schema> {
        match self {
            Schema::Array(component) => Some(component),
            _ => None,
        }
    }

    pub fn map_schema(&self) -> Option<&MapSchema> {
        match self {
            Schema::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn record_schema(&self) -> Option<&RecordSchema> {
        match self {
            Schema::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn record_name(&self) -> Option<&str> {
        self.record_schema().map(|r| r.name.as_str())
    }

    /// Fields of a record schema; empty for every other type.
    pub fn fields(&self) -> &[Field] {
        match self {
            Schema::Record(record) => &record.fields,
            _ => &[],
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields().iter().find(|f| f.name == name)
    }

    pub fn union_schemas(&self) -> Option<&[Schema]> {
        match self {
            Schema::Union(alternatives) => Some(alternatives),
            _ => None,
        }
    }
}

impl RecordSchema {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Array(component) => write!(f, "array<{}>", component),
            Schema::Map(map) => write!(f, "map<{}, {}>", map.key, map.value),
            Schema::Record(record) => write!(f, "record {}", record.name),
            Schema::Union(alternatives) => {
                f.write_str("union[")?;
                for (i, alt) in alternatives.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", alt)?;
                }
                f.write_str("]")
            }
            other => f.write_str(other.schema_type().as_str()),
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn order_schema() -> Schema {
        Schema::record(
            "order",
            vec![
                Field::new("id", Schema::Int64),
                Field::new("note", Schema::nullable_of(Schema::String)),
                Field::new("tags", Schema::array(Schema::String)),
                Field::new("attrs", Schema::map(Schema::String, Schema::Float64)),
            ],
        )
    }

    #[test]
    fn test_schema_type_tags() {
        let schema = order_schema();
        assert_eq!(schema.schema_type(), SchemaType::Record);
        assert_eq!(schema.fields()[2].schema.schema_type(), SchemaType::Array);
        assert_eq!(schema.fields()[3].schema.schema_type(), SchemaType::Map);
        assert_eq!(schema.fields()[1].schema.schema_type(), SchemaType::Union);
        assert!(SchemaType::Bytes.is_primitive());
        assert!(!SchemaType::Enum.is_primitive());
    }

    #[test]
    fn test_children_accessors() {
        let schema = order_schema();
        assert_eq!(schema.record_name(), Some("order"));
        let tags = &schema.field("tags").unwrap().schema;
        assert_eq!(tags.component_schema(), Some(&Schema::String));
        let attrs = &schema.field("attrs").unwrap().schema;
        let map = attrs.map_schema().unwrap();
        assert_eq!(*map.key, Schema::String);
        assert_eq!(*map.value, Schema::Float64);
        assert!(schema.field("missing").is_none());
        assert!(Schema::Int32.fields().is_empty());
        assert!(Schema::Int32.component_schema().is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(Schema::array(Schema::Int32).to_string(), "array<int32>");
        assert_eq!(
            Schema::map(Schema::String, Schema::Bytes).to_string(),
            "map<string, bytes>"
        );
        assert_eq!(
            Schema::nullable_of(Schema::Float64).to_string(),
            "union[null, float64]"
        );
        assert_eq!(order_schema().to_string(), "record order");
    }
}
