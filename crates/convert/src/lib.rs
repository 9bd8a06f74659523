//! recast-convert -- decodes loosely typed values into typed records
//! under the direction of a [`Schema`].
//!
//! Input is a [`SourceValue`] (native shapes, or a whole JSON tree) or a
//! bare `serde_json::Value`. The schema tree is walked from the root
//! record; containers recurse, primitives are coerced to the declared
//! type, and the result is a [`Record`] whose fields follow the schema's
//! declaration order. The first failure anywhere aborts the conversion.
//!
//! Conversion is pure: no I/O and no shared state. A [`RecordConverter`]
//! only carries its [`ConvertConfig`] and can be shared across threads.

pub mod coerce;
pub mod config;
pub mod datum;
mod decode;
pub mod encode;
pub mod error;
pub mod record;
pub mod value;

pub use recast_schema::{Schema, SchemaType};

pub use coerce::coerce;
pub use config::{ConvertConfig, JsonPrimitivePolicy, UnionPolicy};
pub use datum::Datum;
pub use error::ConvertError;
pub use record::{Record, RecordBuilder};
pub use value::SourceValue;

use decode::Decoder;
use value::Node;

/// Converts values against schemas with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct RecordConverter {
    config: ConvertConfig,
}

impl RecordConverter {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Convert `value` into a record of the root record `schema`.
    ///
    /// The root record's name is used as the field name in errors.
    pub fn convert(&self, value: &SourceValue, schema: &Schema) -> Result<Record, ConvertError> {
        self.convert_node(Node::of(value), schema)
    }

    /// Like [`convert`](Self::convert), walking the JSON tree in place.
    pub fn convert_json(
        &self,
        value: &serde_json::Value,
        schema: &Schema,
    ) -> Result<Record, ConvertError> {
        self.convert_node(Node::Json(value), schema)
    }

    /// Decode `value` against any schema node, naming it `field` in errors.
    pub fn decode(
        &self,
        field: &str,
        value: &SourceValue,
        schema: &Schema,
    ) -> Result<Datum, ConvertError> {
        Decoder::new(&self.config).decode(field, Node::of(value), schema, 0)
    }

    fn convert_node(&self, node: Node<'_>, schema: &Schema) -> Result<Record, ConvertError> {
        let record_schema = schema.record_schema().ok_or(ConvertError::NotARecord {
            schema_type: schema.schema_type(),
        })?;
        tracing::debug!(
            record = %record_schema.name,
            fields = record_schema.fields.len(),
            input = node.type_name(),
            "converting record"
        );

        let record = Decoder::new(&self.config).decode_record(&record_schema.name, node, record_schema, 0)?;

        tracing::debug!(record = %record.name(), fields = record.len(), "record converted");
        Ok(record)
    }
}

/// Convert with the default configuration.
pub fn convert(value: &SourceValue, schema: &Schema) -> Result<Record, ConvertError> {
    RecordConverter::default().convert(value, schema)
}

/// Convert a JSON tree with the default configuration.
pub fn convert_json(value: &serde_json::Value, schema: &Schema) -> Result<Record, ConvertError> {
    RecordConverter::default().convert_json(value, schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use recast_schema::Field;
    use serde_json::json;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_public_types_are_send_sync() {
        assert_send_sync::<Schema>();
        assert_send_sync::<SourceValue>();
        assert_send_sync::<Datum>();
        assert_send_sync::<Record>();
        assert_send_sync::<ConvertConfig>();
        assert_send_sync::<RecordConverter>();
    }

    #[test]
    fn test_root_must_be_record() {
        let err = convert(&SourceValue::Int32(1), &Schema::Int32).unwrap_err();
        assert_eq!(
            err,
            ConvertError::NotARecord {
                schema_type: SchemaType::Int32
            }
        );
    }

    #[test]
    fn test_root_name_used_in_errors() {
        let schema = Schema::record("order", vec![Field::new("id", Schema::Int64)]);
        let err = convert_json(&json!("not an object"), &schema).unwrap_err();
        assert_eq!(err.field(), Some("order"));
    }

    #[test]
    fn test_decode_any_schema() {
        let converter = RecordConverter::new(ConvertConfig::default());
        let datum = converter
            .decode("ids", &SourceValue::Sequence(vec!["1".into()]), &Schema::array(Schema::Int32))
            .unwrap();
        assert_eq!(datum, Datum::Array(vec![Datum::Int(1)]));
    }
}
