//! Target records and their builder.

use std::hash::{Hash, Hasher};

use recast_schema::{RecordSchema, Schema};

use crate::datum::Datum;
use crate::error::ConvertError;

/// A sealed record whose fields follow the schema's declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    name: String,
    fields: Vec<(String, Datum)>,
}

impl Record {
    /// Name of the record schema this record was built from.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, field: &str) -> Option<&Datum> {
        self.fields.iter().find(|(n, _)| n == field).map(|(_, v)| v)
    }

    /// Fields in schema declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Datum)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        let obj: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(n, v)| (n.clone(), v.to_json()))
            .collect();
        serde_json::Value::Object(obj)
    }
}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.fields.hash(state);
    }
}

/// Builds a [`Record`] field by field.
///
/// Fields may be set in any order and more than once; the last value set
/// for a name is kept. Fields never set are null in the built record.
#[derive(Debug)]
pub struct RecordBuilder<'s> {
    schema: &'s RecordSchema,
    values: Vec<Option<Datum>>,
}

impl<'s> RecordBuilder<'s> {
    /// Start a record for `schema`, which must be a record schema.
    pub fn new(schema: &'s Schema) -> Result<Self, ConvertError> {
        let record = schema.record_schema().ok_or(ConvertError::NotARecord {
            schema_type: schema.schema_type(),
        })?;
        Ok(Self::for_record(record))
    }

    pub fn for_record(schema: &'s RecordSchema) -> Self {
        Self {
            schema,
            values: vec![None; schema.fields.len()],
        }
    }

    pub fn set(&mut self, field: &str, value: Datum) -> Result<&mut Self, ConvertError> {
        let pos = self
            .schema
            .position(field)
            .ok_or_else(|| ConvertError::UndeclaredField {
                record: self.schema.name.clone(),
                field: field.to_string(),
            })?;
        self.values[pos] = Some(value);
        Ok(self)
    }

    pub fn build(self) -> Record {
        let fields = self
            .schema
            .fields
            .iter()
            .zip(self.values)
            .map(|(f, v)| (f.name.clone(), v.unwrap_or(Datum::Null)))
            .collect();
        Record {
            name: self.schema.name.clone(),
            fields,
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
