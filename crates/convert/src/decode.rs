//! Schema-directed decoding of a value tree.
//!
//! The dispatcher routes each node on its schema category: primitives go to
//! the coercer, containers recurse back through [`Decoder::decode`].

use std::collections::HashMap;

use recast_schema::{RecordSchema, Schema, SchemaType};

use crate::coerce::coerce_node;
use crate::config::{ConvertConfig, UnionPolicy};
use crate::datum::Datum;
use crate::error::ConvertError;
use crate::record::{Record, RecordBuilder};
use crate::value::Node;

pub(crate) struct Decoder<'c> {
    config: &'c ConvertConfig,
}

impl<'c> Decoder<'c> {
    pub(crate) fn new(config: &'c ConvertConfig) -> Self {
        Self { config }
    }

    /// Decode `node` against `schema`. `depth` counts the containers
    /// enclosing the node; the root record is at depth 0.
    pub(crate) fn decode(
        &self,
        field: &str,
        node: Node<'_>,
        schema: &Schema,
        depth: usize,
    ) -> Result<Datum, ConvertError> {
        let schema_type = schema.schema_type();
        tracing::trace!(field, schema_type = %schema_type, depth, "decode");

        if schema_type.is_primitive() {
            return coerce_node(field, node, schema_type, self.config.json_primitives);
        }

        match schema {
            Schema::Array(component) => self
                .decode_array(field, node, component, depth)
                .map(Datum::Array),
            Schema::Record(record) => self
                .decode_record(field, node, record, depth)
                .map(Datum::Record),
            Schema::Map(map) => self
                .decode_map(field, node, &map.key, &map.value, depth)
                .map(Datum::Map),
            Schema::Union(alternatives) => self.decode_union(field, node, alternatives, depth),
            _ => Err(ConvertError::Unsupported {
                field: field.to_string(),
                schema_type,
            }),
        }
    }

    /// Containers deeper than `max_depth` are rejected; primitives are not
    /// counted.
    fn enter(&self, field: &str, depth: usize) -> Result<(), ConvertError> {
        match self.config.max_depth {
            Some(max) if depth > max => Err(ConvertError::structure(
                field,
                format!("maximum nesting depth {} exceeded at '{}'", max, field),
            )),
            _ => Ok(()),
        }
    }

    pub(crate) fn decode_array(
        &self,
        field: &str,
        node: Node<'_>,
        component: &Schema,
        depth: usize,
    ) -> Result<Vec<Datum>, ConvertError> {
        self.enter(field, depth)?;
        let elements = node
            .elements()
            .ok_or_else(|| ConvertError::structure(field, format!("cannot decode array '{}'", field)))?;
        elements
            .into_iter()
            .map(|element| self.decode(field, element, component, depth + 1))
            .collect()
    }

    pub(crate) fn decode_record(
        &self,
        field: &str,
        node: Node<'_>,
        schema: &RecordSchema,
        depth: usize,
    ) -> Result<Record, ConvertError> {
        self.enter(field, depth)?;
        let mut builder = RecordBuilder::for_record(schema);

        if node.is_keyed() {
            for declared in &schema.fields {
                let value = node.lookup(&declared.name);
                let datum = self.decode(&declared.name, value, &declared.schema, depth + 1)?;
                builder.set(&declared.name, datum)?;
            }
            return Ok(builder.build());
        }

        if node.elements().is_some() {
            // A bare sequence fills the record's array field named after
            // the field being decoded, one level down like any field.
            let component = schema
                .field(field)
                .and_then(|f| f.schema.component_schema())
                .ok_or_else(|| {
                    ConvertError::structure(field, format!("cannot decode array '{}'", field))
                })?;
            let items = self.decode_array(field, node, component, depth + 1)?;
            builder.set(field, Datum::Array(items))?;
            return Ok(builder.build());
        }

        Err(ConvertError::structure(
            field,
            format!(
                "cannot decode object '{}' with schema type '{}'",
                field,
                SchemaType::Record
            ),
        ))
    }

    pub(crate) fn decode_map(
        &self,
        field: &str,
        node: Node<'_>,
        key_schema: &Schema,
        value_schema: &Schema,
        depth: usize,
    ) -> Result<HashMap<Datum, Datum>, ConvertError> {
        self.enter(field, depth)?;
        let entries = node
            .entries()
            .ok_or_else(|| ConvertError::structure(field, format!("cannot decode map '{}'", field)))?;
        let mut map = HashMap::with_capacity(entries.len());
        for (key, value) in entries {
            let key = self.decode(field, key, key_schema, depth + 1)?;
            let value = self.decode(field, value, value_schema, depth + 1)?;
            map.insert(key, value);
        }
        Ok(map)
    }

    pub(crate) fn decode_union(
        &self,
        field: &str,
        node: Node<'_>,
        alternatives: &[Schema],
        depth: usize,
    ) -> Result<Datum, ConvertError> {
        let no_match = || ConvertError::structure(field, format!("cannot decode '{}'", field));

        match self.config.union {
            UnionPolicy::First => {
                let first = alternatives.first().ok_or_else(no_match)?;
                self.decode(field, node, first, depth)
            }
            UnionPolicy::FirstMatch => {
                let mut last_err = None;
                for alternative in alternatives {
                    if *alternative == Schema::Null {
                        if node.is_null() {
                            return Ok(Datum::Null);
                        }
                        continue;
                    }
                    match self.decode(field, node, alternative, depth) {
                        Ok(datum) => return Ok(datum),
                        Err(err) => {
                            tracing::debug!(
                                field,
                                alternative = %alternative,
                                error = %err,
                                "union alternative rejected, trying next"
                            );
                            last_err = Some(err);
                        }
                    }
                }
                Err(last_err.unwrap_or_else(no_match))
            }
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
