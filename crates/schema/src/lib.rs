//! recast-schema: the schema tree consumed by record conversion.
//!
//! Provides the read-only [`Schema`] tree (type tag plus type-specific
//! children) and a reader/writer for the JSON schema document form, so a
//! pipeline can ship schemas as text next to the data they describe.
//!
//! Parsing checks document structure only. Whether a schema makes sense
//! for the data is left to the consumer.

pub mod deserialize;
pub mod types;

pub use deserialize::{parse_schema, parse_schema_str, SchemaError};
pub use types::*;
