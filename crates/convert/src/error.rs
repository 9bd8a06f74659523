use recast_schema::SchemaType;

/// All errors that can be returned by a conversion.
///
/// Every variant names the field being decoded. The first error raised
/// anywhere in the tree aborts the whole conversion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConvertError {
    /// The value's shape cannot be coerced to the declared primitive type.
    #[error("field '{field}' declared {declared} but value is of type {actual}")]
    TypeMismatch {
        field: String,
        declared: SchemaType,
        actual: String,
    },

    /// Text could not be parsed as the declared type.
    #[error("value '{value}' cannot convert to {target} for field '{field}'")]
    Parse {
        field: String,
        value: String,
        target: SchemaType,
    },

    /// The value does not have the array/record/map/union shape the schema expects.
    #[error("{message}")]
    Structure { field: String, message: String },

    /// The schema type has no decoder.
    #[error("cannot decode object '{field}' with schema type '{schema_type}'")]
    Unsupported {
        field: String,
        schema_type: SchemaType,
    },

    /// A builder was asked to set a field its record schema does not declare.
    #[error("record '{record}' has no field '{field}'")]
    UndeclaredField { record: String, field: String },

    /// A record was requested from a schema that is not a record.
    #[error("expected a record schema, got {schema_type}")]
    NotARecord { schema_type: SchemaType },

    /// Converter configuration could not be read.
    #[error("invalid converter config: {0}")]
    Config(String),
}

impl ConvertError {
    pub(crate) fn structure(field: &str, message: impl Into<String>) -> Self {
        ConvertError::Structure {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Name of the field the error was raised for, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ConvertError::TypeMismatch { field, .. }
            | ConvertError::Parse { field, .. }
            | ConvertError::Structure { field, .. }
            | ConvertError::Unsupported { field, .. }
            | ConvertError::UndeclaredField { field, .. } => Some(field),
            ConvertError::NotARecord { .. } | ConvertError::Config(_) => None,
        }
    }
}
