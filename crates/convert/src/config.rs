//! Converter configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// How a union schema picks the alternative to decode against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnionPolicy {
    /// Decode against the first alternative only, whatever the outcome.
    #[default]
    First,
    /// Try alternatives in order and keep the first that decodes. A `null`
    /// alternative only accepts null values.
    FirstMatch,
}

/// Treatment of JSON booleans, numbers and strings at primitive leaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonPrimitivePolicy {
    /// Take the JSON primitive as it is, ignoring the declared type.
    #[default]
    Passthrough,
    /// Coerce the JSON primitive to the declared type like a native value.
    Coerce,
}

/// Options for a [`RecordConverter`](crate::RecordConverter).
///
/// ```json
/// { "union": "first_match", "json_primitives": "coerce", "max_depth": 64 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    pub union: UnionPolicy,
    pub json_primitives: JsonPrimitivePolicy,
    /// Maximum container nesting below the root record; unbounded when
    /// `None`. Zero admits only records of primitive fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

impl ConvertConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConvertError> {
        serde_json::from_str(text).map_err(|e| ConvertError::Config(e.to_string()))
    }

    pub fn from_json(value: &serde_json::Value) -> Result<Self, ConvertError> {
        Self::deserialize(value).map_err(|e| ConvertError::Config(e.to_string()))
    }

    pub fn with_union(mut self, union: UnionPolicy) -> Self {
        self.union = union;
        self
    }

    pub fn with_json_primitives(mut self, policy: JsonPrimitivePolicy) -> Self {
        self.json_primitives = policy;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}
