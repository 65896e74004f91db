//! The custom field written by a bulk assignment.

use serde::{Deserialize, Serialize};

/// Namespace of the assigned field.
pub const FIELD_NAMESPACE: &str = "custom";

/// Key of the assigned field within [`FIELD_NAMESPACE`].
pub const FIELD_KEY: &str = "custom_field";

/// Storage type of the assigned field.
pub const FIELD_TYPE: &str = "single_line_text_field";

/// A namespaced key/value/type tuple to be written onto one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAssignment {
    pub namespace: String,
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub value_type: String,
}

impl FieldAssignment {
    /// Build the fixed `custom.custom_field` assignment carrying `value`.
    ///
    /// The value is stored as given; trimming is the planner's job.
    pub fn custom_field(value: impl Into<String>) -> Self {
        Self {
            namespace: FIELD_NAMESPACE.to_string(),
            key: FIELD_KEY.to_string(),
            value: value.into(),
            value_type: FIELD_TYPE.to_string(),
        }
    }

    /// `namespace.key`, the identity of the field on an item.
    pub fn qualified_key(&self) -> String {
        format!("{}.{}", self.namespace, self.key)
    }
}
