use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Exported field schema: one descriptor per discovered form control
// ============================================================================

/// Constraint attached to a field, present only when a pattern was
/// determined or a length bound was declared on the control. Bounds are
/// kept as declared, negative values included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub pattern: String,
    pub message: String,
    #[serde(rename = "minLength")]
    pub min_length: Option<i64>,
    #[serde(rename = "maxLength")]
    pub max_length: Option<i64>,
}

/// One `<option>` of a `<select>` control, in native order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Normalized description of a single form control.
///
/// Serialized field order is part of the export format:
/// `name, id, label, step, type, placeholder, required, validation,
/// options, visible, rawAttributes`. Absent `id`, `validation` and
/// `options` are written as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub id: Option<String>,
    pub label: String,
    pub step: u32,
    pub r#type: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub validation: Option<Validation>,
    #[serde(default)]
    pub options: Option<Vec<SelectOption>>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(rename = "rawAttributes", default)]
    pub raw_attributes: BTreeMap<String, String>,
}

fn default_visible() -> bool { true }

impl FieldDescriptor {
    /// Controls that trigger an action rather than carry a value.
    pub fn is_action(&self) -> bool {
        matches!(self.r#type.as_str(), "submit" | "button" | "reset" | "image")
    }
}
