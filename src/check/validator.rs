use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::schema::field_model::FieldDescriptor;

// ============================================================================
// Schema-driven validation of submitted values
// ============================================================================

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub name: String,
    pub message: String,
}

/// Check submitted values against every field of the schema.
///
/// Hidden (`visible == false`) and action controls are skipped. At most one
/// error is reported per field: required, then length bounds, then pattern.
pub fn validate_values(fields: &[FieldDescriptor], values: &Map<String, Value>) -> Vec<FieldError> {
    fields
        .iter()
        .filter(|f| f.visible && !f.is_action())
        .filter_map(|f| check_field(f, values.get(&f.name)))
        .collect()
}

/// Like [`validate_values`], restricted to one step of the form.
pub fn validate_step(
    fields: &[FieldDescriptor],
    values: &Map<String, Value>,
    step: u32,
) -> Vec<FieldError> {
    let in_step: Vec<FieldDescriptor> = fields.iter().filter(|f| f.step == step).cloned().collect();
    validate_values(&in_step, values)
}

/// First failing check for one field, if any.
pub fn check_field(field: &FieldDescriptor, value: Option<&Value>) -> Option<FieldError> {
    let text = value.and_then(value_text).unwrap_or_default();
    let fail = |message: String| {
        Some(FieldError {
            name: field.name.clone(),
            message,
        })
    };

    if text.trim().is_empty() {
        if field.required {
            return fail(format!("{} is required", field.label));
        }
        return None;
    }

    let Some(rules) = &field.validation else {
        return None;
    };

    // Negative bounds constrain nothing.
    let len = text.chars().count() as i64;
    if let Some(min) = rules.min_length.filter(|m| *m >= 0) {
        if len < min {
            return fail(format!("{} must be at least {} characters", field.label, min));
        }
    }
    if let Some(max) = rules.max_length.filter(|m| *m >= 0) {
        if len > max {
            return fail(format!("{} must be at most {} characters", field.label, max));
        }
    }

    if !pattern_matches(&rules.pattern, &text) {
        return fail(rules.message.clone());
    }

    None
}

/// Unanchored search. Empty or uncompilable patterns accept everything.
pub fn pattern_matches(pattern: &str, text: &str) -> bool {
    if pattern.is_empty() {
        return true;
    }
    match Regex::new(pattern) {
        Ok(re) => re.is_match(text),
        Err(e) => {
            warn!(pattern, error = %e, "pattern does not compile, accepting value");
            true
        }
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
