use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::SchemaError;
use crate::extract::extractor::VisibilityMap;
use crate::schema::field_model::FieldDescriptor;

// ============================================================================
// Schema export
// ============================================================================

/// Pretty-printed JSON array, two-space indent, non-ASCII kept as-is.
pub fn schema_json(fields: &[FieldDescriptor]) -> Result<String, SchemaError> {
    serde_json::to_string_pretty(fields).map_err(|e| SchemaError::json("serialize schema", e))
}

/// Resolve `path` against `base` unless it is already absolute.
pub fn resolve_output_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Write the schema, creating missing parent directories.
///
/// Write failures are returned as-is; there is no retry.
pub fn write_schema(path: &Path, fields: &[FieldDescriptor]) -> Result<(), SchemaError> {
    let json = schema_json(fields)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| SchemaError::io(parent, e))?;
    }
    std::fs::write(path, json).map_err(|e| SchemaError::io(path, e))?;

    info!("Wrote schema with {} fields -> {}", fields.len(), path.display());
    Ok(())
}

// ============================================================================
// Input loading
// ============================================================================

pub fn load_schema(path: &Path) -> Result<Vec<FieldDescriptor>, SchemaError> {
    let content = std::fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| SchemaError::json(format!("schema {}", path.display()), e))
}

/// Load a JSON object of submitted values keyed by field name.
pub fn load_values(path: &Path) -> Result<Map<String, Value>, SchemaError> {
    let content = std::fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| SchemaError::json(format!("values {}", path.display()), e))
}

pub fn load_visibility(path: &Path) -> Result<VisibilityMap, SchemaError> {
    let content = std::fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))?;
    parse_visibility(&content)
}

/// Parse a visibility map. Entries whose value is not a boolean are dropped,
/// which leaves those controls at the default (visible).
pub fn parse_visibility(content: &str) -> Result<VisibilityMap, SchemaError> {
    let raw: Map<String, Value> =
        serde_json::from_str(content).map_err(|e| SchemaError::json("visibility map", e))?;

    let mut map = HashMap::with_capacity(raw.len());
    for (key, value) in raw {
        match value.as_bool() {
            Some(visible) => {
                map.insert(key, visible);
            }
            None => warn!(key = %key, "ignoring non-boolean visibility entry"),
        }
    }
    Ok(map)
}
