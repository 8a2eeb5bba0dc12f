use std::path::PathBuf;

use thiserror::Error;

/// Failures at the edges of extraction: reading inputs and writing the schema.
///
/// Extraction itself never fails; malformed markup and missing attributes
/// are absorbed by the fallback chains.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Reading an input or writing the schema failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error ({context}): {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SchemaError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SchemaError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        SchemaError::Json {
            context: context.into(),
            source,
        }
    }
}
