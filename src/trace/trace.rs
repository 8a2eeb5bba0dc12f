use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::extract::extractor::Extraction;
use crate::schema::field_model::FieldDescriptor;

/// One JSONL record per extraction run.
#[derive(Debug, Serialize)]
pub struct ExtractionEvent {
    pub timestamp_ms: u128,

    /// SHA-1 of the input document.
    pub document: String,

    pub container_kind: Option<String>,
    pub containers: usize,
    pub fields: usize,
    pub skipped_hidden: usize,
    pub hidden_by_layout: usize,
    pub fields_per_step: BTreeMap<u32, usize>,

    pub output: Option<String>,
}

impl ExtractionEvent {
    pub fn now(html: &str, extraction: &Extraction) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            document: document_fingerprint(html),
            container_kind: extraction.container_kind.map(|k| format!("{:?}", k)),
            containers: extraction.containers,
            fields: extraction.fields.len(),
            skipped_hidden: extraction.skipped_hidden,
            hidden_by_layout: extraction.fields.iter().filter(|f| !f.visible).count(),
            fields_per_step: fields_per_step(&extraction.fields),
            output: None,
        }
    }

    pub fn with_output(mut self, output: impl ToString) -> Self {
        self.output = Some(output.to_string());
        self
    }
}

pub fn fields_per_step(fields: &[FieldDescriptor]) -> BTreeMap<u32, usize> {
    let mut counts = BTreeMap::new();
    for f in fields {
        *counts.entry(f.step).or_insert(0) += 1;
    }
    counts
}

pub fn document_fingerprint(html: &str) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(html.as_bytes());
    format!("{:x}", hasher.finalize())
}
