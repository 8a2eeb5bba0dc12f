//! Heuristic field-schema extraction for rendered HTML forms.
//!
//! Given a rendered document and an optional visibility map, [`extract`]
//! returns one [`FieldDescriptor`] per input-like control, in discovery
//! order, with inferred name, label, step, validation and options.

pub mod check;
pub mod cli;
pub mod error;
pub mod extract;
pub mod output;
pub mod schema;
pub mod trace;

pub use error::SchemaError;
pub use extract::extractor::{ExtractOptions, Extraction, VisibilityMap, extract, extract_with};
pub use schema::field_model::{FieldDescriptor, SelectOption, Validation};
pub use schema::identifier::to_camel;
