pub mod containers;
pub mod document;
pub mod extractor;
pub mod label;
pub mod rules;
