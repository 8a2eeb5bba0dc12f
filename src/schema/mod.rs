pub mod field_model;
pub mod identifier;
