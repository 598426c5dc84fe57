//! # widgets-schema
//!
//! Schema catalog and JSON Schema validation for widget payloads.
//!
//! This crate provides:
//! - `SchemaCatalog`: the two built-in widget schemas (`new`, `existing`) plus a
//!   compile-once cache for caller-supplied custom schemas
//! - `SchemaValidator`: a compiled schema exposing `verify(data) -> data | error`
//! - `ValidationError`: a timestamped report of every schema violation
//!
//! Validation is delegated to the `jsonschema` crate. Violations attributed to the
//! `if` keyword are not reported, since conditional-branch mismatches are not
//! user-facing errors.

pub mod catalog;
pub mod error;
pub mod validator;

pub use catalog::{SchemaCatalog, SchemaSource, SchemaVariant, create_widget_schema, edit_widget_schema};
pub use error::SchemaError;
pub use validator::{DEFAULT_DATA_VAR, SchemaValidator, ValidationError, Violation};
