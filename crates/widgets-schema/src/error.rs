//! Schema resolution and compilation error types.

use thiserror::Error;

/// Errors raised while resolving or compiling a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Requested schema name was not found in the catalog.
    #[error("Schema not found: {0}")]
    NotFound(String),

    /// The schema document could not be compiled into a validator.
    #[error("Schema compilation error: {0}")]
    Compilation(String),
}
