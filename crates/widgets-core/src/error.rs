//! Widget error types.
//!
//! The widget itself propagates every error. Construction failures are wrapped
//! in [`WidgetError::Creation`], which keeps the payload and schema that were
//! being processed alongside the original error.

use serde_json::Value;
use thiserror::Error;
use widgets_schema::{SchemaError, ValidationError};

#[derive(Debug, Error)]
pub enum WidgetError {
    /// No schema could be resolved for the requested source.
    #[error("Schema resolution failed: {0}")]
    SchemaResolution(#[from] SchemaError),

    /// The payload violated its schema.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The payload passed its schema but does not have the widget shape
    /// (possible with permissive custom schemas).
    #[error("Malformed widget payload: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Construction failed. Carries the offending payload and schema.
    #[error("Widget creation failed: {source} | widget={payload} | schema={schema}")]
    Creation {
        payload: Value,
        schema: Value,
        #[source]
        source: Box<WidgetError>,
    },

    /// Assigned data does not match the widget's `widgetProps` declarations.
    #[error("Invalid widget data for key '{key}': {reason}")]
    InvalidData { key: String, reason: String },

    /// `render` was called before a render function was attached.
    #[error("No render method was attached to widget {id}")]
    RenderNotAttached { id: String },

    /// The attached render function failed.
    #[error("Render failed: {0}")]
    Render(#[source] anyhow::Error),

    /// The widget could not be serialized.
    #[error("Widget serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// No widget was supplied.
    #[error("No widget supplied")]
    MissingWidget,
}

impl WidgetError {
    /// The innermost error, looking through any `Creation` wrappers.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Creation { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Wrap `self` with the payload and schema that were being processed.
    #[must_use]
    pub fn in_creation(self, payload: &Value, schema: &Value) -> Self {
        Self::Creation {
            payload: payload.clone(),
            schema: schema.clone(),
            source: Box::new(self),
        }
    }

    /// Whether the underlying failure is a schema violation.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self.root_cause(), Self::Validation(_))
    }
}
