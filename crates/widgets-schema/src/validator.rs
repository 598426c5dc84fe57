//! Compiled schema validators.
//!
//! A [`SchemaValidator`] is built once per schema document and reused for every
//! payload checked against it. [`SchemaValidator::verify`] hands the payload back
//! untouched on success, or returns a [`ValidationError`] listing every violation.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use jsonschema::error::ValidationErrorKind;
use serde::Serialize;
use serde_json::Value;

use crate::error::SchemaError;

/// Name used for the payload root in rendered violation messages.
pub const DEFAULT_DATA_VAR: &str = "schemaValidation";

/// Keyword whose violations are dropped from reports.
const CONDITIONAL_KEYWORD: &str = "if";

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// JSON pointer to the offending value inside the payload (`""` for the root).
    pub path: String,
    /// Human-readable description from the validation engine.
    pub message: String,
    /// Schema keyword that failed (`required`, `type`, `additionalProperties`, ...).
    pub keyword: String,
}

/// Payload failed schema validation.
///
/// Carries the moment the check ran and every reportable violation. The
/// `Display` output is the human-readable, timestamped summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub at: DateTime<Utc>,
    pub violations: Vec<Violation>,
    data_var: String,
}

impl ValidationError {
    /// Keywords of all reported violations, in report order.
    #[must_use]
    pub fn keywords(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.keyword.as_str()).collect()
    }

    /// Render the violation list without the timestamp prefix.
    #[must_use]
    pub fn errors_text(&self) -> String {
        if self.violations.is_empty() {
            return "no reportable violations".to_string();
        }
        self.violations
            .iter()
            .map(|v| format!("{}{} {}", self.data_var, v.path, v.message))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] schema validation failed: {}",
            self.at.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.errors_text()
        )
    }
}

impl std::error::Error for ValidationError {}

/// A schema compiled into a reusable validation function.
pub struct SchemaValidator {
    schema: Value,
    compiled: jsonschema::Validator,
    data_var: String,
}

impl SchemaValidator {
    /// Compile `schema`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Compilation` if the document is not a valid schema
    /// (unknown types, unresolvable `$ref`, ...).
    pub fn compile(schema: Value) -> Result<Self, SchemaError> {
        let compiled = jsonschema::validator_for(&schema)
            .map_err(|e| SchemaError::Compilation(format!("{e}")))?;
        Ok(Self {
            schema,
            compiled,
            data_var: DEFAULT_DATA_VAR.to_string(),
        })
    }

    /// Use `data_var` as the payload root name in rendered messages.
    #[must_use]
    pub fn with_data_var(mut self, data_var: impl Into<String>) -> Self {
        self.data_var = data_var.into();
        self
    }

    /// The schema document this validator was compiled from.
    #[must_use]
    pub const fn schema(&self) -> &Value {
        &self.schema
    }

    /// Check `data` against the schema, returning it unchanged on success.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` enumerating every violation except those raised
    /// by the `if` keyword. A payload rejected only by `if` violations still
    /// fails, with an empty violation list.
    pub fn verify<'a>(&self, data: &'a Value) -> Result<&'a Value, ValidationError> {
        let found = self.compiled.iter_errors(data).map(|e| violation_of(&e)).collect();
        self.settle(data, found)
    }

    fn settle<'a>(
        &self,
        data: &'a Value,
        found: Vec<Violation>,
    ) -> Result<&'a Value, ValidationError> {
        if found.is_empty() {
            return Ok(data);
        }
        Err(ValidationError {
            at: Utc::now(),
            violations: reportable(found),
            data_var: self.data_var.clone(),
        })
    }

    /// Whether `data` satisfies the schema.
    #[must_use]
    pub fn is_valid(&self, data: &Value) -> bool {
        self.compiled.is_valid(data)
    }
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("schema", &self.schema)
            .field("data_var", &self.data_var)
            .finish_non_exhaustive()
    }
}

fn violation_of(error: &jsonschema::ValidationError<'_>) -> Violation {
    let schema_path = error.schema_path.to_string();
    Violation {
        path: error.instance_path.to_string(),
        message: format!("{error}"),
        keyword: keyword_of(&error.kind, &schema_path).to_string(),
    }
}

/// Drop violations raised by the conditional keyword; everything else is kept in order.
fn reportable(found: Vec<Violation>) -> Vec<Violation> {
    found
        .into_iter()
        .filter(|v| v.keyword != CONDITIONAL_KEYWORD)
        .collect()
}

/// Schema keyword behind an engine error.
///
/// Derived from the error kind rather than the schema path: a `false`
/// subschema sits at `/properties/<name>`, whose last segment is a property
/// name. Only user-defined keywords fall back to the path.
fn keyword_of<'a>(kind: &ValidationErrorKind, schema_path: &'a str) -> &'a str {
    match kind {
        ValidationErrorKind::AdditionalItems { .. } => "additionalItems",
        ValidationErrorKind::AdditionalProperties { .. } => "additionalProperties",
        ValidationErrorKind::AnyOf => "anyOf",
        ValidationErrorKind::BacktrackLimitExceeded { .. } | ValidationErrorKind::Pattern { .. } => {
            "pattern"
        }
        ValidationErrorKind::Constant { .. } => "const",
        ValidationErrorKind::Contains => "contains",
        ValidationErrorKind::ContentEncoding { .. } | ValidationErrorKind::FromUtf8 { .. } => {
            "contentEncoding"
        }
        ValidationErrorKind::ContentMediaType { .. } => "contentMediaType",
        ValidationErrorKind::Enum { .. } => "enum",
        ValidationErrorKind::ExclusiveMaximum { .. } => "exclusiveMaximum",
        ValidationErrorKind::ExclusiveMinimum { .. } => "exclusiveMinimum",
        ValidationErrorKind::FalseSchema => "false schema",
        ValidationErrorKind::Format { .. } => "format",
        ValidationErrorKind::MaxItems { .. } => "maxItems",
        ValidationErrorKind::Maximum { .. } => "maximum",
        ValidationErrorKind::MaxLength { .. } => "maxLength",
        ValidationErrorKind::MaxProperties { .. } => "maxProperties",
        ValidationErrorKind::MinItems { .. } => "minItems",
        ValidationErrorKind::Minimum { .. } => "minimum",
        ValidationErrorKind::MinLength { .. } => "minLength",
        ValidationErrorKind::MinProperties { .. } => "minProperties",
        ValidationErrorKind::MultipleOf { .. } => "multipleOf",
        ValidationErrorKind::Not { .. } => "not",
        ValidationErrorKind::OneOfMultipleValid | ValidationErrorKind::OneOfNotValid => "oneOf",
        ValidationErrorKind::PropertyNames { .. } => "propertyNames",
        ValidationErrorKind::Required { .. } => "required",
        ValidationErrorKind::Type { .. } => "type",
        ValidationErrorKind::UnevaluatedItems { .. } => "unevaluatedItems",
        ValidationErrorKind::UnevaluatedProperties { .. } => "unevaluatedProperties",
        ValidationErrorKind::UniqueItems => "uniqueItems",
        ValidationErrorKind::Referencing(_) => "$ref",
        ValidationErrorKind::Custom { .. } => {
            schema_path.rsplit('/').next().unwrap_or(schema_path)
        }
    }
}
