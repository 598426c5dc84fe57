//! Built-in widget schemas and schema resolution.
//!
//! The catalog ships two documents: `new` (a widget that has never been
//! persisted, so `id`/`version` are generated) and `existing` (a round-tripped
//! widget carrying its identifiers). Callers may also bring their own schema;
//! those are compiled on first use and cached by their canonical JSON text.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::SchemaError;
use crate::validator::SchemaValidator;

/// Named schema variant from the built-in catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaVariant {
    /// No `id`/`version` required; they are generated on construction.
    #[default]
    New,
    /// `id`, `version`, `config` and `widgetProps` all required.
    Existing,
}

impl SchemaVariant {
    pub const ALL: [Self; 2] = [Self::New, Self::Existing];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Existing => "existing",
        }
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVariant {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| SchemaError::NotFound(s.to_string()))
    }
}

/// Which schema governs an incoming widget payload.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaSource {
    /// A built-in catalog entry.
    Variant(SchemaVariant),
    /// A catalog entry looked up by name, e.g. one read from stored settings.
    Named(String),
    /// An ad-hoc schema supplied by the caller, bypassing the catalog.
    Custom(Value),
}

impl Default for SchemaSource {
    fn default() -> Self {
        Self::Variant(SchemaVariant::New)
    }
}

impl From<SchemaVariant> for SchemaSource {
    fn from(variant: SchemaVariant) -> Self {
        Self::Variant(variant)
    }
}

impl From<Value> for SchemaSource {
    fn from(schema: Value) -> Self {
        Self::Custom(schema)
    }
}

impl From<&str> for SchemaSource {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

/// Schema for widgets being created for the first time.
#[must_use]
pub fn create_widget_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "config": {
                "type": "object",
                "description": "Widget Config",
                "additionalProperties": true,
                "properties": {}
            },
            "widgetProps": {
                "type": "object",
                "description": "This defines the widget's component props ( @Input )",
                "additionalProperties": true,
                "properties": {}
            },
            "data": {
                "$ref": "#/properties/widgetProps"
            }
        },
        "required": ["config"],
        "additionalProperties": false
    })
}

/// Schema for widgets that already carry an identity and version.
#[must_use]
pub fn edit_widget_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "widgetProps": {
                "type": "object",
                "description": "This defines the widget's component props ( @Input )",
                "additionalProperties": true,
                "properties": {}
            },
            "config": {
                "type": "object",
                "description": "Widget Config",
                "additionalProperties": true,
                "properties": {}
            },
            "version": {
                "type": "string",
                "description": "Widget's Version"
            },
            "id": {
                "type": "string",
                "description": "Widget's ID"
            },
            "data": {
                "$ref": "#/properties/widgetProps"
            }
        },
        "required": ["config", "version", "id", "widgetProps"],
        "additionalProperties": false
    })
}

/// Built-in schemas plus a compile-once cache of custom schemas.
pub struct SchemaCatalog {
    builtin: HashMap<SchemaVariant, Arc<SchemaValidator>>,
    custom: Mutex<HashMap<String, Arc<SchemaValidator>>>,
    data_var: Option<String>,
}

impl SchemaCatalog {
    /// Build the catalog, compiling both built-in schemas.
    ///
    /// # Panics
    ///
    /// Panics if a built-in schema fails to compile. Both documents are
    /// constants covered by tests, so this does not happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Build the catalog with a custom payload root name for violation messages.
    ///
    /// # Panics
    ///
    /// Same conditions as [`SchemaCatalog::new`].
    #[must_use]
    pub fn with_data_var(data_var: impl Into<String>) -> Self {
        Self::build(Some(data_var.into()))
    }

    fn build(data_var: Option<String>) -> Self {
        let builtin = SchemaVariant::ALL
            .into_iter()
            .map(|variant| {
                let mut validator = SchemaValidator::compile(Self::document(variant))
                    .expect("built-in widget schema compiles");
                if let Some(data_var) = &data_var {
                    validator = validator.with_data_var(data_var.clone());
                }
                (variant, Arc::new(validator))
            })
            .collect();

        Self {
            builtin,
            custom: Mutex::new(HashMap::new()),
            data_var,
        }
    }

    fn document(variant: SchemaVariant) -> Value {
        match variant {
            SchemaVariant::New => create_widget_schema(),
            SchemaVariant::Existing => edit_widget_schema(),
        }
    }

    /// Get a built-in schema document by name. Returns `None` if not found.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        let variant = name.parse::<SchemaVariant>().ok()?;
        Some(self.lookup(variant))
    }

    /// The schema document for a built-in variant.
    #[must_use]
    pub fn lookup(&self, variant: SchemaVariant) -> &Value {
        self.builtin[&variant].schema()
    }

    /// The compiled validator for a built-in variant.
    #[must_use]
    pub fn validator(&self, variant: SchemaVariant) -> Arc<SchemaValidator> {
        Arc::clone(&self.builtin[&variant])
    }

    /// Resolve a schema source to a compiled validator.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` for an unknown catalog name, or
    /// `SchemaError::Compilation` if a custom schema is not a valid schema.
    pub fn resolve(&self, source: &SchemaSource) -> Result<Arc<SchemaValidator>, SchemaError> {
        match source {
            SchemaSource::Variant(variant) => Ok(self.validator(*variant)),
            SchemaSource::Named(name) => Ok(self.validator(name.parse()?)),
            SchemaSource::Custom(schema) => self.compile_custom(schema),
        }
    }

    fn compile_custom(&self, schema: &Value) -> Result<Arc<SchemaValidator>, SchemaError> {
        let key = schema.to_string();
        if let Some(validator) = self.custom_cache().get(&key) {
            return Ok(Arc::clone(validator));
        }

        // Compile without the lock; a racing caller may compile the same
        // document, but only the first insert is kept and handed out.
        let mut validator = SchemaValidator::compile(schema.clone())?;
        if let Some(data_var) = &self.data_var {
            validator = validator.with_data_var(data_var.clone());
        }
        let mut cache = self.custom_cache();
        let cached = cache.entry(key).or_insert_with(|| Arc::new(validator));
        Ok(Arc::clone(cached))
    }

    fn custom_cache(&self) -> MutexGuard<'_, HashMap<String, Arc<SchemaValidator>>> {
        self.custom.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drop every cached custom validator.
    ///
    /// The cache is unbounded: one entry per distinct custom document. Callers
    /// that feed many one-off schemas can clear it; validators already handed
    /// out stay usable.
    pub fn clear_custom(&self) {
        self.custom_cache().clear();
    }

    /// Number of custom schemas compiled so far.
    #[must_use]
    pub fn custom_count(&self) -> usize {
        self.custom_cache().len()
    }

    /// List all built-in schema names.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.builtin.keys().map(|v| v.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Number of built-in schemas.
    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.builtin.len()
    }
}

impl Default for SchemaCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SchemaCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaCatalog")
            .field("builtin", &self.list())
            .field("custom", &self.custom_count())
            .finish()
    }
}
