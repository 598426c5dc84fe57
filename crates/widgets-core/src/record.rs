//! Wire shapes of a widget.
//!
//! [`RawWidget`] is what callers hand in (after schema validation), and
//! [`WidgetRecord`] is what a widget serializes to. The record intentionally
//! leaves out `data` and `status`: both are internal state, not part of the
//! persisted representation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Incoming widget payload. `id`/`version` absent means "new widget".
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWidget {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default = "empty_object")]
    pub config: Value,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub widget_props: Option<Value>,
}

/// Serialized projection of a widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WidgetRecord {
    pub id: String,
    pub version: String,
    pub config: Value,
    pub widget_props: Value,
}
