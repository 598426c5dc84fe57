//! # widgets
//!
//! Describe, validate and instantiate configuration-driven widgets.
//!
//! A widget's shape is declared with JSON Schema; its lifecycle
//! (load -> validate -> set data -> render -> serialize) is driven by a
//! [`WidgetManager`]. Rendering itself is supplied by the caller through
//! [`WidgetHandle::attach_render`].
//!
//! ```
//! use serde_json::json;
//! use widgets::{SchemaVariant, WidgetHandle, WidgetManager};
//!
//! let manager = WidgetManager::new();
//! let mut handle: WidgetHandle<String> = manager
//!     .from_json(&json!({"config": {"title": "Revenue"}}), SchemaVariant::New)
//!     .expect("valid widget");
//!
//! let widget = handle.attach_render("revenue-panel", |name, out: &mut String| {
//!     out.push_str(name);
//!     Ok(())
//! });
//!
//! let mut out = String::new();
//! widget.render(&mut out).unwrap();
//! assert_eq!(out, "revenue-panel");
//!
//! let json = manager.to_json(Some(handle.instance())).unwrap();
//! assert_eq!(json["version"], format!("{}_v1", json["id"].as_str().unwrap()));
//! ```

pub use widgets_config::{
    ConfigError, LOCAL_CONFIG_FILE, ManagerConfig, ValidationConfig, WidgetsConfig,
};
pub use widgets_core::{
    DataPolicy, IdGenerator, RawWidget, RenderFn, Widget, WidgetError, WidgetRecord, WidgetStatus,
    default_version,
};
pub use widgets_manager::{NullLogger, TracingLogger, WidgetHandle, WidgetLogger, WidgetManager};
pub use widgets_schema::{
    DEFAULT_DATA_VAR, SchemaCatalog, SchemaError, SchemaSource, SchemaValidator, SchemaVariant,
    ValidationError, Violation, create_widget_schema, edit_widget_schema,
};
