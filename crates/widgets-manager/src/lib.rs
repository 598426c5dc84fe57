//! # widgets-manager
//!
//! Orchestrates the widget lifecycle for callers:
//! - `WidgetManager::from_json`: resolve a schema, validate, construct, and hand
//!   back a `WidgetHandle` (or log the failure and return `None`)
//! - `WidgetManager::to_json`: serialize a widget (or log and return `None`)
//! - `WidgetHandle::attach_render`: bind a caller-supplied render function
//! - `WidgetLogger`: the injected logging capability (`NullLogger` by default)

pub mod handle;
pub mod logger;
pub mod manager;

pub use handle::WidgetHandle;
pub use logger::{NullLogger, TracingLogger, WidgetLogger};
pub use manager::WidgetManager;
