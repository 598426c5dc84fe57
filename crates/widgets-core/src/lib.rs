//! # widgets-core
//!
//! The widget entity and the types it is built from:
//! - `Widget`: a validated, identified, versioned configuration object with an
//!   attachable render function
//! - `WidgetStatus`: lifecycle state (`loading` -> `done` | `failed`)
//! - `IdGenerator`: id/version synthesis for widgets that arrive without them
//! - `RawWidget` / `WidgetRecord`: the input shape and the serialized projection
//! - `WidgetError`: every failure a widget operation can raise
//!
//! Widgets propagate all errors to their caller. Turning failures into logged,
//! swallowed results is the manager's job (see `widgets-manager`).

pub mod error;
pub mod ids;
pub mod record;
pub mod status;
pub mod widget;

pub use error::WidgetError;
pub use ids::{IdGenerator, default_version};
pub use record::{RawWidget, WidgetRecord};
pub use status::WidgetStatus;
pub use widget::{DataPolicy, RenderFn, Widget};
