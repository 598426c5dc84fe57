//! Logger capability injected into the manager.
//!
//! The manager reports swallowed failures through a [`WidgetLogger`]. The default
//! is [`NullLogger`], which drops everything; [`TracingLogger`] forwards to
//! `tracing` with structured fields.

use std::sync::Arc;

use widgets_core::WidgetError;

/// Sink for failures and notices the manager does not return to its caller.
pub trait WidgetLogger: Send + Sync {
    /// A failed operation; called once per swallowed error.
    fn error(&self, error: &WidgetError);
    /// Informational message.
    fn log(&self, message: &str);
    /// Recoverable problem, e.g. a batch entry that was skipped.
    fn warn(&self, message: &str);
}

/// Logger that ignores every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl WidgetLogger for NullLogger {
    fn error(&self, _error: &WidgetError) {}

    fn log(&self, _message: &str) {}

    fn warn(&self, _message: &str) {}
}

/// Logger that emits `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl WidgetLogger for TracingLogger {
    fn error(&self, error: &WidgetError) {
        tracing::error!(%error, root_cause = %error.root_cause(), "widget operation failed");
    }

    fn log(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

impl<L: WidgetLogger + ?Sized> WidgetLogger for &L {
    fn error(&self, error: &WidgetError) {
        (**self).error(error);
    }

    fn log(&self, message: &str) {
        (**self).log(message);
    }

    fn warn(&self, message: &str) {
        (**self).warn(message);
    }
}

impl<L: WidgetLogger + ?Sized> WidgetLogger for Arc<L> {
    fn error(&self, error: &WidgetError) {
        (**self).error(error);
    }

    fn log(&self, message: &str) {
        (**self).log(message);
    }

    fn warn(&self, message: &str) {
        (**self).warn(message);
    }
}
