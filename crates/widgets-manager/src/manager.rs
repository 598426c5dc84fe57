//! Widget manager.
//!
//! The manager is the only layer that swallows errors: a payload that fails to
//! resolve a schema, validate or construct is reported to the injected logger
//! and yields `None`. One malformed widget never aborts a batch.

use serde_json::Value;
use widgets_config::WidgetsConfig;
use widgets_core::{DataPolicy, IdGenerator, Widget, WidgetError};
use widgets_schema::{SchemaCatalog, SchemaSource};

use crate::handle::WidgetHandle;
use crate::logger::{NullLogger, WidgetLogger};

/// Entry point for loading and serializing widgets.
///
/// Owns the schema catalog, the id counter and the configuration. It is the
/// only layer that swallows failures: every error is reported once through
/// `L` and surfaces to the caller as `None`.
pub struct WidgetManager<L: WidgetLogger = NullLogger> {
    logger: L,
    catalog: SchemaCatalog,
    ids: IdGenerator,
    config: WidgetsConfig,
}

impl WidgetManager<NullLogger> {
    /// Manager with default configuration that discards failure reports.
    #[must_use]
    pub fn new() -> Self {
        Self::with_logger(NullLogger)
    }
}

impl Default for WidgetManager<NullLogger> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: WidgetLogger> WidgetManager<L> {
    #[must_use]
    pub fn with_logger(logger: L) -> Self {
        Self::with_config(WidgetsConfig::default(), logger)
    }

    #[must_use]
    pub fn with_config(config: WidgetsConfig, logger: L) -> Self {
        Self {
            logger,
            catalog: SchemaCatalog::with_data_var(config.validation.data_var.clone()),
            ids: IdGenerator::new(),
            config,
        }
    }

    /// Load a widget from its JSON form.
    ///
    /// Resolves the schema (`source`), validates `raw` against it and builds
    /// the widget. Any failure is reported once through the logger and `None`
    /// is returned.
    pub fn from_json<E: ?Sized>(
        &self,
        raw: &Value,
        source: impl Into<SchemaSource>,
    ) -> Option<WidgetHandle<E>> {
        match self.try_from_json(raw, source) {
            Ok(handle) => Some(handle),
            Err(error) => {
                self.logger.error(&error);
                None
            }
        }
    }

    /// Like [`WidgetManager::from_json`], but hands the error back instead of
    /// logging it.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::SchemaResolution` if `source` names no schema or
    /// holds an invalid custom schema, and `WidgetError::Creation` if the
    /// payload fails validation or construction.
    pub fn try_from_json<E: ?Sized>(
        &self,
        raw: &Value,
        source: impl Into<SchemaSource>,
    ) -> Result<WidgetHandle<E>, WidgetError> {
        let validator = self.catalog.resolve(&source.into())?;
        let widget = Widget::create(raw, &validator, &self.ids, self.data_policy())?;
        tracing::debug!(
            id = widget.id(),
            version = widget.version(),
            "widget loaded"
        );
        Ok(WidgetHandle::new(widget))
    }

    /// Load a widget with the configured default schema.
    pub fn load<E: ?Sized>(&self, raw: &Value) -> Option<WidgetHandle<E>> {
        self.from_json(raw, self.config.manager.default_schema)
    }

    /// Load every payload in `raws` against the same schema, skipping (and
    /// logging) the ones that fail.
    pub fn from_json_many<'a, E, I>(&self, raws: I, source: impl Into<SchemaSource>) -> Vec<WidgetHandle<E>>
    where
        E: ?Sized,
        I: IntoIterator<Item = &'a Value>,
    {
        let source = source.into();
        raws.into_iter()
            .enumerate()
            .filter_map(|(index, raw)| {
                let handle = self.from_json(raw, source.clone());
                if handle.is_none() {
                    tracing::warn!(index, "skipping widget that failed to load");
                }
                handle
            })
            .collect()
    }

    /// Serialize a widget.
    ///
    /// Returns `None`, after logging, when no widget is supplied or
    /// serialization fails.
    pub fn to_json<E: ?Sized>(&self, widget: Option<&Widget<E>>) -> Option<Value> {
        let result = widget
            .ok_or(WidgetError::MissingWidget)
            .and_then(Widget::to_json);
        match result {
            Ok(json) => Some(json),
            Err(error) => {
                self.logger.error(&error);
                None
            }
        }
    }

    const fn data_policy(&self) -> DataPolicy {
        if self.config.validation.strict_data {
            DataPolicy::MatchWidgetProps
        } else {
            DataPolicy::Unchecked
        }
    }

    #[must_use]
    pub const fn logger(&self) -> &L {
        &self.logger
    }

    #[must_use]
    pub const fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    #[must_use]
    pub const fn config(&self) -> &WidgetsConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;
    use widgets_schema::SchemaVariant;

    #[derive(Default)]
    struct Recorder {
        errors: Mutex<Vec<String>>,
    }

    impl WidgetLogger for Recorder {
        fn error(&self, error: &WidgetError) {
            self.errors.lock().unwrap().push(error.to_string());
        }

        fn log(&self, _message: &str) {}

        fn warn(&self, _message: &str) {}
    }

    #[test]
    fn strict_data_config_selects_policy() {
        let mut config = WidgetsConfig::default();
        config.validation.strict_data = true;
        let manager = WidgetManager::with_config(config, NullLogger);
        assert_eq!(manager.data_policy(), DataPolicy::MatchWidgetProps);
        assert_eq!(WidgetManager::new().data_policy(), DataPolicy::Unchecked);
    }

    #[test]
    fn data_var_config_reaches_messages() {
        let mut config = WidgetsConfig::default();
        config.validation.data_var = "widget".to_string();
        let manager = WidgetManager::with_config(config, Recorder::default());

        let handle = manager.from_json::<()>(&json!({}), SchemaVariant::New);
        assert!(handle.is_none());
        let errors = manager.logger().errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("widget \"config\""), "{}", errors[0]);
    }

    #[test]
    fn load_uses_configured_default_schema() {
        let mut config = WidgetsConfig::default();
        config.manager.default_schema = SchemaVariant::Existing;
        let manager = WidgetManager::with_config(config, Recorder::default());

        assert!(manager.load::<()>(&json!({"config": {}})).is_none());
        assert!(
            manager
                .load::<()>(&json!({"id": "a", "version": "a_v1", "config": {}, "widgetProps": {}}))
                .is_some()
        );
    }

    #[test]
    fn try_from_json_returns_error() {
        let manager = WidgetManager::new();
        let err = manager
            .try_from_json::<()>(&json!({"config": {}}), "unknown")
            .unwrap_err();
        assert!(matches!(err, WidgetError::SchemaResolution(_)));
    }
}
