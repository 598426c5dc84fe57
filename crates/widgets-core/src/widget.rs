//! The widget entity.
//!
//! A [`Widget`] is only ever built from a payload that passed its schema. After
//! construction it changes through two doors: [`Widget::set_data`] (replaces the
//! data and recomputes the status) and [`Widget::set_render`] (installs the
//! render function supplied by the UI layer).
//!
//! `E` is the render target type handed to the render function.

use std::fmt;

use serde_json::{Map, Value};
use widgets_schema::SchemaValidator;

use crate::error::WidgetError;
use crate::ids::{IdGenerator, default_version};
use crate::record::{RawWidget, WidgetRecord};
use crate::status::WidgetStatus;

/// Render function installed on a widget.
pub type RenderFn<E> = Box<dyn Fn(&mut E) -> anyhow::Result<()> + Send + Sync>;

/// How assigned data is checked beyond the construction-time schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataPolicy {
    /// Data is taken as-is.
    #[default]
    Unchecked,
    /// Every data key must be declared in `widgetProps`, and a declared
    /// `type` must match the value's type name (`string`, `number`,
    /// `boolean`, `object`).
    MatchWidgetProps,
}

/// A validated widget: identity, configuration, props, current data and status,
/// plus the render function once one is attached.
///
/// Built only through [`Widget::create`], so every instance passed its schema.
pub struct Widget<E: ?Sized> {
    id: String,
    version: String,
    status: WidgetStatus,
    config: Value,
    widget_props: Value,
    data: Value,
    policy: DataPolicy,
    render: Option<RenderFn<E>>,
}

impl<E: ?Sized> Widget<E> {
    /// Validate `raw` against `validator` and construct a widget from it.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::Creation` wrapping the underlying failure
    /// (`Validation`, `Malformed` or `InvalidData`) together with the payload
    /// and the schema it was checked against.
    pub fn create(
        raw: &Value,
        validator: &SchemaValidator,
        ids: &IdGenerator,
        policy: DataPolicy,
    ) -> Result<Self, WidgetError> {
        Self::validate_and_build(raw, validator, ids, policy)
            .map_err(|err| err.in_creation(raw, validator.schema()))
    }

    fn validate_and_build(
        raw: &Value,
        validator: &SchemaValidator,
        ids: &IdGenerator,
        policy: DataPolicy,
    ) -> Result<Self, WidgetError> {
        validator.verify(raw)?;
        let raw: RawWidget = serde_json::from_value(raw.clone()).map_err(WidgetError::Malformed)?;
        Self::from_raw(raw, ids, policy)
    }

    fn from_raw(raw: RawWidget, ids: &IdGenerator, policy: DataPolicy) -> Result<Self, WidgetError> {
        let id = ids.assign(raw.id.as_deref());
        let version = raw
            .version
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default_version(&id));

        let mut widget = Self {
            id,
            version,
            status: WidgetStatus::Loading,
            config: raw.config,
            widget_props: raw.widget_props.unwrap_or_else(empty_object),
            data: empty_object(),
            policy,
            render: None,
        };
        widget.set_data(raw.data.unwrap_or_else(empty_object))?;
        Ok(widget)
    }

    /// Replace the widget's data.
    ///
    /// On success the status becomes `done`. On failure the status becomes
    /// `failed`, the previous data is kept, and the error is returned.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::InvalidData` when the policy is
    /// [`DataPolicy::MatchWidgetProps`] and `data` does not match the
    /// `widgetProps` declarations.
    pub fn set_data(&mut self, data: Value) -> Result<(), WidgetError> {
        if let Err(err) = self.check_data(&data) {
            self.transition(WidgetStatus::Failed);
            return Err(err);
        }
        self.data = data;
        self.transition(WidgetStatus::Done);
        Ok(())
    }

    fn transition(&mut self, next: WidgetStatus) {
        debug_assert!(
            self.status.can_transition_to(next),
            "invalid widget status transition {} -> {next}",
            self.status
        );
        self.status = next;
    }

    fn check_data(&self, data: &Value) -> Result<(), WidgetError> {
        match self.policy {
            DataPolicy::Unchecked => Ok(()),
            DataPolicy::MatchWidgetProps => check_against_props(data, &self.widget_props),
        }
    }

    /// The serialized projection of this widget.
    #[must_use]
    pub fn record(&self) -> WidgetRecord {
        WidgetRecord {
            id: self.id.clone(),
            version: self.version.clone(),
            config: self.config.clone(),
            widget_props: self.widget_props.clone(),
        }
    }

    /// Serialize to `{ id, version, config, widgetProps }`.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::Serialization` if the record cannot be converted.
    pub fn to_json(&self) -> Result<Value, WidgetError> {
        serde_json::to_value(self.record()).map_err(WidgetError::Serialization)
    }

    /// Render into `target` with the attached render function.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::RenderNotAttached` until a render function is
    /// installed, and `WidgetError::Render` if the installed function fails.
    pub fn render(&self, target: &mut E) -> Result<(), WidgetError> {
        let render = self
            .render
            .as_ref()
            .ok_or_else(|| WidgetError::RenderNotAttached {
                id: self.id.clone(),
            })?;
        render(target).map_err(WidgetError::Render)
    }

    /// Install the render function, replacing any previous one.
    pub fn set_render<F>(&mut self, render: F)
    where
        F: Fn(&mut E) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.render = Some(Box::new(render));
    }

    #[must_use]
    pub const fn has_render(&self) -> bool {
        self.render.is_some()
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub const fn status(&self) -> WidgetStatus {
        self.status
    }

    #[must_use]
    pub const fn config(&self) -> &Value {
        &self.config
    }

    #[must_use]
    pub const fn widget_props(&self) -> &Value {
        &self.widget_props
    }

    #[must_use]
    pub const fn data(&self) -> &Value {
        &self.data
    }

    #[must_use]
    pub const fn policy(&self) -> DataPolicy {
        self.policy
    }
}

impl<E: ?Sized> fmt::Debug for Widget<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Widget")
            .field("id", &self.id)
            .field("version", &self.version)
            .field("status", &self.status)
            .field("config", &self.config)
            .field("widget_props", &self.widget_props)
            .field("data", &self.data)
            .field("policy", &self.policy)
            .field("render_attached", &self.render.is_some())
            .finish()
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Type name as written in `widgetProps` declarations.
const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::Null | Value::Array(_) | Value::Object(_) => "object",
    }
}

fn check_against_props(data: &Value, widget_props: &Value) -> Result<(), WidgetError> {
    let Some(entries) = data.as_object() else {
        return Err(WidgetError::InvalidData {
            key: String::new(),
            reason: format!("data must be an object, got {}", type_name(data)),
        });
    };

    for (key, value) in entries {
        let Some(declared) = widget_props.get(key) else {
            return Err(WidgetError::InvalidData {
                key: key.clone(),
                reason: "not declared in widgetProps".to_string(),
            });
        };
        if let Some(expected) = declared.get("type").and_then(Value::as_str) {
            let actual = type_name(value);
            if expected != actual {
                return Err(WidgetError::InvalidData {
                    key: key.clone(),
                    reason: format!("{actual} value does not match declared type {expected}"),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use widgets_schema::{SchemaCatalog, SchemaVariant};

    type TestWidget = Widget<Vec<String>>;

    fn create(raw: &Value, variant: SchemaVariant) -> Result<TestWidget, WidgetError> {
        let catalog = SchemaCatalog::new();
        Widget::create(
            raw,
            &catalog.validator(variant),
            &IdGenerator::new(),
            DataPolicy::Unchecked,
        )
    }

    fn strict(raw: &Value) -> TestWidget {
        let catalog = SchemaCatalog::new();
        Widget::create(
            raw,
            &catalog.validator(SchemaVariant::New),
            &IdGenerator::new(),
            DataPolicy::MatchWidgetProps,
        )
        .expect("valid widget")
    }

    #[test]
    fn create_keeps_supplied_identifiers() {
        let raw = json!({
            "id": "test-id",
            "version": "v1",
            "config": {},
            "widgetProps": {}
        });
        let widget = create(&raw, SchemaVariant::Existing).unwrap();
        assert_eq!(widget.id(), "test-id");
        assert_eq!(widget.version(), "v1");
    }

    #[test]
    fn create_generates_missing_identifiers() {
        let ids = IdGenerator::new();
        let catalog = SchemaCatalog::new();
        let validator = catalog.validator(SchemaVariant::New);
        let widget: TestWidget =
            Widget::create(&json!({"config": {}}), &validator, &ids, DataPolicy::Unchecked)
                .unwrap();

        assert!(widget.id().ends_with("_1"));
        assert_eq!(widget.version(), format!("{}_v1", widget.id()));
        assert_eq!(ids.count(), 1);
    }

    #[test]
    fn default_version_derives_from_supplied_id() {
        let permissive = SchemaValidator::compile(json!({"type": "object"})).unwrap();
        let widget: TestWidget = Widget::create(
            &json!({"id": "test-id", "config": {"widgetProps": {"name": {"type": "string"}}}}),
            &permissive,
            &IdGenerator::new(),
            DataPolicy::Unchecked,
        )
        .unwrap();

        let record = widget.record();
        assert_eq!(record.id, "test-id");
        assert_eq!(record.version, "test-id_v1");
        assert_eq!(
            record.config,
            json!({"widgetProps": {"name": {"type": "string"}}})
        );
    }

    #[test]
    fn empty_identifiers_are_treated_as_absent() {
        let permissive = SchemaValidator::compile(json!({})).unwrap();
        let widget: TestWidget = Widget::create(
            &json!({"id": "", "version": "", "config": {}}),
            &permissive,
            &IdGenerator::new(),
            DataPolicy::Unchecked,
        )
        .unwrap();
        assert!(!widget.id().is_empty());
        assert_eq!(widget.version(), format!("{}_v1", widget.id()));
    }

    #[test]
    fn construction_applies_initial_data() {
        let raw = json!({"config": {}, "data": {"name": "q3"}});
        let widget = create(&raw, SchemaVariant::New).unwrap();
        assert_eq!(widget.status(), WidgetStatus::Done);
        assert_eq!(widget.data(), &json!({"name": "q3"}));
        assert_eq!(widget.widget_props(), &json!({}));
    }

    #[test]
    fn validation_failure_is_wrapped_with_context() {
        let raw = json!({"widgetProps": {}});
        let err = create(&raw, SchemaVariant::New).unwrap_err();

        let WidgetError::Creation { payload, schema, .. } = &err else {
            panic!("expected Creation, got {err:?}");
        };
        assert_eq!(payload, &raw);
        assert_eq!(schema, &widgets_schema::create_widget_schema());
        assert!(err.is_validation());
    }

    #[test]
    fn malformed_payload_under_permissive_schema() {
        let permissive = SchemaValidator::compile(json!({})).unwrap();
        let err = Widget::<()>::create(
            &json!({"id": 5, "config": {}}),
            &permissive,
            &IdGenerator::new(),
            DataPolicy::Unchecked,
        )
        .unwrap_err();
        assert!(matches!(err.root_cause(), WidgetError::Malformed(_)));
    }

    #[test]
    fn set_data_replaces_data_and_marks_done() {
        let mut widget = create(&json!({"config": {}}), SchemaVariant::New).unwrap();
        widget.set_data(json!({"name": "testName"})).unwrap();
        assert_eq!(widget.data(), &json!({"name": "testName"}));
        assert_eq!(widget.status(), WidgetStatus::Done);
    }

    #[test]
    fn strict_policy_accepts_declared_props() {
        let mut widget = strict(&json!({
            "config": {},
            "widgetProps": {"name": {"type": "string"}, "count": {"type": "number"}}
        }));
        widget
            .set_data(json!({"name": "testName", "count": 3}))
            .unwrap();
        assert_eq!(widget.status(), WidgetStatus::Done);
    }

    #[test]
    fn strict_policy_rejects_undeclared_key() {
        let mut widget = strict(&json!({"config": {}, "widgetProps": {"name": {"type": "string"}}}));
        let err = widget.set_data(json!({"age": 3})).unwrap_err();
        assert!(matches!(err, WidgetError::InvalidData { ref key, .. } if key == "age"));
        assert_eq!(widget.status(), WidgetStatus::Failed);
        assert_eq!(widget.data(), &json!({}));
    }

    #[test]
    fn strict_policy_rejects_type_mismatch() {
        let mut widget = strict(&json!({"config": {}, "widgetProps": {"name": {"type": "string"}}}));
        let err = widget.set_data(json!({"name": 42})).unwrap_err();
        assert!(err.to_string().contains("number value does not match declared type string"));
        assert_eq!(widget.status(), WidgetStatus::Failed);

        widget.set_data(json!({"name": "ok"})).unwrap();
        assert_eq!(widget.status(), WidgetStatus::Done);
    }

    #[test]
    fn repeated_assignments_follow_status_transitions() {
        let mut widget = strict(&json!({"config": {}, "widgetProps": {"n": {"type": "number"}}}));
        let mut seen = vec![widget.status()];
        for data in [json!({"n": "x"}), json!({"n": "y"}), json!({"n": 1}), json!({"n": 2})] {
            let _ = widget.set_data(data);
            seen.push(widget.status());
        }

        assert_eq!(
            seen,
            vec![
                WidgetStatus::Done,
                WidgetStatus::Failed,
                WidgetStatus::Failed,
                WidgetStatus::Done,
                WidgetStatus::Done,
            ]
        );
        assert!(seen.windows(2).all(|w| w[0].can_transition_to(w[1])));
    }

    #[test]
    fn strict_policy_rejects_invalid_initial_data() {
        let catalog = SchemaCatalog::new();
        let err = Widget::<()>::create(
            &json!({"config": {}, "widgetProps": {}, "data": {"name": "x"}}),
            &catalog.validator(SchemaVariant::New),
            &IdGenerator::new(),
            DataPolicy::MatchWidgetProps,
        )
        .unwrap_err();
        assert!(matches!(err.root_cause(), WidgetError::InvalidData { .. }));
    }

    #[test]
    fn to_json_is_canonical_and_idempotent() {
        let widget = create(
            &json!({"config": {"title": "t"}, "widgetProps": {"x": {}}, "data": {"x": 1}}),
            SchemaVariant::New,
        )
        .unwrap();
        let first = widget.to_json().unwrap();
        let second = widget.to_json().unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first,
            json!({
                "id": widget.id(),
                "version": widget.version(),
                "config": {"title": "t"},
                "widgetProps": {"x": {}}
            })
        );
    }

    #[test]
    fn serialized_record_passes_existing_schema() {
        let catalog = SchemaCatalog::new();
        let widget = create(&json!({"config": {}}), SchemaVariant::New).unwrap();
        let json = widget.to_json().unwrap();
        assert!(catalog.validator(SchemaVariant::Existing).is_valid(&json));
    }

    #[test]
    fn render_without_attachment_fails() {
        let widget = create(&json!({"config": {}}), SchemaVariant::New).unwrap();
        let mut target = Vec::new();
        let err = widget.render(&mut target).unwrap_err();
        assert!(matches!(err, WidgetError::RenderNotAttached { .. }));
        assert!(!widget.has_render());
    }

    #[test]
    fn attached_render_receives_target() {
        let mut widget = create(&json!({"config": {}}), SchemaVariant::New).unwrap();
        widget.set_render(|target: &mut Vec<String>| {
            target.push("mounted".to_string());
            Ok(())
        });
        let mut target = Vec::new();
        widget.render(&mut target).unwrap();
        assert_eq!(target, vec!["mounted".to_string()]);
    }

    #[test]
    fn render_failure_is_surfaced() {
        let mut widget = create(&json!({"config": {}}), SchemaVariant::New).unwrap();
        widget.set_render(|_: &mut Vec<String>| anyhow::bail!("canvas missing"));
        let err = widget.render(&mut Vec::new()).unwrap_err();
        assert!(matches!(err, WidgetError::Render(_)));
        assert!(err.to_string().contains("canvas missing"));
    }

    #[test]
    fn debug_hides_render_function() {
        let widget = create(&json!({"config": {}}), SchemaVariant::New).unwrap();
        let rendered = format!("{widget:?}");
        assert!(rendered.contains("render_attached: false"));
    }
}
