//! Manager behaviour with `validation.strict_data` enabled.

use serde_json::json;
use widgets_config::WidgetsConfig;
use widgets_core::{WidgetError, WidgetStatus};
use widgets_manager::{NullLogger, WidgetManager};
use widgets_schema::SchemaVariant;

fn strict_manager() -> WidgetManager {
    let mut config = WidgetsConfig::default();
    config.validation.strict_data = true;
    WidgetManager::with_config(config, NullLogger)
}

#[test]
fn declared_data_loads() {
    let manager = strict_manager();
    let handle = manager.from_json::<()>(
        &json!({
            "config": {},
            "widgetProps": {"name": {"type": "string"}},
            "data": {"name": "testName"}
        }),
        SchemaVariant::New,
    );
    assert_eq!(handle.unwrap().instance().status(), WidgetStatus::Done);
}

#[test]
fn undeclared_data_is_rejected_at_load() {
    let manager = strict_manager();
    let err = manager
        .try_from_json::<()>(
            &json!({
                "config": {},
                "widgetProps": {"name": {"type": "string"}},
                "data": {"age": 30}
            }),
            SchemaVariant::New,
        )
        .unwrap_err();
    assert!(matches!(err.root_cause(), WidgetError::InvalidData { key, .. } if key == "age"));
}

#[test]
fn later_invalid_data_marks_widget_failed() {
    let manager = strict_manager();
    let mut handle = manager
        .from_json::<()>(
            &json!({"config": {}, "widgetProps": {"count": {"type": "number"}}}),
            SchemaVariant::New,
        )
        .unwrap();

    let widget = handle.instance_mut();
    assert!(widget.set_data(json!({"count": "three"})).is_err());
    assert_eq!(widget.status(), WidgetStatus::Failed);

    widget.set_data(json!({"count": 3})).unwrap();
    assert_eq!(widget.status(), WidgetStatus::Done);
}
