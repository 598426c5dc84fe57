//! Payload validation settings.

use serde::{Deserialize, Serialize};
use widgets_schema::DEFAULT_DATA_VAR;

fn default_data_var() -> String {
    DEFAULT_DATA_VAR.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidationConfig {
    /// Name printed for the payload root in violation messages.
    #[serde(default = "default_data_var")]
    pub data_var: String,

    /// Check `data` keys and value types against the widget's `widgetProps`
    /// declarations whenever data is assigned.
    #[serde(default)]
    pub strict_data: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            data_var: default_data_var(),
            strict_data: false,
        }
    }
}
