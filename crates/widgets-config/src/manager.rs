//! Widget manager configuration.

use serde::{Deserialize, Serialize};
use widgets_schema::SchemaVariant;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ManagerConfig {
    /// Catalog schema applied when a caller does not name one.
    #[serde(default)]
    pub default_schema: SchemaVariant,
}
