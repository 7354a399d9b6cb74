//! Integration registry descriptors.
//!
//! An integration is a configured connection from the platform to an external
//! system. The registry returns every integration of a point of sale; the
//! client only uses the active e-commerce one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Type tag of storefront integrations.
pub const ECOMMERCE_INTEGRATION_TYPE: &str = "kivio_ecommerce";

/// Status of an integration that may be used.
pub const ACTIVE_STATUS: &str = "Active";

/// An integration as returned by the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationResponse {
    #[serde(default)]
    pub integration_id: String,
    #[serde(default)]
    pub pos_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub integration_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub last_sync: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Ordered key/value settings.
    #[serde(default)]
    pub configs: Vec<IntegrationConfigResponse>,
}

/// A single key/value setting of an integration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationConfigResponse {
    #[serde(default)]
    pub integration_config_id: String,
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl IntegrationResponse {
    /// Whether this integration has the given type tag and is active.
    #[must_use]
    pub fn is_active_of_type(&self, integration_type: &str) -> bool {
        self.integration_type == integration_type && self.status == ACTIVE_STATUS
    }

    /// Look up a config value by key.
    ///
    /// Keys are expected to be unique; if a key repeats, the last entry wins.
    #[must_use]
    pub fn config_value(&self, key: &str) -> Option<&str> {
        self.configs
            .iter()
            .rev()
            .find(|c| c.key == key)
            .map(|c| c.value.as_str())
    }
}
