use serde::{Deserialize, Serialize};

pub const DEFAULT_TENANT_FIELD: &str = "tenant_id";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Column compared against the tenant scope when one is active.
    pub tenant_field: String,
}

impl Default for Config {
    fn default() -> Self { Self { tenant_field: DEFAULT_TENANT_FIELD.to_string() } }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> { serde_json::from_str(json) }

    pub fn with_tenant_field(mut self, tenant_field: impl Into<String>) -> Self {
        self.tenant_field = tenant_field.into();
        self
    }
}
