use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub id: String,
    pub organization_id: Option<String>,
    pub endpoint_pattern: String,
    pub requests_per_minute: u32,
    pub requests_per_hour: u32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RateLimitConfigCreate {
    #[serde(default = "default_pattern")]
    pub endpoint_pattern: String,
    #[serde(default = "default_per_minute")]
    pub requests_per_minute: u32,
    #[serde(default = "default_per_hour")]
    pub requests_per_hour: u32,
}

fn default_pattern() -> String {
    "*".to_string()
}

const fn default_per_minute() -> u32 {
    60
}

const fn default_per_hour() -> u32 {
    1000
}

impl Default for RateLimitConfigCreate {
    fn default() -> Self {
        Self {
            endpoint_pattern: default_pattern(),
            requests_per_minute: default_per_minute(),
            requests_per_hour: default_per_hour(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RateLimitConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests_per_minute: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests_per_hour: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
