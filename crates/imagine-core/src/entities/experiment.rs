use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A/B experiment routing traffic between model versions.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AbExperiment {
    pub id: String,
    pub name: String,
    pub model_type: String,
    pub is_active: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub variants: Vec<AbVariant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AbVariant {
    pub id: String,
    pub model_version: String,
    pub weight: u32,
    pub is_control: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AbExperimentCreate {
    pub name: String,
    pub model_type: String,
    pub variants: Vec<AbVariantCreate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AbVariantCreate {
    pub model_version: String,
    pub weight: u32,
    #[serde(default)]
    pub is_control: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AbExperimentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Aggregate results for one variant; derived on the server per request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AbVariantStats {
    pub variant_id: String,
    pub model_version: String,
    pub sample_count: u64,
    pub avg_confidence: Option<f64>,
    pub avg_processing_time_ms: Option<f64>,
}
