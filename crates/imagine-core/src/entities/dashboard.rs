use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Aggregates for the active organization.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DashboardStats {
    pub total_products: u64,
    pub total_images: u64,
    pub completed_analyses: u64,
    pub total_defects: u64,
    pub active_jobs: u64,
    pub avg_processing_time_ms: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CategoryDistribution {
    pub category: String,
    pub count: u64,
}

/// Recent-activity rows are free-form on the server side.
pub type RecentActivity = serde_json::Map<String, serde_json::Value>;
