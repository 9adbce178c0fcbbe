use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ExportStatus, ExportType};

/// Asynchronous artifact-generation record.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ExportJob {
    pub id: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    pub export_type: ExportType,
    pub status: ExportStatus,
    #[serde(default)]
    pub filters: serde_json::Map<String, serde_json::Value>,
    pub file_size_bytes: Option<u64>,
    pub row_count: Option<u64>,
    #[serde(default)]
    pub error_message: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    /// Present once the export has completed.
    #[serde(default)]
    pub download_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ExportJob {
    /// Download link, only once the server reports completion.
    #[must_use]
    pub fn ready_download(&self) -> Option<&str> {
        if self.status == ExportStatus::Completed {
            self.download_url.as_deref()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExportRequest {
    pub export_type: ExportType,
    #[serde(default)]
    pub filters: ExportFilter,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExportFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_ids: Option<Vec<String>>,
}
