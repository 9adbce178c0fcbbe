use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{JobStatus, JobType, StepName, StepStatus};

/// Server-side unit of work with a multi-step status progression.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ProcessingJob {
    pub id: String,
    pub user_id: String,
    pub job_type: JobType,
    pub status: JobStatus,
    pub total_images: u32,
    pub processed_images: u32,
    pub failed_images: u32,
    pub celery_task_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    #[serde(default)]
    pub steps: Vec<JobStep>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProcessingJob {
    /// Processed plus failed images over total, in `0.0..=1.0`.
    #[must_use]
    pub fn completion_ratio(&self) -> f64 {
        if self.total_images == 0 {
            return if self.status.is_terminal() { 1.0 } else { 0.0 };
        }
        let done = self.processed_images.saturating_add(self.failed_images);
        (f64::from(done) / f64::from(self.total_images)).min(1.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct JobStep {
    pub id: String,
    pub step_name: String,
    pub status: StepStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_ms: Option<u64>,
    pub error_message: Option<String>,
    #[serde(default)]
    pub result_data: serde_json::Map<String, serde_json::Value>,
}

/// `GET /jobs` response. Unlike products this listing carries no page counters.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct JobListResponse {
    pub items: Vec<ProcessingJob>,
    pub total: u64,
}

/// Filters and paging for `GET /jobs`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub status: Option<JobStatus>,
    pub job_type: Option<JobType>,
}

impl JobQuery {
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("page_size".to_string(), page_size.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status".to_string(), status.as_str().to_string()));
        }
        if let Some(job_type) = self.job_type {
            pairs.push(("job_type".to_string(), job_type.as_str().to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BatchCreateRequest {
    pub product_id: String,
    pub image_ids: Vec<String>,
}

// ---------------------------------------------------------------------------
// Live updates
// ---------------------------------------------------------------------------

/// Discriminator of a live processing event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingUpdateKind {
    StepUpdate,
    JobComplete,
    JobFailed,
}

impl ProcessingUpdateKind {
    /// `job_complete` and `job_failed` end a job's event sequence.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::JobComplete | Self::JobFailed)
    }
}

/// `{completed, total}` counters attached to some updates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Progress {
    pub completed: u32,
    pub total: u32,
}

/// One JSON text frame from the processing WebSocket.
///
/// `timestamp` is kept as the server's string since the backend does not
/// guarantee a timezone suffix.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ProcessingUpdate {
    #[serde(rename = "type")]
    pub kind: ProcessingUpdateKind,
    pub job_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Map<String, serde_json::Value>>,
    pub timestamp: String,
}

impl ProcessingUpdate {
    /// The pipeline step this update refers to, when it names a known one.
    #[must_use]
    pub fn step_name(&self) -> Option<StepName> {
        self.step.as_deref().and_then(|step| step.parse().ok())
    }

    /// Step status for `step_update` events; `None` for job-level events.
    #[must_use]
    pub fn step_status(&self) -> Option<StepStatus> {
        if self.kind != ProcessingUpdateKind::StepUpdate {
            return None;
        }
        serde_json::from_value(serde_json::Value::String(self.status.clone())).ok()
    }
}
