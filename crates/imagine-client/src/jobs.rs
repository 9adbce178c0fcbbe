use imagine_core::entities::{BatchCreateRequest, JobListResponse, JobQuery, ProcessingJob};

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::request::{ApiRequest, segment};

impl ApiClient {
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidRequest`] when no image ids are given,
    /// otherwise any request failure.
    pub async fn create_batch(&self, payload: &BatchCreateRequest) -> Result<ProcessingJob, ClientError> {
        if payload.image_ids.is_empty() {
            return Err(ClientError::InvalidRequest(
                "a batch needs at least one image".into(),
            ));
        }
        self.fetch(ApiRequest::post("/batch").json(payload)?).await
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn batch_status(&self, job_id: &str) -> Result<ProcessingJob, ClientError> {
        self.fetch(ApiRequest::get(format!("/batch/{}", segment(job_id))))
            .await
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn list_jobs(&self, query: &JobQuery) -> Result<JobListResponse, ClientError> {
        self.fetch(ApiRequest::get("/jobs").query(query.to_pairs()))
            .await
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn get_job(&self, job_id: &str) -> Result<ProcessingJob, ClientError> {
        self.fetch(ApiRequest::get(format!("/jobs/{}", segment(job_id))))
            .await
    }
}
