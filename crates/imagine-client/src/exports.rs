use imagine_core::entities::{ExportJob, ExportRequest};

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::request::{ApiRequest, segment};

impl ApiClient {
    /// Queue an export. The returned job completes asynchronously; poll
    /// [`ApiClient::get_export`] for the download URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn create_export(&self, payload: &ExportRequest) -> Result<ExportJob, ClientError> {
        self.fetch(ApiRequest::post("/exports/").json(payload)?)
            .await
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn list_exports(&self) -> Result<Vec<ExportJob>, ClientError> {
        self.fetch(ApiRequest::get("/exports/")).await
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn get_export(&self, id: &str) -> Result<ExportJob, ClientError> {
        self.fetch(ApiRequest::get(format!("/exports/{}", segment(id))))
            .await
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn delete_export(&self, id: &str) -> Result<(), ClientError> {
        self.send(ApiRequest::delete(format!("/exports/{}", segment(id))))
            .await
    }
}
