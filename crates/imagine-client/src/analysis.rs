use imagine_core::entities::{AnalysisResult, RetryAnalysisResponse};

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::request::{ApiRequest, segment};

impl ApiClient {
    /// Analysis result for one image.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails; 404 while the image has
    /// not been analysed yet.
    pub async fn get_analysis(&self, image_id: &str) -> Result<AnalysisResult, ClientError> {
        self.fetch(ApiRequest::get(format!("/analysis/{}", segment(image_id))))
            .await
    }

    /// Queue a new analysis run for an image.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn retry_analysis(&self, image_id: &str) -> Result<RetryAnalysisResponse, ClientError> {
        self.fetch(
            ApiRequest::post(format!("/analysis/{}/retry", segment(image_id)))
                .json(&serde_json::json!({}))?,
        )
        .await
    }
}
