use imagine_core::entities::{RateLimitConfig, RateLimitConfigCreate, RateLimitConfigUpdate};

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::request::{ApiRequest, segment};

impl ApiClient {
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn list_rate_limits(&self) -> Result<Vec<RateLimitConfig>, ClientError> {
        self.fetch(ApiRequest::get("/admin/rate-limits/")).await
    }

    /// # Errors
    ///
    /// Returns [`ClientError::InvalidRequest`] for zero limits, otherwise any
    /// request failure.
    pub async fn create_rate_limit(
        &self,
        payload: &RateLimitConfigCreate,
    ) -> Result<RateLimitConfig, ClientError> {
        if payload.requests_per_minute == 0 || payload.requests_per_hour == 0 {
            return Err(ClientError::InvalidRequest(
                "rate limits must be greater than zero".into(),
            ));
        }
        self.fetch(ApiRequest::post("/admin/rate-limits/").json(payload)?)
            .await
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn update_rate_limit(
        &self,
        id: &str,
        payload: &RateLimitConfigUpdate,
    ) -> Result<RateLimitConfig, ClientError> {
        self.fetch(
            ApiRequest::patch(format!("/admin/rate-limits/{}", segment(id))).json(payload)?,
        )
        .await
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn delete_rate_limit(&self, id: &str) -> Result<(), ClientError> {
        self.send(ApiRequest::delete(format!("/admin/rate-limits/{}", segment(id))))
            .await
    }
}
