//! Webhook endpoint management.

use imagine_core::entities::{
    WebhookCreate, WebhookDelivery, WebhookEndpoint, WebhookTestResponse, WebhookUpdate,
};

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::request::{ApiRequest, segment};

impl ApiClient {
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn list_webhooks(&self) -> Result<Vec<WebhookEndpoint>, ClientError> {
        self.fetch(ApiRequest::get("/webhooks/")).await
    }

    /// The response is the only place the signing secret is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidRequest`] for a non-http(s) URL or an
    /// empty event list, otherwise any request failure.
    pub async fn create_webhook(&self, payload: &WebhookCreate) -> Result<WebhookEndpoint, ClientError> {
        validate_webhook_url(&payload.url)?;
        if payload.events.is_empty() {
            return Err(ClientError::InvalidRequest(
                "subscribe to at least one event".into(),
            ));
        }
        self.fetch(ApiRequest::post("/webhooks/").json(payload)?)
            .await
    }

    /// # Errors
    ///
    /// Returns [`ClientError::InvalidRequest`] for an invalid URL or an
    /// explicitly empty event list, otherwise any request failure.
    pub async fn update_webhook(
        &self,
        id: &str,
        payload: &WebhookUpdate,
    ) -> Result<WebhookEndpoint, ClientError> {
        if let Some(url) = &payload.url {
            validate_webhook_url(url)?;
        }
        if payload.events.as_ref().is_some_and(Vec::is_empty) {
            return Err(ClientError::InvalidRequest(
                "subscribe to at least one event".into(),
            ));
        }
        self.fetch(ApiRequest::patch(format!("/webhooks/{}", segment(id))).json(payload)?)
            .await
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn delete_webhook(&self, id: &str) -> Result<(), ClientError> {
        self.send(ApiRequest::delete(format!("/webhooks/{}", segment(id))))
            .await
    }

    /// Ask the server to send a test delivery.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn test_webhook(&self, id: &str) -> Result<WebhookTestResponse, ClientError> {
        self.fetch(
            ApiRequest::post(format!("/webhooks/{}/test", segment(id)))
                .json(&serde_json::json!({}))?,
        )
        .await
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn webhook_deliveries(&self, id: &str) -> Result<Vec<WebhookDelivery>, ClientError> {
        self.fetch(ApiRequest::get(format!(
            "/webhooks/{}/deliveries",
            segment(id)
        )))
        .await
    }
}

fn validate_webhook_url(url: &str) -> Result<(), ClientError> {
    match reqwest::Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(ClientError::InvalidRequest(format!(
            "'{url}' is not an http(s) URL"
        ))),
    }
}
