//! Admin A/B testing endpoints.

use imagine_core::entities::{AbExperiment, AbExperimentCreate, AbExperimentUpdate, AbVariantStats};

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::request::{ApiRequest, segment};

const EXPERIMENTS: &str = "/admin/ab-testing/experiments";

impl ApiClient {
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn list_experiments(&self) -> Result<Vec<AbExperiment>, ClientError> {
        self.fetch(ApiRequest::get(EXPERIMENTS)).await
    }

    /// # Errors
    ///
    /// Returns [`ClientError::InvalidRequest`] if the experiment has fewer
    /// than two variants or a weight outside 0..=100.
    pub async fn create_experiment(
        &self,
        payload: &AbExperimentCreate,
    ) -> Result<AbExperiment, ClientError> {
        validate_experiment(payload)?;
        self.fetch(ApiRequest::post(EXPERIMENTS).json(payload)?).await
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn update_experiment(
        &self,
        id: &str,
        payload: &AbExperimentUpdate,
    ) -> Result<AbExperiment, ClientError> {
        self.fetch(ApiRequest::patch(format!("{EXPERIMENTS}/{}", segment(id))).json(payload)?)
            .await
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn delete_experiment(&self, id: &str) -> Result<(), ClientError> {
        self.send(ApiRequest::delete(format!("{EXPERIMENTS}/{}", segment(id))))
            .await
    }

    /// Per-variant aggregates.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn experiment_results(&self, id: &str) -> Result<Vec<AbVariantStats>, ClientError> {
        self.fetch(ApiRequest::get(format!(
            "{EXPERIMENTS}/{}/results",
            segment(id)
        )))
        .await
    }
}

fn validate_experiment(payload: &AbExperimentCreate) -> Result<(), ClientError> {
    if payload.name.trim().is_empty() {
        return Err(ClientError::InvalidRequest("experiment name is required".into()));
    }
    if payload.variants.len() < 2 {
        return Err(ClientError::InvalidRequest(
            "an experiment needs at least two variants".into(),
        ));
    }
    if let Some(bad) = payload.variants.iter().find(|v| v.weight > 100) {
        return Err(ClientError::InvalidRequest(format!(
            "variant '{}' weight {} is outside 0..=100",
            bad.model_version, bad.weight
        )));
    }
    Ok(())
}
