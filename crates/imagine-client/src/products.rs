//! Product catalog endpoints.

use imagine_core::Page;
use imagine_core::entities::{AnalysisResult, Product, ProductCreate, ProductQuery, ProductUpdate};

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::request::{ApiRequest, segment};

impl ApiClient {
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn list_products(&self, query: &ProductQuery) -> Result<Page<Product>, ClientError> {
        self.fetch(ApiRequest::get("/products").query(query.to_pairs()))
            .await
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails; 404 satisfies
    /// [`ClientError::is_not_found`].
    pub async fn get_product(&self, id: &str) -> Result<Product, ClientError> {
        self.fetch(ApiRequest::get(format!("/products/{}", segment(id))))
            .await
    }

    /// # Errors
    ///
    /// Returns [`ClientError::InvalidRequest`] for a blank title, otherwise
    /// any request failure.
    pub async fn create_product(&self, payload: &ProductCreate) -> Result<Product, ClientError> {
        validate_product_create(payload)?;
        self.fetch(ApiRequest::post("/products").json(payload)?)
            .await
    }

    /// # Errors
    ///
    /// Returns [`ClientError::InvalidRequest`] when the update changes
    /// nothing, otherwise any request failure.
    pub async fn update_product(
        &self,
        id: &str,
        payload: &ProductUpdate,
    ) -> Result<Product, ClientError> {
        if payload.is_empty() {
            return Err(ClientError::InvalidRequest("nothing to update".into()));
        }
        if payload.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ClientError::InvalidRequest("title cannot be blank".into()));
        }
        self.fetch(ApiRequest::patch(format!("/products/{}", segment(id))).json(payload)?)
            .await
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn delete_product(&self, id: &str) -> Result<(), ClientError> {
        self.send(ApiRequest::delete(format!("/products/{}", segment(id))))
            .await
    }

    /// Analyses for every image of a product.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn product_analysis(&self, id: &str) -> Result<Vec<AnalysisResult>, ClientError> {
        self.fetch(ApiRequest::get(format!(
            "/products/{}/analysis",
            segment(id)
        )))
        .await
    }
}

fn validate_product_create(payload: &ProductCreate) -> Result<(), ClientError> {
    if payload.title.trim().is_empty() {
        return Err(ClientError::InvalidRequest("product title is required".into()));
    }
    Ok(())
}
