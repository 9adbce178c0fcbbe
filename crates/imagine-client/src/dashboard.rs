use imagine_core::entities::{CategoryDistribution, DashboardStats, RecentActivity};

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::request::ApiRequest;

impl ApiClient {
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ClientError> {
        self.fetch(ApiRequest::get("/dashboard/stats")).await
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn recent_activity(&self) -> Result<Vec<RecentActivity>, ClientError> {
        self.fetch(ApiRequest::get("/dashboard/recent")).await
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn category_distribution(&self) -> Result<Vec<CategoryDistribution>, ClientError> {
        self.fetch(ApiRequest::get("/dashboard/category-distribution"))
            .await
    }
}
