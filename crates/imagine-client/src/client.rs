use std::sync::Arc;
use std::time::Duration;

use imagine_auth::{OrganizationContext, SessionStore};
use imagine_config::ApiConfig;
use serde::de::DeserializeOwned;

use crate::error::{ClientError, LiveError};
use crate::http::decode_json;
use crate::live::{LiveChannel, ws_base_url};
use crate::notify::Notifier;
use crate::request::ApiRequest;

/// Typed client for the ImagineAI REST API.
///
/// Cheap to clone; clones share the HTTP connection pool, the session, the
/// organization context, and the refresh gate.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

struct Inner {
    config: ApiConfig,
    http: reqwest::Client,
    session: Arc<SessionStore>,
    organizations: Arc<OrganizationContext>,
    notifier: Arc<dyn Notifier>,
    refresh_gate: tokio::sync::Mutex<()>,
}

impl ApiClient {
    /// Create a client over injected session and organization state.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Build`] if the HTTP client cannot be built,
    /// e.g. when `user_agent` is not a valid header value.
    pub fn new(
        config: ApiConfig,
        session: Arc<SessionStore>,
        organizations: Arc<OrganizationContext>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ClientError::Build)?;
        Ok(Self {
            inner: Arc::new(Inner {
                config,
                http,
                session,
                organizations,
                notifier,
                refresh_gate: tokio::sync::Mutex::new(()),
            }),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.inner.config.base_url()
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.inner.session
    }

    #[must_use]
    pub fn organizations(&self) -> &Arc<OrganizationContext> {
        &self.inner.organizations
    }

    #[must_use]
    pub fn notifier(&self) -> &dyn Notifier {
        self.inner.notifier.as_ref()
    }

    /// A live-update channel sharing this client's session.
    ///
    /// # Errors
    ///
    /// Returns [`LiveError::InvalidUrl`] if no websocket URL can be derived
    /// from the configuration.
    pub fn live_channel(&self) -> Result<LiveChannel, LiveError> {
        Ok(LiveChannel::new(
            ws_base_url(&self.inner.config)?,
            Arc::clone(&self.inner.session),
        ))
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    pub(crate) fn refresh_gate(&self) -> &tokio::sync::Mutex<()> {
        &self.inner.refresh_gate
    }

    pub(crate) async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ClientError> {
        let resp = self.execute(&request).await?;
        decode_json(resp).await
    }

    /// For endpoints answering 204 or a body the caller does not need.
    pub(crate) async fn send(&self, request: ApiRequest) -> Result<(), ClientError> {
        self.execute(&request).await?;
        Ok(())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url())
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}
