//! Authentication endpoints and session bootstrap.

use imagine_core::entities::{LoginRequest, TokenPair, User, UserCreate};

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::request::ApiRequest;

impl ApiClient {
    /// Exchange credentials for a token pair, install it, and bootstrap the
    /// current user and organizations.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the login is rejected or the user cannot be
    /// loaded afterwards (the session is dropped in that case).
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ClientError> {
        let request = ApiRequest::post("/auth/login").json(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;
        let pair: TokenPair = self.fetch(request).await?;
        self.session().establish(&pair)?;
        tracing::info!(email, "logged in");
        self.load_current_user().await
    }

    /// Create an account. Does not log in.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the server rejects the registration.
    pub async fn register(&self, payload: &UserCreate) -> Result<User, ClientError> {
        if payload.email.trim().is_empty() || payload.password.is_empty() {
            return Err(ClientError::InvalidRequest(
                "email and password are required".into(),
            ));
        }
        self.fetch(ApiRequest::post("/auth/register").json(payload)?)
            .await
    }

    /// Explicit refresh exchange. Shares the refresh gate with the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if no refresh token is stored or the exchange
    /// is rejected. The session is left untouched on failure.
    pub async fn refresh_session(&self) -> Result<TokenPair, ClientError> {
        let _gate = self.refresh_gate().lock().await;
        self.exchange_refresh_token().await
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn me(&self) -> Result<User, ClientError> {
        self.fetch(ApiRequest::get("/auth/me")).await
    }

    /// Fetch `/auth/me`, remember the user, then load organizations.
    ///
    /// A failing `/auth/me` logs the session out. A failing organization
    /// load is logged and leaves the user in place.
    ///
    /// # Errors
    ///
    /// Returns the `/auth/me` error.
    pub async fn load_current_user(&self) -> Result<User, ClientError> {
        let user = match self.me().await {
            Ok(user) => user,
            Err(error) => {
                tracing::warn!(%error, "could not load current user; logging out");
                self.logout();
                return Err(error);
            }
        };
        self.session().set_user(user.clone());
        if let Err(error) = self.load_organizations().await {
            tracing::warn!(%error, "organization load failed");
        }
        Ok(user)
    }

    /// Local logout: tokens, user and organization selection are dropped.
    pub fn logout(&self) {
        self.session().invalidate();
        self.organizations().clear();
    }
}
