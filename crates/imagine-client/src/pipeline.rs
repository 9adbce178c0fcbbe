//! The authenticated request pipeline.
//!
//! Every REST call runs through four stages:
//!
//! 1. **Auth attachment**: bearer token (except login/register) and the
//!    active organization id.
//! 2. **Unauthorized recovery**: one refresh exchange and one retry per
//!    request, tracked by [`RetryState`]. The retry re-enters stage 1.
//! 3. **Error normalization**: connectivity, 5xx and string-detail 422
//!    failures are reported to the notifier. The error value is unchanged.
//! 4. **Rate-limit notification**: 429 is reported with its retry hint. No
//!    automatic retry.
//!
//! Refresh exchanges are single-flight. Requests that fail with a token
//! older than the current session generation reuse the token obtained by
//! whichever request refreshed first.

use imagine_core::entities::{RefreshRequest, TokenPair};
use reqwest::header::{AUTHORIZATION, HeaderValue};

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::http::check_response;
use crate::notify::Notifier;
use crate::request::{ApiRequest, RequestBody};

pub const ORGANIZATION_HEADER: &str = "X-Organization-ID";

pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";
pub const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again later.";

/// Per-request unauthorized-recovery state. At most one transition out of
/// `Initial`, so a request is retried at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Initial,
    Retrying,
    Done,
}

impl RetryState {
    /// Whether a 401 on `request` in this state should trigger recovery.
    #[must_use]
    pub fn should_recover(self, request: &ApiRequest) -> bool {
        self == Self::Initial && !request.is_auth_endpoint()
    }
}

impl ApiClient {
    /// Run `request` through all four stages.
    pub(crate) async fn execute(&self, request: &ApiRequest) -> Result<reqwest::Response, ClientError> {
        let mut state = RetryState::Initial;
        loop {
            let credential = self.session().credential();
            let outcome = self
                .dispatch(request, credential.as_ref().map(|c| c.token.as_str()))
                .await;

            match outcome {
                Err(ClientError::Unauthorized) if state.should_recover(request) => {
                    state = RetryState::Retrying;
                    tracing::debug!(path = %request.path, "401 received; refreshing session");
                    if let Err(error) = self.recover_session(credential.map(|c| c.generation)).await {
                        return Err(self.observe(error));
                    }
                }
                other => {
                    state = RetryState::Done;
                    tracing::trace!(path = %request.path, ?state, "request finished");
                    return other.map_err(|error| self.observe(error));
                }
            }
        }
    }

    /// Stage 1 plus the wire round trip and status classification.
    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<reqwest::Response, ClientError> {
        let url = format!("{}{}", self.base_url(), request.path);
        let mut builder = self.http().request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = attach_auth(
            builder,
            request,
            token,
            self.organizations().active_id().as_deref(),
        );
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(part) => {
                let file = reqwest::multipart::Part::bytes(part.bytes.clone())
                    .file_name(part.file_name.clone())
                    .mime_str(&part.content_type)
                    .map_err(|e| {
                        ClientError::InvalidRequest(format!(
                            "content type '{}': {e}",
                            part.content_type
                        ))
                    })?;
                builder.multipart(reqwest::multipart::Form::new().part(part.field.clone(), file))
            }
        };

        tracing::debug!(method = %request.method, path = %request.path, "api request");
        let resp = builder.send().await?;
        check_response(resp).await
    }

    /// Stage 2 recovery: refresh once, shared by concurrent callers.
    ///
    /// `failed_generation` is the session generation of the token that got
    /// the 401. If the session has moved past it while waiting for the gate,
    /// another request already refreshed (or invalidated) the session.
    async fn recover_session(&self, failed_generation: Option<u64>) -> Result<(), ClientError> {
        let _gate = self.refresh_gate().lock().await;

        let session = self.session();
        if let Some(failed) = failed_generation {
            if session.generation() > failed {
                return if session.is_authenticated() {
                    tracing::debug!("session already refreshed by a concurrent request");
                    Ok(())
                } else {
                    Err(ClientError::SessionExpired)
                };
            }
        }

        match self.exchange_refresh_token().await {
            Ok(_) => Ok(()),
            Err(error) => {
                tracing::warn!(%error, "token refresh failed; invalidating session");
                session.invalidate();
                self.organizations().clear();
                Err(ClientError::SessionExpired)
            }
        }
    }

    /// POST `/auth/refresh` with the stored refresh token and install the new
    /// pair. Callers must hold the refresh gate.
    pub(crate) async fn exchange_refresh_token(&self) -> Result<TokenPair, ClientError> {
        let refresh_token = self
            .session()
            .refresh_token()
            .ok_or(imagine_auth::AuthError::NoRefreshToken)?;
        let request = ApiRequest::post("/auth/refresh").json(&RefreshRequest { refresh_token })?;
        // Dispatched directly: a 401 here is final, never recovered.
        let token = self.session().access_token();
        let resp = self
            .dispatch(&request, token.as_deref())
            .await
            .map_err(|error| self.observe(error))?;
        let pair: TokenPair = crate::http::decode_json(resp).await?;
        self.session().establish(&pair)?;
        Ok(pair)
    }

    /// Stages 3 and 4. Observers only: the error is returned as-is.
    fn observe(&self, error: ClientError) -> ClientError {
        observe_error(self.notifier(), &error);
        observe_rate_limit(self.notifier(), &error);
        error
    }
}

/// Stage 1: bearer credential and organization scope.
///
/// Login and register go out bare. Everything else carries the token when
/// one is present, and the organization id when one is selected.
pub fn attach_auth(
    builder: reqwest::RequestBuilder,
    request: &ApiRequest,
    token: Option<&str>,
    organization_id: Option<&str>,
) -> reqwest::RequestBuilder {
    let Some(token) = token else {
        return builder;
    };
    if request.is_credential_exchange() {
        return builder;
    }

    let mut builder = match HeaderValue::from_str(&format!("Bearer {token}")) {
        Ok(mut value) => {
            value.set_sensitive(true);
            builder.header(AUTHORIZATION, value)
        }
        Err(error) => {
            tracing::warn!(%error, "stored access token is not a valid header value");
            builder
        }
    };
    if let Some(org) = organization_id {
        builder = builder.header(ORGANIZATION_HEADER, org);
    }
    builder
}

/// Stage 3: connectivity, server and validation messages.
pub fn observe_error(notifier: &dyn Notifier, error: &ClientError) {
    match error {
        ClientError::Network(_) => notifier.error(NETWORK_ERROR_MESSAGE),
        ClientError::Server { .. } => notifier.error(SERVER_ERROR_MESSAGE),
        ClientError::Validation {
            detail: Some(detail),
        } => notifier.error(detail),
        _ => {}
    }
}

/// Stage 4: rate-limit message with the server's retry hint.
pub fn observe_rate_limit(notifier: &dyn Notifier, error: &ClientError) {
    if let ClientError::RateLimited { retry_after_secs } = error {
        notifier.error(&format!(
            "Rate limit exceeded. Please try again in {retry_after_secs} seconds."
        ));
    }
}
