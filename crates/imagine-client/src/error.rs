//! Client error types.

use imagine_auth::AuthError;
use thiserror::Error;

/// Errors from REST calls made through the request pipeline.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response reached the client (connect failure, timeout, reset).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// 401 that the pipeline could not recover from.
    #[error("unauthorized")]
    Unauthorized,

    /// 422. `detail` is set only when the server sent a string `detail`.
    #[error("validation failed: {}", detail.as_deref().unwrap_or("request rejected by server"))]
    Validation { detail: Option<String> },

    /// 429 Too Many Requests.
    #[error("rate limited — retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("server error ({status})")]
    Server { status: u16 },

    /// Any other non-success status, including 404.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The refresh exchange failed and the session was dropped.
    #[error("session expired — run `imagine auth login`")]
    SessionExpired,

    /// The HTTP client could not be built from the configuration.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// Rejected locally before any network call.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ClientError {
    /// HTTP status carried by the error, if it came from a response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized | Self::SessionExpired => Some(401),
            Self::Validation { .. } => Some(422),
            Self::RateLimited { .. } => Some(429),
            Self::Server { status } | Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(404))
    }
}

/// Errors from the live-update channel.
#[derive(Debug, Error)]
pub enum LiveError {
    #[error("not authenticated — run `imagine auth login`")]
    NotAuthenticated,

    #[error("invalid websocket URL: {0}")]
    InvalidUrl(String),

    #[error("websocket connect failed: {0}")]
    Connect(String),

    #[error("websocket transport error: {0}")]
    Transport(String),

    /// The server closed the socket with a non-normal code, or the
    /// connection dropped without a close frame.
    #[error("websocket closed: {code} {reason}")]
    ClosedUnclean { code: u16, reason: String },
}
