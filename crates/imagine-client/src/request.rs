//! Rebuildable request descriptions.
//!
//! A request is kept as data rather than a `reqwest::RequestBuilder` so the
//! pipeline can rebuild it for the retry after a token refresh, re-running
//! auth attachment with the new credential.

use reqwest::Method;
use serde::Serialize;

use crate::error::ClientError;

/// Paths that exchange credentials and must never carry a bearer token.
const CREDENTIAL_EXCHANGE_PATHS: [&str; 2] = ["/auth/login", "/auth/register"];

#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(FilePart),
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base, starting with `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Decode`] if `payload` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(mut self, payload: &T) -> Result<Self, ClientError> {
        self.body = RequestBody::Json(serde_json::to_value(payload)?);
        Ok(self)
    }

    #[must_use]
    pub fn multipart(mut self, part: FilePart) -> Self {
        self.body = RequestBody::Multipart(part);
        self
    }

    /// Login and register carry no bearer token even when one is stored.
    #[must_use]
    pub fn is_credential_exchange(&self) -> bool {
        CREDENTIAL_EXCHANGE_PATHS
            .iter()
            .any(|p| self.path.trim_end_matches('/') == *p)
    }

    /// Requests under `/auth/` never trigger the refresh-and-retry path.
    #[must_use]
    pub fn is_auth_endpoint(&self) -> bool {
        self.path.starts_with("/auth/")
    }
}

/// Percent-encode one path segment (ids come from user input on the CLI).
#[must_use]
pub fn segment(value: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(value)
}
