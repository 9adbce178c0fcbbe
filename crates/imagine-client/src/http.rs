//! Shared HTTP response helpers.
//!
//! Centralizes status-code classification (401, 422 with `detail`, 429 with
//! `Retry-After`, 5xx, everything else) so the pipeline and the resource
//! calls only deal with typed [`ClientError`]s.

use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// Seconds assumed when a 429 carries no usable `Retry-After`.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Check an HTTP response for error statuses.
///
/// Returns the response unchanged on success. Handles:
/// - **401** → [`ClientError::Unauthorized`]
/// - **422** → [`ClientError::Validation`] with a string `detail`, if any
/// - **429** → [`ClientError::RateLimited`] with `Retry-After` parsing
///   (falls back to 60 s if absent or unparseable)
/// - **5xx** → [`ClientError::Server`]
/// - **other non-success** → [`ClientError::Api`] with the status and the
///   `detail` text or raw body
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    match status.as_u16() {
        401 => Err(ClientError::Unauthorized),
        429 => Err(ClientError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        }),
        422 => {
            let body = resp.text().await.unwrap_or_default();
            Err(ClientError::Validation {
                detail: string_detail(&body),
            })
        }
        code if status.is_server_error() => Err(ClientError::Server { status: code }),
        code => {
            let body = resp.text().await.unwrap_or_default();
            Err(ClientError::Api {
                status: code,
                message: string_detail(&body).unwrap_or(body),
            })
        }
    }
}

/// Read the body and deserialize it.
///
/// # Errors
///
/// [`ClientError::Network`] if the body cannot be read, [`ClientError::Decode`]
/// if it is not the expected JSON.
pub async fn decode_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

/// `detail` from a FastAPI error body, only when it is a plain string.
fn string_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("detail")?.as_str().map(str::to_string)
}
