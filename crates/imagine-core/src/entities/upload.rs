use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Largest file the backend accepts for a presigned upload.
pub const MAX_UPLOAD_BYTES: u64 = 50_000_000;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PresignedUrlRequest {
    pub product_id: String,
    pub filename: String,
    pub content_type: String,
    pub file_size_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PresignedUrlResponse {
    pub upload_url: String,
    pub image_id: String,
    pub s3_key: String,
    /// Seconds until `upload_url` stops accepting the PUT.
    pub expires_in: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UploadConfirmRequest {
    pub image_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UploadConfirmResponse {
    pub image_id: String,
    pub job_id: String,
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DirectUploadResponse {
    pub image_id: String,
    pub job_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RetryAnalysisResponse {
    pub job_id: String,
}
