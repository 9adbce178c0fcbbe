//! Image upload endpoints: presigned, confirm, direct.

use imagine_core::entities::{
    DirectUploadResponse, MAX_UPLOAD_BYTES, PresignedUrlRequest, PresignedUrlResponse,
    UploadConfirmRequest, UploadConfirmResponse,
};

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::http::check_response;
use crate::request::{ApiRequest, FilePart};

impl ApiClient {
    /// Ask the server for an object-storage upload URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidRequest`] for empty or oversized files,
    /// otherwise any request failure.
    pub async fn presigned_url(
        &self,
        payload: &PresignedUrlRequest,
    ) -> Result<PresignedUrlResponse, ClientError> {
        validate_upload(&payload.content_type, payload.file_size_bytes)?;
        self.fetch(ApiRequest::post("/uploads/presigned-url").json(payload)?)
            .await
    }

    /// PUT the bytes to a presigned URL. Goes straight to object storage,
    /// outside the API pipeline and without credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the upload fails or storage rejects it.
    pub async fn upload_to_presigned_url(
        &self,
        upload_url: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), ClientError> {
        let resp = self
            .http()
            .put(upload_url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;
        check_response(resp).await?;
        Ok(())
    }

    /// Tell the server a presigned upload finished; starts analysis.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn confirm_upload(&self, image_id: &str) -> Result<UploadConfirmResponse, ClientError> {
        self.fetch(ApiRequest::post("/uploads/confirm").json(&UploadConfirmRequest {
            image_id: image_id.to_string(),
        })?)
        .await
    }

    /// Multipart upload through the API; starts analysis.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidRequest`] for empty, oversized, or
    /// non-image files, otherwise any request failure.
    pub async fn direct_upload(
        &self,
        product_id: &str,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<DirectUploadResponse, ClientError> {
        validate_upload(content_type, u64::try_from(bytes.len()).unwrap_or(u64::MAX))?;
        let request = ApiRequest::post("/uploads/direct")
            .query(vec![("product_id".into(), product_id.to_string())])
            .multipart(FilePart {
                field: "file".into(),
                file_name: file_name.to_string(),
                content_type: content_type.to_string(),
                bytes,
            });
        self.fetch(request).await
    }
}

fn validate_upload(content_type: &str, size: u64) -> Result<(), ClientError> {
    if !content_type.starts_with("image/") {
        return Err(ClientError::InvalidRequest(format!(
            "'{content_type}' is not an image type"
        )));
    }
    if size == 0 {
        return Err(ClientError::InvalidRequest("file is empty".into()));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(ClientError::InvalidRequest(format!(
            "file is {size} bytes; the limit is {MAX_UPLOAD_BYTES}"
        )));
    }
    Ok(())
}
