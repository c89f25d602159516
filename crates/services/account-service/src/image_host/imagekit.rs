//! ImageKit upload client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client as HttpClient;
use serde::Deserialize;

use super::{ImageHost, ImageHostCredentials, ImageHostError, UploadRequest, UploadedImage};

/// HTTP client for the ImageKit upload API
#[derive(Clone)]
pub struct ImageKitClient {
    http_client: HttpClient,
    upload_url: String,
}

/// Error body returned on non-2xx answers
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ImageKitClient {
    /// Create a client posting to `upload_url`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(upload_url: impl Into<String>, timeout_ms: u64) -> Result<Self, ImageHostError> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| ImageHostError::Request(e.to_string()))?;

        Ok(Self {
            http_client,
            upload_url: upload_url.into(),
        })
    }
}

#[async_trait]
impl ImageHost for ImageKitClient {
    async fn upload(
        &self,
        credentials: &ImageHostCredentials,
        request: UploadRequest,
    ) -> Result<UploadedImage, ImageHostError> {
        let part = Part::bytes(request.file).file_name(request.file_name.clone());
        let form = Form::new()
            .part("file", part)
            .text("fileName", request.file_name)
            .text("folder", request.folder)
            .text("useUniqueFileName", request.use_unique_file_name.to_string());

        // Private key as basic auth user, empty password
        let response = self
            .http_client
            .post(&self.upload_url)
            .basic_auth(&credentials.private_key, Some(""))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ImageHostError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("upload failed")
                        .to_string()
                });

            return Err(ImageHostError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<UploadedImage>()
            .await
            .map_err(|e| ImageHostError::InvalidResponse(e.to_string()))
    }
}
