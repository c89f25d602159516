//! Image host client seam.
//!
//! The facade depends on [`ImageHost`]; [`ImageKitClient`] talks to the
//! ImageKit upload API over HTTP.

mod imagekit;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use common::ConfigProvider;
use domain::{AvatarFile, AVATAR_FOLDER};

use crate::config::{IMAGEKIT_PRIVATE_KEY, IMAGEKIT_PUBLIC_KEY, IMAGEKIT_URL_ENDPOINT};

pub use imagekit::ImageKitClient;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Failures reported by the image host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageHostError {
    #[error("Missing {0} for initialization")]
    MissingCredential(&'static str),

    #[error("{0}")]
    Request(String),

    /// Non-2xx answer; `message` is the host's own explanation
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected upload response: {0}")]
    InvalidResponse(String),
}

/// Credentials for one upload, read from configuration at call time.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageHostCredentials {
    pub public_key: String,
    pub private_key: String,
    pub url_endpoint: String,
}

impl std::fmt::Debug for ImageHostCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageHostCredentials")
            .field("public_key", &self.public_key)
            .field("private_key", &"[REDACTED]")
            .field("url_endpoint", &self.url_endpoint)
            .finish()
    }
}

impl ImageHostCredentials {
    /// Read all three settings. Any missing one is an image host failure.
    pub fn from_provider(config: &dyn ConfigProvider) -> Result<Self, ImageHostError> {
        let read = |key: &'static str, name: &'static str| {
            config
                .get(key)
                .filter(|v| !v.is_empty())
                .ok_or(ImageHostError::MissingCredential(name))
        };

        Ok(Self {
            public_key: read(IMAGEKIT_PUBLIC_KEY, "publicKey")?,
            private_key: read(IMAGEKIT_PRIVATE_KEY, "privateKey")?,
            url_endpoint: read(IMAGEKIT_URL_ENDPOINT, "urlEndpoint")?,
        })
    }
}

/// One file upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file: Vec<u8>,
    pub file_name: String,
    pub folder: String,
    /// Ask the host to make the stored name unique
    pub use_unique_file_name: bool,
}

impl UploadRequest {
    /// Avatar upload for an account: `avatar-{id}.{subtype}` in the avatar folder
    pub fn avatar(account_id: &str, file: AvatarFile) -> Self {
        let file_name = file.file_name_for(account_id);
        Self {
            file: file.bytes,
            file_name,
            folder: AVATAR_FOLDER.to_string(),
            use_unique_file_name: true,
        }
    }
}

/// Upload answer. Only `url` is relayed to callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub url: Option<String>,
    pub file_id: Option<String>,
    pub name: Option<String>,
}

/// External image hosting service.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(
        &self,
        credentials: &ImageHostCredentials,
        request: UploadRequest,
    ) -> Result<UploadedImage, ImageHostError>;
}
