//! Cloudinary unsigned uploads.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::{UploadError, UploadFile, UploadFolder, UploadProvider, UploadedAsset};

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Uploads can be large; allow more than a plain API call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub upload_preset: String,
    pub api_base: String,
}

impl CloudinaryConfig {
    /// Returns `None` when `CLOUDINARY_CLOUD_NAME` or
    /// `CLOUDINARY_UPLOAD_PRESET` is missing; uploads are then disabled.
    ///
    /// | Variable                   | Required | Default                              |
    /// |----------------------------|----------|--------------------------------------|
    /// | `CLOUDINARY_CLOUD_NAME`    | yes      | -                                    |
    /// | `CLOUDINARY_UPLOAD_PRESET` | yes      | -                                    |
    /// | `CLOUDINARY_API_BASE`      | no       | `https://api.cloudinary.com/v1_1`    |
    pub fn from_env() -> Option<Self> {
        Some(Self {
            cloud_name: std::env::var("CLOUDINARY_CLOUD_NAME").ok()?,
            upload_preset: std::env::var("CLOUDINARY_UPLOAD_PRESET").ok()?,
            api_base: std::env::var("CLOUDINARY_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
        })
    }

    pub fn upload_url(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.api_base.trim_end_matches('/'),
            self.cloud_name
        )
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct CloudinaryUploader {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryUploader {
    pub fn new(config: CloudinaryConfig) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl UploadProvider for CloudinaryUploader {
    async fn upload(
        &self,
        file: UploadFile,
        folder: UploadFolder,
    ) -> Result<UploadedAsset, UploadError> {
        file.check_image()?;
        let file_name = file.file_name.clone();

        let mut part = Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(ct) = file.content_type.as_deref() {
            part = part.mime_str(ct)?;
        }
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.config.upload_preset.clone())
            .text("folder", folder.as_str());

        let response = self
            .client
            .post(self.config.upload_url())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error.message,
                Err(_) => format!("Upload endpoint returned HTTP {}", status.as_u16()),
            };
            tracing::warn!(%folder, file = %file_name, %message, "Upload rejected");
            return Err(UploadError::Rejected(message));
        }

        let body: UploadResponse = response.json().await?;
        tracing::info!(%folder, file = %file_name, url = %body.secure_url, "File uploaded");
        Ok(UploadedAsset {
            url: body.secure_url,
            public_id: body.public_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_url_includes_cloud_name() {
        let config = CloudinaryConfig {
            cloud_name: "demo".into(),
            upload_preset: "unsigned".into(),
            api_base: "https://api.cloudinary.com/v1_1/".into(),
        };
        assert_eq!(
            config.upload_url(),
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
    }

    #[tokio::test]
    async fn non_image_is_rejected_before_any_request() {
        let uploader = CloudinaryUploader::new(CloudinaryConfig {
            cloud_name: "demo".into(),
            upload_preset: "p".into(),
            api_base: "http://127.0.0.1:1".into(),
        })
        .unwrap();
        let result = uploader
            .upload(
                UploadFile {
                    file_name: "notes.txt".into(),
                    content_type: Some("text/plain".into()),
                    bytes: b"hello".to_vec(),
                },
                UploadFolder::Projects,
            )
            .await;
        assert!(matches!(result, Err(UploadError::InvalidFile(_))));
    }
}
