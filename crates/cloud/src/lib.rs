//! Object upload for admin images (profile avatar, project covers, design
//! gallery).
//!
//! [`UploadProvider`] is the seam; [`CloudinaryUploader`] is the production
//! implementation using an unsigned upload preset. Uploaded objects are never
//! deleted, even when the record referencing them is.

pub mod cloudinary;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::Serialize;

pub use cloudinary::{CloudinaryConfig, CloudinaryUploader};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The file was rejected before any network call.
    #[error("Invalid file: {0}")]
    InvalidFile(String),

    /// The provider answered with an error.
    #[error("Upload rejected: {0}")]
    Rejected(String),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Destination folder on the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFolder {
    Profile,
    Projects,
    Designs,
}

impl UploadFolder {
    pub fn as_str(self) -> &'static str {
        match self {
            UploadFolder::Profile => "profile",
            UploadFolder::Projects => "projects",
            UploadFolder::Designs => "designs",
        }
    }
}

impl fmt::Display for UploadFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UploadFolder {
    type Err = UploadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "profile" => Ok(UploadFolder::Profile),
            "projects" => Ok(UploadFolder::Projects),
            "designs" => Ok(UploadFolder::Designs),
            other => Err(UploadError::InvalidFile(format!(
                "Unknown upload folder '{other}'. Must be one of: profile, projects, designs"
            ))),
        }
    }
}

/// A file received from the admin form.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Reject empty files and anything that does not declare an image type.
    pub fn check_image(&self) -> Result<(), UploadError> {
        if self.bytes.is_empty() {
            return Err(UploadError::InvalidFile(format!("'{}' is empty", self.file_name)));
        }
        match self.content_type.as_deref() {
            Some(ct) if ct.starts_with("image/") => Ok(()),
            Some(ct) => Err(UploadError::InvalidFile(format!(
                "'{}' has content type {ct}, expected an image",
                self.file_name
            ))),
            None => Err(UploadError::InvalidFile(format!(
                "'{}' has no content type",
                self.file_name
            ))),
        }
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedAsset {
    /// Public HTTPS URL stored in the content document.
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
}

/// An object upload endpoint. Single attempt, no retry.
#[async_trait]
pub trait UploadProvider: Send + Sync {
    async fn upload(&self, file: UploadFile, folder: UploadFolder)
        -> Result<UploadedAsset, UploadError>;
}
