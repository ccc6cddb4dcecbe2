//! Admin image uploads.
//!
//! Files are forwarded to the configured [`UploadProvider`]; the returned
//! public URL is what content documents store. Nothing here deletes uploaded
//! objects.

use std::sync::Arc;

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use folio_cloud::{UploadFile, UploadFolder, UploadProvider, UploadedAsset};
use folio_core::content::design::{is_known_category, DESIGN_CATEGORIES};
use folio_core::content::{ContentItem, DesignAsset};
use folio_db::CollectionRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request bodies above this size are rejected before reaching a handler.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

fn uploader(state: &AppState) -> AppResult<Arc<dyn UploadProvider>> {
    state
        .uploader
        .clone()
        .ok_or_else(|| AppError::Unavailable("Image uploads are not configured".into()))
}

async fn read_file(field: axum::extract::multipart::Field<'_>) -> AppResult<UploadFile> {
    let file_name = field.file_name().unwrap_or("upload").to_string();
    let content_type = field.content_type().map(str::to_string);
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let file = UploadFile {
        file_name,
        content_type,
        bytes: bytes.to_vec(),
    };
    file.check_image()?;
    Ok(file)
}

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    /// `profile`, `projects` or `designs`.
    pub folder: String,
}

/// POST /api/v1/admin/uploads?folder=
///
/// Upload a single image (multipart field `file`) and return its public URL.
pub async fn upload_image(
    admin: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let folder: UploadFolder = params.folder.parse()?;
    let uploader = uploader(&state)?;

    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            file = Some(read_file(field).await?);
            break;
        }
    }
    let file = file.ok_or_else(|| AppError::BadRequest("Missing multipart field 'file'".into()))?;

    let file_name = file.file_name.clone();
    let asset: UploadedAsset = uploader.upload(file, folder).await?;

    tracing::info!(
        folder = %folder,
        file = %file_name,
        url = %asset.url,
        admin = %admin.email,
        "Image uploaded",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: asset })))
}

/// POST /api/v1/admin/uploads/designs
///
/// Bulk gallery upload: a `category` field followed by one or more image
/// files. Each file becomes a design asset titled after its file stem.
/// Files are processed in order; a failure stops the batch and items
/// already created stay.
pub async fn upload_designs(
    admin: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let uploader = uploader(&state)?;
    let repo = CollectionRepo::<DesignAsset>::new(Arc::clone(&state.store));

    let mut category: Option<String> = None;
    let mut created: Vec<ContentItem<DesignAsset>> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        match field.name() {
            Some("category") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if !is_known_category(&value) {
                    return Err(AppError::BadRequest(format!(
                        "Unknown design category '{value}'. Must be one of: {}",
                        DESIGN_CATEGORIES.join(", ")
                    )));
                }
                category = Some(value);
            }
            Some("files") | Some("file") => {
                let category = category.as_deref().ok_or_else(|| {
                    AppError::BadRequest("The 'category' field must precede the files".into())
                })?;
                let file = read_file(field).await?;
                let file_name = file.file_name.clone();
                let asset = uploader.upload(file, UploadFolder::Designs).await?;
                let design = DesignAsset::from_upload(&file_name, category, asset.url);
                created.push(repo.create(&design).await?);
            }
            _ => {}
        }
    }

    if created.is_empty() {
        return Err(AppError::BadRequest(
            "No files received in multipart upload".into(),
        ));
    }

    tracing::info!(count = created.len(), admin = %admin.email, "Design batch uploaded");

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}
