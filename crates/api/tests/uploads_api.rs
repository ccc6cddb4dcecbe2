//! Admin image uploads through the recording upload provider.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, login, post_multipart_auth, Part};
use folio_cloud::UploadFolder;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

fn image<'a>(name: &'a str, file_name: &'a str) -> Part<'a> {
    Part::File {
        name,
        file_name,
        content_type: "image/png",
        bytes: PNG,
    }
}

#[tokio::test]
async fn single_upload_returns_public_url() {
    let app = common::build_test_app();
    let token = login(app.app()).await;

    let response = post_multipart_auth(
        app.app(),
        "/api/v1/admin/uploads?folder=projects",
        &[image("file", "cover.png")],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["url"], "https://cdn.test/projects/cover.png");
    assert_eq!(
        app.uploader.uploads(),
        vec![(UploadFolder::Projects, "cover.png".to_string())]
    );
}

#[tokio::test]
async fn unknown_folder_is_rejected() {
    let app = common::build_test_app();
    let token = login(app.app()).await;

    let response = post_multipart_auth(
        app.app(),
        "/api/v1/admin/uploads?folder=tmp",
        &[image("file", "cover.png")],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.uploader.uploads().is_empty());
}

#[tokio::test]
async fn non_image_file_is_rejected_before_upload() {
    let app = common::build_test_app();
    let token = login(app.app()).await;

    let response = post_multipart_auth(
        app.app(),
        "/api/v1/admin/uploads?folder=profile",
        &[Part::File {
            name: "file",
            file_name: "notes.txt",
            content_type: "text/plain",
            bytes: b"hello",
        }],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.uploader.uploads().is_empty());
}

#[tokio::test]
async fn provider_failure_returns_502() {
    let app = common::build_test_app();
    let token = login(app.app()).await;

    let response = post_multipart_auth(
        app.app(),
        "/api/v1/admin/uploads?folder=profile",
        &[image("file", "reject-me.png")],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "UPSTREAM_ERROR");
}

#[tokio::test]
async fn uploads_unavailable_without_provider() {
    let app = common::build_app_with(true, false);
    let token = login(app.app()).await;

    let response = post_multipart_auth(
        app.app(),
        "/api/v1/admin/uploads?folder=profile",
        &[image("file", "me.png")],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// ---------------------------------------------------------------------------
// Bulk design upload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bulk_design_upload_creates_one_asset_per_file() {
    let app = common::build_test_app();
    let token = login(app.app()).await;

    let response = post_multipart_auth(
        app.app(),
        "/api/v1/admin/uploads/designs",
        &[
            Part::Text {
                name: "category",
                value: "Event Flyers",
            },
            image("files", "spring-gala.png"),
            image("files", "open-day.png"),
        ],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response).await["data"].clone();
    let created = created.as_array().unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(created[0]["title"], "spring-gala");
    assert_eq!(created[0]["category"], "Event Flyers");
    assert_eq!(created[0]["imageUrl"], "https://cdn.test/designs/spring-gala.png");

    let page = body_json(get(app.app(), "/api/v1/content/designs?category=Event%20Flyers").await).await;
    assert_eq!(page["data"]["total"], 2);
}

#[tokio::test]
async fn bulk_design_upload_rejects_unknown_category() {
    let app = common::build_test_app();
    let token = login(app.app()).await;

    let response = post_multipart_auth(
        app.app(),
        "/api/v1/admin/uploads/designs",
        &[
            Part::Text {
                name: "category",
                value: "Memes",
            },
            image("files", "a.png"),
        ],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.uploader.uploads().is_empty());
}

#[tokio::test]
async fn bulk_design_upload_requires_category_first() {
    let app = common::build_test_app();
    let token = login(app.app()).await;

    let response = post_multipart_auth(
        app.app(),
        "/api/v1/admin/uploads/designs",
        &[image("files", "a.png")],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
