//! HTTP-level tests for admin login, logout and session.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, login, post_json, post_json_auth, ADMIN_EMAIL, ADMIN_PASSWORD};
use serde_json::json;

#[tokio::test]
async fn login_success_returns_token_and_user() {
    let app = common::build_test_app();

    let response = post_json(
        app.app(),
        "/api/v1/auth/login",
        json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["expires_in"], 15 * 60);
    assert_eq!(json["user"]["email"], ADMIN_EMAIL);
}

#[tokio::test]
async fn login_email_is_case_insensitive() {
    let app = common::build_test_app();

    let response = post_json(
        app.app(),
        "/api/v1/auth/login",
        json!({ "email": "  OWNER@Folio.Test ", "password": ADMIN_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_wrong_password_returns_401() {
    let app = common::build_test_app();

    let response = post_json(
        app.app(),
        "/api/v1/auth/login",
        json!({ "email": ADMIN_EMAIL, "password": "nope" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Invalid email or password");
}

#[tokio::test]
async fn login_unknown_email_returns_401() {
    let app = common::build_test_app();

    let response = post_json(
        app.app(),
        "/api/v1/auth/login",
        json!({ "email": "someone@else.test", "password": ADMIN_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Session / logout
// ---------------------------------------------------------------------------

#[tokio::test]
async fn session_requires_token() {
    let app = common::build_test_app();

    let response = get(app.app(), "/api/v1/auth/session").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Missing Authorization header");
}

#[tokio::test]
async fn malformed_authorization_header_is_rejected() {
    let app = common::build_test_app();

    let request = axum::http::Request::builder()
        .uri("/api/v1/auth/session")
        .header("authorization", "Token abc")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.app(), request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["error"],
        "Invalid Authorization format. Expected: Bearer <token>"
    );
}

#[tokio::test]
async fn session_returns_current_admin() {
    let app = common::build_test_app();
    let token = login(app.app()).await;

    let response = get_auth(app.app(), "/api/v1/auth/session", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], ADMIN_EMAIL);
    assert!(json["data"]["expires_at"].is_number());
}

#[tokio::test]
async fn logout_revokes_the_token() {
    let app = common::build_test_app();
    let token = login(app.app()).await;

    let response = post_json_auth(app.app(), "/api/v1/auth/logout", json!({}), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app.app(), "/api/v1/auth/session", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A fresh login still works.
    let fresh = login(app.app()).await;
    let response = get_auth(app.app(), "/api/v1/auth/session", &fresh).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = common::build_test_app();

    let response = get_auth(app.app(), "/api/v1/admin/projects", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid or expired token");
}
