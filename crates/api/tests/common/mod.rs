#![allow(dead_code)]

use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use folio_api::auth::jwt::JwtConfig;
use folio_api::auth::password::hash_password;
use folio_api::auth::session::RevokedTokens;
use folio_api::config::{AdminCredentials, ServerConfig};
use folio_api::router::build_app_router;
use folio_api::state::AppState;
use folio_api::ws::WsManager;
use folio_cloud::{UploadError, UploadFile, UploadFolder, UploadProvider, UploadedAsset};
use folio_db::{DocumentStore, MemoryStore};
use folio_events::{ContactEmail, ContactNotifier, EmailError, EmailProvider, EventBus};

pub const ADMIN_EMAIL: &str = "owner@folio.test";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery-staple";
pub const CONTACT_FROM: &str = "Portfolio Contact <onboarding@resend.dev>";
pub const CONTACT_TO: &str = "owner@folio.test";

/// Argon2 is slow in debug builds; hash the admin password once per binary.
fn admin_password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(ADMIN_PASSWORD).unwrap())
        .clone()
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        seed_demo: false,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
        admin: AdminCredentials {
            email: ADMIN_EMAIL.to_string(),
            password_hash: admin_password_hash(),
        },
    }
}

// ---------------------------------------------------------------------------
// Provider fakes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailerMode {
    Accept,
    /// The provider answers with an error message.
    Reject,
    /// The call never reaches the provider.
    Fail,
}

/// Email provider that records what it was asked to send.
pub struct RecordingMailer {
    mode: Mutex<MailerMode>,
    sent: Mutex<Vec<ContactEmail>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self {
            mode: Mutex::new(MailerMode::Accept),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn set_mode(&self, mode: MailerMode) {
        *self.mode.lock().unwrap() = mode;
    }

    pub fn sent(&self) -> Vec<ContactEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailProvider for RecordingMailer {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, email: &ContactEmail) -> Result<String, EmailError> {
        let mode = *self.mode.lock().unwrap();
        match mode {
            MailerMode::Accept => {
                let mut sent = self.sent.lock().unwrap();
                sent.push(email.clone());
                Ok(format!("email-{}", sent.len()))
            }
            MailerMode::Reject => Err(EmailError::Rejected(
                "The `to` field must be a valid email address".into(),
            )),
            MailerMode::Fail => Err(EmailError::Build("connection reset".into())),
        }
    }
}

/// Upload provider that records uploads and returns predictable URLs.
pub struct RecordingUploader {
    uploads: Mutex<Vec<(UploadFolder, String)>>,
}

impl RecordingUploader {
    pub fn new() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn uploads(&self) -> Vec<(UploadFolder, String)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl UploadProvider for RecordingUploader {
    async fn upload(
        &self,
        file: UploadFile,
        folder: UploadFolder,
    ) -> Result<UploadedAsset, UploadError> {
        if file.file_name.starts_with("reject") {
            return Err(UploadError::Rejected("Upload preset not found".into()));
        }
        self.uploads
            .lock()
            .unwrap()
            .push((folder, file.file_name.clone()));
        Ok(UploadedAsset {
            url: format!("https://cdn.test/{folder}/{}", file.file_name),
            public_id: Some(format!("{folder}/{}", file.file_name)),
        })
    }
}

// ---------------------------------------------------------------------------
// Test application
// ---------------------------------------------------------------------------

/// The full router over an in-memory store, with recording providers.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<dyn DocumentStore>,
    pub mailer: Arc<RecordingMailer>,
    pub uploader: Arc<RecordingUploader>,
    pub ws_manager: Arc<WsManager>,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router with all middleware layers, exactly as
/// `main.rs` does, over a fresh `MemoryStore`.
pub fn build_test_app() -> TestApp {
    build_app_with(true, true)
}

/// Like [`build_test_app`] but with the email and upload integrations
/// optionally left unconfigured.
pub fn build_app_with(with_email: bool, with_uploads: bool) -> TestApp {
    let config = test_config();
    let event_bus = Arc::new(EventBus::default());
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new(Arc::clone(&event_bus)));
    let ws_manager = Arc::new(WsManager::new());
    let mailer = Arc::new(RecordingMailer::new());
    let uploader = Arc::new(RecordingUploader::new());

    let notifier = with_email.then(|| {
        let provider: Arc<dyn EmailProvider> = mailer.clone();
        Arc::new(ContactNotifier::new(provider, CONTACT_FROM, CONTACT_TO))
    });
    let upload_provider = with_uploads.then(|| {
        let provider: Arc<dyn UploadProvider> = uploader.clone();
        provider
    });

    let state = AppState {
        config: Arc::new(config.clone()),
        store: Arc::clone(&store),
        pool: None,
        event_bus,
        ws_manager: Arc::clone(&ws_manager),
        notifier,
        uploader: upload_provider,
        revoked_tokens: Arc::new(RevokedTokens::new()),
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        mailer,
        uploader,
        ws_manager,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request("POST", uri, None, body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, json_request("POST", uri, Some(token), body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, json_request("PUT", uri, Some(token), body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Log in as the admin and return the access token.
pub async fn login(app: Router) -> String {
    let body = serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

pub const BOUNDARY: &str = "folio-test-boundary";

pub enum Part<'a> {
    Text { name: &'a str, value: &'a str },
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    parts: &[Part<'_>],
    token: &str,
) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(app, request).await
}
