use std::sync::Arc;

use folio_cloud::UploadProvider;
use folio_db::{DbPool, DocumentStore};
use folio_events::{ContactNotifier, EventBus};

use crate::auth::session::RevokedTokens;
use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cloned per request; every field is an `Arc` or cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// The document store every repository and live view reads through.
    pub store: Arc<dyn DocumentStore>,
    /// Present only when running against PostgreSQL; used by the health check.
    pub pool: Option<DbPool>,
    pub event_bus: Arc<EventBus>,
    pub ws_manager: Arc<WsManager>,
    /// `None` when no email provider is configured.
    pub notifier: Option<Arc<ContactNotifier>>,
    /// `None` when no upload provider is configured.
    pub uploader: Option<Arc<dyn UploadProvider>>,
    pub revoked_tokens: Arc<RevokedTokens>,
}
