use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use folio_cloud::{CloudinaryConfig, CloudinaryUploader, UploadProvider};
use folio_db::{DbPool, DocumentStore, MemoryStore, PgDocumentStore};
use folio_events::{ContactNotifier, EmailConfig, EventBus};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_api::auth::password::hash_password;
use folio_api::auth::session::RevokedTokens;
use folio_api::config::{ConfigError, ServerConfig};
use folio_api::router::build_app_router;
use folio_api::state::AppState;
use folio_api::ws;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid HOST address: {0}")]
    Address(#[from] std::net::AddrParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Seeding failed: {0}")]
    Seed(#[from] folio_db::StoreError),

    #[error("{0}")]
    Usage(&'static str),
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "folio_api=debug,folio_db=debug,folio_events=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let result = match std::env::args().nth(1).as_deref() {
        Some("hash-password") => print_password_hash(std::env::args().nth(2)),
        Some("seed") => seed_database().await,
        _ => serve().await,
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Fatal error");
        std::process::exit(1);
    }
}

/// `folio-api hash-password <password>`: print an Argon2id hash for
/// `ADMIN_PASSWORD_HASH`.
fn print_password_hash(password: Option<String>) -> Result<(), StartupError> {
    let password = password.ok_or_else(|| {
        StartupError::PasswordHash("usage: folio-api hash-password <password>".into())
    })?;
    let hash = hash_password(&password).map_err(|e| StartupError::PasswordHash(e.to_string()))?;
    println!("{hash}");
    Ok(())
}

/// `folio-api seed`: reset the experience, skills and certificates
/// collections in the `DATABASE_URL` database to the demo set.
async fn seed_database() -> Result<(), StartupError> {
    let database_url = std::env::var("DATABASE_URL").map_err(|_| {
        StartupError::Usage("folio-api seed needs DATABASE_URL; set SEED_DEMO=true to seed the in-memory store")
    })?;

    let pool = folio_db::create_pool(&database_url).await?;
    folio_db::run_migrations(&pool).await?;

    let store: Arc<dyn DocumentStore> =
        Arc::new(PgDocumentStore::new(pool, Arc::new(EventBus::default())));
    let report = folio_db::seed_demo_content(&store).await?;
    println!(
        "Seeded {} experience, {} skill and {} certificate entries",
        report.experience, report.skills, report.certificates
    );
    Ok(())
}

async fn serve() -> Result<(), StartupError> {
    // --- Configuration ---
    let config = ServerConfig::from_env()?;
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let event_bus = Arc::new(EventBus::default());
    let background = CancellationToken::new();

    // --- Document store ---
    let (store, pool, listener_handle) = connect_store(&event_bus, &background).await?;
    if config.seed_demo {
        if pool.is_some() {
            tracing::warn!("SEED_DEMO is ignored with DATABASE_URL; run `folio-api seed` instead");
        } else {
            folio_db::seed_demo_content(&store).await?;
        }
    }

    // --- Integrations ---
    let notifier = build_notifier();
    let uploader = build_uploader();

    // --- WebSocket manager + heartbeat ---
    let ws_manager = Arc::new(ws::WsManager::new());
    let heartbeat_handle = ws::start_heartbeat(Arc::clone(&ws_manager), background.clone());

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        store,
        pool,
        event_bus: Arc::clone(&event_bus),
        ws_manager: Arc::clone(&ws_manager),
        notifier,
        uploader,
        revoked_tokens: Arc::new(RevokedTokens::new()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(config.host.parse()?, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    let ws_count = ws_manager.connection_count().await;
    tracing::info!(ws_count, "Closing remaining WebSocket connections");
    ws_manager.shutdown_all().await;

    background.cancel();
    let grace = Duration::from_secs(config.shutdown_timeout_secs);
    let _ = tokio::time::timeout(grace, heartbeat_handle).await;
    if let Some(handle) = listener_handle {
        let _ = tokio::time::timeout(grace, handle).await;
    }
    tracing::info!("Background tasks stopped");

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// PostgreSQL when `DATABASE_URL` is set, otherwise the in-memory store.
async fn connect_store(
    event_bus: &Arc<EventBus>,
    cancel: &CancellationToken,
) -> Result<(Arc<dyn DocumentStore>, Option<DbPool>, Option<JoinHandle<()>>), StartupError> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        tracing::warn!("DATABASE_URL not set, using the in-memory document store");
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new(Arc::clone(event_bus)));
        return Ok((store, None, None));
    };

    let pool = folio_db::create_pool(&database_url).await?;
    tracing::info!("Database connection pool created");

    folio_db::health_check(&pool).await?;
    tracing::info!("Database health check passed");

    folio_db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    let pg_store = PgDocumentStore::new(pool.clone(), Arc::clone(event_bus));
    let listener = pg_store.spawn_change_listener(cancel.clone());
    let store: Arc<dyn DocumentStore> = Arc::new(pg_store);

    Ok((store, Some(pool), Some(listener)))
}

fn build_notifier() -> Option<Arc<ContactNotifier>> {
    let Some(config) = EmailConfig::from_env() else {
        tracing::warn!("No email provider configured; contact notifications are disabled");
        return None;
    };
    match ContactNotifier::from_config(&config) {
        Ok(notifier) => {
            tracing::info!(provider = notifier.provider_name(), "Contact notifier ready");
            Some(Arc::new(notifier))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to build email provider");
            None
        }
    }
}

fn build_uploader() -> Option<Arc<dyn UploadProvider>> {
    let Some(config) = CloudinaryConfig::from_env() else {
        tracing::warn!("Cloudinary not configured; image uploads are disabled");
        return None;
    };
    match CloudinaryUploader::new(config) {
        Ok(uploader) => {
            let uploader: Arc<dyn UploadProvider> = Arc::new(uploader);
            Some(uploader)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to build upload provider");
            None
        }
    }
}

/// Wait for SIGINT (Ctrl-C) or SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
