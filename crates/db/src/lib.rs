//! Document storage for the portfolio.
//!
//! - [`store`]: the [`DocumentStore`] abstraction with in-memory and
//!   PostgreSQL implementations.
//! - [`subscription`]: live queries that push full ordered snapshots.
//! - [`repositories`]: typed per-collection CRUD and the profile singleton.
//! - [`binder`]: the Live View Binder that keeps a view's list current.
//! - [`editor`]: the async driver behind the admin editor state machine.
//! - [`seed`]: demo content for development stores.

pub mod binder;
pub mod editor;
pub mod repositories;
pub mod seed;
pub mod store;
pub mod subscription;

use sqlx::postgres::PgPoolOptions;

pub use binder::{LiveView, SubscriptionStatus, ViewState};
pub use editor::{AdminEditor, RefreshStrategy};
pub use repositories::{CollectionRepo, ProfileRepo};
pub use seed::{seed_demo_content, SeedReport};
pub use store::{
    Document, DocumentStore, MemoryStore, PgDocumentStore, Query, StoreError, StoredDocument,
};
pub use subscription::{Snapshot, Subscription};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Cheap connectivity probe used by the health endpoint.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
