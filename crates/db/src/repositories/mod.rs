//! Typed repositories over a [`DocumentStore`](crate::store::DocumentStore).
//!
//! Repositories hold the store as `Arc<dyn DocumentStore>`; they are cheap
//! to construct per request.

pub mod collection_repo;
pub mod profile_repo;

pub use collection_repo::CollectionRepo;
pub use profile_repo::ProfileRepo;
