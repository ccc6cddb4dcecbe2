//! Domain layer for the portfolio content service.
//!
//! Zero internal dependencies: everything here is pure data and pure
//! functions so that the store, the HTTP layer and the tests can share the
//! same content models, validation rules, editor flow and list derivations.

pub mod content;
pub mod editor;
pub mod error;
pub mod listing;
pub mod live;
pub mod tags;
pub mod types;
