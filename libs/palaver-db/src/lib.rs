//! Document-store translation and pagination layer.
//!
//! This crate turns the backend-agnostic query description from
//! `query-core` into document-store operations and implements keyset
//! (cursor) pagination over them. It is a pure, fail-fast translation
//! layer: store failures propagate unmodified, nothing is retried, and no
//! cursor state is kept between calls.
//!
//! The store boundary is the [`DocumentStore`] / [`DocumentCollection`]
//! trait pair. An in-memory backend is always available; the `mongodb`
//! feature adds a backend over an already-connected MongoDB database
//! (connection lifecycle belongs to the caller).

pub mod ident;
pub mod memory;
pub mod model;
pub mod store;

mod filter;
mod matcher;
mod paginate;
mod select;

#[cfg(feature = "mongodb")]
pub mod mongo;

pub use ident::{normalize_id, object_id};
pub use memory::MemoryStore;
pub use model::Model;
pub use store::{DocumentCollection, DocumentStore, FindSpec};

#[cfg(feature = "mongodb")]
pub use mongo::MongoStore;

pub use query_core::{
    Cursor, Filter, Page, PageCursor, PageRequest, Query, SortDir, SortKey, SortSpec, Value,
};

use thiserror::Error;

/// Library-local result type.
pub type Result<T> = std::result::Result<T, DbError>;

/// Typed error for the translation and pagination layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// A malformed value was presented where a record identifier is
    /// required. This is a caller error surfaced as a translation failure.
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// A record came back without its identifier, so no cursor can be
    /// derived from it.
    #[error("record is missing its identifier")]
    MissingRecordId,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures raised by a store backend. These pass through unmodified; no
/// local recovery is attempted.
#[derive(Debug, Error)]
pub enum StoreError {
    #[cfg(feature = "mongodb")]
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),

    #[error("document store failure: {0}")]
    Other(String),
}
