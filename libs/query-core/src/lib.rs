//! Backend-agnostic query description for the Palaver data layer.
//!
//! This crate defines the structured query vocabulary consumed by the store
//! layer: the filter expression tree, ordering and projection, the `Query`
//! request shape, and cursor/page types for keyset pagination. Translation
//! into store-native operations lives in `palaver-db`; nothing here depends
//! on a concrete store.

pub mod filter;
pub mod page;
pub mod query;
pub mod sort;

pub use filter::{Filter, Value};
pub use page::{Page, PageCursor, PageRequest};
pub use query::{Cursor, Query};
pub use sort::{SortDir, SortKey, SortSpec};
