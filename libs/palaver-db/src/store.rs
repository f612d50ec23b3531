//! The document-store driver boundary.
//!
//! The translation layer speaks to backends exclusively through these
//! traits. Backends execute what they are handed; all query semantics
//! (identifier coercion, sort algebra, cursor boundaries) are decided
//! before a spec reaches a backend.

use std::sync::Arc;

use async_trait::async_trait;
use bson::{Bson, Document};

use crate::StoreError;

/// A fully translated find operation.
#[derive(Clone, Debug, Default)]
pub struct FindSpec {
    pub filter: Document,
    pub projection: Option<Document>,
    pub sort: Option<Document>,
    pub skip: u64,
    pub limit: Option<u64>,
}

/// One named collection of documents.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    async fn find(&self, spec: FindSpec) -> Result<Vec<Document>, StoreError>;

    async fn find_one(
        &self,
        filter: Document,
        projection: Option<Document>,
    ) -> Result<Option<Document>, StoreError>;

    /// Insert a document, returning the id the store assigned (or kept).
    async fn insert_one(&self, doc: Document) -> Result<Bson, StoreError>;

    async fn insert_many(&self, docs: Vec<Document>) -> Result<Vec<Bson>, StoreError>;

    /// Apply an update document to the first match; returns the matched
    /// count. Last write wins, there is no concurrency check.
    async fn update_one(&self, filter: Document, update: Document) -> Result<u64, StoreError>;

    /// Delete the first match; returns whether a document was removed.
    async fn delete_one(&self, filter: Document) -> Result<bool, StoreError>;
}

/// A handle to a document store, addressed by collection name.
pub trait DocumentStore: Send + Sync {
    fn collection(&self, name: &str) -> Arc<dyn DocumentCollection>;
}
