//! MongoDB document store backend.
//!
//! A thin mapping of [`FindSpec`] and the mutation calls onto the driver.
//! The store handle wraps an already-connected database; connecting and
//! closing belong to the caller.

use std::sync::Arc;

use async_trait::async_trait;
use bson::{Bson, Document};
use futures_util::TryStreamExt;
use mongodb::{Collection, Database};
use tracing::trace;

use crate::store::{DocumentCollection, DocumentStore, FindSpec};
use crate::StoreError;

pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        MongoStore { db }
    }
}

impl DocumentStore for MongoStore {
    fn collection(&self, name: &str) -> Arc<dyn DocumentCollection> {
        Arc::new(MongoCollection {
            inner: self.db.collection::<Document>(name),
        })
    }
}

pub struct MongoCollection {
    inner: Collection<Document>,
}

#[async_trait]
impl DocumentCollection for MongoCollection {
    async fn find(&self, spec: FindSpec) -> Result<Vec<Document>, StoreError> {
        let mut find = self.inner.find(spec.filter);
        if let Some(projection) = spec.projection {
            find = find.projection(projection);
        }
        if let Some(sort) = spec.sort {
            find = find.sort(sort);
        }
        if spec.skip > 0 {
            find = find.skip(spec.skip);
        }
        if let Some(limit) = spec.limit {
            find = find.limit(limit as i64);
        }

        let cursor = find.await?;
        let docs: Vec<Document> = cursor.try_collect().await?;
        trace!(collection = %self.inner.name(), count = docs.len(), "mongo find");
        Ok(docs)
    }

    async fn find_one(
        &self,
        filter: Document,
        projection: Option<Document>,
    ) -> Result<Option<Document>, StoreError> {
        let mut find = self.inner.find_one(filter);
        if let Some(projection) = projection {
            find = find.projection(projection);
        }
        Ok(find.await?)
    }

    async fn insert_one(&self, doc: Document) -> Result<Bson, StoreError> {
        let result = self.inner.insert_one(doc).await?;
        Ok(result.inserted_id)
    }

    async fn insert_many(&self, docs: Vec<Document>) -> Result<Vec<Bson>, StoreError> {
        let count = docs.len();
        let mut result = self.inner.insert_many(docs).await?;
        // The driver keys inserted ids by input position.
        let ids = (0..count)
            .map(|i| result.inserted_ids.remove(&i).unwrap_or(Bson::Null))
            .collect();
        Ok(ids)
    }

    async fn update_one(&self, filter: Document, update: Document) -> Result<u64, StoreError> {
        let result = self.inner.update_one(filter, update).await?;
        Ok(result.matched_count)
    }

    async fn delete_one(&self, filter: Document) -> Result<bool, StoreError> {
        let result = self.inner.delete_one(filter).await?;
        Ok(result.deleted_count > 0)
    }
}
