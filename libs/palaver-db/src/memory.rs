//! In-memory document store backend.
//!
//! Thread-safe and always compiled; used by tests and small deployments.
//! Documents are stored in insertion order, which doubles as the natural
//! order for unsorted finds. Locks are never held across an await point.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, Document};
use parking_lot::RwLock;
use tracing::trace;

use crate::matcher::{compare, matches};
use crate::store::{DocumentCollection, DocumentStore, FindSpec};
use crate::StoreError;

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Arc<MemoryCollection>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl DocumentStore for MemoryStore {
    fn collection(&self, name: &str) -> Arc<dyn DocumentCollection> {
        let mut collections = self.collections.write();
        collections
            .entry(name.to_owned())
            .or_insert_with(|| Arc::new(MemoryCollection::default()))
            .clone()
    }
}

#[derive(Default)]
pub struct MemoryCollection {
    docs: RwLock<Vec<Document>>,
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn find(&self, spec: FindSpec) -> Result<Vec<Document>, StoreError> {
        let docs = self.docs.read();
        let mut found: Vec<Document> = docs
            .iter()
            .filter(|d| matches(&spec.filter, *d))
            .cloned()
            .collect();
        drop(docs);

        if let Some(sort) = &spec.sort {
            sort_documents(&mut found, sort);
        }

        let mut found: Vec<Document> = found.into_iter().skip(spec.skip as usize).collect();
        if let Some(limit) = spec.limit {
            found.truncate(limit as usize);
        }

        trace!(count = found.len(), "memory find");
        Ok(found
            .iter()
            .map(|d| project(d, spec.projection.as_ref()))
            .collect())
    }

    async fn find_one(
        &self,
        filter: Document,
        projection: Option<Document>,
    ) -> Result<Option<Document>, StoreError> {
        let docs = self.docs.read();
        Ok(docs
            .iter()
            .find(|d| matches(&filter, *d))
            .map(|d| project(d, projection.as_ref())))
    }

    async fn insert_one(&self, doc: Document) -> Result<Bson, StoreError> {
        let mut doc = doc;
        if !doc.contains_key("_id") {
            doc.insert("_id", ObjectId::new());
        }
        let id = doc.get("_id").cloned().unwrap_or(Bson::Null);
        self.docs.write().push(doc);
        Ok(id)
    }

    async fn insert_many(&self, docs: Vec<Document>) -> Result<Vec<Bson>, StoreError> {
        let mut ids = Vec::with_capacity(docs.len());
        let mut store = self.docs.write();
        for mut doc in docs {
            if !doc.contains_key("_id") {
                doc.insert("_id", ObjectId::new());
            }
            ids.push(doc.get("_id").cloned().unwrap_or(Bson::Null));
            store.push(doc);
        }
        Ok(ids)
    }

    async fn update_one(&self, filter: Document, update: Document) -> Result<u64, StoreError> {
        let set = update
            .get_document("$set")
            .map_err(|_| StoreError::Other("update requires a $set document".to_owned()))?
            .clone();

        let mut docs = self.docs.write();
        match docs.iter_mut().find(|d| matches(&filter, *d)) {
            Some(doc) => {
                for (key, value) in set {
                    doc.insert(key, value);
                }
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_one(&self, filter: Document) -> Result<bool, StoreError> {
        let mut docs = self.docs.write();
        match docs.iter().position(|d| matches(&filter, d)) {
            Some(idx) => {
                docs.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Stable multi-key sort by the sort document's direction codes.
fn sort_documents(docs: &mut [Document], sort: &Document) {
    docs.sort_by(|a, b| {
        for (field, dir) in sort {
            let av = a.get(field).unwrap_or(&Bson::Null);
            let bv = b.get(field).unwrap_or(&Bson::Null);
            let mut ord = compare(av, bv).unwrap_or(std::cmp::Ordering::Equal);
            if descending(dir) {
                ord = ord.reverse();
            }
            if ord != std::cmp::Ordering::Equal {
                return ord;
            }
        }
        std::cmp::Ordering::Equal
    });
}

fn descending(dir: &Bson) -> bool {
    match dir {
        Bson::Int32(d) => *d < 0,
        Bson::Int64(d) => *d < 0,
        Bson::Double(d) => *d < 0.0,
        _ => false,
    }
}

/// Apply an inclusion projection. The internal id key is always retained
/// unless the projection is absent or empty (both select everything).
fn project(doc: &Document, projection: Option<&Document>) -> Document {
    let Some(fields) = projection.filter(|p| !p.is_empty()) else {
        return doc.clone();
    };
    let mut out = Document::new();
    if let Some(id) = doc.get("_id") {
        out.insert("_id", id.clone());
    }
    for key in fields.keys() {
        if key != "_id" {
            if let Some(value) = doc.get(key) {
                out.insert(key.as_str(), value.clone());
            }
        }
    }
    out
}
