//! The per-entity CRUD façade over a document collection.

use std::sync::Arc;

use bson::{Bson, Document};
use query_core::{Cursor, Filter, Page, PageCursor, PageRequest, Query};
use tracing::debug;

use crate::filter::{filter_document, where_document};
use crate::ident::normalize_id;
use crate::paginate::{plan_query, FindPlan};
use crate::select::{projection_document, sort_document};
use crate::store::{DocumentCollection, FindSpec};
use crate::{DbError, Result};

/// A typed handle to one entity's collection.
///
/// The recognized reference-id fields and the keyset-paging switch are
/// per-entity configuration supplied at construction time; the translation
/// code itself carries no field knowledge.
#[derive(Clone)]
pub struct Model {
    collection: Arc<dyn DocumentCollection>,
    reference_fields: Vec<String>,
    keyset_paging: bool,
}

impl Model {
    pub fn new(collection: Arc<dyn DocumentCollection>) -> Self {
        Model {
            collection,
            reference_fields: Vec::new(),
            keyset_paging: false,
        }
    }

    /// Declare which fields hold references to other records and must match
    /// either identifier representation.
    pub fn with_reference_fields(
        mut self,
        fields: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.reference_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Route `find_many` through the cursor pagination engine.
    pub fn with_keyset_paging(mut self) -> Self {
        self.keyset_paging = true;
        self
    }

    /// Fetch the record matching the filter. At most one match is expected;
    /// "not found" is an empty result, not an error.
    pub async fn find_unique(
        &self,
        filter: &Filter,
        select: Option<&[String]>,
    ) -> Result<Option<Document>> {
        self.find_first(filter, select).await
    }

    /// Like [`Model::find_unique`] but explicitly tolerant of multiple
    /// matches; returns the store's natural first.
    pub async fn find_first(
        &self,
        filter: &Filter,
        select: Option<&[String]>,
    ) -> Result<Option<Document>> {
        let filter = filter_document(filter, &self.reference_fields)?;
        let projection = projection_document(select);
        let found = self.collection.find_one(filter, projection).await?;
        Ok(found.map(normalize_id))
    }

    /// List records. Entities configured for keyset paging go through the
    /// pagination engine; everything else is a plain translated fetch with
    /// no cursor semantics.
    pub async fn find_many(&self, query: Query) -> Result<Vec<Document>> {
        if self.keyset_paging {
            let plan = plan_query(&query, &self.reference_fields)?;
            return self.run_plan(plan).await;
        }

        let spec = FindSpec {
            filter: where_document(query.filter.as_ref(), &self.reference_fields)?,
            projection: projection_document(query.select.as_deref()),
            sort: query.order_by.as_ref().map(sort_document).filter(|d| !d.is_empty()),
            skip: query.skip,
            limit: match query.take {
                Some(take) if take != 0 => Some(take.unsigned_abs()),
                _ => None,
            },
        };
        let docs = self.collection.find(spec).await?;
        Ok(docs.into_iter().map(normalize_id).collect())
    }

    /// Fetch one page and derive the "more results exist" signal from a
    /// single round trip by over-fetching one row.
    ///
    /// `request.limit` must be at least one; upstream validation owns that.
    /// The boundary is keyed on the last-seen record, so a page boundary
    /// record deleted between two requests shifts the next page. Callers
    /// must tolerate that skew; pages are not snapshot-isolated.
    pub async fn find_page(&self, request: PageRequest) -> Result<Page<Document>> {
        debug_assert!(request.limit >= 1, "page limit must be validated upstream");

        let take_amt = request.limit as i64 + 1;
        let (take, skip, cursor) = match &request.cursor {
            Some(PageCursor::After(id)) => (take_amt, 1, Some(Cursor::at(id.clone()))),
            Some(PageCursor::Before(id)) => (-take_amt, 1, Some(Cursor::at(id.clone()))),
            None => (-take_amt, 0, None),
        };

        let query = Query {
            filter: request.filter,
            select: request.select,
            order_by: request.order_by,
            skip,
            take: Some(take),
            cursor,
        };
        let plan = plan_query(&query, &self.reference_fields)?;
        let mut records = self.run_plan(plan).await?;

        let has_next = records.len() as i64 == take_amt;
        let mut next_cursor = None;
        if has_next {
            match request.cursor {
                // Paging backward, the surplus row sits at the head of the
                // caller-ordered sequence; the first kept record anchors the
                // next page.
                Some(PageCursor::Before(_)) => {
                    next_cursor = Some(record_id(&records[1])?);
                    records.remove(0);
                }
                // Paging forward (or taking the newest page), the surplus
                // sits at the tail and the last kept record is the anchor.
                _ => {
                    next_cursor = Some(record_id(&records[records.len() - 2])?);
                    records.pop();
                }
            }
        }

        Ok(Page {
            records,
            has_next,
            next_cursor,
        })
    }

    /// Insert one record; returns it with its identifier normalized.
    pub async fn create(&self, data: Document) -> Result<Document> {
        let inserted_id = self.collection.insert_one(data.clone()).await?;
        let mut doc = data;
        doc.insert("_id", inserted_id);
        Ok(normalize_id(doc))
    }

    /// Insert a batch; returns the assigned identifiers in external form.
    pub async fn create_many(&self, data: Vec<Document>) -> Result<Vec<String>> {
        let ids = self.collection.insert_many(data).await?;
        Ok(ids.iter().map(id_string).collect())
    }

    /// Update the first record matching the filter. Last write wins;
    /// returns the matched count.
    pub async fn update(&self, filter: &Filter, data: Document) -> Result<u64> {
        let filter = filter_document(filter, &self.reference_fields)?;
        let mut update = Document::new();
        update.insert("$set", data);
        Ok(self.collection.update_one(filter, update).await?)
    }

    /// Delete the first record matching the filter; returns whether a
    /// record was removed.
    pub async fn delete(&self, filter: &Filter) -> Result<bool> {
        let filter = filter_document(filter, &self.reference_fields)?;
        Ok(self.collection.delete_one(filter).await?)
    }

    async fn run_plan(&self, plan: FindPlan) -> Result<Vec<Document>> {
        debug!(
            filter = ?plan.filter,
            sort = ?plan.sort,
            skip = plan.skip,
            limit = ?plan.limit,
            reverse = plan.reverse,
            "executing find plan"
        );
        let reverse = plan.reverse;
        let mut docs = self.collection.find(plan.into_spec()).await?;
        if reverse {
            docs.reverse();
        }
        Ok(docs.into_iter().map(normalize_id).collect())
    }
}

fn record_id(doc: &Document) -> Result<String> {
    doc.get_str("id")
        .map(str::to_owned)
        .map_err(|_| DbError::MissingRecordId)
}

fn id_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}
