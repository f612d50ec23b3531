//! Keyset pagination planning.
//!
//! Planning is pure: a [`Query`] goes in, a [`FindPlan`] comes out, and the
//! store is only touched afterwards. That keeps the sort algebra and the
//! cursor boundary construction testable without a backend.

use bson::{Bson, Document};
use query_core::{Query, SortDir, SortSpec};

use crate::filter::where_document;
use crate::ident::object_id;
use crate::select::{map_field, projection_document, sort_document};
use crate::store::FindSpec;
use crate::Result;

/// The fully computed shape of one store round trip.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FindPlan {
    pub filter: Document,
    pub projection: Option<Document>,
    pub sort: Document,
    pub skip: u64,
    pub limit: Option<u64>,
    /// The rows come back in inverted order and must be reversed in memory
    /// to restore the caller's expected ordering.
    pub reverse: bool,
}

impl FindPlan {
    pub(crate) fn into_spec(self) -> FindSpec {
        FindSpec {
            filter: self.filter,
            projection: self.projection,
            sort: if self.sort.is_empty() {
                None
            } else {
                Some(self.sort)
            },
            skip: self.skip,
            limit: self.limit,
        }
    }
}

pub(crate) fn plan_query(query: &Query, reference_fields: &[String]) -> Result<FindPlan> {
    // The ordering the caller expects to see, newest-first if unspecified.
    let client_sort = query
        .order_by
        .clone()
        .unwrap_or_else(|| SortSpec::by("id", SortDir::Desc));

    let (query_sort, reverse) = match &query.cursor {
        // Without a cursor the caller always receives the most recent
        // records first, whatever ordering was requested.
        None => (SortSpec::by("id", SortDir::Desc), false),
        // Negative take pages backward: query the store in the opposite
        // direction to take the nearest rows before the cursor, then
        // restore caller order by reversing in memory.
        Some(_) if query.take.unwrap_or(0) < 0 => (client_sort.invert(), true),
        Some(_) => (client_sort, false),
    };

    let mut filter = where_document(query.filter.as_ref(), reference_fields)?;

    if let Some(cursor) = &query.cursor {
        let cursor_id = object_id(&cursor.id)?;

        let (field, dir) = match query_sort.primary() {
            Some(key) => (map_field(&key.field), key.dir),
            None => ("_id", SortDir::Desc),
        };
        // The boundary is inclusive; the cursor's own record is excluded by
        // the positional skip. That keeps the boundary correct when the
        // primary sort key is not unique.
        let op = match dir {
            SortDir::Asc => "$gte",
            SortDir::Desc => "$lte",
        };
        let bound = if field == "_id" {
            Bson::ObjectId(cursor_id)
        } else {
            // The cursor carries exactly one record id, so a non-id primary
            // sort field compares against that id string.
            Bson::String(cursor.id.clone())
        };
        let mut boundary = Document::new();
        boundary.insert(op, bound);
        filter.insert(field, boundary);
    }

    let limit = match query.take {
        Some(take) if take != 0 => Some(take.unsigned_abs()),
        _ => None,
    };

    Ok(FindPlan {
        filter,
        projection: projection_document(query.select.as_deref()),
        sort: sort_document(&query_sort),
        skip: query.skip,
        limit,
        reverse,
    })
}
