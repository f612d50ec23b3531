use serde::{Deserialize, Serialize};

use crate::filter::Filter;
use crate::sort::SortSpec;

/// Paging direction relative to a cursor.
///
/// Forward/backward exclusivity is structural: a request carries at most one
/// of these, never both.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageCursor {
    /// Page away from the cursor in sort order.
    After(String),
    /// Page toward records preceding the cursor in sort order.
    Before(String),
}

/// A request for one page of records.
///
/// `limit` must be at least one; numeric validation and clamping against a
/// maximum page size happen before the request is built.
#[derive(Clone, Debug, Default)]
pub struct PageRequest {
    pub filter: Option<Filter>,
    pub select: Option<Vec<String>>,
    pub order_by: Option<SortSpec>,
    pub limit: u64,
    pub cursor: Option<PageCursor>,
}

impl PageRequest {
    pub fn first(limit: u64) -> Self {
        PageRequest {
            limit,
            ..PageRequest::default()
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn order_by(mut self, sort: SortSpec) -> Self {
        self.order_by = Some(sort);
        self
    }

    pub fn after(mut self, id: impl Into<String>) -> Self {
        self.cursor = Some(PageCursor::After(id.into()));
        self
    }

    pub fn before(mut self, id: impl Into<String>) -> Self {
        self.cursor = Some(PageCursor::Before(id.into()));
        self
    }
}

/// One page of records plus the "more results exist" signal.
///
/// `next_cursor` is present exactly when `has_next` is true.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub has_next: bool,
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Page {
            records: Vec::new(),
            has_next: false,
            next_cursor: None,
        }
    }

    /// Map records while preserving pagination metadata.
    pub fn map_records<U>(self, mut f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            records: self.records.into_iter().map(&mut f).collect(),
            has_next: self.has_next,
            next_cursor: self.next_cursor,
        }
    }
}
