use crate::filter::Filter;
use crate::sort::SortSpec;

/// Keyset position marker: the identifier of the last record the caller saw.
///
/// Cursors are stateless. Nothing is retained server-side between calls; the
/// id alone reconstructs the boundary under the current sort.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cursor {
    pub id: String,
}

impl Cursor {
    pub fn at(id: impl Into<String>) -> Self {
        Cursor { id: id.into() }
    }
}

/// A structured, backend-agnostic query request.
///
/// `take` is overloaded: its magnitude is the row limit, and with a cursor
/// present its sign is the paging direction (negative pages backward from
/// the cursor).
#[derive(Clone, Debug, Default)]
pub struct Query {
    pub filter: Option<Filter>,
    /// Included field names; `None` selects all fields. Selection is
    /// additive-only, absent fields are simply not projected.
    pub select: Option<Vec<String>>,
    pub order_by: Option<SortSpec>,
    pub skip: u64,
    pub take: Option<i64>,
    pub cursor: Option<Cursor>,
}

impl Query {
    pub fn new() -> Self {
        Query::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn select(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.select = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn order_by(mut self, sort: SortSpec) -> Self {
        self.order_by = Some(sort);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    pub fn take(mut self, take: i64) -> Self {
        self.take = Some(take);
        self
    }

    pub fn cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }
}
