//! Projection and sort normalization into store-native documents.

use bson::Document;
use query_core::{SortDir, SortSpec};

/// Map the logical `id` field to the store's internal id key.
pub(crate) fn map_field(field: &str) -> &str {
    if field == "id" {
        "_id"
    } else {
        field
    }
}

/// Build an inclusion-only projection document. Absence selects all fields;
/// nothing is ever marked for explicit exclusion.
pub(crate) fn projection_document(select: Option<&[String]>) -> Option<Document> {
    let fields = select?;
    let mut d = Document::new();
    for field in fields {
        d.insert(map_field(field), 1_i32);
    }
    Some(d)
}

/// Build a sort document with numeric direction codes.
pub(crate) fn sort_document(sort: &SortSpec) -> Document {
    let mut d = Document::new();
    for key in &sort.0 {
        let code: i32 = match key.dir {
            SortDir::Asc => 1,
            SortDir::Desc => -1,
        };
        d.insert(map_field(&key.field), code);
    }
    d
}
