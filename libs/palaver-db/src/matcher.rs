//! Filter-document evaluation for the in-memory backend.
//!
//! Covers the operators the translation layer emits: `$and`, `$or`, `$nor`,
//! `$in`, `$eq`, `$ne` and the range comparisons, plus literal field
//! equality. A missing field compares as null, matching the document-store
//! convention the rest of the layer is written against.

use std::cmp::Ordering;

use bson::{Bson, Document};

pub(crate) fn matches(filter: &Document, doc: &Document) -> bool {
    filter.iter().all(|(key, condition)| match key.as_str() {
        "$and" => clauses(condition).into_iter().all(|c| matches(c, doc)),
        "$or" => clauses(condition).into_iter().any(|c| matches(c, doc)),
        "$nor" => !clauses(condition).into_iter().any(|c| matches(c, doc)),
        field => field_matches(doc.get(field).unwrap_or(&Bson::Null), condition),
    })
}

fn clauses(condition: &Bson) -> Vec<&Document> {
    match condition {
        Bson::Array(items) => items.iter().filter_map(Bson::as_document).collect(),
        _ => Vec::new(),
    }
}

fn field_matches(actual: &Bson, condition: &Bson) -> bool {
    match condition {
        Bson::Document(ops) if is_operator_document(ops) => ops
            .iter()
            .all(|(op, operand)| operator_matches(op, actual, operand)),
        literal => values_equal(actual, literal),
    }
}

fn is_operator_document(doc: &Document) -> bool {
    doc.keys().next().is_some_and(|k| k.starts_with('$'))
}

fn operator_matches(op: &str, actual: &Bson, operand: &Bson) -> bool {
    match op {
        "$eq" => values_equal(actual, operand),
        "$ne" => !values_equal(actual, operand),
        "$in" => match operand {
            Bson::Array(items) => items.iter().any(|i| values_equal(actual, i)),
            _ => false,
        },
        "$gt" => compare(actual, operand) == Some(Ordering::Greater),
        "$gte" => matches!(
            compare(actual, operand),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        "$lt" => compare(actual, operand) == Some(Ordering::Less),
        "$lte" => matches!(
            compare(actual, operand),
            Some(Ordering::Less | Ordering::Equal)
        ),
        // Unknown operators match nothing rather than everything.
        _ => false,
    }
}

fn values_equal(a: &Bson, b: &Bson) -> bool {
    match (numeric(a), numeric(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Total order over the value types the translation layer emits.
/// Values of unrelated types do not compare.
pub(crate) fn compare(a: &Bson, b: &Bson) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (numeric(a), numeric(b)) {
        return x.partial_cmp(&y);
    }
    match (a, b) {
        (Bson::Null, Bson::Null) => Some(Ordering::Equal),
        (Bson::ObjectId(x), Bson::ObjectId(y)) => Some(x.cmp(y)),
        (Bson::String(x), Bson::String(y)) => Some(x.cmp(y)),
        (Bson::DateTime(x), Bson::DateTime(y)) => Some(x.cmp(y)),
        (Bson::Boolean(x), Bson::Boolean(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn numeric(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(i) => Some((*i).into()),
        Bson::Int64(i) => Some(*i as f64),
        Bson::Double(f) => Some(*f),
        _ => None,
    }
}
