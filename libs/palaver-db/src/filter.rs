//! Filter expression tree to native filter document translation.
//!
//! Translation is structure-preserving: each tree node maps onto exactly one
//! native clause, so boolean depth and arity survive the rewrite.

use bson::{Bson, Document};
use query_core::{Filter, Value};

use crate::ident::{dual_match, object_id};
use crate::{DbError, Result};

/// Translate an optional filter; absence means match-all.
pub(crate) fn where_document(filter: Option<&Filter>, reference_fields: &[String]) -> Result<Document> {
    match filter {
        Some(f) => filter_document(f, reference_fields),
        None => Ok(Document::new()),
    }
}

pub(crate) fn filter_document(filter: &Filter, reference_fields: &[String]) -> Result<Document> {
    let is_reference = |field: &str| reference_fields.iter().any(|f| f == field);

    Ok(match filter {
        Filter::And(children) => compose("$and", children, reference_fields)?,
        Filter::Or(children) => compose("$or", children, reference_fields)?,
        // "$nor" keeps the "none of" semantics, also for a single child.
        Filter::Not(children) => compose("$nor", children, reference_fields)?,

        Filter::Eq(field, value) if field == "id" => {
            let mut d = Document::new();
            d.insert("_id", object_id(expect_id(value)?)?);
            d
        }
        Filter::In(field, values) if field == "id" => {
            let ids = values
                .iter()
                .map(|v| object_id(expect_id(v)?).map(Bson::ObjectId))
                .collect::<Result<Vec<_>>>()?;
            let mut d = Document::new();
            d.insert("_id", operator("$in", Bson::Array(ids)));
            d
        }
        Filter::Ne(field, value) if field == "id" => {
            let mut d = Document::new();
            d.insert(
                "_id",
                operator("$ne", Bson::ObjectId(object_id(expect_id(value)?)?)),
            );
            d
        }

        Filter::Eq(field, Value::String(s)) if is_reference(field) => dual_match(field, s),

        Filter::Eq(field, value) => {
            let mut d = Document::new();
            d.insert(field.as_str(), bson_value(value));
            d
        }
        Filter::In(field, values) => {
            let items = values.iter().map(bson_value).collect();
            let mut d = Document::new();
            d.insert(field.as_str(), operator("$in", Bson::Array(items)));
            d
        }
        Filter::Ne(field, value) => {
            let mut d = Document::new();
            d.insert(field.as_str(), operator("$ne", bson_value(value)));
            d
        }
    })
}

fn compose(op: &str, children: &[Filter], reference_fields: &[String]) -> Result<Document> {
    let clauses = children
        .iter()
        .map(|c| filter_document(c, reference_fields).map(Bson::Document))
        .collect::<Result<Vec<_>>>()?;
    let mut d = Document::new();
    d.insert(op, Bson::Array(clauses));
    Ok(d)
}

fn operator(op: &str, value: Bson) -> Document {
    let mut d = Document::new();
    d.insert(op, value);
    d
}

/// Values in id position must be strings in the external id form.
fn expect_id(value: &Value) -> Result<&str> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(DbError::InvalidIdentifier(format!("{other:?}"))),
    }
}

pub(crate) fn bson_value(value: &Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(*b),
        Value::Int(i) => Bson::Int64(*i),
        Value::Double(f) => Bson::Double(*f),
        Value::String(s) => Bson::String(s.clone()),
        Value::DateTime(dt) => Bson::DateTime(bson::DateTime::from_chrono(*dt)),
    }
}
