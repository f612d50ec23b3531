//! Identifier normalization between the external string form and the
//! store's native object-id type.

use bson::oid::ObjectId;
use bson::{doc, Bson, Document};

use crate::{DbError, Result};

/// Coerce an external identifier string to the native id type.
///
/// Fails with [`DbError::InvalidIdentifier`] when the value does not have
/// the id format. Every id-shaped value entering a filter or cursor position
/// passes through here before coercion is attempted.
pub fn object_id(value: &str) -> Result<ObjectId> {
    ObjectId::parse_str(value).map_err(|_| DbError::InvalidIdentifier(value.to_owned()))
}

/// Match a reference field against either identifier representation.
///
/// Historical records may hold the field as a plain string from before
/// native-id coercion was introduced, so a well-formed id value matches
/// both shapes. Anything else is ordinary equality.
pub(crate) fn dual_match(field: &str, value: &str) -> Document {
    match ObjectId::parse_str(value) {
        Ok(oid) => {
            let mut native = Document::new();
            native.insert(field, oid);
            let mut legacy = Document::new();
            legacy.insert(field, value);
            doc! { "$or": [native, legacy] }
        }
        Err(_) => {
            let mut d = Document::new();
            d.insert(field, value);
            d
        }
    }
}

/// Rename the store's internal `_id` key to the logical `id` field, with the
/// value in its external string form.
pub fn normalize_id(doc: Document) -> Document {
    let mut doc = doc;
    let Some(id) = doc.remove("_id") else {
        return doc;
    };
    let id = match id {
        Bson::ObjectId(oid) => Bson::String(oid.to_hex()),
        other => other,
    };
    let mut out = Document::new();
    out.insert("id", id);
    for (key, value) in doc {
        out.insert(key, value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "507f1f77bcf86cd799439011";

    #[test]
    fn object_id_validates_shape() {
        assert!(object_id(ID).is_ok());
        let err = object_id("not-an-id").unwrap_err();
        assert!(matches!(err, DbError::InvalidIdentifier(v) if v == "not-an-id"));
    }

    #[test]
    fn dual_match_covers_both_representations() {
        let d = dual_match("userId", ID);
        let arms = d.get_array("$or").unwrap();
        assert_eq!(arms.len(), 2);
        assert_eq!(
            arms[0].as_document().unwrap().get("userId"),
            Some(&Bson::ObjectId(ObjectId::parse_str(ID).unwrap()))
        );
        assert_eq!(arms[1].as_document().unwrap().get_str("userId").unwrap(), ID);
    }

    #[test]
    fn dual_match_leaves_plain_values_alone() {
        let d = dual_match("userId", "alice");
        assert_eq!(d, doc! { "userId": "alice" });
    }

    #[test]
    fn normalize_id_renames_and_stringifies() {
        let oid = ObjectId::parse_str(ID).unwrap();
        let normalized = normalize_id(doc! { "_id": oid, "content": "hi" });
        assert_eq!(normalized.get_str("id").unwrap(), ID);
        assert!(!normalized.contains_key("_id"));
        assert_eq!(normalized.get_str("content").unwrap(), "hi");
    }

    #[test]
    fn normalize_id_without_internal_id_is_identity() {
        let d = doc! { "content": "hi" };
        assert_eq!(normalize_id(d.clone()), d);
    }
}
