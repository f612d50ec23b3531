//! CRUD and translation behavior of the model façade over the in-memory
//! backend.

use bson::{doc, oid::ObjectId, Bson};
use palaver_db::{
    DbError, DocumentStore, Filter, MemoryStore, Model, Query, SortDir, SortSpec, Value,
};

fn plain_model(store: &MemoryStore, name: &str) -> Model {
    Model::new(store.collection(name)).with_reference_fields([
        "userId",
        "conversationId",
        "senderId",
        "recipientId",
    ])
}

#[tokio::test]
async fn create_returns_record_with_external_id() {
    let store = MemoryStore::new();
    let users = plain_model(&store, "User");

    let created = users.create(doc! { "username": "alice" }).await.unwrap();
    let id = created.get_str("id").unwrap();
    assert!(ObjectId::parse_str(id).is_ok());
    assert_eq!(created.get_str("username").unwrap(), "alice");
    assert!(!created.contains_key("_id"));

    // The record is addressable through its external id.
    let found = users
        .find_unique(&Filter::eq("id", id), None)
        .await
        .unwrap()
        .expect("created record should be found");
    assert_eq!(found.get_str("username").unwrap(), "alice");
}

#[tokio::test]
async fn find_unique_not_found_is_an_empty_result() {
    let store = MemoryStore::new();
    let users = plain_model(&store, "User");

    let found = users
        .find_unique(&Filter::eq("username", "nobody"), None)
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn malformed_id_filter_is_a_caller_error() {
    let store = MemoryStore::new();
    let users = plain_model(&store, "User");

    let err = users
        .find_unique(&Filter::eq("id", "definitely-not-hex"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::InvalidIdentifier(_)));
}

#[tokio::test]
async fn projection_limits_returned_fields() {
    let store = MemoryStore::new();
    let users = plain_model(&store, "User");
    users
        .create(doc! { "username": "alice", "displayName": "Alice" })
        .await
        .unwrap();

    let select = vec!["id".to_string(), "username".to_string()];
    let found = users
        .find_first(&Filter::eq("username", "alice"), Some(&select))
        .await
        .unwrap()
        .unwrap();
    assert!(found.contains_key("id"));
    assert!(found.contains_key("username"));
    assert!(!found.contains_key("displayName"));
}

#[tokio::test]
async fn dual_representation_lookup_matches_either_storage_form() {
    let store = MemoryStore::new();
    let members = plain_model(&store, "ConversationMember");

    // One record stores the reference natively, one as the legacy string.
    let user_oid = ObjectId::new();
    let user_hex = user_oid.to_hex();
    members
        .create(doc! { "userId": user_oid, "conversationId": "c1" })
        .await
        .unwrap();
    members
        .create(doc! { "userId": user_hex.as_str(), "conversationId": "c2" })
        .await
        .unwrap();

    let found = members
        .find_many(Query::new().filter(Filter::eq("userId", user_hex.as_str())))
        .await
        .unwrap();
    assert_eq!(found.len(), 2);
}

#[tokio::test]
async fn plain_find_many_sorts_skips_and_limits() {
    let store = MemoryStore::new();
    let users = plain_model(&store, "User");
    for name in ["carol", "alice", "bob"] {
        users.create(doc! { "username": name }).await.unwrap();
    }

    let found = users
        .find_many(
            Query::new()
                .order_by(SortSpec::by("username", SortDir::Asc))
                .skip(1)
                .take(1),
        )
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].get_str("username").unwrap(), "bob");
}

#[tokio::test]
async fn create_many_returns_external_ids_in_order() {
    let store = MemoryStore::new();
    let members = plain_model(&store, "ConversationMember");

    let ids = members
        .create_many(vec![
            doc! { "conversationId": "c1", "userId": "u1" },
            doc! { "conversationId": "c1", "userId": "u2" },
        ])
        .await
        .unwrap();
    assert_eq!(ids.len(), 2);
    assert!(ids.iter().all(|id| ObjectId::parse_str(id).is_ok()));

    let found = members
        .find_many(Query::new().filter(Filter::eq("conversationId", "c1")))
        .await
        .unwrap();
    assert_eq!(found.len(), 2);
}

#[tokio::test]
async fn update_sets_fields_on_the_matched_record() {
    let store = MemoryStore::new();
    let conversations = plain_model(&store, "Conversation");
    let created = conversations.create(doc! {}).await.unwrap();
    let id = created.get_str("id").unwrap().to_owned();

    let matched = conversations
        .update(&Filter::eq("id", id.as_str()), doc! { "title": "plans" })
        .await
        .unwrap();
    assert_eq!(matched, 1);

    let found = conversations
        .find_unique(&Filter::eq("id", id.as_str()), None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.get_str("title").unwrap(), "plans");

    // Updating a record that does not exist matches nothing.
    let matched = conversations
        .update(
            &Filter::eq("id", ObjectId::new().to_hex()),
            doc! { "title": "x" },
        )
        .await
        .unwrap();
    assert_eq!(matched, 0);
}

#[tokio::test]
async fn delete_removes_exactly_one_record() {
    let store = MemoryStore::new();
    let friends = plain_model(&store, "Friend");
    let created = friends
        .create(doc! { "senderId": "a", "recipientId": "b" })
        .await
        .unwrap();
    let id = created.get_str("id").unwrap().to_owned();

    assert!(friends.delete(&Filter::eq("id", id.as_str())).await.unwrap());
    assert!(!friends.delete(&Filter::eq("id", id.as_str())).await.unwrap());
}

#[tokio::test]
async fn membership_and_negation_filters_translate_through() {
    let store = MemoryStore::new();
    let members = plain_model(&store, "ConversationMember");
    members
        .create(doc! { "conversationId": "c1", "userId": "u1", "leaveTime": Bson::Null })
        .await
        .unwrap();
    members
        .create(doc! { "conversationId": "c1", "userId": "u2", "leaveTime": bson::DateTime::now() })
        .await
        .unwrap();
    members
        .create(doc! { "conversationId": "c2", "userId": "u3", "leaveTime": Bson::Null })
        .await
        .unwrap();

    // Members of either conversation who have left.
    let departed = members
        .find_many(Query::new().filter(Filter::and([
            Filter::is_in("conversationId", ["c1", "c2"]),
            Filter::ne("leaveTime", Value::Null),
        ])))
        .await
        .unwrap();
    assert_eq!(departed.len(), 1);
    assert_eq!(departed[0].get_str("userId").unwrap(), "u2");

    // Nobody outside both conversations.
    let neither = members
        .find_many(Query::new().filter(Filter::none_of([
            Filter::eq("conversationId", "c1"),
            Filter::eq("conversationId", "c2"),
        ])))
        .await
        .unwrap();
    assert!(neither.is_empty());
}
