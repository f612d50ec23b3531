//! Pagination behavior over the in-memory backend.

use bson::doc;
use palaver_db::{
    DocumentStore, Filter, MemoryStore, Model, Page, PageRequest, Query, SortDir, SortSpec,
};

fn message_model(store: &MemoryStore) -> Model {
    Model::new(store.collection("Message"))
        .with_reference_fields(["conversationId"])
        .with_keyset_paging()
}

/// Insert `n` records and return their ids in creation (ascending) order.
async fn seed(model: &Model, n: usize) -> Vec<String> {
    let mut ids = Vec::with_capacity(n);
    for i in 0..n {
        let created = model
            .create(doc! { "conversationId": "c1", "content": format!("m{i}") })
            .await
            .unwrap();
        ids.push(created.get_str("id").unwrap().to_owned());
    }
    ids.sort();
    ids
}

fn page_ids(page: &Page<bson::Document>) -> Vec<String> {
    page.records
        .iter()
        .map(|r| r.get_str("id").unwrap().to_owned())
        .collect()
}

fn base_request(limit: u64) -> PageRequest {
    PageRequest::first(limit).filter(Filter::eq("conversationId", "c1"))
}

#[tokio::test]
async fn newest_page_then_forward_pages_tile_the_collection() {
    let store = MemoryStore::new();
    let model = message_model(&store);
    let ids = seed(&model, 12).await;

    // Twelve records, page size five: the cursorless page is the newest
    // five in descending order.
    let page1 = model.find_page(base_request(5)).await.unwrap();
    let expected: Vec<String> = ids[7..12].iter().rev().cloned().collect();
    assert_eq!(page_ids(&page1), expected);
    assert!(page1.has_next);
    assert_eq!(page1.next_cursor.as_deref(), Some(ids[7].as_str()));

    // Continuing from the cursor reproduces the next five, still newest
    // first, without repeating the boundary record.
    let page2 = model
        .find_page(base_request(5).after(page1.next_cursor.clone().unwrap()))
        .await
        .unwrap();
    let expected: Vec<String> = ids[2..7].iter().rev().cloned().collect();
    assert_eq!(page_ids(&page2), expected);
    assert!(page2.has_next);
    assert_eq!(page2.next_cursor.as_deref(), Some(ids[2].as_str()));

    // The final short page drains the collection.
    let page3 = model
        .find_page(base_request(5).after(page2.next_cursor.clone().unwrap()))
        .await
        .unwrap();
    let expected: Vec<String> = ids[0..2].iter().rev().cloned().collect();
    assert_eq!(page_ids(&page3), expected);
    assert!(!page3.has_next);
    assert!(page3.next_cursor.is_none());

    // No record was skipped or duplicated across the three pages.
    let mut seen: Vec<String> = page_ids(&page1)
        .into_iter()
        .chain(page_ids(&page2))
        .chain(page_ids(&page3))
        .collect();
    assert_eq!(seen.len(), 12);
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 12);
}

#[tokio::test]
async fn has_next_at_exact_boundaries() {
    for (total, expected_has_next) in [(4usize, false), (5, false), (6, true)] {
        let store = MemoryStore::new();
        let model = message_model(&store);
        seed(&model, total).await;

        let page = model.find_page(base_request(5)).await.unwrap();
        assert_eq!(page.has_next, expected_has_next, "total={total}");
        assert_eq!(page.next_cursor.is_some(), expected_has_next);
        assert_eq!(page.records.len(), total.min(5));
    }
}

#[tokio::test]
async fn forward_paging_in_ascending_order() {
    let store = MemoryStore::new();
    let model = message_model(&store);
    let ids = seed(&model, 10).await;
    let ascending = SortSpec::by("id", SortDir::Asc);

    let page1 = model
        .find_page(base_request(4).order_by(ascending.clone()).after(ids[0].as_str()))
        .await
        .unwrap();
    assert_eq!(page_ids(&page1), ids[1..5].to_vec());
    assert!(page1.has_next);
    assert_eq!(page1.next_cursor.as_deref(), Some(ids[4].as_str()));

    let page2 = model
        .find_page(base_request(4).order_by(ascending.clone()).after(ids[4].as_str()))
        .await
        .unwrap();
    assert_eq!(page_ids(&page2), ids[5..9].to_vec());
    assert!(page2.has_next);

    let page3 = model
        .find_page(base_request(4).order_by(ascending).after(ids[8].as_str()))
        .await
        .unwrap();
    assert_eq!(page_ids(&page3), ids[9..10].to_vec());
    assert!(!page3.has_next);
}

#[tokio::test]
async fn backward_paging_in_ascending_order() {
    let store = MemoryStore::new();
    let model = message_model(&store);
    let ids = seed(&model, 10).await;
    let ascending = SortSpec::by("id", SortDir::Asc);

    // Pages keep the caller's ascending order even though the store is
    // queried in the opposite direction.
    let page1 = model
        .find_page(base_request(3).order_by(ascending.clone()).before(ids[9].as_str()))
        .await
        .unwrap();
    assert_eq!(page_ids(&page1), ids[6..9].to_vec());
    assert!(page1.has_next);
    assert_eq!(page1.next_cursor.as_deref(), Some(ids[6].as_str()));

    let page2 = model
        .find_page(base_request(3).order_by(ascending.clone()).before(ids[6].as_str()))
        .await
        .unwrap();
    assert_eq!(page_ids(&page2), ids[3..6].to_vec());
    assert!(page2.has_next);

    let page3 = model
        .find_page(base_request(3).order_by(ascending.clone()).before(ids[3].as_str()))
        .await
        .unwrap();
    assert_eq!(page_ids(&page3), ids[0..3].to_vec());
    assert!(!page3.has_next);
    assert!(page3.next_cursor.is_none());

    // Walking backward visits every record below the start exactly once.
    let mut seen: Vec<String> = page_ids(&page1)
        .into_iter()
        .chain(page_ids(&page2))
        .chain(page_ids(&page3))
        .collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen, ids[0..9].to_vec());
}

#[tokio::test]
async fn cursorless_listing_is_newest_first_despite_requested_order() {
    let store = MemoryStore::new();
    let model = message_model(&store);
    let ids = seed(&model, 6).await;

    let records = model
        .find_many(
            Query::new()
                .filter(Filter::eq("conversationId", "c1"))
                .order_by(SortSpec::by("id", SortDir::Asc))
                .take(6),
        )
        .await
        .unwrap();
    let got: Vec<String> = records
        .iter()
        .map(|r| r.get_str("id").unwrap().to_owned())
        .collect();
    let expected: Vec<String> = ids.iter().rev().cloned().collect();
    assert_eq!(got, expected);
}

#[tokio::test]
async fn default_listing_without_sort_is_descending_by_id() {
    let store = MemoryStore::new();
    let model = message_model(&store);
    let ids = seed(&model, 5).await;

    let records = model
        .find_many(Query::new().filter(Filter::eq("conversationId", "c1")))
        .await
        .unwrap();
    let got: Vec<String> = records
        .iter()
        .map(|r| r.get_str("id").unwrap().to_owned())
        .collect();
    let expected: Vec<String> = ids.iter().rev().cloned().collect();
    assert_eq!(got, expected);
}

#[tokio::test]
async fn page_filter_isolation_between_conversations() {
    let store = MemoryStore::new();
    let model = message_model(&store);
    seed(&model, 3).await;
    for i in 0..4 {
        model
            .create(doc! { "conversationId": "c2", "content": format!("other{i}") })
            .await
            .unwrap();
    }

    let page = model.find_page(base_request(10)).await.unwrap();
    assert_eq!(page.records.len(), 3);
    assert!(page
        .records
        .iter()
        .all(|r| r.get_str("conversationId").unwrap() == "c1"));
    assert!(!page.has_next);
}

#[tokio::test]
async fn malformed_page_cursor_is_a_translation_error() {
    let store = MemoryStore::new();
    let model = message_model(&store);
    seed(&model, 2).await;

    let err = model
        .find_page(base_request(5).after("not-an-id"))
        .await
        .unwrap_err();
    assert!(matches!(err, palaver_db::DbError::InvalidIdentifier(_)));
}
