mod common;

use docaccess::memory::InMemoryStore;
use docaccess::prelude::*;

use common::{Counter, Event, User, build, store, users};

#[tokio::test]
async fn put_identified_generates_missing_id() {
    let store = store().await;
    let access = AccessLayer::new(store.clone());

    let saved = access.put_identified(User::new("Ann", 31), None).await.unwrap();

    assert_eq!(saved.id.len(), 20);
    assert!(saved.id.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(access.get_one::<User>(&saved.id, &users()).await.unwrap(), saved);
}

#[tokio::test]
async fn put_identified_prefers_existing_id_over_explicit() {
    let store = store().await;
    let access = AccessLayer::new(store.clone());

    let saved = access
        .put_identified(User::with_id("u7", "Ann", 31), Some("other"))
        .await
        .unwrap();

    assert_eq!(saved.id, "u7");
    assert!(store.raw_document("users", "u7").await.is_some());
    assert!(store.raw_document("users", "other").await.is_none());
}

#[tokio::test]
async fn put_identified_uses_explicit_id_when_empty() {
    let store = store().await;
    let access = AccessLayer::new(store.clone());

    let saved = access
        .put_identified(User::new("Bo", 45), Some("bo"))
        .await
        .unwrap();

    assert_eq!(saved.id, "bo");
    assert_eq!(access.get_one::<User>("bo", &users()).await.unwrap().name, "Bo");
}

#[tokio::test]
async fn put_without_identifier() {
    let store = store().await;
    let access = AccessLayer::new(store.clone());
    let event = Event { kind: "login".into(), at: 1_709_285_400 };

    let saved = access.put(event.clone(), Some("e1")).await.unwrap();
    assert_eq!(saved, event);
    assert_eq!(
        access.get_one::<Event>("e1", &Event::collection()).await.unwrap(),
        event
    );

    access.put(event, None).await.unwrap();
    assert_eq!(store.document_count("events").await, 2);
}

#[tokio::test]
async fn put_encode_failure_writes_nothing() {
    let store = store().await;
    let access = AccessLayer::new(store.clone());

    let err = access
        .put_identified(Counter { key: "k".into(), hits: u64::MAX }, None)
        .await
        .unwrap_err();

    assert!(matches!(err, AccessError::SerializationFailure(_)));
    assert_eq!(err.causes()[0].document_id.as_deref(), Some("k"));
    assert_eq!(store.document_count("counters").await, 0);
}

#[tokio::test]
async fn put_transport_failure_is_classified() {
    let store = build(InMemoryStore::builder().fail_writes("users", codes::PERMISSION_DENIED)).await;
    let access = AccessLayer::new(store.clone());

    let err = access
        .put_identified(User::with_id("a", "Ann", 31), None)
        .await
        .unwrap_err();

    assert!(matches!(err, AccessError::PermissionDenied { .. }));
    assert_eq!(err.collection(), Some(&users()));
    assert!(err.causes().is_empty());
    assert_eq!(store.document_count("users").await, 0);
}

#[tokio::test]
async fn batch_put_writes_everything_and_assigns_ids() {
    let store = store().await;
    let access = AccessLayer::new(store.clone());

    let saved = access
        .batch_put(vec![User::new("Ann", 31), User::with_id("b", "Bo", 45), User::new("Cy", 27)])
        .await
        .unwrap();

    assert_eq!(saved.len(), 3);
    assert!(saved.iter().all(|user| !user.id.is_empty()));
    assert_eq!(saved[1].id, "b");
    assert_eq!(store.document_count("users").await, 3);

    let ids: Vec<&str> = saved.iter().map(|user| user.id.as_str()).collect();
    assert_eq!(access.get_many::<User, _, _>(ids, &users()).await.unwrap(), saved);
}

#[tokio::test]
async fn batch_put_skips_objects_that_fail_to_encode() {
    let store = store().await;
    let access = AccessLayer::new(store.clone());
    let counters = vec![
        Counter { key: "a".into(), hits: 1 },
        Counter { key: "b".into(), hits: u64::MAX },
        Counter { key: "c".into(), hits: 3 },
    ];

    let saved = access.batch_put(counters.clone()).await.unwrap();

    assert_eq!(saved, counters);
    assert_eq!(store.document_count("counters").await, 2);
    assert!(store.raw_document("counters", "b").await.is_none());
}

#[tokio::test]
async fn batch_put_commit_failure_persists_nothing() {
    let store = build(InMemoryStore::builder().fail_commits(codes::UNAVAILABLE)).await;
    let access = AccessLayer::new(store.clone());

    let err = access
        .batch_put(vec![User::with_id("a", "Ann", 31), User::with_id("b", "Bo", 45)])
        .await
        .unwrap_err();

    assert!(matches!(err, AccessError::StoreUnavailable { .. }));
    assert_eq!(store.document_count("users").await, 0);
}

#[tokio::test]
async fn empty_batch_succeeds() {
    let access = AccessLayer::new(store().await);

    let saved = access.batch_put(Vec::<User>::new()).await.unwrap();
    assert!(saved.is_empty());
}

#[tokio::test]
async fn typed_collection_writes() {
    let store = store().await;
    let access = AccessLayer::new(store.clone());
    let counters = access.typed_collection::<Counter>();

    let saved = counters
        .put_identified(Counter { key: String::new(), hits: 4 }, Some("visits"))
        .await
        .unwrap();
    assert_eq!(saved.key, "visits");

    counters
        .batch_put(vec![Counter { key: "downloads".into(), hits: 9 }])
        .await
        .unwrap();

    let all = counters.all().await.unwrap();
    let keys: Vec<&str> = all.iter().map(|counter| counter.key.as_str()).collect();
    assert_eq!(keys, vec!["downloads", "visits"]);
}
