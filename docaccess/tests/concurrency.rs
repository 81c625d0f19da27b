mod common;

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use docaccess::async_trait;
use docaccess::bson::Document;
use docaccess::memory::InMemoryStore;
use docaccess::prelude::*;
use tokio::time::{Instant, sleep};

use common::{User, build, seeded, users};

/// Wraps an [`InMemoryStore`] so that fetching an id takes a configured time.
///
/// Completed fetches are logged in the order they finished.
#[derive(Debug, Clone)]
struct SlowStore {
    inner: InMemoryStore,
    delays: Arc<HashMap<String, Duration>>,
    query_delay: Duration,
    finished: Arc<Mutex<Vec<String>>>,
}

impl SlowStore {
    fn new(inner: InMemoryStore, delays: &[(&str, u64)], query_delay: u64) -> Self {
        Self {
            inner,
            delays: Arc::new(
                delays
                    .iter()
                    .map(|(id, ms)| (id.to_string(), Duration::from_millis(*ms)))
                    .collect(),
            ),
            query_delay: Duration::from_millis(query_delay),
            finished: Arc::default(),
        }
    }

    fn finished(&self) -> Vec<String> {
        self.finished.lock().unwrap().clone()
    }
}

impl Transport for SlowStore {
    fn config(&self) -> &StoreConfig {
        self.inner.config()
    }

    fn collection(&self, name: &str) -> Box<dyn CollectionAccessor> {
        Box::new(SlowCollection { inner: self.inner.collection(name), store: self.clone() })
    }

    fn begin_batch(&self) -> Box<dyn BatchHandle> {
        self.inner.begin_batch()
    }
}

struct SlowCollection {
    inner: Box<dyn CollectionAccessor>,
    store: SlowStore,
}

#[async_trait]
impl CollectionAccessor for SlowCollection {
    async fn fetch_document(&self, id: &str) -> Result<Option<RawDocument>, ProviderError> {
        if let Some(delay) = self.store.delays.get(id) {
            sleep(*delay).await;
        }
        let result = self.inner.fetch_document(id).await;
        self.store.finished.lock().unwrap().push(id.to_string());
        result
    }

    async fn fetch_documents(&self, query: &Query) -> Result<Vec<RawDocument>, ProviderError> {
        sleep(self.store.query_delay).await;
        self.inner.fetch_documents(query).await
    }

    fn generate_id(&self) -> String {
        self.inner.generate_id()
    }

    async fn write(&self, id: &str, payload: Document) -> Result<(), ProviderError> {
        self.inner.write(id, payload).await
    }
}

#[tokio::test(start_paused = true)]
async fn get_many_waits_for_the_slowest_fetch() {
    let slow = SlowStore::new(seeded().await, &[("a", 60), ("b", 10), ("c", 30)], 0);
    let access = AccessLayer::new(slow.clone());

    let started = Instant::now();
    let found = access
        .get_many::<User, _, _>(["a", "b", "c"], &users())
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(slow.finished(), vec!["b", "c", "a"]);
    let ids: Vec<&str> = found.iter().map(|user| user.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);

    assert!(elapsed >= Duration::from_millis(60));
    assert!(elapsed < Duration::from_millis(100));
}

#[tokio::test(start_paused = true)]
async fn get_many_reports_the_error_that_finished_last() {
    let store = build(InMemoryStore::builder().fail_document("users", "y", codes::UNAVAILABLE)).await;
    let slow = SlowStore::new(store, &[("x", 30), ("y", 10)], 0);
    let access = AccessLayer::new(slow.clone());

    let err = access
        .get_many::<User, _, _>(["x", "y"], &users())
        .await
        .unwrap_err();

    assert_eq!(slow.finished(), vec!["y", "x"]);
    assert_eq!(err, AccessError::no_result(Some(&users()), Some("x")));
}

#[tokio::test(start_paused = true)]
async fn get_by_queries_runs_queries_side_by_side() {
    let slow = SlowStore::new(seeded().await, &[], 20);
    let access = AccessLayer::new(slow);
    let queries = [
        Query::new().filter("name", Comparison::Eq, "Ann"),
        Query::new().filter("name", Comparison::Eq, "Bo"),
        Query::new().filter("name", Comparison::Eq, "Cy"),
    ];

    let started = Instant::now();
    let found: Vec<User> = access.get_by_queries(&queries, &users()).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(found.len(), 3);
    assert!(elapsed >= Duration::from_millis(20));
    assert!(elapsed < Duration::from_millis(40));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn shared_access_layer_serves_parallel_callers() {
    let access = Arc::new(AccessLayer::new(seeded().await));

    let mut handles = Vec::new();
    for round in 0..16 {
        let access = access.clone();
        handles.push(tokio::spawn(async move {
            if round % 2 == 0 {
                access
                    .get_many::<User, _, _>(["a", "b", "c", "missing"], &users())
                    .await
            } else {
                access
                    .put_identified(User::new("Writer", round), None)
                    .await
                    .map(|user| vec![user])
            }
        }));
    }

    for handle in handles {
        let users = handle.await.unwrap().unwrap();
        assert!(!users.is_empty());
    }

    let stored = access.get_all::<User>(&users()).await.unwrap();
    assert_eq!(stored.len(), 3 + 8);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_batches_are_all_applied() {
    let access = Arc::new(AccessLayer::new(seeded().await));

    let mut tasks = tokio::task::JoinSet::new();
    for writer in 0..4 {
        let access = access.clone();
        tasks.spawn(async move {
            let batch = (0..5)
                .map(|n| User::with_id(&format!("w{writer}-{n}"), "Batch", n))
                .collect();
            access.batch_put(batch).await
        });
    }

    while let Some(result) = tasks.join_next().await {
        assert_eq!(result.unwrap().unwrap().len(), 5);
    }

    let batched = access
        .get_by_query::<User>(&Query::new().filter("name", Comparison::Eq, "Batch"), &users())
        .await
        .unwrap();
    assert_eq!(batched.len(), 20);
}
