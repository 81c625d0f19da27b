//! In-memory transport implementation.
//!
//! Documents live in ordered maps behind an async-aware read-write lock. Batches are
//! staged outside the lock and applied under a single write lock on commit, which makes
//! them atomic with respect to every reader.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use async_trait::async_trait;
use bson::Document;
use mea::rwlock::RwLock;
use tracing::debug;
use uuid::Uuid;

use docaccess_core::{
    backend::{BatchHandle, CollectionAccessor, Transport, TransportBuilder},
    config::StoreConfig,
    decode::RawDocument,
    error::ProviderError,
    query::Query,
};

use crate::evaluator::evaluate;

/// document id -> payload. `None` marks a document that exists without data.
type CollectionMap = BTreeMap<String, Option<Document>>;
type StoreMap = HashMap<String, CollectionMap>;

const AUTO_ID_LENGTH: usize = 20;
const AUTO_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Thread-safe in-memory document store.
///
/// # Thread Safety
///
/// `InMemoryStore` is cloneable and uses `Arc`-wrapped state; clones share the same
/// documents.
///
/// # Faults
///
/// Failures can be injected at build time through [`InMemoryStoreBuilder`]. They are
/// fixed for the lifetime of the store.
///
/// # Example
///
/// ```ignore
/// use docaccess_memory::InMemoryStore;
/// use docaccess::backend::{Transport, TransportBuilder};
/// use bson::doc;
///
/// let store = InMemoryStore::builder().build().await?;
/// let users = store.collection("users");
/// users.write("alice", doc! { "name": "Alice" }).await?;
/// assert!(users.fetch_document("alice").await?.is_some());
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    store: Arc<RwLock<StoreMap>>,
    config: StoreConfig,
    faults: Arc<Faults>,
}

impl InMemoryStore {
    /// Creates an empty store with the default configuration and no faults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    /// Stores `data` under `id` without going through the access layer.
    ///
    /// Useful for seeding documents that do not match any application type.
    pub async fn insert_raw(&self, collection: &str, id: &str, data: Document) {
        self.store
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), Some(data));
    }

    /// Stores a document under `id` that exists but carries no data.
    pub async fn insert_empty(&self, collection: &str, id: &str) {
        self.store
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), None);
    }

    /// Returns the stored payload for `id`, if any.
    pub async fn raw_document(&self, collection: &str, id: &str) -> Option<Document> {
        self.store
            .read()
            .await
            .get(collection)
            .and_then(|documents| documents.get(id).cloned().flatten())
    }

    /// Number of documents in `collection`.
    pub async fn document_count(&self, collection: &str) -> usize {
        self.store
            .read()
            .await
            .get(collection)
            .map_or(0, BTreeMap::len)
    }
}

impl Transport for InMemoryStore {
    fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn collection(&self, name: &str) -> Box<dyn CollectionAccessor> {
        Box::new(MemoryCollection {
            name: name.to_string(),
            store: self.store.clone(),
            faults: self.faults.clone(),
        })
    }

    fn begin_batch(&self) -> Box<dyn BatchHandle> {
        Box::new(MemoryBatch {
            store: self.store.clone(),
            commit_fault: self.faults.commit,
            staged: Vec::new(),
        })
    }
}

/// Accessor for one collection of an [`InMemoryStore`].
#[derive(Debug)]
struct MemoryCollection {
    name: String,
    store: Arc<RwLock<StoreMap>>,
    faults: Arc<Faults>,
}

#[async_trait]
impl CollectionAccessor for MemoryCollection {
    async fn fetch_document(&self, id: &str) -> Result<Option<RawDocument>, ProviderError> {
        if let Some(code) = self.faults.document(&self.name, id) {
            return Err(ProviderError::new(code, format!("injected fetch failure for {id}")));
        }

        let store = self.store.read().await;
        Ok(store
            .get(&self.name)
            .and_then(|documents| documents.get(id))
            .map(|data| RawDocument { id: id.to_string(), data: data.clone() }))
    }

    async fn fetch_documents(&self, query: &Query) -> Result<Vec<RawDocument>, ProviderError> {
        if let Some(code) = self.faults.queries.get(&self.name) {
            return Err(ProviderError::new(*code, "injected query failure"));
        }

        let store = self.store.read().await;
        let Some(documents) = store.get(&self.name) else {
            return Ok(Vec::new());
        };

        let mut results = Vec::new();

        // Documents without data never satisfy predicates, but an unrestricted read
        // still returns them.
        if query.is_unrestricted() && query.order.is_none() {
            results.extend(
                documents
                    .iter()
                    .map(|(id, data)| RawDocument { id: id.clone(), data: data.clone() }),
            );
        } else {
            let populated = documents
                .iter()
                .filter_map(|(id, data)| data.as_ref().map(|data| (id, data)));

            results.extend(
                evaluate(populated, query)?
                    .into_iter()
                    .map(|(id, data)| RawDocument::new(id.clone(), data.clone())),
            );
        }

        debug!(collection = %self.name, matched = results.len(), "memory query");
        Ok(results)
    }

    fn generate_id(&self) -> String {
        let mut value = Uuid::new_v4().as_u128();
        let base = AUTO_ID_ALPHABET.len() as u128;

        (0..AUTO_ID_LENGTH)
            .map(|_| {
                let index = (value % base) as usize;
                value /= base;
                AUTO_ID_ALPHABET[index] as char
            })
            .collect()
    }

    async fn write(&self, id: &str, payload: Document) -> Result<(), ProviderError> {
        if let Some(code) = self.faults.writes.get(&self.name) {
            return Err(ProviderError::new(*code, format!("injected write failure for {id}")));
        }

        self.store
            .write()
            .await
            .entry(self.name.clone())
            .or_default()
            .insert(id.to_string(), Some(payload));

        Ok(())
    }
}

/// A staged batch against an [`InMemoryStore`].
struct MemoryBatch {
    store: Arc<RwLock<StoreMap>>,
    commit_fault: Option<i32>,
    staged: Vec<(String, String, Document)>,
}

#[async_trait]
impl BatchHandle for MemoryBatch {
    fn add_write(&mut self, collection: &str, id: &str, payload: Document) {
        self.staged.push((collection.to_string(), id.to_string(), payload));
    }

    async fn commit(self: Box<Self>) -> Result<(), ProviderError> {
        if let Some(code) = self.commit_fault {
            return Err(ProviderError::new(
                code,
                format!("injected commit failure, {} staged write(s) discarded", self.staged.len()),
            ));
        }

        let mut store = self.store.write().await;
        let count = self.staged.len();

        for (collection, id, payload) in self.staged {
            store.entry(collection).or_default().insert(id, Some(payload));
        }

        debug!(writes = count, "memory batch committed");
        Ok(())
    }
}

/// Failures injected into an [`InMemoryStore`].
#[derive(Debug, Default)]
struct Faults {
    /// (collection, id) -> code
    documents: HashMap<(String, String), i32>,
    /// collection -> code
    queries: HashMap<String, i32>,
    /// collection -> code
    writes: HashMap<String, i32>,
    commit: Option<i32>,
}

impl Faults {
    fn document(&self, collection: &str, id: &str) -> Option<i32> {
        self.documents
            .get(&(collection.to_string(), id.to_string()))
            .copied()
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
///
/// # Example
///
/// ```ignore
/// use docaccess_memory::InMemoryStore;
/// use docaccess::{backend::TransportBuilder, error::codes};
///
/// let store = InMemoryStore::builder()
///     .fail_document("users", "bob", codes::PERMISSION_DENIED)
///     .fail_commits(codes::ABORTED)
///     .build()
///     .await?;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStoreBuilder {
    config: StoreConfig,
    faults: Faults,
}

impl InMemoryStoreBuilder {
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Fetching `id` from `collection` fails with `code`.
    pub fn fail_document(mut self, collection: &str, id: &str, code: i32) -> Self {
        self.faults
            .documents
            .insert((collection.to_string(), id.to_string()), code);
        self
    }

    /// Every query against `collection` fails with `code`.
    pub fn fail_queries(mut self, collection: &str, code: i32) -> Self {
        self.faults.queries.insert(collection.to_string(), code);
        self
    }

    /// Every single-document write to `collection` fails with `code`.
    pub fn fail_writes(mut self, collection: &str, code: i32) -> Self {
        self.faults.writes.insert(collection.to_string(), code);
        self
    }

    /// Every batch commit fails with `code` after its writes were accepted.
    pub fn fail_commits(mut self, code: i32) -> Self {
        self.faults.commit = Some(code);
        self
    }
}

#[async_trait]
impl TransportBuilder for InMemoryStoreBuilder {
    type Transport = InMemoryStore;

    async fn build(self) -> Result<Self::Transport, ProviderError> {
        Ok(InMemoryStore {
            store: Arc::new(RwLock::new(StoreMap::new())),
            config: self.config,
            faults: Arc::new(self.faults),
        })
    }
}
