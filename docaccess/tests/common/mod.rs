//! Common test utilities.
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use docaccess::bson::{Document, doc};
use docaccess::memory::{InMemoryStore, InMemoryStoreBuilder};
use docaccess::prelude::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Storable, Identified)]
#[storable(collection = "users")]
pub struct User {
    pub id: String,
    pub name: String,
    pub age: i32,
    pub joined: DateTime<Utc>,
}

impl User {
    /// A user without an id yet.
    pub fn new(name: &str, age: i32) -> Self {
        Self {
            id: String::new(),
            name: name.to_string(),
            age,
            joined: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        }
    }

    pub fn with_id(id: &str, name: &str, age: i32) -> Self {
        Self { id: id.to_string(), ..Self::new(name, age) }
    }
}

/// A type with no identifier of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Storable)]
#[storable(collection = "events")]
pub struct Event {
    pub kind: String,
    pub at: i64,
}

/// Encoding fails when `hits` does not fit a signed 64-bit integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Storable, Identified)]
#[storable(collection = "counters")]
pub struct Counter {
    #[storable(id)]
    pub key: String,
    pub hits: u64,
}

pub fn users() -> CollectionRef {
    User::collection()
}

/// A payload that decodes into a [`User`].
pub fn user_doc(id: &str, name: &str, age: i32) -> Document {
    doc! {
        "id": id,
        "name": name,
        "age": age,
        "joined": "2024-03-01T09:30:00Z",
    }
}

/// A payload that does not decode into a [`User`].
pub fn broken_doc(name: &str) -> Document {
    doc! { "name": name, "age": "unknown" }
}

pub async fn store() -> InMemoryStore {
    build(InMemoryStore::builder()).await
}

pub async fn build(builder: InMemoryStoreBuilder) -> InMemoryStore {
    builder.build().await.unwrap()
}

/// A store seeded with users `a` (Ann, 31), `b` (Bo, 45) and `c` (Cy, 27).
pub async fn seeded() -> InMemoryStore {
    seed(store().await).await
}

pub async fn seed(store: InMemoryStore) -> InMemoryStore {
    store.insert_raw("users", "a", user_doc("a", "Ann", 31)).await;
    store.insert_raw("users", "b", user_doc("b", "Bo", 45)).await;
    store.insert_raw("users", "c", user_doc("c", "Cy", 27)).await;
    store
}
