//! In-memory transport for docaccess.
//!
//! This crate provides a thread-safe, in-memory implementation of the `Transport` trait.
//! It is meant for development and tests: it evaluates queries, commits batches
//! atomically and can be built with injected provider failures.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using an async-aware RwLock
//! - **Query support** - Predicates, ordering, cursor bounds and limits
//! - **Atomic batches** - Staged writes applied under one lock, or not at all
//! - **Fault injection** - Per-document, per-collection and per-commit provider errors
//!
//! # Quick Start
//!
//! ```ignore
//! use docaccess::{prelude::*, memory::InMemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let access = AccessLayer::new(InMemoryStore::builder().build().await?);
//!     let users = access.typed_collection::<User>();
//!
//!     let alice = users.put_identified(User::new("Alice"), None).await?;
//!     assert_eq!(users.get(alice.id()).await?, alice);
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docaccess_memory;

mod evaluator;
pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
