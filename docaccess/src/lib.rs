//! Main docaccess crate providing typed access to schemaless document stores.
//!
//! This crate is the primary entry point. It re-exports the core types from
//! `docaccess-core`, the derive macros, and the in-memory transport.
//!
//! # Features
//!
//! - **Typed CRUD** - Read and write Serde types against untyped document collections
//! - **Fan-out reads** - Fetch many ids or run many queries concurrently with one result
//! - **Atomic batches** - Multi-document writes committed all-or-nothing
//! - **Stable errors** - Provider status codes normalized into a closed taxonomy with
//!   user-facing and operator-facing messages
//!
//! # Quick Start
//!
//! ```ignore
//! use docaccess::{prelude::*, memory::InMemoryStore};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Storable, Identified)]
//! #[storable(collection = "users")]
//! pub struct User {
//!     pub id: String,
//!     pub name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let access = AccessLayer::new(InMemoryStore::builder().build().await.unwrap());
//!
//!     // An empty id is filled in on write
//!     let alice = access
//!         .put_identified(User { id: String::new(), name: "Alice".into() }, None)
//!         .await
//!         .unwrap();
//!
//!     let users = access.typed_collection::<User>();
//!     assert_eq!(users.get(&alice.id).await.unwrap(), alice);
//!
//!     let found = users
//!         .query(&Query::new().filter("name", Comparison::Eq, "Alice"))
//!         .await
//!         .unwrap();
//!
//!     println!("Queried users: {:?}", found);
//! }
//! ```
//!
//! # Errors
//!
//! Every operation returns [`AccessResult`](error::AccessResult). Show
//! [`AccessError::user_message`](error::AccessError::user_message) to end users and log
//! the error itself.
//!
//! ```ignore
//! match users.get("missing").await {
//!     Ok(user) => println!("{user:?}"),
//!     Err(err) => {
//!         tracing::warn!(error = %err, "lookup failed");
//!         show_banner(err.user_message());
//!     }
//! }
//! ```
//!
//! # Dynamic Dispatch
//!
//! `Transport` is object safe and implemented for `Arc<T>`, so the backend can be picked
//! at runtime:
//!
//! ```ignore
//! let transport: Arc<dyn Transport> = Arc::new(InMemoryStore::new());
//! let access = AccessLayer::new(transport);
//! ```

#[allow(unused_extern_crates)]
extern crate self as docaccess;

pub mod prelude;

pub use docaccess_core::{backend, collection, config, decode, document, error, query, store};
pub use docaccess_macros::{Identified, Storable};

// Re-exported for transport implementors and raw payloads
pub use async_trait::async_trait;
pub use bson;

/// In-memory transport implementations.
pub mod memory {
    pub use docaccess_memory::{InMemoryStore, InMemoryStoreBuilder};
}
