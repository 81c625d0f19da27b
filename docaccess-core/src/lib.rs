//! A typed access layer over schemaless document stores.
//!
//! This crate is the core of the docaccess project and provides:
//!
//! - **Error taxonomy** ([`error`]) - Classified failures, provider code mapping and message projections
//! - **Decoding** ([`decode`]) - Raw documents and the value / absent / error decode outcome
//! - **Storable traits** ([`document`]) - What application types implement to be persisted
//! - **Collections** ([`collection`]) - Collection references and typed collection views
//! - **Transport abstraction** ([`backend`]) - The interface a document store connection provides
//! - **Queries** ([`query`]) - The query model transports evaluate
//! - **Configuration** ([`config`]) - Transport and access layer settings
//! - **Access layer** ([`store`]) - Typed reads, fan-out reads, single and batch writes
//!
//! # Example
//!
//! ```ignore
//! use docaccess::prelude::*;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct User {
//!     pub id: String,
//!     pub name: String,
//! }
//!
//! impl Storable for User {
//!     fn collection() -> CollectionRef {
//!         CollectionRef::new("users")
//!     }
//! }
//!
//! impl HasIdentifier for User {
//!     fn id(&self) -> &str {
//!         &self.id
//!     }
//!
//!     fn set_id(&mut self, id: String) {
//!         self.id = id;
//!     }
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docaccess_core;

pub mod backend;
pub mod collection;
pub mod config;
pub mod decode;
pub mod document;
pub mod error;
pub mod query;
pub mod store;

mod fanin;
mod read;
mod write;
