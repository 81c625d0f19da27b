//! Transport abstraction for the access layer.
//!
//! This module defines the boundary between the access layer and the document store
//! itself. Connection setup, authentication and the wire protocol all live behind these
//! traits; the access layer only ever sees raw documents and [`ProviderError`]s.
//!
//! # Traits
//!
//! - [`Transport`]: Resolves collections and opens batches
//! - [`CollectionAccessor`]: Document operations against one named collection
//! - [`BatchHandle`]: An atomic multi-document write
//! - [`TransportBuilder`]: Factory trait for creating transports from a [`StoreConfig`]
//!
//! # Examples
//!
//! ```ignore
//! use docaccess::backend::Transport;
//! use bson::doc;
//!
//! let users = transport.collection("users");
//! let id = users.generate_id();
//! users.write(&id, doc! { "name": "Alice" }).await?;
//! let raw = users.fetch_document(&id).await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use bson::Document;

use crate::{
    config::StoreConfig,
    decode::RawDocument,
    error::ProviderError,
    query::Query,
};

/// A connection to a document store.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. The access layer issues sub-operations of a
/// fan-out concurrently against the same transport.
///
/// # Error Handling
///
/// Failures are reported as [`ProviderError`] with a provider status code. Transports
/// must not classify errors themselves; the access layer does that exactly once.
pub trait Transport: Send + Sync + Debug {
    /// The configuration this transport was built with.
    fn config(&self) -> &StoreConfig;

    /// Returns a live accessor for the named collection.
    ///
    /// Resolution is lazy and cheap; no I/O happens until an accessor method is awaited.
    fn collection(&self, name: &str) -> Box<dyn CollectionAccessor>;

    /// Starts a new atomic batch.
    fn begin_batch(&self) -> Box<dyn BatchHandle>;
}

/// Document operations against a single collection.
#[async_trait]
pub trait CollectionAccessor: Send + Sync {
    /// Fetches one document by id.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when no document with that id exists.
    async fn fetch_document(&self, id: &str) -> Result<Option<RawDocument>, ProviderError>;

    /// Fetches every document matching `query`, in the order the store returns them.
    async fn fetch_documents(&self, query: &Query) -> Result<Vec<RawDocument>, ProviderError>;

    /// Produces a store-unique id without writing anything.
    fn generate_id(&self) -> String;

    /// Writes `payload` under `id`, replacing any existing document.
    async fn write(&self, id: &str, payload: Document) -> Result<(), ProviderError>;
}

/// A set of writes committed all-or-nothing.
///
/// Writes are staged with [`BatchHandle::add_write`] and become visible only when
/// [`BatchHandle::commit`] succeeds. A failed commit persists none of them.
#[async_trait]
pub trait BatchHandle: Send {
    /// Stages a write of `payload` under `id` in `collection`.
    fn add_write(&mut self, collection: &str, id: &str, payload: Document);

    /// Commits every staged write atomically.
    async fn commit(self: Box<Self>) -> Result<(), ProviderError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn config(&self) -> &StoreConfig {
        (**self).config()
    }

    fn collection(&self, name: &str) -> Box<dyn CollectionAccessor> {
        (**self).collection(name)
    }

    fn begin_batch(&self) -> Box<dyn BatchHandle> {
        (**self).begin_batch()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn config(&self) -> &StoreConfig {
        (**self).config()
    }

    fn collection(&self, name: &str) -> Box<dyn CollectionAccessor> {
        (**self).collection(name)
    }

    fn begin_batch(&self) -> Box<dyn BatchHandle> {
        (**self).begin_batch()
    }
}

/// Factory trait for constructing transports.
///
/// The builder receives its [`StoreConfig`] up front; this is the only place transport
/// configuration is applied.
#[async_trait]
pub trait TransportBuilder: Send + Sync {
    /// The transport type this builder produces.
    type Transport: Transport;

    /// Builds the transport.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] if the transport cannot be set up.
    async fn build(self) -> Result<Self::Transport, ProviderError>;
}
