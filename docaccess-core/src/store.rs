//! The access layer: typed operations over a [`Transport`].
//!
//! [`AccessLayer`] is the main entry point. Its operations are split by direction:
//!
//! - read path - `get_one`, `get_many`, `get_by_query`,
//!   `get_by_queries`, `get_all`, `search`
//! - write path - `put`, `put_identified`, `batch_put`
//!
//! Every operation is a single request/response cycle against the transport. Nothing is
//! retried, cached or coalesced, and no state is kept between calls.
//!
//! # Example
//!
//! ```ignore
//! use docaccess::prelude::*;
//! use docaccess::memory::InMemoryStore;
//!
//! let access = AccessLayer::new(InMemoryStore::builder().build().await?);
//! let saved = access.put_identified(user, None).await?;
//! let loaded: User = access.get_one(saved.id(), &User::collection()).await?;
//! ```

use tracing::debug;

use crate::{
    backend::{CollectionAccessor, Transport},
    collection::{CollectionRef, TypedCollection},
    config::AccessConfig,
    document::Storable,
};

/// Typed access to a document store through transport `T`.
///
/// # Type Parameters
///
/// * `T` - The transport. Use `Arc<dyn Transport>` to choose one at runtime.
#[derive(Debug)]
pub struct AccessLayer<T: Transport> {
    pub(crate) transport: T,
    pub(crate) config: AccessConfig,
}

impl<T: Transport> AccessLayer<T> {
    /// Creates an access layer with the default (lossy) read policy.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, AccessConfig::default())
    }

    pub fn with_config(transport: T, config: AccessConfig) -> Self {
        debug!(
            read_policy = ?config.read_policy,
            persistence_enabled = transport.config().persistence_enabled,
            project = ?transport.config().project,
            "access layer created"
        );

        Self { transport, config }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    /// Gets a typed view of the collection `D` belongs to.
    pub fn typed_collection<D: Storable>(&self) -> TypedCollection<'_, T, D> {
        TypedCollection::new(self)
    }

    /// Consumes the access layer, returning the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    pub(crate) fn accessor(&self, collection: &CollectionRef) -> Box<dyn CollectionAccessor> {
        self.transport.collection(collection.name())
    }
}
