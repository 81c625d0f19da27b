//! Convenient re-exports of commonly used types from docaccess.
//!
//! ```ignore
//! use docaccess::prelude::*;
//! ```
//!
//! This provides access to:
//! - The access layer and typed collections
//! - Storable traits and their derive macros
//! - Transport traits and builders
//! - Query construction
//! - Error types and configuration

pub use docaccess_core::{
    backend::{BatchHandle, CollectionAccessor, Transport, TransportBuilder},
    collection::{CollectionRef, TypedCollection},
    config::{AccessConfig, ReadPolicy, StoreConfig},
    decode::{DecodeResult, RawDocument, decode},
    document::{DocumentExt, HasIdentifier, Storable},
    error::{AccessError, AccessResult, DecodeCause, ProviderError, classify, codes},
    query::{Comparison, Direction, Query},
    store::AccessLayer,
};
pub use docaccess_macros::{Identified, Storable};
