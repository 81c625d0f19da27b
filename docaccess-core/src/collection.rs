//! Collection handles.
//!
//! - [`CollectionRef`] - An immutable name for a logical document collection. Transports
//!   resolve it into a live [`CollectionAccessor`](crate::backend::CollectionAccessor) on
//!   every operation; the reference itself caches nothing.
//! - [`TypedCollection`] - A borrowed, typed view over an [`AccessLayer`] bound to the
//!   collection a [`Storable`] type declares.
//!
//! # Example
//!
//! ```ignore
//! let users = access.typed_collection::<User>();
//! let alice = users.get("alice").await?;
//! let admins = users.query(&Query::new().filter("role", Comparison::Eq, "admin")).await?;
//! ```

use std::{fmt, marker::PhantomData};

use serde::{Deserialize, Serialize};

use crate::{
    backend::Transport,
    document::{HasIdentifier, Storable},
    error::AccessResult,
    query::Query,
    store::AccessLayer,
};

/// An opaque handle naming a logical document collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CollectionRef {
    name: String,
}

impl CollectionRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for CollectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for CollectionRef {
    fn from(name: &str) -> Self {
        CollectionRef::new(name)
    }
}

impl From<String> for CollectionRef {
    fn from(name: String) -> Self {
        CollectionRef::new(name)
    }
}

/// A typed view of the collection `D` belongs to.
///
/// Every method forwards to the matching [`AccessLayer`] operation with the collection
/// filled in from [`Storable::collection`].
#[derive(Debug)]
pub struct TypedCollection<'a, T: Transport, D: Storable> {
    collection: CollectionRef,
    access: &'a AccessLayer<T>,
    _marker: PhantomData<D>,
}

impl<'a, T: Transport, D: Storable> TypedCollection<'a, T, D> {
    pub(crate) fn new(access: &'a AccessLayer<T>) -> Self {
        Self { collection: D::collection(), access, _marker: PhantomData }
    }

    /// Returns the collection this view is bound to.
    pub fn collection(&self) -> &CollectionRef {
        &self.collection
    }

    /// See [`AccessLayer::get_one`].
    pub async fn get(&self, id: &str) -> AccessResult<D> {
        self.access.get_one(id, &self.collection).await
    }

    /// See [`AccessLayer::get_many`].
    pub async fn get_many<I, S>(&self, ids: I) -> AccessResult<Vec<D>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.access.get_many(ids, &self.collection).await
    }

    /// See [`AccessLayer::get_by_query`].
    pub async fn query(&self, query: &Query) -> AccessResult<Vec<D>> {
        self.access.get_by_query(query, &self.collection).await
    }

    /// See [`AccessLayer::get_by_queries`].
    pub async fn query_many(&self, queries: &[Query]) -> AccessResult<Vec<D>> {
        self.access.get_by_queries(queries, &self.collection).await
    }

    /// See [`AccessLayer::get_all`].
    pub async fn all(&self) -> AccessResult<Vec<D>> {
        self.access.get_all(&self.collection).await
    }

    /// See [`AccessLayer::search`].
    pub async fn search(&self, term: &str, field: &str) -> AccessResult<Vec<D>> {
        self.access.search(term, field, &self.collection).await
    }

    /// See [`AccessLayer::put`].
    pub async fn put(&self, object: D, explicit_id: Option<&str>) -> AccessResult<D> {
        self.access.put(object, explicit_id).await
    }
}

impl<'a, T: Transport, D: HasIdentifier> TypedCollection<'a, T, D> {
    /// See [`AccessLayer::put_identified`].
    pub async fn put_identified(&self, object: D, explicit_id: Option<&str>) -> AccessResult<D> {
        self.access.put_identified(object, explicit_id).await
    }

    /// See [`AccessLayer::batch_put`].
    pub async fn batch_put(&self, objects: Vec<D>) -> AccessResult<Vec<D>> {
        self.access.batch_put(objects).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_name() {
        let users = CollectionRef::new("users");
        assert_eq!(users.to_string(), "users");
        assert_eq!(users.name(), "users");
    }

    #[test]
    fn conversions_preserve_name() {
        assert_eq!(CollectionRef::from("orders"), CollectionRef::new("orders"));
        assert_eq!(CollectionRef::from(String::from("orders")).name(), "orders");
    }
}
