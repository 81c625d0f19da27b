//! Traits for application types persisted through the access layer.
//!
//! A type becomes storable by declaring the collection it lives in ([`Storable`]).
//! Types that also carry their own document id implement [`HasIdentifier`], which selects
//! the keyed write operations at compile time:
//!
//! - [`AccessLayer::put`](crate::store::AccessLayer::put) for any [`Storable`]; the id
//!   is the explicit one or a generated one and is not stored on the object.
//! - [`AccessLayer::put_identified`](crate::store::AccessLayer::put_identified) and
//!   [`AccessLayer::batch_put`](crate::store::AccessLayer::batch_put) for
//!   [`HasIdentifier`] types; an empty id is filled in before the write.
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
//!     fn collection() -> CollectionRef { CollectionRef::new("users") }
//! }
//!
//! impl HasIdentifier for User {
//!     fn id(&self) -> &str { &self.id }
//!     fn set_id(&mut self, id: String) { self.id = id; }
//! }
//! ```

use bson::{Bson, Document, ser::serialize_to_bson};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, from_value, to_value};

use crate::{collection::CollectionRef, error::DecodeCause};

/// Core trait for every type the access layer reads or writes.
pub trait Storable: Serialize + DeserializeOwned + Send + Sync + Clone + 'static {
    /// The collection documents of this type belong to.
    fn collection() -> CollectionRef;
}

/// A [`Storable`] type that carries a mutable document id.
///
/// An empty id means "not assigned yet".
pub trait HasIdentifier: Storable {
    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);
}

/// Encoding helpers, implemented for every [`Storable`].
pub trait DocumentExt: Storable {
    /// Encodes this value into a document payload.
    ///
    /// # Errors
    ///
    /// Returns a cause if serialization fails or the value does not encode to a map.
    fn to_payload(&self) -> Result<Document, DecodeCause>;

    /// Converts this value to JSON.
    fn to_json(&self) -> Result<Value, DecodeCause>;

    /// Builds a value from JSON.
    fn from_json(value: Value) -> Result<Self, DecodeCause>;
}

impl<D: Storable> DocumentExt for D {
    fn to_payload(&self) -> Result<Document, DecodeCause> {
        match serialize_to_bson(self)? {
            Bson::Document(document) => Ok(document),
            other => Err(DecodeCause::new(format!(
                "expected a document payload, found {:?}",
                other.element_type()
            ))),
        }
    }

    fn to_json(&self) -> Result<Value, DecodeCause> {
        Ok(to_value(self)?)
    }

    fn from_json(value: Value) -> Result<Self, DecodeCause> {
        Ok(from_value(value)?)
    }
}
