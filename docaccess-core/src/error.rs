//! Error taxonomy and result types for access layer operations.
//!
//! Every public operation resolves to an [`AccessResult<T>`]. Failures reported by a
//! transport arrive as a [`ProviderError`] carrying a numeric status code and are
//! translated exactly once, at the boundary, by [`classify`]. Decode and encode failures
//! are captured as [`DecodeCause`] records and surface through
//! [`AccessError::SerializationFailure`].
//!
//! Each [`AccessError`] exposes two projections: [`AccessError::user_message`], a stable
//! literal safe to show to end users, and [`AccessError::log_message`], an operator facing
//! description. Neither ever contains raw provider text.

use std::fmt;

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

use crate::collection::CollectionRef;

/// Provider status codes understood by [`classify`].
///
/// Transports translate their native failures into these codes before handing them to
/// the access layer.
pub mod codes {
    pub const CANCELLED: i32 = 1;
    pub const UNKNOWN: i32 = 2;
    pub const INVALID_ARGUMENT: i32 = 3;
    pub const DEADLINE_EXCEEDED: i32 = 4;
    pub const NOT_FOUND: i32 = 5;
    pub const ALREADY_EXISTS: i32 = 6;
    pub const PERMISSION_DENIED: i32 = 7;
    pub const ABORTED: i32 = 10;
    pub const UNAVAILABLE: i32 = 14;
    pub const DATA_LOSS: i32 = 15;
}

const CONNECTIVITY_MESSAGE: &str = "Please check your connection and try again later.";

/// A failure reported by the transport collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("provider error {code}: {message}")]
pub struct ProviderError {
    /// The provider's numeric status code.
    pub code: i32,
    /// Free-form provider text. Kept for diagnostics only.
    pub message: String,
}

impl ProviderError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    /// Classifies this error via [`classify`].
    pub fn classify(
        &self,
        collection: Option<&CollectionRef>,
        object_id: Option<&str>,
    ) -> AccessError {
        classify(self.code, collection, object_id)
    }
}

/// A single decode or encode failure.
///
/// Batch operations collect one cause per failed document so that a
/// [`AccessError::SerializationFailure`] reports all of them rather than the first.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct DecodeCause {
    /// The document the failure belongs to, when known.
    pub document_id: Option<String>,
    /// What went wrong.
    pub message: String,
}

impl DecodeCause {
    pub fn new(message: impl Into<String>) -> Self {
        Self { document_id: None, message: message.into() }
    }

    /// Attaches the id of the document that failed.
    pub fn for_document(mut self, id: impl Into<String>) -> Self {
        self.document_id = Some(id.into());
        self
    }
}

impl fmt::Display for DecodeCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.document_id {
            Some(id) => write!(f, "document {id}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl From<BsonError> for DecodeCause {
    fn from(err: BsonError) -> Self {
        DecodeCause::new(err.to_string())
    }
}

impl From<SerdeJsonError> for DecodeCause {
    fn from(err: SerdeJsonError) -> Self {
        DecodeCause::new(err.to_string())
    }
}

/// The closed set of classified failure kinds.
///
/// Every kind except [`AccessError::SerializationFailure`] optionally records the
/// collection and object the failure relates to.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AccessError {
    /// A query was rejected as malformed.
    #[error("{}{}", self.log_message(), Context(self))]
    BadQuery {
        collection: Option<CollectionRef>,
        object_id: Option<String>,
    },
    /// The document being written already exists.
    #[error("{}{}", self.log_message(), Context(self))]
    DuplicateEntry {
        collection: Option<CollectionRef>,
        object_id: Option<String>,
    },
    /// The store could not be reached.
    #[error("{}{}", self.log_message(), Context(self))]
    StoreUnavailable {
        collection: Option<CollectionRef>,
        object_id: Option<String>,
    },
    /// An address could not be converted into a geographic point.
    #[error("{}{}", self.log_message(), Context(self))]
    GeoConversionFailure {
        collection: Option<CollectionRef>,
        object_id: Option<String>,
    },
    /// The operation exceeded the transport's deadline.
    #[error("{}{}", self.log_message(), Context(self))]
    Timeout {
        collection: Option<CollectionRef>,
        object_id: Option<String>,
    },
    /// The request arguments were structured incorrectly.
    #[error("{}{}", self.log_message(), Context(self))]
    InvalidArgument {
        collection: Option<CollectionRef>,
        object_id: Option<String>,
    },
    /// Nothing matched the request.
    #[error("{}{}", self.log_message(), Context(self))]
    NoResult {
        collection: Option<CollectionRef>,
        object_id: Option<String>,
    },
    /// A document was returned but is incomplete.
    #[error("{}{}", self.log_message(), Context(self))]
    MissingData {
        collection: Option<CollectionRef>,
        object_id: Option<String>,
    },
    /// The caller lacks permission for the operation.
    #[error("{}{}", self.log_message(), Context(self))]
    PermissionDenied {
        collection: Option<CollectionRef>,
        object_id: Option<String>,
    },
    /// One or more documents failed to decode or encode.
    #[error("{} ({} cause(s))", self.log_message(), .0.len())]
    SerializationFailure(Vec<DecodeCause>),
    /// A write could not be persisted.
    #[error("{}{}", self.log_message(), Context(self))]
    SaveFailure {
        collection: Option<CollectionRef>,
        object_id: Option<String>,
    },
    /// Anything the taxonomy does not otherwise cover.
    #[error("{}{}", self.log_message(), Context(self))]
    Unknown {
        collection: Option<CollectionRef>,
        object_id: Option<String>,
    },
}

/// A specialized `Result` type for access layer operations.
pub type AccessResult<T> = Result<T, AccessError>;

impl AccessError {
    pub fn no_result(collection: Option<&CollectionRef>, object_id: Option<&str>) -> Self {
        AccessError::NoResult {
            collection: collection.cloned(),
            object_id: object_id.map(str::to_string),
        }
    }

    pub fn unknown(collection: Option<&CollectionRef>) -> Self {
        AccessError::Unknown { collection: collection.cloned(), object_id: None }
    }

    pub fn serialization(causes: Vec<DecodeCause>) -> Self {
        AccessError::SerializationFailure(causes)
    }

    /// The collection this error relates to, if any.
    pub fn collection(&self) -> Option<&CollectionRef> {
        self.context().and_then(|(collection, _)| collection.as_ref())
    }

    /// The object id this error relates to, if any.
    pub fn object_id(&self) -> Option<&str> {
        self.context().and_then(|(_, object_id)| object_id.as_deref())
    }

    /// Decode causes, for [`AccessError::SerializationFailure`]. Empty otherwise.
    pub fn causes(&self) -> &[DecodeCause] {
        match self {
            AccessError::SerializationFailure(causes) => causes,
            _ => &[],
        }
    }

    fn context(&self) -> Option<(&Option<CollectionRef>, &Option<String>)> {
        match self {
            AccessError::BadQuery { collection, object_id }
            | AccessError::DuplicateEntry { collection, object_id }
            | AccessError::StoreUnavailable { collection, object_id }
            | AccessError::GeoConversionFailure { collection, object_id }
            | AccessError::Timeout { collection, object_id }
            | AccessError::InvalidArgument { collection, object_id }
            | AccessError::NoResult { collection, object_id }
            | AccessError::MissingData { collection, object_id }
            | AccessError::PermissionDenied { collection, object_id }
            | AccessError::SaveFailure { collection, object_id }
            | AccessError::Unknown { collection, object_id } => Some((collection, object_id)),
            AccessError::SerializationFailure(_) => None,
        }
    }

    /// A stable message suitable for end users.
    pub fn user_message(&self) -> &'static str {
        match self {
            AccessError::DuplicateEntry { .. } => {
                "It looks like a record already exists for this item!"
            }
            AccessError::NoResult { .. } => "We weren't able to find what you were looking for.",
            _ => CONNECTIVITY_MESSAGE,
        }
    }

    /// A diagnostic message for operators and logs.
    pub fn log_message(&self) -> &'static str {
        match self {
            AccessError::BadQuery { .. } => "An invalid query was used.",
            AccessError::DuplicateEntry { .. } => {
                "Attempted to write a document that already exists."
            }
            AccessError::StoreUnavailable { .. } => "The document store is unavailable.",
            AccessError::GeoConversionFailure { .. } => {
                "No address could be converted into a geographic point."
            }
            AccessError::Timeout { .. } => "A document store operation timed out.",
            AccessError::InvalidArgument { .. } => {
                "Query arguments were structured incorrectly."
            }
            AccessError::NoResult { .. } => "No document matched the request.",
            AccessError::MissingData { .. } => {
                "Data was returned from the document store, but it is incomplete."
            }
            AccessError::PermissionDenied { .. } => {
                "The caller does not have permission for this operation."
            }
            AccessError::SerializationFailure(_) => {
                "A document could not be serialized or deserialized."
            }
            AccessError::SaveFailure { .. } => "A document could not be saved.",
            AccessError::Unknown { .. } => "An unclassified document store error occurred.",
        }
    }
}

/// Renders the collection / object suffix of a display string.
struct Context<'a>(&'a AccessError);

impl fmt::Display for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(collection) = self.0.collection() {
            write!(f, " [collection: {collection}]")?;
        }
        if let Some(object_id) = self.0.object_id() {
            write!(f, " [object: {object_id}]")?;
        }
        Ok(())
    }
}

/// Maps a provider status code onto the taxonomy.
///
/// Total over all integers: any code outside the table yields [`AccessError::Unknown`].
pub fn classify(
    code: i32,
    collection: Option<&CollectionRef>,
    object_id: Option<&str>,
) -> AccessError {
    let collection = collection.cloned();
    let object_id = object_id.map(str::to_string);

    match code {
        codes::INVALID_ARGUMENT => AccessError::InvalidArgument { collection, object_id },
        codes::DEADLINE_EXCEEDED => AccessError::Timeout { collection: None, object_id: None },
        codes::NOT_FOUND => AccessError::NoResult { collection, object_id },
        codes::ALREADY_EXISTS => AccessError::DuplicateEntry { collection, object_id },
        codes::PERMISSION_DENIED | codes::DATA_LOSS => {
            AccessError::PermissionDenied { collection, object_id: None }
        }
        codes::UNAVAILABLE => AccessError::StoreUnavailable { collection: None, object_id: None },
        _ => AccessError::Unknown { collection, object_id: None },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> CollectionRef {
        CollectionRef::new("users")
    }

    #[test]
    fn table_maps_every_listed_code() {
        let c = users();
        assert!(matches!(classify(3, Some(&c), Some("a")), AccessError::InvalidArgument { .. }));
        assert!(matches!(classify(4, Some(&c), Some("a")), AccessError::Timeout { .. }));
        assert!(matches!(classify(5, Some(&c), Some("a")), AccessError::NoResult { .. }));
        assert!(matches!(classify(6, Some(&c), Some("a")), AccessError::DuplicateEntry { .. }));
        assert!(matches!(classify(7, Some(&c), Some("a")), AccessError::PermissionDenied { .. }));
        assert!(matches!(classify(14, Some(&c), Some("a")), AccessError::StoreUnavailable { .. }));
        assert!(matches!(classify(15, Some(&c), Some("a")), AccessError::PermissionDenied { .. }));
    }

    #[test]
    fn unmapped_codes_are_unknown() {
        let c = users();
        for code in [i32::MIN, -1, 0, 1, 2, 8, 9, 10, 11, 12, 13, 16, 100, i32::MAX] {
            assert_eq!(classify(code, Some(&c), Some("x")), AccessError::unknown(Some(&c)));
        }
    }

    #[test]
    fn context_follows_kind() {
        let c = users();

        let err = classify(5, Some(&c), Some("x"));
        assert_eq!(err.collection(), Some(&c));
        assert_eq!(err.object_id(), Some("x"));

        let err = classify(7, Some(&c), Some("x"));
        assert_eq!(err.collection(), Some(&c));
        assert_eq!(err.object_id(), None);

        let err = classify(4, Some(&c), Some("x"));
        assert_eq!(err.collection(), None);
    }

    #[test]
    fn store_unavailable_uses_connectivity_message() {
        let err = classify(14, Some(&users()), None);
        assert!(matches!(err, AccessError::StoreUnavailable { .. }));
        assert_eq!(err.user_message(), CONNECTIVITY_MESSAGE);
    }

    #[test]
    fn every_kind_has_messages() {
        let c = users();
        let mut errors: Vec<AccessError> = (0..20).map(|code| classify(code, Some(&c), None)).collect();
        errors.push(AccessError::serialization(vec![DecodeCause::new("bad")]));
        errors.push(AccessError::BadQuery { collection: None, object_id: None });
        errors.push(AccessError::GeoConversionFailure { collection: None, object_id: None });
        errors.push(AccessError::MissingData { collection: None, object_id: None });
        errors.push(AccessError::SaveFailure { collection: None, object_id: None });

        for err in errors {
            assert!(!err.user_message().is_empty());
            assert!(!err.log_message().is_empty());
        }
    }

    #[test]
    fn user_messages_never_leak_provider_text() {
        let provider = ProviderError::new(7, "rules rejected read of /secret");
        let err = provider.classify(Some(&users()), None);
        assert!(!err.user_message().contains("secret"));
        assert!(!err.to_string().contains("secret"));
    }

    #[test]
    fn display_includes_context() {
        let err = AccessError::no_result(Some(&users()), Some("x"));
        assert_eq!(
            err.to_string(),
            "No document matched the request. [collection: users] [object: x]"
        );
    }

    #[test]
    fn serialization_failure_keeps_all_causes() {
        let err = AccessError::serialization(vec![
            DecodeCause::new("missing field `name`").for_document("a"),
            DecodeCause::new("invalid type").for_document("b"),
        ]);
        assert_eq!(err.causes().len(), 2);
        assert_eq!(err.causes()[1].to_string(), "document b: invalid type");
        assert_eq!(err.collection(), None);
    }
}
