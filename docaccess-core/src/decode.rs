//! Conversion of raw store documents into typed values.

use bson::{Bson, Document, de::deserialize_from_bson};
use serde::de::DeserializeOwned;

use crate::error::DecodeCause;

/// A document as handed back by a transport.
///
/// `data` is `None` when the store acknowledges the document but has no payload for it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    pub id: String,
    pub data: Option<Document>,
}

impl RawDocument {
    pub fn new(id: impl Into<String>, data: Document) -> Self {
        Self { id: id.into(), data: Some(data) }
    }

    /// A document that exists but carries no payload.
    pub fn empty(id: impl Into<String>) -> Self {
        Self { id: id.into(), data: None }
    }
}

/// Outcome of decoding one [`RawDocument`].
///
/// [`DecodeResult::Absent`] is not an error: the document was there, it just yielded
/// no value.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeResult<T> {
    Value(T),
    Absent,
    DecodeError(DecodeCause),
}

impl<T> DecodeResult<T> {
    pub fn is_error(&self) -> bool {
        matches!(self, DecodeResult::DecodeError(_))
    }

    /// Drops the error distinction, keeping only a present value.
    pub fn into_option(self) -> Option<T> {
        match self {
            DecodeResult::Value(value) => Some(value),
            _ => None,
        }
    }
}

/// Decodes `raw` into `T`. Never panics; every failure becomes
/// [`DecodeResult::DecodeError`] tagged with the document id.
pub fn decode<T: DeserializeOwned>(raw: &RawDocument) -> DecodeResult<T> {
    let Some(data) = &raw.data else {
        return DecodeResult::Absent;
    };

    match deserialize_from_bson::<T>(Bson::Document(data.clone())) {
        Ok(value) => DecodeResult::Value(value),
        Err(err) => DecodeResult::DecodeError(DecodeCause::from(err).for_document(raw.id.clone())),
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Account {
        owner: String,
        balance: i64,
    }

    #[test]
    fn decodes_present_value() {
        let raw = RawDocument::new("a1", doc! { "owner": "ana", "balance": 12_i64 });
        assert_eq!(
            decode::<Account>(&raw),
            DecodeResult::Value(Account { owner: "ana".into(), balance: 12 })
        );
    }

    #[test]
    fn empty_document_is_absent_not_error() {
        let result = decode::<Account>(&RawDocument::empty("a1"));
        assert_eq!(result, DecodeResult::Absent);
        assert!(!result.is_error());
    }

    #[test]
    fn type_mismatch_is_captured_with_id() {
        let raw = RawDocument::new("a2", doc! { "owner": 7, "balance": "lots" });
        match decode::<Account>(&raw) {
            DecodeResult::DecodeError(cause) => {
                assert_eq!(cause.document_id.as_deref(), Some("a2"));
                assert!(!cause.message.is_empty());
            }
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn missing_field_is_an_error() {
        let raw = RawDocument::new("a3", doc! { "owner": "bo" });
        assert!(decode::<Account>(&raw).is_error());
        assert_eq!(decode::<Account>(&raw).into_option(), None);
    }
}
