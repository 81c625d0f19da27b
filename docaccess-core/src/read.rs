//! Read path of the [`AccessLayer`].
//!
//! Single-document reads map straight onto one transport fetch. Multi-id and
//! multi-query reads fan out concurrently and aggregate with an "any success wins"
//! policy: if at least one sub-read succeeds, the successful results are returned and
//! every error is discarded.
//!
//! Query reads decode every returned document independently. Under
//! [`ReadPolicy::Lossy`] documents that fail to decode are logged and skipped as long as
//! at least one other document decoded; under [`ReadPolicy::Strict`] any failure fails
//! the read.

use tracing::{debug, warn};

use crate::{
    backend::Transport,
    collection::CollectionRef,
    config::ReadPolicy,
    decode::{DecodeResult, RawDocument, decode},
    document::Storable,
    error::{AccessError, AccessResult, DecodeCause},
    fanin::fan_out,
    query::Query,
    store::AccessLayer,
};

impl<T: Transport> AccessLayer<T> {
    /// Fetches one document by id.
    ///
    /// # Errors
    ///
    /// - [`AccessError::NoResult`] if no document has that id
    /// - [`AccessError::Unknown`] if the document exists but carries no value
    /// - [`AccessError::SerializationFailure`] if the document does not decode into `D`
    /// - the classified provider error if the fetch itself fails
    pub async fn get_one<D: Storable>(&self, id: &str, collection: &CollectionRef) -> AccessResult<D> {
        debug!(collection = %collection, id, "get one");

        let raw = self
            .accessor(collection)
            .fetch_document(id)
            .await
            .map_err(|err| err.classify(Some(collection), Some(id)))?
            .ok_or_else(|| AccessError::no_result(Some(collection), Some(id)))?;

        match decode::<D>(&raw) {
            DecodeResult::Value(value) => Ok(value),
            DecodeResult::Absent => Err(AccessError::unknown(Some(collection))),
            DecodeResult::DecodeError(cause) => Err(AccessError::serialization(vec![cause])),
        }
    }

    /// Fetches several documents by id, one concurrent fetch per id.
    ///
    /// Returns the documents that could be fetched, in the order of `ids`. Fails only if
    /// every fetch failed, with the error of the fetch that completed last, or with
    /// [`AccessError::NoResult`] when `ids` is empty.
    pub async fn get_many<D, I, S>(&self, ids: I, collection: &CollectionRef) -> AccessResult<Vec<D>>
    where
        D: Storable,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids: Vec<S> = ids.into_iter().collect();
        debug!(collection = %collection, count = ids.len(), "get many");

        fan_out(ids.iter(), |id| self.get_one::<D>(id.as_ref(), collection))
            .await
            .finish(AccessError::no_result(Some(collection), None))
    }

    /// Fetches every document matching `query`.
    ///
    /// # Errors
    ///
    /// - the classified provider error if the query fails
    /// - [`AccessError::SerializationFailure`] with every recorded cause if no document
    ///   decoded but some failed, or if any failed under [`ReadPolicy::Strict`]
    /// - [`AccessError::NoResult`] if nothing decoded and nothing failed
    pub async fn get_by_query<D: Storable>(
        &self,
        query: &Query,
        collection: &CollectionRef,
    ) -> AccessResult<Vec<D>> {
        debug!(collection = %collection, predicates = query.predicates.len(), "get by query");

        let documents = self
            .accessor(collection)
            .fetch_documents(query)
            .await
            .map_err(|err| err.classify(Some(collection), None))?;

        let (values, causes) = decode_all::<D>(&documents);

        if !causes.is_empty() {
            for cause in &causes {
                warn!(collection = %collection, cause = %cause, "document failed to decode");
            }

            if self.config.read_policy == ReadPolicy::Strict {
                return Err(AccessError::serialization(causes));
            }
        }

        if !values.is_empty() {
            if !causes.is_empty() {
                debug!(
                    collection = %collection,
                    decoded = values.len(),
                    skipped = causes.len(),
                    "returning partial query result"
                );
            }
            return Ok(values);
        }

        if causes.is_empty() {
            Err(AccessError::no_result(None, None))
        } else {
            Err(AccessError::serialization(causes))
        }
    }

    /// Runs several queries concurrently and concatenates their results.
    ///
    /// Results are concatenated in the order of `queries`, each keeping its own order.
    /// Fails only if every query failed, with the error of the query that completed last,
    /// or with [`AccessError::Unknown`] when `queries` is empty.
    pub async fn get_by_queries<D: Storable>(
        &self,
        queries: &[Query],
        collection: &CollectionRef,
    ) -> AccessResult<Vec<D>> {
        debug!(collection = %collection, count = queries.len(), "get by queries");

        let results = fan_out(queries, |query| self.get_by_query::<D>(query, collection))
            .await
            .finish(AccessError::unknown(None))?;

        Ok(results.into_iter().flatten().collect())
    }

    /// Fetches every document in `collection`.
    ///
    /// Follows the same decode and error rules as [`AccessLayer::get_by_query`].
    pub async fn get_all<D: Storable>(&self, collection: &CollectionRef) -> AccessResult<Vec<D>> {
        self.get_by_query(&Query::new(), collection).await
    }

    /// Finds documents whose string `field` starts with `term`, ordered by `field`.
    ///
    /// Unlike [`AccessLayer::get_by_query`], an empty match is not an error, and
    /// documents that fail to decode are always skipped.
    pub async fn search<D: Storable>(
        &self,
        term: &str,
        field: &str,
        collection: &CollectionRef,
    ) -> AccessResult<Vec<D>> {
        debug!(collection = %collection, field, term, "search");

        let documents = self
            .accessor(collection)
            .fetch_documents(&Query::prefix(field, term))
            .await
            .map_err(|err| err.classify(Some(collection), None))?;

        let (values, causes) = decode_all::<D>(&documents);
        for cause in &causes {
            warn!(collection = %collection, cause = %cause, "search result failed to decode");
        }

        Ok(values)
    }
}

/// Decodes every document, splitting values from failures. Absent documents are
/// neither.
fn decode_all<D: Storable>(documents: &[RawDocument]) -> (Vec<D>, Vec<DecodeCause>) {
    let mut values = Vec::with_capacity(documents.len());
    let mut causes = Vec::new();

    for raw in documents {
        match decode::<D>(raw) {
            DecodeResult::Value(value) => values.push(value),
            DecodeResult::Absent => {}
            DecodeResult::DecodeError(cause) => causes.push(cause),
        }
    }

    (values, causes)
}
