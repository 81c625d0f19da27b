//! Write path of the [`AccessLayer`].
//!
//! Single writes resolve a document id, encode the object and issue exactly one
//! transport write. Which id rules apply is chosen at compile time: [`AccessLayer::put`]
//! accepts any [`Storable`], [`AccessLayer::put_identified`] and
//! [`AccessLayer::batch_put`] require [`HasIdentifier`].
//!
//! Batch writes encode every object up front. Objects that fail to encode are left out
//! of the batch and reported through logs once the commit succeeds; they never fail the
//! batch on their own.

use tracing::{debug, warn};

use crate::{
    backend::Transport,
    document::{DocumentExt, HasIdentifier, Storable},
    error::{AccessError, AccessResult},
    store::AccessLayer,
};

impl<T: Transport> AccessLayer<T> {
    /// Writes `object` under `explicit_id`, or under a freshly generated id.
    ///
    /// The id is not stored on the object; use [`AccessLayer::put_identified`] for types
    /// that carry one.
    ///
    /// # Errors
    ///
    /// - [`AccessError::SerializationFailure`] if `object` cannot be encoded
    /// - the classified provider error if the write fails
    pub async fn put<D: Storable>(&self, object: D, explicit_id: Option<&str>) -> AccessResult<D> {
        let collection = D::collection();
        let accessor = self.accessor(&collection);
        let id = explicit_id
            .map(str::to_string)
            .unwrap_or_else(|| accessor.generate_id());

        debug!(collection = %collection, id = %id, "put");

        let payload = object
            .to_payload()
            .map_err(|cause| AccessError::serialization(vec![cause.for_document(id.clone())]))?;

        accessor
            .write(&id, payload)
            .await
            .map_err(|err| err.classify(Some(&collection), Some(&id)))?;

        Ok(object)
    }

    /// Writes `object` keyed by its own id.
    ///
    /// An object whose id is empty first receives `explicit_id`, or a generated id. An
    /// object that already has an id keeps it and `explicit_id` is ignored. The returned
    /// object carries the id it was written under.
    ///
    /// # Errors
    ///
    /// Same as [`AccessLayer::put`].
    pub async fn put_identified<D: HasIdentifier>(
        &self,
        mut object: D,
        explicit_id: Option<&str>,
    ) -> AccessResult<D> {
        let collection = D::collection();
        let accessor = self.accessor(&collection);

        if object.id().is_empty() {
            let id = explicit_id
                .map(str::to_string)
                .unwrap_or_else(|| accessor.generate_id());
            object.set_id(id);
        }

        let id = object.id().to_string();
        debug!(collection = %collection, id = %id, "put identified");

        let payload = object
            .to_payload()
            .map_err(|cause| AccessError::serialization(vec![cause.for_document(id.clone())]))?;

        accessor
            .write(&id, payload)
            .await
            .map_err(|err| err.classify(Some(&collection), Some(&id)))?;

        Ok(object)
    }

    /// Writes every object in one atomic batch.
    ///
    /// Objects with an empty id are assigned a generated one first. On success the full
    /// input list is returned with resolved ids, including any object that failed to
    /// encode and was therefore not written; those failures are logged.
    ///
    /// # Errors
    ///
    /// Returns the classified provider error if the commit fails, in which case nothing
    /// from the batch was persisted.
    pub async fn batch_put<D: HasIdentifier>(&self, mut objects: Vec<D>) -> AccessResult<Vec<D>> {
        let collection = D::collection();
        let accessor = self.accessor(&collection);
        let mut batch = self.transport.begin_batch();
        let mut causes = Vec::new();

        debug!(collection = %collection, count = objects.len(), "batch put");

        for object in &mut objects {
            if object.id().is_empty() {
                object.set_id(accessor.generate_id());
            }

            match object.to_payload() {
                Ok(payload) => batch.add_write(collection.name(), object.id(), payload),
                Err(cause) => causes.push(cause.for_document(object.id())),
            }
        }

        batch
            .commit()
            .await
            .map_err(|err| err.classify(Some(&collection), None))?;

        if !causes.is_empty() {
            warn!(
                collection = %collection,
                failed = causes.len(),
                total = objects.len(),
                "batch committed without objects that failed to encode"
            );
            for cause in &causes {
                warn!(collection = %collection, cause = %cause, "batch object failed to encode");
            }
        }

        Ok(objects)
    }
}
