//! Cached, reference-resolving access to one entity type.

mod cache;
mod hydrate;

use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::client::LibrusClient;
use crate::codec;
use crate::error::ClientError;
use crate::models::Reference;

pub use cache::{EntityCache, EntityGraph};
pub use hydrate::Resolvable;

/// Per-call cache behavior for [`Resolver::fetch_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Skip the cache lookup and always hit the API.
    pub force: bool,
    /// Store the decoded record.
    pub cache: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            force: false,
            cache: true,
        }
    }
}

impl FetchOptions {
    #[must_use]
    pub fn forced() -> Self {
        Self {
            force: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn uncached() -> Self {
        Self {
            cache: false,
            ..Self::default()
        }
    }
}

/// Fetches `E` records through the client's session and keeps them in the
/// client's [`EntityGraph`].
pub struct Resolver<'c, E: Resolvable> {
    client: &'c LibrusClient,
    _entity: PhantomData<fn() -> E>,
}

impl<'c, E: Resolvable> Resolver<'c, E> {
    pub(crate) fn new(client: &'c LibrusClient) -> Self {
        Self {
            client,
            _entity: PhantomData,
        }
    }

    fn cache(&self) -> &'c EntityCache<E> {
        E::cache(self.client.graph())
    }

    /// Cached record, or fetch it and resolve its references.
    ///
    /// # Errors
    /// - [`ClientError::NotFound`] if the API answers with a non-success status
    /// - [`ClientError::SchemaMismatch`] if the payload does not decode
    /// - any error from resolving a referenced record
    pub async fn fetch(&self, id: E::Id) -> Result<Arc<E>, ClientError> {
        self.fetch_with(id, FetchOptions::default()).await
    }

    /// [`fetch`](Self::fetch) with explicit cache behavior.
    ///
    /// The record is cached only after its references resolved.
    ///
    /// # Errors
    /// As for [`fetch`](Self::fetch).
    pub async fn fetch_with(
        &self,
        id: E::Id,
        options: FetchOptions,
    ) -> Result<Arc<E>, ClientError> {
        if !options.force
            && let Some(hit) = self.cache().get(&id)
        {
            tracing::trace!(entity = E::NAME, %id, "cache hit");
            return Ok(hit);
        }

        let path = format!("{}/{}", E::PATH, urlencoding::encode(&id.to_string()));
        let response = self
            .client
            .session()
            .get(&self.client.config().api_endpoint(&path))
            .await?;
        if !response.is_success() {
            return Err(ClientError::NotFound {
                entity: E::NAME,
                id: id.to_string(),
                status: Some(response.status()),
            });
        }

        let entity = codec::decode_single::<E>(response.text())?;
        entity.hydrate(self.client).await?;

        let entity = Arc::new(entity);
        if options.cache {
            self.cache().insert(Arc::clone(&entity));
        }
        Ok(entity)
    }

    /// Fetch every referenced record in batched requests.
    ///
    /// # Errors
    /// As for [`fetch_many_ids`](Self::fetch_many_ids).
    pub async fn fetch_many(
        &self,
        references: &[Reference<E>],
    ) -> Result<Vec<Arc<E>>, ClientError> {
        let ids: Vec<E::Id> = references.iter().map(|r| r.id().clone()).collect();
        self.fetch_many_ids(&ids).await
    }

    /// Fetch records by ID, at most `batch_limit` IDs per request.
    ///
    /// Every ID goes over the wire even if it is cached. Repeated IDs are
    /// requested once. The result has one entry per input ID, in input
    /// order. An empty input sends nothing.
    ///
    /// # Errors
    /// - [`ClientError::NotFound`] if a batch answers with a non-success
    ///   status, or omits one of the requested IDs
    /// - [`ClientError::SchemaMismatch`] if a batch payload does not decode
    /// - any error from resolving referenced records
    pub async fn fetch_many_ids(&self, ids: &[E::Id]) -> Result<Vec<Arc<E>>, ClientError> {
        let mut seen = HashSet::new();
        let unique: Vec<E::Id> = ids
            .iter()
            .filter(|id| seen.insert(*id))
            .cloned()
            .collect();
        if unique.is_empty() {
            return Ok(Vec::new());
        }

        let limit = self.client.config().batch_limit.max(1);
        let mut records = Vec::with_capacity(unique.len());
        for chunk in unique.chunks(limit) {
            records.extend(self.fetch_chunk(chunk).await?);
        }

        E::hydrate_batch(&records, self.client).await?;
        let stored = self.store_all(records);

        let by_id: HashMap<&E::Id, &Arc<E>> = stored.iter().map(|e| (e.id(), e)).collect();
        Ok(ids
            .iter()
            .filter_map(|id| by_id.get(id).copied().cloned())
            .collect())
    }

    /// Fetch the type's whole collection (`GET {api}/{PATH}`).
    ///
    /// References are resolved the way [`fetch_many`](Self::fetch_many)
    /// resolves them.
    ///
    /// # Errors
    /// - [`ClientError::RequestFailed`] if the list endpoint answers with a
    ///   non-success status
    /// - [`ClientError::SchemaMismatch`] if the payload does not decode
    pub async fn fetch_all(&self) -> Result<Vec<Arc<E>>, ClientError> {
        let url = self.client.config().api_endpoint(E::PATH);
        let response = self.client.session().get(&url).await?;
        if !response.is_success() {
            return Err(ClientError::RequestFailed {
                url,
                status: Some(response.status()),
                reason: format!("{} list returned HTTP {}", E::NAME, response.status()),
            });
        }

        let records = codec::decode_plural::<E>(response.text())?;
        E::hydrate_batch(&records, self.client).await?;
        Ok(self.store_all(records))
    }

    /// Cached record without touching the network.
    ///
    /// # Errors
    /// [`ClientError::NotFoundInCache`] if `id` was never fetched.
    pub fn get_cached(&self, id: &E::Id) -> Result<Arc<E>, ClientError> {
        self.cache()
            .get(id)
            .ok_or_else(|| ClientError::NotFoundInCache {
                entity: E::NAME,
                id: id.to_string(),
            })
    }

    async fn fetch_chunk(&self, chunk: &[E::Id]) -> Result<Vec<E>, ClientError> {
        // Trailing comma keeps the plural envelope even for a single ID.
        let joined: String = chunk
            .iter()
            .map(|id| format!("{},", urlencoding::encode(&id.to_string())))
            .collect();
        let path = format!("{}/{joined}", E::PATH);
        let response = self
            .client
            .session()
            .get(&self.client.config().api_endpoint(&path))
            .await?;
        if !response.is_success() {
            return Err(ClientError::NotFound {
                entity: E::NAME,
                id: joined.trim_end_matches(',').to_owned(),
                status: Some(response.status()),
            });
        }

        let mut by_id: HashMap<E::Id, E> = codec::decode_plural::<E>(response.text())?
            .into_iter()
            .map(|record| (record.id().clone(), record))
            .collect();
        chunk
            .iter()
            .map(|id| {
                by_id.remove(id).ok_or_else(|| ClientError::NotFound {
                    entity: E::NAME,
                    id: id.to_string(),
                    status: None,
                })
            })
            .collect()
    }

    fn store_all(&self, records: Vec<E>) -> Vec<Arc<E>> {
        let cache = self.cache();
        records
            .into_iter()
            .map(|record| {
                let record = Arc::new(record);
                cache.insert(Arc::clone(&record));
                record
            })
            .collect()
    }
}
