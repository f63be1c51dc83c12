//! # Collection Store
//!
//! Per-kind cache of the last successfully fetched collection. It is the one
//! source of truth the renderer reads from.
//!
//! A refresh replaces the cache wholesale, so readers always see either the
//! last complete server snapshot or an empty list. A failed refresh leaves the
//! previous snapshot in place. Server order is preserved; nothing is sorted here.

use crate::framework::error::{AdminError, GatewayError};
use crate::framework::gateway::{ApiRequest, Gateway};
use crate::framework::resource::Resource;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, instrument, warn};

/// Cached snapshot of one remote collection.
///
/// Cheap to clone; clones share the same cache.
pub struct CollectionStore<T: Resource> {
    gateway: Arc<dyn Gateway>,
    cache: Arc<RwLock<Vec<T>>>,
    generation: Arc<AtomicU64>,
}

impl<T: Resource> Clone for CollectionStore<T> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            cache: self.cache.clone(),
            generation: self.generation.clone(),
        }
    }
}

impl<T: Resource> CollectionStore<T> {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            cache: Arc::new(RwLock::new(Vec::new())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Re-fetches the whole collection and replaces the cache with it.
    #[instrument(skip(self), fields(kind = %T::KIND))]
    pub async fn refresh(&self) -> Result<Vec<T>, AdminError> {
        let mut request = ApiRequest::get(T::collection_path());
        if T::READ_REQUIRES_AUTH {
            request = request.authenticated();
        }

        let fetched = self
            .gateway
            .send(request)
            .await
            .and_then(decode::<Vec<T>>)
            .map_err(|source| {
                warn!(error = %source, "Refresh failed, keeping previous snapshot");
                AdminError::FetchFailed {
                    kind: T::KIND,
                    source,
                }
            })?;

        *self.write() = fetched.clone();
        self.generation.fetch_add(1, Ordering::SeqCst);
        info!(size = fetched.len(), "Refreshed");
        Ok(fetched)
    }

    /// Read-only copy of the current cache; empty until the first successful refresh.
    pub fn snapshot(&self) -> Vec<T> {
        self.read().clone()
    }

    /// Looks an entity up in the current cache without touching the network.
    pub fn find(&self, id: &T::Id) -> Option<T> {
        self.read().iter().find(|item| item.id() == Some(id)).cloned()
    }

    /// Fetches a single entity by id. The cache is not modified.
    #[instrument(skip(self), fields(kind = %T::KIND))]
    pub async fn fetch_one(&self, id: &T::Id) -> Result<T, AdminError> {
        let mut request = ApiRequest::get(T::item_path(id));
        if T::READ_REQUIRES_AUTH {
            request = request.authenticated();
        }
        debug!(%id, "Fetching one");
        self.gateway
            .send(request)
            .await
            .and_then(decode::<T>)
            .map_err(|source| {
                warn!(%id, error = %source, "Fetch failed");
                AdminError::FetchFailed {
                    kind: T::KIND,
                    source,
                }
            })
    }

    /// Number of successful refreshes so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }
}

pub(crate) fn decode<D: DeserializeOwned>(value: Value) -> Result<D, GatewayError> {
    serde_json::from_value(value).map_err(|e| GatewayError::Decode(e.to_string()))
}
