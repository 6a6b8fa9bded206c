use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::pagination::{number_of_pages, Pagination};
use crate::types::DbId;

use super::{NewWatch, StoreError, Watch, WatchChanges, WatchKey, WatchPage, WatchStore, ENTITY};

/// CRUD, pagination and uniqueness operations over a [`WatchStore`].
///
/// Stateless apart from the store handle; cheap to clone. Performs no
/// retries: storage failures surface as [`CoreError::Storage`].
#[derive(Clone)]
pub struct WatchService {
    store: Arc<dyn WatchStore>,
}

impl WatchService {
    pub fn new(store: Arc<dyn WatchStore>) -> Self {
        Self { store }
    }

    /// One page of records in ascending id (insertion) order.
    pub async fn find_all(&self, pagination: Pagination) -> CoreResult<Vec<Watch>> {
        Ok(self
            .store
            .find_page(pagination.offset(), pagination.limit)
            .await?)
    }

    /// Total number of records.
    pub async fn count(&self) -> CoreResult<i64> {
        Ok(self.store.count().await?)
    }

    /// [`Self::find_all`] plus the page count derived from [`Self::count`].
    pub async fn list_page(&self, pagination: Pagination) -> CoreResult<WatchPage> {
        let watches = self.find_all(pagination).await?;
        let total = self.count().await?;
        Ok(WatchPage {
            count: watches.len(),
            number_of_pages: number_of_pages(total, pagination.limit),
            watches,
        })
    }

    pub async fn find_one(&self, id: DbId) -> CoreResult<Watch> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(CoreError::NotFound { entity: ENTITY, id })
    }

    /// Whether a record with exactly this canonical triple exists.
    ///
    /// Callers check this before [`Self::create`]. The check and the insert
    /// are not atomic; a racing duplicate is caught by the store's unique
    /// constraint and reported as [`CoreError::Conflict`].
    pub async fn exists(&self, key: &WatchKey) -> CoreResult<bool> {
        Ok(self.store.find_by_key(key).await?.is_some())
    }

    pub async fn create(&self, candidate: &NewWatch) -> CoreResult<Watch> {
        self.store
            .insert(candidate)
            .await
            .map_err(|e| conflict_or_storage(e, candidate.key()))
    }

    /// Apply a partial update. Only supplied fields change.
    ///
    /// An empty change set is rejected before storage is touched, whether or
    /// not `id` exists.
    pub async fn update(&self, id: DbId, changes: &WatchChanges) -> CoreResult<Watch> {
        if changes.is_empty() {
            return Err(CoreError::EmptyUpdate);
        }
        let current = self.find_one(id).await?;
        let key = changes.key_after(&current.key());
        if key != current.key() && self.exists(&key).await? {
            return Err(CoreError::Conflict(key));
        }
        self.store
            .update(id, changes)
            .await
            .map_err(|e| conflict_or_storage(e, key))?
            .ok_or(CoreError::NotFound { entity: ENTITY, id })
    }

    pub async fn remove(&self, id: DbId) -> CoreResult<()> {
        if self.store.delete(id).await? {
            Ok(())
        } else {
            Err(CoreError::NotFound { entity: ENTITY, id })
        }
    }
}

fn conflict_or_storage(err: StoreError, key: WatchKey) -> CoreError {
    match err {
        StoreError::UniqueViolation(_) => CoreError::Conflict(key),
        other => CoreError::Storage(other),
    }
}
