use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::types::DbId;

use super::{NewWatch, StoreError, Watch, WatchChanges, WatchKey, WatchStore, UNIQUE_KEY_CONSTRAINT};

/// In-process [`WatchStore`] backed by a `BTreeMap`.
///
/// Enforces the same uniqueness rule and timestamp maintenance as the
/// PostgreSQL store. Ids come from a monotonically increasing counter and are
/// never reused, so iteration order is insertion order.
#[derive(Debug, Default)]
pub struct MemoryWatchStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    last_id: DbId,
    rows: BTreeMap<DbId, Watch>,
}

impl Inner {
    fn key_taken(&self, key: &WatchKey, except: Option<DbId>) -> bool {
        self.rows
            .values()
            .any(|w| Some(w.id) != except && w.key() == *key)
    }
}

impl MemoryWatchStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WatchStore for MemoryWatchStore {
    async fn insert(&self, watch: &NewWatch) -> Result<Watch, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.key_taken(&watch.key(), None) {
            return Err(StoreError::UniqueViolation(UNIQUE_KEY_CONSTRAINT.to_string()));
        }
        inner.last_id += 1;
        let now = Utc::now();
        let row = Watch {
            id: inner.last_id,
            manufacturer: watch.manufacturer.clone(),
            model: watch.model.clone(),
            bracelet_color: watch.bracelet_color.clone(),
            launch_date: watch.launch_date,
            price: watch.price,
            price_currency: watch.price_currency.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        id: DbId,
        changes: &WatchChanges,
    ) -> Result<Option<Watch>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(current) = inner.rows.get(&id) else {
            return Ok(None);
        };
        let key = changes.key_after(&current.key());
        if inner.key_taken(&key, Some(id)) {
            return Err(StoreError::UniqueViolation(UNIQUE_KEY_CONSTRAINT.to_string()));
        }
        let Some(row) = inner.rows.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply_to(row);
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Watch>, StoreError> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn find_by_key(&self, key: &WatchKey) -> Result<Option<Watch>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .rows
            .values()
            .find(|w| w.key() == *key)
            .cloned())
    }

    async fn find_page(&self, offset: i64, limit: i64) -> Result<Vec<Watch>, StoreError> {
        let offset = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(self
            .inner
            .read()
            .await
            .rows
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let len = self.inner.read().await.rows.len();
        i64::try_from(len).map_err(StoreError::backend)
    }
}
