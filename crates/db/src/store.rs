//! [`WatchStore`] implementation over a PostgreSQL pool.

use async_trait::async_trait;
use watches_core::types::DbId;
use watches_core::watch::{NewWatch, StoreError, Watch, WatchChanges, WatchKey, WatchStore};

use crate::repositories::WatchRepo;
use crate::DbPool;

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Persists watches through [`WatchRepo`].
#[derive(Debug, Clone)]
pub struct PgWatchStore {
    pool: DbPool,
}

impl PgWatchStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map a sqlx error onto the store contract.
///
/// Unique violations keep their constraint name so the service can tell a
/// duplicate apart from any other failure.
fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            tracing::debug!(%constraint, "Unique constraint rejected write");
            return StoreError::UniqueViolation(constraint);
        }
    }
    tracing::warn!(error = %err, "Database error");
    StoreError::backend(err)
}

#[async_trait]
impl WatchStore for PgWatchStore {
    async fn insert(&self, watch: &NewWatch) -> Result<Watch, StoreError> {
        WatchRepo::create(&self.pool, watch)
            .await
            .map(Watch::from)
            .map_err(classify)
    }

    async fn update(
        &self,
        id: DbId,
        changes: &WatchChanges,
    ) -> Result<Option<Watch>, StoreError> {
        WatchRepo::update(&self.pool, id, changes)
            .await
            .map(|row| row.map(Watch::from))
            .map_err(classify)
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        WatchRepo::delete(&self.pool, id).await.map_err(classify)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Watch>, StoreError> {
        WatchRepo::find_by_id(&self.pool, id)
            .await
            .map(|row| row.map(Watch::from))
            .map_err(classify)
    }

    async fn find_by_key(&self, key: &WatchKey) -> Result<Option<Watch>, StoreError> {
        WatchRepo::find_by_key(&self.pool, key)
            .await
            .map(|row| row.map(Watch::from))
            .map_err(classify)
    }

    async fn find_page(&self, offset: i64, limit: i64) -> Result<Vec<Watch>, StoreError> {
        WatchRepo::list(&self.pool, offset, limit)
            .await
            .map(|rows| rows.into_iter().map(Watch::from).collect())
            .map_err(classify)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        WatchRepo::count(&self.pool).await.map_err(classify)
    }
}
