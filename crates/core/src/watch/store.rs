use async_trait::async_trait;

use crate::types::DbId;

use super::{NewWatch, Watch, WatchChanges, WatchKey};

/// Boxed error used to carry backend failures without naming the backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure reported by a [`WatchStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write. Carries the constraint name.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Anything else: connectivity, timeouts, decoding.
    #[error(transparent)]
    Backend(BoxError),
}

impl StoreError {
    pub fn backend(err: impl Into<BoxError>) -> Self {
        StoreError::Backend(err.into())
    }
}

/// Persistence contract required by [`super::WatchService`].
///
/// Implementations must enforce uniqueness of the (manufacturer, model,
/// bracelet_color) triple and own the timestamps: `created_at` and
/// `updated_at` are set on insert, `updated_at` is refreshed on every update.
#[async_trait]
pub trait WatchStore: Send + Sync {
    async fn insert(&self, watch: &NewWatch) -> Result<Watch, StoreError>;

    /// Returns `None` when no row with `id` exists.
    async fn update(&self, id: DbId, changes: &WatchChanges)
        -> Result<Option<Watch>, StoreError>;

    /// Returns `false` when no row with `id` exists.
    async fn delete(&self, id: DbId) -> Result<bool, StoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Watch>, StoreError>;

    async fn find_by_key(&self, key: &WatchKey) -> Result<Option<Watch>, StoreError>;

    /// Records ordered by ascending id, skipping `offset` and returning at most `limit`.
    async fn find_page(&self, offset: i64, limit: i64) -> Result<Vec<Watch>, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;
}
