//! Repository for the `watches` table.

use sqlx::PgPool;
use watches_core::types::DbId;
use watches_core::watch::{NewWatch, WatchChanges, WatchKey};

use crate::models::watch::WatchRow;

/// Column list for `watches` queries.
const COLUMNS: &str = "\
    id, manufacturer, model, bracelet_color, launch_date, \
    price, price_currency, created_at, updated_at";

/// Provides CRUD operations for watches.
pub struct WatchRepo;

impl WatchRepo {
    /// Insert a new watch, returning the full row.
    pub async fn create(pool: &PgPool, input: &NewWatch) -> Result<WatchRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO watches \
                (manufacturer, model, bracelet_color, launch_date, price, price_currency) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WatchRow>(&query)
            .bind(&input.manufacturer)
            .bind(&input.model)
            .bind(&input.bracelet_color)
            .bind(input.launch_date)
            .bind(input.price)
            .bind(&input.price_currency)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WatchRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM watches WHERE id = $1");
        sqlx::query_as::<_, WatchRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the watch holding an exact (manufacturer, model, bracelet_color) triple.
    pub async fn find_by_key(
        pool: &PgPool,
        key: &WatchKey,
    ) -> Result<Option<WatchRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM watches \
             WHERE manufacturer = $1 AND model = $2 AND bracelet_color = $3"
        );
        sqlx::query_as::<_, WatchRow>(&query)
            .bind(&key.manufacturer)
            .bind(&key.model)
            .bind(&key.bracelet_color)
            .fetch_optional(pool)
            .await
    }

    /// List watches in ascending id order.
    pub async fn list(
        pool: &PgPool,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<WatchRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM watches ORDER BY id ASC LIMIT $1 OFFSET $2");
        sqlx::query_as::<_, WatchRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM watches")
            .fetch_one(pool)
            .await
    }

    /// Apply a partial update. Returns `None` if no row with `id` exists.
    ///
    /// Absent fields keep their value via `COALESCE`. `launch_date` uses an
    /// explicit flag (`$5`) so that a supplied `NULL` clears the column.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        changes: &WatchChanges,
    ) -> Result<Option<WatchRow>, sqlx::Error> {
        let query = format!(
            "UPDATE watches SET \
                manufacturer = COALESCE($2, manufacturer), \
                model = COALESCE($3, model), \
                bracelet_color = COALESCE($4, bracelet_color), \
                launch_date = CASE WHEN $5 THEN $6 ELSE launch_date END, \
                price = COALESCE($7, price), \
                price_currency = COALESCE($8, price_currency), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WatchRow>(&query)
            .bind(id)
            .bind(&changes.manufacturer)
            .bind(&changes.model)
            .bind(&changes.bracelet_color)
            .bind(changes.launch_date.is_some())
            .bind(changes.launch_date.flatten())
            .bind(changes.price)
            .bind(&changes.price_currency)
            .fetch_optional(pool)
            .await
    }

    /// Delete a watch by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM watches WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
