//! Row model for the `watches` table.

use sqlx::FromRow;
use watches_core::types::{Date, DbId, Money, Timestamp};
use watches_core::watch::Watch;

/// A row from the `watches` table.
#[derive(Debug, Clone, FromRow)]
pub struct WatchRow {
    pub id: DbId,
    pub manufacturer: String,
    pub model: String,
    pub bracelet_color: String,
    pub launch_date: Option<Date>,
    pub price: Money,
    pub price_currency: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<WatchRow> for Watch {
    fn from(row: WatchRow) -> Self {
        Watch {
            id: row.id,
            manufacturer: row.manufacturer,
            model: row.model,
            bracelet_color: row.bracelet_color,
            launch_date: row.launch_date,
            price: row.price,
            price_currency: row.price_currency,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
