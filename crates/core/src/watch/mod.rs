//! Watch record model, storage contract and service.

mod memory;
mod service;
mod store;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Date, DbId, Money, Timestamp};

pub use memory::MemoryWatchStore;
pub use service::WatchService;
pub use store::{BoxError, StoreError, WatchStore};

/// Entity name used in `NotFound` errors.
pub const ENTITY: &str = "Watch";

/// Name of the storage-level unique index on the uniqueness triple.
pub const UNIQUE_KEY_CONSTRAINT: &str = "uq_watches_manufacturer_model_bracelet_color";

/// A persisted watch record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watch {
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

impl Watch {
    /// The record's uniqueness triple.
    pub fn key(&self) -> WatchKey {
        WatchKey {
            manufacturer: self.manufacturer.clone(),
            model: self.model.clone(),
            bracelet_color: self.bracelet_color.clone(),
        }
    }
}

/// The natural duplicate-detection key: (manufacturer, model, bracelet color).
///
/// Values are expected in canonical form, so comparison is exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WatchKey {
    pub manufacturer: String,
    pub model: String,
    pub bracelet_color: String,
}

impl fmt::Display for WatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({})",
            self.manufacturer, self.model, self.bracelet_color
        )
    }
}

/// A validated, canonical candidate ready for insertion.
///
/// Only produced by [`crate::validation::validate_create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewWatch {
    pub manufacturer: String,
    pub model: String,
    pub bracelet_color: String,
    pub launch_date: Option<Date>,
    pub price: Money,
    pub price_currency: String,
}

impl NewWatch {
    pub fn key(&self) -> WatchKey {
        WatchKey {
            manufacturer: self.manufacturer.clone(),
            model: self.model.clone(),
            bracelet_color: self.bracelet_color.clone(),
        }
    }
}

/// A validated, canonical partial update. `None` means "leave unchanged".
///
/// `launch_date` is tri-state: `None` leaves it alone, `Some(None)` clears it,
/// `Some(Some(date))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WatchChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bracelet_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_date: Option<Option<Date>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_currency: Option<String>,
}

impl WatchChanges {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.manufacturer.is_none()
            && self.model.is_none()
            && self.bracelet_color.is_none()
            && self.launch_date.is_none()
            && self.price.is_none()
            && self.price_currency.is_none()
    }

    /// The uniqueness triple a record with key `current` would have after
    /// these changes are applied.
    pub fn key_after(&self, current: &WatchKey) -> WatchKey {
        WatchKey {
            manufacturer: self
                .manufacturer
                .clone()
                .unwrap_or_else(|| current.manufacturer.clone()),
            model: self.model.clone().unwrap_or_else(|| current.model.clone()),
            bracelet_color: self
                .bracelet_color
                .clone()
                .unwrap_or_else(|| current.bracelet_color.clone()),
        }
    }

    /// Apply the changes to `watch` in place. Timestamps are left alone.
    pub fn apply_to(&self, watch: &mut Watch) {
        if let Some(v) = &self.manufacturer {
            watch.manufacturer = v.clone();
        }
        if let Some(v) = &self.model {
            watch.model = v.clone();
        }
        if let Some(v) = &self.bracelet_color {
            watch.bracelet_color = v.clone();
        }
        if let Some(v) = self.launch_date {
            watch.launch_date = v;
        }
        if let Some(v) = self.price {
            watch.price = v;
        }
        if let Some(v) = &self.price_currency {
            watch.price_currency = v.clone();
        }
    }
}

/// One page of a listing, as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchPage {
    /// Number of records in this page.
    pub count: usize,
    /// `ceil(total / limit)` over the whole table.
    pub number_of_pages: i64,
    pub watches: Vec<Watch>,
}
