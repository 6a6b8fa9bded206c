/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar date without a time zone (`DATE` column).
pub type Date = chrono::NaiveDate;

/// Fixed-point monetary amount (`NUMERIC(10,2)` column).
pub type Money = rust_decimal::Decimal;
