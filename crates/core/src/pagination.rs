//! Offset pagination arithmetic.

/// Page used when the caller gives none (or garbage).
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the caller gives none (or garbage).
pub const DEFAULT_LIMIT: i64 = 25;

/// A 1-based page request. Both fields are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Build a page request, substituting defaults for missing or non-positive values.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE),
            limit: limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT),
        }
    }

    /// Build a page request from raw query-string values.
    ///
    /// Values that are absent or do not parse as integers fall back to the
    /// defaults, so `?page=abc` behaves like no `page` at all.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        let parse = |raw: Option<&str>| raw.and_then(|v| v.trim().parse::<i64>().ok());
        Self::new(parse(page), parse(limit))
    }

    /// Apply an upper bound to `limit`, if one is configured.
    pub fn capped(self, max_limit: Option<i64>) -> Self {
        match max_limit {
            Some(max) if max > 0 => Self {
                limit: self.limit.min(max),
                ..self
            },
            _ => self,
        }
    }

    /// Number of records to skip: `(page - 1) * limit`.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Total number of pages needed for `total` records: `ceil(total / limit)`.
pub fn number_of_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    total / limit + i64::from(total % limit != 0)
}
