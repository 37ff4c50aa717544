//! Pagination types for list query parameters.
//!
//! List endpoints use offset-based pagination with `skip` and `limit` parameters. The default
//! and maximum page size come from [`PaginationConfig`].

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};
use utoipa::{IntoParams, ToSchema};

use crate::config::PaginationConfig;

/// Standard pagination parameters for list endpoints.
///
/// - `skip`: Number of items to skip (default: 0)
/// - `limit`: Maximum items to return (default: 10, max: 100 unless configured otherwise)
///
/// The `limit` is clamped to `[1, max_limit]`, preventing both zero-result queries and excessive
/// data fetching. A negative `skip` is treated as 0.
#[serde_as]
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    /// Number of items to skip (default: 0)
    #[param(default = 0, minimum = 0)]
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub skip: Option<i64>,

    /// Maximum number of items to return (default: 10, max: 100)
    #[param(default = 10, minimum = 1, maximum = 100)]
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub limit: Option<i64>,
}

impl Pagination {
    /// Get the skip value, defaulting to 0 if not specified.
    #[inline]
    pub fn skip(&self) -> i64 {
        self.skip.unwrap_or(0).max(0)
    }

    /// Get the limit value, clamped between 1 and the configured maximum.
    /// Defaults to the configured default if not specified.
    #[inline]
    pub fn limit(&self, config: &PaginationConfig) -> i64 {
        self.limit.unwrap_or(config.default_limit).clamp(1, config.max_limit)
    }

    /// Get both skip and limit as a tuple, useful for destructuring.
    #[inline]
    pub fn params(&self, config: &PaginationConfig) -> (i64, i64) {
        (self.skip(), self.limit(config))
    }
}
