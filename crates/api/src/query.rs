//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Default page size for listings.
pub const DEFAULT_LIMIT: i64 = 50;

/// Largest page size a caller may request.
pub const MAX_LIMIT: i64 = 500;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Limit clamped to `1..=MAX_LIMIT`.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Offset clamped to be non-negative.
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_are_clamped() {
        let params = PaginationParams::default();
        assert_eq!(params.limit(), DEFAULT_LIMIT);
        assert_eq!(params.offset(), 0);

        let params = PaginationParams {
            limit: Some(10_000),
            offset: Some(-5),
        };
        assert_eq!(params.limit(), MAX_LIMIT);
        assert_eq!(params.offset(), 0);

        let params = PaginationParams {
            limit: Some(0),
            offset: Some(20),
        };
        assert_eq!(params.limit(), 1);
        assert_eq!(params.offset(), 20);
    }
}
