//! Pagination utilities for API responses.
//!
//! Supports both offset-based (`limit` + `offset`) and page-based
//! (`limit` + `page`) pagination. When `page` is provided it takes
//! precedence over `offset`. `limit` is clamped to [1, 100].

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::serde::deserialize_optional_i64;

/// Metadata included alongside paginated data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of items across all pages
    pub total: i64,
    /// Maximum items per page (the limit that was applied)
    pub limit: i64,
    /// Number of items skipped (only present for offset-based pagination)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// Current page number (only present for page-based pagination)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    /// Whether there are more items after this page
    pub has_more: bool,
}

impl PaginationMeta {
    /// Builds metadata for an offset-based page.
    pub fn for_offset(total: i64, limit: i64, offset: i64, page: Option<i64>) -> Self {
        Self {
            total,
            limit,
            offset: Some(offset),
            page,
            has_more: offset + limit < total,
        }
    }
}

/// Query parameters for pagination.
#[derive(Debug, Clone, Hash, Deserialize, ToSchema)]
pub struct PaginationParams {
    /// Maximum number of items to return (1-100, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0, ignored if `page` is set)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub offset: Option<i64>,
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            limit: Some(10),
            offset: Some(0),
            page: Some(1),
        }
    }
}

impl PaginationParams {
    /// Effective limit, clamped to [1, 100]. Defaults to 10.
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(10).clamp(1, 100)
    }

    /// Effective offset. A provided `page` takes precedence over `offset`;
    /// the result is never negative.
    #[must_use]
    pub fn offset(&self) -> i64 {
        if let Some(page) = self.page {
            let page = page.max(1);
            (page - 1) * self.limit()
        } else {
            self.offset.unwrap_or(0).max(0)
        }
    }

    /// Page number if provided, clamped to a minimum of 1.
    #[must_use]
    pub fn page(&self) -> Option<i64> {
        self.page.map(|p| p.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<i64>, offset: Option<i64>, page: Option<i64>) -> PaginationParams {
        PaginationParams {
            limit,
            offset,
            page,
        }
    }

    #[test]
    fn test_defaults() {
        let p = params(None, None, None);
        assert_eq!(p.limit(), 10);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.page(), None);
    }

    #[test]
    fn test_limit_clamping() {
        assert_eq!(params(Some(0), None, None).limit(), 1);
        assert_eq!(params(Some(-5), None, None).limit(), 1);
        assert_eq!(params(Some(100), None, None).limit(), 100);
        assert_eq!(params(Some(250), None, None).limit(), 100);
    }

    #[test]
    fn test_offset_never_negative() {
        assert_eq!(params(Some(10), Some(-3), None).offset(), 0);
        assert_eq!(params(Some(10), Some(40), None).offset(), 40);
    }

    #[test]
    fn test_page_takes_precedence_over_offset() {
        let p = params(Some(20), Some(999), Some(3));
        assert_eq!(p.offset(), 40);
        assert_eq!(p.page(), Some(3));
    }

    #[test]
    fn test_page_clamped_to_one() {
        assert_eq!(params(Some(10), None, Some(0)).offset(), 0);
        assert_eq!(params(Some(10), None, Some(-2)).page(), Some(1));
    }

    #[test]
    fn test_empty_query_strings_deserialize_as_defaults() {
        let p: PaginationParams = serde_json::from_str(r#"{"limit":"","offset":""}"#).unwrap();
        assert_eq!(p.limit(), 10);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_meta_for_offset() {
        let meta = PaginationMeta::for_offset(45, 10, 40, None);
        assert!(!meta.has_more);
        let meta = PaginationMeta::for_offset(45, 10, 30, Some(4));
        assert!(meta.has_more);
        assert_eq!(meta.page, Some(4));
    }

    #[test]
    fn test_meta_serializes_without_absent_fields() {
        let meta = PaginationMeta {
            total: 5,
            limit: 10,
            offset: Some(0),
            page: None,
            has_more: false,
        };
        let serialized = serde_json::to_string(&meta).unwrap();
        assert!(serialized.contains(r#""offset":0"#));
        assert!(!serialized.contains("page"));
    }
}
