//! Page-based pagination for list endpoints.
//!
//! Pages are 1-indexed. Raw `page`/`limit` values that are missing, not
//! numeric, zero or negative fall back to the defaults instead of failing the
//! request; `limit` is clamped to [`MAX_LIMIT`].
//!
//! A list response carries cursors to the neighbouring pages:
//!
//! ```json
//! {
//!   "pagination": {
//!     "next": { "page": 3, "limit": 25 },
//!     "prev": { "page": 1, "limit": 25 }
//!   }
//! }
//! ```
//!
//! `next` is present iff `page * limit < total`, `prev` iff `page > 1`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 25;
pub const MAX_LIMIT: i64 = 100;

fn parse_positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
}

/// Requested page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: parse_positive(page).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(limit)
                .unwrap_or(DEFAULT_LIMIT)
                .min(MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Builds the neighbouring-page cursors for a result set of `total` rows.
    pub fn links(&self, total: i64) -> PaginationLinks {
        let next = (self.page.saturating_mul(self.limit) < total).then_some(PageCursor {
            page: self.page + 1,
            limit: self.limit,
        });
        let prev = (self.page > 1).then_some(PageCursor {
            page: self.page - 1,
            limit: self.limit,
        });

        PaginationLinks { next, prev }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageCursor {
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageCursor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageCursor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = PageRequest::from_raw(None, None);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 25);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_custom_values() {
        let page = PageRequest::from_raw(Some("3"), Some("10"));
        assert_eq!(page.page, 3);
        assert_eq!(page.limit, 10);
        assert_eq!(page.offset(), 20);
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let page = PageRequest::from_raw(Some("abc"), Some("-5"));
        assert_eq!(page, PageRequest::default());

        let page = PageRequest::from_raw(Some("0"), Some("0"));
        assert_eq!(page, PageRequest::default());

        let page = PageRequest::from_raw(Some(""), Some("2.5"));
        assert_eq!(page, PageRequest::default());
    }

    #[test]
    fn test_limit_is_capped() {
        let page = PageRequest::from_raw(Some("1"), Some("1000"));
        assert_eq!(page.limit, MAX_LIMIT);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let page = PageRequest::from_raw(Some(&i64::MAX.to_string()), Some("100"));
        assert_eq!(page.offset(), i64::MAX);
        assert!(page.links(10).next.is_none());
    }

    #[test]
    fn test_first_page_of_many() {
        let links = PageRequest::from_raw(Some("1"), Some("25")).links(60);
        assert_eq!(links.next, Some(PageCursor { page: 2, limit: 25 }));
        assert_eq!(links.prev, None);
    }

    #[test]
    fn test_middle_page() {
        let links = PageRequest::from_raw(Some("2"), Some("25")).links(60);
        assert_eq!(links.next, Some(PageCursor { page: 3, limit: 25 }));
        assert_eq!(links.prev, Some(PageCursor { page: 1, limit: 25 }));
    }

    #[test]
    fn test_last_page_exact_fit() {
        let links = PageRequest::from_raw(Some("2"), Some("30")).links(60);
        assert_eq!(links.next, None);
        assert_eq!(links.prev, Some(PageCursor { page: 1, limit: 30 }));
    }

    #[test]
    fn test_empty_result() {
        let links = PageRequest::default().links(0);
        assert_eq!(links, PaginationLinks::default());
    }

    #[test]
    fn test_page_past_end_still_links_back() {
        let links = PageRequest::from_raw(Some("9"), Some("25")).links(10);
        assert!(links.next.is_none());
        assert_eq!(links.prev, Some(PageCursor { page: 8, limit: 25 }));
    }

    #[test]
    fn test_links_serialization_omits_absent_cursors() {
        let links = PageRequest::default().links(5);
        let json = serde_json::to_value(&links).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }
}
