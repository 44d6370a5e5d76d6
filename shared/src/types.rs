//! Common types used across the platform

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Pagination and search parameters for vendor listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            search: None,
        }
    }
}

impl PageRequest {
    /// Build from raw query-string values.
    ///
    /// Unparseable values fall back to the defaults, `page` is at least 1
    /// and `limit` is clamped to `1..=100`.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>, search: Option<&str>) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(1)
            .max(1);
        let limit = limit
            .and_then(|l| l.trim().parse::<i64>().ok())
            .filter(|l| *l != 0)
            .unwrap_or(DEFAULT_PAGE_LIMIT as i64)
            .clamp(1, MAX_PAGE_LIMIT as i64);
        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Self {
            page: u32::try_from(page).unwrap_or(u32::MAX),
            limit: limit as u32,
            search,
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    #[serde(rename = "lastPage")]
    pub last_page: u64,
}

impl PageMeta {
    pub fn new(total: u64, request: &PageRequest) -> Self {
        Self {
            total,
            page: request.page,
            last_page: total.div_ceil(u64::from(request.limit.max(1))),
        }
    }
}

/// Paginated response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub meta: PageMeta,
    pub data: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_missing() {
        let req = PageRequest::from_raw(None, None, None);
        assert_eq!(req, PageRequest::default());
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_garbage_falls_back_to_defaults() {
        let req = PageRequest::from_raw(Some("abc"), Some("x"), Some("   "));
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 10);
        assert!(req.search.is_none());
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(PageRequest::from_raw(None, Some("500"), None).limit, 100);
        assert_eq!(PageRequest::from_raw(None, Some("-3"), None).limit, 1);
        assert_eq!(PageRequest::from_raw(None, Some("0"), None).limit, 10);
    }

    #[test]
    fn test_page_below_one() {
        assert_eq!(PageRequest::from_raw(Some("0"), None, None).page, 1);
        assert_eq!(PageRequest::from_raw(Some("-7"), None, None).page, 1);
    }

    #[test]
    fn test_offset() {
        let req = PageRequest::from_raw(Some("3"), Some("20"), Some(" acme "));
        assert_eq!(req.offset(), 40);
        assert_eq!(req.search.as_deref(), Some("acme"));
    }

    #[test]
    fn test_last_page_is_ceiling() {
        let req = PageRequest::default();
        assert_eq!(PageMeta::new(0, &req).last_page, 0);
        assert_eq!(PageMeta::new(10, &req).last_page, 1);
        assert_eq!(PageMeta::new(11, &req).last_page, 2);
    }

    #[test]
    fn test_meta_serializes_last_page_camel_case() {
        let meta = PageMeta::new(25, &PageRequest::default());
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["lastPage"], 3);
        assert_eq!(json["total"], 25);
        assert_eq!(json["page"], 1);
    }
}
