/// Pagination types shared by the task list operations
///
/// Pages are zero-indexed. The page size defaults to 20 and is capped at
/// 100; listings are ordered newest-first by creation time in every store
/// backend, so page boundaries are stable across backends.

use serde::{Deserialize, Serialize};

/// Default page size for list operations
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound on the page size a client may request
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination parameters for a list request
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageRequest {
    /// Zero-based page index
    #[serde(default)]
    pub page: u32,

    /// Page size (clamped to `MAX_PAGE_SIZE`)
    #[serde(default = "default_page_size")]
    pub size: u32,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Effective page size after clamping
    pub fn limit(&self) -> u32 {
        self.size.clamp(1, MAX_PAGE_SIZE)
    }

    /// Number of records to skip
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.limit())
    }
}

/// One page of results plus totals
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Records on this page
    pub items: Vec<T>,

    /// Zero-based page index of this page
    pub page: u32,

    /// Effective page size used
    pub size: u32,

    /// Total matching records across all pages
    pub total_elements: u64,

    /// Total number of pages
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Assembles a page from a slice of results and the overall total
    pub fn new(items: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let size = request.limit();
        let total_pages = if total_elements == 0 {
            0
        } else {
            total_elements.div_ceil(u64::from(size)) as u32
        };

        Self {
            items,
            page: request.page,
            size,
            total_elements,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request() {
        let req = PageRequest::default();
        assert_eq!(req.page, 0);
        assert_eq!(req.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_size_is_clamped() {
        let req = PageRequest { page: 0, size: 5000 };
        assert_eq!(req.limit(), MAX_PAGE_SIZE);

        let req = PageRequest { page: 2, size: 0 };
        assert_eq!(req.limit(), 1);
        assert_eq!(req.offset(), 2);
    }

    #[test]
    fn test_offset_math() {
        let req = PageRequest { page: 3, size: 20 };
        assert_eq!(req.offset(), 60);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let req = PageRequest { page: 0, size: 10 };
        let page: Page<u32> = Page::new(vec![], &req, 21);
        assert_eq!(page.total_pages, 3);

        let empty: Page<u32> = Page::new(vec![], &req, 0);
        assert_eq!(empty.total_pages, 0);
    }
}
