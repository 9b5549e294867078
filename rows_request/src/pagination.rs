//! Pagination state
//!
//! `start` is a row offset and `per_page` a page size. The page number is
//! always derived from the two.

/// Page size used when none, or a non-positive one, is given
pub const PER_PAGE_DEFAULT: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    enabled: bool,
    start: u64,
    per_page: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl Pagination {
    pub fn new(start: Option<i64>, per_page: Option<i64>) -> Self {
        let mut pagination = Self {
            enabled: true,
            start: 0,
            per_page: PER_PAGE_DEFAULT,
        };
        pagination.set_start(start.unwrap_or(0));
        pagination.set_per_page(per_page.unwrap_or(PER_PAGE_DEFAULT as i64));
        pagination
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    /// Negative offsets clamp to 0
    pub fn set_start(&mut self, start: i64) -> &mut Self {
        self.start = start.max(0) as u64;
        self
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Non-positive sizes fall back to the default
    pub fn set_per_page(&mut self, per_page: i64) -> &mut Self {
        self.per_page = if per_page > 0 {
            per_page as u64
        } else {
            PER_PAGE_DEFAULT
        };
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) -> &mut Self {
        self.enabled = enabled;
        self
    }

    /// 1-based page containing `start`
    pub fn page(&self) -> u64 {
        self.start / self.per_page + 1
    }

    /// Row cap for the query, none when pagination is disabled
    pub fn limit(&self) -> Option<u64> {
        self.enabled.then_some(self.per_page)
    }

    /// First row of the page containing `start`
    pub fn offset(&self) -> u64 {
        (self.page() - 1) * self.per_page
    }

    /// Number of pages needed for `total` rows
    pub fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(self.per_page)
    }
}
