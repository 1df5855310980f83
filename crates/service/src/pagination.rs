//! Pagination utilities for service layer
//!
//! Provides a simple `Pagination` struct and helpers to normalize inputs.

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index
    pub page: u64,
    /// items per page
    pub per_page: u64,
}

impl Pagination {
    /// Clamp `page` to >= 1 and `per_page` to `1..=max_per_page`.
    pub fn normalize(self, max_per_page: u64) -> Self {
        let page = self.page.max(1);
        let per_page = self.per_page.clamp(1, max_per_page.max(1));
        Self { page, per_page }
    }

    /// Rows to skip: `(page - 1) * per_page`, capped to what SQL backends
    /// accept as a signed 64-bit OFFSET.
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.per_page)
            .min(i64::MAX as u64)
    }

    pub fn has_next(&self, total: u64) -> bool {
        self.page.saturating_mul(self.per_page) < total
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 10 } }
}
