/// Pagination query parameters
#[derive(Debug, Clone, Copy)]
pub struct PaginationParams {
    pub page: u32,
    pub limit: u32,
}

impl PaginationParams {
    /// Clamp page to >= 1 and limit to 1..=100 (default 20).
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(20).clamp(1, 100),
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Paginated response wrapper
#[derive(Debug)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        let total_pages = ((total as f64) / (limit as f64)).ceil() as u32;
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResult<U> {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_are_clamped() {
        let p = PaginationParams::new(Some(0), Some(1000));
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 100);
        assert_eq!(p.offset(), 0);

        let p = PaginationParams::new(Some(3), Some(10));
        assert_eq!(p.offset(), 20);
    }

    #[test]
    fn total_pages_rounds_up() {
        let r = PaginatedResult::new(vec![1, 2, 3], 21, 1, 10);
        assert_eq!(r.total_pages, 3);
        let r = PaginatedResult::<i32>::new(vec![], 0, 1, 10);
        assert_eq!(r.total_pages, 0);
    }
}
