use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize a nullable JSON value into `T::default()` when it is `null`.
///
/// Backend views emit `null` rather than `[]` for aggregated arrays of
/// people without any course.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Page sizes offered by the dashboard page-size select.
pub const PAGE_SIZES: [usize; 4] = [5, 10, 20, 50];

/// Default dashboard page size.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Offset window for a backend range read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub limit: i64,
    pub offset: i64,
}

impl PageRequest {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }
}

/// Helper to normalize offset pagination params with safe defaults.
pub fn normalize_pagination(limit: Option<i64>, offset: Option<i64>, default_limit: i64) -> PageRequest {
    let limit = limit.unwrap_or(default_limit).clamp(1, 1000);
    let offset = offset.unwrap_or(0).max(0);
    PageRequest { limit, offset }
}

/// Explicit prev/next pagination over an in-memory result set.
///
/// The page number is kept inside `[1, total_pages]` after every change,
/// where `total_pages = max(1, ceil(total / page_size))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
    total: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total: 0,
        }
    }
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total: 0,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.page_size).max(1)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Record a new result count and re-clamp the current page.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.clamp();
    }

    /// Change the page size; always returns to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    pub fn go_to(&mut self, page: usize) {
        self.page = page;
        self.clamp();
    }

    pub fn next(&mut self) {
        self.go_to(self.page + 1);
    }

    pub fn prev(&mut self) {
        self.go_to(self.page.saturating_sub(1));
    }

    fn clamp(&mut self) {
        self.page = self.page.clamp(1, self.total_pages());
    }

    /// Index range of the current page within the full result set.
    pub fn window(&self) -> std::ops::Range<usize> {
        let start = ((self.page - 1) * self.page_size).min(self.total);
        let end = (start + self.page_size).min(self.total);
        start..end
    }

    /// Indicator text, e.g. "Pagina 1 / 3".
    pub fn label(&self) -> String {
        format!("Pagina {} / {}", self.page, self.total_pages())
    }
}
