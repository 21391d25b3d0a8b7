//! Page window clamping and the paginated response envelope.
//!
//! List endpoints accept untrusted `page` and `page_size` query parameters.
//! [`PageWindow::from_params`] turns them into a bounded window: unusable
//! values fall back to defaults and oversized pages are capped, so a client
//! can never request more than [`MAX_PAGE_SIZE`] rows at once. The
//! [`Paginated`] envelope echoes the effective window back to the client so
//! clamping is observable.

use serde::{Deserialize, Serialize};

/// Query parameter naming the requested page.
pub const PAGE_PARAM: &str = "page";

/// Query parameter naming the requested page size.
pub const PAGE_SIZE_PARAM: &str = "page_size";

/// Page used when the client sends nothing usable.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the client sends nothing usable.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Hard ceiling on the number of rows a single page may carry.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Effective page coordinates after clamping.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= page_size <= MAX_PAGE_SIZE`
///
/// # Examples
/// ```
/// use pagination::PageWindow;
///
/// let window = PageWindow::from_params([("page", "3"), ("page_size", "500")]);
/// assert_eq!(window.page(), 3);
/// assert_eq!(window.page_size(), 100);
/// assert_eq!(window.offset(), 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageWindow {
    page: u32,
    page_size: u32,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageWindow {
    /// Build a window from already-parsed numbers, clamping them into range.
    #[must_use]
    pub const fn new(page: u32, page_size: u32) -> Self {
        let page = if page == 0 { DEFAULT_PAGE } else { page };
        let page_size = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else if page_size > MAX_PAGE_SIZE {
            MAX_PAGE_SIZE
        } else {
            page_size
        };
        Self { page, page_size }
    }

    /// Build a window from the raw textual parameter values.
    ///
    /// A missing, unparsable or non-positive `page` becomes `1`. A missing,
    /// unparsable or non-positive `page_size` becomes `10`, and anything
    /// above `100` becomes `100`.
    #[must_use]
    pub fn from_raw(page: Option<&str>, page_size: Option<&str>) -> Self {
        Self {
            page: parse_page(page),
            page_size: parse_page_size(page_size),
        }
    }

    /// Build a window by picking `page` and `page_size` out of a parameter
    /// list. Other keys are ignored; when a key repeats, the last one wins.
    #[must_use]
    pub fn from_params<'a, I>(params: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut page = None;
        let mut page_size = None;
        for (key, value) in params {
            match key {
                PAGE_PARAM => page = Some(value),
                PAGE_SIZE_PARAM => page_size = Some(value),
                _ => {}
            }
        }
        Self::from_raw(page, page_size)
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Number of rows per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of rows to skip: `(page - 1) * page_size`.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64).saturating_sub(1) * self.page_size as u64
    }

    /// Maximum number of rows to fetch.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.page_size as u64
    }

    /// Number of pages needed to present `total` rows.
    ///
    /// Returns `0` when there are no rows.
    #[must_use]
    pub fn total_pages(&self, total: i64) -> u64 {
        u64::try_from(total)
            .map(|rows| rows.div_ceil(u64::from(self.page_size)))
            .unwrap_or(0)
    }
}

fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
}

fn parse_page(raw: Option<&str>) -> u32 {
    match parse_number(raw) {
        Some(page) if page >= 1 => u32::try_from(page).unwrap_or(u32::MAX),
        _ => DEFAULT_PAGE,
    }
}

fn parse_page_size(raw: Option<&str>) -> u32 {
    match parse_number(raw) {
        Some(size) if size > i64::from(MAX_PAGE_SIZE) => MAX_PAGE_SIZE,
        Some(size) if size >= 1 => u32::try_from(size).unwrap_or(MAX_PAGE_SIZE),
        _ => DEFAULT_PAGE_SIZE,
    }
}

/// Paginated response envelope.
///
/// `page` and `page_size` are the effective values from the [`PageWindow`],
/// not whatever the client asked for.
///
/// # Examples
/// ```
/// use pagination::{PageWindow, Paginated};
///
/// let envelope = Paginated::new(PageWindow::default(), 15, vec!["a", "b"]);
/// assert_eq!(envelope.total_pages, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Effective one-based page number.
    pub page: u32,
    /// Effective page size.
    pub page_size: u32,
    /// Total number of matching rows across all pages.
    pub total: i64,
    /// Number of pages needed to present `total` rows.
    pub total_pages: u64,
    /// Rows on this page.
    pub data: Vec<T>,
}

impl<T> Paginated<T> {
    /// Wrap a page of rows together with the window that produced it.
    #[must_use]
    pub fn new(window: PageWindow, total: i64, data: Vec<T>) -> Self {
        Self {
            page: window.page(),
            page_size: window.page_size(),
            total,
            total_pages: window.total_pages(total),
            data,
        }
    }

    /// Convert every row while keeping the envelope metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Paginated<U>
    where
        F: FnMut(T) -> U,
    {
        Paginated {
            page: self.page,
            page_size: self.page_size,
            total: self.total,
            total_pages: self.total_pages,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}
