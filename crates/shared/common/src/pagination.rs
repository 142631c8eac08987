//! Page-number pagination shared by all list endpoints.

use crate::error::{AppError, AppResult};

/// Page size used when the client does not ask for one
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Keyword that selects the final page
pub const LAST_PAGE: &str = "last";

/// Requested page, before the total is known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNumber {
    Number(u64),
    Last,
}

impl PageNumber {
    /// Parse the `page` query value: a positive integer or `last`.
    pub fn parse(raw: &str) -> AppResult<Self> {
        if raw == LAST_PAGE {
            return Ok(PageNumber::Last);
        }
        match raw.parse::<u64>() {
            Ok(number) if number >= 1 => Ok(PageNumber::Number(number)),
            _ => Err(AppError::invalid_page()),
        }
    }
}

/// Page request as understood by repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: PageNumber,
    pub size: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            number: PageNumber::Number(1),
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(number: u64, size: u64) -> Self {
        Self {
            number: PageNumber::Number(number),
            size: size.max(1),
        }
    }

    /// Page size from the raw `page_size` query value. Missing or unusable
    /// values fall back to `default`; with a `max`, oversized ones are capped.
    pub fn size_from_query(raw: Option<&str>, default: u64, max: Option<u64>) -> u64 {
        match raw.and_then(|value| value.parse::<u64>().ok()) {
            Some(size) if size > 0 => max.map_or(size, |max| size.min(max)),
            _ => default,
        }
    }

    /// Resolve against the total row count. An empty result still has one page.
    pub fn resolve(&self, total: u64) -> AppResult<PageWindow> {
        let size = self.size.max(1);
        let num_pages = total.div_ceil(size).max(1);

        let number = match self.number {
            PageNumber::Last => num_pages,
            PageNumber::Number(number) => number,
        };
        if number < 1 || number > num_pages {
            return Err(AppError::invalid_page());
        }

        Ok(PageWindow {
            number,
            size,
            num_pages,
            total,
        })
    }
}

/// A validated page: where the slice starts and how many rows it holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u64,
    pub size: u64,
    pub num_pages: u64,
    pub total: u64,
}

impl PageWindow {
    /// Calculate offset for database query
    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.size
    }

    /// Zero-based page index, as sea-orm paginators count
    pub fn index(&self) -> u64 {
        self.number - 1
    }

    pub fn limit(&self) -> u64 {
        self.size
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// One page of rows plus the window it was cut from
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub window: PageWindow,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, window: PageWindow) -> Self {
        Self { items, window }
    }

    pub fn total(&self) -> u64 {
        self.window.total
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            window: self.window,
        }
    }
}
