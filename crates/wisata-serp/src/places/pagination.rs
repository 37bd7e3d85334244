//! Page windows and synthesized pagination metadata.
//!
//! The provider reports no total, so paging is inferred from the raw record
//! count of the current call: a full over-fetched page suggests more exist.

use wisata_core::{Place, SearchPage, MAX_PAGE_SIZE};

use crate::error::ResolverError;

/// Records requested per page slot, to absorb provider-side filtering.
const OVER_FETCH_FACTOR: u32 = 2;

/// A validated `(page, page_size)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page: u32,
    page_size: u32,
    offset: u32,
}

impl PageWindow {
    /// # Errors
    ///
    /// Returns [`ResolverError::InvalidInput`] if `page` is zero, `page_size`
    /// is outside `1..=50`, or the offset would overflow.
    pub fn new(page: u32, page_size: u32) -> Result<Self, ResolverError> {
        if page == 0 {
            return Err(ResolverError::InvalidInput(
                "page must be at least 1".to_string(),
            ));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(ResolverError::InvalidInput(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"
            )));
        }
        let offset = (page - 1)
            .checked_mul(page_size)
            .ok_or_else(|| ResolverError::InvalidInput(format!("page {page} is too large")))?;
        Ok(Self {
            page,
            page_size,
            offset,
        })
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Zero-based index of the first record, sent as `start`.
    #[must_use]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Number of raw records to request, sent as `num`.
    #[must_use]
    pub fn fetch_count(&self) -> u32 {
        self.page_size * OVER_FETCH_FACTOR
    }

    /// Slices `places` to the page size and attaches pagination metadata.
    ///
    /// `raw_count` is the number of records the provider returned, before
    /// normalization dropped or deduplicated any.
    #[must_use]
    pub fn assemble(&self, mut places: Vec<Place>, raw_count: usize, locality: String) -> SearchPage {
        places.truncate(self.page_size as usize);
        SearchPage {
            items: places,
            page: self.page,
            page_size: self.page_size,
            has_next_page: raw_count >= self.page_size as usize,
            has_previous_page: self.page > 1,
            total_results_observed: raw_count,
            locality,
        }
    }
}
