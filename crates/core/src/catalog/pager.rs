//! Fixed-size page slicing over the ordered catalog.

use serde::{Deserialize, Serialize};

use crate::models::Game;

/// Cards shown per catalog page.
pub const PAGE_SIZE: usize = 5;

/// Number of pages needed for `catalog_len` entries. An empty catalog has
/// zero pages; callers render an empty state instead of paging.
pub fn total_pages(catalog_len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    catalog_len.div_ceil(page_size)
}

/// The entries visible on `page`: exactly `min(page_size, remaining)`
/// games starting at `page * page_size`, in catalog order. A page outside
/// `[0, total_pages)` is a caller bug and comes back empty.
pub fn page_slice(catalog: &[Game], page_size: usize, page: usize) -> &[Game] {
    let start = page.saturating_mul(page_size);
    if page_size == 0 || start >= catalog.len() {
        return &[];
    }
    let end = (start + page_size).min(catalog.len());
    &catalog[start..end]
}

/// Zero-based page cursor for one catalog view.
///
/// Created fresh when the view mounts and dropped when the user navigates
/// away; page position is never carried between screens. Navigation past
/// either bound is a silent no-op.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PageState {
    page: usize,
}

impl PageState {
    /// Fresh state on page zero.
    pub fn new() -> Self {
        Self { page: 0 }
    }

    /// Current zero-based page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Step back one page if not already on the first.
    pub fn go_prev(&mut self) {
        if self.page > 0 {
            self.page -= 1;
        }
    }

    /// Step forward one page if another exists.
    pub fn go_next(&mut self, total_pages: usize) {
        if self.page + 1 < total_pages {
            self.page += 1;
        }
    }

    /// Clamp back into range after the catalog shrank underneath us.
    pub fn clamp(&mut self, total_pages: usize) {
        if total_pages == 0 {
            self.page = 0;
        } else if self.page >= total_pages {
            self.page = total_pages - 1;
        }
    }

    /// One-based "current / total" indicator text.
    pub fn indicator(&self, total_pages: usize) -> String {
        format!("{} / {}", self.page + 1, total_pages.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogProvider, SampleCatalog};

    #[test]
    fn page_counts() {
        assert_eq!(total_pages(30, 5), 6);
        assert_eq!(total_pages(31, 5), 7);
        assert_eq!(total_pages(4, 5), 1);
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(30, 0), 0);
    }

    #[test]
    fn last_page_holds_the_tail() {
        let catalog = SampleCatalog.fetch_catalog().unwrap();
        let slice = page_slice(&catalog, 5, 5);
        let ids: Vec<u32> = slice.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![26, 27, 28, 29, 30]);

        let short = page_slice(&catalog[..28], 5, 5);
        assert_eq!(short.len(), 3);
    }

    #[test]
    fn out_of_range_page_is_empty_not_a_panic() {
        let catalog = SampleCatalog.fetch_catalog().unwrap();
        assert!(page_slice(&catalog, 5, 6).is_empty());
        assert!(page_slice(&[], 5, 0).is_empty());
    }

    #[test]
    fn navigation_stops_at_both_bounds() {
        let total = total_pages(30, 5);
        let mut state = PageState::new();

        state.go_prev();
        assert_eq!(state.page(), 0);

        for _ in 0..10 {
            state.go_next(total);
        }
        assert_eq!(state.page(), 5);

        state.go_next(total);
        assert_eq!(state.page(), 5);
        assert_eq!(state.indicator(total), "6 / 6");
    }

    #[test]
    fn clamp_recovers_from_a_shrunken_catalog() {
        let mut state = PageState::new();
        for _ in 0..5 {
            state.go_next(6);
        }
        state.clamp(2);
        assert_eq!(state.page(), 1);
        state.clamp(0);
        assert_eq!(state.page(), 0);
    }
}
