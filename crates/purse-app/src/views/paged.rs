//! Paginated list state.

use serde::{Deserialize, Serialize};

use crate::bridge::Page;

/// Items loaded so far for one paginated stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagedList<T> {
    /// Items in display order
    pub items: Vec<T>,
    /// Last page applied; 0 when nothing has loaded
    pub page: u32,
    /// Whether the server reported further pages
    pub has_more: bool,
}

impl<T> Default for PagedList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            has_more: false,
        }
    }
}

impl<T> PagedList<T> {
    /// Drop every item, back to the unloaded state.
    pub fn clear(&mut self) {
        self.items.clear();
        self.page = 0;
        self.has_more = false;
    }

    /// Replace the contents with a freshly loaded first page.
    pub fn replace_with(&mut self, page: Page<T>) {
        self.items = page.items;
        self.page = page.page;
        self.has_more = page.has_more;
    }

    /// Append `page` if it directly follows the last applied page.
    ///
    /// Returns `false` (and leaves the list untouched) for duplicate or
    /// out-of-order pages.
    pub fn append(&mut self, page: Page<T>) -> bool {
        if self.page == 0 || page.page != self.page + 1 {
            return false;
        }
        self.items.extend(page.items);
        self.page = page.page;
        self.has_more = page.has_more;
        true
    }

    /// Next page to request, if the list is loaded and not exhausted.
    pub fn next_page(&self) -> Option<u32> {
        (self.page > 0 && self.has_more).then(|| self.page + 1)
    }

    /// Whether at least one page has been applied.
    pub fn is_loaded(&self) -> bool {
        self.page > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(items: &[u32], page: u32, has_more: bool) -> Page<u32> {
        Page {
            items: items.to_vec(),
            page,
            has_more,
        }
    }

    #[test]
    fn test_append_requires_consecutive_page() {
        let mut list = PagedList::default();
        assert!(!list.append(page(&[1], 1, true)));

        list.replace_with(page(&[1, 2], 1, true));
        assert!(!list.append(page(&[5], 3, true)));
        assert!(list.append(page(&[3, 4], 2, false)));
        assert!(!list.append(page(&[3, 4], 2, false)));

        assert_eq!(list.items, vec![1, 2, 3, 4]);
        assert_eq!(list.page, 2);
        assert_eq!(list.next_page(), None);
    }

    #[test]
    fn test_clear_resets_paging() {
        let mut list = PagedList::default();
        list.replace_with(page(&[1], 1, true));
        assert_eq!(list.next_page(), Some(2));

        list.clear();
        assert!(!list.is_loaded());
        assert_eq!(list.next_page(), None);
    }
}
