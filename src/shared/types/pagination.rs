/// One window over the backend-ordered workplace sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    /// 1-based page index
    pub page: u32,
    pub page_size: u32,
    /// Record count across all pages
    pub total: u64,
    pub prev_key: Option<u32>,
    pub next_key: Option<u32>,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, page: u32, page_size: u32, total: u64) -> Self {
        let prev_key = prev_key(page);
        let next_key = next_key(page, page_size, total, data.is_empty());
        Self {
            data,
            page,
            page_size,
            total,
            prev_key,
            next_key,
        }
    }

    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 {
            return 0;
        }
        u32::try_from(self.total.div_ceil(self.page_size as u64)).unwrap_or(u32::MAX)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// `page - 1` unless on the first page
pub fn prev_key(page: u32) -> Option<u32> {
    (page > 1).then(|| page - 1)
}

/// `page + 1` while the page brought data and more records remain.
/// There is no key past `u32::MAX`.
pub fn next_key(page: u32, page_size: u32, total: u64, page_is_empty: bool) -> Option<u32> {
    let seen = page as u64 * page_size as u64;
    (!page_is_empty && seen < total)
        .then(|| page.checked_add(1))
        .flatten()
}

/// Snapshot of the loaded pages and the last-viewed item
#[derive(Debug, Clone, Copy)]
pub struct PagingState<'a, T> {
    pub pages: &'a [Page<T>],
    /// Index of the anchor item within the concatenated loaded items
    pub anchor_position: Option<usize>,
}

impl<'a, T> PagingState<'a, T> {
    pub fn new(pages: &'a [Page<T>], anchor_position: Option<usize>) -> Self {
        Self {
            pages,
            anchor_position,
        }
    }

    /// Page holding the item at `position`; past the end this is the last
    /// non-empty page.
    pub fn closest_page_to_position(&self, position: usize) -> Option<&'a Page<T>> {
        let mut remaining = position;
        let mut last_non_empty = None;
        for page in self.pages {
            if page.is_empty() {
                continue;
            }
            if remaining < page.len() {
                return Some(page);
            }
            remaining -= page.len();
            last_non_empty = Some(page);
        }
        last_non_empty
    }

    /// Page to reload after invalidation: the page the anchor sits on,
    /// derived from that page's neighbour keys.
    pub fn refresh_key(&self) -> Option<u32> {
        let anchor = self.anchor_position?;
        let page = self.closest_page_to_position(anchor)?;
        page.prev_key
            .map(|k| k + 1)
            .or_else(|| page.next_key.map(|k| k - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(index: u32, items: usize, total: u64) -> Page<u32> {
        Page::new((0..items as u32).collect(), index, 10, total)
    }

    #[test]
    fn last_representable_page_has_no_next_key() {
        assert_eq!(next_key(u32::MAX, 10, u64::MAX, false), None);
        assert_eq!(next_key(u32::MAX - 1, 10, u64::MAX, false), Some(u32::MAX));

        let huge = Page::new(vec![0u32], u32::MAX, 1, u64::MAX);
        assert_eq!(huge.next_key, None);
        assert_eq!(huge.total_pages(), u32::MAX);
    }

    #[test]
    fn first_page_of_three() {
        let p = page(1, 10, 25);
        assert_eq!(p.prev_key, None);
        assert_eq!(p.next_key, Some(2));
        assert_eq!(p.total_pages(), 3);
    }

    #[test]
    fn last_page_terminates() {
        let p = page(3, 5, 25);
        assert_eq!(p.prev_key, Some(2));
        assert_eq!(p.next_key, None);
    }

    #[test]
    fn empty_page_terminates_even_if_total_says_more() {
        let p = page(2, 0, 100);
        assert_eq!(p.next_key, None);
        assert_eq!(p.prev_key, Some(1));
    }

    #[test]
    fn exact_multiple_stops_on_last_page() {
        assert_eq!(page(2, 10, 20).next_key, None);
        assert_eq!(page(1, 10, 20).next_key, Some(2));
    }

    #[test]
    fn refresh_key_uses_anchor_page() {
        let pages = vec![page(1, 10, 25), page(2, 10, 25), page(3, 5, 25)];
        assert_eq!(PagingState::new(&pages, Some(0)).refresh_key(), Some(1));
        assert_eq!(PagingState::new(&pages, Some(14)).refresh_key(), Some(2));
        assert_eq!(PagingState::new(&pages, Some(22)).refresh_key(), Some(3));
    }

    #[test]
    fn refresh_key_past_end_clamps_to_last_page() {
        let pages = vec![page(1, 10, 15), page(2, 5, 15)];
        assert_eq!(PagingState::new(&pages, Some(99)).refresh_key(), Some(2));
    }

    #[test]
    fn refresh_key_without_anchor_or_pages() {
        let pages = vec![page(1, 10, 25)];
        assert_eq!(PagingState::new(&pages, None).refresh_key(), None);
        let empty: Vec<Page<u32>> = Vec::new();
        assert_eq!(PagingState::new(&empty, Some(0)).refresh_key(), None);
    }

    #[test]
    fn single_page_has_no_neighbours() {
        let pages = vec![page(1, 3, 3)];
        assert_eq!(PagingState::new(&pages, Some(1)).refresh_key(), None);
    }
}
