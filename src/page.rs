use serde::Serialize;

/// One page of records together with what is needed to link to the others.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<M> {
    items: Vec<M>,
    total: u64,
    per_page: u64,
    current_page: i64,
    path: String,
    page_name: String,
}

impl<M> Page<M> {
    pub fn new(
        items: Vec<M>,
        total: u64,
        per_page: u64,
        current_page: i64,
        path: String,
        page_name: String,
    ) -> Self {
        Self {
            items,
            total,
            per_page,
            current_page,
            path,
            page_name,
        }
    }
    pub fn items(&self) -> &[M] {
        &self.items
    }
    pub fn into_items(self) -> Vec<M> {
        self.items
    }
    pub fn total(&self) -> u64 {
        self.total
    }
    pub fn per_page(&self) -> u64 {
        self.per_page
    }
    pub fn current_page(&self) -> i64 {
        self.current_page
    }
    pub fn path(&self) -> &str {
        &self.path
    }
    pub fn len(&self) -> usize {
        self.items.len()
    }
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
    /// Never below one, even for an empty result.
    pub fn last_page(&self) -> u64 {
        if self.per_page == 0 {
            return 1;
        }
        self.total.div_ceil(self.per_page).max(1)
    }
    pub fn on_first_page(&self) -> bool {
        self.current_page <= 1
    }
    pub fn has_more_pages(&self) -> bool {
        self.current_page < i64::try_from(self.last_page()).unwrap_or(i64::MAX)
    }
    /// 1-based position of the first item on this page within all results.
    pub fn first_item(&self) -> Option<u64> {
        if self.items.is_empty() {
            return None;
        }
        let skipped = u64::try_from(self.current_page.saturating_sub(1)).unwrap_or(0);
        Some(self.per_page.saturating_mul(skipped).saturating_add(1))
    }
    pub fn last_item(&self) -> Option<u64> {
        let rest = self.items.len().saturating_sub(1) as u64;
        self.first_item().map(|first| first.saturating_add(rest))
    }
    pub fn url(&self, page: i64) -> String {
        let page = page.max(1);
        let separator = if self.path.contains('?') { '&' } else { '?' };
        format!("{}{}{}={}", self.path, separator, self.page_name, page)
    }
    pub fn next_page_url(&self) -> Option<String> {
        self.has_more_pages()
            .then(|| self.url(self.current_page.saturating_add(1)))
    }
    pub fn previous_page_url(&self) -> Option<String> {
        (self.current_page > 1).then(|| self.url(self.current_page - 1))
    }
}

impl<M> IntoIterator for Page<M> {
    type Item = M;
    type IntoIter = std::vec::IntoIter<M>;
    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
