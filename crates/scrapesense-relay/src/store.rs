//! Per-page snapshot store.

use std::collections::HashMap;

use crate::types::{PageId, PageSummary, StoredPage};

/// Latest snapshot per page instance. Owned exclusively by the relay.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    pages: HashMap<PageId, StoredPage>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `page_id`. Last write wins.
    pub fn insert(&mut self, page_id: PageId, page: StoredPage) -> Option<StoredPage> {
        self.pages.insert(page_id, page)
    }

    pub fn get(&self, page_id: PageId) -> Option<&StoredPage> {
        self.pages.get(&page_id)
    }

    /// Evict the entry for a closed page.
    pub fn remove(&mut self, page_id: PageId) -> Option<StoredPage> {
        self.pages.remove(&page_id)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Summaries of every tracked page, newest capture first.
    pub fn summaries(&self) -> Vec<PageSummary> {
        let mut out: Vec<PageSummary> = self
            .pages
            .iter()
            .map(|(id, page)| PageSummary {
                page_id: *id,
                url: page.url.clone(),
                title: page.title.clone(),
                captured_at: page.captured_at,
            })
            .collect();
        out.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(text: &str, at: i64) -> StoredPage {
        StoredPage {
            content: json!({ "text": text }),
            url: Some(format!("https://example.com/{}", text)),
            title: Some(text.to_string()),
            captured_at: at,
        }
    }

    #[test]
    fn test_last_write_wins() {
        let mut store = SnapshotStore::new();
        assert!(store.insert(PageId::Tab(1), page("first", 1)).is_none());
        let previous = store.insert(PageId::Tab(1), page("second", 2));

        assert_eq!(previous.unwrap().title.as_deref(), Some("first"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(PageId::Tab(1)).unwrap().content, json!({"text": "second"}));
    }

    #[test]
    fn test_remove_evicts_only_that_page() {
        let mut store = SnapshotStore::new();
        store.insert(PageId::Tab(1), page("a", 1));
        store.insert(PageId::Unknown, page("b", 2));

        assert!(store.remove(PageId::Tab(1)).is_some());
        assert!(store.get(PageId::Tab(1)).is_none());
        assert!(store.get(PageId::Unknown).is_some());
        assert!(store.remove(PageId::Tab(1)).is_none());
    }

    #[test]
    fn test_summaries_newest_first() {
        let mut store = SnapshotStore::new();
        store.insert(PageId::Tab(1), page("old", 10));
        store.insert(PageId::Tab(2), page("new", 20));

        let summaries = store.summaries();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].page_id, PageId::Tab(2));
        assert_eq!(summaries[1].title.as_deref(), Some("old"));
    }
}
