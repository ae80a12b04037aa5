use std::cell::RefCell;

use super::{PagedSource, RetrievalError};
use crate::models::{CommitRecord, PageRequest, PageResult};

/// Source backed by records already in memory
#[derive(Debug, Default)]
pub struct MemorySource {
    records: Vec<CommitRecord>,
    requests: RefCell<Vec<PageRequest>>,
}

impl MemorySource {
    pub fn new(records: Vec<CommitRecord>) -> Self {
        Self { records, requests: RefCell::new(Vec::new()) }
    }

    /// Every page request served so far, oldest first
    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.borrow().clone()
    }

    pub fn clear_requests(&self) {
        self.requests.borrow_mut().clear();
    }
}

impl PagedSource for MemorySource {
    fn fetch_page(&self, request: PageRequest) -> Result<PageResult, RetrievalError> {
        self.requests.borrow_mut().push(request);

        let start = request.offset.min(self.records.len());
        let end = request.offset.saturating_add(request.limit).min(self.records.len());
        Ok(PageResult::new(self.records[start..end].to_vec(), self.records.len()))
    }

    fn total_count(&self) -> Result<usize, RetrievalError> {
        Ok(self.records.len())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn records(n: usize) -> Vec<CommitRecord> {
        let ts = Utc::now();
        (0..n)
            .map(|i| CommitRecord {
                id: format!("{:040x}", i),
                primary_text: format!("Author {}", i),
                secondary_text: format!("Topic {}", i),
                magnitude: i as u64,
                author_time: ts,
                commit_time: ts,
                full_message: format!("Topic {}", i),
            })
            .collect()
    }

    #[test]
    fn test_fetch_page_window() {
        let source = MemorySource::new(records(10));
        let page = source.fetch_page(PageRequest::new(3, 4)).unwrap();
        assert_eq!(page.records.len(), 4);
        assert_eq!(page.records[0].secondary_text, "Topic 3");
        assert_eq!(page.source_total_count, 10);
    }

    #[test]
    fn test_fetch_page_short_at_end() {
        let source = MemorySource::new(records(10));
        let page = source.fetch_page(PageRequest::new(8, 5)).unwrap();
        assert_eq!(page.records.len(), 2);

        let past_end = source.fetch_page(PageRequest::new(50, 5)).unwrap();
        assert!(past_end.records.is_empty());
    }

    #[test]
    fn test_requests_are_recorded() {
        let source = MemorySource::new(records(3));
        source.fetch_page(PageRequest::new(0, 2)).unwrap();
        source.fetch_page(PageRequest::new(2, 2)).unwrap();
        assert_eq!(source.requests(), vec![PageRequest::new(0, 2), PageRequest::new(2, 2)]);

        source.clear_requests();
        assert!(source.requests().is_empty());
        assert_eq!(source.total_count().unwrap(), 3);
    }
}
