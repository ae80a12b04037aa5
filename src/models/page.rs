use super::record::CommitRecord;

/// Window into the unfiltered source ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

impl PageRequest {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// Request for the window immediately following this one
    pub fn next(&self) -> Self {
        Self { offset: self.offset.saturating_add(self.limit), limit: self.limit }
    }
}

/// One page returned by a source, plus the size of the whole source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub records: Vec<CommitRecord>,
    pub source_total_count: usize,
}

impl PageResult {
    pub fn new(records: Vec<CommitRecord>, source_total_count: usize) -> Self {
        Self { records, source_total_count }
    }

    /// True when this page is the last one the source can produce for `request`
    pub fn is_last(&self, request: &PageRequest) -> bool {
        self.records.len() < request.limit
            || request.offset + self.records.len() >= self.source_total_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_next() {
        let req = PageRequest::new(100, 50);
        assert_eq!(req.next(), PageRequest::new(150, 50));
        assert_eq!(PageRequest::new(usize::MAX - 1, 10).next().offset, usize::MAX);
    }

    #[test]
    fn test_is_last_short_page() {
        let req = PageRequest::new(0, 10);
        let page = PageResult::new(Vec::new(), 0);
        assert!(page.is_last(&req));
    }

    #[test]
    fn test_is_last_full_page_at_end() {
        let records = vec![sample(); 5];
        let page = PageResult::new(records, 15);
        assert!(page.is_last(&PageRequest::new(10, 5)));
        assert!(!page.is_last(&PageRequest::new(5, 5)));
    }

    fn sample() -> CommitRecord {
        let ts = chrono::DateTime::from_timestamp(0, 0).unwrap();
        CommitRecord {
            id: "abc".to_string(),
            primary_text: String::new(),
            secondary_text: String::new(),
            magnitude: 0,
            author_time: ts,
            commit_time: ts,
            full_message: String::new(),
        }
    }
}
