//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, TimeZone, Utc};
use commit_browser::models::{CommitRecord, PageRequest, PageResult};
use commit_browser::sources::{JsonlSource, MemorySource, PagedSource, RetrievalError};
use git2::{Repository, Signature, Time};
use tempfile::TempDir;

/// Builder for commit records
pub struct RecordBuilder {
    id: String,
    author: String,
    topic: String,
    magnitude: u64,
    author_time: DateTime<Utc>,
    message: Option<String>,
}

impl RecordBuilder {
    /// Create a new record with default values
    pub fn new() -> Self {
        Self {
            id: "0000000000000000000000000000000000000000".to_string(),
            author: "Test Author <test@example.com>".to_string(),
            topic: "Test commit".to_string(),
            magnitude: 1,
            author_time: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            message: None,
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn author(mut self, author: &str) -> Self {
        self.author = author.to_string();
        self
    }

    pub fn topic(mut self, topic: &str) -> Self {
        self.topic = topic.to_string();
        self
    }

    pub fn magnitude(mut self, magnitude: u64) -> Self {
        self.magnitude = magnitude;
        self
    }

    /// Set the author time (commit time follows it)
    pub fn author_time(mut self, author_time: DateTime<Utc>) -> Self {
        self.author_time = author_time;
        self
    }

    pub fn message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    pub fn build(self) -> CommitRecord {
        CommitRecord {
            id: self.id,
            primary_text: self.author,
            secondary_text: self.topic.clone(),
            magnitude: self.magnitude,
            author_time: self.author_time,
            commit_time: self.author_time,
            full_message: self.message.unwrap_or(self.topic),
        }
    }
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `count` records one hour apart; every third one (index 0, 3, 6, ...) is by "Match"
pub fn numbered_records(count: usize) -> Vec<CommitRecord> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let author = if i % 3 == 0 { "Match <match@example.com>" } else { "Other <other@example.com>" };
            RecordBuilder::new()
                .id(&format!("{:040x}", i + 1))
                .author(author)
                .topic(&format!("Commit {}", i))
                .magnitude(i as u64)
                .author_time(base + Duration::hours(i as i64))
                .build()
        })
        .collect()
}

/// Source wrapper that fails every request starting at a given page request number
pub struct FailingSource {
    inner: MemorySource,
    fail_from_request: usize,
    fail_total: bool,
    requests: Cell<usize>,
}

impl FailingSource {
    /// Fail the `n`th page request (0-based) and every one after it
    pub fn failing_from(records: Vec<CommitRecord>, n: usize) -> Self {
        Self {
            inner: MemorySource::new(records),
            fail_from_request: n,
            fail_total: false,
            requests: Cell::new(0),
        }
    }

    /// Page requests succeed, but `total_count` fails
    pub fn failing_total(records: Vec<CommitRecord>) -> Self {
        Self {
            inner: MemorySource::new(records),
            fail_from_request: usize::MAX,
            fail_total: true,
            requests: Cell::new(0),
        }
    }

    /// Number of page requests received, failed ones included
    pub fn requests(&self) -> usize {
        self.requests.get()
    }
}

impl PagedSource for FailingSource {
    fn fetch_page(&self, request: PageRequest) -> Result<PageResult, RetrievalError> {
        let n = self.requests.get();
        self.requests.set(n + 1);
        if n >= self.fail_from_request {
            return Err(RetrievalError::new(format!("backend unavailable at offset {}", request.offset)));
        }
        self.inner.fetch_page(request)
    }

    fn total_count(&self) -> Result<usize, RetrievalError> {
        if self.fail_total {
            return Err(RetrievalError::new("count unavailable"));
        }
        self.inner.total_count()
    }
}

/// Builder for throwaway git repositories
pub struct GitRepoBuilder {
    temp_dir: TempDir,
    repo: Repository,
    counter: usize,
}

impl GitRepoBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = Repository::init(temp_dir.path()).expect("Failed to init repository");
        Self { temp_dir, repo, counter: 0 }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Add a commit touching one new file with `lines` lines
    pub fn commit(mut self, name: &str, email: &str, message: &str, epoch_secs: i64, lines: usize) -> Self {
        self.counter += 1;
        let file_name = format!("file-{}.txt", self.counter);
        let content: String = (0..lines).map(|i| format!("line {}\n", i)).collect();
        fs::write(self.temp_dir.path().join(&file_name), content).expect("Failed to write file");

        let mut index = self.repo.index().expect("Failed to open index");
        index.add_path(Path::new(&file_name)).expect("Failed to stage file");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");

        {
            let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");
            let sig = Signature::new(name, email, &Time::new(epoch_secs, 0)).expect("Invalid signature");
            let parent = self.repo.head().ok().and_then(|head| head.peel_to_commit().ok());
            let parents: Vec<&git2::Commit> = parent.iter().collect();
            self.repo
                .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
                .expect("Failed to commit");
        }

        self
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for GitRepoBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Seconds since the epoch for midnight UTC plus `hours`
pub fn epoch(year: i32, month: u32, day: u32, hours: u32) -> i64 {
    Utc.with_ymd_and_hms(year, month, day, hours, 0, 0).unwrap().timestamp()
}

/// Write records as a JSON-lines export inside `dir`
pub fn write_export(dir: &TempDir, records: &[CommitRecord]) -> PathBuf {
    let path = dir.path().join("commits.jsonl");
    JsonlSource::write_records(&path, records).expect("Failed to write export");
    path
}
