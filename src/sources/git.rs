use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use git2::{Commit, ErrorCode, Oid, Repository, Sort};

use super::{PagedSource, RetrievalError};
use crate::models::{CommitRecord, PageRequest, PageResult};

/// Commits reachable from `HEAD`, newest first.
///
/// Opening walks the history once to collect object ids only. Commit objects,
/// messages and diff stats are loaded per page.
pub struct GitSource {
    repo: Repository,
    oids: Vec<Oid>,
}

impl GitSource {
    /// Open the repository at (or above) `path`.
    ///
    /// A repository without commits yields an empty source.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let repo = Repository::discover(path)
            .with_context(|| format!("Failed to open git repository at {}", path.display()))?;
        let oids = collect_history(&repo).context("Failed to walk commit history")?;
        Ok(Self { repo, oids })
    }

    pub fn len(&self) -> usize {
        self.oids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.oids.is_empty()
    }

    fn load_record(&self, oid: Oid) -> Result<CommitRecord, RetrievalError> {
        let commit = self
            .repo
            .find_commit(oid)
            .map_err(|e| RetrievalError::with_source(format!("Failed to load commit {}", oid), e))?;
        let magnitude = self.lines_changed(&commit).map_err(|e| {
            RetrievalError::with_source(format!("Failed to diff commit {}", oid), e)
        })?;

        let author = commit.author();
        let author_name = String::from_utf8_lossy(author.name_bytes());
        let author_email = String::from_utf8_lossy(author.email_bytes());

        Ok(CommitRecord {
            id: oid.to_string(),
            primary_text: format!("{} <{}>", author_name, author_email),
            secondary_text: commit
                .summary_bytes()
                .map(|s| String::from_utf8_lossy(s).into_owned())
                .unwrap_or_default(),
            magnitude,
            author_time: to_utc(author.when(), oid)?,
            commit_time: to_utc(commit.time(), oid)?,
            full_message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
        })
    }

    /// Inserted plus deleted lines against the first parent (or the empty tree)
    fn lines_changed(&self, commit: &Commit) -> Result<u64, git2::Error> {
        let tree = commit.tree()?;
        let parent_tree = if commit.parent_count() > 0 { Some(commit.parent(0)?.tree()?) } else { None };
        let diff = self.repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
        let stats = diff.stats()?;
        Ok((stats.insertions() + stats.deletions()) as u64)
    }
}

impl PagedSource for GitSource {
    fn fetch_page(&self, request: PageRequest) -> Result<PageResult, RetrievalError> {
        let start = request.offset.min(self.oids.len());
        let end = request.offset.saturating_add(request.limit).min(self.oids.len());

        let records = self.oids[start..end]
            .iter()
            .map(|oid| self.load_record(*oid))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PageResult::new(records, self.oids.len()))
    }

    fn total_count(&self) -> Result<usize, RetrievalError> {
        Ok(self.oids.len())
    }
}

fn collect_history(repo: &Repository) -> Result<Vec<Oid>, git2::Error> {
    match repo.head() {
        Ok(_) => {}
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    }

    let mut revwalk = repo.revwalk()?;
    revwalk.push_head()?;
    revwalk.set_sorting(Sort::TIME)?;
    revwalk.collect()
}

fn to_utc(time: git2::Time, oid: Oid) -> Result<DateTime<Utc>, RetrievalError> {
    DateTime::from_timestamp(time.seconds(), 0)
        .ok_or_else(|| RetrievalError::new(format!("Commit {} has an out-of-range timestamp", oid)))
}
