//! Commit Browser - Filter and page through commit history lazily
//!
//! This library is the filtering and lazy-retrieval layer behind a commit
//! history table. It provides:
//!
//! - An immutable [`FilterSpec`] with author/topic substring and date bounds
//! - A pure [`matches`] predicate deciding whether a commit satisfies a filter
//! - A [`PagedSource`] trait for records fetched by offset/limit windows, with
//!   in-memory, git repository and JSON-lines implementations
//! - [`LazyFilteredProvider`], which turns filtered "visible" windows into as
//!   many source pages as needed and notifies subscribers when the filter changes
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use commit_browser::{FilterSpec, GitSource, LazyFilteredProvider};
//!
//! let provider = LazyFilteredProvider::new(GitSource::open(Path::new("."))?);
//! provider.set_filter(FilterSpec::new().with_primary_text(Some("jane")));
//! for commit in provider.fetch_page(0, 20)? {
//!     println!("{} {}", commit.short_id(), commit.secondary_text);
//! }
//! println!("{} matching commits", provider.count()?);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod filters;
pub mod models;
pub mod parsers;
pub mod provider;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use filters::{DayZone, FilterSpec, matches, parse_query};
pub use models::{CommitRecord, PageRequest, PageResult};
pub use provider::{LazyFilteredProvider, ProviderConfig, Subscription};
pub use sources::{GitSource, JsonlSource, MemorySource, PagedSource, RetrievalError};
