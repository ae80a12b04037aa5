//! Record sources the provider pages through.
//!
//! A [`PagedSource`] hands out records in a fixed, stable order one window at a
//! time. Sources decide how to fetch and whether to retry; failures surface as
//! [`RetrievalError`] and are never swallowed by the provider.
//!
//! Built-in sources:
//!
//! - [`MemorySource`] - records held in a `Vec`
//! - [`GitSource`] - commits reachable from `HEAD` of a git repository
//! - [`JsonlSource`] - a JSON-lines commit export on disk

pub mod error;
pub mod git;
pub mod jsonl;
pub mod memory;

pub use error::RetrievalError;
pub use git::GitSource;
pub use jsonl::JsonlSource;
pub use memory::MemorySource;

use crate::models::{PageRequest, PageResult};

/// Supplier of records in a fixed total order, accessed by offset/limit windows
pub trait PagedSource {
    /// Records starting at `request.offset`, at most `request.limit` of them.
    ///
    /// Fewer than `limit` records are returned only at the end of the source.
    fn fetch_page(&self, request: PageRequest) -> Result<PageResult, RetrievalError>;

    /// Number of records in the source, irrespective of filtering
    fn total_count(&self) -> Result<usize, RetrievalError>;
}

impl<S: PagedSource + ?Sized> PagedSource for Box<S> {
    fn fetch_page(&self, request: PageRequest) -> Result<PageResult, RetrievalError> {
        (**self).fetch_page(request)
    }

    fn total_count(&self) -> Result<usize, RetrievalError> {
        (**self).total_count()
    }
}
