//! Data models for the commit browser.
//!
//! - [`CommitRecord`] - One immutable commit fact
//! - [`PageRequest`] / [`PageResult`] - Offset/limit windows over the unfiltered source

pub mod page;
pub mod record;

pub use page::{PageRequest, PageResult};
pub use record::CommitRecord;
