//! JSON-lines commit export format
//!
//! Each non-blank line holds one commit:
//!
//! ```text
//! {"id":"<hex>","author":"Name <email>","topic":"subject","size":12,
//!  "authorTime":"2024-01-02T08:00:00Z","commitTime":1704182400000,"message":"..."}
//! ```
//!
//! Timestamps are epoch milliseconds or RFC3339 strings. `size` and `message`
//! are optional. A malformed line is never skipped, since that would shift the
//! offset of every later record between page requests; readers report it as an
//! error naming the line.

pub mod deserializers;
pub mod export;

pub use export::{parse_export_line, to_export_line, write_export_file};
