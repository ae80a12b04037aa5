use chrono::{DateTime, Utc};

/// One commit as shown in the history table.
///
/// Records are produced by a [`PagedSource`](crate::sources::PagedSource) and never
/// mutated afterwards; the filtering layer only reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub id: String,
    /// Author identity, e.g. `Jane Doe <jane@example.com>`
    pub primary_text: String,
    /// Subject line of the commit message
    pub secondary_text: String,
    /// Lines changed (insertions + deletions)
    pub magnitude: u64,
    pub author_time: DateTime<Utc>,
    pub commit_time: DateTime<Utc>,
    pub full_message: String,
}

impl CommitRecord {
    /// Abbreviated id (first 8 characters) for tabular output
    pub fn short_id(&self) -> &str {
        let end = self.id.char_indices().nth(8).map(|(i, _)| i).unwrap_or(self.id.len());
        &self.id[..end]
    }

    /// Commit message with `\r\n` and lone `\r` normalized to `\n`
    pub fn normalized_message(&self) -> String {
        self.full_message.replace("\r\n", "\n").replace('\r', "\n")
    }
}
