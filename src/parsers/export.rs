use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;

use crate::models::CommitRecord;

/// One line of a commit export file
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportLine {
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_commit_id")]
    pub id: String,
    pub author: String,
    pub topic: String,
    #[serde(default)]
    pub size: u64,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_timestamp")]
    pub author_time: DateTime<Utc>,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_timestamp")]
    pub commit_time: DateTime<Utc>,
    #[serde(default)]
    pub message: String,
}

impl From<ExportLine> for CommitRecord {
    fn from(line: ExportLine) -> Self {
        CommitRecord {
            id: line.id,
            primary_text: line.author,
            secondary_text: line.topic,
            magnitude: line.size,
            author_time: line.author_time,
            commit_time: line.commit_time,
            full_message: line.message,
        }
    }
}

/// Parse a single non-blank export line
pub fn parse_export_line(line: &str) -> Result<CommitRecord> {
    let parsed: ExportLine = serde_json::from_str(line)?;
    Ok(parsed.into())
}

/// Render a record as one export line (timestamps as RFC3339 strings)
pub fn to_export_line(record: &CommitRecord) -> Result<String> {
    let value = serde_json::json!({
        "id": record.id,
        "author": record.primary_text,
        "topic": record.secondary_text,
        "size": record.magnitude,
        "authorTime": record.author_time.to_rfc3339_opts(SecondsFormat::Secs, true),
        "commitTime": record.commit_time.to_rfc3339_opts(SecondsFormat::Secs, true),
        "message": record.full_message,
    });
    Ok(serde_json::to_string(&value)?)
}

/// Write records to `path`, one per line, replacing any existing file
pub fn write_export_file(path: &Path, records: &[CommitRecord]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    for record in records {
        writeln!(writer, "{}", to_export_line(record)?)
            .with_context(|| format!("Failed to write export file: {}", path.display()))?;
    }
    writer.flush().context("Failed to flush export file")?;

    Ok(())
}
