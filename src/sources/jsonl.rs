use std::cell::OnceCell;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::Context;

use super::{PagedSource, RetrievalError};
use crate::models::{CommitRecord, PageRequest, PageResult};
use crate::parsers::export::{parse_export_line, write_export_file};

/// Source reading a JSON-lines commit export.
///
/// The file is re-read for every page and only the requested window is
/// parsed, so memory use is bounded by the page size. Blank lines do not
/// count towards offsets.
#[derive(Debug)]
pub struct JsonlSource {
    path: PathBuf,
    total: OnceCell<usize>,
}

impl JsonlSource {
    /// Open an export file; fails if the file cannot be opened
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        File::open(path)
            .with_context(|| format!("Failed to open export file: {}", path.display()))?;
        Ok(Self { path: path.to_path_buf(), total: OnceCell::new() })
    }

    /// Write `records` as an export file readable by [`JsonlSource::open`]
    pub fn write_records(path: &Path, records: &[CommitRecord]) -> anyhow::Result<()> {
        write_export_file(path, records)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn reader(&self) -> Result<BufReader<File>, RetrievalError> {
        let file = File::open(&self.path).map_err(|e| {
            RetrievalError::with_source(
                format!("Failed to open export file {}", self.path.display()),
                e,
            )
        })?;
        Ok(BufReader::new(file))
    }

    fn count_records(&self) -> Result<usize, RetrievalError> {
        let mut count = 0;
        for line in self.reader()?.lines() {
            let line = line.map_err(|e| {
                RetrievalError::with_source(
                    format!("Failed to read export file {}", self.path.display()),
                    e,
                )
            })?;
            if !line.trim().is_empty() {
                count += 1;
            }
        }
        Ok(count)
    }
}

impl PagedSource for JsonlSource {
    fn fetch_page(&self, request: PageRequest) -> Result<PageResult, RetrievalError> {
        let total = self.total_count()?;
        let mut records = Vec::with_capacity(request.limit.min(total));
        let mut index = 0;

        for (line_num, line) in self.reader()?.lines().enumerate() {
            if records.len() >= request.limit {
                break;
            }
            let line = line.map_err(|e| {
                RetrievalError::with_source(
                    format!("Failed to read line {} of {}", line_num + 1, self.path.display()),
                    e,
                )
            })?;
            if line.trim().is_empty() {
                continue;
            }
            if index >= request.offset {
                let record = parse_export_line(&line).map_err(|e| {
                    RetrievalError::with_source(
                        format!(
                            "Malformed commit on line {} of {}",
                            line_num + 1,
                            self.path.display()
                        ),
                        e,
                    )
                })?;
                records.push(record);
            }
            index += 1;
        }

        Ok(PageResult::new(records, total))
    }

    fn total_count(&self) -> Result<usize, RetrievalError> {
        if let Some(total) = self.total.get() {
            return Ok(*total);
        }
        let total = self.count_records()?;
        Ok(*self.total.get_or_init(|| total))
    }
}
