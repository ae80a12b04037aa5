//! Filtered, paginated view over a [`PagedSource`].
//!
//! The provider never holds more than one source page plus the requested
//! window in memory. Visible windows are expressed in terms of the filtered
//! result set and translated into as many source pages as needed; page
//! boundaries need not line up with matches.
//!
//! # Consistency
//!
//! - `set_filter` swaps the whole [`FilterSpec`] snapshot, clears the cached
//!   count and notifies listeners before returning, so every later
//!   `fetch_page`/`count` sees the new filter.
//! - A failing page aborts the whole call with the source's
//!   [`RetrievalError`]; nothing partial is returned or cached, and nothing is
//!   retried here.
//!
//! # Example
//!
//! ```rust
//! use commit_browser::filters::FilterSpec;
//! use commit_browser::provider::LazyFilteredProvider;
//! use commit_browser::sources::MemorySource;
//!
//! let provider = LazyFilteredProvider::new(MemorySource::new(Vec::new()));
//! provider.set_filter(FilterSpec::new().with_primary_text(Some("jane")));
//! assert_eq!(provider.count()?, 0);
//! # Ok::<(), commit_browser::sources::RetrievalError>(())
//! ```

use std::cell::{Cell, RefCell};
use std::ops::ControlFlow;
use std::rc::Rc;

use anyhow::{Result, bail};

use super::listeners::{ListenerRegistry, Subscription};
use crate::filters::{FilterSpec, matches};
use crate::models::{CommitRecord, PageRequest};
use crate::sources::{PagedSource, RetrievalError};

/// Records requested from the source per page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Limit used for every source page request
    pub page_size: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self { page_size: DEFAULT_PAGE_SIZE }
    }
}

/// Bookkeeping for the most recent source scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Source pages requested
    pub pages: usize,
    /// Records received from the source
    pub source_records: usize,
    /// Records that satisfied the filter
    pub matched: usize,
}

pub struct LazyFilteredProvider<S> {
    source: S,
    config: ProviderConfig,
    filter: RefCell<Rc<FilterSpec>>,
    cached_count: Cell<Option<usize>>,
    last_scan: Cell<Option<ScanStats>>,
    listeners: ListenerRegistry,
}

impl<S: PagedSource> LazyFilteredProvider<S> {
    /// Provider with the match-everything filter and the default page size
    pub fn new(source: S) -> Self {
        Self {
            source,
            config: ProviderConfig::default(),
            filter: RefCell::new(Rc::new(FilterSpec::new())),
            cached_count: Cell::new(None),
            last_scan: Cell::new(None),
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn with_config(source: S, config: ProviderConfig) -> Result<Self> {
        if config.page_size == 0 {
            bail!("Page size must be greater than zero");
        }
        Ok(Self { config, ..Self::new(source) })
    }

    pub fn config(&self) -> ProviderConfig {
        self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The active filter snapshot
    pub fn filter(&self) -> Rc<FilterSpec> {
        Rc::clone(&self.filter.borrow())
    }

    /// Replace the active filter, drop the cached count and notify listeners.
    ///
    /// Every call notifies, even when `spec` equals the active filter.
    pub fn set_filter(&self, spec: FilterSpec) {
        *self.filter.borrow_mut() = Rc::new(spec);
        self.cached_count.set(None);
        self.listeners.notify();
    }

    /// Register a callback run synchronously after each `set_filter`
    pub fn on_filter_changed(&self, listener: impl FnMut() + 'static) -> Subscription {
        self.listeners.subscribe(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Up to `limit` matching records, skipping the first `offset` matches.
    ///
    /// Records come back in source order. Source pages are requested until the
    /// window is full or the source is exhausted.
    pub fn fetch_page(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<CommitRecord>, RetrievalError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let spec = self.filter();
        let mut window = Vec::with_capacity(limit.min(self.config.page_size));

        // With no criteria the visible window is the source window
        let (start, mut to_skip) = if spec.is_empty() { (offset, 0) } else { (0, offset) };

        self.scan(&spec, start, |record| {
            if to_skip > 0 {
                to_skip -= 1;
                return ControlFlow::Continue(());
            }
            window.push(record);
            if window.len() >= limit { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
        })?;

        Ok(window)
    }

    /// Number of records matching the active filter across the whole source.
    ///
    /// Cached until the next `set_filter`.
    pub fn count(&self) -> Result<usize, RetrievalError> {
        if let Some(count) = self.cached_count.get() {
            return Ok(count);
        }

        let spec = self.filter();
        let count = if spec.is_empty() {
            self.source.total_count()?
        } else {
            self.scan(&spec, 0, |_| ControlFlow::Continue(()))?.matched
        };

        self.cached_count.set(Some(count));
        Ok(count)
    }

    /// Stream every matching record, in source order, until `visit` breaks.
    ///
    /// Only one source page is held at a time. On a retrieval failure the
    /// error is returned; records already visited are not rolled back.
    pub fn for_each_match<F>(&self, visit: F) -> Result<ScanStats, RetrievalError>
    where
        F: FnMut(CommitRecord) -> ControlFlow<()>,
    {
        let spec = self.filter();
        self.scan(&spec, 0, visit)
    }

    /// Size of the unfiltered source
    pub fn source_total(&self) -> Result<usize, RetrievalError> {
        self.source.total_count()
    }

    /// Statistics for the last scan, or `None` if it failed or none has run
    pub fn last_scan(&self) -> Option<ScanStats> {
        self.last_scan.get()
    }

    /// Walk source pages from `start`, handing matching records to `visit`
    fn scan<F>(&self, spec: &FilterSpec, start: usize, mut visit: F) -> Result<ScanStats, RetrievalError>
    where
        F: FnMut(CommitRecord) -> ControlFlow<()>,
    {
        self.last_scan.set(None);
        let mut stats = ScanStats::default();
        let mut request = PageRequest::new(start, self.config.page_size);

        'pages: loop {
            let page = self.source.fetch_page(request)?;
            let fetched = page.records.len();
            let is_last = page.is_last(&request);
            stats.pages += 1;
            stats.source_records += fetched;

            for record in page.records {
                if !matches(&record, spec) {
                    continue;
                }
                stats.matched += 1;
                if visit(record).is_break() {
                    break 'pages;
                }
            }

            // Only a full page can be followed by another
            if is_last || fetched == 0 {
                break;
            }
            request = request.next();
        }

        self.last_scan.set(Some(stats));
        Ok(stats)
    }
}
