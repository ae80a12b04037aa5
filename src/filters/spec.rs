//! Immutable snapshot of the active filter criteria.
//!
//! A [`FilterSpec`] is never changed in place. Every `with_*` call returns a new
//! value, and the provider swaps the whole snapshot at once.

use chrono::{FixedOffset, NaiveDate, Offset, Utc};

/// Strict `YYYY-MM-DD` date format accepted for date bounds
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time zone in which a date bound's calendar day starts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DayZone {
    /// The system's local time zone
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl DayZone {
    pub fn utc() -> Self {
        DayZone::Fixed(Utc.fix())
    }
}

/// Four optional criteria; an absent criterion imposes no constraint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    primary_text_query: Option<String>,
    secondary_text_query: Option<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    day_zone: DayZone,
    // Lowercased copies of the queries, computed once per snapshot
    primary_needle: Option<String>,
    secondary_needle: Option<String>,
}

impl FilterSpec {
    /// Match-everything specification (all fields absent)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> FilterSpecBuilder {
        FilterSpecBuilder::default()
    }

    /// Build from raw user input.
    ///
    /// Empty or whitespace-only text is treated as absent, and dates that do not
    /// parse as `YYYY-MM-DD` are treated as absent.
    pub fn from_input(
        author: &str,
        topic: &str,
        since: Option<&str>,
        until: Option<&str>,
    ) -> Self {
        Self::builder()
            .primary_text(non_blank(author))
            .secondary_text(non_blank(topic))
            .start_date(since.and_then(parse_day))
            .end_date(until.and_then(parse_day))
            .build()
    }

    pub fn primary_text_query(&self) -> Option<&str> {
        self.primary_text_query.as_deref()
    }

    pub fn secondary_text_query(&self) -> Option<&str> {
        self.secondary_text_query.as_deref()
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn day_zone(&self) -> DayZone {
        self.day_zone
    }

    pub(crate) fn primary_needle(&self) -> Option<&str> {
        self.primary_needle.as_deref()
    }

    pub(crate) fn secondary_needle(&self) -> Option<&str> {
        self.secondary_needle.as_deref()
    }

    /// True when no criterion is active; the day zone alone is not a criterion
    pub fn is_empty(&self) -> bool {
        self.primary_needle.is_none()
            && self.secondary_needle.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    pub fn with_primary_text(&self, query: Option<&str>) -> Self {
        self.to_builder().primary_text(query).build()
    }

    pub fn with_secondary_text(&self, query: Option<&str>) -> Self {
        self.to_builder().secondary_text(query).build()
    }

    pub fn with_start_date(&self, date: Option<NaiveDate>) -> Self {
        self.to_builder().start_date(date).build()
    }

    pub fn with_end_date(&self, date: Option<NaiveDate>) -> Self {
        self.to_builder().end_date(date).build()
    }

    pub fn with_day_zone(&self, zone: DayZone) -> Self {
        self.to_builder().day_zone(zone).build()
    }

    fn to_builder(&self) -> FilterSpecBuilder {
        FilterSpecBuilder {
            primary_text_query: self.primary_text_query.clone(),
            secondary_text_query: self.secondary_text_query.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            day_zone: self.day_zone,
        }
    }
}

/// Builder for [`FilterSpec`]; the only way to set several fields at once
#[derive(Debug, Clone, Default)]
pub struct FilterSpecBuilder {
    primary_text_query: Option<String>,
    secondary_text_query: Option<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    day_zone: DayZone,
}

impl FilterSpecBuilder {
    pub fn primary_text(mut self, query: Option<&str>) -> Self {
        self.primary_text_query = query.map(str::to_string);
        self
    }

    pub fn secondary_text(mut self, query: Option<&str>) -> Self {
        self.secondary_text_query = query.map(str::to_string);
        self
    }

    pub fn start_date(mut self, date: Option<NaiveDate>) -> Self {
        self.start_date = date;
        self
    }

    pub fn end_date(mut self, date: Option<NaiveDate>) -> Self {
        self.end_date = date;
        self
    }

    pub fn day_zone(mut self, zone: DayZone) -> Self {
        self.day_zone = zone;
        self
    }

    pub fn build(self) -> FilterSpec {
        let primary_needle = needle(self.primary_text_query.as_deref());
        let secondary_needle = needle(self.secondary_text_query.as_deref());
        FilterSpec {
            primary_text_query: self.primary_text_query,
            secondary_text_query: self.secondary_text_query,
            start_date: self.start_date,
            end_date: self.end_date,
            day_zone: self.day_zone,
            primary_needle,
            secondary_needle,
        }
    }
}

/// Parse a strict `YYYY-MM-DD` date, rejecting short forms like `2024-1-5`
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

// Empty queries impose no constraint, so they get no needle
fn needle(query: Option<&str>) -> Option<String> {
    query.filter(|q| !q.is_empty()).map(str::to_lowercase)
}

fn non_blank(value: &str) -> Option<&str> {
    if value.trim().is_empty() { None } else { Some(value) }
}
