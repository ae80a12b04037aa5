use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use super::spec::{DayZone, FilterSpec};
use crate::models::CommitRecord;

/// Decide whether a record satisfies every active criterion of `spec`
///
/// Filter logic:
/// - Author / topic: case-insensitive substring match, empty or absent query matches all
/// - Start date: author time not earlier than the start of that day in the spec's day zone
/// - End date: author time not later than the start of that day in the spec's day zone
/// - All active criteria are AND'd; the empty spec matches every record
pub fn matches(record: &CommitRecord, spec: &FilterSpec) -> bool {
    match_text(&record.primary_text, spec.primary_needle())
        && match_text(&record.secondary_text, spec.secondary_needle())
        && match_start(record, spec.start_date(), spec.day_zone())
        && match_end(record, spec.end_date(), spec.day_zone())
}

/// Keep only records matching `spec`, preserving order
pub fn filter_records<I>(records: I, spec: &FilterSpec) -> Vec<CommitRecord>
where
    I: IntoIterator<Item = CommitRecord>,
{
    records.into_iter().filter(|record| matches(record, spec)).collect()
}

/// First instant of `date` in `zone`.
///
/// When local midnight is repeated the earlier instant wins; when it falls in
/// a gap the day starts at the first local time that exists.
pub fn start_of_day(date: NaiveDate, zone: DayZone) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    match zone {
        DayZone::Local => first_instant_from(&Local, midnight),
        DayZone::Fixed(offset) => first_instant_from(&offset, midnight),
    }
}

fn first_instant_from<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> DateTime<Utc> {
    (0..=48)
        .map(|step| local + Duration::minutes(30 * step))
        .find_map(|candidate| tz.from_local_datetime(&candidate).earliest())
        .map(|instant| instant.with_timezone(&Utc))
        .unwrap_or_else(|| local.and_utc())
}

fn match_text(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => haystack.to_lowercase().contains(needle),
        None => true,
    }
}

fn match_start(record: &CommitRecord, start: Option<NaiveDate>, zone: DayZone) -> bool {
    start.is_none_or(|date| record.author_time >= start_of_day(date, zone))
}

// Compared against the start of the end day, so anything after midnight
// on that day is excluded.
fn match_end(record: &CommitRecord, end: Option<NaiveDate>, zone: DayZone) -> bool {
    end.is_none_or(|date| record.author_time <= start_of_day(date, zone))
}
