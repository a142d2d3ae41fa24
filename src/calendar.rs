//! Calendar helpers
//!
//! Local-day windows and timestamp formatting for the record store.
//! Everything is generic over the time zone so the local-calendar logic
//! can be exercised with fixed offsets.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

/// Storage format for timestamps: lexical order equals time order
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Inclusive UTC range covering one local calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub date: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    pub fn start_str(&self) -> String {
        format_timestamp(self.start)
    }

    pub fn end_str(&self) -> String {
        format_timestamp(self.end)
    }
}

/// Window `[00:00:00.000, 23:59:59.999]` of `date` in time zone `tz`
///
/// A midnight that doesn't exist locally (DST gap) resolves to the
/// earliest valid instant after it.
pub fn day_window<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DayWindow {
    let start = local_instant(date, NaiveTime::MIN, tz);
    let next_start = match date.succ_opt() {
        Some(next) => local_instant(next, NaiveTime::MIN, tz),
        None => start + Duration::days(1),
    };
    DayWindow {
        date,
        start,
        end: next_start - Duration::milliseconds(1),
    }
}

/// Today's date in `tz`
pub fn today_in<Tz: TimeZone>(tz: &Tz) -> NaiveDate {
    Utc::now().with_timezone(tz).date_naive()
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse an ISO date ("2025-01-09")
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date: '{}'. Expected YYYY-MM-DD", s))
}

/// Parse a wall-clock time ("08:30" or "08:30:15")
pub fn parse_time(s: &str) -> Result<NaiveTime, String> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| format!("Invalid time: '{}'. Expected HH:MM", s))
}

/// Resolve an optional date and wall-clock time in `tz` to a UTC instant
///
/// Missing date means today; missing time means the current time of day
/// (on the chosen date).
pub fn resolve_timestamp<Tz: TimeZone>(
    date: Option<&str>,
    time: Option<&str>,
    tz: &Tz,
) -> Result<DateTime<Utc>, String> {
    let now_local = Utc::now().with_timezone(tz);
    let date = match date {
        Some(d) => parse_date(d)?,
        None => now_local.date_naive(),
    };
    let time = match time {
        Some(t) => parse_time(t)?,
        None => now_local.time(),
    };
    Ok(local_instant(date, time, tz))
}

/// Resolve an optional date string to a calendar date in `tz`
pub fn resolve_date<Tz: TimeZone>(date: Option<&str>, tz: &Tz) -> Result<NaiveDate, String> {
    match date {
        Some(d) => parse_date(d),
        None => Ok(today_in(tz)),
    }
}

fn local_instant<Tz: TimeZone>(date: NaiveDate, time: NaiveTime, tz: &Tz) -> DateTime<Utc> {
    let naive = date.and_time(time);
    if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
        return dt.with_timezone(&Utc);
    }
    // Skipped by a DST transition: walk forward until the wall clock exists
    let mut probe = naive;
    for _ in 0..(24 * 4) {
        probe += Duration::minutes(15);
        if let Some(dt) = tz.from_local_datetime(&probe).earliest() {
            return dt.with_timezone(&Utc);
        }
    }
    Utc.from_utc_datetime(&naive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_day_window_utc() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        let window = day_window(date, &Utc);
        assert_eq!(window.start_str(), "2025-01-09T00:00:00.000Z");
        assert_eq!(window.end_str(), "2025-01-09T23:59:59.999Z");
    }

    #[test]
    fn test_day_window_with_offset() {
        // UTC+3: local midnight is 21:00 UTC the previous day
        let tz = FixedOffset::east_opt(3 * 3600).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        let window = day_window(date, &tz);
        assert_eq!(window.start_str(), "2025-01-08T21:00:00.000Z");
        assert_eq!(window.end_str(), "2025-01-09T20:59:59.999Z");
    }

    #[test]
    fn test_adjacent_windows_do_not_overlap() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        let window = day_window(date, &Utc);
        let next = day_window(date.succ_opt().unwrap(), &Utc);
        assert_eq!(window.end + Duration::milliseconds(1), next.start);
        assert_eq!(window.date, date);
    }

    #[test]
    fn test_timestamp_format_orders_lexically() {
        let a = Utc.with_ymd_and_hms(2025, 1, 9, 9, 5, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2025, 1, 9, 10, 0, 0).unwrap();
        assert!(format_timestamp(a) < format_timestamp(b));
        assert_eq!(format_timestamp(a), "2025-01-09T09:05:00.000Z");
    }

    #[test]
    fn test_resolve_timestamp_explicit() {
        let tz = FixedOffset::east_opt(3 * 3600).unwrap();
        let at = resolve_timestamp(Some("2025-01-09"), Some("08:30"), &tz).unwrap();
        assert_eq!(format_timestamp(at), "2025-01-09T05:30:00.000Z");
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_date("09/01/2025").is_err());
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("7pm").is_err());
        assert!(parse_time("07:15:30").is_ok());
    }
}
