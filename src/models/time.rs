//! Inclusive time windows over naive local timestamps.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::services::error::{EngineError, EngineResult};

/// An inclusive `[start, end]` pair of local instants.
///
/// Invariant: `start <= end`, enforced at construction. A window that fails
/// to construct aborts the requested computation immediately; the engine
/// never silently coerces bad bounds into an empty filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> EngineResult<Self> {
        if start > end {
            return Err(EngineError::invalid_window(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        Ok(TimeWindow { start, end })
    }

    /// Expand a pure date pair to the full-day envelope
    /// `[start 00:00:00, end 23:59:59]`, the way the dashboard's two date
    /// inputs are interpreted.
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> EngineResult<Self> {
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).expect("23:59:59 is a valid time");
        Self::new(start.and_time(NaiveTime::MIN), end.and_time(end_of_day))
    }

    /// Parse ISO-8601 bounds. Accepts either full timestamps
    /// (`2021-06-01T00:00:00`) or bare dates (`2021-06-01`); bare dates get
    /// the full-day envelope of [`TimeWindow::from_dates`].
    pub fn parse(start: &str, end: &str) -> EngineResult<Self> {
        match (parse_instant(start), parse_instant(end)) {
            (Some(Bound::Instant(s)), Some(Bound::Instant(e))) => Self::new(s, e),
            (Some(Bound::Day(s)), Some(Bound::Day(e))) => Self::from_dates(s, e),
            (Some(s), Some(e)) => Self::new(s.start_instant(), e.end_instant()),
            _ => Err(EngineError::invalid_window(format!(
                "unparseable bounds '{}' / '{}'",
                start, end
            ))),
        }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Inclusive on both bounds.
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.start <= t && t <= self.end
    }

    /// Calendar dates are compared at local midnight.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.contains(date.and_time(NaiveTime::MIN))
    }
}

enum Bound {
    Instant(NaiveDateTime),
    Day(NaiveDate),
}

impl Bound {
    fn start_instant(&self) -> NaiveDateTime {
        match *self {
            Bound::Instant(t) => t,
            Bound::Day(d) => d.and_time(NaiveTime::MIN),
        }
    }

    fn end_instant(&self) -> NaiveDateTime {
        match *self {
            Bound::Instant(t) => t,
            Bound::Day(d) => {
                let end_of_day =
                    NaiveTime::from_hms_opt(23, 59, 59).expect("23:59:59 is a valid time");
                d.and_time(end_of_day)
            }
        }
    }
}

fn parse_instant(raw: &str) -> Option<Bound> {
    if let Ok(t) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(Bound::Instant(t));
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(Bound::Day(d));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::error::EngineError;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, s).unwrap()
    }

    #[test]
    fn test_new_rejects_inverted_bounds() {
        let err = TimeWindow::new(dt(2021, 6, 2, 0, 0, 0), dt(2021, 6, 1, 0, 0, 0)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidWindow { .. }));
    }

    #[test]
    fn test_new_accepts_equal_bounds() {
        let instant = dt(2021, 6, 1, 12, 0, 0);
        let window = TimeWindow::new(instant, instant).unwrap();
        assert!(window.contains(instant));
        assert!(!window.contains(dt(2021, 6, 1, 12, 0, 1)));
    }

    #[test]
    fn test_contains_is_inclusive_on_both_bounds() {
        let window =
            TimeWindow::new(dt(2021, 6, 1, 0, 0, 0), dt(2021, 6, 30, 23, 59, 59)).unwrap();
        assert!(window.contains(window.start()));
        assert!(window.contains(window.end()));
        assert!(!window.contains(dt(2021, 5, 31, 23, 59, 59)));
        assert!(!window.contains(dt(2021, 7, 1, 0, 0, 0)));
    }

    #[test]
    fn test_from_dates_covers_whole_days() {
        let window = TimeWindow::from_dates(
            NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2021, 6, 2).unwrap(),
        )
        .unwrap();
        assert_eq!(window.start(), dt(2021, 6, 1, 0, 0, 0));
        assert_eq!(window.end(), dt(2021, 6, 2, 23, 59, 59));
        assert!(window.contains(dt(2021, 6, 2, 18, 45, 0)));
    }

    #[test]
    fn test_contains_date_uses_local_midnight() {
        // Window starting mid-day excludes that date's midnight instant.
        let window =
            TimeWindow::new(dt(2021, 6, 1, 12, 0, 0), dt(2021, 6, 3, 0, 0, 0)).unwrap();
        assert!(!window.contains_date(NaiveDate::from_ymd_opt(2021, 6, 1).unwrap()));
        assert!(window.contains_date(NaiveDate::from_ymd_opt(2021, 6, 2).unwrap()));
        assert!(window.contains_date(NaiveDate::from_ymd_opt(2021, 6, 3).unwrap()));
    }

    #[test]
    fn test_parse_full_timestamps() {
        let window = TimeWindow::parse("2021-06-01T06:00:00", "2021-06-01T18:00:00").unwrap();
        assert_eq!(window.start(), dt(2021, 6, 1, 6, 0, 0));
        assert_eq!(window.end(), dt(2021, 6, 1, 18, 0, 0));
    }

    #[test]
    fn test_parse_bare_dates_expand_to_day_envelope() {
        let window = TimeWindow::parse("2021-06-01", "2021-06-02").unwrap();
        assert_eq!(window.start(), dt(2021, 6, 1, 0, 0, 0));
        assert_eq!(window.end(), dt(2021, 6, 2, 23, 59, 59));
    }

    #[test]
    fn test_parse_mixed_bounds() {
        let window = TimeWindow::parse("2021-06-01T12:00:00", "2021-06-02").unwrap();
        assert_eq!(window.start(), dt(2021, 6, 1, 12, 0, 0));
        assert_eq!(window.end(), dt(2021, 6, 2, 23, 59, 59));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = TimeWindow::parse("not-a-date", "2021-06-02").unwrap_err();
        assert!(matches!(err, EngineError::InvalidWindow { .. }));
    }

    #[test]
    fn test_parse_rejects_inverted_bounds() {
        let err = TimeWindow::parse("2021-07-01", "2021-06-01").unwrap_err();
        assert!(matches!(err, EngineError::InvalidWindow { .. }));
    }
}
