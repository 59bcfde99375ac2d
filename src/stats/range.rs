use chrono::{DateTime, Duration, Months, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::constants::DEFAULT_STATS_RANGE_MONTHS;
use crate::stats::StatsError;

/// Inclusive window of UTC calendar days. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, StatsError> {
        if start > end {
            return Err(StatsError::InvalidRange(format!(
                "start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// `[today - 1 calendar month, today]`. Month arithmetic clamps to the
    /// last valid day, so 31 March yields 29 or 28 February.
    pub fn default_ending(today: NaiveDate) -> Self {
        let start = today
            .checked_sub_months(Months::new(DEFAULT_STATS_RANGE_MONTHS))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end: today }
    }

    /// Apply the caller-side defaulting rules: both bounds absent means the
    /// default window, exactly one present is an error, and so is an
    /// inverted window.
    pub fn resolve(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self, StatsError> {
        match (start, end) {
            (None, None) => Ok(Self::default_ending(today)),
            (Some(start), Some(end)) => Self::new(start, end),
            (Some(_), None) => Err(StatsError::InvalidRange(
                "end is required when start is given".to_string(),
            )),
            (None, Some(_)) => Err(StatsError::InvalidRange(
                "start is required when end is given".to_string(),
            )),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Midnight UTC opening the first day.
    pub fn first_instant(&self) -> DateTime<Utc> {
        self.start.and_time(NaiveTime::MIN).and_utc()
    }

    /// Last millisecond of the final day.
    pub fn last_instant(&self) -> DateTime<Utc> {
        self.end
            .and_time(NaiveTime::MIN)
            .and_utc()
            .checked_add_signed(Duration::days(1) - Duration::milliseconds(1))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}
