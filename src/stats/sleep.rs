use chrono::NaiveDate;
use serde::Serialize;

use crate::stats::grouping::Buckets;
use crate::stats::{DateRange, RecordStore, StatsError};
use crate::store::operations::sleep::SleepEntry;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepDayBucket {
    pub date: NaiveDate,
    pub hours: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Hours slept per day, ascending by date.
///
/// Quality and note are overwritten by each later entry of the same day
/// rather than combined. Callers rely on that, so it stays.
pub fn sleep_stats<S>(store: &S, owner_id: &str, range: &DateRange) -> Result<Vec<SleepDayBucket>, StatsError>
where
    S: RecordStore<SleepEntry> + ?Sized,
{
    let mut buckets = Buckets::new();
    for entry in store.fetch_in_range(owner_id, range)? {
        let date = entry.sleep_date.date_naive();
        if entry.user_id != owner_id || !range.contains(date) {
            continue;
        }
        let bucket = buckets.slot(date, |date| SleepDayBucket {
            date: *date,
            hours: 0.0,
            quality: None,
            note: None,
        });
        bucket.hours += entry.hours_slept;
        bucket.quality = Some(entry.quality);
        bucket.note = entry.note;
    }
    Ok(buckets.into_sorted_by_key(|bucket| bucket.date))
}
