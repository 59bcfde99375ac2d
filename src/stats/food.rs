use chrono::NaiveDate;
use serde::Serialize;

use crate::stats::grouping::Buckets;
use crate::stats::{DateRange, RecordStore, StatsError};
use crate::store::operations::foods::FoodEntry;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodDayBucket {
    pub date: NaiveDate,
    pub calories: f64,
}

/// Calorie intake per meal day, ascending by date.
pub fn food_stats<S>(store: &S, owner_id: &str, range: &DateRange) -> Result<Vec<FoodDayBucket>, StatsError>
where
    S: RecordStore<FoodEntry> + ?Sized,
{
    let mut buckets = Buckets::new();
    for entry in store.fetch_in_range(owner_id, range)? {
        let date = entry.meal_date.date_naive();
        if entry.user_id != owner_id || !range.contains(date) {
            continue;
        }
        buckets
            .slot(date, |date| FoodDayBucket {
                date: *date,
                calories: 0.0,
            })
            .calories += entry.calorie_intake;
    }
    Ok(buckets.into_sorted_by_key(|bucket| bucket.date))
}
