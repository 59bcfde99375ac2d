use chrono::NaiveDate;
use serde::Serialize;

use crate::stats::grouping::Buckets;
use crate::stats::{DateRange, RecordStore, StatsError};
use crate::store::operations::activities::Activity;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDayBucket {
    pub date: NaiveDate,
    /// Minutes.
    pub duration: i64,
    pub calories_burned: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTypeBucket {
    pub activity_type: String,
    /// Minutes.
    pub duration: i64,
}

fn owned_activities<S>(store: &S, owner_id: &str, range: &DateRange) -> Result<Vec<Activity>, StatsError>
where
    S: RecordStore<Activity> + ?Sized,
{
    let mut activities = store.fetch_in_range(owner_id, range)?;
    activities.retain(|activity| activity.user_id == owner_id && activity.intersects(range));
    Ok(activities)
}

/// Minutes and burned calories per start day, ascending by date.
pub fn activity_stats_by_day<S>(
    store: &S,
    owner_id: &str,
    range: &DateRange,
) -> Result<Vec<ActivityDayBucket>, StatsError>
where
    S: RecordStore<Activity> + ?Sized,
{
    let mut buckets = Buckets::new();
    for activity in owned_activities(store, owner_id, range)? {
        let bucket = buckets.slot(activity.start_day(), |date| ActivityDayBucket {
            date: *date,
            duration: 0,
            calories_burned: 0.0,
        });
        bucket.duration += activity.duration_minutes();
        bucket.calories_burned += activity.calories_burned.unwrap_or(0.0);
    }
    Ok(buckets.into_sorted_by_key(|bucket| bucket.date))
}

/// Minutes per activity type, in the order types were first encountered.
pub fn activity_stats_by_type<S>(
    store: &S,
    owner_id: &str,
    range: &DateRange,
) -> Result<Vec<ActivityTypeBucket>, StatsError>
where
    S: RecordStore<Activity> + ?Sized,
{
    let mut buckets = Buckets::new();
    for activity in owned_activities(store, owner_id, range)? {
        let minutes = activity.duration_minutes();
        let bucket = buckets.slot(activity.activity_type, |kind| ActivityTypeBucket {
            activity_type: kind.clone(),
            duration: 0,
        });
        bucket.duration += minutes;
    }
    Ok(buckets.into_first_seen())
}
