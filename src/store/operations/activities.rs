use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::stats::{DateRange, RecordStore};
use crate::store::operations::owned::OwnedRecord;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub user_id: String,
    pub activity_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories_burned: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Activity {
    /// Whole minutes from start to end, truncated toward zero.
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    pub fn start_day(&self) -> NaiveDate {
        self.start_time.date_naive()
    }

    /// True when the activity touches any day of `range`.
    pub fn intersects(&self, range: &DateRange) -> bool {
        self.end_time.date_naive() >= range.start() && self.start_day() <= range.end()
    }
}

impl OwnedRecord for Activity {
    const ENTITY: &'static str = "activity";

    fn tree(store: &Store) -> &sled::Tree {
        &store.activities
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn sort_time(&self) -> DateTime<Utc> {
        self.start_time
    }
}

impl RecordStore<Activity> for Store {
    fn fetch_in_range(&self, owner_id: &str, range: &DateRange) -> Result<Vec<Activity>, StoreError> {
        // Keys are ordered by start time only, so an activity that started
        // before the window but ends inside it is found by the end-time filter.
        let candidates: Vec<Activity> =
            self.records_between(owner_id, DateTime::<Utc>::MIN_UTC, range.last_instant())?;
        Ok(candidates
            .into_iter()
            .filter(|activity| activity.intersects(range))
            .collect())
    }
}

impl Store {
    /// Distinct activity types the user has logged, in first-logged order.
    pub fn activity_types_for_user(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        let mut types: Vec<String> = Vec::new();
        for activity in self.list_records::<Activity>(user_id)? {
            if !types.contains(&activity.activity_type) {
                types.push(activity.activity_type);
            }
        }
        Ok(types)
    }

    pub fn activities_on_day(&self, user_id: &str, day: NaiveDate) -> Result<Vec<Activity>, StoreError> {
        self.fetch_in_range(user_id, &DateRange::single_day(day))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use tempfile::tempdir;

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample(id: &str, user_id: &str, kind: &str, start: DateTime<Utc>, minutes: i64) -> Activity {
        Activity {
            id: id.to_string(),
            user_id: user_id.to_string(),
            activity_type: kind.to_string(),
            start_time: start,
            end_time: start + Duration::minutes(minutes),
            calories_burned: None,
            note: None,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn duration_truncates_partial_minutes() {
        let mut activity = sample("a", "u", "run", at(2024, 1, 1, 10, 0), 0);
        activity.end_time = activity.start_time + Duration::seconds(89);
        assert_eq!(activity.duration_minutes(), 1);

        activity.end_time = activity.start_time - Duration::seconds(89);
        assert_eq!(activity.duration_minutes(), -1);
    }

    #[test]
    fn insert_get_update_delete() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();

        let mut activity = sample("a1", "u1", "run", at(2024, 1, 1, 10, 0), 30);
        store.insert_record(&activity).unwrap();
        assert_eq!(store.get_record::<Activity>("u1", "a1").unwrap(), Some(activity.clone()));
        assert!(store.get_record::<Activity>("u2", "a1").unwrap().is_none());

        activity.start_time = at(2024, 2, 1, 8, 0);
        activity.end_time = at(2024, 2, 1, 9, 0);
        store.update_record(&activity).unwrap();
        let listed: Vec<Activity> = store.list_records("u1").unwrap();
        assert_eq!(listed, vec![activity.clone()]);

        assert!(!store.delete_record::<Activity>("u2", "a1").unwrap());
        assert!(store.delete_record::<Activity>("u1", "a1").unwrap());
        assert!(store.get_record::<Activity>("u1", "a1").unwrap().is_none());
    }

    #[test]
    fn duplicate_id_conflicts() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();

        let activity = sample("a1", "u1", "run", at(2024, 1, 1, 10, 0), 30);
        store.insert_record(&activity).unwrap();
        let err = store.insert_record(&activity).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[test]
    fn update_of_foreign_record_is_not_found() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();

        let activity = sample("a1", "u1", "run", at(2024, 1, 1, 10, 0), 30);
        store.insert_record(&activity).unwrap();

        let mut hijack = activity.clone();
        hijack.user_id = "u2".to_string();
        let err = store.update_record(&hijack).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn list_is_ascending_by_start_time() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();

        store.insert_record(&sample("late", "u1", "run", at(2024, 1, 3, 10, 0), 10)).unwrap();
        store.insert_record(&sample("early", "u1", "run", at(2024, 1, 1, 10, 0), 10)).unwrap();
        store.insert_record(&sample("other", "u2", "run", at(2024, 1, 2, 10, 0), 10)).unwrap();

        let ids: Vec<String> = store
            .list_records::<Activity>("u1")
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["early", "late"]);
    }

    #[test]
    fn ranged_fetch_includes_activities_crossing_into_the_window() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();

        // Starts on the 31st, ends on the 1st.
        store.insert_record(&sample("overnight", "u1", "hike", at(2023, 12, 31, 23, 0), 120)).unwrap();
        store.insert_record(&sample("inside", "u1", "run", at(2024, 1, 1, 10, 0), 30)).unwrap();
        store.insert_record(&sample("before", "u1", "run", at(2023, 12, 30, 10, 0), 30)).unwrap();
        store.insert_record(&sample("after", "u1", "run", at(2024, 1, 2, 0, 0), 30)).unwrap();

        let range = DateRange::single_day(day(2024, 1, 1));
        let ids: Vec<String> = store
            .fetch_in_range("u1", &range)
            .unwrap()
            .into_iter()
            .map(|a: Activity| a.id)
            .collect();
        assert_eq!(ids, vec!["overnight", "inside"]);
    }

    #[test]
    fn activity_types_are_distinct_in_first_seen_order() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();

        store.insert_record(&sample("1", "u1", "swim", at(2024, 1, 1, 8, 0), 10)).unwrap();
        store.insert_record(&sample("2", "u1", "run", at(2024, 1, 2, 8, 0), 10)).unwrap();
        store.insert_record(&sample("3", "u1", "swim", at(2024, 1, 3, 8, 0), 10)).unwrap();
        store.insert_record(&sample("4", "u2", "yoga", at(2024, 1, 3, 8, 0), 10)).unwrap();

        assert_eq!(store.activity_types_for_user("u1").unwrap(), vec!["swim", "run"]);
    }

    #[test]
    fn activities_on_day_scopes_to_that_day() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();

        store.insert_record(&sample("1", "u1", "swim", at(2024, 1, 1, 8, 0), 10)).unwrap();
        store.insert_record(&sample("2", "u1", "run", at(2024, 1, 2, 8, 0), 10)).unwrap();

        let today = store.activities_on_day("u1", day(2024, 1, 2)).unwrap();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].id, "2");
    }
}
