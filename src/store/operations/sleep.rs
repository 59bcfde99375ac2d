use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stats::{DateRange, RecordStore};
use crate::store::operations::owned::OwnedRecord;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepEntry {
    pub id: String,
    pub user_id: String,
    pub sleep_date: DateTime<Utc>,
    pub hours_slept: f64,
    pub quality: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OwnedRecord for SleepEntry {
    const ENTITY: &'static str = "sleep";

    fn tree(store: &Store) -> &sled::Tree {
        &store.sleep
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn sort_time(&self) -> DateTime<Utc> {
        self.sleep_date
    }
}

impl RecordStore<SleepEntry> for Store {
    fn fetch_in_range(&self, owner_id: &str, range: &DateRange) -> Result<Vec<SleepEntry>, StoreError> {
        self.records_between(owner_id, range.first_instant(), range.last_instant())
    }
}
