use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stats::{DateRange, RecordStore};
use crate::store::operations::owned::OwnedRecord;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMeasurement {
    pub id: String,
    pub user_id: String,
    pub measurement_date: DateTime<Utc>,
    pub weight: f64,
    pub height: f64,
    pub bmi: f64,
    pub heart_rate: f64,
    pub blood_pressure_systolic: f64,
    pub blood_pressure_diastolic: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OwnedRecord for HealthMeasurement {
    const ENTITY: &'static str = "health_measurement";

    fn tree(store: &Store) -> &sled::Tree {
        &store.health_measurements
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn sort_time(&self) -> DateTime<Utc> {
        self.measurement_date
    }
}

impl RecordStore<HealthMeasurement> for Store {
    fn fetch_in_range(
        &self,
        owner_id: &str,
        range: &DateRange,
    ) -> Result<Vec<HealthMeasurement>, StoreError> {
        self.records_between(owner_id, range.first_instant(), range.last_instant())
    }
}
