use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::operations::owned::OwnedRecord;
use crate::store::Store;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalHistoryEntry {
    pub id: String,
    pub user_id: String,
    pub condition_name: String,
    pub treatment: String,
    pub diagnosis_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OwnedRecord for MedicalHistoryEntry {
    const ENTITY: &'static str = "medical_history";

    fn tree(store: &Store) -> &sled::Tree {
        &store.medical_history
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn sort_time(&self) -> DateTime<Utc> {
        self.diagnosis_date
    }
}
