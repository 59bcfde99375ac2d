use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::operations::owned::OwnedRecord;
use crate::store::Store;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: String,
    pub user_id: String,
    pub medication_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OwnedRecord for Medication {
    const ENTITY: &'static str = "medication";

    fn tree(store: &Store) -> &sled::Tree {
        &store.medications
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn sort_time(&self) -> DateTime<Utc> {
        self.created_at
    }
}
