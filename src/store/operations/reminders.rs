use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::operations::owned::OwnedRecord;
use crate::store::Store;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub user_id: String,
    pub send_notification_on: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OwnedRecord for Reminder {
    const ENTITY: &'static str = "reminder";

    fn tree(store: &Store) -> &sled::Tree {
        &store.reminders
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn sort_time(&self) -> DateTime<Utc> {
        self.send_notification_on
    }
}
