use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sled::transaction::{ConflictableTransactionError, ConflictableTransactionResult};

use crate::store::keys;
use crate::store::{flatten_tx_error, Store, StoreError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub user_name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub verified_email: bool,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub place: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    pub fn create_user(&self, user: &User) -> Result<(), StoreError> {
        let email_key = keys::user_email_index_key(&user.email);
        let name_key = keys::user_name_index_key(&user.user_name);

        // CAS on the index keys so two concurrent registrations with the same
        // email or name cannot both succeed.
        let claimed = self
            .users
            .compare_and_swap(email_key.as_bytes(), None::<&[u8]>, Some(user.id.as_bytes()))?;
        if claimed.is_err() {
            return Err(StoreError::conflict("user_email", &user.email));
        }

        let claimed = self
            .users
            .compare_and_swap(name_key.as_bytes(), None::<&[u8]>, Some(user.id.as_bytes()))?;
        if claimed.is_err() {
            self.release_user_index(&email_key);
            return Err(StoreError::conflict("user_name", &user.user_name));
        }

        let user_bytes = Self::serialize(user)?;
        if let Err(e) = self.users.insert(keys::user_key(&user.id).as_bytes(), user_bytes) {
            self.release_user_index(&email_key);
            self.release_user_index(&name_key);
            return Err(StoreError::Sled(e));
        }

        Ok(())
    }

    /// Undo an index claim made by a registration that did not complete.
    /// A failure here leaves the key claimed by a user that does not exist.
    fn release_user_index(&self, index_key: &str) {
        if let Err(e) = self.users.remove(index_key.as_bytes()) {
            tracing::warn!(key = index_key, error = %e, "Failed to release user index after aborted registration");
        }
    }

    pub fn get_user_by_id(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        let key = keys::user_key(user_id);
        if keys::is_user_index_key(key.as_bytes()) {
            return Ok(None);
        }
        match self.users.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let index_key = keys::user_email_index_key(email);
        let Some(user_id_raw) = self.users.get(index_key.as_bytes())? else {
            return Ok(None);
        };
        let user_id = match String::from_utf8(user_id_raw.to_vec()) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid UTF-8 in user email index");
                return Ok(None);
            }
        };
        self.get_user_by_id(&user_id)
    }

    /// Persist profile changes, moving the email and name indexes when those
    /// fields changed. Fails with `Conflict` if the new value belongs to
    /// another account.
    pub fn update_user(&self, user: &User) -> Result<(), StoreError> {
        let existing = self
            .get_user_by_id(&user.id)?
            .ok_or_else(|| StoreError::not_found("user", &user.id))?;

        let user_key = keys::user_key(&user.id);
        let user_bytes = Self::serialize(user)?;
        let index_moves = [
            (
                "user_email",
                keys::user_email_index_key(&existing.email),
                keys::user_email_index_key(&user.email),
                user.email.as_str(),
            ),
            (
                "user_name",
                keys::user_name_index_key(&existing.user_name),
                keys::user_name_index_key(&user.user_name),
                user.user_name.as_str(),
            ),
        ];

        self.users
            .transaction(|tx| -> ConflictableTransactionResult<(), StoreError> {
                for (entity, old_key, new_key, value) in &index_moves {
                    if old_key == new_key {
                        continue;
                    }
                    if let Some(owner) = tx.get(new_key.as_bytes())? {
                        if owner.as_ref() != user.id.as_bytes() {
                            return Err(ConflictableTransactionError::Abort(
                                StoreError::conflict(entity, value),
                            ));
                        }
                    }
                    tx.remove(old_key.as_bytes())?;
                    tx.insert(new_key.as_bytes(), user.id.as_bytes())?;
                }
                tx.insert(user_key.as_bytes(), user_bytes.as_slice())?;
                Ok(())
            })
            .map_err(flatten_tx_error)
    }

    pub fn count_users(&self) -> Result<usize, StoreError> {
        let mut count = 0;
        for item in self.users.iter() {
            let (key, _) = item?;
            if !keys::is_user_index_key(&key) {
                count += 1;
            }
        }
        Ok(count)
    }
}
