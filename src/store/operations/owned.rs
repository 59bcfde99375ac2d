//! Storage shared by every per-user record kind.
//!
//! Each kind lives in its own tree under two key families:
//! `rec:{user_id}:{sortable_ts}:{id}` holds the JSON value, ordered by the
//! record's time field, and `id:{id}` points back at that primary key so a
//! record can be addressed by id alone.

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::transaction::{ConflictableTransactionError, ConflictableTransactionResult};

use crate::store::{flatten_tx_error, keys, Store, StoreError};

pub trait OwnedRecord: Serialize + DeserializeOwned {
    /// Entity name used in error messages and logs.
    const ENTITY: &'static str;

    fn tree(store: &Store) -> &sled::Tree;
    fn id(&self) -> &str;
    fn user_id(&self) -> &str;
    /// The instant that orders this record within its owner's keyspace.
    fn sort_time(&self) -> DateTime<Utc>;
}

fn primary_key_of<R: OwnedRecord>(record: &R) -> String {
    keys::owned_record_key(
        record.user_id(),
        record.sort_time().timestamp_millis(),
        record.id(),
    )
}

impl Store {
    pub fn insert_record<R: OwnedRecord>(&self, record: &R) -> Result<(), StoreError> {
        let primary = primary_key_of(record);
        let id_key = keys::owned_record_id_key(record.id());
        let bytes = Self::serialize(record)?;

        R::tree(self)
            .transaction(|tx| -> ConflictableTransactionResult<(), StoreError> {
                if tx.get(id_key.as_bytes())?.is_some() {
                    return Err(ConflictableTransactionError::Abort(StoreError::conflict(
                        R::ENTITY,
                        record.id(),
                    )));
                }
                tx.insert(primary.as_bytes(), bytes.as_slice())?;
                tx.insert(id_key.as_bytes(), primary.as_bytes())?;
                Ok(())
            })
            .map_err(flatten_tx_error)
    }

    /// Fetch one record by id. Records owned by someone else are reported as absent.
    pub fn get_record<R: OwnedRecord>(
        &self,
        user_id: &str,
        record_id: &str,
    ) -> Result<Option<R>, StoreError> {
        let tree = R::tree(self);
        let Some(primary) = tree.get(keys::owned_record_id_key(record_id).as_bytes())? else {
            return Ok(None);
        };
        if !primary.starts_with(keys::owned_record_prefix(user_id).as_bytes()) {
            return Ok(None);
        }
        match tree.get(&primary)? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => {
                tracing::warn!(
                    entity = R::ENTITY,
                    record_id,
                    "Dangling id index entry"
                );
                Ok(None)
            }
        }
    }

    /// All records of `user_id`, ascending by time field.
    pub fn list_records<R: OwnedRecord>(&self, user_id: &str) -> Result<Vec<R>, StoreError> {
        let prefix = keys::owned_record_prefix(user_id);
        let mut records = Vec::new();
        for item in R::tree(self).scan_prefix(prefix.as_bytes()) {
            let (_, value) = item?;
            records.push(Self::deserialize::<R>(&value)?);
        }
        Ok(records)
    }

    /// Records of `user_id` whose time field lies in `[from, to]`, ascending.
    pub fn records_between<R: OwnedRecord>(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<R>, StoreError> {
        if from > to {
            return Ok(Vec::new());
        }
        let lower = keys::owned_record_time_bound(user_id, from.timestamp_millis());
        let upper = match to.checked_add_signed(Duration::milliseconds(1)) {
            Some(after) => keys::owned_record_time_bound(user_id, after.timestamp_millis()),
            None => keys::owned_record_time_bound(user_id, i64::MAX),
        };

        let mut records = Vec::new();
        for item in R::tree(self).range(lower.as_bytes()..upper.as_bytes()) {
            let (_, value) = item?;
            records.push(Self::deserialize::<R>(&value)?);
        }
        Ok(records)
    }

    /// Replace a stored record, moving its primary key when the time field changed.
    pub fn update_record<R: OwnedRecord>(&self, record: &R) -> Result<(), StoreError> {
        let new_primary = primary_key_of(record);
        let id_key = keys::owned_record_id_key(record.id());
        let owner_prefix = keys::owned_record_prefix(record.user_id());
        let bytes = Self::serialize(record)?;

        R::tree(self)
            .transaction(|tx| -> ConflictableTransactionResult<(), StoreError> {
                let Some(old_primary) = tx.get(id_key.as_bytes())? else {
                    return Err(ConflictableTransactionError::Abort(StoreError::not_found(
                        R::ENTITY,
                        record.id(),
                    )));
                };
                if !old_primary.starts_with(owner_prefix.as_bytes()) {
                    return Err(ConflictableTransactionError::Abort(StoreError::not_found(
                        R::ENTITY,
                        record.id(),
                    )));
                }
                if old_primary.as_ref() != new_primary.as_bytes() {
                    tx.remove(old_primary)?;
                }
                tx.insert(new_primary.as_bytes(), bytes.as_slice())?;
                tx.insert(id_key.as_bytes(), new_primary.as_bytes())?;
                Ok(())
            })
            .map_err(flatten_tx_error)
    }

    /// Delete a record owned by `user_id`. Returns false when there was nothing to delete.
    pub fn delete_record<R: OwnedRecord>(
        &self,
        user_id: &str,
        record_id: &str,
    ) -> Result<bool, StoreError> {
        let id_key = keys::owned_record_id_key(record_id);
        let owner_prefix = keys::owned_record_prefix(user_id);

        R::tree(self)
            .transaction(|tx| -> ConflictableTransactionResult<bool, StoreError> {
                let Some(primary) = tx.get(id_key.as_bytes())? else {
                    return Ok(false);
                };
                if !primary.starts_with(owner_prefix.as_bytes()) {
                    return Ok(false);
                }
                tx.remove(primary)?;
                tx.remove(id_key.as_bytes())?;
                Ok(true)
            })
            .map_err(flatten_tx_error)
    }
}
