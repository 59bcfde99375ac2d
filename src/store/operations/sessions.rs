use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sled::transaction::ConflictableTransactionResult;

use crate::constants::SESSION_CLEANUP_BATCH;
use crate::store::keys;
use crate::store::{flatten_tx_error, Store, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token_hash: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

impl Store {
    pub fn create_session(&self, session: &Session) -> Result<(), StoreError> {
        let key = keys::session_key(&session.token_hash);
        let index_key = keys::session_user_index_key(&session.user_id, &session.token_hash);
        let session_bytes = Self::serialize(session)?;

        self.sessions
            .transaction(|tx| -> ConflictableTransactionResult<(), StoreError> {
                tx.insert(key.as_bytes(), session_bytes.as_slice())?;
                tx.insert(index_key.as_bytes(), &[] as &[u8])?;
                Ok(())
            })
            .map_err(flatten_tx_error)
    }

    /// Returns `None` for expired sessions. Removal is left to
    /// [`Store::cleanup_expired_sessions`].
    pub fn get_session(&self, token_hash: &str) -> Result<Option<Session>, StoreError> {
        let key = keys::session_key(token_hash);
        let Some(raw) = self.sessions.get(key.as_bytes())? else {
            return Ok(None);
        };

        let session = Self::deserialize::<Session>(&raw)?;
        if !session.is_live(Utc::now()) {
            return Ok(None);
        }

        Ok(Some(session))
    }

    pub fn delete_session(&self, token_hash: &str) -> Result<(), StoreError> {
        let key = keys::session_key(token_hash);
        let index_key = self
            .sessions
            .get(key.as_bytes())?
            .and_then(|raw| Self::deserialize::<Session>(&raw).ok())
            .map(|session| keys::session_user_index_key(&session.user_id, token_hash));

        self.sessions
            .transaction(|tx| -> ConflictableTransactionResult<(), StoreError> {
                if let Some(index_key) = &index_key {
                    tx.remove(index_key.as_bytes())?;
                }
                tx.remove(key.as_bytes())?;
                Ok(())
            })
            .map_err(flatten_tx_error)
    }

    fn user_session_hashes(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        let prefix = keys::session_user_index_prefix(user_id);
        let mut hashes = Vec::new();
        for item in self.sessions.scan_prefix(prefix.as_bytes()) {
            let (k, _) = item?;
            match std::str::from_utf8(&k[prefix.len()..]) {
                Ok(hash) => hashes.push(hash.to_string()),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping session index key with invalid UTF-8");
                }
            }
        }
        Ok(hashes)
    }

    pub fn delete_user_sessions(&self, user_id: &str) -> Result<u32, StoreError> {
        let hashes = self.user_session_hashes(user_id)?;
        let count = hashes.len() as u32;
        for hash in hashes {
            self.delete_session(&hash)?;
        }
        Ok(count)
    }

    pub fn count_user_sessions(&self, user_id: &str) -> Result<usize, StoreError> {
        Ok(self.user_session_hashes(user_id)?.len())
    }

    /// Drop the oldest sessions of `user_id` until at most `max_sessions` remain.
    pub fn cleanup_oldest_user_sessions(
        &self,
        user_id: &str,
        max_sessions: usize,
    ) -> Result<(), StoreError> {
        let mut sessions: Vec<(String, DateTime<Utc>)> = Vec::new();
        for hash in self.user_session_hashes(user_id)? {
            if let Some(raw) = self.sessions.get(keys::session_key(&hash).as_bytes())? {
                if let Ok(session) = Self::deserialize::<Session>(&raw) {
                    sessions.push((hash, session.created_at));
                }
            }
        }

        if sessions.len() <= max_sessions {
            return Ok(());
        }

        sessions.sort_by_key(|(_, created_at)| *created_at);
        let to_remove = sessions.len() - max_sessions;
        for (hash, _) in sessions.into_iter().take(to_remove) {
            self.delete_session(&hash)?;
        }
        Ok(())
    }

    /// Remove up to one batch of expired sessions and return how
    /// many were deleted.
    pub fn cleanup_expired_sessions(&self) -> Result<u32, StoreError> {
        let now = Utc::now();
        let mut expired = Vec::new();
        for item in self.sessions.iter() {
            let (k, v) = item?;
            if k.starts_with(b"user:") {
                continue;
            }
            let session: Session = Self::deserialize(&v)?;
            if !session.is_live(now) {
                expired.push(session.token_hash);
                if expired.len() >= SESSION_CLEANUP_BATCH {
                    break;
                }
            }
        }

        let count = expired.len() as u32;
        for token_hash in expired {
            self.delete_session(&token_hash)?;
        }
        Ok(count)
    }
}
