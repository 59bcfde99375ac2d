use crate::constants::SESSION_CLEANUP_BATCH;
use crate::store::Store;

/// Sweep expired sessions batch by batch. Returns how many were removed.
pub async fn run(store: &Store) -> u64 {
    tracing::debug!("session_cleanup: start");
    let mut total = 0u64;
    loop {
        match store.cleanup_expired_sessions() {
            Ok(count) => {
                total += u64::from(count);
                if (count as usize) < SESSION_CLEANUP_BATCH {
                    break;
                }
                tokio::task::yield_now().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "session_cleanup failed");
                break;
            }
        }
    }
    tracing::info!(cleaned = total, "session_cleanup: done");
    total
}
