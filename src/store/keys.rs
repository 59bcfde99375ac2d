pub fn user_key(user_id: &str) -> String {
    user_id.to_string()
}

pub fn user_email_index_key(email: &str) -> String {
    format!("email:{}", email.to_lowercase())
}

/// Usernames are unique regardless of case, like emails.
pub fn user_name_index_key(user_name: &str) -> String {
    format!("username:{}", user_name.to_lowercase())
}

pub fn is_user_index_key(key: &[u8]) -> bool {
    key.starts_with(b"email:") || key.starts_with(b"username:")
}

pub fn session_key(token_hash: &str) -> String {
    token_hash.to_string()
}

pub fn session_user_index_key(user_id: &str, token_hash: &str) -> String {
    format!("user:{}:{}", user_id, token_hash)
}

pub fn session_user_index_prefix(user_id: &str) -> String {
    format!("user:{}:", user_id)
}

/// Map a signed millisecond timestamp onto `u64` so that zero-padded decimal
/// keys sort in chronological order, pre-1970 instants included.
pub fn sortable_millis(timestamp_ms: i64) -> u64 {
    (timestamp_ms as u64) ^ (1 << 63)
}

pub fn owned_record_key(user_id: &str, timestamp_ms: i64, record_id: &str) -> String {
    format!(
        "rec:{}:{:020}:{}",
        user_id,
        sortable_millis(timestamp_ms),
        record_id
    )
}

pub fn owned_record_prefix(user_id: &str) -> String {
    format!("rec:{}:", user_id)
}

/// Smallest key for `user_id` whose timestamp is `>= timestamp_ms`.
pub fn owned_record_time_bound(user_id: &str, timestamp_ms: i64) -> String {
    format!("rec:{}:{:020}:", user_id, sortable_millis(timestamp_ms))
}

pub fn owned_record_id_key(record_id: &str) -> String {
    format!("id:{}", record_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owned_record_keys_order_by_time_asc() {
        let older = owned_record_key("u1", 1_000, "r-b");
        let newer = owned_record_key("u1", 2_000, "r-a");
        assert!(older < newer);
    }

    #[test]
    fn pre_epoch_timestamps_sort_before_epoch() {
        let before = owned_record_key("u1", -86_400_000, "r1");
        let epoch = owned_record_key("u1", 0, "r2");
        assert!(before < epoch);
    }

    #[test]
    fn time_bound_brackets_records() {
        let record = owned_record_key("u1", 5_000, "r1");
        assert!(owned_record_time_bound("u1", 5_000) < record);
        assert!(owned_record_time_bound("u1", 5_001) > record);
    }

    #[test]
    fn user_indexes_are_case_insensitive() {
        assert_eq!(user_email_index_key("A@Ex.com"), "email:a@ex.com");
        assert_eq!(user_name_index_key("Bob_Smith"), "username:bob_smith");
    }

    #[test]
    fn index_keys_are_recognised() {
        assert!(is_user_index_key(b"email:a@b.c"));
        assert!(is_user_index_key(b"username:bob"));
        assert!(!is_user_index_key(b"6f1c-uuid"));
    }
}
