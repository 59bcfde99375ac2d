//! Input checks shared by the auth, profile and record routes.
//!
//! Each check returns a caller-facing message on failure; routes wrap it in a
//! 400 `VALIDATION_ERROR`.

use chrono::{DateTime, Utc};

use crate::constants::{
    HOURS_PER_DAY, MAX_LABEL_LENGTH, MAX_PASSWORD_LENGTH, MAX_REMINDER_ITEMS,
    MAX_TEXT_FIELD_LENGTH, MIN_PASSWORD_LENGTH,
};

pub fn validate_password(password: &str) -> Result<(), &'static str> {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err("Password must be at least 5 characters");
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err("Password must be at most 256 characters");
    }
    Ok(())
}

/// `local@domain.tld` with a conservative character set.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > 254 {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.len() > 64 {
        return false;
    }
    if !local
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'_' || b == b'+' || b == b'-')
    {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    if domain.is_empty() || !domain.contains('.') {
        return false;
    }
    if !domain
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'.')
    {
        return false;
    }
    domain
        .split('.')
        .all(|part| !part.is_empty() && !part.starts_with('-') && !part.ends_with('-'))
}

/// 2 to 50 characters of letters, digits, `_`, `-` or space.
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    let char_count = username.chars().count();
    if !(2..=50).contains(&char_count) {
        return Err("userName must be between 2 and 50 characters");
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == ' ')
    {
        return Err("userName may only contain letters, digits, '_', '-' and spaces");
    }
    Ok(())
}

pub fn validate_label(field: &str, value: &str) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    if trimmed.chars().count() > MAX_LABEL_LENGTH {
        return Err(format!("{field} must be at most {MAX_LABEL_LENGTH} characters"));
    }
    Ok(())
}

pub fn validate_optional_text(field: &str, value: Option<&str>) -> Result<(), String> {
    match value {
        Some(text) if text.chars().count() > MAX_TEXT_FIELD_LENGTH => Err(format!(
            "{field} must be at most {MAX_TEXT_FIELD_LENGTH} characters"
        )),
        _ => Ok(()),
    }
}

/// Finite and not negative.
pub fn validate_measure(field: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{field} must be a non-negative number"));
    }
    Ok(())
}

pub fn validate_hours_slept(hours: f64) -> Result<(), String> {
    validate_measure("hoursSlept", hours)?;
    if hours > HOURS_PER_DAY {
        return Err("hoursSlept must not exceed 24".to_string());
    }
    Ok(())
}

pub fn validate_time_span(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), String> {
    if start > end {
        return Err("startTime must not be after endTime".to_string());
    }
    Ok(())
}

pub fn validate_reminder_items(items: &[String]) -> Result<(), String> {
    if items.is_empty() {
        return Err("items must contain at least one entry".to_string());
    }
    if items.len() > MAX_REMINDER_ITEMS {
        return Err(format!("items must contain at most {MAX_REMINDER_ITEMS} entries"));
    }
    for item in items {
        validate_label("items[]", item)?;
    }
    Ok(())
}
