/// Default stats window when the caller gives neither `start` nor `end`.
pub const DEFAULT_STATS_RANGE_MONTHS: u32 = 1;

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LENGTH: usize = 5;

/// Maximum password length accepted at registration
pub const MAX_PASSWORD_LENGTH: usize = 256;

/// Upper bound for free-text fields (notes, treatments, dosages)
pub const MAX_TEXT_FIELD_LENGTH: usize = 2_000;

/// Upper bound for short labels (activity type, meal, medication name)
pub const MAX_LABEL_LENGTH: usize = 100;

/// Maximum number of items a single reminder may carry
pub const MAX_REMINDER_ITEMS: usize = 50;

/// Hours in a day; `hoursSlept` may not exceed it.
pub const HOURS_PER_DAY: f64 = 24.0;

/// Session cleanup handles at most this many expired sessions per run.
pub const SESSION_CLEANUP_BATCH: usize = 1_000;
