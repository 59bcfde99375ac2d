pub const META: &str = "meta";
pub const USERS: &str = "users";
pub const SESSIONS: &str = "sessions";

// Owned record trees
pub const ACTIVITIES: &str = "activities";
pub const FOODS: &str = "foods";
pub const SLEEP: &str = "sleep";
pub const HEALTH_MEASUREMENTS: &str = "health_measurements";
pub const MEDICATIONS: &str = "medications";
pub const MEDICAL_HISTORY: &str = "medical_history";
pub const REMINDERS: &str = "reminders";
