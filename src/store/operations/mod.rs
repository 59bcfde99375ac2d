pub mod activities;
pub mod foods;
pub mod health_measurements;
pub mod medical_history;
pub mod medications;
pub mod owned;
pub mod reminders;
pub mod sessions;
pub mod sleep;
pub mod users;
