//! Range-and-group statistics over a user's health log.
//!
//! Every entry point takes an already validated [`DateRange`], pulls one
//! snapshot of the owner's records through [`RecordStore`] and folds it into
//! buckets keyed by calendar day (sorted ascending) or by category
//! (first-seen order). Nothing is cached; each call recomputes from the store.

pub mod activity;
pub mod food;
mod grouping;
pub mod health;
pub mod range;
pub mod sleep;

use thiserror::Error;

use crate::store::StoreError;

pub use activity::{activity_stats_by_day, activity_stats_by_type, ActivityDayBucket, ActivityTypeBucket};
pub use food::{food_stats, FoodDayBucket};
pub use health::{health_stats, HealthDayBucket, HealthStatType};
pub use range::DateRange;
pub use sleep::{sleep_stats, SleepDayBucket};

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("invalid range: {0}")]
    InvalidRange(String),
    #[error("invalid stats type: {0}")]
    InvalidFilter(String),
    #[error("data access failure: {0}")]
    DataAccess(#[from] StoreError),
}

/// Read side the aggregator depends on: every record of one owner whose time
/// field intersects `range`.
pub trait RecordStore<R> {
    fn fetch_in_range(&self, owner_id: &str, range: &DateRange) -> Result<Vec<R>, StoreError>;
}
