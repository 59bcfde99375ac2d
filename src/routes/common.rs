//! Pieces shared by the per-resource record routes.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::response::AppError;
use crate::stats::{DateRange, StatsError};
use crate::store::operations::owned::OwnedRecord;
use crate::store::Store;

/// `?start=YYYY-MM-DD&end=YYYY-MM-DD[&type=...]`. Empty values count as absent.
/// `startDate`/`endDate` are accepted as aliases.
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    #[serde(default, alias = "startDate")]
    pub start: Option<String>,
    #[serde(default, alias = "endDate")]
    pub end: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl StatsQuery {
    pub fn range(&self) -> Result<DateRange, StatsError> {
        self.range_relative_to(Utc::now().date_naive())
    }

    pub fn range_relative_to(&self, today: NaiveDate) -> Result<DateRange, StatsError> {
        let start = parse_day("start", self.start.as_deref())?;
        let end = parse_day("end", self.end.as_deref())?;
        DateRange::resolve(start, end, today)
    }

    /// Like [`StatsQuery::range_relative_to`], except that no bounds at all
    /// means "unbounded" instead of the default window.
    pub fn optional_range_relative_to(&self, today: NaiveDate) -> Result<Option<DateRange>, StatsError> {
        let start = parse_day("start", self.start.as_deref())?;
        let end = parse_day("end", self.end.as_deref())?;
        if start.is_none() && end.is_none() {
            return Ok(None);
        }
        DateRange::resolve(start, end, today).map(Some)
    }

    pub fn optional_range(&self) -> Result<Option<DateRange>, StatsError> {
        self.optional_range_relative_to(Utc::now().date_naive())
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

fn parse_day(name: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, StatsError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| StatsError::InvalidRange(format!("{name} must be a YYYY-MM-DD date"))),
    }
}

/// Stats response body: the resolved window plus its buckets.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsPayload<B: Serialize> {
    pub range: DateRange,
    pub buckets: Vec<B>,
}

/// Load a record of the caller or fail with 404, whether it is missing or
/// belongs to someone else.
pub fn owned_or_404<R: OwnedRecord>(store: &Store, user_id: &str, id: &str) -> Result<R, AppError> {
    store
        .get_record::<R>(user_id, id)?
        .ok_or_else(|| AppError::not_found(&format!("{} not found", R::ENTITY.replace('_', " "))))
}

pub fn invalid(message: impl AsRef<str>) -> AppError {
    AppError::bad_request("VALIDATION_ERROR", message.as_ref())
}

/// Partial update of an optional text field: absent keeps the value, an
/// empty string clears it.
pub fn merge_optional_text(current: &mut Option<String>, update: Option<String>) {
    if let Some(value) = update {
        *current = if value.trim().is_empty() { None } else { Some(value) };
    }
}
