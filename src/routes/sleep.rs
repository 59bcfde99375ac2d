use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::extractors::{JsonBody, QueryParams};
use crate::response::{created, ok, AppError};
use crate::routes::common::{invalid, merge_optional_text, owned_or_404, StatsPayload, StatsQuery};
use crate::state::AppState;
use crate::stats::{sleep_stats, RecordStore};
use crate::store::operations::sleep::SleepEntry;
use crate::validation::{validate_hours_slept, validate_label, validate_optional_text};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sleep).post(create_sleep))
        .route("/stats", get(stats))
        .route("/:id", get(get_sleep).put(update_sleep).delete(delete_sleep))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSleepRequest {
    sleep_date: DateTime<Utc>,
    hours_slept: f64,
    quality: String,
    #[serde(default)]
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateSleepRequest {
    sleep_date: Option<DateTime<Utc>>,
    hours_slept: Option<f64>,
    quality: Option<String>,
    note: Option<String>,
}

fn validate(entry: &SleepEntry) -> Result<(), AppError> {
    validate_hours_slept(entry.hours_slept).map_err(invalid)?;
    validate_label("quality", &entry.quality).map_err(invalid)?;
    validate_optional_text("note", entry.note.as_deref()).map_err(invalid)
}

/// Every entry of the caller, or only those whose sleep day falls in
/// `start..=end` when bounds are given.
async fn list_sleep(
    auth: AuthUser,
    State(state): State<AppState>,
    QueryParams(query): QueryParams<StatsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let entries: Vec<SleepEntry> = match query.optional_range()? {
        Some(range) => RecordStore::<SleepEntry>::fetch_in_range(state.store(), &auth.user_id, &range)?,
        None => state.store().list_records(&auth.user_id)?,
    };
    Ok(ok(entries))
}

async fn create_sleep(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateSleepRequest>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let entry = SleepEntry {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: auth.user_id,
        sleep_date: req.sleep_date,
        hours_slept: req.hours_slept,
        quality: req.quality.trim().to_string(),
        note: req.note.filter(|n| !n.trim().is_empty()),
        created_at: now,
        updated_at: now,
    };
    validate(&entry)?;

    state.store().insert_record(&entry)?;
    Ok(created(entry))
}

async fn stats(
    auth: AuthUser,
    State(state): State<AppState>,
    QueryParams(query): QueryParams<StatsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = query.range()?;
    let buckets = sleep_stats(state.store(), &auth.user_id, &range)?;
    Ok(ok(StatsPayload { range, buckets }))
}

async fn get_sleep(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let entry: SleepEntry = owned_or_404(state.store(), &auth.user_id, &id)?;
    Ok(ok(entry))
}

async fn update_sleep(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateSleepRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut entry: SleepEntry = owned_or_404(state.store(), &auth.user_id, &id)?;

    if let Some(sleep_date) = req.sleep_date {
        entry.sleep_date = sleep_date;
    }
    if let Some(hours) = req.hours_slept {
        entry.hours_slept = hours;
    }
    if let Some(quality) = req.quality {
        entry.quality = quality.trim().to_string();
    }
    merge_optional_text(&mut entry.note, req.note);
    validate(&entry)?;

    entry.updated_at = Utc::now();
    state.store().update_record(&entry)?;
    Ok(ok(entry))
}

async fn delete_sleep(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !state.store().delete_record::<SleepEntry>(&auth.user_id, &id)? {
        return Err(AppError::not_found("sleep not found"));
    }
    Ok(ok(serde_json::json!({ "deleted": true })))
}
