use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::extractors::JsonBody;
use crate::response::{created, ok, AppError};
use crate::routes::common::{invalid, merge_optional_text, owned_or_404};
use crate::state::AppState;
use crate::store::operations::medical_history::MedicalHistoryEntry;
use crate::validation::{validate_label, validate_optional_text};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_entries).post(create_entry))
        .route("/:id", get(get_entry).put(update_entry).delete(delete_entry))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateEntryRequest {
    condition_name: String,
    treatment: String,
    diagnosis_date: DateTime<Utc>,
    #[serde(default)]
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateEntryRequest {
    condition_name: Option<String>,
    treatment: Option<String>,
    diagnosis_date: Option<DateTime<Utc>>,
    note: Option<String>,
}

fn validate(entry: &MedicalHistoryEntry) -> Result<(), AppError> {
    validate_label("conditionName", &entry.condition_name).map_err(invalid)?;
    if entry.treatment.trim().is_empty() {
        return Err(invalid("treatment must not be empty"));
    }
    validate_optional_text("treatment", Some(&entry.treatment)).map_err(invalid)?;
    validate_optional_text("note", entry.note.as_deref()).map_err(invalid)
}

async fn list_entries(auth: AuthUser, State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let entries: Vec<MedicalHistoryEntry> = state.store().list_records(&auth.user_id)?;
    Ok(ok(entries))
}

async fn create_entry(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateEntryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let entry = MedicalHistoryEntry {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: auth.user_id,
        condition_name: req.condition_name.trim().to_string(),
        treatment: req.treatment,
        diagnosis_date: req.diagnosis_date,
        note: req.note.filter(|n| !n.trim().is_empty()),
        created_at: now,
        updated_at: now,
    };
    validate(&entry)?;

    state.store().insert_record(&entry)?;
    Ok(created(entry))
}

async fn get_entry(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let entry: MedicalHistoryEntry = owned_or_404(state.store(), &auth.user_id, &id)?;
    Ok(ok(entry))
}

async fn update_entry(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateEntryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut entry: MedicalHistoryEntry = owned_or_404(state.store(), &auth.user_id, &id)?;

    if let Some(name) = req.condition_name {
        entry.condition_name = name.trim().to_string();
    }
    if let Some(treatment) = req.treatment {
        entry.treatment = treatment;
    }
    if let Some(date) = req.diagnosis_date {
        entry.diagnosis_date = date;
    }
    merge_optional_text(&mut entry.note, req.note);
    validate(&entry)?;

    entry.updated_at = Utc::now();
    state.store().update_record(&entry)?;
    Ok(ok(entry))
}

async fn delete_entry(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !state
        .store()
        .delete_record::<MedicalHistoryEntry>(&auth.user_id, &id)?
    {
        return Err(AppError::not_found("medical history not found"));
    }
    Ok(ok(serde_json::json!({ "deleted": true })))
}
