use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::extractors::JsonBody;
use crate::response::{created, ok, AppError};
use crate::routes::common::{invalid, merge_optional_text, owned_or_404};
use crate::state::AppState;
use crate::store::operations::medications::Medication;
use crate::validation::{validate_label, validate_optional_text};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_medications).post(create_medication))
        .route(
            "/:id",
            get(get_medication)
                .put(update_medication)
                .delete(delete_medication),
        )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateMedicationRequest {
    medication_name: String,
    #[serde(default)]
    dosage: Option<String>,
    #[serde(default)]
    frequency: Option<String>,
    #[serde(default)]
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateMedicationRequest {
    medication_name: Option<String>,
    dosage: Option<String>,
    frequency: Option<String>,
    note: Option<String>,
}

fn validate(medication: &Medication) -> Result<(), AppError> {
    validate_label("medicationName", &medication.medication_name).map_err(invalid)?;
    validate_optional_text("dosage", medication.dosage.as_deref()).map_err(invalid)?;
    validate_optional_text("frequency", medication.frequency.as_deref()).map_err(invalid)?;
    validate_optional_text("note", medication.note.as_deref()).map_err(invalid)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

async fn list_medications(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let medications: Vec<Medication> = state.store().list_records(&auth.user_id)?;
    Ok(ok(medications))
}

async fn create_medication(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateMedicationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let medication = Medication {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: auth.user_id,
        medication_name: req.medication_name.trim().to_string(),
        dosage: non_blank(req.dosage),
        frequency: non_blank(req.frequency),
        note: non_blank(req.note),
        created_at: now,
        updated_at: now,
    };
    validate(&medication)?;

    state.store().insert_record(&medication)?;
    Ok(created(medication))
}

async fn get_medication(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let medication: Medication = owned_or_404(state.store(), &auth.user_id, &id)?;
    Ok(ok(medication))
}

async fn update_medication(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateMedicationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut medication: Medication = owned_or_404(state.store(), &auth.user_id, &id)?;

    if let Some(name) = req.medication_name {
        medication.medication_name = name.trim().to_string();
    }
    merge_optional_text(&mut medication.dosage, req.dosage);
    merge_optional_text(&mut medication.frequency, req.frequency);
    merge_optional_text(&mut medication.note, req.note);
    validate(&medication)?;

    medication.updated_at = Utc::now();
    state.store().update_record(&medication)?;
    Ok(ok(medication))
}

async fn delete_medication(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !state.store().delete_record::<Medication>(&auth.user_id, &id)? {
        return Err(AppError::not_found("medication not found"));
    }
    Ok(ok(serde_json::json!({ "deleted": true })))
}
