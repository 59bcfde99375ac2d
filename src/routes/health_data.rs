use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::extractors::{JsonBody, QueryParams};
use crate::response::{created, ok, AppError};
use crate::routes::common::{invalid, merge_optional_text, owned_or_404, StatsQuery};
use crate::state::AppState;
use crate::stats::{health_stats, DateRange, HealthDayBucket, HealthStatType, StatsError};
use crate::store::operations::health_measurements::HealthMeasurement;
use crate::validation::{validate_measure, validate_optional_text};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_measurements).post(create_measurement))
        .route("/stats", get(stats))
        .route(
            "/:id",
            get(get_measurement)
                .put(update_measurement)
                .delete(delete_measurement),
        )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateMeasurementRequest {
    measurement_date: DateTime<Utc>,
    weight: f64,
    height: f64,
    bmi: f64,
    heart_rate: f64,
    blood_pressure_systolic: f64,
    blood_pressure_diastolic: f64,
    #[serde(default)]
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateMeasurementRequest {
    measurement_date: Option<DateTime<Utc>>,
    weight: Option<f64>,
    height: Option<f64>,
    bmi: Option<f64>,
    heart_rate: Option<f64>,
    blood_pressure_systolic: Option<f64>,
    blood_pressure_diastolic: Option<f64>,
    note: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthStatsPayload {
    #[serde(rename = "type")]
    kind: &'static str,
    label: &'static str,
    range: DateRange,
    buckets: Vec<HealthDayBucket>,
}

fn validate(m: &HealthMeasurement) -> Result<(), AppError> {
    for (field, value) in [
        ("weight", m.weight),
        ("height", m.height),
        ("bmi", m.bmi),
        ("heartRate", m.heart_rate),
        ("bloodPressureSystolic", m.blood_pressure_systolic),
        ("bloodPressureDiastolic", m.blood_pressure_diastolic),
    ] {
        validate_measure(field, value).map_err(invalid)?;
    }
    validate_optional_text("note", m.note.as_deref()).map_err(invalid)
}

async fn list_measurements(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let measurements: Vec<HealthMeasurement> = state.store().list_records(&auth.user_id)?;
    Ok(ok(measurements))
}

async fn create_measurement(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateMeasurementRequest>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let measurement = HealthMeasurement {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: auth.user_id,
        measurement_date: req.measurement_date,
        weight: req.weight,
        height: req.height,
        bmi: req.bmi,
        heart_rate: req.heart_rate,
        blood_pressure_systolic: req.blood_pressure_systolic,
        blood_pressure_diastolic: req.blood_pressure_diastolic,
        note: req.note.filter(|n| !n.trim().is_empty()),
        created_at: now,
        updated_at: now,
    };
    validate(&measurement)?;

    state.store().insert_record(&measurement)?;
    Ok(created(measurement))
}

/// The type is checked before the range so that a request wrong on both
/// counts reports the type.
async fn stats(
    auth: AuthUser,
    State(state): State<AppState>,
    QueryParams(query): QueryParams<StatsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let kind: HealthStatType = query
        .kind()
        .ok_or_else(|| StatsError::InvalidFilter("type is required".to_string()))?
        .parse()?;
    let range = query.range()?;
    let buckets = health_stats(state.store(), &auth.user_id, &range, kind)?;

    Ok(ok(HealthStatsPayload {
        kind: kind.as_str(),
        label: kind.label(),
        range,
        buckets,
    }))
}

async fn get_measurement(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let measurement: HealthMeasurement = owned_or_404(state.store(), &auth.user_id, &id)?;
    Ok(ok(measurement))
}

async fn update_measurement(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateMeasurementRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut m: HealthMeasurement = owned_or_404(state.store(), &auth.user_id, &id)?;

    if let Some(date) = req.measurement_date {
        m.measurement_date = date;
    }
    m.weight = req.weight.unwrap_or(m.weight);
    m.height = req.height.unwrap_or(m.height);
    m.bmi = req.bmi.unwrap_or(m.bmi);
    m.heart_rate = req.heart_rate.unwrap_or(m.heart_rate);
    m.blood_pressure_systolic = req.blood_pressure_systolic.unwrap_or(m.blood_pressure_systolic);
    m.blood_pressure_diastolic = req
        .blood_pressure_diastolic
        .unwrap_or(m.blood_pressure_diastolic);
    merge_optional_text(&mut m.note, req.note);
    validate(&m)?;

    m.updated_at = Utc::now();
    state.store().update_record(&m)?;
    Ok(ok(m))
}

async fn delete_measurement(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !state
        .store()
        .delete_record::<HealthMeasurement>(&auth.user_id, &id)?
    {
        return Err(AppError::not_found("health measurement not found"));
    }
    Ok(ok(serde_json::json!({ "deleted": true })))
}
