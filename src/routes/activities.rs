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
use crate::stats::{activity_stats_by_day, activity_stats_by_type};
use crate::store::operations::activities::Activity;
use crate::validation::{validate_label, validate_measure, validate_optional_text, validate_time_span};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_activities).post(create_activity))
        .route("/types", get(list_activity_types))
        .route("/stats", get(stats_by_day))
        .route("/stats/by-type", get(stats_by_type))
        .route(
            "/:id",
            get(get_activity).put(update_activity).delete(delete_activity),
        )
        .route("/:id/duration", get(get_duration))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateActivityRequest {
    activity_type: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    #[serde(default)]
    calories_burned: Option<f64>,
    #[serde(default)]
    note: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateActivityRequest {
    activity_type: Option<String>,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    calories_burned: Option<f64>,
    note: Option<String>,
}

fn validate(activity: &Activity) -> Result<(), AppError> {
    validate_label("activityType", &activity.activity_type).map_err(invalid)?;
    validate_time_span(activity.start_time, activity.end_time).map_err(invalid)?;
    if let Some(calories) = activity.calories_burned {
        validate_measure("caloriesBurned", calories).map_err(invalid)?;
    }
    validate_optional_text("note", activity.note.as_deref()).map_err(invalid)
}

async fn list_activities(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let activities: Vec<Activity> = state.store().list_records(&auth.user_id)?;
    Ok(ok(activities))
}

async fn create_activity(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateActivityRequest>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let activity = Activity {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: auth.user_id,
        activity_type: req.activity_type.trim().to_string(),
        start_time: req.start_time,
        end_time: req.end_time,
        calories_burned: req.calories_burned,
        note: req.note.filter(|n| !n.trim().is_empty()),
        created_at: now,
        updated_at: now,
    };
    validate(&activity)?;

    state.store().insert_record(&activity)?;
    tracing::info!(user_id = %activity.user_id, activity_id = %activity.id, "Activity logged");
    Ok(created(activity))
}

async fn list_activity_types(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(ok(state.store().activity_types_for_user(&auth.user_id)?))
}

async fn stats_by_day(
    auth: AuthUser,
    State(state): State<AppState>,
    QueryParams(query): QueryParams<StatsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = query.range()?;
    let buckets = activity_stats_by_day(state.store(), &auth.user_id, &range)?;
    Ok(ok(StatsPayload { range, buckets }))
}

async fn stats_by_type(
    auth: AuthUser,
    State(state): State<AppState>,
    QueryParams(query): QueryParams<StatsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = query.range()?;
    let buckets = activity_stats_by_type(state.store(), &auth.user_id, &range)?;
    Ok(ok(StatsPayload { range, buckets }))
}

async fn get_activity(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let activity: Activity = owned_or_404(state.store(), &auth.user_id, &id)?;
    Ok(ok(activity))
}

async fn get_duration(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let activity: Activity = owned_or_404(state.store(), &auth.user_id, &id)?;
    Ok(ok(serde_json::json!({ "duration": activity.duration_minutes() })))
}

async fn update_activity(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateActivityRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut activity: Activity = owned_or_404(state.store(), &auth.user_id, &id)?;

    if let Some(kind) = req.activity_type {
        activity.activity_type = kind.trim().to_string();
    }
    if let Some(start) = req.start_time {
        activity.start_time = start;
    }
    if let Some(end) = req.end_time {
        activity.end_time = end;
    }
    if req.calories_burned.is_some() {
        activity.calories_burned = req.calories_burned;
    }
    merge_optional_text(&mut activity.note, req.note);
    validate(&activity)?;

    activity.updated_at = Utc::now();
    state.store().update_record(&activity)?;
    Ok(ok(activity))
}

async fn delete_activity(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !state.store().delete_record::<Activity>(&auth.user_id, &id)? {
        return Err(AppError::not_found("activity not found"));
    }
    Ok(ok(serde_json::json!({ "deleted": true })))
}
