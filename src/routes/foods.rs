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
use crate::stats::food_stats;
use crate::store::operations::foods::FoodEntry;
use crate::validation::{validate_label, validate_measure, validate_optional_text};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_foods).post(create_food))
        .route("/stats", get(stats))
        .route("/:id", get(get_food).put(update_food).delete(delete_food))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateFoodRequest {
    meal: String,
    meal_date: DateTime<Utc>,
    #[serde(default)]
    calorie_intake: f64,
    #[serde(default)]
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateFoodRequest {
    meal: Option<String>,
    meal_date: Option<DateTime<Utc>>,
    calorie_intake: Option<f64>,
    note: Option<String>,
}

fn validate(entry: &FoodEntry) -> Result<(), AppError> {
    validate_label("meal", &entry.meal).map_err(invalid)?;
    validate_measure("calorieIntake", entry.calorie_intake).map_err(invalid)?;
    validate_optional_text("note", entry.note.as_deref()).map_err(invalid)
}

async fn list_foods(auth: AuthUser, State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let entries: Vec<FoodEntry> = state.store().list_records(&auth.user_id)?;
    Ok(ok(entries))
}

async fn create_food(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateFoodRequest>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let entry = FoodEntry {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: auth.user_id,
        meal: req.meal.trim().to_string(),
        meal_date: req.meal_date,
        calorie_intake: req.calorie_intake,
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
    let buckets = food_stats(state.store(), &auth.user_id, &range)?;
    Ok(ok(StatsPayload { range, buckets }))
}

async fn get_food(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let entry: FoodEntry = owned_or_404(state.store(), &auth.user_id, &id)?;
    Ok(ok(entry))
}

async fn update_food(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateFoodRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut entry: FoodEntry = owned_or_404(state.store(), &auth.user_id, &id)?;

    if let Some(meal) = req.meal {
        entry.meal = meal.trim().to_string();
    }
    if let Some(meal_date) = req.meal_date {
        entry.meal_date = meal_date;
    }
    if let Some(calories) = req.calorie_intake {
        entry.calorie_intake = calories;
    }
    merge_optional_text(&mut entry.note, req.note);
    validate(&entry)?;

    entry.updated_at = Utc::now();
    state.store().update_record(&entry)?;
    Ok(ok(entry))
}

async fn delete_food(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !state.store().delete_record::<FoodEntry>(&auth.user_id, &id)? {
        return Err(AppError::not_found("food not found"));
    }
    Ok(ok(serde_json::json!({ "deleted": true })))
}
