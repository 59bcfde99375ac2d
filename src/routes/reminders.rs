use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{delete, get};
use axum::Router;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::extractors::JsonBody;
use crate::response::{created, ok, AppError};
use crate::routes::common::invalid;
use crate::state::AppState;
use crate::store::operations::reminders::Reminder;
use crate::validation::validate_reminder_items;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reminders).post(create_reminder))
        .route("/:id", delete(delete_reminder))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateReminderRequest {
    send_notification_on: DateTime<Utc>,
    items: Vec<String>,
}

async fn list_reminders(auth: AuthUser, State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let reminders: Vec<Reminder> = state.store().list_records(&auth.user_id)?;
    Ok(ok(reminders))
}

async fn create_reminder(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateReminderRequest>,
) -> Result<impl IntoResponse, AppError> {
    let items: Vec<String> = req.items.into_iter().map(|item| item.trim().to_string()).collect();
    validate_reminder_items(&items).map_err(invalid)?;

    let now = Utc::now();
    let reminder = Reminder {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: auth.user_id,
        send_notification_on: req.send_notification_on,
        items,
        created_at: now,
        updated_at: now,
    };
    state.store().insert_record(&reminder)?;
    Ok(created(reminder))
}

async fn delete_reminder(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !state.store().delete_record::<Reminder>(&auth.user_id, &id)? {
        return Err(AppError::not_found("reminder not found"));
    }
    Ok(ok(serde_json::json!({ "deleted": true })))
}
