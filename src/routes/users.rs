use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::routes::auth::UserProfile;
use crate::routes::common::{invalid, merge_optional_text};
use crate::state::AppState;
use crate::store::operations::activities::Activity;
use crate::store::operations::users::{Gender, User};
use crate::validation::{is_valid_email, validate_optional_text, validate_username};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_profile).put(update_profile))
        .route("/me/dashboard", get(dashboard))
}

fn current_user(state: &AppState, auth: &AuthUser) -> Result<User, AppError> {
    state
        .store()
        .get_user_by_id(&auth.user_id)?
        .ok_or_else(|| AppError::not_found("user not found"))
}

async fn get_profile(auth: AuthUser, State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state, &auth)?;
    Ok(ok(UserProfile::from(&user)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProfileRequest {
    user_name: Option<String>,
    email: Option<String>,
    birthday: Option<NaiveDate>,
    gender: Option<Gender>,
    place: Option<String>,
}

async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut user = current_user(&state, &auth)?;

    if let Some(user_name) = req.user_name {
        let trimmed = user_name.trim();
        if let Err(msg) = validate_username(trimmed) {
            return Err(AppError::bad_request("USER_INVALID_USERNAME", msg));
        }
        user.user_name = trimmed.to_string();
    }
    if let Some(email) = req.email {
        let normalized = email.trim().to_lowercase();
        if !is_valid_email(&normalized) {
            return Err(AppError::bad_request("AUTH_INVALID_EMAIL", "Invalid email format"));
        }
        if normalized != user.email {
            user.verified_email = false;
        }
        user.email = normalized;
    }
    if req.birthday.is_some() {
        user.birthday = req.birthday;
    }
    if let Some(gender) = req.gender {
        user.gender = gender;
    }
    merge_optional_text(&mut user.place, req.place);
    validate_optional_text("place", user.place.as_deref()).map_err(invalid)?;

    user.updated_at = Utc::now();
    state.store().update_user(&user)?;
    tracing::info!(user_id = %user.id, "Profile updated");

    Ok(ok(UserProfile::from(&user)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Dashboard {
    user: UserProfile,
    today: NaiveDate,
    activities_today: Vec<Activity>,
    minutes_active_today: i64,
}

/// Profile plus every activity whose span touches today (UTC).
async fn dashboard(auth: AuthUser, State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&state, &auth)?;
    let today = Utc::now().date_naive();
    let activities_today = state.store().activities_on_day(&auth.user_id, today)?;
    let minutes_active_today = activities_today.iter().map(Activity::duration_minutes).sum();

    Ok(ok(Dashboard {
        user: UserProfile::from(&user),
        today,
        activities_today,
        minutes_active_today,
    }))
}
