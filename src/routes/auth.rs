use axum::extract::State;
use axum::http::{header::SET_COOKIE, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{
    hash_password, hash_token, sign_access_token, verify_password, AuthUser, DUMMY_ARGON2_HASH,
    TOKEN_COOKIE,
};
use crate::extractors::JsonBody;
use crate::response::{created, ok, AppError};
use crate::state::AppState;
use crate::store::operations::sessions::Session;
use crate::store::operations::users::{Gender, User};
use crate::validation::{is_valid_email, validate_optional_text, validate_password, validate_username};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub user_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub place: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a [`User`]; never carries the password hash.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub user_name: String,
    pub email: String,
    pub verified_email: bool,
    pub birthday: Option<NaiveDate>,
    pub gender: Gender,
    pub place: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(value: &User) -> Self {
        Self {
            id: value.id.clone(),
            user_name: value.user_name.clone(),
            email: value.email.clone(),
            verified_email: value.verified_email,
            birthday: value.birthday,
            gender: value.gender,
            place: value.place.clone(),
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub user: UserProfile,
}

/// Sign an access token and persist its session, evicting the user's oldest
/// sessions beyond the configured cap.
fn issue_session(user_id: &str, state: &AppState) -> Result<String, AppError> {
    let signed = sign_access_token(
        user_id,
        &state.config().jwt_secret,
        state.config().jwt_expires_in_hours,
    )?;

    state.store().create_session(&Session {
        token_hash: hash_token(&signed.token),
        user_id: user_id.to_string(),
        created_at: Utc::now(),
        expires_at: signed.expires_at,
    })?;

    if let Err(e) = state
        .store()
        .cleanup_oldest_user_sessions(user_id, state.config().max_sessions_per_user)
    {
        tracing::warn!(user_id, error = %e, "Failed to evict surplus sessions");
    }

    Ok(signed.token)
}

async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<Response, AppError> {
    let email = req.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::bad_request("AUTH_INVALID_EMAIL", "Invalid email format"));
    }
    let user_name = req.user_name.trim();
    if let Err(msg) = validate_username(user_name) {
        return Err(AppError::bad_request("AUTH_INVALID_USERNAME", msg));
    }
    if let Err(msg) = validate_password(&req.password) {
        return Err(AppError::bad_request("AUTH_WEAK_PASSWORD", msg));
    }
    validate_optional_text("place", req.place.as_deref())
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", &msg))?;

    if state.store().get_user_by_email(&email)?.is_some() {
        return Err(AppError::conflict("AUTH_EMAIL_EXISTS", "Email already registered"));
    }

    let now = Utc::now();
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        user_name: user_name.to_string(),
        email,
        password_hash: hash_password(&req.password)?,
        verified_email: false,
        birthday: req.birthday,
        gender: req.gender.unwrap_or_default(),
        place: req.place,
        created_at: now,
        updated_at: now,
    };

    state.store().create_user(&user)?;
    tracing::info!(user_id = %user.id, email = %mask_email_for_log(&user.email), "User registered");

    let access_token = issue_session(&user.id, &state)?;
    let mut response = created(AuthResponse {
        access_token: access_token.clone(),
        user: UserProfile::from(&user),
    })
    .into_response();
    set_token_cookie(&mut response, &access_token)?;
    Ok(response)
}

async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Response, AppError> {
    let Some(user) = state.store().get_user_by_email(req.email.trim())? else {
        let _ = verify_password(&req.password, DUMMY_ARGON2_HASH);
        tracing::info!(email = %mask_email_for_log(&req.email), "Login for unknown email");
        return Err(AppError::unauthorized("Invalid email or password"));
    };

    if !verify_password(&req.password, &user.password_hash)? {
        tracing::info!(user_id = %user.id, "Login with wrong password");
        return Err(AppError::unauthorized("Invalid email or password"));
    }

    let access_token = issue_session(&user.id, &state)?;
    let mut response = ok(AuthResponse {
        access_token: access_token.clone(),
        user: UserProfile::from(&user),
    })
    .into_response();
    set_token_cookie(&mut response, &access_token)?;
    Ok(response)
}

async fn logout(auth_user: AuthUser, State(state): State<AppState>) -> Result<Response, AppError> {
    let removed = state.store().delete_user_sessions(&auth_user.user_id)?;
    tracing::info!(user_id = %auth_user.user_id, sessions = removed, "User logged out");

    let mut response = ok(serde_json::json!({"loggedOut": true})).into_response();
    append_set_cookie(
        &mut response,
        &format!("{TOKEN_COOKIE}=; Path=/; Max-Age=0; SameSite=Strict; HttpOnly; Secure"),
    )?;
    Ok(response)
}

fn set_token_cookie(response: &mut Response, token: &str) -> Result<(), AppError> {
    append_set_cookie(
        response,
        &format!("{TOKEN_COOKIE}={token}; Path=/; SameSite=Strict; HttpOnly; Secure"),
    )
}

fn append_set_cookie(response: &mut Response, cookie: &str) -> Result<(), AppError> {
    let value = HeaderValue::from_str(cookie)
        .map_err(|e| AppError::internal(&format!("set-cookie header invalid: {e}")))?;
    response.headers_mut().append(SET_COOKIE, value);
    Ok(())
}

pub(crate) fn mask_email_for_log(email: &str) -> String {
    let Some((local, domain)) = email.trim().split_once('@') else {
        return "***".to_string();
    };
    let mask = |part: &str| {
        part.chars()
            .next()
            .map(|ch| format!("{ch}***"))
            .unwrap_or_else(|| "***".to_string())
    };
    format!("{}@{}", mask(local), mask(domain))
}
