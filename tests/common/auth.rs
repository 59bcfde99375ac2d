use axum::http::{HeaderMap, Method};
use axum::Router;
use serde_json::Value;

use super::http::{request, response_json};

pub const TEST_PASSWORD: &str = "Passw0rd!";

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> [(&'static str, String); 1] {
        [("authorization", auth_header(&self.token))]
    }
}

pub fn auth_header(token: &str) -> String {
    format!("Bearer {token}")
}

pub fn cookie_value(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all("set-cookie")
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|s| {
            s.strip_prefix(&format!("{cookie_name}="))
                .map(|rest| rest.split(';').next().unwrap_or("").to_string())
        })
}

pub fn register_body(email: &str, user_name: &str) -> Value {
    serde_json::json!({
        "userName": user_name,
        "email": email,
        "password": TEST_PASSWORD,
    })
}

/// Register a fresh user and return its id and bearer token.
pub async fn register_and_login(app: &Router) -> TestUser {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let email = format!("user-{suffix}@test.com");
    let user_name = format!("user_{}", &suffix[..12]);

    let response = request(
        app,
        Method::POST,
        "/api/auth/register",
        Some(register_body(&email, &user_name)),
        &[],
    )
    .await;
    let (status, _, body) = response_json(response).await;
    assert!(status.is_success(), "register failed: {body}");

    TestUser {
        id: body["data"]["user"]["id"].as_str().expect("user id").to_string(),
        email,
        token: body["data"]["accessToken"]
            .as_str()
            .expect("access token in register response")
            .to_string(),
    }
}
