mod common;

use axum::http::{Method, StatusCode};

use common::app::{spawn_test_app, spawn_with_session_cap};
use common::auth::{auth_header, cookie_value, register_and_login, register_body, TEST_PASSWORD};
use common::http::{assert_json_error, call, request, response_json};

#[tokio::test]
async fn it_auth_register_returns_token_and_profile() {
    let app = spawn_test_app().await;

    let response = request(
        &app.app,
        Method::POST,
        "/api/auth/register",
        Some(register_body("Register@Test.com", "register_me")),
        &[],
    )
    .await;
    let (status, headers, body) = response_json(response).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert!(body["data"]["accessToken"].is_string());
    assert_eq!(body["data"]["user"]["email"], "register@test.com");
    assert_eq!(body["data"]["user"]["userName"], "register_me");
    assert_eq!(body["data"]["user"]["gender"], "other");
    assert!(body["data"]["user"].get("passwordHash").is_none());
    assert_eq!(
        cookie_value(&headers, "token").as_deref(),
        body["data"]["accessToken"].as_str()
    );
}

#[tokio::test]
async fn it_auth_duplicate_email_conflicts() {
    let app = spawn_test_app().await;

    let (first, _) = call(
        &app.app,
        Method::POST,
        "/api/auth/register",
        Some(register_body("dup@test.com", "dup_one")),
        &[],
    )
    .await;
    assert_eq!(first, StatusCode::CREATED);

    let (status, body) = call(
        &app.app,
        Method::POST,
        "/api/auth/register",
        Some(register_body("DUP@test.com", "dup_two")),
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_json_error(&body, "AUTH_EMAIL_EXISTS");
}

#[tokio::test]
async fn it_auth_duplicate_username_conflicts_ignoring_case() {
    let app = spawn_test_app().await;

    let _ = call(
        &app.app,
        Method::POST,
        "/api/auth/register",
        Some(register_body("first@test.com", "same_name")),
        &[],
    )
    .await;
    let (status, body) = call(
        &app.app,
        Method::POST,
        "/api/auth/register",
        Some(register_body("second@test.com", "Same_Name")),
        &[],
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_json_error(&body, "USER_NAME_TAKEN");
}

#[tokio::test]
async fn it_auth_register_rejects_bad_input() {
    let app = spawn_test_app().await;

    let cases = [
        (
            serde_json::json!({"userName": "ok_name", "email": "not-an-email", "password": TEST_PASSWORD}),
            "AUTH_INVALID_EMAIL",
        ),
        (
            serde_json::json!({"userName": "ok_name", "email": "short@test.com", "password": "1234"}),
            "AUTH_WEAK_PASSWORD",
        ),
        (
            serde_json::json!({"userName": "x", "email": "name@test.com", "password": TEST_PASSWORD}),
            "AUTH_INVALID_USERNAME",
        ),
        (
            serde_json::json!({"email": "missing@test.com"}),
            "INVALID_REQUEST_BODY",
        ),
    ];

    for (payload, code) in cases {
        let (status, body) = call(&app.app, Method::POST, "/api/auth/register", Some(payload), &[]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_json_error(&body, code);
    }
}

#[tokio::test]
async fn it_auth_login_success_and_wrong_password() {
    let app = spawn_test_app().await;
    let user = register_and_login(&app.app).await;

    let (status, body) = call(
        &app.app,
        Method::POST,
        "/api/auth/login",
        Some(serde_json::json!({"email": user.email, "password": TEST_PASSWORD})),
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["id"], user.id.as_str());

    let (status, body) = call(
        &app.app,
        Method::POST,
        "/api/auth/login",
        Some(serde_json::json!({"email": user.email, "password": "wrong-password"})),
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_json_error(&body, "AUTH_UNAUTHORIZED");
}

#[tokio::test]
async fn it_auth_unknown_email_gets_same_error_as_wrong_password() {
    let app = spawn_test_app().await;

    let (status, body) = call(
        &app.app,
        Method::POST,
        "/api/auth/login",
        Some(serde_json::json!({"email": "nobody@test.com", "password": TEST_PASSWORD})),
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn it_auth_protected_routes_need_a_token() {
    let app = spawn_test_app().await;

    for path in ["/api/users/me", "/api/activities", "/api/foods/stats"] {
        let (status, body) = call(&app.app, Method::GET, path, None, &[]).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{path}");
        assert_json_error(&body, "AUTH_UNAUTHORIZED");
    }

    let (status, _) = call(
        &app.app,
        Method::GET,
        "/api/users/me",
        None,
        &[("authorization", auth_header("not.a.jwt"))],
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn it_auth_cookie_token_is_accepted() {
    let app = spawn_test_app().await;
    let user = register_and_login(&app.app).await;

    let (status, body) = call(
        &app.app,
        Method::GET,
        "/api/users/me",
        None,
        &[("cookie", format!("theme=dark; token={}", user.token))],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], user.id.as_str());
}

#[tokio::test]
async fn it_auth_logout_revokes_every_session() {
    let app = spawn_test_app().await;
    let user = register_and_login(&app.app).await;

    let (_, login) = call(
        &app.app,
        Method::POST,
        "/api/auth/login",
        Some(serde_json::json!({"email": user.email, "password": TEST_PASSWORD})),
        &[],
    )
    .await;
    let second_token = login["data"]["accessToken"].as_str().unwrap().to_string();

    let response = request(&app.app, Method::POST, "/api/auth/logout", None, &user.bearer()).await;
    let (status, headers, _) = response_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cookie_value(&headers, "token").as_deref(), Some(""));

    for token in [&user.token, &second_token] {
        let (status, _) = call(
            &app.app,
            Method::GET,
            "/api/users/me",
            None,
            &[("authorization", auth_header(token))],
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn it_auth_oldest_sessions_are_evicted_past_the_cap() {
    let app = spawn_with_session_cap(2).await;
    let user = register_and_login(&app.app).await;

    let mut tokens = vec![user.token.clone()];
    for _ in 0..2 {
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let (_, body) = call(
            &app.app,
            Method::POST,
            "/api/auth/login",
            Some(serde_json::json!({"email": user.email, "password": TEST_PASSWORD})),
            &[],
        )
        .await;
        tokens.push(body["data"]["accessToken"].as_str().unwrap().to_string());
    }

    assert_eq!(app.store().count_user_sessions(&user.id).unwrap(), 2);

    let (status, _) = call(
        &app.app,
        Method::GET,
        "/api/users/me",
        None,
        &[("authorization", auth_header(&tokens[0]))],
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(
        &app.app,
        Method::GET,
        "/api/users/me",
        None,
        &[("authorization", auth_header(&tokens[2]))],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
