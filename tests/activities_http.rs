mod common;

use axum::http::{Method, StatusCode};
use chrono::Utc;

use common::app::spawn_test_app;
use common::auth::register_and_login;
use common::fixtures::{activity, at};
use common::http::{assert_json_error, assert_status_ok_json, call};

#[tokio::test]
async fn it_activity_crud_round_trip() {
    let app = spawn_test_app().await;
    let user = register_and_login(&app.app).await;

    let (status, body) = call(
        &app.app,
        Method::POST,
        "/api/activities",
        Some(activity("run", at(2024, 5, 1, 7, 0), 40, 320.0)),
        &user.bearer(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["userId"], user.id.as_str());
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = call(&app.app, Method::GET, &format!("/api/activities/{id}"), None, &user.bearer()).await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["activityType"], "run");

    let (status, body) = call(
        &app.app,
        Method::GET,
        &format!("/api/activities/{id}/duration"),
        None,
        &user.bearer(),
    )
    .await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["duration"], 40);

    let (status, body) = call(
        &app.app,
        Method::PUT,
        &format!("/api/activities/{id}"),
        Some(serde_json::json!({"activityType": "trail run", "note": "muddy"})),
        &user.bearer(),
    )
    .await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["activityType"], "trail run");
    assert_eq!(body["data"]["note"], "muddy");
    assert_eq!(body["data"]["caloriesBurned"], 320.0);

    let (status, body) = call(
        &app.app,
        Method::PUT,
        &format!("/api/activities/{id}"),
        Some(serde_json::json!({"note": ""})),
        &user.bearer(),
    )
    .await;
    assert_status_ok_json(status, &body);
    assert!(body["data"].get("note").map_or(true, |n| n.is_null()));

    let (status, body) = call(&app.app, Method::DELETE, &format!("/api/activities/{id}"), None, &user.bearer()).await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["deleted"], true);

    let (status, body) = call(&app.app, Method::GET, &format!("/api/activities/{id}"), None, &user.bearer()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_json_error(&body, "NOT_FOUND");
}

#[tokio::test]
async fn it_activity_rejects_end_before_start() {
    let app = spawn_test_app().await;
    let user = register_and_login(&app.app).await;

    let (status, body) = call(
        &app.app,
        Method::POST,
        "/api/activities",
        Some(serde_json::json!({
            "activityType": "run",
            "startTime": at(2024, 5, 1, 8, 0),
            "endTime": at(2024, 5, 1, 7, 0),
        })),
        &user.bearer(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "VALIDATION_ERROR");

    let (status, body) = call(
        &app.app,
        Method::POST,
        "/api/activities",
        Some(activity("  ", at(2024, 5, 1, 7, 0), 10, 10.0)),
        &user.bearer(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "VALIDATION_ERROR");
}

#[tokio::test]
async fn it_activity_types_are_distinct() {
    let app = spawn_test_app().await;
    let user = register_and_login(&app.app).await;

    for (kind, hour) in [("run", 7), ("yoga", 9), ("run", 18)] {
        let (status, _) = call(
            &app.app,
            Method::POST,
            "/api/activities",
            Some(activity(kind, at(2024, 5, 1, hour, 0), 30, 100.0)),
            &user.bearer(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = call(&app.app, Method::GET, "/api/activities/types", None, &user.bearer()).await;
    assert_status_ok_json(status, &body);
    let mut types: Vec<String> = serde_json::from_value(body["data"].clone()).unwrap();
    types.sort();
    assert_eq!(types, vec!["run".to_string(), "yoga".to_string()]);
}

#[tokio::test]
async fn it_activity_list_is_in_start_order() {
    let app = spawn_test_app().await;
    let user = register_and_login(&app.app).await;

    for day in [3, 1, 2] {
        let _ = call(
            &app.app,
            Method::POST,
            "/api/activities",
            Some(activity("walk", at(2024, 5, day, 7, 0), 30, 100.0)),
            &user.bearer(),
        )
        .await;
    }

    let (_, body) = call(&app.app, Method::GET, "/api/activities", None, &user.bearer()).await;
    let starts: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["startTime"].as_str().unwrap())
        .collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts.len(), 3);
    assert_eq!(starts, sorted);
}

#[tokio::test]
async fn it_dashboard_sums_todays_activity() {
    let app = spawn_test_app().await;
    let user = register_and_login(&app.app).await;
    let start = Utc::now() - chrono::Duration::minutes(1);

    if start.date_naive() == Utc::now().date_naive() {
        let (status, _) = call(
            &app.app,
            Method::POST,
            "/api/activities",
            Some(activity("row", start, 25, 180.0)),
            &user.bearer(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let _ = call(
        &app.app,
        Method::POST,
        "/api/activities",
        Some(activity("row", at(2020, 1, 1, 7, 0), 60, 400.0)),
        &user.bearer(),
    )
    .await;

    let (status, body) = call(&app.app, Method::GET, "/api/users/me/dashboard", None, &user.bearer()).await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["user"]["id"], user.id.as_str());
    let count = body["data"]["activitiesToday"].as_array().unwrap().len();
    assert!(count <= 1);
    assert_eq!(body["data"]["minutesActiveToday"], if count == 1 { 25 } else { 0 });
}
