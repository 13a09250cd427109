use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

mod common;

use common::{send, setup};

#[tokio::test]
async fn health_check_reports_ok() {
    let ctx = setup().await.unwrap();

    let (status, body) = send(&ctx.app, Method::GET, "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn list_is_empty_on_fresh_store() {
    let ctx = setup().await.unwrap();

    let (status, body) = send(&ctx.app, Method::GET, "/api/tasks", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn create_returns_201_with_assigned_id() {
    let ctx = setup().await.unwrap();

    let (status, body) = send(
        &ctx.app,
        Method::POST,
        "/api/tasks",
        Some(json!({"title": "Test Task", "description": "Test Description"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].is_i64());
    assert_eq!(body["title"], "Test Task");
    assert_eq!(body["description"], "Test Description");
    assert_eq!(body["completed"], 0);
}

#[tokio::test]
async fn create_ignores_supplied_completed_flag() {
    let ctx = setup().await.unwrap();

    let (_, body) = send(
        &ctx.app,
        Method::POST,
        "/api/tasks",
        Some(json!({"title": "Already done?", "completed": true})),
    )
    .await;

    assert_eq!(body["completed"], 0);
    assert_eq!(body["description"], "");
}

#[tokio::test]
async fn create_without_title_is_rejected_and_writes_nothing() {
    let ctx = setup().await.unwrap();

    let (status, body) = send(
        &ctx.app,
        Method::POST,
        "/api/tasks",
        Some(json!({"description": "no title"})),
    )
    .await;
    let (_, list) = send(&ctx.app, Method::GET, "/api/tasks", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Title is required"}));
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn create_with_empty_title_is_rejected() {
    let ctx = setup().await.unwrap();

    let (status, body) = send(
        &ctx.app,
        Method::POST,
        "/api/tasks",
        Some(json!({"title": ""})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Title is required"}));
}

#[tokio::test]
async fn non_string_title_is_rejected_and_writes_nothing() {
    let ctx = setup().await.unwrap();

    let (status, body) = send(&ctx.app, Method::POST, "/api/tasks", Some(json!({"title": 5}))).await;
    let (_, list) = send(&ctx.app, Method::GET, "/api/tasks", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn whole_valued_decimal_id_finds_the_task() {
    let ctx = setup().await.unwrap();
    send(&ctx.app, Method::POST, "/api/tasks", Some(json!({"title": "Buy milk"}))).await;

    let (status, body) = send(&ctx.app, Method::GET, "/api/tasks/1.0", None).await;
    let (fraction_status, _) = send(&ctx.app, Method::GET, "/api/tasks/1.5", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(fraction_status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let ctx = setup().await.unwrap();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/tasks")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = ctx.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn list_returns_newest_first() {
    let ctx = setup().await.unwrap();

    send(&ctx.app, Method::POST, "/api/tasks", Some(json!({"title": "Task 1"}))).await;
    send(&ctx.app, Method::POST, "/api/tasks", Some(json!({"title": "Task 2"}))).await;
    let (status, body) = send(&ctx.app, Method::GET, "/api/tasks", None).await;

    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Task 2", "Task 1"]);
    assert!(body[0]["created_at"].is_string());
}

#[tokio::test]
async fn get_returns_single_task() {
    let ctx = setup().await.unwrap();
    let (_, created) = send(
        &ctx.app,
        Method::POST,
        "/api/tasks",
        Some(json!({"title": "Test Task"})),
    )
    .await;

    let uri = format!("/api/tasks/{}", created["id"]);
    let (status, body) = send(&ctx.app, Method::GET, &uri, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], created["id"]);
    assert_eq!(body["title"], "Test Task");
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let ctx = setup().await.unwrap();
    let not_found = json!({"error": "Task not found"});

    let (get_status, get_body) = send(&ctx.app, Method::GET, "/api/tasks/9999", None).await;
    let (put_status, put_body) = send(
        &ctx.app,
        Method::PUT,
        "/api/tasks/9999",
        Some(json!({"title": "Updated", "description": "", "completed": false})),
    )
    .await;
    let (delete_status, delete_body) =
        send(&ctx.app, Method::DELETE, "/api/tasks/9999", None).await;

    assert_eq!(get_status, StatusCode::NOT_FOUND);
    assert_eq!(get_body, not_found);
    assert_eq!(put_status, StatusCode::NOT_FOUND);
    assert_eq!(put_body, not_found);
    assert_eq!(delete_status, StatusCode::NOT_FOUND);
    assert_eq!(delete_body, not_found);
}

#[tokio::test]
async fn non_numeric_id_is_not_found() {
    let ctx = setup().await.unwrap();

    let (status, body) = send(&ctx.app, Method::GET, "/api/tasks/abc", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Task not found"}));
}

#[tokio::test]
async fn update_coerces_completed_by_truthiness() {
    let ctx = setup().await.unwrap();
    let (_, created) = send(
        &ctx.app,
        Method::POST,
        "/api/tasks",
        Some(json!({"title": "Flag"})),
    )
    .await;
    let uri = format!("/api/tasks/{}", created["id"]);

    let cases = [
        (json!(true), 1),
        (json!(false), 0),
        (json!("yes"), 1),
        (json!(""), 0),
        (json!(2), 1),
        (json!(0), 0),
        (json!(null), 0),
    ];
    for (completed, expected) in cases {
        let (status, body) = send(
            &ctx.app,
            Method::PUT,
            &uri,
            Some(json!({"title": "Flag", "description": "", "completed": completed})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["completed"], expected, "completed = {completed}");
    }
}

#[tokio::test]
async fn update_without_title_fails_with_engine_message() {
    let ctx = setup().await.unwrap();
    let (_, created) = send(
        &ctx.app,
        Method::POST,
        "/api/tasks",
        Some(json!({"title": "Keep me"})),
    )
    .await;
    let uri = format!("/api/tasks/{}", created["id"]);

    let (status, body) = send(
        &ctx.app,
        Method::PUT,
        &uri,
        Some(json!({"description": "lost title", "completed": false})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("NOT NULL"));
}

#[tokio::test]
async fn store_failure_is_a_server_error() {
    let ctx = setup().await.unwrap();
    ctx.store.close().await;

    let (status, body) = send(&ctx.app, Method::GET, "/api/tasks", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn buy_milk_lifecycle() {
    let ctx = setup().await.unwrap();

    let (status, created) = send(
        &ctx.app,
        Method::POST,
        "/api/tasks",
        Some(json!({"title": "Buy milk"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["completed"], 0);

    let (status, list) = send(&ctx.app, Method::GET, "/api/tasks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"], 1);
    assert_eq!(list[0]["title"], "Buy milk");
    assert_eq!(list[0]["description"], "");
    assert_eq!(list[0]["completed"], 0);

    let (status, updated) = send(
        &ctx.app,
        Method::PUT,
        "/api/tasks/1",
        Some(json!({"title": "Buy milk", "description": "2%", "completed": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        updated,
        json!({"id": 1, "title": "Buy milk", "description": "2%", "completed": 1})
    );

    let (status, fetched) = send(&ctx.app, Method::GET, "/api/tasks/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["description"], "2%");
    assert_eq!(fetched["completed"], 1);

    let (status, deleted) = send(&ctx.app, Method::DELETE, "/api/tasks/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!({"message": "Task deleted successfully"}));

    let (status, _) = send(&ctx.app, Method::GET, "/api/tasks/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = send(&ctx.app, Method::GET, "/api/tasks", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn responses_allow_cross_origin_requests() {
    let ctx = setup().await.unwrap();

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/health")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = ctx.app.clone().oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&header::HeaderValue::from_static("*"))
    );
}
