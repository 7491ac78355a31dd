use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use countdown_board::{api::create_router, state::TimerService};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(value) => Body::from(value.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn app() -> (Router, TimerService) {
    let service = TimerService::manual(64);
    (create_router(service.clone()), service)
}

#[tokio::test]
async fn add_then_list() {
    let (app, _) = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/timers",
        Some(json!({"name": "Tea", "duration_seconds": 185})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["timer"]["name"], "Tea");
    assert_eq!(body["timer"]["status"], "stopped");
    assert_eq!(body["remaining"], "03:05");
    assert_eq!(body["duration"], "03:05");

    let (status, body) = send(&app, Method::POST, "/timers", Some(json!({"duration_seconds": 60}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["timer"]["name"], "Timer 2");

    let (status, body) = send(&app, Method::GET, "/timers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timers"].as_array().unwrap().len(), 2);
    assert_eq!(body["timers"][0]["name"], "Tea");
    assert_eq!(body["running"], 0);
}

#[tokio::test]
async fn negative_duration_is_unprocessable() {
    let (app, _) = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/timers",
        Some(json!({"name": "bad", "duration_seconds": -3})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn lifecycle_commands() {
    let (app, service) = app();
    let id = service.add("X", 10).unwrap().id.as_u64();

    let (status, body) = send(&app, Method::POST, &format!("/timers/{}/start", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["status"], "running");
    assert_eq!(body["timer"]["is_running"], true);

    service.tick(id.into()).unwrap();

    let (status, body) = send(&app, Method::POST, &format!("/timers/{}/pause", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["status"], "paused");
    assert_eq!(body["timer"]["seconds_left"], 9);

    let (status, body) = send(&app, Method::POST, &format!("/timers/{}/reset", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["status"], "reset");
    assert_eq!(body["timer"]["seconds_left"], 10);

    let (status, _) = send(&app, Method::DELETE, &format!("/timers/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, &format!("/timers/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");

    let (status, _) = send(&app, Method::DELETE, &format!("/timers/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn starting_zero_duration_timer_conflicts() {
    let (app, service) = app();
    let id = service.add("Y", 0).unwrap().id.as_u64();

    let (status, _) = send(&app, Method::POST, &format!("/timers/{}/start", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(service.get(id.into()).unwrap().seconds_left, 0);
}

#[tokio::test]
async fn batch_endpoints_report_skipped_timers() {
    let (app, service) = app();
    service.add("a", 5).unwrap();
    let empty = service.add("empty", 0).unwrap().id.as_u64();

    let (status, body) = send(&app, Method::POST, "/timers/start-all", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["report"]["timers"].as_array().unwrap().len(), 1);
    assert_eq!(body["report"]["skipped"][0]["id"], empty);
    assert_eq!(service.running_count().unwrap(), 1);

    let (status, _) = send(&app, Method::POST, "/timers/pause-all", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(service.running_count().unwrap(), 0);

    let (status, body) = send(&app, Method::POST, "/timers/reset-all", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["report"]["timers"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn health_reports_version() {
    let (app, _) = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
