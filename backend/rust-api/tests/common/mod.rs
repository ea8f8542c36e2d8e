use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, Response, StatusCode},
    Router,
};
use serde_json::json;
use tower::ServiceExt;

use socraticcode_api::config::Config;
use socraticcode_api::create_router;
use socraticcode_api::services::memory_store::MemoryStore;
use socraticcode_api::services::AppState;

/// App over the in-memory store, no generative backend: hint content is
/// the static per-problem text, which keeps assertions deterministic.
pub async fn create_test_app() -> Router {
    // Initialize tracing for tests
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let config = Config {
        mongo_uri: "mongodb://unused".to_string(),
        mongo_database: "unused".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        hint_api_url: "http://unused".to_string(),
    };

    let store = Arc::new(MemoryStore::new());
    let app_state = Arc::new(AppState::new(config, store, None));
    create_router(app_state)
}

pub async fn seed_problem(app: &Router) -> String {
    let body = json!({
        "title": "Reverse a string",
        "description": "Reverse the input without using built-in reverse helpers.",
        "difficulty": "beginner",
        "language": "python",
        "category": "strings",
        "hints": {
            "level1": "What happens if you walk the string from the end?",
            "level2": "Collect characters into a new string, last index first.",
            "level3": "result = ''.join(s[i] for i in range(len(s) - 1, -1, -1))",
        },
        "solution": "def reverse(s):\n    return s[::-1]\n",
        "test_cases": [
            { "input": "abc", "expected_output": "cba" }
        ]
    });

    let response = post_json(app, "/api/v1/problems", &body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = read_json(response).await;
    json["id"].as_str().expect("problem id").to_string()
}

pub async fn create_session(app: &Router, problem_id: &str) -> String {
    let response = post_json(
        app,
        "/api/v1/sessions",
        &json!({ "problem_id": problem_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = read_json(response).await;
    json["_id"].as_str().expect("session id").to_string()
}

pub async fn post_json(app: &Router, uri: &str, body: &serde_json::Value) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn post_empty(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn read_json(response: Response<Body>) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}
