use axum::http::StatusCode;
use serde_json::json;

mod common;

#[tokio::test]
async fn test_create_session_references_existing_problem() {
    let app = common::create_test_app().await;
    let problem_id = common::seed_problem(&app).await;

    let response = common::post_json(
        &app,
        "/api/v1/sessions",
        &json!({ "problem_id": problem_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let session = common::read_json(response).await;
    assert_eq!(session["problem_id"], problem_id);
    assert_eq!(session["current_hint_level"], 1);
    assert_eq!(session["completed"], false);
    assert!(session["hints_used"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_session_for_unknown_problem_is_404() {
    let app = common::create_test_app().await;

    let response = common::post_json(
        &app,
        "/api/v1/sessions",
        &json!({ "problem_id": "no-such-problem" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_problem_detail_never_exposes_hints_or_solution() {
    let app = common::create_test_app().await;
    let problem_id = common::seed_problem(&app).await;

    let response = common::get(&app, &format!("/api/v1/problems/{}", problem_id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let detail = common::read_json(response).await;
    assert_eq!(detail["title"], "Reverse a string");
    assert!(detail.get("hints").is_none());
    assert!(detail.get("solution").is_none());

    let response = common::get(&app, "/api/v1/problems?language=python").await;
    assert_eq!(response.status(), StatusCode::OK);
    let list = common::read_json(response).await;
    let first = &list.as_array().unwrap()[0];
    assert!(first.get("hints").is_none());
    assert!(first.get("solution").is_none());
}

#[tokio::test]
async fn test_attempts_are_appended_in_order() {
    let app = common::create_test_app().await;
    let problem_id = common::seed_problem(&app).await;
    let session_id = common::create_session(&app, &problem_id).await;

    for (code, correct) in [("s[::-2]", false), ("s[::-1]", true)] {
        let response = common::post_json(
            &app,
            &format!("/api/v1/sessions/{}/attempts", session_id),
            &json!({ "code": code, "is_correct": correct }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = common::get(&app, &format!("/api/v1/sessions/{}", session_id)).await;
    let session = common::read_json(response).await;
    let attempts = session["attempts"].as_array().unwrap();
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0]["is_correct"], false);
    assert_eq!(attempts[1]["is_correct"], true);
}

#[tokio::test]
async fn test_completion_is_idempotent() {
    let app = common::create_test_app().await;
    let problem_id = common::seed_problem(&app).await;
    let session_id = common::create_session(&app, &problem_id).await;

    let response =
        common::post_empty(&app, &format!("/api/v1/sessions/{}/complete", session_id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let first = common::read_json(response).await;
    assert_eq!(first["completed"], true);
    let completed_at = first["completed_at"].clone();
    assert!(!completed_at.is_null());

    let response =
        common::post_empty(&app, &format!("/api/v1/sessions/{}/complete", session_id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let second = common::read_json(response).await;
    assert_eq!(second["completed"], true);
    // the original completion timestamp survives the repeat call
    assert_eq!(second["completed_at"], completed_at);
}

#[tokio::test]
async fn test_solution_is_locked_until_the_ladder_is_exhausted() {
    let app = common::create_test_app().await;
    let problem_id = common::seed_problem(&app).await;
    let session_id = common::create_session(&app, &problem_id).await;

    let response =
        common::post_empty(&app, &format!("/api/v1/sessions/{}/solution", session_id)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    for level in 1..=3 {
        let response = common::post_json(
            &app,
            &format!("/api/v1/sessions/{}/hints", session_id),
            &json!({ "level": level }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response =
        common::post_empty(&app, &format!("/api/v1/sessions/{}/solution", session_id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::read_json(response).await;
    assert_eq!(body["solution"], "def reverse(s):\n    return s[::-1]\n");
    assert!(!body["revealed_at"].is_null());
}
