use axum::http::StatusCode;
use serde_json::json;

mod common;

async fn request_hint(
    app: &axum::Router,
    session_id: &str,
    level: u8,
) -> axum::http::Response<axum::body::Body> {
    common::post_json(
        app,
        &format!("/api/v1/sessions/{}/hints", session_id),
        &json!({ "level": level }),
    )
    .await
}

#[tokio::test]
async fn test_ladder_advances_one_level_at_a_time() {
    let app = common::create_test_app().await;
    let problem_id = common::seed_problem(&app).await;
    let session_id = common::create_session(&app, &problem_id).await;

    let response = request_hint(&app, &session_id, 1).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::read_json(response).await;
    assert_eq!(body["level"], 1);
    assert_eq!(body["source"], "static");
    assert_eq!(
        body["hint"],
        "What happens if you walk the string from the end?"
    );
    assert_eq!(body["current_hint_level"], 1);

    let response = request_hint(&app, &session_id, 2).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::read_json(response).await;
    assert_eq!(
        body["hint"],
        "Collect characters into a new string, last index first."
    );
    assert_eq!(body["current_hint_level"], 2);
    assert_eq!(body["hints_used"], 2);
}

#[tokio::test]
async fn test_skipping_ahead_is_a_conflict() {
    let app = common::create_test_app().await;
    let problem_id = common::seed_problem(&app).await;
    let session_id = common::create_session(&app, &problem_id).await;

    let response = request_hint(&app, &session_id, 3).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // the refused request must not move the ladder
    let response = common::get(&app, &format!("/api/v1/sessions/{}", session_id)).await;
    let session = common::read_json(response).await;
    assert_eq!(session["current_hint_level"], 1);
    assert!(session["hints_used"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_replaying_the_current_level_does_not_regress() {
    let app = common::create_test_app().await;
    let problem_id = common::seed_problem(&app).await;
    let session_id = common::create_session(&app, &problem_id).await;

    for _ in 0..2 {
        let response = request_hint(&app, &session_id, 1).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = request_hint(&app, &session_id, 2).await;
    assert_eq!(response.status(), StatusCode::OK);

    // rereading level 1 after unlocking level 2 stays at level 2
    let response = request_hint(&app, &session_id, 1).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::read_json(response).await;
    assert_eq!(body["level"], 1);
    assert_eq!(body["current_hint_level"], 2);

    let response = common::get(&app, &format!("/api/v1/sessions/{}", session_id)).await;
    let session = common::read_json(response).await;
    assert_eq!(session["current_hint_level"], 2);
    // every served hint lands in the ledger, replays included
    assert_eq!(session["hints_used"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_out_of_range_level_is_rejected() {
    let app = common::create_test_app().await;
    let problem_id = common::seed_problem(&app).await;
    let session_id = common::create_session(&app, &problem_id).await;

    let response = request_hint(&app, &session_id, 5).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_hint_for_unknown_session_is_404() {
    let app = common::create_test_app().await;
    common::seed_problem(&app).await;

    let response = request_hint(&app, "no-such-session", 1).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
