//! Integration tests for the `/stories` resource.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_empty, post_json, wait_for_job};
use serde_json::json;

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_story_returns_created_with_running_job() {
    let harness = common::build_test_app();
    let response = post_json(
        harness.app.clone(),
        "/api/v1/stories",
        json!({ "prompt": "a mushroom supplement ad", "frame_count": 2 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let job = body_json(response).await["data"].clone();
    assert_eq!(job["id"], 1);
    assert_eq!(job["status"], "running");
    assert_eq!(job["processing_status"], "none");
    assert_eq!(job["video_model"], "veo2");
}

#[tokio::test]
async fn submitted_model_is_recorded_on_the_job() {
    let harness = common::build_test_app();
    let response = post_json(
        harness.app.clone(),
        "/api/v1/stories",
        json!({
            "prompt": "a luma story",
            "frame_count": 1,
            "video_model": "ray_flash_2"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let job = body_json(response).await["data"].clone();
    assert_eq!(job["video_model"], "ray_flash_2");
}

#[tokio::test]
async fn submit_with_invalid_frame_count_is_rejected() {
    let harness = common::build_test_app();
    let response = post_json(
        harness.app.clone(),
        "/api/v1/stories",
        json!({ "prompt": "a story", "frame_count": 99 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn submit_with_empty_prompt_is_rejected() {
    let harness = common::build_test_app();
    let response = post_json(
        harness.app.clone(),
        "/api/v1/stories",
        json!({ "prompt": "   " }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Polling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn job_completes_and_exposes_video_path() {
    let harness = common::build_test_app();
    post_json(
        harness.app.clone(),
        "/api/v1/stories",
        json!({ "prompt": "a short story", "frame_count": 2 }),
    )
    .await;

    let job = wait_for_job(&harness.app, 1, |j| j["status"] == "completed").await;
    assert!(job["video_path"]
        .as_str()
        .unwrap()
        .ends_with("slideshow.mp4"));
    assert_eq!(job["frames"].as_array().unwrap().len(), 2);
    for frame in job["frames"].as_array().unwrap() {
        assert!(frame["image_path"].is_string());
        assert!(frame["narration_path"].is_string());
        assert!(frame["animated_path"].is_null());
    }
}

#[tokio::test]
async fn unknown_job_returns_404() {
    let harness = common::build_test_app();
    let response = get(harness.app.clone(), "/api/v1/stories/42").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn list_returns_all_jobs_in_order() {
    let harness = common::build_test_app();
    for prompt in ["first", "second"] {
        post_json(
            harness.app.clone(),
            "/api/v1/stories",
            json!({ "prompt": prompt, "frame_count": 1 }),
        )
        .await;
    }

    let response = get(harness.app.clone(), "/api/v1/stories").await;
    assert_eq!(response.status(), StatusCode::OK);
    let jobs = body_json(response).await["data"].clone();
    let ids: Vec<_> = jobs
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2]);
}

// ---------------------------------------------------------------------------
// Animation trigger
// ---------------------------------------------------------------------------

#[tokio::test]
async fn animate_after_completion_runs_stage_two() {
    let harness = common::build_test_app();
    post_json(
        harness.app.clone(),
        "/api/v1/stories",
        json!({ "prompt": "an animated tale", "frame_count": 2 }),
    )
    .await;
    wait_for_job(&harness.app, 1, |j| j["status"] == "completed").await;

    let response = post_empty(harness.app.clone(), "/api/v1/stories/1/animate").await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let job = body_json(response).await["data"].clone();
    assert_eq!(job["processing_status"], "running");

    let job = wait_for_job(&harness.app, 1, |j| j["processing_status"] == "completed").await;
    assert!(job["final_video_path"]
        .as_str()
        .unwrap()
        .ends_with("final_video.mp4"));
    for frame in job["frames"].as_array().unwrap() {
        assert!(frame["animated_path"].is_string());
    }
}

#[tokio::test]
async fn animate_twice_conflicts_after_completion() {
    let harness = common::build_test_app();
    post_json(
        harness.app.clone(),
        "/api/v1/stories",
        json!({ "prompt": "a story", "frame_count": 1 }),
    )
    .await;
    wait_for_job(&harness.app, 1, |j| j["status"] == "completed").await;

    // First trigger wins; a repeat after completion conflicts.
    post_empty(harness.app.clone(), "/api/v1/stories/1/animate").await;
    wait_for_job(&harness.app, 1, |j| j["processing_status"] == "completed").await;

    let response = post_empty(harness.app.clone(), "/api/v1/stories/1/animate").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn animate_accepts_an_explicit_model() {
    let harness = common::build_test_app();
    post_json(
        harness.app.clone(),
        "/api/v1/stories",
        json!({ "prompt": "a story", "frame_count": 1 }),
    )
    .await;
    wait_for_job(&harness.app, 1, |j| j["status"] == "completed").await;

    let response = post_json(
        harness.app.clone(),
        "/api/v1/stories/1/animate",
        json!({ "video_model": "ray_flash_2" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn animate_rejects_an_unknown_model() {
    let harness = common::build_test_app();
    post_json(
        harness.app.clone(),
        "/api/v1/stories",
        json!({ "prompt": "a story", "frame_count": 1 }),
    )
    .await;
    wait_for_job(&harness.app, 1, |j| j["status"] == "completed").await;

    let response = post_json(
        harness.app.clone(),
        "/api/v1/stories/1/animate",
        json!({ "video_model": "sora-9000" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn animate_unknown_job_returns_404() {
    let harness = common::build_test_app();
    let response = post_empty(harness.app.clone(), "/api/v1/stories/42/animate").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
