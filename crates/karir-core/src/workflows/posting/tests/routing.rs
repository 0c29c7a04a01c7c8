use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::posting::moderation::ModerationDecision;
use crate::workflows::posting::router::board_router;

fn seeded_router(points: u32) -> (axum::Router, Arc<MemoryService>) {
    let (service, _, _, _, _) = seeded_service(points, None);
    let service = Arc::new(service);
    (board_router(service.clone()), service)
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn posting_a_job_returns_created_with_pending_moderation() {
    let (router, _) = seeded_router(1);

    let payload = serde_json::to_value(draft()).expect("draft serializes");
    let response = router
        .oneshot(post_json(
            &format!("/api/v1/companies/{COMPANY}/jobs"),
            &payload,
        ))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body.get("moderation_status"), Some(&json!("pending")));
    assert_eq!(body.get("status"), Some(&json!("draft")));
    assert!(body.get("id").is_some());
}

#[tokio::test]
async fn exhausted_balance_maps_to_unprocessable_with_remedy_code() {
    let (router, _) = seeded_router(0);

    let payload = serde_json::to_value(draft()).expect("draft serializes");
    let response = router
        .oneshot(post_json(
            &format!("/api/v1/companies/{COMPANY}/jobs"),
            &payload,
        ))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json(response).await;
    assert_eq!(body.get("code"), Some(&json!("no_points")));
}

#[tokio::test]
async fn balance_endpoint_reports_points() {
    let (router, _) = seeded_router(4);

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/api/v1/companies/{COMPANY}/points"))
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body.get("points"), Some(&json!(4)));
}

#[tokio::test]
async fn purchase_endpoint_credits_the_package() {
    let (router, service) = seeded_router(0);

    let response = router
        .oneshot(post_json(
            &format!("/api/v1/companies/{COMPANY}/purchases"),
            &json!({ "package": "starter" }),
        ))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body.get("points"), Some(&json!(1)));
    assert_eq!(service.point_balance(&company_id()).expect("balance"), 1);
}

#[tokio::test]
async fn moderation_endpoint_publishes_a_pending_listing() {
    let (router, service) = seeded_router(1);
    let listing = service
        .post_job(&company_id(), draft())
        .expect("posting succeeds");

    let response = router
        .oneshot(post_json(
            &format!("/api/v1/admin/listings/{}/moderate", listing.id.0),
            &json!({
                "decision": "approved",
                "notes": "looks good",
                "moderator": "admin-1",
            }),
        ))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body.get("status"), Some(&json!("published")));
    assert_eq!(body.get("moderation_status"), Some(&json!("approved")));
}

#[tokio::test]
async fn repeat_moderation_maps_to_conflict() {
    let (router, service) = seeded_router(1);
    let listing = service
        .post_job(&company_id(), draft())
        .expect("posting succeeds");
    service
        .moderate(&listing.id, ModerationDecision::Approved, None, admin())
        .expect("first moderation succeeds");

    let response = router
        .oneshot(post_json(
            &format!("/api/v1/admin/listings/{}/moderate", listing.id.0),
            &json!({ "decision": "rejected", "moderator": "admin-1" }),
        ))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = read_json(response).await;
    assert_eq!(body.get("code"), Some(&json!("invalid_transition")));
}

#[tokio::test]
async fn bulk_moderation_reports_both_sides_of_the_split() {
    let (router, service) = seeded_router(2);
    let first = service
        .post_job(&company_id(), draft())
        .expect("posting succeeds");
    let second = service
        .post_job(&company_id(), draft())
        .expect("posting succeeds");
    service
        .moderate(&second.id, ModerationDecision::Approved, None, admin())
        .expect("pre-approval succeeds");

    let response = router
        .oneshot(post_json(
            "/api/v1/admin/listings/moderate",
            &json!({
                "listing_ids": [first.id.0, second.id.0],
                "decision": "approved",
                "moderator": "admin-1",
            }),
        ))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(
        body.get("applied")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(1)
    );
    assert_eq!(
        body.get("skipped")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(1)
    );
}

#[tokio::test]
async fn moderation_queue_lists_pending_listings() {
    let (router, service) = seeded_router(2);
    service
        .post_job(&company_id(), draft())
        .expect("posting succeeds");
    service
        .post_job(&company_id(), draft())
        .expect("posting succeeds");

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/admin/listings/pending?limit=1")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn report_lifecycle_over_http() {
    let (router, service) = seeded_router(1);
    let listing = service
        .post_job(&company_id(), draft())
        .expect("posting succeeds");
    service
        .moderate(&listing.id, ModerationDecision::Approved, None, admin())
        .expect("approval succeeds");

    let response = router
        .clone()
        .oneshot(post_json(
            &format!("/api/v1/listings/{}/reports", listing.id.0),
            &json!({
                "reporter": "seeker-7",
                "reason": "spam",
                "description": "posted five times today",
            }),
        ))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::CREATED);
    let report = read_json(response).await;
    let report_id = report
        .get("id")
        .and_then(Value::as_str)
        .expect("report id present")
        .to_string();

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/admin/reports/open")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::OK);
    let open = read_json(response).await;
    assert_eq!(open.as_array().map(Vec::len), Some(1));

    let response = router
        .oneshot(post_json(
            &format!("/api/v1/admin/reports/{report_id}/resolve"),
            &json!({
                "decision": "resolved",
                "admin_notes": "confirmed spam",
                "job_action": "reject",
                "reviewer": "admin-1",
            }),
        ))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::OK);
    let resolved = read_json(response).await;
    assert_eq!(resolved.get("status"), Some(&json!("resolved")));

    let listing = service.listing(&listing.id).expect("listing present");
    assert!(!listing.is_publicly_visible());
}

#[tokio::test]
async fn filing_a_report_against_a_missing_listing_is_not_found() {
    let (router, _) = seeded_router(0);

    let response = router
        .oneshot(post_json(
            "/api/v1/listings/job-ghost/reports",
            &json!({
                "reporter": "seeker-7",
                "reason": "fake",
                "description": "gone",
            }),
        ))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body.get("code"), Some(&json!("not_found")));
}
