//! Veterinarian API tests.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use serde_json::json;

use vetcare_integration_tests::{TestApp, unknown_id, vet_body};

#[tokio::test]
async fn test_vet_round_trip() {
    let app = TestApp::new();
    let (status, created) = app
        .post("/api/vets", vet_body("ortiz@vetcare.example", "VET-001"))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["licenseNumber"], "VET-001");
    assert_eq!(created["specialization"], "Surgery");

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = app.get(&format!("/api/vets/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_vet_duplicate_license_number() {
    let app = TestApp::new();
    let first = app.create_vet("ortiz@vetcare.example", "VET-001").await;

    let (status, error) = app
        .post("/api/vets", vet_body("chen@vetcare.example", "VET-001"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["message"], "Duplicate value for licenseNumber");

    let (status, fetched) = app.get(&format!("/api/vets/{first}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["email"], "ortiz@vetcare.example");
    assert_eq!(fetched["licenseNumber"], "VET-001");

    let (_, list) = app.get("/api/vets").await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_vet_duplicate_email() {
    let app = TestApp::new();
    app.create_vet("ortiz@vetcare.example", "VET-001").await;

    let (status, error) = app
        .post("/api/vets", vet_body("ortiz@vetcare.example", "VET-002"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["message"], "Duplicate value for email");
}

#[tokio::test]
async fn test_vet_update_to_taken_license_rejected() {
    let app = TestApp::new();
    app.create_vet("ortiz@vetcare.example", "VET-001").await;
    let second = app.create_vet("chen@vetcare.example", "VET-002").await;

    let (status, error) = app
        .put(
            &format!("/api/vets/{second}"),
            json!({ "licenseNumber": "VET-001" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["message"], "Duplicate value for licenseNumber");

    let (_, fetched) = app.get(&format!("/api/vets/{second}")).await;
    assert_eq!(fetched["licenseNumber"], "VET-002");
}

#[tokio::test]
async fn test_vet_update_keeps_own_license() {
    let app = TestApp::new();
    let id = app.create_vet("ortiz@vetcare.example", "VET-001").await;

    let (status, updated) = app
        .put(
            &format!("/api/vets/{id}"),
            json!({ "licenseNumber": "VET-001", "specialization": null }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["licenseNumber"], "VET-001");
    assert!(updated["specialization"].is_null());
}

#[tokio::test]
async fn test_vet_missing_license_is_bad_request() {
    let app = TestApp::new();
    let mut body = vet_body("ortiz@vetcare.example", "VET-001");
    body.as_object_mut().unwrap().remove("licenseNumber");

    let (status, error) = app.post("/api/vets", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["message"].as_str().unwrap().contains("licenseNumber"));
}

#[tokio::test]
async fn test_vet_delete_and_not_found() {
    let app = TestApp::new();
    let id = app.create_vet("ortiz@vetcare.example", "VET-001").await;

    let (status, body) = app.delete(&format!("/api/vets/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Veterinarian deleted successfully");

    let (status, error) = app.get(&format!("/api/vets/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["message"], "Veterinarian not found");

    let (status, _) = app.get(&format!("/api/vets/{}", unknown_id())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
