//! Pet API tests.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use serde_json::json;

use vetcare_integration_tests::{TestApp, pet_body, unknown_id};

#[tokio::test]
async fn test_pet_create_with_unknown_owner_persists_nothing() {
    let app = TestApp::new();

    let (status, error) = app.post("/api/pets", pet_body(&unknown_id(), "Rex")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["message"], "Owner not found");

    let (status, list) = app.get("/api/pets").await;
    assert_eq!(status, StatusCode::OK);
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_pet_create_without_owner_is_validation_error() {
    let app = TestApp::new();
    let mut body = pet_body(&unknown_id(), "Rex");
    body.as_object_mut().unwrap().remove("owner");

    let (status, error) = app.post("/api/pets", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["message"].as_str().unwrap().contains("owner"));
}

#[tokio::test]
async fn test_pet_create_returns_owner_summary() {
    let app = TestApp::new();
    let owner = app.create_owner("jane@example.com").await;

    let (status, created) = app.post("/api/pets", pet_body(&owner, "Rex")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["owner"]["id"], owner.as_str());
    assert_eq!(created["owner"]["firstName"], "Jane");
    assert!(created["owner"].get("email").is_none());
}

#[tokio::test]
async fn test_pet_round_trip() {
    let app = TestApp::new();
    let owner = app.create_owner("jane@example.com").await;
    let id = app.create_pet(&owner, "Rex").await;

    let (status, pet) = app.get(&format!("/api/pets/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pet["id"], id.as_str());
    assert_eq!(pet["name"], "Rex");
    assert_eq!(pet["species"], "Dog");
    assert_eq!(pet["breed"], "Labrador");
    assert_eq!(pet["birthDate"], "2018-05-14");
    assert_eq!(pet["gender"], "Male");
    assert!(pet["createdAt"].is_string());
    // Detail view carries the full owner.
    assert_eq!(pet["owner"]["email"], "jane@example.com");
    assert_eq!(pet["owner"]["address"]["city"], "Springfield");
}

#[tokio::test]
async fn test_pet_gender_defaults_to_unknown() {
    let app = TestApp::new();
    let owner = app.create_owner("jane@example.com").await;

    let (status, created) = app
        .post(
            "/api/pets",
            json!({ "name": "Kiwi", "species": "Parrot", "owner": owner }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["gender"], "Unknown");
    assert!(created["breed"].is_null());
}

#[tokio::test]
async fn test_pet_invalid_gender_rejected() {
    let app = TestApp::new();
    let owner = app.create_owner("jane@example.com").await;
    let mut body = pet_body(&owner, "Rex");
    body["gender"] = json!("Dragon");

    let (status, _) = app.post("/api/pets", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pet_update_without_owner_keeps_reference() {
    let app = TestApp::new();
    let owner = app.create_owner("jane@example.com").await;
    let id = app.create_pet(&owner, "Rex").await;

    // Once the owner is gone, an owner check would fail; an update that does
    // not name the owner must still succeed.
    app.delete(&format!("/api/owners/{owner}")).await;

    let (status, updated) = app
        .put(&format!("/api/pets/{id}"), json!({ "name": "Rexy" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Rexy");
    assert!(updated["owner"].is_null());

    let (_, list) = app.get(&format!("/api/pets/owner/{owner}")).await;
    assert_eq!(list["message"], "Owner not found");
}

#[tokio::test]
async fn test_pet_update_to_unknown_owner_rejected() {
    let app = TestApp::new();
    let owner = app.create_owner("jane@example.com").await;
    let id = app.create_pet(&owner, "Rex").await;

    let (status, error) = app
        .put(&format!("/api/pets/{id}"), json!({ "owner": unknown_id() }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["message"], "Owner not found");

    let (_, pet) = app.get(&format!("/api/pets/{id}")).await;
    assert_eq!(pet["owner"]["id"], owner.as_str());
}

#[tokio::test]
async fn test_pet_update_null_owner_rejected() {
    let app = TestApp::new();
    let owner = app.create_owner("jane@example.com").await;
    let id = app.create_pet(&owner, "Rex").await;

    let (status, error) = app
        .put(&format!("/api/pets/{id}"), json!({ "owner": null, "name": null }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["message"].as_str().unwrap().contains("is required"));

    let (_, pet) = app.get(&format!("/api/pets/{id}")).await;
    assert_eq!(pet["name"], "Rex");
    assert_eq!(pet["owner"]["id"], owner.as_str());
}

#[tokio::test]
async fn test_pet_update_moves_owner() {
    let app = TestApp::new();
    let jane = app.create_owner("jane@example.com").await;
    let carlos = app.create_owner("carlos@example.com").await;
    let id = app.create_pet(&jane, "Rex").await;

    let (status, updated) = app
        .put(&format!("/api/pets/{id}"), json!({ "owner": carlos }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["owner"]["id"], carlos.as_str());

    let (_, janes) = app.get(&format!("/api/pets/owner/{jane}")).await;
    assert!(janes.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_pet_update_clears_optional_field() {
    let app = TestApp::new();
    let owner = app.create_owner("jane@example.com").await;
    let id = app.create_pet(&owner, "Rex").await;

    let (status, updated) = app
        .put(&format!("/api/pets/{id}"), json!({ "breed": null }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(updated["breed"].is_null());
    assert_eq!(updated["birthDate"], "2018-05-14");
}

#[tokio::test]
async fn test_pets_by_owner() {
    let app = TestApp::new();
    let jane = app.create_owner("jane@example.com").await;
    let carlos = app.create_owner("carlos@example.com").await;
    app.create_pet(&jane, "Rex").await;
    app.create_pet(&carlos, "Kiwi").await;
    app.create_pet(&jane, "Misty").await;

    let (status, list) = app.get(&format!("/api/pets/owner/{jane}")).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Rex", "Misty"]);
}

#[tokio::test]
async fn test_pets_by_unknown_owner_is_not_found() {
    let app = TestApp::new();

    let (status, error) = app
        .get(&format!("/api/pets/owner/{}", unknown_id()))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["message"], "Owner not found");
}

#[tokio::test]
async fn test_pet_delete() {
    let app = TestApp::new();
    let owner = app.create_owner("jane@example.com").await;
    let id = app.create_pet(&owner, "Rex").await;

    let (status, body) = app.delete(&format!("/api/pets/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Pet deleted successfully");

    let (status, error) = app.get(&format!("/api/pets/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["message"], "Pet not found");
}
