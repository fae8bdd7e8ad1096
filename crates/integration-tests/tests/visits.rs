//! Visit API tests.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use serde_json::{Value, json};

use vetcare_integration_tests::{TestApp, unknown_id, visit_body};

struct Clinic {
    app: TestApp,
    pet: String,
    vet: String,
}

async fn clinic() -> Clinic {
    let app = TestApp::new();
    let owner = app.create_owner("jane@example.com").await;
    let pet = app.create_pet(&owner, "Rex").await;
    let vet = app.create_vet("ortiz@vetcare.example", "VET-001").await;
    Clinic { app, pet, vet }
}

fn dates(list: &Value) -> Vec<&str> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|v| v["date"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_visit_round_trip() {
    let Clinic { app, pet, vet } = clinic().await;

    let (status, created) = app
        .post(
            "/api/visits",
            json!({
                "pet": pet,
                "veterinarian": vet,
                "date": "2023-06-01T09:30:00Z",
                "reason": "Limping",
                "diagnosis": "Sprain",
                "treatment": "Rest"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["pet"]["name"], "Rex");
    assert_eq!(created["veterinarian"]["lastName"], "Ortiz");

    let id = created["id"].as_str().unwrap();
    let (status, visit) = app.get(&format!("/api/visits/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(visit["date"], "2023-06-01T09:30:00Z");
    assert_eq!(visit["reason"], "Limping");
    assert_eq!(visit["diagnosis"], "Sprain");
    assert_eq!(visit["treatment"], "Rest");
    assert!(visit["notes"].is_null());
    // Detail view carries the full pet and veterinarian.
    assert_eq!(visit["pet"]["gender"], "Male");
    assert_eq!(visit["veterinarian"]["licenseNumber"], "VET-001");
}

#[tokio::test]
async fn test_visit_date_defaults_to_now() {
    let Clinic { app, pet, vet } = clinic().await;
    let before = chrono::Utc::now();

    let (status, created) = app
        .post(
            "/api/visits",
            json!({ "pet": pet, "veterinarian": vet, "reason": "Checkup" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let date: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(created["date"].clone()).unwrap();
    assert!(date >= before - chrono::Duration::seconds(1));
}

#[tokio::test]
async fn test_visit_unknown_pet_rejected() {
    let Clinic { app, vet, .. } = clinic().await;

    let (status, error) = app
        .post("/api/visits", visit_body(&unknown_id(), &vet, "2023-01-01"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["message"], "Pet not found");

    let (_, list) = app.get("/api/visits").await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_visit_unknown_vet_rejected() {
    let Clinic { app, pet, .. } = clinic().await;

    let (status, error) = app
        .post("/api/visits", visit_body(&pet, &unknown_id(), "2023-01-01"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["message"], "Veterinarian not found");

    let (_, list) = app.get("/api/visits").await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_visit_update_checks_each_reference() {
    let Clinic { app, pet, vet } = clinic().await;
    let id = app.create_visit(&pet, &vet, "2023-01-01").await;

    let (status, error) = app
        .put(
            &format!("/api/visits/{id}"),
            json!({ "veterinarian": unknown_id(), "reason": "Changed" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["message"], "Veterinarian not found");

    let (status, error) = app
        .put(&format!("/api/visits/{id}"), json!({ "pet": unknown_id() }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["message"], "Pet not found");

    let (_, visit) = app.get(&format!("/api/visits/{id}")).await;
    assert_eq!(visit["reason"], "Checkup");
    assert_eq!(visit["veterinarian"]["id"], vet.as_str());
}

#[tokio::test]
async fn test_visit_update_null_reference_rejected() {
    let Clinic { app, pet, vet } = clinic().await;
    let id = app.create_visit(&pet, &vet, "2023-01-01").await;

    for body in [json!({ "pet": null }), json!({ "veterinarian": null })] {
        let (status, error) = app.put(&format!("/api/visits/{id}"), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error["message"].as_str().unwrap().contains("is required"));
    }

    let (_, visit) = app.get(&format!("/api/visits/{id}")).await;
    assert_eq!(visit["pet"]["id"], pet.as_str());
    assert_eq!(visit["veterinarian"]["id"], vet.as_str());
}

#[tokio::test]
async fn test_visit_update_fields() {
    let Clinic { app, pet, vet } = clinic().await;
    let id = app.create_visit(&pet, &vet, "2023-01-01").await;

    let (status, updated) = app
        .put(
            &format!("/api/visits/{id}"),
            json!({ "diagnosis": "Healthy", "date": "2023-02-01" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["diagnosis"], "Healthy");
    assert_eq!(updated["date"], "2023-02-01T00:00:00Z");
    assert_eq!(updated["reason"], "Checkup");
}

#[tokio::test]
async fn test_visits_by_pet_most_recent_first() {
    let Clinic { app, pet, vet } = clinic().await;
    app.create_visit(&pet, &vet, "2023-01-01").await;
    app.create_visit(&pet, &vet, "2023-06-01").await;
    app.create_visit(&pet, &vet, "2023-03-01").await;

    let (status, list) = app.get(&format!("/api/visits/pet/{pet}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        dates(&list),
        [
            "2023-06-01T00:00:00Z",
            "2023-03-01T00:00:00Z",
            "2023-01-01T00:00:00Z"
        ]
    );
    assert_eq!(list[0]["veterinarian"]["firstName"], "Lucia");
}

#[tokio::test]
async fn test_visits_by_pet_only_that_pet() {
    let Clinic { app, pet, vet } = clinic().await;
    let owner = app.create_owner("carlos@example.com").await;
    let other = app.create_pet(&owner, "Kiwi").await;
    app.create_visit(&pet, &vet, "2023-01-01").await;
    app.create_visit(&other, &vet, "2023-02-01").await;

    let (_, list) = app.get(&format!("/api/visits/pet/{pet}")).await;
    assert_eq!(dates(&list), ["2023-01-01T00:00:00Z"]);

    let (_, all) = app.get("/api/visits").await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_visits_by_unknown_pet_is_not_found() {
    let app = TestApp::new();

    let (status, error) = app
        .get(&format!("/api/visits/pet/{}", unknown_id()))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["message"], "Pet not found");
}

#[tokio::test]
async fn test_visit_survives_vet_delete() {
    let Clinic { app, pet, vet } = clinic().await;
    let id = app.create_visit(&pet, &vet, "2023-01-01").await;

    let (status, _) = app.delete(&format!("/api/vets/{vet}")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, visit) = app.get(&format!("/api/visits/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(visit["veterinarian"].is_null());
    assert_eq!(visit["pet"]["name"], "Rex");
}

#[tokio::test]
async fn test_visit_delete() {
    let Clinic { app, pet, vet } = clinic().await;
    let id = app.create_visit(&pet, &vet, "2023-01-01").await;

    let (status, body) = app.delete(&format!("/api/visits/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Visit deleted successfully");

    let (status, error) = app.delete(&format!("/api/visits/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["message"], "Visit not found");
}
