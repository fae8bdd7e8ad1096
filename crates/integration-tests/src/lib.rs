//! Integration tests for VetCare 360.
//!
//! # Running Tests
//!
//! ```bash
//! # HTTP tests against the in-memory store
//! cargo test -p vetcare-integration-tests
//!
//! # Include the PostgreSQL store contract
//! VETCARE_TEST_DATABASE_URL=postgres://localhost/vetcare_test \
//!     cargo test -p vetcare-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `owners`, `pets`, `vets`, `visits` - API behaviour per resource
//! - `postgres_store` - Store contract against a real database

#![allow(clippy::missing_panics_doc)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use vetcare_server::config::ServerConfig;
use vetcare_server::db::MemoryStore;
use vetcare_server::state::AppState;

/// Response status and decoded JSON body (`Value::Null` when the body is not
/// JSON).
pub type Reply = (StatusCode, Value);

/// The full application backed by a fresh in-memory store.
pub struct TestApp {
    router: Router,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        let state = AppState::new(ServerConfig::default(), Arc::new(MemoryStore::new()));
        Self {
            router: vetcare_server::app(state),
        }
    }

    /// Send one request through the router.
    pub async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> Reply {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    pub async fn get(&self, uri: &str) -> Reply {
        self.call(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Reply {
        self.call(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> Reply {
        self.call(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> Reply {
        self.call(Method::DELETE, uri, None).await
    }

    /// Create a record and return its id, asserting 201.
    pub async fn create(&self, uri: &str, body: Value) -> String {
        let (status, created) = self.post(uri, body).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {created}");
        created["id"].as_str().expect("id in response").to_owned()
    }

    pub async fn create_owner(&self, email: &str) -> String {
        self.create("/api/owners", owner_body(email)).await
    }

    pub async fn create_vet(&self, email: &str, license_number: &str) -> String {
        self.create("/api/vets", vet_body(email, license_number))
            .await
    }

    pub async fn create_pet(&self, owner_id: &str, name: &str) -> String {
        self.create("/api/pets", pet_body(owner_id, name)).await
    }

    pub async fn create_visit(&self, pet_id: &str, vet_id: &str, date: &str) -> String {
        self.create("/api/visits", visit_body(pet_id, vet_id, date))
            .await
    }
}

#[must_use]
pub fn owner_body(email: &str) -> Value {
    json!({
        "firstName": "Jane",
        "lastName": "Doe",
        "email": email,
        "phone": "555-0100",
        "address": { "street": "12 Elm Street", "city": "Springfield", "zipCode": "12345" }
    })
}

#[must_use]
pub fn vet_body(email: &str, license_number: &str) -> Value {
    json!({
        "firstName": "Lucia",
        "lastName": "Ortiz",
        "specialization": "Surgery",
        "email": email,
        "phone": "555-0200",
        "licenseNumber": license_number
    })
}

#[must_use]
pub fn pet_body(owner_id: &str, name: &str) -> Value {
    json!({
        "name": name,
        "species": "Dog",
        "breed": "Labrador",
        "birthDate": "2018-05-14",
        "gender": "Male",
        "owner": owner_id
    })
}

#[must_use]
pub fn visit_body(pet_id: &str, vet_id: &str, date: &str) -> Value {
    json!({
        "pet": pet_id,
        "veterinarian": vet_id,
        "date": date,
        "reason": "Checkup"
    })
}

/// An id that no store ever hands out.
#[must_use]
pub fn unknown_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
