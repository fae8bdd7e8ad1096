//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Banner
//! GET  /health                    - Liveness check
//! GET  /health/ready              - Readiness check (store ping)
//!
//! # Owners
//! GET    /api/owners              - List owners
//! POST   /api/owners              - Create owner
//! GET    /api/owners/{id}         - Owner detail
//! PUT    /api/owners/{id}         - Update owner
//! DELETE /api/owners/{id}         - Delete owner
//!
//! # Pets
//! GET    /api/pets                - List pets (owner summary)
//! GET    /api/pets/owner/{id}     - Pets of one owner
//! POST   /api/pets                - Create pet
//! GET    /api/pets/{id}           - Pet detail (full owner)
//! PUT    /api/pets/{id}           - Update pet
//! DELETE /api/pets/{id}           - Delete pet
//!
//! # Veterinarians
//! GET    /api/vets                - List veterinarians
//! POST   /api/vets                - Create veterinarian
//! GET    /api/vets/{id}           - Veterinarian detail
//! PUT    /api/vets/{id}           - Update veterinarian
//! DELETE /api/vets/{id}           - Delete veterinarian
//!
//! # Visits
//! GET    /api/visits              - List visits (pet and vet summaries)
//! GET    /api/visits/pet/{id}     - Visits of one pet, most recent first
//! POST   /api/visits              - Create visit
//! GET    /api/visits/{id}         - Visit detail (full pet and vet)
//! PUT    /api/visits/{id}         - Update visit
//! DELETE /api/visits/{id}         - Delete visit
//! ```

pub mod extract;
pub mod owners;
pub mod pets;
pub mod vets;
pub mod visits;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{cors_layer, request_id_middleware};
use crate::models::EntityKind;
use crate::state::AppState;

/// `{ "message": "..." }` confirmation body.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

/// Confirmation returned by every delete.
fn deleted(kind: EntityKind) -> Json<MessageBody> {
    Json(MessageBody {
        message: format!("{kind} deleted successfully"),
    })
}

/// Create the owner routes router.
pub fn owner_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(owners::index).post(owners::create))
        .route(
            "/{id}",
            get(owners::show).put(owners::update).delete(owners::destroy),
        )
}

/// Create the pet routes router.
pub fn pet_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pets::index).post(pets::create))
        .route("/owner/{owner_id}", get(pets::by_owner))
        .route(
            "/{id}",
            get(pets::show).put(pets::update).delete(pets::destroy),
        )
}

/// Create the veterinarian routes router.
pub fn vet_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(vets::index).post(vets::create))
        .route(
            "/{id}",
            get(vets::show).put(vets::update).delete(vets::destroy),
        )
}

/// Create the visit routes router.
pub fn visit_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(visits::index).post(visits::create))
        .route("/pet/{pet_id}", get(visits::by_pet))
        .route(
            "/{id}",
            get(visits::show).put(visits::update).delete(visits::destroy),
        )
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .nest("/api/owners", owner_routes())
        .nest("/api/pets", pet_routes())
        .nest("/api/vets", vet_routes())
        .nest("/api/visits", visit_routes())
}

/// Build the full application: routes, health checks, fallback and the
/// tracing, request-id and CORS layers. Sentry layers are added in `main`.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(state.config().cors_origins.as_deref());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .fallback(fallback)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .layer(cors)
        .with_state(state)
}

/// `GET /`
async fn root() -> &'static str {
    "VetCare 360 API is running"
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[derive(Serialize)]
struct FallbackBody {
    error: &'static str,
}

/// Catch-all for unmatched paths.
async fn fallback() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(FallbackBody {
            error: "The requested path could not be found",
        }),
    )
}
