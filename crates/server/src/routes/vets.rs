//! Veterinarian route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::{MessageBody, deleted};
use crate::error::Result;
use crate::models::{CreateVetInput, EntityKind, UpdateVetInput, Veterinarian};
use crate::routes::extract::{ApiJson, parse_id};
use crate::services::VetService;
use crate::state::AppState;

const KIND: EntityKind = EntityKind::Veterinarian;

/// `GET /api/vets`
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Veterinarian>>> {
    Ok(Json(VetService::new(state.store()).list().await?))
}

/// `GET /api/vets/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Veterinarian>> {
    let id = parse_id(&id, KIND)?;
    Ok(Json(VetService::new(state.store()).get(id).await?))
}

/// `POST /api/vets`
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateVetInput>,
) -> Result<(StatusCode, Json<Veterinarian>)> {
    let vet = VetService::new(state.store()).create(&input).await?;
    Ok((StatusCode::CREATED, Json(vet)))
}

/// `PUT /api/vets/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<UpdateVetInput>,
) -> Result<Json<Veterinarian>> {
    let id = parse_id(&id, KIND)?;
    Ok(Json(VetService::new(state.store()).update(id, &input).await?))
}

/// `DELETE /api/vets/{id}`
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>> {
    let id = parse_id(&id, KIND)?;
    VetService::new(state.store()).delete(id).await?;
    Ok(deleted(KIND))
}
