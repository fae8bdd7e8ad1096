//! Owner route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::{MessageBody, deleted};
use crate::error::Result;
use crate::models::{CreateOwnerInput, EntityKind, Owner, UpdateOwnerInput};
use crate::routes::extract::{ApiJson, parse_id};
use crate::services::OwnerService;
use crate::state::AppState;

const KIND: EntityKind = EntityKind::Owner;

/// `GET /api/owners`
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Owner>>> {
    Ok(Json(OwnerService::new(state.store()).list().await?))
}

/// `GET /api/owners/{id}`
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Owner>> {
    let id = parse_id(&id, KIND)?;
    Ok(Json(OwnerService::new(state.store()).get(id).await?))
}

/// `POST /api/owners`
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateOwnerInput>,
) -> Result<(StatusCode, Json<Owner>)> {
    let owner = OwnerService::new(state.store()).create(&input).await?;
    Ok((StatusCode::CREATED, Json(owner)))
}

/// `PUT /api/owners/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<UpdateOwnerInput>,
) -> Result<Json<Owner>> {
    let id = parse_id(&id, KIND)?;
    Ok(Json(OwnerService::new(state.store()).update(id, &input).await?))
}

/// `DELETE /api/owners/{id}`
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>> {
    let id = parse_id(&id, KIND)?;
    OwnerService::new(state.store()).delete(id).await?;
    Ok(deleted(KIND))
}
