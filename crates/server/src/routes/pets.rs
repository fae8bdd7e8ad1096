//! Pet route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::{MessageBody, deleted};
use crate::error::Result;
use crate::models::{CreatePetInput, EntityKind, PetDetail, PetListItem, UpdatePetInput};
use crate::routes::extract::{ApiJson, parse_id};
use crate::services::{ClinicQueries, PetService};
use crate::state::AppState;

const KIND: EntityKind = EntityKind::Pet;

/// `GET /api/pets`
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<PetListItem>>> {
    Ok(Json(ClinicQueries::new(state.store()).list_pets().await?))
}

/// `GET /api/pets/owner/{owner_id}`
pub async fn by_owner(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> Result<Json<Vec<PetListItem>>> {
    let owner_id = parse_id(&owner_id, EntityKind::Owner)?;
    let pets = ClinicQueries::new(state.store())
        .pets_for_owner(owner_id)
        .await?;
    Ok(Json(pets))
}

/// `GET /api/pets/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PetDetail>> {
    let id = parse_id(&id, KIND)?;
    Ok(Json(ClinicQueries::new(state.store()).pet_detail(id).await?))
}

/// `POST /api/pets`
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreatePetInput>,
) -> Result<(StatusCode, Json<PetListItem>)> {
    let pet = PetService::new(state.store()).create(&input).await?;
    Ok((StatusCode::CREATED, Json(pet)))
}

/// `PUT /api/pets/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<UpdatePetInput>,
) -> Result<Json<PetListItem>> {
    let id = parse_id(&id, KIND)?;
    Ok(Json(PetService::new(state.store()).update(id, &input).await?))
}

/// `DELETE /api/pets/{id}`
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>> {
    let id = parse_id(&id, KIND)?;
    PetService::new(state.store()).delete(id).await?;
    Ok(deleted(KIND))
}
