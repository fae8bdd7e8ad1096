//! Visit route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::{MessageBody, deleted};
use crate::error::Result;
use crate::models::{CreateVisitInput, EntityKind, UpdateVisitInput, VisitDetail, VisitListItem};
use crate::routes::extract::{ApiJson, parse_id};
use crate::services::{ClinicQueries, VisitService};
use crate::state::AppState;

const KIND: EntityKind = EntityKind::Visit;

/// `GET /api/visits`
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<VisitListItem>>> {
    Ok(Json(ClinicQueries::new(state.store()).list_visits().await?))
}

/// `GET /api/visits/pet/{pet_id}`, most recent first.
pub async fn by_pet(
    State(state): State<AppState>,
    Path(pet_id): Path<String>,
) -> Result<Json<Vec<VisitListItem>>> {
    let pet_id = parse_id(&pet_id, EntityKind::Pet)?;
    let visits = ClinicQueries::new(state.store())
        .visits_for_pet(pet_id)
        .await?;
    Ok(Json(visits))
}

/// `GET /api/visits/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VisitDetail>> {
    let id = parse_id(&id, KIND)?;
    Ok(Json(ClinicQueries::new(state.store()).visit_detail(id).await?))
}

/// `POST /api/visits`
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateVisitInput>,
) -> Result<(StatusCode, Json<VisitListItem>)> {
    let visit = VisitService::new(state.store()).create(&input).await?;
    Ok((StatusCode::CREATED, Json(visit)))
}

/// `PUT /api/visits/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<UpdateVisitInput>,
) -> Result<Json<VisitListItem>> {
    let id = parse_id(&id, KIND)?;
    Ok(Json(VisitService::new(state.store()).update(id, &input).await?))
}

/// `DELETE /api/visits/{id}`
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>> {
    let id = parse_id(&id, KIND)?;
    VisitService::new(state.store()).delete(id).await?;
    Ok(deleted(KIND))
}
