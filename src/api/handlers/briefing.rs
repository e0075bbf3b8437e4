use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::map::visible_zone_names;
use crate::api::{blocking, ApiResult, AppState};
use crate::briefing::*;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub server: Option<String>,
}

/// Edit token carried as `?token=`
#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: Uuid,
}

pub async fn list_briefings(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<BriefingListItem>>> {
    let items = blocking(move || state.briefings.list_items(query.server.as_deref())).await?;
    Ok(Json(items))
}

pub async fn create_briefing(
    State(state): State<AppState>,
    Json(data): Json<BriefingCreate>,
) -> ApiResult<(StatusCode, Json<BriefingCreateResponse>)> {
    let created = blocking(move || state.briefings.create(data)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_briefing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Briefing>> {
    Ok(Json(blocking(move || state.briefings.get(id)).await?))
}

pub async fn update_briefing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(TokenQuery { token }): Query<TokenQuery>,
    Json(data): Json<BriefingUpdate>,
) -> ApiResult<Json<Briefing>> {
    Ok(Json(
        blocking(move || state.briefings.update(id, token, data)).await?,
    ))
}

pub async fn delete_briefing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(TokenQuery { token }): Query<TokenQuery>,
) -> ApiResult<StatusCode> {
    blocking(move || state.briefings.delete(id, token)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Visible zones of the briefing's server, empty without a sitac
pub async fn available_zones(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<String>>> {
    let zones = blocking(move || {
        let briefing = state.briefings.get(id)?;
        Ok(state
            .servers
            .sitac_or_none(&briefing.server_name)
            .map(|sitac| visible_zone_names(&sitac))
            .unwrap_or_default())
    })
    .await?;
    Ok(Json(zones))
}

// Homeplates

pub async fn add_homeplate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(TokenQuery { token }): Query<TokenQuery>,
    Json(data): Json<HomeplateCreate>,
) -> ApiResult<(StatusCode, Json<Homeplate>)> {
    let homeplate = blocking(move || state.briefings.add_homeplate(id, token, data)).await?;
    Ok((StatusCode::CREATED, Json(homeplate)))
}

pub async fn update_homeplate(
    State(state): State<AppState>,
    Path((id, homeplate_id)): Path<(Uuid, Uuid)>,
    Query(TokenQuery { token }): Query<TokenQuery>,
    Json(data): Json<HomeplateUpdate>,
) -> ApiResult<Json<Homeplate>> {
    Ok(Json(
        blocking(move || state.briefings.update_homeplate(id, token, homeplate_id, data)).await?,
    ))
}

pub async fn remove_homeplate(
    State(state): State<AppState>,
    Path((id, homeplate_id)): Path<(Uuid, Uuid)>,
    Query(TokenQuery { token }): Query<TokenQuery>,
) -> ApiResult<StatusCode> {
    blocking(move || state.briefings.remove_homeplate(id, token, homeplate_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Objectives

pub async fn add_objective(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(TokenQuery { token }): Query<TokenQuery>,
    Json(data): Json<ObjectiveCreate>,
) -> ApiResult<(StatusCode, Json<Objective>)> {
    let objective = blocking(move || state.briefings.add_objective(id, token, data)).await?;
    Ok((StatusCode::CREATED, Json(objective)))
}

pub async fn update_objective(
    State(state): State<AppState>,
    Path((id, objective_id)): Path<(Uuid, Uuid)>,
    Query(TokenQuery { token }): Query<TokenQuery>,
    Json(data): Json<ObjectiveUpdate>,
) -> ApiResult<Json<Objective>> {
    Ok(Json(
        blocking(move || state.briefings.update_objective(id, token, objective_id, data)).await?,
    ))
}

pub async fn remove_objective(
    State(state): State<AppState>,
    Path((id, objective_id)): Path<(Uuid, Uuid)>,
    Query(TokenQuery { token }): Query<TokenQuery>,
) -> ApiResult<StatusCode> {
    blocking(move || state.briefings.remove_objective(id, token, objective_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Packages

pub async fn add_package(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(TokenQuery { token }): Query<TokenQuery>,
    Json(data): Json<PackageCreate>,
) -> ApiResult<(StatusCode, Json<Package>)> {
    let package = blocking(move || state.briefings.add_package(id, token, data)).await?;
    Ok((StatusCode::CREATED, Json(package)))
}

pub async fn update_package(
    State(state): State<AppState>,
    Path((id, package_id)): Path<(Uuid, Uuid)>,
    Query(TokenQuery { token }): Query<TokenQuery>,
    Json(data): Json<PackageUpdate>,
) -> ApiResult<Json<Package>> {
    Ok(Json(
        blocking(move || state.briefings.update_package(id, token, package_id, data)).await?,
    ))
}

pub async fn remove_package(
    State(state): State<AppState>,
    Path((id, package_id)): Path<(Uuid, Uuid)>,
    Query(TokenQuery { token }): Query<TokenQuery>,
) -> ApiResult<StatusCode> {
    blocking(move || state.briefings.remove_package(id, token, package_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Flights

pub async fn add_flight(
    State(state): State<AppState>,
    Path((id, package_id)): Path<(Uuid, Uuid)>,
    Query(TokenQuery { token }): Query<TokenQuery>,
    Json(data): Json<FlightCreate>,
) -> ApiResult<(StatusCode, Json<Flight>)> {
    let flight = blocking(move || state.briefings.add_flight(id, token, package_id, data)).await?;
    Ok((StatusCode::CREATED, Json(flight)))
}

pub async fn update_flight(
    State(state): State<AppState>,
    Path((id, package_id, flight_id)): Path<(Uuid, Uuid, Uuid)>,
    Query(TokenQuery { token }): Query<TokenQuery>,
    Json(data): Json<FlightUpdate>,
) -> ApiResult<Json<Flight>> {
    Ok(Json(
        blocking(move || {
            state
                .briefings
                .update_flight(id, token, package_id, flight_id, data)
        })
        .await?,
    ))
}

pub async fn remove_flight(
    State(state): State<AppState>,
    Path((id, package_id, flight_id)): Path<(Uuid, Uuid, Uuid)>,
    Query(TokenQuery { token }): Query<TokenQuery>,
) -> ApiResult<StatusCode> {
    blocking(move || state.briefings.remove_flight(id, token, package_id, flight_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
