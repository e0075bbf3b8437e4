use axum::extract::{Path, State};
use axum::Json;
use chrono::Local;
use serde::Serialize;

use crate::api::map::MapData;
use crate::api::{blocking, ApiResult, AppState};
use crate::sitac::Sitac;

#[derive(Debug, Serialize)]
pub struct Server {
    pub name: String,
}

pub async fn list_servers(State(state): State<AppState>) -> ApiResult<Json<Vec<Server>>> {
    let servers = blocking(move || state.servers.list_servers()).await?;
    Ok(Json(servers.into_iter().map(|name| Server { name }).collect()))
}

pub async fn get_sitac(
    State(state): State<AppState>,
    Path(server): Path<String>,
) -> ApiResult<Json<Sitac>> {
    let sitac = blocking(move || state.servers.active_sitac(&server)).await?;
    Ok(Json(sitac))
}

pub async fn get_map_data(
    State(state): State<AppState>,
    Path(server): Path<String>,
) -> ApiResult<Json<MapData>> {
    let show_zone_forces = state.config.features.show_zone_forces;
    let sitac = blocking(move || state.servers.active_sitac(&server)).await?;
    Ok(Json(MapData::from_sitac(&sitac, show_zone_forces, Local::now())))
}
