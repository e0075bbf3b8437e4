use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::AppState;
use crate::config::TileLayer;

/// Tile sources and feature flags for the map page
#[derive(Debug, Serialize)]
pub struct MapConfigResponse {
    pub title: String,
    pub url_tiles: String,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub alternative_tiles: Vec<TileLayer>,
    pub show_zone_forces: bool,
}

pub async fn map_config(State(state): State<AppState>) -> Json<MapConfigResponse> {
    let config = &state.config;
    Json(MapConfigResponse {
        title: config.web.title.clone(),
        url_tiles: config.map.url_tiles.clone(),
        min_zoom: config.map.min_zoom,
        max_zoom: config.map.max_zoom,
        alternative_tiles: config.map.alternative_tiles.clone(),
        show_zone_forces: config.features.show_zone_forces,
    })
}
