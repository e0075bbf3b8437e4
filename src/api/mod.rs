//! JSON HTTP API

use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::briefing::{BriefingService, BriefingStore};
use crate::config::AppConfig;
use crate::discovery::ServerDirectory;

pub mod error;
pub mod handlers;
pub mod map;

pub use error::{ApiError, ApiResult};
pub use map::{visible_zone_names, MapData};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub servers: Arc<ServerDirectory>,
    pub briefings: BriefingService,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let saved_games = config.dcs.saved_games.clone();
        Self {
            servers: Arc::new(ServerDirectory::new(&saved_games)),
            briefings: BriefingService::new(BriefingStore::for_saved_games(&saved_games)),
            config: Arc::new(config),
        }
    }
}

/// Run blocking file work off the async runtime
pub(crate) async fn blocking<T, F>(work: F) -> ApiResult<T>
where
    F: FnOnce() -> crate::error::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(ApiError::internal)?
        .map_err(ApiError::from)
}

pub fn configure(state: AppState) -> Router {
    Router::new()
        .merge(foothold_routes())
        .merge(briefing_routes())
        .route("/api/config/map", get(handlers::config::map_config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn foothold_routes() -> Router<AppState> {
    use handlers::foothold::*;

    Router::new()
        .route("/api/foothold", get(list_servers))
        .route("/api/foothold/:server/sitac", get(get_sitac))
        .route("/api/foothold/:server/map.json", get(get_map_data))
}

fn briefing_routes() -> Router<AppState> {
    use handlers::briefing::*;

    Router::new()
        .route("/api/briefing", get(list_briefings).post(create_briefing))
        .route(
            "/api/briefing/:id",
            get(get_briefing).put(update_briefing).delete(delete_briefing),
        )
        .route("/api/briefing/:id/zones", get(available_zones))
        .route("/api/briefing/:id/homeplates", post(add_homeplate))
        .route(
            "/api/briefing/:id/homeplates/:homeplate_id",
            put(update_homeplate).delete(remove_homeplate),
        )
        .route("/api/briefing/:id/objectives", post(add_objective))
        .route(
            "/api/briefing/:id/objectives/:objective_id",
            put(update_objective).delete(remove_objective),
        )
        .route("/api/briefing/:id/packages", post(add_package))
        .route(
            "/api/briefing/:id/packages/:package_id",
            put(update_package).delete(remove_package),
        )
        .route("/api/briefing/:id/packages/:package_id/flights", post(add_flight))
        .route(
            "/api/briefing/:id/packages/:package_id/flights/:flight_id",
            put(update_flight).delete(remove_flight),
        )
}
