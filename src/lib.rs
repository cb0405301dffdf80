pub mod config;
pub mod docs;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod websocket;
pub mod ws;

use std::sync::Arc;
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::{AllowOrigin, Any, CorsLayer}, trace::TraceLayer};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use config::Config;
use docs::ApiDoc;
use routes::create_api_routes;
use websocket::handler::websocket_handler;
use ws::Hub;

/// Shared state handed to every HTTP and WebSocket handler.
pub struct AppState {
    pub config: Config,
    pub hub: Arc<Hub>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let hub = Hub::new(config.start_policy(), config.archive_limits());
        Self { config, hub: Arc::new(hub) }
    }
}

/// Build the full router: REST API, WebSocket endpoint and Swagger UI.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);
    Router::new()
        .route("/ws", get(websocket_handler))
        .nest("/api", create_api_routes())
        .with_state(state)
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods([Method::GET, Method::POST]);
    match config.cors_origin_list() {
        None => layer.allow_origin(Any),
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin '{}'", origin);
                        None
                    }
                })
                .collect();
            layer.allow_origin(AllowOrigin::list(origins))
        }
    }
}
