//! HTTP router
//!
//! Maps each endpoint onto an InProcess call to the shipment service.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use envio_service::{EnvioRepository, EnvioService};
use tower_http::trace::TraceLayer;

use crate::handlers::{combos, envios, root};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub service: EnvioService,
}

impl AppState {
    pub fn new(repository: Arc<dyn EnvioRepository>) -> Self {
        Self {
            service: EnvioService::new(repository),
        }
    }
}

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root::welcome))
        .route("/health", get(root::health))
        .nest("/api/v1", api_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/repartidores", get(combos::list_repartidores))
        .route("/estados_envio", get(combos::list_estados_envio))
        .route("/envios", get(envios::list_envios))
        .route("/envio", post(envios::create_envio))
        .route(
            "/envio/:envio_id",
            get(envios::get_envio)
                .put(envios::update_envio)
                .delete(envios::delete_envio),
        )
}
