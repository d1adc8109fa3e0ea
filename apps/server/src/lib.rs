//! HTTP API for the Till order/billing backend.
//!
//! Routes:
//! - `POST /orders` - transactional order creation
//! - `GET /orders/{id}` - committed-order display view
//! - `GET/POST /products`, `PUT/DELETE /products/{id}` - catalog CRUD
//! - `GET /health` - liveness + database reachability

pub mod config;
pub mod error;
pub mod routes;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use till_db::Database;

/// Shared application state accessible from all handlers.
///
/// `Database` is an Arc-backed pool handle, so this is cheap to clone per
/// request.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

/// Creates the axum application router with all routes and shared state.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::create))
        .route("/orders/{id}", get(routes::orders::get))
        .route(
            "/products",
            get(routes::products::list).post(routes::products::create),
        )
        .route(
            "/products/{id}",
            put(routes::products::update).delete(routes::products::remove),
        )
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
