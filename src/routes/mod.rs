pub mod admin;
pub mod assets;
pub mod auth;
pub mod home;
pub mod public;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Every route of the site and the dashboard.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes();

    Router::new()
        .route("/", get(home::index))
        .route("/contact", post(public::contact))
        .route("/reservations", post(public::reserve))
        .route("/api/orders", post(public::place_order))
        .route("/assets/{*path}", get(assets::serve))
        .route("/uploads/{*path}", get(assets::serve_upload))
        .merge(auth::router())
        .merge(admin::router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
